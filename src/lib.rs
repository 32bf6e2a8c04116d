//! # quirl
//!
//! A Rust library for rendering QR bit matrices as styled vector and raster art.
//!
//! `quirl` takes a boolean module matrix from any QR encoder and turns it into
//! layered geometry: pluggable shape generators draw the data modules, the
//! locator eyes and their pupils, a compositor assembles the layers (with quiet
//! zones, negation and optional logo cut-outs), and interchangeable backends
//! write the result as a PNG image buffer, an SVG document or a single-page
//! PDF. Encoding itself is injected through the [`engine::QrEngine`] trait.
//!
//! ## Features
//!
//! - Eight data-module shapes, from plain squares to neighbor-aware connected
//!   and inset styles, each with tunable parameters.
//! - Five eye and five pupil shapes, mirrored around the code center or
//!   re-rendered per corner.
//! - Per-component fills: solid colors, linear and radial gradients, images,
//!   plus drop shadows.
//! - Designs persist as JSON and round-trip losslessly; unknown shape names
//!   degrade to defaults instead of failing.
//! - Identical module coverage across the raster, SVG and PDF backends.
//! - Safe Rust implementation with no unsafe code.
//!
//! ## Installation
//!
//! Add to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! quirl = "0.1" # Replace with the latest version
//! ```
//!
//! ## Example
//!
//! Render a styled code and save it:
//!
//! ```rust,no_run
//! use quirl::design::QrDesign;
//! use quirl::engine::FixtureEngine;
//! use quirl::render::OutputFormat;
//! use quirl::settings::ShapeSettings;
//! use quirl::style::{Color, ComponentStyle};
//!
//! fn main() {
//!     let mut design = QrDesign::new("https://example.com");
//!     design.shapes.on_pixels = Some(ShapeSettings::new("connected"));
//!     design.shapes.eye = Some(ShapeSettings::new("leaf"));
//!     design.style.on_pixels = ComponentStyle::solid(Color::rgb(255, 165, 0));
//!
//!     let engine = FixtureEngine::new(); // swap in a real encoder here
//!     let artifact = design
//!         .render(&engine, OutputFormat::Svg, 512)
//!         .expect("render failed");
//!     artifact.save("output/styled_qr.svg").expect("save failed");
//! }
//! ```
//!
//! Compose geometry directly, without a design document:
//!
//! ```rust
//! use quirl::compose::{ActiveShapes, Compositor};
//! use quirl::matrix::BitMatrix;
//!
//! fn main() {
//!     let matrix = BitMatrix::sample();
//!     let paths = Compositor::default().compose(&matrix, &ActiveShapes::default());
//!     println!("{}", paths.on_pixels.to_svg_data());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`matrix`]: The boolean module matrix and its neighborhood topology.
//! - [`path`]: Resolution-independent path geometry and transforms.
//! - [`shape`]: Pixel, eye and pupil shape generators.
//! - [`settings`]: The key/value store generators persist through.
//! - [`registry`]: Name-keyed generator registries and catalog thumbnails.
//! - [`compose`]: Layered path composition of a whole code.
//! - [`style`]: Fills, shadows and their binding to components.
//! - [`engine`]: The QR encoding collaborator boundary.
//! - [`design`]: The persisted design document and render entry point.
//! - [`render`]: Raster, SVG and PDF output backends.

pub mod compose;
pub mod design;
pub mod engine;
pub mod matrix;
pub mod path;
pub mod registry;
pub mod render;
pub mod settings;
pub mod shape;
pub mod style;
