//! Raster output via scanline polygon filling.
//!
//! Paths are flattened to polygons in pixel space and filled with the
//! even-odd rule at pixel centers, so raster module coverage matches the
//! `fill-rule="evenodd"` geometry the SVG and PDF backends emit. Gradient
//! fills are evaluated per pixel; image fills sample the source stretched
//! over the canvas. Shadow offsets are honored, blur is not rasterized.

use image::{Rgba, RgbaImage};
use log::warn;

use crate::compose::ComponentPaths;
use crate::path::{Point, Transform};
use crate::shape::MODULE;
use crate::style::{Color, Fill, StyleBinding};

use super::{Artifact, Renderer, Result};

pub struct RasterRenderer;

impl RasterRenderer {
    pub fn new() -> Self {
        RasterRenderer
    }
}

impl Default for RasterRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for RasterRenderer {
    fn render(&self, paths: &ComponentPaths, style: &StyleBinding, size: u32) -> Result<Artifact> {
        if size == 0 || paths.span_units <= 0.0 {
            return Ok(Artifact::Raster(RgbaImage::new(0, 0)));
        }
        let scale = size as f64 / paths.span_units;
        let mut img = RgbaImage::new(size, size);

        let background = FillSampler::new(&style.background, size);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            *pixel = to_rgba(background.color_at(x, y));
        }

        for (component, path) in paths.iter_draw_order() {
            if path.is_empty() {
                continue;
            }
            let component_style = style.for_component(component);
            let to_pixels = Transform::scale(scale);
            let polygons = path.transformed(&to_pixels).flatten();
            if let Some(shadow) = &component_style.shadow {
                let offset = Transform::translate(
                    shadow.offset_x * MODULE * scale,
                    shadow.offset_y * MODULE * scale,
                );
                let shifted = path.transformed(&to_pixels.then(&offset)).flatten();
                let sampler = FillSampler::Solid(shadow.color);
                fill_polygons(&mut img, &shifted, &sampler);
            }
            let sampler = FillSampler::new(&component_style.fill, size);
            fill_polygons(&mut img, &polygons, &sampler);
        }
        Ok(Artifact::Raster(img))
    }
}

/// Resolves a fill to a color per pixel.
enum FillSampler {
    Solid(Color),
    Linear { start: Color, end: Color, dx: f64, dy: f64, size: f64 },
    Radial { center: Color, edge: Color, size: f64 },
    Image { image: Option<RgbaImage>, fallback: Color, size: f64 },
}

impl FillSampler {
    fn new(fill: &Fill, size: u32) -> Self {
        match fill {
            Fill::Solid { color } => FillSampler::Solid(*color),
            Fill::LinearGradient { start, end, angle_degrees } => {
                let rad = angle_degrees.to_radians();
                FillSampler::Linear {
                    start: *start,
                    end: *end,
                    dx: rad.cos(),
                    dy: rad.sin(),
                    size: size as f64,
                }
            }
            Fill::RadialGradient { center, edge } => {
                FillSampler::Radial { center: *center, edge: *edge, size: size as f64 }
            }
            Fill::Image { path, fallback } => {
                let image = match image::open(path) {
                    Ok(img) => Some(img.to_rgba8()),
                    Err(err) => {
                        warn!("image fill {:?} unavailable, using fallback: {}", path, err);
                        None
                    }
                };
                FillSampler::Image { image, fallback: *fallback, size: size as f64 }
            }
        }
    }

    fn color_at(&self, x: u32, y: u32) -> Color {
        match self {
            FillSampler::Solid(color) => *color,
            FillSampler::Linear { start, end, dx, dy, size } => {
                let u = (x as f64 + 0.5) / size - 0.5;
                let v = (y as f64 + 0.5) / size - 0.5;
                // Project onto the gradient axis; the axis spans the
                // canvas diagonal of the unit square.
                let t = (u * dx + v * dy) + 0.5;
                start.lerp(*end, t)
            }
            FillSampler::Radial { center, edge, size } => {
                let u = (x as f64 + 0.5) / size - 0.5;
                let v = (y as f64 + 0.5) / size - 0.5;
                let t = (u * u + v * v).sqrt() / std::f64::consts::FRAC_1_SQRT_2;
                center.lerp(*edge, t)
            }
            FillSampler::Image { image, fallback, size } => match image {
                Some(img) => {
                    let (w, h) = img.dimensions();
                    if w == 0 || h == 0 {
                        return *fallback;
                    }
                    // Nearest sampling of the image stretched over the
                    // square canvas; cheap and deterministic.
                    let sx = ((x as f64 / size) * w as f64) as u32;
                    let sy = ((y as f64 / size) * h as f64) as u32;
                    let p = img.get_pixel(sx.min(w - 1), sy.min(h - 1));
                    Color::rgba(p[0], p[1], p[2], p[3])
                }
                None => *fallback,
            },
        }
    }
}

/// Even-odd scanline fill over a polygon set, blending `sampler` colors
/// over the existing pixels.
fn fill_polygons(img: &mut RgbaImage, polygons: &[Vec<Point>], sampler: &FillSampler) {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 || polygons.is_empty() {
        return;
    }
    let mut crossings: Vec<f64> = Vec::new();
    for y in 0..height {
        let scan_y = y as f64 + 0.5;
        crossings.clear();
        for poly in polygons {
            let mut j = poly.len() - 1;
            for i in 0..poly.len() {
                let (a, b) = (poly[j], poly[i]);
                if (a.y > scan_y) != (b.y > scan_y) {
                    crossings.push((b.x - a.x) * (scan_y - a.y) / (b.y - a.y) + a.x);
                }
                j = i;
            }
        }
        crossings.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        for pair in crossings.chunks_exact(2) {
            let x0 = (pair[0] - 0.5).ceil().max(0.0) as u32;
            let x1 = ((pair[1] - 0.5).floor() as i64).min(width as i64 - 1);
            if x1 < 0 {
                continue;
            }
            for x in x0..=x1 as u32 {
                let color = sampler.color_at(x, y);
                let dst = *img.get_pixel(x, y);
                img.put_pixel(x, y, blend_over(color, dst));
            }
        }
    }
}

/// Source-over alpha blending.
fn blend_over(src: Color, dst: Rgba<u8>) -> Rgba<u8> {
    if src.a == 255 {
        return Rgba([src.r, src.g, src.b, 255]);
    }
    let sa = src.a as f64 / 255.0;
    let da = dst[3] as f64 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }
    let channel = |s: u8, d: u8| {
        let v = (s as f64 * sa + d as f64 * da * (1.0 - sa)) / out_a;
        v.round().clamp(0.0, 255.0) as u8
    };
    Rgba([
        channel(src.r, dst[0]),
        channel(src.g, dst[1]),
        channel(src.b, dst[2]),
        (out_a * 255.0).round() as u8,
    ])
}

fn to_rgba(c: Color) -> Rgba<u8> {
    Rgba([c.r, c.g, c.b, c.a])
}
