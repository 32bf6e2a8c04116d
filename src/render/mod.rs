//! Output backends.
//!
//! A [`Renderer`] consumes the compositor's component paths plus a
//! [`StyleBinding`] and produces an [`Artifact`]. The three backends share
//! no code path for geometry; they all consume the same flattened or
//! serialized [`crate::path::Path`] data, which is what keeps module
//! coverage identical across formats. Backend failures (I/O, encoding)
//! surface as [`RenderError`]; degenerate geometry never does.

use std::fs;
use std::io::Cursor;
use std::path::Path as FsPath;

use image::RgbaImage;
use thiserror::Error;

use crate::compose::ComponentPaths;
use crate::engine::EngineError;
use crate::style::StyleBinding;

pub mod pdf;
pub mod raster;
pub mod svg;

pub use pdf::PdfRenderer;
pub use raster::RasterRenderer;
pub use svg::SvgRenderer;

/// Unified error type for the render boundary.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, RenderError>;

/// The supported output formats.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum OutputFormat {
    Raster,
    Svg,
    Pdf,
}

/// Constructs the renderer for a format.
pub fn renderer_for(format: OutputFormat) -> Box<dyn Renderer> {
    match format {
        OutputFormat::Raster => Box::new(RasterRenderer::new()),
        OutputFormat::Svg => Box::new(SvgRenderer::new()),
        OutputFormat::Pdf => Box::new(PdfRenderer::new()),
    }
}

/// A finished render in one concrete format.
#[derive(Clone, Debug)]
pub enum Artifact {
    Raster(RgbaImage),
    Svg(String),
    Pdf(Vec<u8>),
}

impl Artifact {
    /// The artifact as bytes: PNG for raster output, UTF-8 for SVG, the
    /// document stream for PDF.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        match self {
            Artifact::Raster(img) => {
                let mut bytes = Vec::new();
                img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)?;
                Ok(bytes)
            }
            Artifact::Svg(text) => Ok(text.clone().into_bytes()),
            Artifact::Pdf(bytes) => Ok(bytes.clone()),
        }
    }

    /// Writes the artifact to a file, creating parent directories as
    /// needed.
    pub fn save(&self, path: impl AsRef<FsPath>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        match self {
            Artifact::Raster(img) => img.save(path)?,
            Artifact::Svg(text) => fs::write(path, text)?,
            Artifact::Pdf(bytes) => fs::write(path, bytes)?,
        }
        Ok(())
    }
}

/// One render backend. Implementations hold no per-render state; a single
/// renderer may serve concurrent renders.
pub trait Renderer: Send + Sync {
    /// Renders the composed paths at `size` output units square (pixels
    /// for raster, user units otherwise). A zero size yields an empty
    /// artifact, not an error.
    fn render(&self, paths: &ComponentPaths, style: &StyleBinding, size: u32) -> Result<Artifact>;
}

/// Human-readable id of a component, used for SVG element ids and debug
/// output.
pub(crate) fn component_id(component: crate::compose::Component) -> &'static str {
    use crate::compose::Component::*;
    match component {
        OnPixels => "on-pixels",
        OffPixels => "off-pixels",
        EyeOuter => "eye-outer",
        EyePupil => "eye-pupil",
        EyeBackground => "eye-background",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::{ActiveShapes, Compositor};
    use crate::matrix::BitMatrix;

    fn sample_paths() -> ComponentPaths {
        let matrix = BitMatrix::from_fn(21, |r, c| (r * 31 + c * 17) % 3 == 0);
        Compositor::default().compose(&matrix, &ActiveShapes::default())
    }

    #[test]
    fn all_formats_produce_bytes() {
        let paths = sample_paths();
        let style = StyleBinding::default();
        for format in [OutputFormat::Raster, OutputFormat::Svg, OutputFormat::Pdf] {
            let renderer = renderer_for(format);
            let artifact = renderer.render(&paths, &style, 210).unwrap();
            assert!(!artifact.to_bytes().unwrap().is_empty());
        }
    }

    #[test]
    fn zero_size_yields_empty_artifacts_not_errors() {
        let paths = sample_paths();
        let style = StyleBinding::default();
        let raster = RasterRenderer::new().render(&paths, &style, 0).unwrap();
        match raster {
            Artifact::Raster(img) => assert_eq!(img.dimensions(), (0, 0)),
            _ => panic!("expected raster artifact"),
        }
        assert!(SvgRenderer::new().render(&paths, &style, 0).is_ok());
        assert!(PdfRenderer::new().render(&paths, &style, 0).is_ok());
    }
}
