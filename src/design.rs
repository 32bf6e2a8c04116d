//! The persisted design document and the blocking render entry point.
//!
//! A [`QrDesign`] captures everything needed to reproduce a styled code:
//! message, error correction level, quiet zone, composition flags,
//! per-component shape settings and the style binding. It round-trips
//! through JSON without loss for every built-in generator, and loading a
//! design that references an unknown shape name silently falls back to
//! that component's default, so a render always succeeds.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::compose::{ActiveShapes, Compositor, LogoMask};
use crate::engine::{EcLevel, QrEngine};
use crate::registry;
use crate::render::{renderer_for, Artifact, OutputFormat, Result};
use crate::settings::ShapeSettings;
use crate::style::StyleBinding;

/// Per-component generator selection. Unset components use their
/// documented defaults: `square` pixels and eyes, no off-pixel layer, and
/// the eye generator's matching pupil.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ShapeSelection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_pixels: Option<ShapeSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub off_pixels: Option<ShapeSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eye: Option<ShapeSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pupil: Option<ShapeSettings>,
}

fn default_true() -> bool {
    true
}

/// A complete styled-code description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QrDesign {
    pub message: String,
    #[serde(default)]
    pub ec_level: EcLevel,
    #[serde(default)]
    pub quiet_zone: u32,
    #[serde(default)]
    pub extend_into_eye_pattern: bool,
    #[serde(default = "default_true")]
    pub mirror_eye_paths_around_center: bool,
    #[serde(default)]
    pub negate_on_pixels: bool,
    #[serde(default)]
    pub shapes: ShapeSelection,
    #[serde(default)]
    pub style: StyleBinding,
}

impl QrDesign {
    pub fn new(message: impl Into<String>) -> Self {
        QrDesign {
            message: message.into(),
            ec_level: EcLevel::default(),
            quiet_zone: 0,
            extend_into_eye_pattern: false,
            mirror_eye_paths_around_center: true,
            negate_on_pixels: false,
            shapes: ShapeSelection::default(),
            style: StyleBinding::default(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Resolves the configured shape settings into live generators,
    /// degrading unknown names to defaults.
    pub fn resolve_shapes(&self) -> ActiveShapes {
        let mut shapes = ActiveShapes::default();
        if let Some(settings) = &self.shapes.on_pixels {
            match registry::pixel_shapes().from_settings(settings) {
                Some(shape) => shapes.on_pixels = shape,
                None => warn!("pixel shape {:?} unknown, using square", settings.type_name),
            }
        }
        if let Some(settings) = &self.shapes.off_pixels {
            match registry::pixel_shapes().from_settings(settings) {
                Some(shape) => shapes.off_pixels = Some(shape),
                None => warn!("off-pixel shape {:?} unknown, leaving layer empty", settings.type_name),
            }
        }
        if let Some(settings) = &self.shapes.eye {
            match registry::eye_shapes().from_settings(settings) {
                Some(shape) => shapes.eye = shape,
                None => warn!("eye shape {:?} unknown, using square", settings.type_name),
            }
        }
        if let Some(settings) = &self.shapes.pupil {
            match registry::pupil_shapes().from_settings(settings) {
                Some(shape) => shapes.pupil = Some(shape),
                None => warn!("pupil shape {:?} unknown, matching the eye", settings.type_name),
            }
        }
        shapes
    }

    fn compositor(&self, logo_mask: Option<LogoMask>) -> Compositor {
        Compositor {
            extend_into_eye_pattern: self.extend_into_eye_pattern,
            mirror_eye_paths_around_center: self.mirror_eye_paths_around_center,
            additional_quiet_zone: self.quiet_zone,
            negate_on_pixels: self.negate_on_pixels,
            logo_mask,
        }
    }

    /// Runs the whole pipeline synchronously: encode, compose, render.
    /// Expected to complete well under a second for any QR dimension up
    /// to 177x177; callers wanting debouncing or background execution
    /// schedule it themselves.
    pub fn render(
        &self,
        engine: &dyn QrEngine,
        format: OutputFormat,
        size: u32,
    ) -> Result<Artifact> {
        self.render_with_logo(engine, format, size, None)
    }

    /// Like [`render`](Self::render), reserving a logo region. The mask
    /// is a render-time parameter, not part of the persisted document.
    pub fn render_with_logo(
        &self,
        engine: &dyn QrEngine,
        format: OutputFormat,
        size: u32,
        logo_mask: Option<LogoMask>,
    ) -> Result<Artifact> {
        let matrix = engine.encode(self.message.as_bytes(), self.ec_level)?;
        debug!("encoded {} bytes into {}x{} matrix", self.message.len(), matrix.dimension(), matrix.dimension());
        let shapes = self.resolve_shapes();
        let paths = self.compositor(logo_mask).compose(&matrix, &shapes);
        renderer_for(format).render(&paths, &self.style, size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::FixtureEngine;
    use crate::style::{Color, ComponentStyle, Fill};

    fn styled_design() -> QrDesign {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut design = QrDesign::new("https://example.com");
        design.ec_level = EcLevel::H;
        design.quiet_zone = 4;
        design.shapes.on_pixels =
            Some(ShapeSettings::new("connected").with("corner_radius_fraction", 0.8));
        design.shapes.eye = Some(ShapeSettings::new("leaf"));
        design.style.on_pixels = ComponentStyle::solid(Color::rgb(255, 165, 0));
        design
    }

    #[test]
    fn json_round_trip_is_lossless() {
        let design = styled_design();
        let json = design.to_json().unwrap();
        let back = QrDesign::from_json(&json).unwrap();
        assert_eq!(design, back);
    }

    #[test]
    fn round_tripped_design_renders_identical_svg() {
        let engine = FixtureEngine::new();
        let design = styled_design();
        let back = QrDesign::from_json(&design.to_json().unwrap()).unwrap();
        let a = design.render(&engine, OutputFormat::Svg, 420).unwrap();
        let b = back.render(&engine, OutputFormat::Svg, 420).unwrap();
        let (Artifact::Svg(a), Artifact::Svg(b)) = (a, b) else { panic!("expected svg") };
        assert_eq!(a, b);
    }

    #[test]
    fn unknown_shape_names_degrade_to_defaults() {
        let mut design = QrDesign::new("fallback");
        design.shapes.on_pixels = Some(ShapeSettings::new("shape-from-the-future"));
        design.shapes.eye = Some(ShapeSettings::new("also-unknown"));
        let shapes = design.resolve_shapes();
        assert_eq!(shapes.on_pixels.name(), "square");
        assert_eq!(shapes.eye.name(), "square");
        // The render still succeeds end to end.
        let artifact = design.render(&FixtureEngine::new(), OutputFormat::Svg, 210).unwrap();
        assert!(matches!(artifact, Artifact::Svg(_)));
    }

    #[test]
    fn minimal_document_deserializes_with_defaults() {
        let design = QrDesign::from_json(r#"{"message":"hi"}"#).unwrap();
        assert_eq!(design.ec_level, EcLevel::M);
        assert_eq!(design.quiet_zone, 0);
        assert!(design.mirror_eye_paths_around_center);
        assert_eq!(design.style, StyleBinding::default());
    }

    #[test]
    fn all_formats_render_from_a_design() {
        let engine = FixtureEngine::new();
        let design = styled_design();
        for format in [OutputFormat::Raster, OutputFormat::Svg, OutputFormat::Pdf] {
            assert!(design.render(&engine, format, 210).is_ok());
        }
    }

    #[test]
    fn logo_mask_is_a_render_parameter_not_persisted() {
        let engine = FixtureEngine::new();
        let design = QrDesign::new("reserved center");
        let mask = LogoMask::centered_square(0.3, 1.0);
        let with_logo = design
            .render_with_logo(&engine, OutputFormat::Svg, 210, Some(mask))
            .unwrap();
        let without = design.render(&engine, OutputFormat::Svg, 210).unwrap();
        let (Artifact::Svg(a), Artifact::Svg(b)) = (with_logo, without) else {
            panic!("expected svg")
        };
        assert_ne!(a, b);
        assert!(!design.to_json().unwrap().contains("logo_mask"));
    }

    #[test]
    fn image_fill_design_round_trips() {
        let mut design = QrDesign::new("image");
        design.style.background = Fill::Image {
            path: "assets/texture.png".into(),
            fallback: Color::WHITE,
        };
        let back = QrDesign::from_json(&design.to_json().unwrap()).unwrap();
        assert_eq!(design, back);
    }
}
