//! Built-in pupil generators: the 3x3 center of a locator pattern,
//! drawn at `20..50` of the eye-local frame.

use crate::path::Path;
use crate::settings::{SettingsValue, ShapeSettings};

use super::{corner_local_transform, EyeCorner, PupilShape, MODULE};

/// Offset of the pupil within the eye-local frame.
pub const PUPIL_ORIGIN: f64 = 20.0;

/// Side length of the pupil square.
pub const PUPIL_SIDE: f64 = 30.0;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PupilKind {
    Square,
    Circle,
    Rounded,
    /// Rounded at top-left and bottom-right only; orientation-sensitive.
    Leaf,
    /// A 3x3 grid of dots.
    Dots,
}

impl PupilKind {
    pub const ALL: [PupilKind; 5] = [
        PupilKind::Square,
        PupilKind::Circle,
        PupilKind::Rounded,
        PupilKind::Leaf,
        PupilKind::Dots,
    ];
}

#[derive(Clone)]
pub struct PupilGenerator {
    kind: PupilKind,
    corner_radius_fraction: f64,
    dot_size_fraction: f64,
}

impl PupilGenerator {
    pub fn new(kind: PupilKind) -> Self {
        Self::create(kind, &ShapeSettings::default())
    }

    pub fn create(kind: PupilKind, settings: &ShapeSettings) -> Self {
        let default_radius = match kind {
            PupilKind::Rounded => 0.5,
            PupilKind::Leaf => 1.0,
            _ => 0.0,
        };
        PupilGenerator {
            kind,
            corner_radius_fraction: settings.fraction_or("corner_radius_fraction", default_radius),
            dot_size_fraction: settings.fraction_or("dot_size_fraction", 1.0),
        }
    }

    pub fn kind(&self) -> PupilKind {
        self.kind
    }

    fn keys(&self) -> &'static [&'static str] {
        match self.kind {
            PupilKind::Square | PupilKind::Circle => &[],
            PupilKind::Rounded | PupilKind::Leaf => &["corner_radius_fraction"],
            PupilKind::Dots => &["dot_size_fraction"],
        }
    }

    fn radii(&self) -> [f64; 4] {
        let r = self.corner_radius_fraction * PUPIL_SIDE / 2.0;
        match self.kind {
            PupilKind::Rounded => [r; 4],
            PupilKind::Leaf => [r, 0.0, r, 0.0],
            _ => [0.0; 4],
        }
    }

    fn build(&self, origin_x: f64, origin_y: f64, radii: [f64; 4]) -> Path {
        match self.kind {
            PupilKind::Circle => Path::circle(
                origin_x + PUPIL_SIDE / 2.0,
                origin_y + PUPIL_SIDE / 2.0,
                PUPIL_SIDE / 2.0,
            ),
            PupilKind::Dots => {
                let r = self.dot_size_fraction * MODULE / 2.0;
                let mut p = Path::new();
                for row in 0..3 {
                    for col in 0..3 {
                        let cx = origin_x + (col as f64 + 0.5) * MODULE;
                        let cy = origin_y + (row as f64 + 0.5) * MODULE;
                        p.append(&Path::circle(cx, cy, r));
                    }
                }
                p
            }
            _ => Path::rounded_rect(origin_x, origin_y, PUPIL_SIDE, PUPIL_SIDE, radii),
        }
    }
}

impl PupilShape for PupilGenerator {
    fn name(&self) -> &'static str {
        match self.kind {
            PupilKind::Square => "square",
            PupilKind::Circle => "circle",
            PupilKind::Rounded => "rounded",
            PupilKind::Leaf => "leaf",
            PupilKind::Dots => "dots",
        }
    }

    fn title(&self) -> &'static str {
        match self.kind {
            PupilKind::Square => "Square",
            PupilKind::Circle => "Circle",
            PupilKind::Rounded => "Rounded",
            PupilKind::Leaf => "Leaf",
            PupilKind::Dots => "Dots",
        }
    }

    fn generate_path(&self) -> Path {
        self.build(PUPIL_ORIGIN, PUPIL_ORIGIN, self.radii())
    }

    fn generate_path_for_corner(&self, corner: EyeCorner) -> Path {
        if self.kind != PupilKind::Leaf {
            return self.generate_path().transformed(&corner_local_transform(corner));
        }
        // Translate the canonical rendition with its radii untouched, so
        // the leaf keeps its handedness instead of being mirrored.
        let (origin_x, origin_y) = match corner {
            EyeCorner::TopLeft => (PUPIL_ORIGIN, PUPIL_ORIGIN),
            EyeCorner::TopRight => (PUPIL_ORIGIN + 20.0, PUPIL_ORIGIN),
            EyeCorner::BottomLeft => (PUPIL_ORIGIN, PUPIL_ORIGIN + 20.0),
        };
        self.build(origin_x, origin_y, self.radii())
    }

    fn supports_setting(&self, key: &str) -> bool {
        self.keys().contains(&key)
    }

    fn set_setting(&mut self, key: &str, value: &SettingsValue) -> bool {
        if !self.supports_setting(key) {
            return false;
        }
        match key {
            "corner_radius_fraction" => value
                .as_number()
                .map(|v| self.corner_radius_fraction = v.clamp(0.0, 1.0))
                .is_some(),
            "dot_size_fraction" => value
                .as_number()
                .map(|v| self.dot_size_fraction = v.clamp(0.0, 1.0))
                .is_some(),
            _ => false,
        }
    }

    fn settings(&self) -> ShapeSettings {
        let mut settings = ShapeSettings::new(self.name());
        for key in self.keys() {
            match *key {
                "corner_radius_fraction" => settings.set(key, self.corner_radius_fraction),
                "dot_size_fraction" => settings.set(key, self.dot_size_fraction),
                _ => {}
            }
        }
        settings
    }

    fn boxed_clone(&self) -> Box<dyn PupilShape> {
        Box::new(self.clone())
    }
}
