//! Built-in locator-ring ("eye") generators.
//!
//! The canonical template draws the 7x7 finder ring at `0..70` of the
//! eye-local frame, with the one-module separator towards the matrix
//! interior left empty. The ring is two nested outlines; the even-odd fill
//! rule used by every backend turns the inner one into a hole.

use crate::path::Path;
use crate::settings::{SettingsValue, ShapeSettings};

use super::pupil::{PupilGenerator, PupilKind};
use super::{corner_local_transform, EyeCorner, EyeShape, PupilShape, EYE_RING_OUTER};

/// Thickness of the finder ring, one module.
const RING: f64 = 10.0;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EyeKind {
    Square,
    Circle,
    Rounded,
    /// Rounded at top-left and bottom-right only; orientation-sensitive.
    Leaf,
    /// Rounded everywhere except the outward corner; orientation-sensitive.
    Shield,
}

impl EyeKind {
    pub const ALL: [EyeKind; 5] = [
        EyeKind::Square,
        EyeKind::Circle,
        EyeKind::Rounded,
        EyeKind::Leaf,
        EyeKind::Shield,
    ];
}

#[derive(Clone)]
pub struct EyeGenerator {
    kind: EyeKind,
    corner_radius_fraction: f64,
}

impl EyeGenerator {
    pub fn new(kind: EyeKind) -> Self {
        Self::create(kind, &ShapeSettings::default())
    }

    pub fn create(kind: EyeKind, settings: &ShapeSettings) -> Self {
        let default_radius = match kind {
            EyeKind::Rounded => 0.5,
            EyeKind::Leaf => 1.0,
            EyeKind::Shield => 0.8,
            _ => 0.0,
        };
        EyeGenerator {
            kind,
            corner_radius_fraction: settings.fraction_or("corner_radius_fraction", default_radius),
        }
    }

    pub fn kind(&self) -> EyeKind {
        self.kind
    }

    fn keys(&self) -> &'static [&'static str] {
        match self.kind {
            EyeKind::Square | EyeKind::Circle => &[],
            EyeKind::Rounded | EyeKind::Leaf | EyeKind::Shield => &["corner_radius_fraction"],
        }
    }

    /// Canonical outer radii `[top_left, top_right, bottom_right,
    /// bottom_left]` for the top-left corner rendition.
    fn radii(&self) -> [f64; 4] {
        let r = self.corner_radius_fraction * EYE_RING_OUTER / 2.0;
        match self.kind {
            EyeKind::Square | EyeKind::Circle => [0.0; 4],
            EyeKind::Rounded => [r; 4],
            EyeKind::Leaf => [r, 0.0, r, 0.0],
            EyeKind::Shield => [r, r, r, 0.0],
        }
    }

    /// Builds the ring at the given origin. Inner radii shrink by the ring
    /// thickness so the hole follows the outer curvature.
    fn ring(&self, origin_x: f64, origin_y: f64, radii: [f64; 4]) -> Path {
        if self.kind == EyeKind::Circle {
            let c = EYE_RING_OUTER / 2.0;
            let mut p = Path::circle(origin_x + c, origin_y + c, c);
            p.append(&Path::circle(origin_x + c, origin_y + c, c - RING));
            return p;
        }
        let mut p = Path::rounded_rect(origin_x, origin_y, EYE_RING_OUTER, EYE_RING_OUTER, radii);
        let inner_radii = radii.map(|r| (r - RING).max(0.0));
        p.append(&Path::rounded_rect(
            origin_x + RING,
            origin_y + RING,
            EYE_RING_OUTER - 2.0 * RING,
            EYE_RING_OUTER - 2.0 * RING,
            inner_radii,
        ));
        p
    }

    fn is_symmetric(&self) -> bool {
        matches!(self.kind, EyeKind::Square | EyeKind::Circle | EyeKind::Rounded)
    }
}

impl EyeShape for EyeGenerator {
    fn name(&self) -> &'static str {
        match self.kind {
            EyeKind::Square => "square",
            EyeKind::Circle => "circle",
            EyeKind::Rounded => "rounded",
            EyeKind::Leaf => "leaf",
            EyeKind::Shield => "shield",
        }
    }

    fn title(&self) -> &'static str {
        match self.kind {
            EyeKind::Square => "Square",
            EyeKind::Circle => "Circle",
            EyeKind::Rounded => "Rounded",
            EyeKind::Leaf => "Leaf",
            EyeKind::Shield => "Shield",
        }
    }

    fn generate_path(&self) -> Path {
        self.ring(0.0, 0.0, self.radii())
    }

    fn generate_path_for_corner(&self, corner: EyeCorner) -> Path {
        if self.is_symmetric() {
            return self.generate_path().transformed(&corner_local_transform(corner));
        }
        // Only the origin moves; the radii stay in canonical order, so a
        // leaf keeps its top-left/bottom-right rounding at every corner
        // instead of picking up the mirrored handedness.
        let (origin_x, origin_y) = match corner {
            EyeCorner::TopLeft => (0.0, 0.0),
            EyeCorner::TopRight => (20.0, 0.0),
            EyeCorner::BottomLeft => (0.0, 20.0),
        };
        self.ring(origin_x, origin_y, self.radii())
    }

    fn matching_pupil(&self) -> Box<dyn PupilShape> {
        let kind = match self.kind {
            EyeKind::Square => PupilKind::Square,
            EyeKind::Circle => PupilKind::Circle,
            EyeKind::Rounded | EyeKind::Shield => PupilKind::Rounded,
            EyeKind::Leaf => PupilKind::Leaf,
        };
        Box::new(PupilGenerator::new(kind))
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
            _ => false,
        }
    }

    fn settings(&self) -> ShapeSettings {
        let mut settings = ShapeSettings::new(self.name());
        for key in self.keys() {
            if *key == "corner_radius_fraction" {
                settings.set(key, self.corner_radius_fraction);
            }
        }
        settings
    }

    fn boxed_clone(&self) -> Box<dyn EyeShape> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::Point;

    #[test]
    fn every_kind_draws_a_ring_with_a_hole() {
        for kind in EyeKind::ALL {
            let g = EyeGenerator::new(kind);
            let path = g.generate_path();
            assert!(!path.is_empty());
            // On the ring.
            assert!(path.contains(Point::new(35.0, 5.0)), "{:?} ring missing", kind);
            // Inside the hole.
            assert!(!path.contains(Point::new(35.0, 35.0)), "{:?} hole filled", kind);
            let (min, max) = path.bounding_box().unwrap();
            assert!(min.x >= -1e-9 && max.x <= EYE_RING_OUTER + 1e-9);
            assert!(min.y >= -1e-9 && max.y <= EYE_RING_OUTER + 1e-9);
        }
    }

    #[test]
    fn symmetric_corner_rendition_equals_mirrored_canonical() {
        for kind in [EyeKind::Square, EyeKind::Circle, EyeKind::Rounded] {
            let g = EyeGenerator::new(kind);
            for corner in EyeCorner::ALL {
                let mirrored = g.generate_path().transformed(&corner_local_transform(corner));
                assert_eq!(g.generate_path_for_corner(corner), mirrored);
            }
        }
    }

    #[test]
    fn leaf_corner_rendition_keeps_canonical_handedness() {
        let g = EyeGenerator::new(EyeKind::Leaf);
        let rendered = g.generate_path_for_corner(EyeCorner::TopRight);
        let mirrored =
            g.generate_path().transformed(&corner_local_transform(EyeCorner::TopRight));
        // The ring box spans 20..90 by 0..70. The canonical leaf rounds
        // its top-left corner; the mirrored copy rounds the top-right
        // instead, so the two disagree at both upper corners.
        assert!(!rendered.contains(Point::new(21.0, 1.0)));
        assert!(mirrored.contains(Point::new(21.0, 1.0)));
        assert!(rendered.contains(Point::new(89.0, 1.0)));
        assert!(!mirrored.contains(Point::new(89.0, 1.0)));
    }

    #[test]
    fn leaf_corner_rendition_occupies_the_corner_box() {
        let g = EyeGenerator::new(EyeKind::Leaf);
        let p = g.generate_path_for_corner(EyeCorner::TopRight);
        let (min, max) = p.bounding_box().unwrap();
        assert!((min.x - 20.0).abs() < 1e-9 && (max.x - 90.0).abs() < 1e-9);
        assert!((min.y - 0.0).abs() < 1e-9 && (max.y - 70.0).abs() < 1e-9);
    }

    #[test]
    fn matching_pupil_follows_the_ring_style() {
        assert_eq!(EyeGenerator::new(EyeKind::Circle).matching_pupil().name(), "circle");
        assert_eq!(EyeGenerator::new(EyeKind::Leaf).matching_pupil().name(), "leaf");
        assert_eq!(EyeGenerator::new(EyeKind::Shield).matching_pupil().name(), "rounded");
    }

    #[test]
    fn settings_round_trip() {
        let mut g = EyeGenerator::new(EyeKind::Rounded);
        g.set_setting("corner_radius_fraction", &SettingsValue::Number(0.25));
        let rebuilt = EyeGenerator::create(EyeKind::Rounded, &g.settings());
        assert_eq!(g.generate_path(), rebuilt.generate_path());
    }
}
