//! Layered path composition.
//!
//! The [`Compositor`] decides which matrix cells belong to which logical
//! [`Component`], asks the active generators for geometry, places the
//! three locator eyes, applies quiet-zone padding, logo masking and the
//! negation mode, and yields one path per component in a single output
//! coordinate space. It holds no state between renders; everything is
//! driven by its configuration fields.

use log::debug;

use crate::matrix::{BitMatrix, Topology, EYE_ZONE};
use crate::path::{Path, Point, Transform};
use crate::shape::pixel::{PixelGenerator, PixelKind};
use crate::shape::{
    EyeCorner, EyeShape, PixelRegion, PixelShape, PupilShape, EYE_FRAME, MODULE,
};

/// The logical layers of a rendered code.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Component {
    OnPixels,
    OffPixels,
    EyeOuter,
    EyePupil,
    EyeBackground,
}

impl Component {
    pub const ALL: [Component; 5] = [
        Component::OnPixels,
        Component::OffPixels,
        Component::EyeOuter,
        Component::EyePupil,
        Component::EyeBackground,
    ];

    /// Painting order, back to front.
    pub const DRAW_ORDER: [Component; 5] = [
        Component::OffPixels,
        Component::EyeBackground,
        Component::OnPixels,
        Component::EyeOuter,
        Component::EyePupil,
    ];
}

/// One generated path per component, plus the side length of the output
/// coordinate space in local units (quiet zone included). Every path may
/// be empty; "nothing to draw" is a valid composition.
#[derive(Clone, PartialEq, Debug)]
pub struct ComponentPaths {
    pub span_units: f64,
    pub on_pixels: Path,
    pub off_pixels: Path,
    pub eye_outer: Path,
    pub eye_pupil: Path,
    pub eye_background: Path,
}

impl ComponentPaths {
    pub fn get(&self, component: Component) -> &Path {
        match component {
            Component::OnPixels => &self.on_pixels,
            Component::OffPixels => &self.off_pixels,
            Component::EyeOuter => &self.eye_outer,
            Component::EyePupil => &self.eye_pupil,
            Component::EyeBackground => &self.eye_background,
        }
    }

    /// Components in painting order, back to front.
    pub fn iter_draw_order(&self) -> impl Iterator<Item = (Component, &Path)> {
        Component::DRAW_ORDER.iter().map(move |c| (*c, self.get(*c)))
    }
}

/// A region reserved for an overlaid logo: a path in unit-square
/// coordinates (mapped over the whole matrix) plus an inset in module
/// units. Cells whose center falls inside the region, or within `inset`
/// modules of its outline, are dropped before path generation, so no
/// styled geometry is ever painted there.
#[derive(Clone, Debug)]
pub struct LogoMask {
    pub path: Path,
    pub inset: f64,
    /// Also drop locator eyes whose zone intersects the region. Off by
    /// default; a logo over an eye usually breaks scanning.
    pub applies_to_eyes: bool,
}

impl LogoMask {
    /// A centered square covering `fraction` of the code's width.
    pub fn centered_square(fraction: f64, inset: f64) -> Self {
        let fraction = fraction.clamp(0.0, 1.0);
        let origin = (1.0 - fraction) / 2.0;
        LogoMask {
            path: Path::rect(origin, origin, fraction, fraction),
            inset,
            applies_to_eyes: false,
        }
    }
}

/// The generators a composition uses. A missing off-pixel generator means
/// the background stays unpainted; a missing pupil falls back to the eye
/// generator's matching pupil.
pub struct ActiveShapes {
    pub on_pixels: Box<dyn PixelShape>,
    pub off_pixels: Option<Box<dyn PixelShape>>,
    pub eye: Box<dyn EyeShape>,
    pub pupil: Option<Box<dyn PupilShape>>,
}

impl Default for ActiveShapes {
    fn default() -> Self {
        ActiveShapes {
            on_pixels: Box::new(PixelGenerator::new(PixelKind::Square)),
            off_pixels: None,
            eye: Box::new(crate::shape::eye::EyeGenerator::new(crate::shape::eye::EyeKind::Square)),
            pupil: None,
        }
    }
}

/// Configuration-driven composition of a matrix into component paths.
#[derive(Clone, Debug)]
pub struct Compositor {
    /// Let pixel shapes draw locator-zone cells too, merging visually with
    /// the eye pattern. Honored only for generators that declare the
    /// capability.
    pub extend_into_eye_pattern: bool,
    /// Place the top-right and bottom-left eyes by reflecting the
    /// top-left template. When false, each corner is re-rendered by the
    /// generator instead.
    pub mirror_eye_paths_around_center: bool,
    /// Extra empty border, in modules, on every side.
    pub additional_quiet_zone: u32,
    /// Swap on/off roles at the matrix level so a single generator paints
    /// what would otherwise be the background. No off-pixel generator runs
    /// in this mode.
    pub negate_on_pixels: bool,
    pub logo_mask: Option<LogoMask>,
}

impl Default for Compositor {
    fn default() -> Self {
        Compositor {
            extend_into_eye_pattern: false,
            mirror_eye_paths_around_center: true,
            additional_quiet_zone: 0,
            negate_on_pixels: false,
            logo_mask: None,
        }
    }
}

impl Compositor {
    /// Composes the full component->path set for one matrix.
    pub fn compose(&self, matrix: &BitMatrix, shapes: &ActiveShapes) -> ComponentPaths {
        let dim = matrix.dimension();
        let content = dim as f64 * MODULE;
        let offset = self.additional_quiet_zone as f64 * MODULE;
        let span_units = content + 2.0 * offset;
        let place = Transform::translate(offset, offset);

        let (on_pixels, off_pixels) = self.pixel_paths(matrix, shapes, &place);
        let (eye_outer, eye_pupil, eye_background) = self.eye_paths(dim, content, offset, shapes);

        debug!(
            "composed {}x{} matrix into {} units (quiet zone {})",
            dim, dim, span_units, self.additional_quiet_zone
        );
        ComponentPaths { span_units, on_pixels, off_pixels, eye_outer, eye_pupil, eye_background }
    }

    /// Clears logo-masked cells from a generation matrix. Applied after
    /// any role negation, so the reserved region stays empty in every
    /// mode, and before path generation, so neighbor-aware shapes treat a
    /// dropped cell as light.
    fn mask_matrix(&self, matrix: BitMatrix) -> BitMatrix {
        let Some(mask) = self.logo_mask.as_ref() else {
            return matrix;
        };
        let dim = matrix.dimension();
        let content = dim as f64 * MODULE;
        let region = mask.path.transformed(&Transform::scale(content));
        let inset = mask.inset * MODULE;
        BitMatrix::from_fn(dim, |row, col| {
            let center = Point::new((col as f64 + 0.5) * MODULE, (row as f64 + 0.5) * MODULE);
            let masked = region.contains(center) || region.distance_to_outline(center) <= inset;
            matrix.get(row, col) && !masked
        })
    }

    fn pixel_paths(
        &self,
        matrix: &BitMatrix,
        shapes: &ActiveShapes,
        place: &Transform,
    ) -> (Path, Path) {
        let region_for = |shape: &dyn PixelShape| {
            if self.extend_into_eye_pattern && shape.can_generate_eye_and_pupil_shapes() {
                PixelRegion::IncludeEyes
            } else {
                PixelRegion::DataOnly
            }
        };

        if self.negate_on_pixels {
            let working = self.mask_matrix(matrix.negated());
            let topology = Topology::new(&working);
            let on = shapes
                .on_pixels
                .generate_path(&topology, region_for(shapes.on_pixels.as_ref()))
                .transformed(place);
            return (on, Path::new());
        }

        let on_matrix = self.mask_matrix(matrix.clone());
        let topology = Topology::new(&on_matrix);
        let on = shapes
            .on_pixels
            .generate_path(&topology, region_for(shapes.on_pixels.as_ref()))
            .transformed(place);
        let off = match &shapes.off_pixels {
            Some(shape) => {
                let off_matrix = self.mask_matrix(matrix.negated());
                let off_topology = Topology::new(&off_matrix);
                shape
                    .generate_path(&off_topology, region_for(shape.as_ref()))
                    .transformed(place)
            }
            None => Path::new(),
        };
        (on, off)
    }

    /// Generates and places the three eyes. The canonical template lives
    /// in the eye-local frame; placement differs between the two modes:
    ///
    /// - mirrored: one template, reflected about the content center for
    ///   the top-right and bottom-left corners;
    /// - re-rendered: a corner-specific template per corner, placed by
    ///   pure translation.
    fn eye_paths(
        &self,
        dim: usize,
        content: f64,
        offset: f64,
        shapes: &ActiveShapes,
    ) -> (Path, Path, Path) {
        // Locator zones would overlap on degenerate matrices.
        if dim < 2 * EYE_ZONE {
            return (Path::new(), Path::new(), Path::new());
        }

        let pupil: Box<dyn PupilShape> = match &shapes.pupil {
            Some(p) => p.boxed_clone(),
            None => shapes.eye.matching_pupil(),
        };

        let mut eye_outer = Path::new();
        let mut eye_pupil = Path::new();
        let mut eye_background = Path::new();
        let place = Transform::translate(offset, offset);

        for corner in EyeCorner::ALL {
            if self.eye_masked(corner, content) {
                continue;
            }
            let (eye_path, pupil_path) = if self.mirror_eye_paths_around_center {
                let reflect = corner_content_transform(corner, content);
                (
                    shapes.eye.generate_path().transformed(&reflect),
                    pupil.generate_path().transformed(&reflect),
                )
            } else {
                let translate = corner_frame_translation(corner, content);
                (
                    shapes.eye.generate_path_for_corner(corner).transformed(&translate),
                    pupil.generate_path_for_corner(corner).transformed(&translate),
                )
            };
            eye_outer.append(&eye_path.transformed(&place));
            eye_pupil.append(&pupil_path.transformed(&place));
            let zone = corner_frame_translation(corner, content).then(&place);
            eye_background.append(&Path::rect(0.0, 0.0, EYE_FRAME, EYE_FRAME).transformed(&zone));
        }
        (eye_outer, eye_pupil, eye_background)
    }

    /// Whether a logo mask that opts into eye masking swallows this
    /// corner's zone. Coarse by construction: any overlap drops the whole
    /// eye, since a partially covered locator cannot scan anyway.
    fn eye_masked(&self, corner: EyeCorner, content: f64) -> bool {
        let mask = match &self.logo_mask {
            Some(mask) if mask.applies_to_eyes => mask,
            _ => return false,
        };
        let region = mask.path.transformed(&Transform::scale(content));
        let Some((min, max)) = region.bounding_box() else {
            return false;
        };
        let zone = corner_frame_translation(corner, content);
        let z0 = zone.apply(Point::new(0.0, 0.0));
        let z1 = zone.apply(Point::new(EYE_FRAME, EYE_FRAME));
        let inset = mask.inset * MODULE;
        !(max.x + inset < z0.x || min.x - inset > z1.x || max.y + inset < z0.y || min.y - inset > z1.y)
    }
}

/// Reflection placing the canonical top-left eye template at a corner:
/// identity at top-left, horizontal flip about the content center at
/// top-right, vertical flip at bottom-left.
pub fn corner_content_transform(corner: EyeCorner, content: f64) -> Transform {
    match corner {
        EyeCorner::TopLeft => Transform::identity(),
        EyeCorner::TopRight => Transform::flip_horizontal(content / 2.0),
        EyeCorner::BottomLeft => Transform::flip_vertical(content / 2.0),
    }
}

/// Translation placing a corner-local eye frame into content space.
fn corner_frame_translation(corner: EyeCorner, content: f64) -> Transform {
    match corner {
        EyeCorner::TopLeft => Transform::identity(),
        EyeCorner::TopRight => Transform::translate(content - EYE_FRAME, 0.0),
        EyeCorner::BottomLeft => Transform::translate(0.0, content - EYE_FRAME),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::eye::{EyeGenerator, EyeKind};

    /// A 21x21 matrix that is dark only on the three finder patterns.
    fn finder_only_matrix() -> BitMatrix {
        let finder = |r: usize, c: usize| {
            (r == 0 || r == 6 || c == 0 || c == 6) || ((2..=4).contains(&r) && (2..=4).contains(&c))
        };
        BitMatrix::from_fn(21, |row, col| {
            let anchors = [(0usize, 0usize), (0, 14), (14, 0)];
            anchors.iter().any(|(ar, ac)| {
                row >= *ar && row < ar + 7 && col >= *ac && col < ac + 7 && finder(row - ar, col - ac)
            })
        })
    }

    #[test]
    fn finder_only_matrix_yields_empty_on_pixels_and_three_eyes() {
        let matrix = finder_only_matrix();
        let paths = Compositor::default().compose(&matrix, &ActiveShapes::default());
        assert!(paths.on_pixels.is_empty());
        assert!(!paths.eye_outer.is_empty());
        assert!(!paths.eye_pupil.is_empty());
        // Ring geometry present at each of the three canonical anchors.
        for (x, y) in [(5.0, 5.0), (205.0, 5.0), (5.0, 205.0)] {
            assert!(paths.eye_outer.contains(Point::new(x, y)), "no ring at ({x},{y})");
        }
        // Pupils sit at the ring centers.
        for (x, y) in [(35.0, 35.0), (175.0, 35.0), (35.0, 175.0)] {
            assert!(paths.eye_pupil.contains(Point::new(x, y)), "no pupil at ({x},{y})");
        }
        // Nothing at the bottom-right corner.
        assert!(!paths.eye_outer.contains(Point::new(205.0, 205.0)));
    }

    #[test]
    fn data_pixels_never_enter_eye_regions_by_default() {
        let matrix = BitMatrix::from_fn(21, |_, _| true);
        let paths = Compositor::default().compose(&matrix, &ActiveShapes::default());
        let topology_probe = [(4.0 * MODULE + 5.0, 4.0 * MODULE + 5.0)];
        for (x, y) in topology_probe {
            assert!(!paths.on_pixels.contains(Point::new(x, y)));
        }
        assert!(paths.on_pixels.contains(Point::new(10.0 * MODULE + 5.0, 10.0 * MODULE + 5.0)));
    }

    #[test]
    fn extend_mode_includes_eye_cells_for_capable_shapes() {
        let matrix = BitMatrix::from_fn(21, |_, _| true);
        let compositor = Compositor { extend_into_eye_pattern: true, ..Default::default() };
        let paths = compositor.compose(&matrix, &ActiveShapes::default());
        assert!(paths.on_pixels.contains(Point::new(5.0, 5.0)));

        // A dotted shape lacks the capability and stays out of the eyes.
        let shapes = ActiveShapes {
            on_pixels: Box::new(PixelGenerator::new(PixelKind::Circle)),
            ..Default::default()
        };
        let paths = compositor.compose(&matrix, &shapes);
        assert!(!paths.on_pixels.contains(Point::new(5.0, 5.0)));
    }

    #[test]
    fn quiet_zone_insets_everything_without_changing_local_geometry() {
        let matrix = finder_only_matrix();
        let plain = Compositor::default().compose(&matrix, &ActiveShapes::default());
        let padded = Compositor { additional_quiet_zone: 4, ..Default::default() }
            .compose(&matrix, &ActiveShapes::default());

        assert_eq!(plain.span_units, 210.0);
        assert_eq!(padded.span_units, 290.0);
        // The padded composition is exactly the plain one translated by
        // four module widths.
        let shifted = plain.eye_outer.transformed(&Transform::translate(40.0, 40.0));
        assert_eq!(padded.eye_outer, shifted);
    }

    #[test]
    fn mirrored_corners_are_pure_reflections_of_the_top_left_eye() {
        let matrix = finder_only_matrix();
        let shapes = ActiveShapes {
            eye: Box::new(EyeGenerator::new(EyeKind::Rounded)),
            ..Default::default()
        };
        let compositor = Compositor::default();
        let paths = compositor.compose(&matrix, &shapes);

        let canonical = shapes.eye.generate_path();
        let content = 210.0;
        let mut expected = Path::new();
        for corner in EyeCorner::ALL {
            expected.append(&canonical.transformed(&corner_content_transform(corner, content)));
        }
        assert_eq!(paths.eye_outer, expected);
    }

    #[test]
    fn non_mirror_mode_re_renders_per_corner() {
        let matrix = finder_only_matrix();
        let shapes = ActiveShapes {
            eye: Box::new(EyeGenerator::new(EyeKind::Leaf)),
            ..Default::default()
        };
        let mirrored = Compositor::default().compose(&matrix, &shapes);
        let re_rendered = Compositor { mirror_eye_paths_around_center: false, ..Default::default() }
            .compose(&matrix, &shapes);
        // A leaf ring is asymmetric, so the modes disagree at the
        // top-right eye's outer corner (content point (210, 0)): rounded
        // away when mirrored, square when re-rendered in canonical
        // orientation.
        let outer_corner = Point::new(209.5, 0.5);
        assert!(!mirrored.eye_outer.contains(outer_corner));
        assert!(re_rendered.eye_outer.contains(outer_corner));
        // Both still put ring geometry at all three corners.
        for (x, y) in [(35.0, 5.0), (175.0, 5.0), (35.0, 145.0)] {
            assert!(re_rendered.eye_outer.contains(Point::new(x, y)));
        }
    }

    #[test]
    fn negation_swaps_roles_and_runs_no_off_generator() {
        // One dark data cell; everything else light.
        let matrix = BitMatrix::from_fn(21, |r, c| r == 10 && c == 10);
        let compositor = Compositor { negate_on_pixels: true, ..Default::default() };
        let paths = compositor.compose(&matrix, &ActiveShapes::default());
        assert!(paths.off_pixels.is_empty());
        // The single dark cell is now a hole.
        assert!(!paths.on_pixels.contains(Point::new(105.0, 105.0)));
        // Its neighbor, originally light, is painted.
        assert!(paths.on_pixels.contains(Point::new(115.0, 105.0)));
    }

    #[test]
    fn logo_mask_clears_a_hole_in_both_pixel_layers() {
        let matrix = BitMatrix::from_fn(21, |_, _| true);
        let shapes = ActiveShapes {
            off_pixels: Some(Box::new(PixelGenerator::new(PixelKind::Circle))),
            ..Default::default()
        };
        let compositor = Compositor {
            logo_mask: Some(LogoMask::centered_square(0.3, 1.0)),
            ..Default::default()
        };
        let paths = compositor.compose(&matrix, &shapes);
        let center = Point::new(105.0, 105.0);
        assert!(!paths.on_pixels.contains(center));
        assert!(!paths.off_pixels.contains(center));
        // Geometry survives outside the hole.
        assert!(paths.on_pixels.contains(Point::new(105.0, 15.0 * MODULE + 5.0)));
        // Eyes are untouched without the explicit opt-in.
        assert!(!paths.eye_outer.is_empty());
    }

    #[test]
    fn logo_mask_can_swallow_eyes_on_opt_in() {
        let matrix = finder_only_matrix();
        let mask =
            LogoMask { path: Path::rect(0.0, 0.0, 0.4, 0.4), inset: 0.0, applies_to_eyes: true };
        let compositor = Compositor { logo_mask: Some(mask), ..Default::default() };
        let paths = compositor.compose(&matrix, &ActiveShapes::default());
        // Top-left eye dropped, the other two remain.
        assert!(!paths.eye_outer.contains(Point::new(5.0, 5.0)));
        assert!(paths.eye_outer.contains(Point::new(205.0, 5.0)));
        assert!(paths.eye_outer.contains(Point::new(5.0, 205.0)));
    }

    #[test]
    fn empty_geometry_is_valid_not_an_error() {
        let matrix = BitMatrix::from_fn(21, |_, _| false);
        let paths = Compositor::default().compose(&matrix, &ActiveShapes::default());
        assert!(paths.on_pixels.is_empty());
        assert!(paths.off_pixels.is_empty());
        // Eyes are still placed; the locator layout is configuration, not
        // data.
        assert!(!paths.eye_outer.is_empty());
    }
}
