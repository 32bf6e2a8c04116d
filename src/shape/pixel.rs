//! Built-in module ("pixel") shape generators.
//!
//! One parameterized generator covers the whole family; [`PixelKind`] picks
//! the style. Each instance pre-builds its 16 local templates (one per
//! corner-rounding mask) in the 10x10 unit cell at construction and after
//! every setting change, so rendering a cell is a table lookup plus a
//! translation. Every 4-neighbor combination maps to a template; the
//! fallback is always the unmodified unit square, never an empty path.

use crate::matrix::{Neighbors, Topology};
use crate::path::{Path, Transform};
use crate::settings::{SettingsValue, ShapeSettings};

use super::{PixelRegion, PixelShape, MODULE};

const CORNER_TL: usize = 1;
const CORNER_TR: usize = 2;
const CORNER_BR: usize = 4;
const CORNER_BL: usize = 8;

/// The built-in pixel styles.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PixelKind {
    /// Plain unit squares.
    Square,
    /// One dot per module, ignoring neighbors.
    Circle,
    /// Uniformly rounded squares, ignoring neighbors.
    Rounded,
    /// Superellipse per module.
    Squircle,
    /// Vertical bars with rounded caps where no vertical neighbor exists.
    Vertical,
    /// Horizontal bars with rounded caps where no horizontal neighbor exists.
    Horizontal,
    /// Neighbor-driven rounding: corners round only where the adjacent
    /// cells (and optionally the diagonal) are light.
    Connected,
    /// Squares shrunk towards the cell center, optionally rounded.
    Inset,
}

impl PixelKind {
    pub const ALL: [PixelKind; 8] = [
        PixelKind::Square,
        PixelKind::Circle,
        PixelKind::Rounded,
        PixelKind::Squircle,
        PixelKind::Vertical,
        PixelKind::Horizontal,
        PixelKind::Connected,
        PixelKind::Inset,
    ];
}

/// The shared pixel-flavor generator. Configuration is immutable during
/// rendering; `set_setting` rebuilds the template table before returning.
#[derive(Clone)]
pub struct PixelGenerator {
    kind: PixelKind,
    corner_radius_fraction: f64,
    size_fraction: f64,
    inset_fraction: f64,
    curvature_fraction: f64,
    use_diagonals: bool,
    templates: Vec<Path>,
}

impl PixelGenerator {
    pub fn new(kind: PixelKind) -> Self {
        Self::create(kind, &ShapeSettings::default())
    }

    /// Constructs a generator from persisted parameters. Unknown keys are
    /// ignored, missing keys fall back to the kind's defaults, and
    /// fractional values are clamped to `[0, 1]`.
    pub fn create(kind: PixelKind, settings: &ShapeSettings) -> Self {
        let default_radius = match kind {
            PixelKind::Rounded => 0.5,
            PixelKind::Connected => 1.0,
            _ => 0.0,
        };
        let default_size = match kind {
            PixelKind::Vertical | PixelKind::Horizontal => 0.8,
            _ => 1.0,
        };
        let default_inset = if kind == PixelKind::Inset { 0.3 } else { 0.0 };
        let mut generator = PixelGenerator {
            kind,
            corner_radius_fraction: settings.fraction_or("corner_radius_fraction", default_radius),
            size_fraction: settings.fraction_or("size_fraction", default_size),
            inset_fraction: settings.fraction_or("inset_fraction", default_inset),
            curvature_fraction: settings.fraction_or("curvature_fraction", 0.9),
            use_diagonals: settings.bool_or("use_diagonals", false),
            templates: Vec::new(),
        };
        generator.recompute();
        generator
    }

    pub fn kind(&self) -> PixelKind {
        self.kind
    }

    /// The setting keys this kind honors.
    fn keys(&self) -> &'static [&'static str] {
        match self.kind {
            PixelKind::Square => &[],
            PixelKind::Circle => &["size_fraction"],
            PixelKind::Rounded => &["corner_radius_fraction"],
            PixelKind::Squircle => &["curvature_fraction"],
            PixelKind::Vertical | PixelKind::Horizontal => &["size_fraction"],
            PixelKind::Connected => &["corner_radius_fraction", "use_diagonals"],
            PixelKind::Inset => &["inset_fraction", "corner_radius_fraction"],
        }
    }

    /// Rebuilds the 16-entry template table. Index bits: 1 = round
    /// top-left, 2 = top-right, 4 = bottom-right, 8 = bottom-left.
    fn recompute(&mut self) {
        self.templates = (0..16).map(|mask| self.build_template(mask)).collect();
    }

    fn build_template(&self, mask: usize) -> Path {
        let radius = |bit: usize, r: f64| if mask & bit != 0 { r } else { 0.0 };
        match self.kind {
            PixelKind::Square => Path::rect(0.0, 0.0, MODULE, MODULE),
            PixelKind::Circle => {
                Path::circle(MODULE / 2.0, MODULE / 2.0, self.size_fraction * MODULE / 2.0)
            }
            PixelKind::Rounded => {
                let r = self.corner_radius_fraction * MODULE / 2.0;
                Path::rounded_rect(0.0, 0.0, MODULE, MODULE, [r; 4])
            }
            PixelKind::Squircle => squircle(self.curvature_fraction),
            PixelKind::Vertical => {
                let width = self.size_fraction * MODULE;
                let x = (MODULE - width) / 2.0;
                let r = width / 2.0;
                let radii = [
                    radius(CORNER_TL, r),
                    radius(CORNER_TR, r),
                    radius(CORNER_BR, r),
                    radius(CORNER_BL, r),
                ];
                Path::rounded_rect(x, 0.0, width, MODULE, radii)
            }
            PixelKind::Horizontal => {
                let height = self.size_fraction * MODULE;
                let y = (MODULE - height) / 2.0;
                let r = height / 2.0;
                let radii = [
                    radius(CORNER_TL, r),
                    radius(CORNER_TR, r),
                    radius(CORNER_BR, r),
                    radius(CORNER_BL, r),
                ];
                Path::rounded_rect(0.0, y, MODULE, height, radii)
            }
            PixelKind::Connected => {
                let r = self.corner_radius_fraction * MODULE / 2.0;
                let radii = [
                    radius(CORNER_TL, r),
                    radius(CORNER_TR, r),
                    radius(CORNER_BR, r),
                    radius(CORNER_BL, r),
                ];
                Path::rounded_rect(0.0, 0.0, MODULE, MODULE, radii)
            }
            PixelKind::Inset => {
                let inset = self.inset_fraction * MODULE / 4.0;
                let side = MODULE - 2.0 * inset;
                let r = self.corner_radius_fraction * side / 2.0;
                Path::rounded_rect(inset, inset, side, side, [r; 4])
            }
        }
    }

    /// Maps a cell's neighbor flags to the template index for this kind.
    fn corner_mask(&self, n: &Neighbors) -> usize {
        match self.kind {
            PixelKind::Square
            | PixelKind::Circle
            | PixelKind::Rounded
            | PixelKind::Squircle
            | PixelKind::Inset => 0,
            PixelKind::Vertical => {
                let mut mask = 0;
                if !n.top {
                    mask |= CORNER_TL | CORNER_TR;
                }
                if !n.bottom {
                    mask |= CORNER_BL | CORNER_BR;
                }
                mask
            }
            PixelKind::Horizontal => {
                let mut mask = 0;
                if !n.leading {
                    mask |= CORNER_TL | CORNER_BL;
                }
                if !n.trailing {
                    mask |= CORNER_TR | CORNER_BR;
                }
                mask
            }
            PixelKind::Connected => {
                let diag = self.use_diagonals;
                let mut mask = 0;
                if !n.top && !n.leading && !(diag && n.top_leading) {
                    mask |= CORNER_TL;
                }
                if !n.top && !n.trailing && !(diag && n.top_trailing) {
                    mask |= CORNER_TR;
                }
                if !n.bottom && !n.trailing && !(diag && n.bottom_trailing) {
                    mask |= CORNER_BR;
                }
                if !n.bottom && !n.leading && !(diag && n.bottom_leading) {
                    mask |= CORNER_BL;
                }
                mask
            }
        }
    }
}

/// Neighbor flags restricted to cells the generator will actually draw:
/// in data-only mode a dark locator-zone cell does not count as a
/// neighbor, so data cells bordering an eye keep their rounded edge.
fn region_neighbors(topology: &Topology<'_>, row: usize, col: usize, region: PixelRegion) -> Neighbors {
    let n = topology.neighbors(row, col);
    if region == PixelRegion::IncludeEyes {
        return n;
    }
    let drawn = |dr: i32, dc: i32| {
        let (r, c) = (row as i32 + dr, col as i32 + dc);
        if r < 0 || c < 0 {
            return false;
        }
        let (r, c) = (r as usize, c as usize);
        if r >= topology.matrix().dimension() || c >= topology.matrix().dimension() {
            return false;
        }
        !topology.is_eye_pixel(r, c)
    };
    Neighbors {
        top: n.top && drawn(-1, 0),
        bottom: n.bottom && drawn(1, 0),
        leading: n.leading && drawn(0, -1),
        trailing: n.trailing && drawn(0, 1),
        top_leading: n.top_leading && drawn(-1, -1),
        top_trailing: n.top_trailing && drawn(-1, 1),
        bottom_leading: n.bottom_leading && drawn(1, -1),
        bottom_trailing: n.bottom_trailing && drawn(1, 1),
    }
}

impl PixelShape for PixelGenerator {
    fn name(&self) -> &'static str {
        match self.kind {
            PixelKind::Square => "square",
            PixelKind::Circle => "circle",
            PixelKind::Rounded => "rounded",
            PixelKind::Squircle => "squircle",
            PixelKind::Vertical => "vertical",
            PixelKind::Horizontal => "horizontal",
            PixelKind::Connected => "connected",
            PixelKind::Inset => "inset",
        }
    }

    fn title(&self) -> &'static str {
        match self.kind {
            PixelKind::Square => "Square",
            PixelKind::Circle => "Circle",
            PixelKind::Rounded => "Rounded",
            PixelKind::Squircle => "Squircle",
            PixelKind::Vertical => "Vertical bars",
            PixelKind::Horizontal => "Horizontal bars",
            PixelKind::Connected => "Connected",
            PixelKind::Inset => "Inset",
        }
    }

    fn can_generate_eye_and_pupil_shapes(&self) -> bool {
        // Dotted and shrunken styles leave gaps that make poor locators.
        !matches!(self.kind, PixelKind::Circle | PixelKind::Inset)
    }

    fn generate_path(&self, topology: &Topology<'_>, region: PixelRegion) -> Path {
        let matrix = topology.matrix();
        let mut path = Path::new();
        for row in 0..matrix.dimension() {
            for col in 0..matrix.dimension() {
                if !matrix.get(row, col) {
                    continue;
                }
                if region == PixelRegion::DataOnly && topology.is_eye_pixel(row, col) {
                    continue;
                }
                let neighbors = region_neighbors(topology, row, col, region);
                let template = &self.templates[self.corner_mask(&neighbors)];
                let place = Transform::translate(col as f64 * MODULE, row as f64 * MODULE);
                path.append(&template.transformed(&place));
            }
        }
        path
    }

    fn supports_setting(&self, key: &str) -> bool {
        self.keys().contains(&key)
    }

    fn set_setting(&mut self, key: &str, value: &SettingsValue) -> bool {
        if !self.supports_setting(key) {
            return false;
        }
        let applied = match key {
            "corner_radius_fraction" => value
                .as_number()
                .map(|v| self.corner_radius_fraction = v.clamp(0.0, 1.0))
                .is_some(),
            "size_fraction" => value
                .as_number()
                .map(|v| self.size_fraction = v.clamp(0.0, 1.0))
                .is_some(),
            "inset_fraction" => value
                .as_number()
                .map(|v| self.inset_fraction = v.clamp(0.0, 1.0))
                .is_some(),
            "curvature_fraction" => value
                .as_number()
                .map(|v| self.curvature_fraction = v.clamp(0.0, 1.0))
                .is_some(),
            "use_diagonals" => value.as_bool().map(|v| self.use_diagonals = v).is_some(),
            _ => false,
        };
        if applied {
            self.recompute();
        }
        applied
    }

    fn settings(&self) -> ShapeSettings {
        let mut settings = ShapeSettings::new(self.name());
        for key in self.keys() {
            match *key {
                "corner_radius_fraction" => settings.set(key, self.corner_radius_fraction),
                "size_fraction" => settings.set(key, self.size_fraction),
                "inset_fraction" => settings.set(key, self.inset_fraction),
                "curvature_fraction" => settings.set(key, self.curvature_fraction),
                "use_diagonals" => settings.set(key, self.use_diagonals),
                _ => {}
            }
        }
        settings
    }

    fn boxed_clone(&self) -> Box<dyn PixelShape> {
        Box::new(self.clone())
    }
}

/// A full-cell superellipse. `curvature` pulls the cubic control points
/// towards the corners: low values approach a circle, high values a square.
fn squircle(curvature: f64) -> Path {
    let half = MODULE / 2.0;
    let k = curvature * half;
    let (c, m) = (half, MODULE);
    let mut p = Path::new();
    p.move_to(c, 0.0)
        .curve_to(c + k, 0.0, m, c - k, m, c)
        .curve_to(m, c + k, c + k, m, c, m)
        .curve_to(c - k, m, 0.0, c + k, 0.0, c)
        .curve_to(0.0, c - k, c - k, 0.0, c, 0.0)
        .close();
    p
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::BitMatrix;
    use crate::path::Point;

    fn single_cell_matrix() -> BitMatrix {
        BitMatrix::from_fn(3, |r, c| r == 1 && c == 1)
    }

    #[test]
    fn every_kind_renders_an_isolated_cell() {
        let matrix = single_cell_matrix();
        let topo = Topology::new(&matrix);
        for kind in PixelKind::ALL {
            let g = PixelGenerator::new(kind);
            let path = g.generate_path(&topo, PixelRegion::DataOnly);
            assert!(!path.is_empty(), "{:?} drew nothing", kind);
            let (min, max) = path.bounding_box().unwrap();
            assert!(min.x >= MODULE - 1e-9 && max.x <= 2.0 * MODULE + 1e-9);
            assert!(min.y >= MODULE - 1e-9 && max.y <= 2.0 * MODULE + 1e-9);
        }
    }

    #[test]
    fn all_sixteen_neighbor_patterns_produce_a_template() {
        for kind in PixelKind::ALL {
            let g = PixelGenerator::new(kind);
            for bits in 0..16u8 {
                let n = Neighbors {
                    top: bits & 1 != 0,
                    trailing: bits & 2 != 0,
                    bottom: bits & 4 != 0,
                    leading: bits & 8 != 0,
                    ..Neighbors::default()
                };
                let template = &g.templates[g.corner_mask(&n)];
                assert!(!template.is_empty(), "{:?} pattern {:04b} empty", kind, bits);
            }
        }
    }

    #[test]
    fn connected_rounds_only_free_corners() {
        // Two horizontally adjacent cells: the shared edge stays square.
        let matrix = BitMatrix::from_fn(3, |r, c| r == 1 && (c == 0 || c == 1));
        let topo = Topology::new(&matrix);
        let g = PixelGenerator::create(
            PixelKind::Connected,
            &ShapeSettings::new("connected").with("corner_radius_fraction", 1.0),
        );
        let path = g.generate_path(&topo, PixelRegion::DataOnly);
        // Next to the seam the left cell stays square (no rounding carved
        // the shared edge away).
        assert!(path.contains(Point::new(9.9, 10.4)));
        // The free outer corner of the left cell is rounded away.
        assert!(!path.contains(Point::new(0.4, 10.4)));
    }

    #[test]
    fn isolated_cell_with_full_rounding_is_circular() {
        let matrix = single_cell_matrix();
        let topo = Topology::new(&matrix);
        let g = PixelGenerator::create(
            PixelKind::Connected,
            &ShapeSettings::new("connected").with("corner_radius_fraction", 1.0),
        );
        let path = g.generate_path(&topo, PixelRegion::DataOnly);
        // Center covered, all four cell corners empty: the isolated
        // template is the fully rounded shape, not a square.
        assert!(path.contains(Point::new(15.0, 15.0)));
        for (x, y) in [(10.3, 10.3), (19.7, 10.3), (10.3, 19.7), (19.7, 19.7)] {
            assert!(!path.contains(Point::new(x, y)), "corner ({x},{y}) should be rounded off");
        }
    }

    #[test]
    fn generation_is_deterministic() {
        let matrix = BitMatrix::sample();
        let topo = Topology::new(&matrix);
        let g = PixelGenerator::new(PixelKind::Connected);
        let a = g.generate_path(&topo, PixelRegion::DataOnly);
        let b = g.generate_path(&topo, PixelRegion::DataOnly);
        assert_eq!(a, b);
    }

    #[test]
    fn data_only_mode_skips_eye_cells() {
        let matrix = BitMatrix::from_fn(21, |_, _| true);
        let topo = Topology::new(&matrix);
        let g = PixelGenerator::new(PixelKind::Square);
        let path = g.generate_path(&topo, PixelRegion::DataOnly);
        // Cell (0, 0) sits in the top-left locator zone.
        assert!(!path.contains(Point::new(5.0, 5.0)));
        // Cell (10, 10) is plain data.
        assert!(path.contains(Point::new(105.0, 105.0)));
        let with_eyes = g.generate_path(&topo, PixelRegion::IncludeEyes);
        assert!(with_eyes.contains(Point::new(5.0, 5.0)));
    }

    #[test]
    fn settings_apply_clamp_and_round_trip() {
        let mut g = PixelGenerator::new(PixelKind::Rounded);
        assert!(g.supports_setting("corner_radius_fraction"));
        assert!(!g.supports_setting("size_fraction"));
        assert!(!g.set_setting("size_fraction", &SettingsValue::Number(0.5)));
        assert!(g.set_setting("corner_radius_fraction", &SettingsValue::Number(7.0)));
        assert_eq!(g.settings().fraction_or("corner_radius_fraction", 0.0), 1.0);

        let rebuilt = PixelGenerator::create(PixelKind::Rounded, &g.settings());
        let matrix = BitMatrix::sample();
        let topo = Topology::new(&matrix);
        assert_eq!(
            g.generate_path(&topo, PixelRegion::DataOnly),
            rebuilt.generate_path(&topo, PixelRegion::DataOnly)
        );
    }

    #[test]
    fn set_setting_rebuilds_templates() {
        let matrix = single_cell_matrix();
        let topo = Topology::new(&matrix);
        let mut g = PixelGenerator::new(PixelKind::Rounded);
        let before = g.generate_path(&topo, PixelRegion::DataOnly);
        g.set_setting("corner_radius_fraction", &SettingsValue::Number(1.0));
        let after = g.generate_path(&topo, PixelRegion::DataOnly);
        assert_ne!(before, after);
    }

    #[test]
    fn capability_flag_matches_kind() {
        assert!(PixelGenerator::new(PixelKind::Square).can_generate_eye_and_pupil_shapes());
        assert!(PixelGenerator::new(PixelKind::Connected).can_generate_eye_and_pupil_shapes());
        assert!(!PixelGenerator::new(PixelKind::Circle).can_generate_eye_and_pupil_shapes());
        assert!(!PixelGenerator::new(PixelKind::Inset).can_generate_eye_and_pupil_shapes());
    }
}
