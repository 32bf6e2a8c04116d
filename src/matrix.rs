//! The boolean module grid and its derived topology queries.
//!
//! A [`BitMatrix`] is produced once by a QR engine (true = dark module) and is
//! immutable afterwards. [`Topology`] answers the per-cell questions shape
//! generators care about: which neighbors are dark, and whether a cell lies
//! inside one of the three fixed locator ("eye") regions.

/// Side length, in modules, of the three locator regions anchored at the
/// top-left, top-right and bottom-left corners of every QR matrix. This is
/// the 7x7 finder pattern plus its one-module separator.
pub const EYE_ZONE: usize = 9;

/// An immutable square grid of dark/light modules.
///
/// Row-major storage, `dimension * dimension` cells. Valid QR matrices are
/// between 21x21 and 177x177 modules, but the type itself only requires a
/// positive dimension.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct BitMatrix {
    dimension: usize,
    cells: Vec<bool>,
}

impl BitMatrix {
    /// Creates a matrix from row-major cells.
    ///
    /// # Panics
    ///
    /// Panics if `dimension` is zero or `cells.len() != dimension * dimension`.
    pub fn from_cells(dimension: usize, cells: Vec<bool>) -> Self {
        assert!(dimension > 0, "dimension must be positive");
        assert_eq!(cells.len(), dimension * dimension, "cell count must match dimension");
        BitMatrix { dimension, cells }
    }

    /// Creates a matrix by evaluating `f(row, col)` for every cell.
    pub fn from_fn(dimension: usize, mut f: impl FnMut(usize, usize) -> bool) -> Self {
        assert!(dimension > 0, "dimension must be positive");
        let mut cells = Vec::with_capacity(dimension * dimension);
        for row in 0..dimension {
            for col in 0..dimension {
                cells.push(f(row, col));
            }
        }
        BitMatrix { dimension, cells }
    }

    /// The side length in modules.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Returns the cell at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if either coordinate is out of bounds.
    pub fn get(&self, row: usize, col: usize) -> bool {
        assert!(row < self.dimension && col < self.dimension, "coordinates out of bounds");
        self.cells[row * self.dimension + col]
    }

    /// Returns the cell at `(row, col)`, treating any out-of-bounds
    /// coordinate as a light module. Neighbor queries at the matrix edge
    /// rely on this: there is no wrapping and no reflection.
    pub fn module(&self, row: i32, col: i32) -> bool {
        if row < 0 || col < 0 {
            return false;
        }
        let (row, col) = (row as usize, col as usize);
        if row >= self.dimension || col >= self.dimension {
            return false;
        }
        self.cells[row * self.dimension + col]
    }

    /// Returns a matrix with every cell inverted. Used by the
    /// negated-pixels composition mode, where a single generator paints
    /// what would otherwise be the background.
    pub fn negated(&self) -> BitMatrix {
        BitMatrix {
            dimension: self.dimension,
            cells: self.cells.iter().map(|c| !c).collect(),
        }
    }

    /// Counts the dark modules.
    pub fn count_dark(&self) -> usize {
        self.cells.iter().filter(|c| **c).count()
    }

    /// Renders the matrix as console-friendly ASCII art, each module two
    /// characters wide, surrounded by `border` modules of quiet zone.
    pub fn to_console_string(&self, border: usize) -> String {
        let b = border as i32;
        let dim = self.dimension as i32;
        let mut out = String::new();
        for row in -b..dim + b {
            for col in -b..dim + b {
                let c = if self.module(row, col) { '\u{2588}' } else { ' ' };
                out.push(c);
                out.push(c);
            }
            out.push('\n');
        }
        out
    }

    /// A fixed 7x7 pattern used to render catalog thumbnails of shape
    /// generators. Deliberately mixes isolated cells, straight runs and a
    /// 2x2 block so neighbor-aware generators show their full repertoire.
    pub fn sample() -> BitMatrix {
        const PATTERN: [[u8; 7]; 7] = [
            [1, 1, 0, 1, 0, 0, 1],
            [1, 1, 0, 0, 1, 0, 0],
            [0, 0, 1, 1, 0, 0, 1],
            [1, 0, 1, 1, 1, 0, 0],
            [0, 1, 0, 1, 0, 1, 0],
            [0, 0, 0, 0, 1, 1, 1],
            [1, 0, 1, 0, 0, 1, 1],
        ];
        BitMatrix::from_fn(7, |row, col| PATTERN[row][col] != 0)
    }
}

/// The neighbor flags of one cell, each `false` past the matrix edge.
///
/// `leading` is towards lower column indices (the left in the usual
/// orientation), `trailing` towards higher ones.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Neighbors {
    pub top: bool,
    pub bottom: bool,
    pub leading: bool,
    pub trailing: bool,
    pub top_leading: bool,
    pub top_trailing: bool,
    pub bottom_leading: bool,
    pub bottom_trailing: bool,
}

impl Neighbors {
    /// Packs the four edge-adjacent flags into a 0..16 index
    /// (top = 1, trailing = 2, bottom = 4, leading = 8), the key used by
    /// neighbor-driven template tables.
    pub fn edge_pattern(&self) -> usize {
        (self.top as usize)
            | (self.trailing as usize) << 1
            | (self.bottom as usize) << 2
            | (self.leading as usize) << 3
    }
}

/// Derived per-cell queries over a [`BitMatrix`].
///
/// A `Topology` is a pure view: constructing one is free and two topologies
/// over equal matrices answer every query identically.
#[derive(Clone, Copy)]
pub struct Topology<'a> {
    matrix: &'a BitMatrix,
}

impl<'a> Topology<'a> {
    pub fn new(matrix: &'a BitMatrix) -> Self {
        Topology { matrix }
    }

    pub fn matrix(&self) -> &'a BitMatrix {
        self.matrix
    }

    /// The 8-connected neighbor flags of `(row, col)`.
    pub fn neighbors(&self, row: usize, col: usize) -> Neighbors {
        let (r, c) = (row as i32, col as i32);
        let m = self.matrix;
        Neighbors {
            top: m.module(r - 1, c),
            bottom: m.module(r + 1, c),
            leading: m.module(r, c - 1),
            trailing: m.module(r, c + 1),
            top_leading: m.module(r - 1, c - 1),
            top_trailing: m.module(r - 1, c + 1),
            bottom_leading: m.module(r + 1, c - 1),
            bottom_trailing: m.module(r + 1, c + 1),
        }
    }

    /// True iff `(row, col)` lies inside one of the three 9x9 locator
    /// regions: top-left, top-right and bottom-left (never bottom-right).
    /// The trailing bound is inclusive (`col >= dimension - 9`), so each
    /// region is exactly [`EYE_ZONE`] modules on a side.
    pub fn is_eye_pixel(&self, row: usize, col: usize) -> bool {
        let dim = self.matrix.dimension();
        if dim < EYE_ZONE {
            return false;
        }
        let far = dim - EYE_ZONE;
        (row < EYE_ZONE && col < EYE_ZONE)
            || (row < EYE_ZONE && col >= far)
            || (row >= far && col < EYE_ZONE)
    }
}
