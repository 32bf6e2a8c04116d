//! Backend-agnostic vector paths.
//!
//! Every shape generator emits a [`Path`]: an ordered list of move / line /
//! cubic-curve / close instructions in its own local coordinate space. Paths
//! are composed by affine [`Transform`]s and by concatenation, and are only
//! bound to a concrete backend (SVG text, raster scanlines, PDF operators)
//! at render time. All numeric output uses Rust's `Display` formatting, so
//! serialized geometry is identical regardless of the process locale.

/// Circle-to-cubic approximation constant, `4/3 * (sqrt(2) - 1)`.
pub(crate) const KAPPA: f64 = 0.552_284_749_830_793_4;

/// Number of line segments a cubic curve flattens into. Fixed so that
/// flattening is deterministic across renders and backends.
const CURVE_SEGMENTS: usize = 16;

#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

/// One drawing instruction.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum PathElement {
    MoveTo(Point),
    LineTo(Point),
    CurveTo { control1: Point, control2: Point, to: Point },
    Close,
}

/// An affine map of the form `(x, y) -> (sx * x + tx, sy * y + ty)`.
///
/// Scales and translations compose; reflections are negative scales. This
/// covers everything the compositor needs (module placement, quiet-zone
/// insets and the mirrored eye corners) without a full 2x3 matrix.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Transform {
    pub sx: f64,
    pub sy: f64,
    pub tx: f64,
    pub ty: f64,
}

impl Transform {
    pub fn identity() -> Self {
        Transform { sx: 1.0, sy: 1.0, tx: 0.0, ty: 0.0 }
    }

    pub fn scale(s: f64) -> Self {
        Transform { sx: s, sy: s, tx: 0.0, ty: 0.0 }
    }

    pub fn translate(tx: f64, ty: f64) -> Self {
        Transform { sx: 1.0, sy: 1.0, tx, ty }
    }

    /// Reflects across the vertical line `x = axis`.
    pub fn flip_horizontal(axis: f64) -> Self {
        Transform { sx: -1.0, sy: 1.0, tx: 2.0 * axis, ty: 0.0 }
    }

    /// Reflects across the horizontal line `y = axis`.
    pub fn flip_vertical(axis: f64) -> Self {
        Transform { sx: 1.0, sy: -1.0, tx: 0.0, ty: 2.0 * axis }
    }

    pub fn apply(&self, p: Point) -> Point {
        Point::new(self.sx * p.x + self.tx, self.sy * p.y + self.ty)
    }

    /// Returns the transform equivalent to applying `self` first and
    /// `next` second.
    pub fn then(&self, next: &Transform) -> Transform {
        Transform {
            sx: next.sx * self.sx,
            sy: next.sy * self.sy,
            tx: next.sx * self.tx + next.tx,
            ty: next.sy * self.ty + next.ty,
        }
    }
}

/// An ordered sequence of drawing instructions. An empty path is a valid
/// "nothing to draw" value; no stage of the pipeline treats it as an error.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Path {
    elements: Vec<PathElement>,
}

impl Path {
    pub fn new() -> Self {
        Path::default()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn elements(&self) -> &[PathElement] {
        &self.elements
    }

    pub fn move_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.elements.push(PathElement::MoveTo(Point::new(x, y)));
        self
    }

    pub fn line_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.elements.push(PathElement::LineTo(Point::new(x, y)));
        self
    }

    pub fn curve_to(&mut self, c1x: f64, c1y: f64, c2x: f64, c2y: f64, x: f64, y: f64) -> &mut Self {
        self.elements.push(PathElement::CurveTo {
            control1: Point::new(c1x, c1y),
            control2: Point::new(c2x, c2y),
            to: Point::new(x, y),
        });
        self
    }

    pub fn close(&mut self) -> &mut Self {
        self.elements.push(PathElement::Close);
        self
    }

    /// An axis-aligned rectangle subpath.
    pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Path {
        let mut p = Path::new();
        p.move_to(x, y)
            .line_to(x + width, y)
            .line_to(x + width, y + height)
            .line_to(x, y + height)
            .close();
        p
    }

    /// A rectangle with per-corner radii `[top_left, top_right,
    /// bottom_right, bottom_left]`, each clamped to half the shorter side.
    /// Corners with radius zero stay square, so one call covers the whole
    /// square-to-circle range the pixel shapes need.
    pub fn rounded_rect(x: f64, y: f64, width: f64, height: f64, radii: [f64; 4]) -> Path {
        let max = 0.5 * width.min(height);
        let [tl, tr, br, bl] = radii.map(|r| r.clamp(0.0, max));
        if tl == 0.0 && tr == 0.0 && br == 0.0 && bl == 0.0 {
            return Path::rect(x, y, width, height);
        }
        let (x1, y1) = (x + width, y + height);
        let mut p = Path::new();
        p.move_to(x + tl, y);
        p.line_to(x1 - tr, y);
        if tr > 0.0 {
            p.curve_to(x1 - tr + KAPPA * tr, y, x1, y + tr - KAPPA * tr, x1, y + tr);
        }
        p.line_to(x1, y1 - br);
        if br > 0.0 {
            p.curve_to(x1, y1 - br + KAPPA * br, x1 - br + KAPPA * br, y1, x1 - br, y1);
        }
        p.line_to(x + bl, y1);
        if bl > 0.0 {
            p.curve_to(x + bl - KAPPA * bl, y1, x, y1 - bl + KAPPA * bl, x, y1 - bl);
        }
        p.line_to(x, y + tl);
        if tl > 0.0 {
            p.curve_to(x, y + tl - KAPPA * tl, x + tl - KAPPA * tl, y, x + tl, y);
        }
        p.close();
        p
    }

    /// A circle as four cubic arcs.
    pub fn circle(cx: f64, cy: f64, radius: f64) -> Path {
        let r = radius;
        let k = KAPPA * r;
        let mut p = Path::new();
        p.move_to(cx + r, cy)
            .curve_to(cx + r, cy + k, cx + k, cy + r, cx, cy + r)
            .curve_to(cx - k, cy + r, cx - r, cy + k, cx - r, cy)
            .curve_to(cx - r, cy - k, cx - k, cy - r, cx, cy - r)
            .curve_to(cx + k, cy - r, cx + r, cy - k, cx + r, cy)
            .close();
        p
    }

    /// Appends all subpaths of `other` (path union by concatenation).
    pub fn append(&mut self, other: &Path) {
        self.elements.extend_from_slice(&other.elements);
    }

    /// Returns the path with `t` applied to every coordinate.
    pub fn transformed(&self, t: &Transform) -> Path {
        let elements = self
            .elements
            .iter()
            .map(|e| match *e {
                PathElement::MoveTo(p) => PathElement::MoveTo(t.apply(p)),
                PathElement::LineTo(p) => PathElement::LineTo(t.apply(p)),
                PathElement::CurveTo { control1, control2, to } => PathElement::CurveTo {
                    control1: t.apply(control1),
                    control2: t.apply(control2),
                    to: t.apply(to),
                },
                PathElement::Close => PathElement::Close,
            })
            .collect();
        Path { elements }
    }

    /// The tight bounding box over all control points, or `None` for an
    /// empty path. Control points of cubics may lie slightly outside the
    /// drawn curve; for module geometry this bound is exact enough.
    pub fn bounding_box(&self) -> Option<(Point, Point)> {
        let mut min = Point::new(f64::INFINITY, f64::INFINITY);
        let mut max = Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        let mut any = false;
        let mut grow = |p: Point| {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        };
        for e in &self.elements {
            match *e {
                PathElement::MoveTo(p) | PathElement::LineTo(p) => {
                    grow(p);
                    any = true;
                }
                PathElement::CurveTo { control1, control2, to } => {
                    grow(control1);
                    grow(control2);
                    grow(to);
                    any = true;
                }
                PathElement::Close => {}
            }
        }
        any.then_some((min, max))
    }

    /// Flattens the path into closed polygons, subdividing every cubic into
    /// [`CURVE_SEGMENTS`] chords. Open subpaths are closed implicitly, the
    /// same way an even-odd fill treats them.
    pub fn flatten(&self) -> Vec<Vec<Point>> {
        let mut polygons = Vec::new();
        let mut current: Vec<Point> = Vec::new();
        let mut cursor = Point::default();
        for e in &self.elements {
            match *e {
                PathElement::MoveTo(p) => {
                    if current.len() > 2 {
                        polygons.push(std::mem::take(&mut current));
                    } else {
                        current.clear();
                    }
                    current.push(p);
                    cursor = p;
                }
                PathElement::LineTo(p) => {
                    current.push(p);
                    cursor = p;
                }
                PathElement::CurveTo { control1, control2, to } => {
                    for i in 1..=CURVE_SEGMENTS {
                        let t = i as f64 / CURVE_SEGMENTS as f64;
                        current.push(cubic_at(cursor, control1, control2, to, t));
                    }
                    cursor = to;
                }
                PathElement::Close => {
                    if current.len() > 2 {
                        polygons.push(std::mem::take(&mut current));
                    } else {
                        current.clear();
                    }
                }
            }
        }
        if current.len() > 2 {
            polygons.push(current);
        }
        polygons
    }

    /// Even-odd containment test against the flattened outline.
    pub fn contains(&self, p: Point) -> bool {
        let mut inside = false;
        for poly in self.flatten() {
            let mut j = poly.len() - 1;
            for i in 0..poly.len() {
                let (a, b) = (poly[i], poly[j]);
                if (a.y > p.y) != (b.y > p.y) {
                    let x = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
                    if p.x < x {
                        inside = !inside;
                    }
                }
                j = i;
            }
        }
        inside
    }

    /// Distance from `p` to the nearest point of the flattened outline.
    /// Used to grow logo masks by their inset without polygon offsetting.
    pub fn distance_to_outline(&self, p: Point) -> f64 {
        let mut best = f64::INFINITY;
        for poly in self.flatten() {
            let mut j = poly.len() - 1;
            for i in 0..poly.len() {
                best = best.min(segment_distance(p, poly[j], poly[i]));
                j = i;
            }
        }
        best
    }

    /// Serializes the path as SVG path data. Output is locale-independent:
    /// numbers always use `.` as the decimal separator.
    pub fn to_svg_data(&self) -> String {
        let mut d = String::new();
        for e in &self.elements {
            if !d.is_empty() {
                d.push(' ');
            }
            match *e {
                PathElement::MoveTo(p) => {
                    d.push_str(&format!("M{},{}", fmt_num(p.x), fmt_num(p.y)));
                }
                PathElement::LineTo(p) => {
                    d.push_str(&format!("L{},{}", fmt_num(p.x), fmt_num(p.y)));
                }
                PathElement::CurveTo { control1, control2, to } => {
                    d.push_str(&format!(
                        "C{},{} {},{} {},{}",
                        fmt_num(control1.x),
                        fmt_num(control1.y),
                        fmt_num(control2.x),
                        fmt_num(control2.y),
                        fmt_num(to.x),
                        fmt_num(to.y)
                    ));
                }
                PathElement::Close => d.push('Z'),
            }
        }
        d
    }
}

/// Formats a coordinate with at most three fractional digits and no
/// trailing zeros. Three digits keep sub-module detail at 10-unit cells
/// while keeping exported documents compact and byte-stable.
pub(crate) fn fmt_num(v: f64) -> String {
    let rounded = (v * 1000.0).round() / 1000.0;
    let mut s = format!("{:.3}", rounded);
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s
}

fn cubic_at(p0: Point, p1: Point, p2: Point, p3: Point, t: f64) -> Point {
    let u = 1.0 - t;
    let (a, b, c, d) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
    Point::new(
        a * p0.x + b * p1.x + c * p2.x + d * p3.x,
        a * p0.y + b * p1.y + c * p2.y + d * p3.y,
    )
}

fn segment_distance(p: Point, a: Point, b: Point) -> f64 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len2 = dx * dx + dy * dy;
    let t = if len2 == 0.0 {
        0.0
    } else {
        (((p.x - a.x) * dx + (p.y - a.y) * dy) / len2).clamp(0.0, 1.0)
    };
    let (cx, cy) = (a.x + t * dx, a.y + t * dy);
    ((p.x - cx).powi(2) + (p.y - cy).powi(2)).sqrt()
}
