//! Minimal single-page PDF output.
//!
//! Emits one content stream of path-construction and even-odd fill
//! operators, mirroring the geometry the other backends consume. This is
//! deliberately not a general PDF writer: gradients, image fills and
//! shadows resolve to their fallback solid colors, and transparency is
//! dropped. Module coverage still matches the raster and SVG backends
//! exactly, which is the contract that matters for scannability.

use crate::compose::ComponentPaths;
use crate::path::{fmt_num, Path, PathElement, Point};
use crate::style::{Color, StyleBinding};

use super::{Artifact, Renderer, Result};

pub struct PdfRenderer;

impl PdfRenderer {
    pub fn new() -> Self {
        PdfRenderer
    }
}

impl Default for PdfRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for PdfRenderer {
    fn render(&self, paths: &ComponentPaths, style: &StyleBinding, size: u32) -> Result<Artifact> {
        let span = paths.span_units;
        let scale = if span > 0.0 { size as f64 / span } else { 0.0 };
        let page = size as f64;

        let mut content = String::new();
        if size > 0 {
            set_fill_color(&mut content, style.background.fallback_color());
            content += &format!("0 0 {0} {0} re\nf\n", fmt_num(page));
            for (component, path) in paths.iter_draw_order() {
                if path.is_empty() {
                    continue;
                }
                let color = style.for_component(component).fill.fallback_color();
                set_fill_color(&mut content, color);
                write_path_ops(&mut content, path, scale, page);
                content += "f*\n";
            }
        }

        Ok(Artifact::Pdf(assemble_document(&content, size)))
    }
}

fn set_fill_color(out: &mut String, color: Color) {
    let component = |v: u8| fmt_num(v as f64 / 255.0);
    *out += &format!("{} {} {} rg\n", component(color.r), component(color.g), component(color.b));
}

/// Emits `m`/`l`/`c`/`h` operators for a path, converting from the
/// compositor's y-down unit space to PDF's y-up page space.
fn write_path_ops(out: &mut String, path: &Path, scale: f64, page: f64) {
    let map = |p: Point| (p.x * scale, page - p.y * scale);
    for element in path.elements() {
        match *element {
            PathElement::MoveTo(p) => {
                let (x, y) = map(p);
                *out += &format!("{} {} m\n", fmt_num(x), fmt_num(y));
            }
            PathElement::LineTo(p) => {
                let (x, y) = map(p);
                *out += &format!("{} {} l\n", fmt_num(x), fmt_num(y));
            }
            PathElement::CurveTo { control1, control2, to } => {
                let (x1, y1) = map(control1);
                let (x2, y2) = map(control2);
                let (x3, y3) = map(to);
                *out += &format!(
                    "{} {} {} {} {} {} c\n",
                    fmt_num(x1),
                    fmt_num(y1),
                    fmt_num(x2),
                    fmt_num(y2),
                    fmt_num(x3),
                    fmt_num(y3)
                );
            }
            PathElement::Close => *out += "h\n",
        }
    }
}

/// Wraps a content stream in the fixed four-object document skeleton:
/// catalog, page tree, page, contents.
fn assemble_document(content: &str, size: u32) -> Vec<u8> {
    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {0} {0}] /Contents 4 0 R /Resources << >> >>",
            size
        ),
        format!("<< /Length {} >>\nstream\n{}endstream", content.len(), content),
    ];

    let mut pdf: Vec<u8> = Vec::new();
    pdf.extend_from_slice(b"%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (index, body) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", index + 1, body).as_bytes());
    }

    let xref_offset = pdf.len();
    pdf.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
    pdf.extend_from_slice(b"0000000000 65535 f \n");
    for offset in &offsets {
        pdf.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
    }
    pdf.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_offset
        )
        .as_bytes(),
    );
    pdf
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::{ActiveShapes, Compositor};
    use crate::matrix::BitMatrix;
    use crate::style::{ComponentStyle, Fill};

    fn sample_paths() -> ComponentPaths {
        let matrix = BitMatrix::from_fn(21, |r, c| (r + c) % 2 == 0);
        Compositor::default().compose(&matrix, &ActiveShapes::default())
    }

    fn render_text(paths: &ComponentPaths, style: &StyleBinding, size: u32) -> String {
        match PdfRenderer::new().render(paths, style, size).unwrap() {
            Artifact::Pdf(bytes) => String::from_utf8(bytes).unwrap(),
            _ => panic!("expected pdf artifact"),
        }
    }

    #[test]
    fn document_skeleton_is_present() {
        let text = render_text(&sample_paths(), &StyleBinding::default(), 210);
        assert!(text.starts_with("%PDF-1.4\n"));
        assert!(text.contains("/Type /Catalog"));
        assert!(text.contains("/MediaBox [0 0 210 210]"));
        assert!(text.contains("stream\n"));
        assert!(text.contains("f*\n"));
        assert!(text.ends_with("%%EOF\n"));
    }

    #[test]
    fn xref_offsets_point_at_objects() {
        let text = render_text(&sample_paths(), &StyleBinding::default(), 210);
        let xref = text.find("xref\n").unwrap();
        let entries: Vec<&str> = text[xref..].lines().skip(3).take(4).collect();
        for (index, line) in entries.iter().enumerate() {
            let offset: usize = line[..10].parse().unwrap();
            assert!(text[offset..].starts_with(&format!("{} 0 obj", index + 1)));
        }
    }

    #[test]
    fn fills_resolve_to_fallback_colors() {
        let mut style = StyleBinding::default();
        style.on_pixels = ComponentStyle {
            fill: Fill::LinearGradient {
                start: Color::rgb(255, 0, 0),
                end: Color::rgb(0, 0, 255),
                angle_degrees: 0.0,
            },
            shadow: None,
        };
        let text = render_text(&sample_paths(), &style, 210);
        // The gradient's start color, as 0..1 components.
        assert!(text.contains("1 0 0 rg"));
    }

    #[test]
    fn page_space_is_y_up() {
        // A single dark cell at the matrix top-left data area lands near
        // the top of the page, which in PDF space is a large y value.
        let matrix = BitMatrix::from_fn(21, |r, c| r == 9 && c == 9);
        let paths = Compositor::default().compose(&matrix, &ActiveShapes::default());
        let text = render_text(&paths, &StyleBinding::default(), 210);
        // Cell (9, 9) spans units 90..100, so page y 110..120.
        assert!(text.contains("90 120 m"));
    }

    #[test]
    fn output_is_deterministic() {
        let paths = sample_paths();
        let a = render_text(&paths, &StyleBinding::default(), 300);
        let b = render_text(&paths, &StyleBinding::default(), 300);
        assert_eq!(a, b);
    }
}
