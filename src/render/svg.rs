//! SVG text output.
//!
//! One `<path>` element per non-empty component, painted in draw order
//! with the even-odd fill rule. Geometry stays in the compositor's unit
//! space inside a scaled group, so the path data is identical for every
//! output size. Gradients and drop shadows become `<defs>` entries;
//! image fills become patterns referencing the file by href.

use crate::compose::ComponentPaths;
use crate::path::fmt_num;
use crate::shape::MODULE;
use crate::style::{Fill, Shadow, StyleBinding};

use super::{component_id, Artifact, Renderer, Result};

pub struct SvgRenderer;

impl SvgRenderer {
    pub fn new() -> Self {
        SvgRenderer
    }
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for SvgRenderer {
    fn render(&self, paths: &ComponentPaths, style: &StyleBinding, size: u32) -> Result<Artifact> {
        let span = paths.span_units;
        let scale = if span > 0.0 { size as f64 / span } else { 0.0 };

        let mut out = String::new();
        out += "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";
        out += "<!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\" \"http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd\">\n";
        out += &format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" viewBox=\"0 0 {0} {0}\" stroke=\"none\">\n",
            size
        );

        let mut defs = String::new();
        defs += &fill_defs("background", &style.background, span);
        for (component, path) in paths.iter_draw_order() {
            if path.is_empty() {
                continue;
            }
            let component_style = style.for_component(component);
            defs += &fill_defs(component_id(component), &component_style.fill, span);
            if let Some(shadow) = &component_style.shadow {
                defs += &shadow_def(component_id(component), shadow);
            }
        }
        if !defs.is_empty() {
            out += "\t<defs>\n";
            out += &defs;
            out += "\t</defs>\n";
        }

        out += &format!(
            "\t<g transform=\"scale({})\">\n",
            fmt_num(scale)
        );
        out += &format!(
            "\t\t<rect width=\"{0}\" height=\"{0}\" {1}/>\n",
            fmt_num(span),
            fill_attr("background", &style.background)
        );
        for (component, path) in paths.iter_draw_order() {
            if path.is_empty() {
                continue;
            }
            let id = component_id(component);
            let component_style = style.for_component(component);
            let filter = match component_style.shadow {
                Some(_) => format!(" filter=\"url(#shadow-{})\"", id),
                None => String::new(),
            };
            out += &format!(
                "\t\t<path id=\"{}\" d=\"{}\" {} fill-rule=\"evenodd\"{}/>\n",
                id,
                path.to_svg_data(),
                fill_attr(id, &component_style.fill),
                filter
            );
        }
        out += "\t</g>\n";
        out += "</svg>\n";
        Ok(Artifact::Svg(out))
    }
}

/// The `fill` (and `fill-opacity`) attribute text for an element.
fn fill_attr(id: &str, fill: &Fill) -> String {
    match fill {
        Fill::Solid { color } => {
            let mut attr = format!("fill=\"{}\"", opaque_hex(*color));
            if color.a != 255 {
                attr += &format!(" fill-opacity=\"{}\"", fmt_num(color.a as f64 / 255.0));
            }
            attr
        }
        Fill::LinearGradient { .. } | Fill::RadialGradient { .. } => {
            format!("fill=\"url(#fill-{})\"", id)
        }
        Fill::Image { .. } => format!("fill=\"url(#fill-{})\"", id),
    }
}

/// `<defs>` entries a fill needs, if any.
fn fill_defs(id: &str, fill: &Fill, span: f64) -> String {
    match fill {
        Fill::Solid { .. } => String::new(),
        Fill::LinearGradient { start, end, angle_degrees } => {
            let rad = angle_degrees.to_radians();
            let (dx, dy) = (rad.cos(), rad.sin());
            let c = span / 2.0;
            let r = span / 2.0;
            format!(
                concat!(
                    "\t\t<linearGradient id=\"fill-{id}\" gradientUnits=\"userSpaceOnUse\" ",
                    "x1=\"{x1}\" y1=\"{y1}\" x2=\"{x2}\" y2=\"{y2}\">\n",
                    "\t\t\t<stop offset=\"0\" stop-color=\"{c1}\" stop-opacity=\"{o1}\"/>\n",
                    "\t\t\t<stop offset=\"1\" stop-color=\"{c2}\" stop-opacity=\"{o2}\"/>\n",
                    "\t\t</linearGradient>\n"
                ),
                id = id,
                x1 = fmt_num(c - r * dx),
                y1 = fmt_num(c - r * dy),
                x2 = fmt_num(c + r * dx),
                y2 = fmt_num(c + r * dy),
                c1 = opaque_hex(*start),
                o1 = fmt_num(start.a as f64 / 255.0),
                c2 = opaque_hex(*end),
                o2 = fmt_num(end.a as f64 / 255.0),
            )
        }
        Fill::RadialGradient { center, edge } => {
            let c = span / 2.0;
            format!(
                concat!(
                    "\t\t<radialGradient id=\"fill-{id}\" gradientUnits=\"userSpaceOnUse\" ",
                    "cx=\"{c}\" cy=\"{c}\" r=\"{r}\">\n",
                    "\t\t\t<stop offset=\"0\" stop-color=\"{c1}\" stop-opacity=\"{o1}\"/>\n",
                    "\t\t\t<stop offset=\"1\" stop-color=\"{c2}\" stop-opacity=\"{o2}\"/>\n",
                    "\t\t</radialGradient>\n"
                ),
                id = id,
                c = fmt_num(c),
                r = fmt_num(c * std::f64::consts::SQRT_2),
                c1 = opaque_hex(*center),
                o1 = fmt_num(center.a as f64 / 255.0),
                c2 = opaque_hex(*edge),
                o2 = fmt_num(edge.a as f64 / 255.0),
            )
        }
        Fill::Image { path, .. } => format!(
            concat!(
                "\t\t<pattern id=\"fill-{id}\" patternUnits=\"userSpaceOnUse\" ",
                "width=\"{span}\" height=\"{span}\">\n",
                "\t\t\t<image href=\"{href}\" width=\"{span}\" height=\"{span}\" ",
                "preserveAspectRatio=\"xMidYMid slice\"/>\n",
                "\t\t</pattern>\n"
            ),
            id = id,
            span = fmt_num(span),
            href = escape_attr(path),
        ),
    }
}

fn shadow_def(id: &str, shadow: &Shadow) -> String {
    format!(
        concat!(
            "\t\t<filter id=\"shadow-{id}\" x=\"-50%\" y=\"-50%\" width=\"200%\" height=\"200%\">\n",
            "\t\t\t<feDropShadow dx=\"{dx}\" dy=\"{dy}\" stdDeviation=\"{blur}\" ",
            "flood-color=\"{color}\" flood-opacity=\"{opacity}\"/>\n",
            "\t\t</filter>\n"
        ),
        id = id,
        dx = fmt_num(shadow.offset_x * MODULE),
        dy = fmt_num(shadow.offset_y * MODULE),
        blur = fmt_num(shadow.blur * MODULE),
        color = opaque_hex(shadow.color),
        opacity = fmt_num(shadow.color.a as f64 / 255.0),
    )
}

/// `#RRGGBB` regardless of alpha; opacity is emitted separately where it
/// matters.
fn opaque_hex(color: crate::style::Color) -> String {
    format!("#{:02X}{:02X}{:02X}", color.r, color.g, color.b)
}

fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;").replace('"', "&quot;").replace('<', "&lt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::{ActiveShapes, Compositor};
    use crate::matrix::BitMatrix;
    use crate::style::{Color, ComponentStyle};

    fn sample_paths() -> ComponentPaths {
        let matrix = BitMatrix::from_fn(21, |r, c| (r + c) % 2 == 0);
        Compositor::default().compose(&matrix, &ActiveShapes::default())
    }

    #[test]
    fn output_is_well_formed_and_deterministic() {
        let paths = sample_paths();
        let style = StyleBinding::default();
        let a = SvgRenderer::new().render(&paths, &style, 420).unwrap();
        let b = SvgRenderer::new().render(&paths, &style, 420).unwrap();
        let (Artifact::Svg(a), Artifact::Svg(b)) = (a, b) else { panic!("expected svg") };
        assert_eq!(a, b);
        assert!(a.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(a.contains("viewBox=\"0 0 420 420\""));
        assert!(a.contains("id=\"on-pixels\""));
        assert!(a.contains("fill-rule=\"evenodd\""));
        assert!(a.ends_with("</svg>\n"));
    }

    #[test]
    fn gradient_fills_emit_defs() {
        let paths = sample_paths();
        let mut style = StyleBinding::default();
        style.on_pixels = ComponentStyle {
            fill: Fill::LinearGradient {
                start: Color::rgb(255, 0, 0),
                end: Color::rgb(0, 0, 255),
                angle_degrees: 90.0,
            },
            shadow: None,
        };
        let Artifact::Svg(svg) = SvgRenderer::new().render(&paths, &style, 210).unwrap() else {
            panic!("expected svg")
        };
        assert!(svg.contains("<linearGradient id=\"fill-on-pixels\""));
        assert!(svg.contains("fill=\"url(#fill-on-pixels)\""));
        assert!(svg.contains("stop-color=\"#FF0000\""));
    }

    #[test]
    fn shadows_emit_filters() {
        let paths = sample_paths();
        let mut style = StyleBinding::default();
        style.eye_outer = ComponentStyle {
            fill: Fill::solid(Color::BLACK),
            shadow: Some(Shadow {
                offset_x: 0.5,
                offset_y: 0.5,
                blur: 1.0,
                color: Color::rgba(0, 0, 0, 100),
            }),
        };
        let Artifact::Svg(svg) = SvgRenderer::new().render(&paths, &style, 210).unwrap() else {
            panic!("expected svg")
        };
        assert!(svg.contains("<filter id=\"shadow-eye-outer\""));
        assert!(svg.contains("filter=\"url(#shadow-eye-outer)\""));
        assert!(svg.contains("dx=\"5\""));
    }

    #[test]
    fn fractional_scale_uses_dot_decimal() {
        let paths = sample_paths();
        let Artifact::Svg(svg) =
            SvgRenderer::new().render(&paths, &StyleBinding::default(), 333).unwrap()
        else {
            panic!("expected svg")
        };
        // 333 / 210 units, canonically formatted.
        assert!(svg.contains("transform=\"scale(1.586)\""));
    }
}
