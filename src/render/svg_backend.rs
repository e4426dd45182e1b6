use std::fmt::Write as _;

use crate::error::PlotResult;
use crate::render::{
    Color, LinePrimitive, MarkerPrimitive, PolygonPrimitive, PolylinePrimitive, Primitive,
    RectPrimitive, RenderFrame, Renderer, TextHAlign, TextPrimitive, TextVAlign,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SvgRenderStats {
    pub lines_drawn: usize,
    pub shapes_drawn: usize,
    pub texts_drawn: usize,
}

/// Renders frames into a standalone SVG document.
#[derive(Debug)]
pub struct SvgRenderer {
    font_family: String,
    document: String,
    last_stats: SvgRenderStats,
}

impl SvgRenderer {
    #[must_use]
    pub fn new(font_family: impl Into<String>) -> Self {
        Self {
            font_family: font_family.into(),
            document: String::new(),
            last_stats: SvgRenderStats::default(),
        }
    }

    /// Document produced by the last successful `render` call.
    #[must_use]
    pub fn document(&self) -> &str {
        &self.document
    }

    #[must_use]
    pub fn into_document(self) -> String {
        self.document
    }

    #[must_use]
    pub fn last_stats(&self) -> SvgRenderStats {
        self.last_stats
    }
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self::new("Times New Roman")
    }
}

impl Renderer for SvgRenderer {
    fn render(&mut self, frame: &RenderFrame) -> PlotResult<()> {
        frame.validate()?;

        let width = frame.viewport.width;
        let height = frame.viewport.height;
        let mut body = String::new();
        let mut stats = SvgRenderStats::default();

        for primitive in &frame.primitives {
            match primitive {
                Primitive::Line(line) => {
                    write_line(&mut body, line);
                    stats.lines_drawn += 1;
                }
                Primitive::Polyline(polyline) => {
                    write_polyline(&mut body, polyline);
                    stats.lines_drawn += 1;
                }
                Primitive::Polygon(polygon) => {
                    write_polygon(&mut body, polygon);
                    stats.shapes_drawn += 1;
                }
                Primitive::Rect(rect) => {
                    write_rect(&mut body, rect);
                    stats.shapes_drawn += 1;
                }
                Primitive::Marker(marker) => {
                    write_marker(&mut body, marker);
                    stats.shapes_drawn += 1;
                }
                Primitive::Text(text) => {
                    write_text(&mut body, text, &self.font_family);
                    stats.texts_drawn += 1;
                }
            }
        }

        self.document = format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" \
             viewBox=\"0 0 {width} {height}\">\n{body}</svg>\n"
        );
        self.last_stats = stats;
        Ok(())
    }
}

fn paint(color: Color) -> String {
    color.to_hex()
}

fn opacity(attribute: &str, color: Color) -> String {
    if color.alpha < 1.0 {
        format!(" {attribute}=\"{:.3}\"", color.alpha)
    } else {
        String::new()
    }
}

fn write_line(out: &mut String, line: &LinePrimitive) {
    let dash = if line.dashed {
        " stroke-dasharray=\"6,4\""
    } else {
        ""
    };
    let _ = writeln!(
        out,
        "  <line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"{}\"{} stroke-width=\"{:.2}\"{dash}/>",
        line.x1,
        line.y1,
        line.x2,
        line.y2,
        paint(line.color),
        opacity("stroke-opacity", line.color),
        line.stroke_width,
    );
}

fn points_attr(points: &[(f64, f64)]) -> String {
    points
        .iter()
        .map(|(x, y)| format!("{x:.2},{y:.2}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn write_polyline(out: &mut String, polyline: &PolylinePrimitive) {
    let _ = writeln!(
        out,
        "  <polyline points=\"{}\" fill=\"none\" stroke=\"{}\"{} stroke-width=\"{:.2}\" stroke-linejoin=\"round\"/>",
        points_attr(&polyline.points),
        paint(polyline.color),
        opacity("stroke-opacity", polyline.color),
        polyline.stroke_width,
    );
}

fn write_polygon(out: &mut String, polygon: &PolygonPrimitive) {
    let fill = match polygon.fill_color {
        Some(color) => format!("fill=\"{}\"{}", paint(color), opacity("fill-opacity", color)),
        None => "fill=\"none\"".to_owned(),
    };
    let stroke = if polygon.stroke_width > 0.0 {
        format!(
            " stroke=\"{}\"{} stroke-width=\"{:.2}\"",
            paint(polygon.stroke_color),
            opacity("stroke-opacity", polygon.stroke_color),
            polygon.stroke_width
        )
    } else {
        String::new()
    };
    let _ = writeln!(
        out,
        "  <polygon points=\"{}\" {fill}{stroke}/>",
        points_attr(&polygon.points)
    );
}

fn write_rect(out: &mut String, rect: &RectPrimitive) {
    let border = if rect.border_width > 0.0 {
        format!(
            " stroke=\"{}\"{} stroke-width=\"{:.2}\"",
            paint(rect.border_color),
            opacity("stroke-opacity", rect.border_color),
            rect.border_width
        )
    } else {
        String::new()
    };
    let _ = writeln!(
        out,
        "  <rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"{}\"{}{border}/>",
        rect.x,
        rect.y,
        rect.width,
        rect.height,
        paint(rect.fill_color),
        opacity("fill-opacity", rect.fill_color),
    );
}

fn write_marker(out: &mut String, marker: &MarkerPrimitive) {
    let fill = format!(
        "fill=\"{}\"{}",
        paint(marker.color),
        opacity("fill-opacity", marker.color)
    );
    match marker.shape.outline(marker.x, marker.y, marker.size) {
        Some(points) => {
            let _ = writeln!(out, "  <polygon points=\"{}\" {fill}/>", points_attr(&points));
        }
        None => {
            let _ = writeln!(
                out,
                "  <circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\" {fill}/>",
                marker.x,
                marker.y,
                marker.size * 0.5
            );
        }
    }
}

fn write_text(out: &mut String, text: &TextPrimitive, font_family: &str) {
    let anchor = match text.h_align {
        TextHAlign::Left => "start",
        TextHAlign::Center => "middle",
        TextHAlign::Right => "end",
    };
    let baseline = match text.v_align {
        TextVAlign::Top => " dominant-baseline=\"hanging\"",
        TextVAlign::Middle => " dominant-baseline=\"central\"",
        TextVAlign::Baseline => "",
    };
    // SVG rotates clockwise.
    let transform = if text.rotation_deg == 0.0 {
        String::new()
    } else {
        format!(
            " transform=\"rotate({:.2},{:.2},{:.2})\"",
            -text.rotation_deg, text.x, text.y
        )
    };
    let _ = writeln!(
        out,
        "  <text x=\"{:.2}\" y=\"{:.2}\" font-family=\"{}\" font-size=\"{:.2}\" fill=\"{}\" text-anchor=\"{anchor}\"{baseline}{transform}>{}</text>",
        text.x,
        text.y,
        escape_xml(font_family),
        text.font_size_px,
        paint(text.color),
        escape_xml(&text.text),
    );
}

/// Escapes the five XML special characters.
#[must_use]
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
