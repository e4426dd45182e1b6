use std::f64::consts::TAU;
use std::fs::File;
use std::path::Path;

use cairo::{Context, Format, ImageSurface, PdfSurface};
use pango::FontDescription;

use crate::error::{PlotError, PlotResult};
use crate::render::{
    Color, Primitive, RectPrimitive, RenderFrame, Renderer, TextHAlign, TextPrimitive, TextVAlign,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CairoRenderStats {
    pub lines_drawn: usize,
    pub shapes_drawn: usize,
    pub texts_drawn: usize,
}

/// Optional extension trait for renderers that can draw into an external Cairo
/// context.
pub trait CairoContextRenderer {
    fn render_on_cairo_context(
        &mut self,
        context: &Context,
        frame: &RenderFrame,
    ) -> PlotResult<()>;
}

/// Cairo + Pango + PangoCairo raster renderer.
#[derive(Debug)]
pub struct CairoRenderer {
    surface: ImageSurface,
    font_family: String,
    last_stats: CairoRenderStats,
}

impl CairoRenderer {
    pub fn new(width: i32, height: i32, font_family: impl Into<String>) -> PlotResult<Self> {
        if width <= 0 || height <= 0 {
            return Err(PlotError::InvalidData(
                "cairo surface size must be > 0".to_owned(),
            ));
        }

        let surface = ImageSurface::create(Format::ARgb32, width, height)
            .map_err(|err| map_backend_error("failed to create cairo surface", err))?;
        Ok(Self {
            surface,
            font_family: font_family.into(),
            last_stats: CairoRenderStats::default(),
        })
    }

    /// Sized to fit `frame`.
    pub fn for_frame(frame: &RenderFrame, font_family: impl Into<String>) -> PlotResult<Self> {
        let width = i32::try_from(frame.viewport.width)
            .map_err(|_| PlotError::InvalidData("frame too wide for cairo".to_owned()))?;
        let height = i32::try_from(frame.viewport.height)
            .map_err(|_| PlotError::InvalidData("frame too tall for cairo".to_owned()))?;
        Self::new(width, height, font_family)
    }

    #[must_use]
    pub fn surface(&self) -> &ImageSurface {
        &self.surface
    }

    #[must_use]
    pub fn last_stats(&self) -> CairoRenderStats {
        self.last_stats
    }

    pub fn write_png(&self, path: &Path) -> PlotResult<()> {
        let mut file = File::create(path).map_err(|err| PlotError::io(path, err))?;
        self.surface
            .write_to_png(&mut file)
            .map_err(|err| PlotError::Backend(format!("failed to encode png: {err}")))
    }
}

impl Renderer for CairoRenderer {
    fn render(&mut self, frame: &RenderFrame) -> PlotResult<()> {
        let context = Context::new(&self.surface)
            .map_err(|err| map_backend_error("failed to create cairo context", err))?;
        self.last_stats = paint_frame(&context, frame, &self.font_family)?;
        Ok(())
    }
}

impl CairoContextRenderer for CairoRenderer {
    fn render_on_cairo_context(
        &mut self,
        context: &Context,
        frame: &RenderFrame,
    ) -> PlotResult<()> {
        self.last_stats = paint_frame(context, frame, &self.font_family)?;
        Ok(())
    }
}

/// Writes `frame` as a single-page vector PDF.
pub fn render_pdf(frame: &RenderFrame, font_family: &str, path: &Path) -> PlotResult<CairoRenderStats> {
    let surface = PdfSurface::new(
        f64::from(frame.viewport.width),
        f64::from(frame.viewport.height),
        path,
    )
    .map_err(|err| map_backend_error("failed to create pdf surface", err))?;
    let context = Context::new(&surface)
        .map_err(|err| map_backend_error("failed to create cairo context", err))?;
    let stats = paint_frame(&context, frame, font_family)?;
    surface.finish();
    Ok(stats)
}

fn paint_frame(context: &Context, frame: &RenderFrame, font_family: &str) -> PlotResult<CairoRenderStats> {
    frame.validate()?;
    let mut stats = CairoRenderStats::default();

    for primitive in &frame.primitives {
        match primitive {
            Primitive::Line(line) => {
                apply_color(context, line.color);
                context.set_line_width(line.stroke_width);
                if line.dashed {
                    context.set_dash(&[6.0, 4.0], 0.0);
                }
                context.move_to(line.x1, line.y1);
                context.line_to(line.x2, line.y2);
                context
                    .stroke()
                    .map_err(|err| map_backend_error("failed to stroke line", err))?;
                context.set_dash(&[], 0.0);
                stats.lines_drawn += 1;
            }
            Primitive::Polyline(polyline) => {
                append_path(context, &polyline.points, false);
                apply_color(context, polyline.color);
                context.set_line_width(polyline.stroke_width);
                context
                    .stroke()
                    .map_err(|err| map_backend_error("failed to stroke polyline", err))?;
                stats.lines_drawn += 1;
            }
            Primitive::Polygon(polygon) => {
                append_path(context, &polygon.points, true);
                if let Some(fill) = polygon.fill_color {
                    apply_color(context, fill);
                    context
                        .fill_preserve()
                        .map_err(|err| map_backend_error("failed to fill polygon", err))?;
                }
                if polygon.stroke_width > 0.0 {
                    apply_color(context, polygon.stroke_color);
                    context.set_line_width(polygon.stroke_width);
                    context
                        .stroke()
                        .map_err(|err| map_backend_error("failed to stroke polygon", err))?;
                } else {
                    context.new_path();
                }
                stats.shapes_drawn += 1;
            }
            Primitive::Rect(rect) => {
                fill_rect(context, *rect)?;
                stats.shapes_drawn += 1;
            }
            Primitive::Marker(marker) => {
                match marker.shape.outline(marker.x, marker.y, marker.size) {
                    Some(points) => append_path(context, &points, true),
                    None => {
                        context.new_path();
                        context.arc(marker.x, marker.y, marker.size * 0.5, 0.0, TAU);
                    }
                }
                apply_color(context, marker.color);
                context
                    .fill()
                    .map_err(|err| map_backend_error("failed to fill marker", err))?;
                stats.shapes_drawn += 1;
            }
            Primitive::Text(text) => {
                draw_text(context, text, font_family)?;
                stats.texts_drawn += 1;
            }
        }
    }

    Ok(stats)
}

fn apply_color(context: &Context, color: Color) {
    context.set_source_rgba(color.red, color.green, color.blue, color.alpha);
}

fn append_path(context: &Context, points: &[(f64, f64)], close: bool) {
    context.new_path();
    for (index, (x, y)) in points.iter().enumerate() {
        if index == 0 {
            context.move_to(*x, *y);
        } else {
            context.line_to(*x, *y);
        }
    }
    if close {
        context.close_path();
    }
}

fn fill_rect(context: &Context, rect: RectPrimitive) -> PlotResult<()> {
    context.rectangle(rect.x, rect.y, rect.width, rect.height);
    apply_color(context, rect.fill_color);
    if rect.border_width > 0.0 {
        context
            .fill_preserve()
            .map_err(|err| map_backend_error("failed to fill rectangle", err))?;
        apply_color(context, rect.border_color);
        context.set_line_width(rect.border_width);
        context
            .stroke()
            .map_err(|err| map_backend_error("failed to stroke rectangle border", err))
    } else {
        context
            .fill()
            .map_err(|err| map_backend_error("failed to fill rectangle", err))
    }
}

fn draw_text(context: &Context, text: &TextPrimitive, font_family: &str) -> PlotResult<()> {
    let layout = pangocairo::functions::create_layout(context);
    let mut font_description = FontDescription::new();
    font_description.set_family(font_family);
    font_description.set_absolute_size(text.font_size_px * f64::from(pango::SCALE));
    layout.set_font_description(Some(&font_description));
    layout.set_text(&text.text);

    let (text_width, text_height) = layout.pixel_size();
    let dx = match text.h_align {
        TextHAlign::Left => 0.0,
        TextHAlign::Center => -f64::from(text_width) / 2.0,
        TextHAlign::Right => -f64::from(text_width),
    };
    let dy = match text.v_align {
        TextVAlign::Top => 0.0,
        TextVAlign::Middle => -f64::from(text_height) / 2.0,
        TextVAlign::Baseline => -f64::from(layout.baseline()) / f64::from(pango::SCALE),
    };

    context
        .save()
        .map_err(|err| map_backend_error("failed to save cairo state", err))?;
    context.translate(text.x, text.y);
    context.rotate(-text.rotation_deg.to_radians());
    apply_color(context, text.color);
    context.move_to(dx, dy);
    pangocairo::functions::show_layout(context, &layout);
    context
        .restore()
        .map_err(|err| map_backend_error("failed to restore cairo state", err))
}

fn map_backend_error(prefix: &str, err: cairo::Error) -> PlotError {
    PlotError::Backend(format!("{prefix}: {err}"))
}
