use crate::error::PlotResult;
use crate::render::{Primitive, RenderFrame, Renderer};

/// No-op renderer used by tests and headless usage.
///
/// It still validates frame content so tests can catch invalid geometry
/// without touching the filesystem.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub last_line_count: usize,
    pub last_rect_count: usize,
    pub last_marker_count: usize,
    pub last_text_count: usize,
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &RenderFrame) -> PlotResult<()> {
        frame.validate()?;
        *self = Self::default();
        for primitive in &frame.primitives {
            match primitive {
                Primitive::Line(_) | Primitive::Polyline(_) => self.last_line_count += 1,
                Primitive::Rect(_) | Primitive::Polygon(_) => self.last_rect_count += 1,
                Primitive::Marker(_) => self.last_marker_count += 1,
                Primitive::Text(_) => self.last_text_count += 1,
            }
        }
        Ok(())
    }
}
