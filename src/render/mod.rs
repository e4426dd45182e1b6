mod export;
mod frame;
mod layout;
mod null_renderer;
mod primitives;
mod surface;
mod svg_backend;

pub use export::{OutputFormat, export_frame};
pub use frame::{Primitive, RenderFrame};
pub use layout::{estimate_text_width, points_to_pixels};
pub use null_renderer::NullRenderer;
pub use primitives::{
    Color, LinePrimitive, MarkerPrimitive, MarkerShape, PolygonPrimitive, PolylinePrimitive,
    RectPrimitive, TextHAlign, TextPrimitive, TextVAlign,
};
pub use surface::{
    AreaMark, AxesView, AxisId, AxisSettings, BarMark, HLineMark, Handle, Legend, LegendEntry,
    LegendPlacement, LegendStyle, LineMark, Mark, PlacedMark, Spine, Surface, SurfaceSnapshot,
    TextMark, TextStyle,
};
pub use svg_backend::{SvgRenderStats, SvgRenderer, escape_xml};

use crate::error::PlotResult;

/// Contract implemented by any rendering backend.
///
/// Backends receive a fully laid out `RenderFrame` so drawing code stays
/// isolated from plot semantics.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> PlotResult<()>;
}

#[cfg(feature = "cairo-backend")]
mod cairo_backend;
#[cfg(feature = "cairo-backend")]
pub use cairo_backend::{CairoContextRenderer, CairoRenderStats, CairoRenderer, render_pdf};
