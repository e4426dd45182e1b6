use serde::{Deserialize, Serialize};

use crate::core::Viewport;
use crate::error::{PlotError, PlotResult};
use crate::render::{
    LinePrimitive, MarkerPrimitive, PolygonPrimitive, PolylinePrimitive, RectPrimitive,
    TextPrimitive,
};

/// One draw command of a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Primitive {
    Line(LinePrimitive),
    Polyline(PolylinePrimitive),
    Polygon(PolygonPrimitive),
    Rect(RectPrimitive),
    Marker(MarkerPrimitive),
    Text(TextPrimitive),
}

impl Primitive {
    fn validate(&self) -> PlotResult<()> {
        match self {
            Self::Line(line) => line.validate(),
            Self::Polyline(polyline) => polyline.validate(),
            Self::Polygon(polygon) => polygon.validate(),
            Self::Rect(rect) => rect.validate(),
            Self::Marker(marker) => marker.validate(),
            Self::Text(text) => text.validate(),
        }
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        match self {
            Self::Line(line) => {
                line.x1 += dx;
                line.x2 += dx;
                line.y1 += dy;
                line.y2 += dy;
            }
            Self::Polyline(polyline) => shift_points(&mut polyline.points, dx, dy),
            Self::Polygon(polygon) => shift_points(&mut polygon.points, dx, dy),
            Self::Rect(rect) => {
                rect.x += dx;
                rect.y += dy;
            }
            Self::Marker(marker) => {
                marker.x += dx;
                marker.y += dy;
            }
            Self::Text(text) => {
                text.x += dx;
                text.y += dy;
            }
        }
    }
}

fn shift_points(points: &mut [(f64, f64)], dx: f64, dy: f64) {
    for (x, y) in points {
        *x += dx;
        *y += dy;
    }
}

/// Backend-agnostic scene for one figure, in paint order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderFrame {
    pub viewport: Viewport,
    pub primitives: Vec<Primitive>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            primitives: Vec::new(),
        }
    }

    pub fn push(&mut self, primitive: Primitive) {
        self.primitives.push(primitive);
    }

    #[must_use]
    pub fn with_primitive(mut self, primitive: Primitive) -> Self {
        self.primitives.push(primitive);
        self
    }

    /// Grows the canvas by the given margins, shifting existing content.
    pub fn expand(&mut self, left: f64, top: f64, right: f64, bottom: f64) {
        let (left, top) = (left.max(0.0).ceil(), top.max(0.0).ceil());
        let (right, bottom) = (right.max(0.0).ceil(), bottom.max(0.0).ceil());
        if left > 0.0 || top > 0.0 {
            for primitive in &mut self.primitives {
                primitive.translate(left, top);
            }
        }
        self.viewport = Viewport::new(
            self.viewport.width + (left + right) as u32,
            self.viewport.height + (top + bottom) as u32,
        );
    }

    pub fn validate(&self) -> PlotResult<()> {
        if !self.viewport.is_valid() {
            return Err(PlotError::InvalidData(format!(
                "invalid viewport size: width={}, height={}",
                self.viewport.width, self.viewport.height
            )));
        }

        for primitive in &self.primitives {
            primitive.validate()?;
        }

        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    #[must_use]
    pub fn texts(&self) -> Vec<&TextPrimitive> {
        self.primitives
            .iter()
            .filter_map(|primitive| match primitive {
                Primitive::Text(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn rects(&self) -> Vec<&RectPrimitive> {
        self.primitives
            .iter()
            .filter_map(|primitive| match primitive {
                Primitive::Rect(rect) => Some(rect),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn markers(&self) -> Vec<&MarkerPrimitive> {
        self.primitives
            .iter()
            .filter_map(|primitive| match primitive {
                Primitive::Marker(marker) => Some(marker),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{Primitive, RenderFrame};
    use crate::core::Viewport;
    use crate::render::{Color, RectPrimitive, TextHAlign, TextPrimitive};

    #[test]
    fn expand_shifts_content_and_grows_viewport() {
        let mut frame = RenderFrame::new(Viewport::new(100, 50)).with_primitive(
            Primitive::Rect(RectPrimitive::new(10.0, 10.0, 5.0, 5.0, Color::BLACK)),
        );
        frame.expand(4.0, 0.0, 0.0, 6.0);
        assert_eq!(frame.viewport, Viewport::new(104, 56));
        assert_eq!(frame.rects()[0].x, 14.0);
        assert_eq!(frame.rects()[0].y, 10.0);
    }

    #[test]
    fn empty_text_fails_validation() {
        let frame = RenderFrame::new(Viewport::new(10, 10)).with_primitive(Primitive::Text(
            TextPrimitive::new("", 1.0, 1.0, 10.0, Color::BLACK, TextHAlign::Left),
        ));
        assert!(frame.validate().is_err());
    }
}
