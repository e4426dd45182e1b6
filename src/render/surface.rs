//! Shared drawing surface.
//!
//! A `Surface` is one figure with a primary y-axis view and an optional
//! secondary view that shares the x-axis but has its own y scale. Plotters
//! record marks in data coordinates through an [`AxesView`]; every recorded
//! mark returns a [`Handle`] that legends refer back to. Nothing is projected
//! to pixels until [`Surface::layout`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{FigureSize, LegendLocation, TickFormat};
use crate::error::PlotResult;
use crate::render::{MarkerShape, RenderFrame, TextHAlign, TextVAlign};

/// Which y-scale a mark or setting belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AxisId {
    #[default]
    Primary,
    Secondary,
}

/// Opaque reference to one recorded mark, used only to build legends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Handle(usize);

impl Handle {
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Spine {
    Top,
    Right,
    Bottom,
    Left,
}

/// Bar centered on `x`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarMark {
    pub x: f64,
    pub width: f64,
    pub bottom: f64,
    pub height: f64,
    pub fill: String,
    pub edge: String,
    pub edge_width: f64,
}

/// Polyline with optional markers; NaN points split the line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineMark {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
    pub color: String,
    pub width: f64,
    pub marker: Option<MarkerShape>,
    pub marker_size: f64,
}

/// Curve filled down to zero, used for density estimates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaMark {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
    pub color: String,
    pub fill: bool,
    pub alpha: f64,
}

/// Text anchored at a data coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextMark {
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub style: TextStyle,
}

/// Horizontal reference line across the whole plot area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HLineMark {
    pub y: f64,
    pub color: String,
    pub width: f64,
    pub dashed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Mark {
    Bar(BarMark),
    Line(LineMark),
    Area(AreaMark),
    Text(TextMark),
    HLine(HLineMark),
}

impl Mark {
    /// Horizontal data extent, `None` for marks that do not drive the x domain.
    #[must_use]
    pub fn x_extent(&self) -> Option<(f64, f64)> {
        match self {
            Self::Bar(bar) => Some((bar.x - bar.width * 0.5, bar.x + bar.width * 0.5)),
            Self::Line(line) => finite_extent(&line.xs),
            Self::Area(area) => finite_extent(&area.xs),
            Self::Text(_) | Self::HLine(_) => None,
        }
    }

    /// Vertical data extent.
    #[must_use]
    pub fn y_extent(&self) -> Option<(f64, f64)> {
        match self {
            Self::Bar(bar) => {
                let top = bar.bottom + bar.height;
                Some((bar.bottom.min(top), bar.bottom.max(top)))
            }
            Self::Line(line) => finite_extent(&line.ys),
            Self::Area(area) => finite_extent(&area.ys).map(|(lo, hi)| (lo.min(0.0), hi)),
            Self::Text(_) | Self::HLine(_) => None,
        }
    }
}

fn finite_extent(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|value| value.is_finite())
        .fold(None, |acc, value| match acc {
            None => Some((value, value)),
            Some((lo, hi)) => Some((lo.min(value), hi.max(value))),
        })
}

/// A mark together with the axis view it was drawn into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedMark {
    pub axis: AxisId,
    pub mark: Mark,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Font size in points.
    pub font_size: f64,
    pub rotation: f64,
    pub h_align: TextHAlign,
    pub v_align: TextVAlign,
    pub color: String,
}

impl TextStyle {
    #[must_use]
    pub fn new(font_size: f64) -> Self {
        Self {
            font_size,
            rotation: 0.0,
            h_align: TextHAlign::Left,
            v_align: TextVAlign::Baseline,
            color: "#000000".to_owned(),
        }
    }

    #[must_use]
    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    #[must_use]
    pub fn with_align(mut self, h_align: TextHAlign, v_align: TextVAlign) -> Self {
        self.h_align = h_align;
        self.v_align = v_align;
        self
    }
}

/// Per-view axis settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisSettings {
    pub xlabel: Option<(String, f64)>,
    pub ylabel: Option<(String, f64)>,
    pub y_lower: Option<f64>,
    pub y_upper: Option<f64>,
    pub log_scale: bool,
    /// Explicit `(value, label)` ticks; auto ticks are generated otherwise.
    pub yticks: Option<Vec<(f64, String)>>,
    pub y_format: Option<TickFormat>,
    pub tick_font: f64,
    pub y_grid: bool,
    pub show_xticks: bool,
    pub hidden_spines: Vec<Spine>,
    pub spine_width: f64,
}

impl Default for AxisSettings {
    fn default() -> Self {
        Self {
            xlabel: None,
            ylabel: None,
            y_lower: None,
            y_upper: None,
            log_scale: false,
            yticks: None,
            y_format: None,
            tick_font: 10.0,
            y_grid: false,
            show_xticks: true,
            hidden_spines: Vec::new(),
            spine_width: 0.8,
        }
    }
}

impl AxisSettings {
    #[must_use]
    pub fn spine_visible(&self, spine: Spine) -> bool {
        !self.hidden_spines.contains(&spine)
    }
}

/// Where the legend box is pinned.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LegendPlacement {
    /// Anchor in figure fractions (y grows upwards); may lie outside the
    /// figure, in which case the exported canvas grows to fit.
    Figure { anchor: (f64, f64) },
    /// Inside the primary plot area at the location's default anchor.
    Axes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendStyle {
    pub location: LegendLocation,
    pub placement: LegendPlacement,
    pub ncol: Option<usize>,
    pub font_size: f64,
    pub frame: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub handle: Handle,
    pub label: String,
}

impl LegendEntry {
    #[must_use]
    pub fn new(handle: Handle, label: impl Into<String>) -> Self {
        Self {
            handle,
            label: label.into(),
        }
    }
}

/// Legend with entries in display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Legend {
    pub entries: Vec<LegendEntry>,
    pub style: LegendStyle,
}

impl Legend {
    #[must_use]
    pub fn new(entries: Vec<LegendEntry>, style: LegendStyle) -> Self {
        Self { entries, style }
    }

    /// Column count; unset means one row holding every entry.
    #[must_use]
    pub fn columns(&self) -> usize {
        self.style
            .ncol
            .unwrap_or(self.entries.len())
            .clamp(1, self.entries.len().max(1))
    }
}

/// Serializable summary used by tests and debugging tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceSnapshot {
    pub has_secondary: bool,
    pub bars: usize,
    pub lines: usize,
    pub areas: usize,
    pub texts: usize,
    pub legend_labels: Vec<String>,
}

/// The figure both renderers of a composition draw into.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    size: FigureSize,
    tight_rect: (f64, f64, f64, f64),
    font_family: String,
    xlim: Option<(f64, f64)>,
    primary: AxisSettings,
    secondary: Option<AxisSettings>,
    marks: Vec<PlacedMark>,
    legend: Option<Legend>,
}

impl Surface {
    #[must_use]
    pub fn new(size: FigureSize) -> Self {
        Self {
            size,
            tight_rect: (0.0, 0.0, 1.0, 1.0),
            font_family: "Times New Roman".to_owned(),
            xlim: None,
            primary: AxisSettings::default(),
            secondary: None,
            marks: Vec::new(),
            legend: None,
        }
    }

    /// Fraction of the figure `(left, bottom, right, top)` given to the axes
    /// and their decorations.
    #[must_use]
    pub fn with_tight_rect(mut self, tight_rect: (f64, f64, f64, f64)) -> Self {
        self.tight_rect = tight_rect;
        self
    }

    #[must_use]
    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = family.into();
        self
    }

    #[must_use]
    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    #[must_use]
    pub fn size(&self) -> FigureSize {
        self.size
    }

    #[must_use]
    pub fn tight_rect(&self) -> (f64, f64, f64, f64) {
        self.tight_rect
    }

    /// Adds the secondary y view sharing this surface's x-axis.
    pub fn twinx(&mut self) -> AxisId {
        self.secondary.get_or_insert_with(AxisSettings::default);
        AxisId::Secondary
    }

    #[must_use]
    pub fn has_secondary(&self) -> bool {
        self.secondary.is_some()
    }

    #[must_use]
    pub fn axis(&self, axis: AxisId) -> Option<&AxisSettings> {
        match axis {
            AxisId::Primary => Some(&self.primary),
            AxisId::Secondary => self.secondary.as_ref(),
        }
    }

    /// Settings of `axis`, creating the secondary view on first use.
    pub fn axis_mut(&mut self, axis: AxisId) -> &mut AxisSettings {
        match axis {
            AxisId::Primary => &mut self.primary,
            AxisId::Secondary => self.secondary.get_or_insert_with(AxisSettings::default),
        }
    }

    pub fn view(&mut self, axis: AxisId) -> AxesView<'_> {
        if axis == AxisId::Secondary {
            self.twinx();
        }
        AxesView {
            surface: self,
            axis,
        }
    }

    #[must_use]
    pub fn xlim(&self) -> Option<(f64, f64)> {
        self.xlim
    }

    pub fn set_xlim(&mut self, xlim: Option<(f64, f64)>) {
        self.xlim = xlim;
    }

    pub fn push_mark(&mut self, axis: AxisId, mark: Mark) -> Handle {
        if axis == AxisId::Secondary {
            self.twinx();
        }
        self.marks.push(PlacedMark { axis, mark });
        Handle(self.marks.len() - 1)
    }

    #[must_use]
    pub fn marks(&self) -> &[PlacedMark] {
        &self.marks
    }

    #[must_use]
    pub fn mark(&self, handle: Handle) -> Option<&PlacedMark> {
        self.marks.get(handle.0)
    }

    pub fn marks_on(&self, axis: AxisId) -> impl Iterator<Item = &Mark> {
        self.marks
            .iter()
            .filter(move |placed| placed.axis == axis)
            .map(|placed| &placed.mark)
    }

    pub fn bars(&self) -> impl Iterator<Item = &BarMark> {
        self.marks.iter().filter_map(|placed| match &placed.mark {
            Mark::Bar(bar) => Some(bar),
            _ => None,
        })
    }

    pub fn lines_on(&self, axis: AxisId) -> impl Iterator<Item = &LineMark> {
        self.marks_on(axis).filter_map(|mark| match mark {
            Mark::Line(line) => Some(line),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextMark> {
        self.marks.iter().filter_map(|placed| match &placed.mark {
            Mark::Text(text) => Some(text),
            _ => None,
        })
    }

    pub fn set_legend(&mut self, legend: Legend) {
        self.legend = Some(legend);
    }

    #[must_use]
    pub fn legend(&self) -> Option<&Legend> {
        self.legend.as_ref()
    }

    #[must_use]
    pub fn snapshot(&self) -> SurfaceSnapshot {
        let count = |pred: fn(&Mark) -> bool| {
            self.marks.iter().filter(|placed| pred(&placed.mark)).count()
        };
        SurfaceSnapshot {
            has_secondary: self.has_secondary(),
            bars: count(|mark| matches!(mark, Mark::Bar(_))),
            lines: count(|mark| matches!(mark, Mark::Line(_))),
            areas: count(|mark| matches!(mark, Mark::Area(_))),
            texts: count(|mark| matches!(mark, Mark::Text(_))),
            legend_labels: self
                .legend
                .as_ref()
                .map(|legend| {
                    legend
                        .entries
                        .iter()
                        .map(|entry| entry.label.clone())
                        .collect()
                })
                .unwrap_or_default(),
        }
    }

    /// Projects the recorded scene into a pixel-space frame.
    pub fn layout(&self) -> PlotResult<RenderFrame> {
        super::layout::layout_surface(self)
    }

    /// Lays the surface out and writes it to `path`, choosing the backend by
    /// file extension. Parent directories are created as needed.
    pub fn save(&self, path: impl AsRef<Path>) -> PlotResult<()> {
        let frame = self.layout()?;
        super::export::export_frame(&frame, path.as_ref(), &self.font_family)
    }
}

/// Mutable view of one y-axis of a [`Surface`].
///
/// Both renderers of a dual-axis composition hold one of these in turn; the
/// composer owns the surface itself.
pub struct AxesView<'a> {
    surface: &'a mut Surface,
    axis: AxisId,
}

impl AxesView<'_> {
    #[must_use]
    pub fn axis(&self) -> AxisId {
        self.axis
    }

    #[must_use]
    pub fn surface(&self) -> &Surface {
        self.surface
    }

    fn settings(&mut self) -> &mut AxisSettings {
        self.surface.axis_mut(self.axis)
    }

    /// Records a bar centered on `x`.
    pub fn bar(&mut self, x: f64, height: f64, width: f64, bottom: f64, fill: &str) -> Handle {
        self.surface.push_mark(
            self.axis,
            Mark::Bar(BarMark {
                x,
                width,
                bottom,
                height,
                fill: fill.to_owned(),
                edge: "#000000".to_owned(),
                edge_width: 0.5,
            }),
        )
    }

    pub fn plot(&mut self, line: LineMark) -> Handle {
        self.surface.push_mark(self.axis, Mark::Line(line))
    }

    pub fn fill_curve(&mut self, area: AreaMark) -> Handle {
        self.surface.push_mark(self.axis, Mark::Area(area))
    }

    pub fn text(&mut self, x: f64, y: f64, text: impl Into<String>, style: TextStyle) -> Handle {
        self.surface.push_mark(
            self.axis,
            Mark::Text(TextMark {
                x,
                y,
                text: text.into(),
                style,
            }),
        )
    }

    pub fn axhline(&mut self, y: f64, color: &str, width: f64, dashed: bool) -> Handle {
        self.surface.push_mark(
            self.axis,
            Mark::HLine(HLineMark {
                y,
                color: color.to_owned(),
                width,
                dashed,
            }),
        )
    }

    pub fn set_xlabel(&mut self, label: impl Into<String>, font_size: f64) {
        self.settings().xlabel = Some((label.into(), font_size));
    }

    pub fn set_ylabel(&mut self, label: impl Into<String>, font_size: f64) {
        self.settings().ylabel = Some((label.into(), font_size));
    }

    /// Fixes the lower bound and optionally the upper bound of this view.
    pub fn set_ylim(&mut self, lower: f64, upper: Option<f64>) {
        let settings = self.settings();
        settings.y_lower = Some(lower);
        settings.y_upper = upper;
    }

    pub fn set_xlim(&mut self, xlim: (f64, f64)) {
        self.surface.set_xlim(Some(xlim));
    }

    pub fn set_log_scale(&mut self, log_scale: bool) {
        self.settings().log_scale = log_scale;
    }

    pub fn set_yticks(&mut self, ticks: Vec<(f64, String)>) {
        self.settings().yticks = Some(ticks);
    }

    pub fn set_y_format(&mut self, format: TickFormat) {
        self.settings().y_format = Some(format);
    }

    pub fn set_tick_font(&mut self, font_size: f64) {
        self.settings().tick_font = font_size;
    }

    pub fn set_y_grid(&mut self, visible: bool) {
        self.settings().y_grid = visible;
    }

    pub fn hide_xticks(&mut self) {
        self.settings().show_xticks = false;
    }

    pub fn hide_spines(&mut self, spines: &[Spine]) {
        let settings = self.settings();
        for spine in spines {
            if !settings.hidden_spines.contains(spine) {
                settings.hidden_spines.push(*spine);
            }
        }
    }

    pub fn set_spine_width(&mut self, width: f64) {
        self.settings().spine_width = width;
    }
}

#[cfg(test)]
mod tests {
    use super::{AxisId, Mark, Surface, TextStyle};
    use crate::core::FigureSize;

    #[test]
    fn secondary_marks_create_twin_axis() {
        let mut surface = Surface::new(FigureSize::SQUARE);
        assert!(!surface.has_secondary());
        surface.view(AxisId::Secondary).bar(0.0, 1.0, 0.5, 0.0, "#000000");
        assert!(surface.has_secondary());
        assert_eq!(surface.marks_on(AxisId::Secondary).count(), 1);
        assert_eq!(surface.marks_on(AxisId::Primary).count(), 0);
    }

    #[test]
    fn handles_index_marks_in_draw_order() {
        let mut surface = Surface::new(FigureSize::SQUARE);
        let mut view = surface.view(AxisId::Primary);
        let first = view.bar(0.0, 1.0, 0.5, 0.0, "#fbb4ae");
        let second = view.text(0.0, 0.0, "W1", TextStyle::new(10.0));
        assert_eq!((first.index(), second.index()), (0, 1));
        assert!(matches!(
            surface.mark(second).map(|placed| &placed.mark),
            Some(Mark::Text(_))
        ));
    }
}
