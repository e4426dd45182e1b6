//! Projection of a [`Surface`] into a pixel-space [`RenderFrame`].

use crate::core::config::PIXELS_PER_INCH;
use crate::core::{AxisScale, LinearScale, PlotArea, TickFormat, logspace, nice_ticks};
use crate::error::{PlotError, PlotResult};
use crate::render::surface::{
    AreaMark, AxisId, AxisSettings, BarMark, HLineMark, Legend, LegendPlacement, LineMark, Mark,
    Spine, Surface, TextMark,
};
use crate::render::{
    Color, LinePrimitive, MarkerPrimitive, PolygonPrimitive, PolylinePrimitive, Primitive,
    RectPrimitive, RenderFrame, TextHAlign, TextPrimitive, TextVAlign,
};

const POINTS_PER_INCH: f64 = 72.0;
const TICK_LENGTH: f64 = 6.0;
const PAD: f64 = 8.0;
/// Average glyph advance as a fraction of the font size.
const CHAR_ADVANCE: f64 = 0.55;
const AUTO_TICK_TARGET: usize = 5;

const GRID_COLOR: Color = Color::rgba(0.69, 0.69, 0.69, 0.6);

/// Converts a font size in points to pixels.
#[must_use]
pub fn points_to_pixels(points: f64) -> f64 {
    points * PIXELS_PER_INCH / POINTS_PER_INCH
}

/// Estimated rendered width of `text` at `font_px`.
#[must_use]
pub fn estimate_text_width(text: &str, font_px: f64) -> f64 {
    text.chars().count() as f64 * CHAR_ADVANCE * font_px
}

/// Bounding size of a `width` x `height` box rotated by `degrees`.
fn rotated_size(width: f64, height: f64, degrees: f64) -> (f64, f64) {
    let (sin, cos) = degrees.to_radians().sin_cos();
    (
        width * cos.abs() + height * sin.abs(),
        width * sin.abs() + height * cos.abs(),
    )
}

/// Resolved y mapping of one axis view.
#[derive(Debug, Clone)]
struct YAxis<'a> {
    settings: &'a AxisSettings,
    lower: f64,
    upper: f64,
    scale: AxisScale,
    ticks: Vec<(f64, String)>,
}

impl YAxis<'_> {
    fn to_pixel(&self, value: f64, area: PlotArea) -> f64 {
        self.scale.domain_to_pixel(value, area.bottom, area.top)
    }

    fn contains(&self, value: f64) -> bool {
        let epsilon = (self.upper - self.lower).abs() * 1e-9;
        value >= self.lower - epsilon && value <= self.upper + epsilon
    }

    fn tick_label_width(&self) -> f64 {
        let font_px = points_to_pixels(self.settings.tick_font);
        self.ticks
            .iter()
            .map(|(_, label)| estimate_text_width(label, font_px))
            .fold(0.0, f64::max)
    }

    fn label_band(&self) -> f64 {
        self.settings
            .ylabel
            .as_ref()
            .map_or(0.0, |(_, size)| points_to_pixels(*size) * 1.2 + PAD)
    }
}

fn resolve_x_domain(surface: &Surface) -> PlotResult<LinearScale> {
    if let Some((start, end)) = surface.xlim() {
        return LinearScale::new(start, end);
    }

    let mut extent: Option<(f64, f64)> = None;
    let mut widest_bar: f64 = 0.0;
    for placed in surface.marks() {
        if let Mark::Bar(bar) = &placed.mark {
            widest_bar = widest_bar.max(bar.width);
        }
        if let Some((lo, hi)) = placed.mark.x_extent() {
            extent = Some(match extent {
                None => (lo, hi),
                Some((min, max)) => (min.min(lo), max.max(hi)),
            });
        }
    }

    let (lo, hi) = extent.unwrap_or((0.0, 1.0));
    let pad = if widest_bar > 0.0 {
        widest_bar * 0.5
    } else {
        (hi - lo) * 0.05
    };
    let (lo, hi) = if hi - lo + 2.0 * pad <= 0.0 {
        (lo - 0.5, hi + 0.5)
    } else {
        (lo - pad, hi + pad)
    };
    LinearScale::new(lo, hi)
}

fn resolve_y_axis<'a>(settings: &'a AxisSettings, marks: &[&Mark]) -> PlotResult<YAxis<'a>> {
    let extent = marks
        .iter()
        .filter_map(|mark| mark.y_extent())
        .fold(None, |acc: Option<(f64, f64)>, (lo, hi)| match acc {
            None => Some((lo, hi)),
            Some((min, max)) => Some((min.min(lo), max.max(hi))),
        });

    let (data_lo, data_hi) = extent.unwrap_or((0.0, 1.0));
    let mut lower = settings.y_lower.unwrap_or_else(|| data_lo.min(0.0));
    let mut upper = settings
        .y_upper
        .unwrap_or_else(|| data_hi + (data_hi - lower).abs() * 0.05);

    if settings.log_scale {
        let smallest_positive = marks
            .iter()
            .filter_map(|mark| mark.y_extent())
            .map(|(lo, _)| lo)
            .filter(|lo| *lo > 0.0)
            .fold(f64::INFINITY, f64::min);
        if lower <= 0.0 {
            lower = if smallest_positive.is_finite() {
                smallest_positive / 10.0
            } else {
                1e-10
            };
        }
        if upper <= lower {
            upper = lower * 10.0;
        }
    } else if !(upper > lower) {
        upper = lower + 1.0;
    }

    let scale = AxisScale::new(lower, upper, settings.log_scale)?;
    let ticks = match &settings.yticks {
        Some(ticks) => ticks.clone(),
        None => auto_ticks(lower, upper, settings.log_scale, settings.y_format),
    };

    Ok(YAxis {
        settings,
        lower,
        upper,
        scale,
        ticks,
    })
}

fn auto_ticks(
    lower: f64,
    upper: f64,
    log: bool,
    format: Option<TickFormat>,
) -> Vec<(f64, String)> {
    let values = if log {
        let first = lower.log10().ceil() as i32;
        let last = upper.log10().floor() as i32;
        if last >= first {
            (first..=last).map(|exp| 10f64.powi(exp)).collect()
        } else {
            logspace(lower, upper, 2)
        }
    } else {
        nice_ticks(lower, upper, AUTO_TICK_TARGET)
    };
    values
        .into_iter()
        .map(|value| {
            let label = format.map_or_else(|| format_auto(value), |format| format.format(value));
            (value, label)
        })
        .collect()
}

fn format_auto(value: f64) -> String {
    if value == 0.0 {
        return "0".to_owned();
    }
    if (value - value.round()).abs() < 1e-9 && value.abs() < 1e15 {
        return format!("{}", value.round() as i64);
    }
    let text = format!("{value:.3}");
    text.trim_end_matches('0').trim_end_matches('.').to_owned()
}

fn parse_color(value: &str) -> PlotResult<Color> {
    Color::parse(value)
}

/// Lays out `surface` on its figure-sized canvas.
///
/// Decorations (tick labels, axis labels, category labels) are reserved inside
/// the `tight_rect` region; a legend anchored outside the figure grows the
/// canvas instead.
pub(crate) fn layout_surface(surface: &Surface) -> PlotResult<RenderFrame> {
    let viewport = surface.size().viewport();
    if !viewport.is_valid() {
        return Err(PlotError::InvalidData(format!(
            "figure size must be positive, got {}x{} in",
            surface.size().width,
            surface.size().height
        )));
    }
    let width = f64::from(viewport.width);
    let height = f64::from(viewport.height);

    let primary_settings = surface
        .axis(AxisId::Primary)
        .ok_or_else(|| PlotError::InvalidData("surface has no primary axis".to_owned()))?;
    let primary_marks: Vec<&Mark> = surface.marks_on(AxisId::Primary).collect();
    let primary = resolve_y_axis(primary_settings, &primary_marks)?;
    let secondary = match surface.axis(AxisId::Secondary) {
        Some(settings) => {
            let marks: Vec<&Mark> = surface.marks_on(AxisId::Secondary).collect();
            Some(resolve_y_axis(settings, &marks)?)
        }
        None => None,
    };
    let x_scale = resolve_x_domain(surface)?;
    let x_ticks: Vec<f64> = if primary_settings.show_xticks {
        let (lo, hi) = x_scale.domain();
        nice_ticks(lo.min(hi), lo.max(hi), AUTO_TICK_TARGET)
    } else {
        Vec::new()
    };

    let (rect_left, rect_bottom, rect_right, rect_top) = surface.tight_rect();
    let region = PlotArea::new(
        rect_left * width,
        (1.0 - rect_top) * height,
        rect_right * width,
        (1.0 - rect_bottom) * height,
    );

    let tick_px = points_to_pixels(primary_settings.tick_font);
    let left_margin = PAD + primary.label_band() + primary.tick_label_width() + TICK_LENGTH + 4.0;
    let right_margin = match &secondary {
        Some(axis) => PAD + axis.label_band() + axis.tick_label_width() + TICK_LENGTH + 4.0,
        None => PAD * 2.0,
    };
    let xtick_band = if x_ticks.is_empty() {
        0.0
    } else {
        TICK_LENGTH + 4.0 + tick_px * 1.2
    };
    let category_band = surface
        .texts()
        .filter(|text| text.style.v_align == TextVAlign::Top)
        .map(|text| {
            let font_px = points_to_pixels(text.style.font_size);
            let (_, band) = rotated_size(
                estimate_text_width(&text.text, font_px),
                font_px * 1.2,
                text.style.rotation,
            );
            band + 4.0
        })
        .fold(0.0, f64::max);
    let xlabel_band = primary_settings
        .xlabel
        .as_ref()
        .map_or(0.0, |(_, size)| points_to_pixels(*size) * 1.3);
    let bottom_margin = PAD + xtick_band.max(category_band) + xlabel_band;
    let top_margin = PAD + tick_px * 0.6;

    let area = PlotArea::new(
        region.left + left_margin,
        region.top + top_margin,
        region.right - right_margin,
        region.bottom - bottom_margin,
    );
    if !area.is_valid() {
        return Err(PlotError::InvalidData(
            "figure is too small for its axis decorations".to_owned(),
        ));
    }

    let x_px = |value: f64| x_scale.domain_to_pixel(value, area.left, area.right);
    let mut frame = RenderFrame::new(viewport);
    frame.push(Primitive::Rect(RectPrimitive::new(0.0, 0.0, width, height, Color::WHITE)));

    for axis in std::iter::once(&primary).chain(secondary.iter()) {
        if !axis.settings.y_grid {
            continue;
        }
        for (value, _) in axis.ticks.iter().filter(|(value, _)| axis.contains(*value)) {
            let y = axis.to_pixel(*value, area);
            frame.push(Primitive::Line(
                LinePrimitive::new(area.left, y, area.right, y, 0.8, GRID_COLOR).dashed(),
            ));
        }
    }

    let mut primitives = Vec::new();
    for placed in surface.marks() {
        let y_axis = match placed.axis {
            AxisId::Primary => &primary,
            AxisId::Secondary => secondary.as_ref().unwrap_or(&primary),
        };
        let y_px = |value: f64| y_axis.to_pixel(value, area);
        match &placed.mark {
            Mark::Bar(bar) => push_bar(&mut primitives, bar, &x_px, &y_px, area)?,
            Mark::Line(line) => push_line(&mut primitives, line, &x_px, &y_px)?,
            Mark::Area(curve) => push_area(&mut primitives, curve, &x_px, &y_px, y_axis)?,
            Mark::Text(text) => push_text(&mut primitives, text, &x_px, &y_px)?,
            Mark::HLine(line) => push_hline(&mut primitives, line, y_axis, area)?,
        }
    }
    for primitive in primitives {
        frame.push(primitive);
    }

    push_spines(
        &mut frame,
        primary_settings,
        secondary.as_ref().map(|axis| axis.settings),
        area,
    );
    push_y_ticks(&mut frame, &primary, area, area.left, TextHAlign::Right);
    if let Some(axis) = &secondary {
        push_y_ticks(&mut frame, axis, area, area.right, TextHAlign::Left);
    }
    for value in &x_ticks {
        let x = x_px(*value);
        frame.push(Primitive::Line(LinePrimitive::new(
            x,
            area.bottom,
            x,
            area.bottom + TICK_LENGTH,
            1.0,
            Color::BLACK,
        )));
        frame.push(Primitive::Text(
            TextPrimitive::new(
                format_auto(*value),
                x,
                area.bottom + TICK_LENGTH + 4.0,
                tick_px,
                Color::BLACK,
                TextHAlign::Center,
            )
            .with_v_align(TextVAlign::Top),
        ));
    }

    let non_empty = |label: &&(String, f64)| !label.0.is_empty();
    if let Some((label, size)) = primary_settings.ylabel.as_ref().filter(non_empty) {
        let font_px = points_to_pixels(*size);
        frame.push(Primitive::Text(
            TextPrimitive::new(
                label.clone(),
                area.left - TICK_LENGTH - 4.0 - primary.tick_label_width() - PAD,
                (area.top + area.bottom) * 0.5,
                font_px,
                Color::BLACK,
                TextHAlign::Center,
            )
            .with_v_align(TextVAlign::Baseline)
            .with_rotation(90.0),
        ));
    }
    if let Some(axis) = &secondary {
        if let Some((label, size)) = axis.settings.ylabel.as_ref().filter(non_empty) {
            let font_px = points_to_pixels(*size);
            frame.push(Primitive::Text(
                TextPrimitive::new(
                    label.clone(),
                    area.right + TICK_LENGTH + 4.0 + axis.tick_label_width() + PAD + font_px,
                    (area.top + area.bottom) * 0.5,
                    font_px,
                    Color::BLACK,
                    TextHAlign::Center,
                )
                .with_rotation(90.0),
            ));
        }
    }
    if let Some((label, size)) = primary_settings.xlabel.as_ref().filter(non_empty) {
        frame.push(Primitive::Text(
            TextPrimitive::new(
                label.clone(),
                (area.left + area.right) * 0.5,
                area.bottom + xtick_band.max(category_band) + 2.0,
                points_to_pixels(*size),
                Color::BLACK,
                TextHAlign::Center,
            )
            .with_v_align(TextVAlign::Top),
        ));
    }

    if let Some(legend) = surface.legend().filter(|legend| !legend.entries.is_empty()) {
        push_legend(&mut frame, surface, legend, area)?;
    }

    frame.validate()?;
    Ok(frame)
}

fn push_bar(
    out: &mut Vec<Primitive>,
    bar: &BarMark,
    x_px: &dyn Fn(f64) -> f64,
    y_px: &dyn Fn(f64) -> f64,
    area: PlotArea,
) -> PlotResult<()> {
    if !bar.height.is_finite() || !bar.bottom.is_finite() {
        return Ok(());
    }
    let left = x_px(bar.x - bar.width * 0.5);
    let right = x_px(bar.x + bar.width * 0.5);
    let base = y_px(bar.bottom).clamp(area.top, area.bottom);
    let tip = y_px(bar.bottom + bar.height).clamp(area.top, area.bottom);
    let rect = RectPrimitive::new(
        left.min(right),
        base.min(tip),
        (right - left).abs(),
        (tip - base).abs(),
        parse_color(&bar.fill)?,
    )
    .with_border(points_to_pixels(bar.edge_width), parse_color(&bar.edge)?);
    out.push(Primitive::Rect(rect));
    Ok(())
}

fn push_line(
    out: &mut Vec<Primitive>,
    line: &LineMark,
    x_px: &dyn Fn(f64) -> f64,
    y_px: &dyn Fn(f64) -> f64,
) -> PlotResult<()> {
    let color = parse_color(&line.color)?;
    let stroke_width = points_to_pixels(line.width);
    let mut run: Vec<(f64, f64)> = Vec::new();
    let mut markers = Vec::new();
    let flush = |run: &mut Vec<(f64, f64)>, out: &mut Vec<Primitive>| {
        if run.len() >= 2 {
            out.push(Primitive::Polyline(PolylinePrimitive {
                points: std::mem::take(run),
                stroke_width,
                color,
            }));
        } else {
            run.clear();
        }
    };

    for (x, y) in line.xs.iter().zip(&line.ys) {
        if x.is_finite() && y.is_finite() {
            let point = (x_px(*x), y_px(*y));
            run.push(point);
            markers.push(point);
        } else {
            flush(&mut run, out);
        }
    }
    flush(&mut run, out);

    if let Some(shape) = line.marker {
        let size = points_to_pixels(line.marker_size);
        out.extend(markers.into_iter().map(|(x, y)| {
            Primitive::Marker(MarkerPrimitive {
                x,
                y,
                size,
                shape,
                color,
            })
        }));
    }
    Ok(())
}

fn push_area(
    out: &mut Vec<Primitive>,
    curve: &AreaMark,
    x_px: &dyn Fn(f64) -> f64,
    y_px: &dyn Fn(f64) -> f64,
    y_axis: &YAxis<'_>,
) -> PlotResult<()> {
    let color = parse_color(&curve.color)?;
    let points: Vec<(f64, f64)> = curve
        .xs
        .iter()
        .zip(&curve.ys)
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .map(|(x, y)| (x_px(*x), y_px(*y)))
        .collect();
    if points.len() < 2 {
        return Ok(());
    }

    if curve.fill {
        let baseline = y_px(y_axis.lower.max(0.0));
        let mut outline = points.clone();
        if let (Some(first), Some(last)) = (points.first(), points.last()) {
            outline.push((last.0, baseline));
            outline.push((first.0, baseline));
        }
        out.push(Primitive::Polygon(PolygonPrimitive {
            points: outline,
            fill_color: Some(color.with_alpha(curve.alpha.clamp(0.0, 1.0))),
            stroke_color: color.with_alpha(0.0),
            stroke_width: 0.0,
        }));
    }
    out.push(Primitive::Polyline(PolylinePrimitive {
        points,
        stroke_width: points_to_pixels(1.5),
        color,
    }));
    Ok(())
}

fn push_text(
    out: &mut Vec<Primitive>,
    text: &TextMark,
    x_px: &dyn Fn(f64) -> f64,
    y_px: &dyn Fn(f64) -> f64,
) -> PlotResult<()> {
    if text.text.is_empty() || !text.x.is_finite() || !text.y.is_finite() {
        return Ok(());
    }
    out.push(Primitive::Text(
        TextPrimitive::new(
            text.text.clone(),
            x_px(text.x),
            y_px(text.y),
            points_to_pixels(text.style.font_size),
            parse_color(&text.style.color)?,
            text.style.h_align,
        )
        .with_v_align(text.style.v_align)
        .with_rotation(text.style.rotation),
    ));
    Ok(())
}

fn push_hline(
    out: &mut Vec<Primitive>,
    line: &HLineMark,
    y_axis: &YAxis<'_>,
    area: PlotArea,
) -> PlotResult<()> {
    if !line.y.is_finite() || !y_axis.contains(line.y) {
        return Ok(());
    }
    let y = y_axis.to_pixel(line.y, area);
    let mut primitive = LinePrimitive::new(
        area.left,
        y,
        area.right,
        y,
        points_to_pixels(line.width),
        parse_color(&line.color)?,
    );
    if line.dashed {
        primitive = primitive.dashed();
    }
    out.push(Primitive::Line(primitive));
    Ok(())
}

fn push_spines(
    frame: &mut RenderFrame,
    primary: &AxisSettings,
    secondary: Option<&AxisSettings>,
    area: PlotArea,
) {
    let visible = |spine: Spine| {
        primary.spine_visible(spine) || secondary.is_some_and(|axis| axis.spine_visible(spine))
    };
    let width = |spine: Spine| {
        let owner = match (spine, secondary) {
            (Spine::Right, Some(axis)) if axis.spine_visible(Spine::Right) => axis,
            _ => primary,
        };
        points_to_pixels(owner.spine_width)
    };

    let edges = [
        (Spine::Left, (area.left, area.top, area.left, area.bottom)),
        (Spine::Bottom, (area.left, area.bottom, area.right, area.bottom)),
        (Spine::Right, (area.right, area.top, area.right, area.bottom)),
        (Spine::Top, (area.left, area.top, area.right, area.top)),
    ];
    for (spine, (x1, y1, x2, y2)) in edges {
        if visible(spine) {
            frame.push(Primitive::Line(LinePrimitive::new(
                x1,
                y1,
                x2,
                y2,
                width(spine),
                Color::BLACK,
            )));
        }
    }
}

fn push_y_ticks(
    frame: &mut RenderFrame,
    axis: &YAxis<'_>,
    area: PlotArea,
    edge: f64,
    align: TextHAlign,
) {
    let font_px = points_to_pixels(axis.settings.tick_font);
    let direction = if align == TextHAlign::Right { -1.0 } else { 1.0 };
    for (value, label) in axis.ticks.iter().filter(|(value, _)| axis.contains(*value)) {
        let y = axis.to_pixel(*value, area);
        frame.push(Primitive::Line(LinePrimitive::new(
            edge,
            y,
            edge + direction * TICK_LENGTH,
            y,
            1.0,
            Color::BLACK,
        )));
        if label.is_empty() {
            continue;
        }
        frame.push(Primitive::Text(
            TextPrimitive::new(
                label.clone(),
                edge + direction * (TICK_LENGTH + 4.0),
                y,
                font_px,
                Color::BLACK,
                align,
            )
            .with_v_align(TextVAlign::Middle),
        ));
    }
}

fn push_legend(
    frame: &mut RenderFrame,
    surface: &Surface,
    legend: &Legend,
    area: PlotArea,
) -> PlotResult<()> {
    let font_px = points_to_pixels(legend.style.font_size);
    let columns = legend.columns();
    let rows = legend.entries.len().div_ceil(columns);
    let swatch = (font_px * 1.6, font_px * 0.7);
    let gap = font_px * 0.5;
    let label_width = legend
        .entries
        .iter()
        .map(|entry| estimate_text_width(&entry.label, font_px))
        .fold(0.0, f64::max);
    let column_width = swatch.0 + gap + label_width + font_px;
    let row_height = font_px * 1.4;
    let padding = font_px * 0.4;
    let box_width = columns as f64 * column_width + 2.0 * padding;
    let box_height = rows as f64 * row_height + 2.0 * padding;

    let (frac_x, frac_y) = legend.style.location.box_fraction();
    let (anchor_x, anchor_y) = match legend.style.placement {
        LegendPlacement::Figure { anchor } => (
            anchor.0 * f64::from(frame.viewport.width),
            (1.0 - anchor.1) * f64::from(frame.viewport.height),
        ),
        LegendPlacement::Axes => {
            let anchor = legend.style.location.inner_anchor();
            (
                area.left + anchor.0 * area.width(),
                area.bottom - anchor.1 * area.height(),
            )
        }
    };
    let left = anchor_x - frac_x * box_width;
    let top = anchor_y - frac_y * box_height;

    let mut items = Vec::new();
    if legend.style.frame {
        items.push(Primitive::Rect(
            RectPrimitive::new(left, top, box_width, box_height, Color::WHITE.with_alpha(0.8))
                .with_border(1.0, Color::rgb(0.8, 0.8, 0.8)),
        ));
    }
    for (position, entry) in legend.entries.iter().enumerate() {
        let column = position % columns;
        let row = position / columns;
        let cell_left = left + padding + column as f64 * column_width;
        let center_y = top + padding + row as f64 * row_height + row_height * 0.5;
        let placed = surface.mark(entry.handle).ok_or_else(|| {
            PlotError::InvalidData(format!("legend handle {} has no mark", entry.handle.index()))
        })?;
        push_swatch(&mut items, &placed.mark, cell_left, center_y, swatch)?;
        if !entry.label.is_empty() {
            items.push(Primitive::Text(
                TextPrimitive::new(
                    entry.label.clone(),
                    cell_left + swatch.0 + gap,
                    center_y,
                    font_px,
                    Color::BLACK,
                    TextHAlign::Left,
                )
                .with_v_align(TextVAlign::Middle),
            ));
        }
    }
    for item in items {
        frame.push(item);
    }

    let canvas_width = f64::from(frame.viewport.width);
    let canvas_height = f64::from(frame.viewport.height);
    frame.expand(
        -left + PAD * 0.5,
        -top + PAD * 0.5,
        left + box_width - canvas_width + PAD * 0.5,
        top + box_height - canvas_height + PAD * 0.5,
    );
    Ok(())
}

fn push_swatch(
    out: &mut Vec<Primitive>,
    mark: &Mark,
    left: f64,
    center_y: f64,
    (width, height): (f64, f64),
) -> PlotResult<()> {
    match mark {
        Mark::Bar(bar) => {
            let fill = parse_color(&bar.fill)?;
            out.push(Primitive::Rect(
                RectPrimitive::new(left, center_y - height * 0.5, width, height, fill)
                    .with_border(points_to_pixels(bar.edge_width), parse_color(&bar.edge)?),
            ));
        }
        Mark::Line(line) => {
            let color = parse_color(&line.color)?;
            out.push(Primitive::Line(LinePrimitive::new(
                left,
                center_y,
                left + width,
                center_y,
                points_to_pixels(line.width),
                color,
            )));
            if let Some(shape) = line.marker {
                out.push(Primitive::Marker(MarkerPrimitive {
                    x: left + width * 0.5,
                    y: center_y,
                    size: points_to_pixels(line.marker_size),
                    shape,
                    color,
                }));
            }
        }
        Mark::Area(curve) => {
            let color = parse_color(&curve.color)?;
            let fill = if curve.fill {
                color.with_alpha(curve.alpha.clamp(0.0, 1.0))
            } else {
                Color::WHITE.with_alpha(0.0)
            };
            out.push(Primitive::Rect(
                RectPrimitive::new(left, center_y - height * 0.5, width, height, fill)
                    .with_border(points_to_pixels(1.5), color),
            ));
        }
        Mark::HLine(line) => out.push(Primitive::Line(LinePrimitive::new(
            left,
            center_y,
            left + width,
            center_y,
            points_to_pixels(line.width),
            parse_color(&line.color)?,
        ))),
        Mark::Text(_) => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{estimate_text_width, format_auto, points_to_pixels, rotated_size};
    use crate::core::{FigureSize, LegendLocation};
    use crate::render::surface::{Legend, LegendEntry, LegendPlacement, LegendStyle, Surface};
    use crate::render::{AxisId, Primitive};

    #[test]
    fn points_convert_at_figure_resolution() {
        assert!((points_to_pixels(72.0) - 100.0).abs() < 1e-12);
        assert!((estimate_text_width("abcd", 10.0) - 22.0).abs() < 1e-12);
    }

    #[test]
    fn rotation_swaps_extents_at_right_angles() {
        let (w, h) = rotated_size(100.0, 10.0, 90.0);
        assert!((w - 10.0).abs() < 1e-9);
        assert!((h - 100.0).abs() < 1e-9);
    }

    #[test]
    fn auto_labels_drop_trailing_zeros() {
        assert_eq!(format_auto(2.0), "2");
        assert_eq!(format_auto(0.25), "0.25");
        assert_eq!(format_auto(0.0), "0");
    }

    #[test]
    fn secondary_ticks_sit_right_of_plot_area() {
        let mut surface = Surface::new(FigureSize::FULL_WIDTH);
        surface.view(AxisId::Primary).bar(0.0, 4.0, 0.5, 0.0, "#fbb4ae");
        let mut view = surface.view(AxisId::Secondary);
        view.set_ylim(0.0, Some(1.0));
        view.set_yticks(vec![(0.5, "half".to_owned())]);
        let frame = surface.layout().expect("layout");
        let half = frame
            .texts()
            .into_iter()
            .find(|text| text.text == "half")
            .expect("secondary tick label");
        let first_bar = frame.rects()[1];
        assert!(half.x > first_bar.x + first_bar.width);
    }

    #[test]
    fn legend_below_figure_grows_canvas() {
        let mut surface = Surface::new(FigureSize::HALF_WIDTH);
        let handle = surface.view(AxisId::Primary).bar(0.0, 1.0, 0.5, 0.0, "#b3e2cd");
        surface.set_legend(Legend::new(
            vec![LegendEntry::new(handle, "Method A")],
            LegendStyle {
                location: LegendLocation::LowerCenter,
                placement: LegendPlacement::Figure { anchor: (0.5, -0.1) },
                ncol: None,
                font_size: 20.0,
                frame: false,
            },
        ));
        let frame = surface.layout().expect("layout");
        assert!(frame.viewport.height > 450);
        assert!(frame
            .primitives
            .iter()
            .any(|primitive| matches!(primitive, Primitive::Text(text) if text.text == "Method A")));
    }
}
