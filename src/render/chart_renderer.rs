use std::f64::consts::FRAC_PI_4;

use tracing::debug;

use crate::core::dataset::PlotData;
use crate::core::layout::DataLayout;
use crate::core::plan::LayoutPlan;
use crate::core::types::DataPoint;
use crate::error::ChartResult;
use crate::render::style::format_tick_value;
use crate::render::{
    ChartStyle, ClipRect, Color, DrawCommand, DrawSurface, FillStyle, LineCap, LineJoin,
    PathPrimitive, RectPrimitive, RenderFrame, RenderLayer, RenderStats, Shadow, StrokeStyle,
    TextHAlign, TextPrimitive,
};

const NOTCH_HALF_LENGTH: f64 = 6.0;
const Y_NOTCH_HALF_LENGTH: f64 = 5.0;
const ARROW_SIZE: f64 = 5.0;
const X_AXIS_OVERSHOOT: f64 = 15.0;
const LABEL_OFFSET: f64 = 15.0;
const Y_LABEL_BASELINE_SHIFT: f64 = 5.0;
const POINT_RADIUS: f64 = 3.0;
const SERIES_LINE_WIDTH: f64 = 2.0;

/// Linear RGB gradient from `start` to `end` over `count` points.
///
/// Channels are interpolated on the 0..=255 scale and floored. A single point
/// gets `start` exactly.
#[must_use]
pub fn plot_colors(count: usize, start: Color, end: Color, opacity: f64) -> Vec<Color> {
    let from = start.to_rgb8().map(f64::from);
    let to = end.to_rgb8().map(f64::from);
    let alpha = opacity.clamp(0.0, 1.0);
    let steps = count.saturating_sub(1);

    (0..count)
        .map(|index| {
            if steps == 0 {
                return start.with_alpha(alpha);
            }
            let t = index as f64 / steps as f64;
            let [red, green, blue] =
                [0, 1, 2].map(|c| ((to[c] - from[c]) * t + from[c]).floor().clamp(0.0, 255.0));
            Color::rgba(red / 255.0, green / 255.0, blue / 255.0, alpha)
        })
        .collect()
}

/// Builds the ordered draw commands for one pass. Never mutates `data`.
#[must_use]
pub fn build_frame(data: &PlotData, plan: &LayoutPlan, style: &ChartStyle) -> RenderFrame {
    let mut frame = RenderFrame::new(plan.viewport);

    frame.push(
        RenderLayer::Background,
        DrawCommand::FillRect(RectPrimitive::new(
            0.0,
            0.0,
            plan.viewport.width,
            plan.viewport.height,
            style.background,
        )),
    );

    if let Some(layout) = &plan.data {
        let points: Vec<DataPoint> = data.plottable_points().collect();
        push_series(&mut frame, layout, &points, style);
        push_notation(&mut frame, layout, style);
    }
    push_axes(&mut frame, plan, style);
    push_labels(&mut frame, data, plan, style);
    push_title(&mut frame, plan, style);

    frame
}

/// Builds the frame for `plan` and replays it on `surface`.
pub fn render<S: DrawSurface + ?Sized>(
    surface: &mut S,
    data: &PlotData,
    plan: &LayoutPlan,
    style: &ChartStyle,
) -> ChartResult<RenderStats> {
    let frame = build_frame(data, plan, style);
    let stats = frame.replay(surface)?;
    debug!(
        commands = frame.len(),
        rects = stats.rects_drawn,
        strokes = stats.paths_stroked,
        fills = stats.paths_filled,
        texts = stats.texts_drawn,
        "frame rendered"
    );
    Ok(stats)
}

fn push_series(frame: &mut RenderFrame, layout: &DataLayout, points: &[DataPoint], style: &ChartStyle) {
    if points.is_empty() {
        return;
    }
    let unit = style.unit;
    let graph = style.graph;
    let axes = layout.frame;

    frame.push(RenderLayer::Series, DrawCommand::Save);
    frame.push(
        RenderLayer::Series,
        DrawCommand::Clip(ClipRect {
            x: axes.min_x(),
            y: axes.top_y(),
            width: axes.x_extent(),
            height: axes.bottom_y() - axes.top_y(),
        }),
    );

    if graph.show_bubbles {
        let colors = plot_colors(points.len(), style.plot_start, style.plot_end, style.plot_opacity);
        for (point, color) in points.iter().zip(colors) {
            let bubble = PathPrimitive::new().circle(
                layout.x_to_px(point.x),
                axes.mid_y(),
                layout.y_offset_px(point.y),
            );
            frame.push(
                RenderLayer::Series,
                DrawCommand::FillPath {
                    path: bubble,
                    style: FillStyle::solid(color),
                },
            );
        }
    }

    if graph.show_line && points.len() > 1 {
        let path = points.iter().enumerate().fold(PathPrimitive::new(), |path, (index, point)| {
            let px = layout.point_to_px(point.x, point.y);
            if index == 0 {
                path.move_to(px.x, px.y)
            } else {
                path.line_to(px.x, px.y)
            }
        });
        frame.push(
            RenderLayer::Series,
            DrawCommand::StrokePath {
                path,
                style: StrokeStyle::new(style.plot_line, SERIES_LINE_WIDTH * unit)
                    .with_join(LineJoin::Round)
                    .with_shadow(Shadow::soft(unit)),
            },
        );
    }

    if graph.show_points {
        let path = points.iter().fold(PathPrimitive::new(), |path, point| {
            let px = layout.point_to_px(point.x, point.y);
            path.circle(px.x, px.y, POINT_RADIUS * unit)
        });
        frame.push(
            RenderLayer::Series,
            DrawCommand::FillPath {
                path,
                style: FillStyle::solid(style.plot_line).with_shadow(Shadow::soft(unit)),
            },
        );
    }

    frame.push(RenderLayer::Series, DrawCommand::Restore);
}

fn push_axes(frame: &mut RenderFrame, plan: &LayoutPlan, style: &ChartStyle) {
    let unit = style.unit;
    let axes = plan.axis_points;
    let arrow = ARROW_SIZE * unit;
    let stroke = StrokeStyle::new(style.axis_color, style.axis_line_width)
        .with_cap(LineCap::Round)
        .with_shadow(Shadow::soft(unit));

    let (min_x, max_x, mid_y) = (axes.min_x(), axes.max_x(), axes.mid_y());
    let x_axis = PathPrimitive::new()
        .segment(min_x - X_AXIS_OVERSHOOT * unit, mid_y, max_x, mid_y)
        .move_to(max_x - arrow, mid_y - arrow)
        .line_to(max_x, mid_y)
        .line_to(max_x - arrow, mid_y + arrow);

    let (top_y, bottom_y) = (axes.top_y(), axes.bottom_y());
    let y_axis = PathPrimitive::new()
        .segment(min_x, top_y, min_x, bottom_y)
        .move_to(min_x - arrow, top_y + arrow)
        .line_to(min_x, top_y)
        .line_to(min_x + arrow, top_y + arrow);

    for path in [x_axis, y_axis] {
        frame.push(
            RenderLayer::Axes,
            DrawCommand::StrokePath {
                path,
                style: stroke,
            },
        );
    }
}

fn push_notation(frame: &mut RenderFrame, layout: &DataLayout, style: &ChartStyle) {
    let unit = style.unit;
    let axes = layout.frame;
    let shadow = Shadow::soft(unit);
    let font = &style.axis_font;
    let round_at = style.graph.round_at;
    let (min_x, mid_y) = (axes.min_x(), axes.mid_y());

    let mut x_notches = PathPrimitive::new();
    for (value, offset) in layout.x.notches() {
        let x = min_x + offset;
        x_notches = x_notches.segment(
            x,
            mid_y - NOTCH_HALF_LENGTH * unit,
            x,
            mid_y + NOTCH_HALF_LENGTH * unit,
        );

        let label = TextPrimitive::new(
            format_tick_value(value, round_at.x),
            x,
            mid_y + 2.0 * font.size_px,
            font.clone(),
            style.axis_color,
            if style.graph.rotate_x_labels {
                TextHAlign::Right
            } else {
                TextHAlign::Center
            },
        )
        .with_shadow(shadow);
        let label = if style.graph.rotate_x_labels {
            label.rotated(FRAC_PI_4)
        } else {
            label
        };
        frame.push(RenderLayer::Notation, DrawCommand::FillText(label));
    }

    let mut y_notches = PathPrimitive::new();
    let label_x = min_x - font.size_px;
    for (value, offset) in layout.y.notches() {
        let text = format_tick_value(value, round_at.y);
        for y in [mid_y - offset, mid_y + offset] {
            y_notches = y_notches.segment(
                min_x - Y_NOTCH_HALF_LENGTH * unit,
                y,
                min_x + Y_NOTCH_HALF_LENGTH * unit,
                y,
            );
            frame.push(
                RenderLayer::Notation,
                DrawCommand::FillText(
                    TextPrimitive::new(
                        text.clone(),
                        label_x,
                        y + Y_LABEL_BASELINE_SHIFT * unit,
                        font.clone(),
                        style.axis_color,
                        TextHAlign::Right,
                    )
                    .with_shadow(shadow),
                ),
            );
        }
    }

    let stroke = StrokeStyle::new(style.axis_color, unit).with_shadow(shadow);
    for path in [x_notches, y_notches] {
        if !path.is_empty() {
            frame.push(
                RenderLayer::Notation,
                DrawCommand::StrokePath {
                    path,
                    style: stroke,
                },
            );
        }
    }
}

fn push_labels(frame: &mut RenderFrame, data: &PlotData, plan: &LayoutPlan, style: &ChartStyle) {
    let unit = style.unit;
    let axes = plan.axis_points;
    let font = &style.axis_label_font;

    let labels = [
        (
            data.x_label(),
            axes.max_x(),
            axes.mid_y() - LABEL_OFFSET * unit,
            TextHAlign::Right,
        ),
        (
            data.y_label(),
            LABEL_OFFSET * unit,
            axes.bottom_y() + font.size_px,
            TextHAlign::Left,
        ),
    ];
    for (text, x, y, h_align) in labels {
        if text.trim().is_empty() {
            continue;
        }
        frame.push(
            RenderLayer::Labels,
            DrawCommand::FillText(TextPrimitive::new(
                text,
                x,
                y,
                font.clone(),
                style.axis_color,
                h_align,
            )),
        );
    }
}

fn push_title(frame: &mut RenderFrame, plan: &LayoutPlan, style: &ChartStyle) {
    let x = plan.axis_points.mid_x();
    for (line, y) in plan.title.lines.iter().zip(plan.title_baselines()) {
        frame.push(
            RenderLayer::Title,
            DrawCommand::FillText(TextPrimitive::new(
                line.as_str(),
                x,
                y,
                plan.title.font.clone(),
                style.title_color,
                TextHAlign::Center,
            )),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::plot_colors;
    use crate::render::Color;

    #[test]
    fn single_point_gets_the_start_color() {
        let start = Color::from_rgb8(0, 85, 255);
        let colors = plot_colors(1, start, Color::from_rgb8(255, 0, 85), 0.35);
        assert_eq!(colors, vec![start.with_alpha(0.35)]);
    }

    #[test]
    fn gradient_spans_start_to_end() {
        let colors = plot_colors(3, Color::from_rgb8(255, 0, 0), Color::from_rgb8(0, 0, 255), 1.0);
        assert_eq!(colors.len(), 3);
        assert_eq!(colors[0].to_rgb8(), [255, 0, 0]);
        assert_eq!(colors[1].to_rgb8(), [127, 0, 127]);
        assert_eq!(colors[2].to_rgb8(), [0, 0, 255]);
    }

    #[test]
    fn no_points_no_colors() {
        assert!(plot_colors(0, Color::BLACK, Color::BLACK, 1.0).is_empty());
    }
}
