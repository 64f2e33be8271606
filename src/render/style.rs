use serde::{Deserialize, Serialize};

use crate::core::title::FontSpec;
use crate::render::Color;

/// Decimal places kept on tick labels, per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundAt {
    pub x: u8,
    pub y: u8,
}

/// Which series glyphs are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphOptions {
    pub show_bubbles: bool,
    pub show_line: bool,
    pub show_points: bool,
    pub round_at: RoundAt,
    /// Draw x tick labels at 45 degrees instead of level.
    pub rotate_x_labels: bool,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            show_bubbles: true,
            show_line: false,
            show_points: false,
            round_at: RoundAt::default(),
            rotate_x_labels: true,
        }
    }
}

/// Resolved drawing style, in device pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartStyle {
    pub background: Color,
    pub axis_color: Color,
    pub title_color: Color,
    pub plot_start: Color,
    pub plot_end: Color,
    pub plot_opacity: f64,
    pub plot_line: Color,
    pub axis_font: FontSpec,
    pub axis_label_font: FontSpec,
    pub title_font: FontSpec,
    pub axis_line_width: f64,
    /// Device pixels per fixed-size decoration pixel.
    pub unit: f64,
    pub graph: GraphOptions,
}

/// Rounds `value` to `decimals` places and formats it without trailing noise.
#[must_use]
pub fn format_tick_value(value: f64, decimals: u8) -> String {
    let factor = 10f64.powi(i32::from(decimals));
    let rounded = (value * factor).round() / factor;
    // Avoid printing "-0".
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{rounded:.prec$}", prec = usize::from(decimals))
}
