use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::plan::LayoutSettings;
use crate::core::title::FontSpec;
use crate::core::types::{DeviceViewport, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::render::{ChartStyle, Color, GraphOptions};

/// Substitute for a malformed gradient start color.
pub const FALLBACK_PLOT_START: &str = "#FF0000";
/// Substitute for a malformed gradient end color.
pub const FALLBACK_PLOT_END: &str = "#0000FF";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    pub background: String,
    pub axis: String,
    pub title: String,
    pub plot_start: String,
    pub plot_end: String,
    pub plot_opacity: f64,
    /// Connecting line and point markers.
    pub plot_line: String,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            background: "#f0f0f0".to_owned(),
            axis: "#000".to_owned(),
            title: "#000".to_owned(),
            plot_start: "#0055FF".to_owned(),
            plot_end: "#FF0055".to_owned(),
            plot_opacity: 0.35,
            plot_line: "#000".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    pub face: String,
    pub axis_size: f64,
    pub axis_label_size: f64,
    pub title_size: f64,
    /// Extra multiplier applied to text only.
    pub scale_factor: f64,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            face: "'Open Sans', sans-serif".to_owned(),
            axis_size: 11.0,
            axis_label_size: 16.0,
            title_size: 28.0,
            scale_factor: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub padding: f64,
    pub axis_line_width: f64,
    pub min_tick_spacing_x: f64,
    pub min_tick_spacing_y: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            padding: 40.0,
            axis_line_width: 2.0,
            min_tick_spacing_x: 50.0,
            min_tick_spacing_y: 30.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub device_pixel_ratio: f64,
    /// Multiplier on every drawn element.
    pub scale_all: f64,
    pub resize_quiet_window_ms: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            device_pixel_ratio: 1.0,
            scale_all: 1.0,
            resize_quiet_window_ms: 100,
        }
    }
}

/// Host-provided chart configuration.
///
/// Every section is optional in serialized form; missing keys take their
/// defaults and unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub colors: ColorConfig,
    pub font: FontConfig,
    pub layout: LayoutConfig,
    pub display: DisplayConfig,
    pub graph: GraphOptions,
}

impl ChartConfig {
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidConfig(format!("failed to parse chart config json: {e}")))
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            ChartError::InvalidConfig(format!("failed to serialize chart config json: {e}"))
        })
    }

    #[must_use]
    pub fn resize_quiet_window(&self) -> Duration {
        Duration::from_millis(self.display.resize_quiet_window_ms)
    }
}

/// Config with every derived value computed, in device pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub viewport: Viewport,
    pub device_viewport: DeviceViewport,
    pub device_pixel_ratio: f64,
    pub padding: f64,
    pub min_tick_spacing_x: f64,
    pub min_tick_spacing_y: f64,
    pub resize_quiet_window: Duration,
    pub style: ChartStyle,
}

impl ResolvedConfig {
    #[must_use]
    pub fn layout_settings(&self) -> LayoutSettings {
        LayoutSettings {
            viewport: self.device_viewport,
            padding: self.padding,
            title_font: self.style.title_font.clone(),
            min_tick_spacing_x: self.min_tick_spacing_x,
            min_tick_spacing_y: self.min_tick_spacing_y,
        }
    }
}

/// Resolved config plus every substitution made while resolving it.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigResolution {
    pub config: ResolvedConfig,
    pub warnings: Vec<ChartError>,
}

/// Derives device-pixel values from `raw` for `viewport`.
///
/// Malformed values never fail resolution: each one is replaced by a safe
/// default and reported in [`ConfigResolution::warnings`].
#[must_use]
pub fn resolve_config(raw: &ChartConfig, viewport: Viewport) -> ConfigResolution {
    let mut warnings = Vec::new();
    let defaults = ColorConfig::default();

    let ratio = positive_or_one("display.device_pixel_ratio", raw.display.device_pixel_ratio, &mut warnings);
    let scale_all = positive_or_one("display.scale_all", raw.display.scale_all, &mut warnings);
    let text_scale = positive_or_one("font.scale_factor", raw.font.scale_factor, &mut warnings);
    let unit = ratio * scale_all;
    let font_unit = unit * text_scale;

    let mut color = |field: &'static str, value: &str, fallback: &str| {
        parse_color(field, value, fallback, &mut warnings)
    };
    let background = color("colors.background", &raw.colors.background, &defaults.background);
    let axis_color = color("colors.axis", &raw.colors.axis, &defaults.axis);
    let title_color = color("colors.title", &raw.colors.title, &defaults.title);
    let plot_start = color("colors.plot_start", &raw.colors.plot_start, FALLBACK_PLOT_START);
    let plot_end = color("colors.plot_end", &raw.colors.plot_end, FALLBACK_PLOT_END);
    let plot_line = color("colors.plot_line", &raw.colors.plot_line, &defaults.plot_line);

    let plot_opacity = if raw.colors.plot_opacity.is_finite() {
        raw.colors.plot_opacity.clamp(0.0, 1.0)
    } else {
        push_warning(
            &mut warnings,
            ChartError::InvalidConfig("colors.plot_opacity must be finite".to_owned()),
        );
        defaults.plot_opacity
    };

    let layout_defaults = LayoutConfig::default();
    let font_defaults = FontConfig::default();
    let mut length = |field: &'static str, value: f64, fallback: f64| {
        non_negative_or(field, value, fallback, &mut warnings)
    };
    let padding = length("layout.padding", raw.layout.padding, layout_defaults.padding);
    let axis_line_width = length(
        "layout.axis_line_width",
        raw.layout.axis_line_width,
        layout_defaults.axis_line_width,
    );
    let min_tick_spacing_x = length(
        "layout.min_tick_spacing_x",
        raw.layout.min_tick_spacing_x,
        layout_defaults.min_tick_spacing_x,
    );
    let min_tick_spacing_y = length(
        "layout.min_tick_spacing_y",
        raw.layout.min_tick_spacing_y,
        layout_defaults.min_tick_spacing_y,
    );
    let mut font_size = |field: &'static str, value: f64, fallback: f64| {
        positive_or(field, value, fallback, &mut warnings)
    };
    let axis_size = font_size("font.axis_size", raw.font.axis_size, font_defaults.axis_size);
    let axis_label_size = font_size(
        "font.axis_label_size",
        raw.font.axis_label_size,
        font_defaults.axis_label_size,
    );
    let title_size = font_size("font.title_size", raw.font.title_size, font_defaults.title_size);

    let face = raw.font.face.as_str();
    let style = ChartStyle {
        background,
        axis_color,
        title_color,
        plot_start,
        plot_end,
        plot_opacity,
        plot_line,
        axis_font: FontSpec::new(face, axis_size * font_unit, false),
        axis_label_font: FontSpec::new(face, axis_label_size * font_unit, true),
        title_font: FontSpec::new(face, title_size * font_unit, true),
        axis_line_width: (axis_line_width * unit).max(f64::MIN_POSITIVE),
        unit,
        graph: raw.graph,
    };

    ConfigResolution {
        config: ResolvedConfig {
            viewport,
            device_viewport: viewport.scaled(ratio),
            device_pixel_ratio: ratio,
            padding: padding * unit,
            min_tick_spacing_x: min_tick_spacing_x * unit,
            min_tick_spacing_y: min_tick_spacing_y * unit,
            resize_quiet_window: raw.resize_quiet_window(),
            style,
        },
        warnings,
    }
}

fn push_warning(warnings: &mut Vec<ChartError>, warning: ChartError) {
    warn!(warning = %warning, "config value replaced by default");
    warnings.push(warning);
}

fn parse_color(
    field: &'static str,
    value: &str,
    fallback: &str,
    warnings: &mut Vec<ChartError>,
) -> Color {
    if let Some(color) = Color::from_hex(value) {
        return color;
    }
    push_warning(
        warnings,
        ChartError::InvalidColor {
            field,
            value: value.to_owned(),
        },
    );
    Color::from_hex(fallback).unwrap_or(Color::BLACK)
}

fn positive_or_one(field: &'static str, value: f64, warnings: &mut Vec<ChartError>) -> f64 {
    positive_or(field, value, 1.0, warnings)
}

fn positive_or(
    field: &'static str,
    value: f64,
    fallback: f64,
    warnings: &mut Vec<ChartError>,
) -> f64 {
    if value.is_finite() && value > 0.0 {
        return value;
    }
    push_warning(
        warnings,
        ChartError::InvalidConfig(format!("{field} must be finite and > 0, got {value}")),
    );
    fallback
}

fn non_negative_or(
    field: &'static str,
    value: f64,
    fallback: f64,
    warnings: &mut Vec<ChartError>,
) -> f64 {
    if value.is_finite() && value >= 0.0 {
        return value;
    }
    push_warning(
        warnings,
        ChartError::InvalidConfig(format!("{field} must be finite and >= 0, got {value}")),
    );
    fallback
}
