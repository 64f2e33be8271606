use std::f64::consts::TAU;

use crate::core::title::FontSpec;
use crate::error::{ChartError, ChartResult};

/// RGBA color in normalized 0..=1 channel values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);

    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    #[must_use]
    pub fn from_rgb8(red: u8, green: u8, blue: u8) -> Self {
        Self::rgb(
            f64::from(red) / 255.0,
            f64::from(green) / 255.0,
            f64::from(blue) / 255.0,
        )
    }

    /// Parses `#rgb` or `#rrggbb` (the `#` is optional).
    #[must_use]
    pub fn from_hex(value: &str) -> Option<Self> {
        let hex = value.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.chars().all(|ch| ch.is_ascii_hexdigit()) {
            return None;
        }
        match hex.len() {
            3 => {
                let nibble = |index: usize| {
                    u8::from_str_radix(&hex[index..=index], 16)
                        .ok()
                        .map(|n| n * 17)
                };
                Some(Self::from_rgb8(nibble(0)?, nibble(1)?, nibble(2)?))
            }
            6 => {
                let byte = |index: usize| u8::from_str_radix(&hex[index..index + 2], 16).ok();
                Some(Self::from_rgb8(byte(0)?, byte(2)?, byte(4)?))
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn with_alpha(self, alpha: f64) -> Self {
        Self { alpha, ..self }
    }

    /// Channels as 0..=255 integers.
    #[must_use]
    pub fn to_rgb8(self) -> [u8; 3] {
        [self.red, self.green, self.blue].map(|channel| (channel * 255.0).round().clamp(0.0, 255.0) as u8)
    }

    pub fn validate(self) -> ChartResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ChartError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

/// Drop shadow applied to a stroke, fill or text command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    pub offset_x: f64,
    pub offset_y: f64,
    pub blur: f64,
    pub color: Color,
}

impl Shadow {
    /// Soft shadow used on axes, notation and series markers, scaled by `unit`.
    #[must_use]
    pub fn soft(unit: f64) -> Self {
        Self {
            offset_x: 2.0 * unit,
            offset_y: 2.0 * unit,
            blur: 2.0 * unit,
            color: Color::rgba(0.0, 0.0, 0.0, 0.2),
        }
    }

    pub fn validate(self) -> ChartResult<()> {
        if !self.offset_x.is_finite() || !self.offset_y.is_finite() {
            return Err(ChartError::InvalidData(
                "shadow offset must be finite".to_owned(),
            ));
        }
        if !self.blur.is_finite() || self.blur < 0.0 {
            return Err(ChartError::InvalidData(
                "shadow blur must be finite and >= 0".to_owned(),
            ));
        }
        self.color.validate()
    }
}

/// Axis-aligned rectangle in pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectPrimitive {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill_color: Color,
}

impl RectPrimitive {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64, fill_color: Color) -> Self {
        Self {
            x,
            y,
            width,
            height,
            fill_color,
        }
    }

    pub fn validate(self) -> ChartResult<()> {
        validate_bounds(self.x, self.y, self.width, self.height)?;
        self.fill_color.validate()
    }
}

/// Clip region in pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ClipRect {
    pub fn validate(self) -> ChartResult<()> {
        validate_bounds(self.x, self.y, self.width, self.height)
    }
}

fn validate_bounds(x: f64, y: f64, width: f64, height: f64) -> ChartResult<()> {
    if !x.is_finite() || !y.is_finite() {
        return Err(ChartError::InvalidData(
            "rect origin must be finite".to_owned(),
        ));
    }
    if !width.is_finite() || !height.is_finite() || width < 0.0 || height < 0.0 {
        return Err(ChartError::InvalidData(
            "rect size must be finite and >= 0".to_owned(),
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathOp {
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
    /// Clockwise arc in canvas orientation, angles in radians.
    Arc {
        center_x: f64,
        center_y: f64,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
    },
}

/// Sequence of sub-paths for one stroke or fill command.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PathPrimitive {
    pub ops: Vec<PathOp>,
}

impl PathPrimitive {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn move_to(mut self, x: f64, y: f64) -> Self {
        self.ops.push(PathOp::MoveTo { x, y });
        self
    }

    #[must_use]
    pub fn line_to(mut self, x: f64, y: f64) -> Self {
        self.ops.push(PathOp::LineTo { x, y });
        self
    }

    /// Full circle as its own sub-path.
    #[must_use]
    pub fn circle(mut self, center_x: f64, center_y: f64, radius: f64) -> Self {
        self.ops.push(PathOp::MoveTo {
            x: center_x + radius,
            y: center_y,
        });
        self.ops.push(PathOp::Arc {
            center_x,
            center_y,
            radius,
            start_angle: 0.0,
            end_angle: TAU,
        });
        self
    }

    /// Straight segment `(x1, y1) -> (x2, y2)` as its own sub-path.
    #[must_use]
    pub fn segment(self, x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        self.move_to(x1, y1).line_to(x2, y2)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn validate(&self) -> ChartResult<()> {
        match self.ops.first() {
            None => {
                return Err(ChartError::InvalidData(
                    "path primitive must not be empty".to_owned(),
                ));
            }
            Some(PathOp::LineTo { .. }) => {
                return Err(ChartError::InvalidData(
                    "path must start with move_to or arc".to_owned(),
                ));
            }
            Some(_) => {}
        }

        for op in &self.ops {
            match *op {
                PathOp::MoveTo { x, y } | PathOp::LineTo { x, y } => {
                    if !x.is_finite() || !y.is_finite() {
                        return Err(ChartError::InvalidData(
                            "path coordinates must be finite".to_owned(),
                        ));
                    }
                }
                PathOp::Arc {
                    center_x,
                    center_y,
                    radius,
                    start_angle,
                    end_angle,
                } => {
                    if !center_x.is_finite()
                        || !center_y.is_finite()
                        || !start_angle.is_finite()
                        || !end_angle.is_finite()
                    {
                        return Err(ChartError::InvalidData(
                            "arc parameters must be finite".to_owned(),
                        ));
                    }
                    if !radius.is_finite() || radius <= 0.0 {
                        return Err(ChartError::InvalidData(
                            "arc radius must be finite and > 0".to_owned(),
                        ));
                    }
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: Color,
    pub width: f64,
    pub cap: LineCap,
    pub join: LineJoin,
    pub shadow: Option<Shadow>,
}

impl StrokeStyle {
    #[must_use]
    pub fn new(color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            cap: LineCap::default(),
            join: LineJoin::default(),
            shadow: None,
        }
    }

    #[must_use]
    pub fn with_cap(self, cap: LineCap) -> Self {
        Self { cap, ..self }
    }

    #[must_use]
    pub fn with_join(self, join: LineJoin) -> Self {
        Self { join, ..self }
    }

    #[must_use]
    pub fn with_shadow(self, shadow: Shadow) -> Self {
        Self {
            shadow: Some(shadow),
            ..self
        }
    }

    pub fn validate(self) -> ChartResult<()> {
        if !self.width.is_finite() || self.width <= 0.0 {
            return Err(ChartError::InvalidData(
                "stroke width must be finite and > 0".to_owned(),
            ));
        }
        if let Some(shadow) = self.shadow {
            shadow.validate()?;
        }
        self.color.validate()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillStyle {
    pub color: Color,
    pub shadow: Option<Shadow>,
}

impl FillStyle {
    #[must_use]
    pub const fn solid(color: Color) -> Self {
        Self {
            color,
            shadow: None,
        }
    }

    #[must_use]
    pub fn with_shadow(self, shadow: Shadow) -> Self {
        Self {
            shadow: Some(shadow),
            ..self
        }
    }

    pub fn validate(self) -> ChartResult<()> {
        if let Some(shadow) = self.shadow {
            shadow.validate()?;
        }
        self.color.validate()
    }
}

/// Horizontal text alignment relative to `TextPrimitive::x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextHAlign {
    Left,
    Center,
    Right,
}

/// Draw command for one label in pixel space.
#[derive(Debug, Clone, PartialEq)]
pub struct TextPrimitive {
    pub text: String,
    /// Anchor point; `y` is the alphabetic baseline.
    pub x: f64,
    pub y: f64,
    pub font: FontSpec,
    pub color: Color,
    pub h_align: TextHAlign,
    /// Rotation about the anchor, radians, counterclockwise on screen.
    pub rotation: f64,
    pub shadow: Option<Shadow>,
}

impl TextPrimitive {
    #[must_use]
    pub fn new(
        text: impl Into<String>,
        x: f64,
        y: f64,
        font: FontSpec,
        color: Color,
        h_align: TextHAlign,
    ) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            font,
            color,
            h_align,
            rotation: 0.0,
            shadow: None,
        }
    }

    #[must_use]
    pub fn rotated(self, rotation: f64) -> Self {
        Self { rotation, ..self }
    }

    #[must_use]
    pub fn with_shadow(self, shadow: Shadow) -> Self {
        Self {
            shadow: Some(shadow),
            ..self
        }
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.text.is_empty() {
            return Err(ChartError::InvalidData(
                "text primitive must not be empty".to_owned(),
            ));
        }
        if !self.x.is_finite() || !self.y.is_finite() || !self.rotation.is_finite() {
            return Err(ChartError::InvalidData(
                "text coordinates must be finite".to_owned(),
            ));
        }
        if !self.font.size_px.is_finite() || self.font.size_px <= 0.0 {
            return Err(ChartError::InvalidData(
                "font size must be finite and > 0".to_owned(),
            ));
        }
        if let Some(shadow) = self.shadow {
            shadow.validate()?;
        }
        self.color.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::{Color, PathPrimitive};

    #[test]
    fn hex_colors_accept_short_and_long_forms() {
        assert_eq!(Color::from_hex("#000"), Some(Color::rgb(0.0, 0.0, 0.0)));
        assert_eq!(Color::from_hex("#FF0055").map(Color::to_rgb8), Some([255, 0, 85]));
        assert_eq!(Color::from_hex("f0f0f0").map(Color::to_rgb8), Some([240, 240, 240]));
        assert_eq!(Color::from_hex("#abc").map(Color::to_rgb8), Some([170, 187, 204]));
    }

    #[test]
    fn malformed_hex_colors_are_rejected() {
        for value in ["", "#", "#12", "#12345", "#GG0000", "red", "#ff00ff00", "#+1+2+3"] {
            assert_eq!(Color::from_hex(value), None, "{value}");
        }
    }

    #[test]
    fn paths_must_start_with_a_move() {
        assert!(PathPrimitive::new().validate().is_err());
        assert!(PathPrimitive::new().line_to(1.0, 1.0).validate().is_err());
        assert!(PathPrimitive::new().segment(0.0, 0.0, 1.0, 1.0).validate().is_ok());
        assert!(PathPrimitive::new().circle(5.0, 5.0, 0.0).validate().is_err());
    }
}
