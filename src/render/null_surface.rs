use crate::core::title::{FontSpec, TextMeasurer, estimate_text_width_px};
use crate::error::{ChartError, ChartResult};
use crate::render::{
    ClipRect, DrawCommand, DrawSurface, FillStyle, PathPrimitive, RectPrimitive, StrokeStyle,
    TextPrimitive,
};

/// One call received by a [`NullSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    ResetTransform,
    Draw(DrawCommand),
}

/// Headless surface used by tests and hosts without a backend.
///
/// It validates every call and records it, so tests can assert on draw order
/// without a real canvas.
#[derive(Debug, Default)]
pub struct NullSurface {
    calls: Vec<SurfaceCall>,
    depth: usize,
    passes: usize,
}

impl NullSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn calls(&self) -> &[SurfaceCall] {
        &self.calls
    }

    /// Draw commands received since the last transform reset.
    #[must_use]
    pub fn last_pass(&self) -> &[SurfaceCall] {
        let start = self
            .calls
            .iter()
            .rposition(|call| *call == SurfaceCall::ResetTransform)
            .map_or(0, |index| index + 1);
        &self.calls[start..]
    }

    /// Number of passes started, counted by transform resets.
    #[must_use]
    pub fn passes(&self) -> usize {
        self.passes
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextPrimitive> + '_ {
        self.calls.iter().filter_map(|call| match call {
            SurfaceCall::Draw(DrawCommand::FillText(text)) => Some(text),
            _ => None,
        })
    }

    pub fn clear(&mut self) {
        self.calls.clear();
        self.depth = 0;
        self.passes = 0;
    }

    fn record(&mut self, command: DrawCommand) -> ChartResult<()> {
        command.validate()?;
        self.calls.push(SurfaceCall::Draw(command));
        Ok(())
    }
}

impl TextMeasurer for NullSurface {
    fn measure_text_width(&self, text: &str, font: &FontSpec) -> f64 {
        estimate_text_width_px(text, font)
    }
}

impl DrawSurface for NullSurface {
    fn reset_transform(&mut self) -> ChartResult<()> {
        self.passes += 1;
        self.calls.push(SurfaceCall::ResetTransform);
        Ok(())
    }

    fn save(&mut self) -> ChartResult<()> {
        self.depth += 1;
        self.record(DrawCommand::Save)
    }

    fn restore(&mut self) -> ChartResult<()> {
        self.depth = self
            .depth
            .checked_sub(1)
            .ok_or_else(|| ChartError::Backend("restore without matching save".to_owned()))?;
        self.record(DrawCommand::Restore)
    }

    fn clip_rect(&mut self, clip: ClipRect) -> ChartResult<()> {
        self.record(DrawCommand::Clip(clip))
    }

    fn fill_rect(&mut self, rect: RectPrimitive) -> ChartResult<()> {
        self.record(DrawCommand::FillRect(rect))
    }

    fn stroke_path(&mut self, path: &PathPrimitive, style: StrokeStyle) -> ChartResult<()> {
        self.record(DrawCommand::StrokePath {
            path: path.clone(),
            style,
        })
    }

    fn fill_path(&mut self, path: &PathPrimitive, style: FillStyle) -> ChartResult<()> {
        self.record(DrawCommand::FillPath {
            path: path.clone(),
            style,
        })
    }

    fn fill_text(&mut self, text: &TextPrimitive) -> ChartResult<()> {
        self.record(DrawCommand::FillText(text.clone()))
    }
}
