use crate::core::title::TextMeasurer;
use crate::error::ChartResult;
use crate::render::{ClipRect, FillStyle, PathPrimitive, RectPrimitive, StrokeStyle, TextPrimitive};

/// Immediate-mode drawing surface implemented by rendering backends.
///
/// Coordinates are device pixels in the surface's local space. Implementations
/// must make `save`/`restore` nest and must scope clip regions to them.
pub trait DrawSurface: TextMeasurer {
    /// Restores the identity transform.
    fn reset_transform(&mut self) -> ChartResult<()>;
    fn save(&mut self) -> ChartResult<()>;
    fn restore(&mut self) -> ChartResult<()>;
    fn clip_rect(&mut self, clip: ClipRect) -> ChartResult<()>;
    fn fill_rect(&mut self, rect: RectPrimitive) -> ChartResult<()>;
    fn stroke_path(&mut self, path: &PathPrimitive, style: StrokeStyle) -> ChartResult<()>;
    fn fill_path(&mut self, path: &PathPrimitive, style: FillStyle) -> ChartResult<()>;
    fn fill_text(&mut self, text: &TextPrimitive) -> ChartResult<()>;
}
