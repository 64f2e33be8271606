mod chart_renderer;
mod frame;
mod null_surface;
mod primitives;
mod style;
mod surface;

pub use chart_renderer::{build_frame, plot_colors, render};
pub use frame::{DrawCommand, RenderFrame, RenderLayer, RenderStats};
pub use null_surface::{NullSurface, SurfaceCall};
pub use primitives::{
    ClipRect, Color, FillStyle, LineCap, LineJoin, PathOp, PathPrimitive, RectPrimitive, Shadow,
    StrokeStyle, TextHAlign, TextPrimitive,
};
pub use style::{ChartStyle, GraphOptions, RoundAt, format_tick_value};
pub use surface::DrawSurface;

#[cfg(feature = "cairo-backend")]
mod cairo_backend;
#[cfg(feature = "cairo-backend")]
pub use cairo_backend::CairoSurface;
