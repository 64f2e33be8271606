//! visualisr: chart geometry and layout engine for paired tabular columns.
//!
//! Raw cells are normalized into a dataset, the layout engine turns it into
//! pixel geometry, and the renderer emits an ordered frame of draw commands
//! for any [`render::DrawSurface`].

pub mod api;
pub mod core;
pub mod error;
pub mod render;
pub mod telemetry;

pub use api::{ChartConfig, ChartEngine, PassOutcome, resolve_config};
pub use error::{ChartError, ChartResult};
