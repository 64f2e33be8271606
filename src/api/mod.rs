mod chart_config;
mod debounce;
mod engine;

pub use chart_config::{
    ChartConfig, ColorConfig, ConfigResolution, DisplayConfig, FALLBACK_PLOT_END,
    FALLBACK_PLOT_START, FontConfig, LayoutConfig, ResolvedConfig, resolve_config,
};
pub use debounce::{DEFAULT_RESIZE_QUIET_WINDOW, ResizeDebouncer, ResizeEvent, ResizeSignal};
pub use engine::{ChartEngine, PassOutcome, SkipReason};
