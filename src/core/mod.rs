pub mod columns;
pub mod dataset;
pub mod layout;
pub mod normalize;
pub mod plan;
pub mod title;
pub mod types;

pub use columns::{CleaningMode, ColumnSubmission, HeaderPolicy, select_columns};
pub use dataset::{Ambiguity, DataAttr, DataPair, DatasetStats, PlotData, SortOutcome};
pub use layout::{
    AxisPoints, AxisScale, DataLayout, TickPlan, compute_axis_points, compute_period,
    compute_tick_plan,
};
pub use normalize::{CellSource, CellValue, TextNode, normalize, parse_numeric};
pub use plan::{LayoutPlan, LayoutSettings, LayoutStage, plan_layout};
pub use title::{
    EstimatingMeasurer, FontSpec, TITLE_MAX_SHRINK_ITERATIONS, TITLE_MIN_SCALE,
    TITLE_SHRINK_FACTOR, TextMeasurer, TitleLayout, estimate_text_width_px, fit_title,
};
pub use types::{DataPoint, DeviceViewport, PixelPoint, Viewport};
