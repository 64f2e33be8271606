use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChartError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    /// The plot frame left after padding has no usable pixel extent.
    #[error("degenerate viewport: usable axis extent is {extent_px}px")]
    DegenerateViewport { extent_px: f64 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    /// `difference` is `x_len - y_len`, i.e. the number of missing y cells.
    #[error("column length mismatch: x has {x_len} cells, y has {y_len} (difference {difference})")]
    ColumnLengthMismatch {
        x_len: usize,
        y_len: usize,
        difference: isize,
    },

    #[error("source data must contain at least 2 columns, found {found}")]
    InsufficientColumns { found: usize },

    #[error("no plottable data: every pair is ambiguous or the dataset is empty")]
    NoPlottableData,

    /// The plottable values span a range too wide to represent.
    #[error("{axis} range is not finite: min={min}, max={max}")]
    UnboundedRange { axis: &'static str, min: f64, max: f64 },

    #[error("invalid color for `{field}`: {value:?}")]
    InvalidColor { field: &'static str, value: String },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("point index {index} out of range for dataset of {len} pairs")]
    PointIndexOutOfRange { index: usize, len: usize },

    #[error("drawing backend failure: {0}")]
    Backend(String),
}
