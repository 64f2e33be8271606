use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::core::dataset::{DatasetStats, PlotData};
use crate::core::layout::{
    AxisPoints, AxisScale, DataLayout, compute_axis_points, compute_period, compute_tick_plan,
};
use crate::core::title::{FontSpec, TextMeasurer, TitleLayout, fit_title};
use crate::core::types::DeviceViewport;
use crate::error::{ChartError, ChartResult};

/// Steps of one layout cycle, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayoutStage {
    Idle,
    ComputeAxisPoints,
    ComputeStats,
    ComputePeriodX,
    ComputePeriodY,
    ComputeTickPlanX,
    ComputeTickPlanY,
    ReadyToRender,
}

impl LayoutStage {
    /// Next stage of the cycle. `ReadyToRender` is terminal.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Idle => Self::ComputeAxisPoints,
            Self::ComputeAxisPoints => Self::ComputeStats,
            Self::ComputeStats => Self::ComputePeriodX,
            Self::ComputePeriodX => Self::ComputePeriodY,
            Self::ComputePeriodY => Self::ComputeTickPlanX,
            Self::ComputeTickPlanX => Self::ComputeTickPlanY,
            Self::ComputeTickPlanY | Self::ReadyToRender => Self::ReadyToRender,
        }
    }
}

/// Geometry inputs for one layout cycle, already in device pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSettings {
    pub viewport: DeviceViewport,
    pub padding: f64,
    pub title_font: FontSpec,
    pub min_tick_spacing_x: f64,
    pub min_tick_spacing_y: f64,
}

impl LayoutSettings {
    /// Widest a title line may be before it is wrapped or shrunk.
    #[must_use]
    pub fn title_max_width(&self) -> f64 {
        self.viewport.width - 3.0 * self.padding
    }
}

/// Immutable output of one layout cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutPlan {
    pub viewport: DeviceViewport,
    pub padding: f64,
    pub axis_points: AxisPoints,
    pub title: TitleLayout,
    /// `None` when the dataset has no plottable pair.
    pub data: Option<DataLayout>,
    /// Last stage the cycle completed.
    pub stage: LayoutStage,
}

impl LayoutPlan {
    #[must_use]
    pub fn has_data(&self) -> bool {
        self.data.is_some()
    }

    /// Baselines of the title lines, measured from the top padding.
    #[must_use]
    pub fn title_baselines(&self) -> smallvec::SmallVec<[f64; 2]> {
        self.title.line_baselines(self.padding)
    }
}

struct StageCursor {
    stage: LayoutStage,
}

impl StageCursor {
    fn advance(&mut self) -> LayoutStage {
        let from = self.stage;
        self.stage = from.next();
        trace!(?from, to = ?self.stage, "layout stage");
        self.stage
    }
}

/// Runs one full layout cycle over `data`.
///
/// Viewport problems are errors. A dataset with no plottable pair is not: the
/// plan then carries the frame and title only.
pub fn plan_layout<M>(
    settings: &LayoutSettings,
    data: &PlotData,
    measurer: &M,
) -> ChartResult<LayoutPlan>
where
    M: TextMeasurer + ?Sized,
{
    let mut cursor = StageCursor {
        stage: LayoutStage::Idle,
    };

    cursor.advance();
    let title = fit_title(
        data.title(),
        settings.title_max_width(),
        &settings.title_font,
        measurer,
    );
    let axis_points = compute_axis_points(settings.viewport, settings.padding, title.height)?;

    cursor.advance();
    let stats = match data.scan_stats() {
        Ok(stats) => stats,
        Err(err @ (ChartError::NoPlottableData | ChartError::UnboundedRange { .. })) => {
            warn!(
                pairs = data.len(),
                error = %err,
                "statistics unusable; layout limited to the frame"
            );
            return Ok(LayoutPlan {
                viewport: settings.viewport,
                padding: settings.padding,
                axis_points,
                title,
                data: None,
                stage: cursor.stage,
            });
        }
        Err(err) => return Err(err),
    };

    let layout = plan_data_layout(settings, stats, axis_points, &mut cursor)?;
    debug!(
        width = settings.viewport.width,
        height = settings.viewport.height,
        period_x = layout.x.attr.period,
        period_y = layout.y.attr.period,
        ticks_x = layout.x.ticks.count,
        ticks_y = layout.y.ticks.count,
        fits = layout.fits_frame(),
        "layout planned"
    );

    Ok(LayoutPlan {
        viewport: settings.viewport,
        padding: settings.padding,
        axis_points,
        title,
        data: Some(layout),
        stage: cursor.stage,
    })
}

fn plan_data_layout(
    settings: &LayoutSettings,
    stats: DatasetStats,
    frame: AxisPoints,
    cursor: &mut StageCursor,
) -> ChartResult<DataLayout> {
    cursor.advance();
    let x_attr = stats.x.with_period(compute_period(stats.x, frame.x_extent())?);

    cursor.advance();
    let y_attr = stats.y.with_period(compute_period(stats.y, frame.y_extent())?);

    cursor.advance();
    let x_ticks = compute_tick_plan(x_attr, x_attr.period, settings.min_tick_spacing_x)?
        .clamped_to_extent(x_attr.period, frame.x_extent());

    cursor.advance();
    let y_ticks = compute_tick_plan(y_attr, y_attr.period, settings.min_tick_spacing_y)?
        .clamped_to_extent(y_attr.period, frame.y_extent());

    cursor.advance();
    Ok(DataLayout {
        x: AxisScale {
            attr: x_attr,
            ticks: x_ticks,
        },
        y: AxisScale {
            attr: y_attr,
            ticks: y_ticks,
        },
        frame,
    })
}
