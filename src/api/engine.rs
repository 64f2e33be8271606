use std::time::Instant;

use tracing::{debug, trace, warn};

use crate::core::columns::{CleaningMode, ColumnSubmission, HeaderPolicy, select_columns};
use crate::core::dataset::PlotData;
use crate::core::normalize::CellSource;
use crate::core::plan::{LayoutPlan, plan_layout};
use crate::core::types::Viewport;
use crate::error::{ChartError, ChartResult};
use crate::render::{DrawSurface, RenderStats, render};

use super::chart_config::{ChartConfig, resolve_config};
use super::debounce::{ResizeDebouncer, ResizeEvent, ResizeSignal};

/// Why a pass produced no drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The viewport has no drawable area at the current padding.
    DegenerateViewport { width: u32, height: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutcome {
    Rendered(RenderStats),
    Skipped(SkipReason),
}

/// Stateful chart facade: owns the surface, config, dataset and last plan.
///
/// Resizes are debounced and applied by [`ChartEngine::poll`]; new data
/// renders immediately. Every pass runs to completion before the next one can
/// start.
pub struct ChartEngine<S: DrawSurface> {
    surface: S,
    config: ChartConfig,
    viewport: Viewport,
    data: PlotData,
    host_title: Option<String>,
    header_policy: HeaderPolicy,
    cleaning_mode: CleaningMode,
    debouncer: ResizeDebouncer,
    signal: ResizeSignal,
    last_plan: Option<LayoutPlan>,
    last_warnings: Vec<ChartError>,
    passes_rendered: u64,
}

impl<S: DrawSurface> ChartEngine<S> {
    #[must_use]
    pub fn new(surface: S, config: ChartConfig, viewport: Viewport) -> Self {
        let debouncer = ResizeDebouncer::new(config.resize_quiet_window());
        Self {
            surface,
            config,
            viewport,
            data: PlotData::new(),
            host_title: None,
            header_policy: HeaderPolicy::default(),
            cleaning_mode: CleaningMode::default(),
            debouncer,
            signal: ResizeSignal::new(),
            last_plan: None,
            last_warnings: Vec::new(),
            passes_rendered: 0,
        }
    }

    #[must_use]
    pub fn with_header_policy(mut self, policy: HeaderPolicy) -> Self {
        self.header_policy = policy;
        self
    }

    #[must_use]
    pub fn with_cleaning_mode(mut self, mode: CleaningMode) -> Self {
        self.cleaning_mode = mode;
        self
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    #[must_use]
    pub fn data(&self) -> &PlotData {
        &self.data
    }

    #[must_use]
    pub fn last_plan(&self) -> Option<&LayoutPlan> {
        self.last_plan.as_ref()
    }

    /// Substitutions reported while resolving config for the last pass.
    #[must_use]
    pub fn last_warnings(&self) -> &[ChartError] {
        &self.last_warnings
    }

    #[must_use]
    pub fn passes_rendered(&self) -> u64 {
        self.passes_rendered
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    #[must_use]
    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Handle for host callbacks that cannot borrow the engine.
    #[must_use]
    pub fn resize_signal(&self) -> ResizeSignal {
        self.signal.clone()
    }

    #[must_use]
    pub fn resize_pending(&self) -> bool {
        self.debouncer.is_pending() || self.signal.queued() > 0
    }

    /// Replaces the config. Takes effect on the next pass.
    pub fn set_config(&mut self, config: ChartConfig) {
        self.debouncer.set_quiet_window(config.resize_quiet_window());
        self.config = config;
        debug!("chart config replaced");
    }

    /// Sets a host title, or `None` to derive one from the axis labels.
    pub fn set_title(&mut self, title: Option<String>) {
        let title = title.filter(|title| !title.trim().is_empty());
        let resolved = title.clone().unwrap_or_else(|| self.derived_title());
        self.host_title = title;
        self.data.set_title(resolved);
    }

    /// Records a resize; the burst is applied by a later [`ChartEngine::poll`].
    pub fn on_resize(&mut self, viewport: Viewport, at: Instant) {
        self.drain_signal();
        self.debouncer.record(ResizeEvent { viewport, at });
    }

    /// Runs the pending resize pass once its quiet window has elapsed.
    pub fn poll(&mut self, now: Instant) -> ChartResult<Option<PassOutcome>> {
        self.drain_signal();
        let Some(viewport) = self.debouncer.poll(now) else {
            return Ok(None);
        };
        trace!(width = viewport.width, height = viewport.height, "resize burst settled");
        self.viewport = viewport;
        self.run_pass().map(Some)
    }

    /// Replaces the dataset with two selected columns and renders.
    ///
    /// Shape errors are returned before anything is changed. If the pass
    /// itself fails, the previous dataset is put back.
    pub fn on_data_submitted<X, Y>(&mut self, column_x: &[X], column_y: &[Y]) -> ChartResult<PassOutcome>
    where
        X: CellSource,
        Y: CellSource,
    {
        let submission = ColumnSubmission::from_columns(column_x, column_y, self.header_policy)
            .map_err(|err| {
                warn!(error = %err, "column submission rejected");
                err
            })?
            .cleaned(self.cleaning_mode);

        let mut data = PlotData::new();
        submission.load_into(&mut data)?;
        data.set_title(
            self.host_title
                .clone()
                .unwrap_or_else(|| submission.default_title()),
        );
        debug!(
            pairs = data.len(),
            plottable = data.plottable_count(),
            "data submitted"
        );
        let previous = std::mem::replace(&mut self.data, data);
        self.run_pass().inspect_err(|err| {
            warn!(error = %err, "render pass failed; previous dataset restored");
            self.data = previous;
        })
    }

    /// Selects columns `x_col` and `y_col` from parsed table rows and submits them.
    pub fn on_table_submitted<C: CellSource>(
        &mut self,
        rows: &[Vec<C>],
        x_col: usize,
        y_col: usize,
    ) -> ChartResult<PassOutcome> {
        let (column_x, column_y) = select_columns(rows, x_col, y_col)?;
        self.on_data_submitted(column_x.as_slice(), column_y.as_slice())
    }

    /// Runs a full layout and render pass for the current state.
    pub fn render_now(&mut self) -> ChartResult<PassOutcome> {
        self.run_pass()
    }

    fn derived_title(&self) -> String {
        if self.data.is_empty() {
            return String::new();
        }
        format!("{} by {}", self.data.y_label(), self.data.x_label())
    }

    fn drain_signal(&mut self) {
        for event in self.signal.drain() {
            self.debouncer.record(event);
        }
    }

    fn skipped(&self) -> PassOutcome {
        warn!(
            width = self.viewport.width,
            height = self.viewport.height,
            "skipping render pass: degenerate viewport"
        );
        PassOutcome::Skipped(SkipReason::DegenerateViewport {
            width: self.viewport.width,
            height: self.viewport.height,
        })
    }

    fn run_pass(&mut self) -> ChartResult<PassOutcome> {
        let resolution = resolve_config(&self.config, self.viewport);
        self.last_warnings = resolution.warnings;
        let resolved = resolution.config;

        if !self.viewport.is_valid() || !resolved.device_viewport.is_valid() {
            return Ok(self.skipped());
        }

        let plan = match plan_layout(&resolved.layout_settings(), &self.data, &self.surface) {
            Ok(plan) => plan,
            Err(ChartError::DegenerateViewport { .. }) => return Ok(self.skipped()),
            Err(err) => return Err(err),
        };

        let stats = render(&mut self.surface, &self.data, &plan, &resolved.style)?;
        self.last_plan = Some(plan);
        self.passes_rendered += 1;
        debug!(
            width = self.viewport.width,
            height = self.viewport.height,
            pass = self.passes_rendered,
            drawn = stats.total(),
            "render pass complete"
        );
        Ok(PassOutcome::Rendered(stats))
    }
}
