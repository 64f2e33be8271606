use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::core::normalize::{CellSource, CellValue, normalize};
use crate::core::types::DataPoint;
use crate::error::{ChartError, ChartResult};

/// Plottability flag stored next to every pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ambiguity {
    /// Both sides are numeric.
    Plottable,
    /// At least one side is text; kept for traceability, never drawn.
    Ambiguous,
}

impl Ambiguity {
    #[must_use]
    pub fn classify(x: &CellValue, y: &CellValue) -> Self {
        match (x, y) {
            (CellValue::Numeric(_), CellValue::Numeric(_)) => Self::Plottable,
            (CellValue::Numeric(_), CellValue::Text(_))
            | (CellValue::Text(_), CellValue::Numeric(_))
            | (CellValue::Text(_), CellValue::Text(_)) => Self::Ambiguous,
        }
    }

    /// Numeric score: 0 for plottable, 1 for ambiguous.
    #[must_use]
    pub const fn score(self) -> u8 {
        match self {
            Self::Plottable => 0,
            Self::Ambiguous => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPair {
    pub x: CellValue,
    pub y: CellValue,
}

impl DataPair {
    #[must_use]
    pub fn new(x: CellValue, y: CellValue) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn numeric(x: f64, y: f64) -> Self {
        Self::new(CellValue::Numeric(x), CellValue::Numeric(y))
    }

    #[must_use]
    pub fn as_point(&self) -> Option<DataPoint> {
        Some(DataPoint::new(self.x.as_number()?, self.y.as_number()?))
    }
}

/// Per-axis range attributes.
///
/// `period` (pixels per data unit) is zero until the layout engine derives it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DataAttr {
    pub min: f64,
    pub max: f64,
    pub delta: f64,
    pub period: f64,
}

impl DataAttr {
    #[must_use]
    pub fn from_range(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            delta: max - min,
            period: 0.0,
        }
    }

    #[must_use]
    pub fn with_period(self, period: f64) -> Self {
        Self { period, ..self }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DatasetStats {
    pub x: DataAttr,
    pub y: DataAttr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOutcome {
    Sorted,
    /// Sorting refused because reordering would scramble partially valid data.
    SkippedAmbiguous { ambiguous: usize },
}

/// Ordered collection of submitted pairs plus their derived statistics.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlotData {
    title: String,
    x_label: String,
    y_label: String,
    pairs: Vec<DataPair>,
    ambiguity: Vec<Ambiguity>,
    stats: Option<DatasetStats>,
}

impl PlotData {
    #[must_use]
    pub fn new() -> Self {
        Self {
            x_label: "x".to_owned(),
            y_label: "y".to_owned(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn x_label(&self) -> &str {
        &self.x_label
    }

    #[must_use]
    pub fn y_label(&self) -> &str {
        &self.y_label
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_labels(&mut self, x_label: impl Into<String>, y_label: impl Into<String>) {
        self.x_label = x_label.into();
        self.y_label = y_label.into();
    }

    /// Normalizes and appends one pair, returning its classification.
    pub fn push<X, Y>(&mut self, x_raw: &X, y_raw: &Y) -> Ambiguity
    where
        X: CellSource + ?Sized,
        Y: CellSource + ?Sized,
    {
        let pair = DataPair::new(normalize(x_raw), normalize(y_raw));
        let ambiguity = Ambiguity::classify(&pair.x, &pair.y);
        if ambiguity == Ambiguity::Ambiguous {
            warn!(
                index = self.pairs.len(),
                x = ?pair.x,
                y = ?pair.y,
                "unable to interpret pair as numeric"
            );
        }
        self.pairs.push(pair);
        self.ambiguity.push(ambiguity);
        ambiguity
    }

    /// Pushes two columns pairwise, then sorts and recomputes statistics.
    ///
    /// Mismatched lengths are rejected before any pair is stored. A batch with
    /// no plottable pair is accepted; its statistics stay unset.
    pub fn push_all<X, Y>(&mut self, column_x: &[X], column_y: &[Y]) -> ChartResult<()>
    where
        X: CellSource,
        Y: CellSource,
    {
        if column_x.len() != column_y.len() {
            return Err(column_mismatch(column_x.len(), column_y.len()));
        }

        for (x_raw, y_raw) in column_x.iter().zip(column_y) {
            self.push(x_raw, y_raw);
        }

        self.sort();
        if let Err(err) = self.compute_stats() {
            warn!(error = %err, pairs = self.pairs.len(), "statistics unavailable after push_all");
        }
        debug!(
            pairs = self.pairs.len(),
            plottable = self.plottable_count(),
            "dataset rebuilt"
        );
        Ok(())
    }

    /// Replaces the pair stored at `index`.
    ///
    /// The ambiguity flag for that slot is left unchanged; callers replacing a
    /// plottable pair with a non-numeric one own the resulting inconsistency.
    /// Use [`PlotData::replace_raw`] to re-classify.
    pub fn set_point(&mut self, index: usize, pair: DataPair) -> ChartResult<()> {
        let len = self.pairs.len();
        let slot = self
            .pairs
            .get_mut(index)
            .ok_or(ChartError::PointIndexOutOfRange { index, len })?;
        *slot = pair;
        trace!(index, "set point");
        Ok(())
    }

    /// Re-normalizes raw cells into slot `index` and re-classifies it.
    pub fn replace_raw<X, Y>(&mut self, index: usize, x_raw: &X, y_raw: &Y) -> ChartResult<Ambiguity>
    where
        X: CellSource + ?Sized,
        Y: CellSource + ?Sized,
    {
        let len = self.pairs.len();
        if index >= len {
            return Err(ChartError::PointIndexOutOfRange { index, len });
        }
        let pair = DataPair::new(normalize(x_raw), normalize(y_raw));
        let ambiguity = Ambiguity::classify(&pair.x, &pair.y);
        self.pairs[index] = pair;
        self.ambiguity[index] = ambiguity;
        trace!(index, ?ambiguity, "replace raw point");
        Ok(ambiguity)
    }

    /// Sorts by `(x, y)` when every stored pair is plottable.
    pub fn sort(&mut self) -> SortOutcome {
        let ambiguous = self.ambiguous_count();
        if ambiguous > 0 {
            warn!(ambiguous, "failed to sort points: ambiguous values present");
            return SortOutcome::SkippedAmbiguous { ambiguous };
        }

        self.pairs.sort_by_key(|pair| {
            pair.as_point()
                .map(|point| (OrderedFloat(point.x), OrderedFloat(point.y)))
        });
        trace!(pairs = self.pairs.len(), "sorted points");
        SortOutcome::Sorted
    }

    /// Recomputes min/max/delta from plottable pairs only.
    ///
    /// Fails with [`ChartError::NoPlottableData`] and clears stored statistics
    /// when no pair is plottable, or with [`ChartError::UnboundedRange`] when
    /// an axis spans more than `f64` can hold.
    pub fn compute_stats(&mut self) -> ChartResult<DatasetStats> {
        let scanned = self.scan_stats();
        self.stats = scanned.as_ref().ok().copied();
        scanned
    }

    /// Statistics of the current pairs without storing them.
    pub fn scan_stats(&self) -> ChartResult<DatasetStats> {
        let bounds = self.plottable_points().fold(None, |bounds, point| {
            Some(match bounds {
                None => (point.x, point.x, point.y, point.y),
                Some((x_min, x_max, y_min, y_max)) => (
                    f64::min(x_min, point.x),
                    f64::max(x_max, point.x),
                    f64::min(y_min, point.y),
                    f64::max(y_max, point.y),
                ),
            })
        });
        let (x_min, x_max, y_min, y_max) = bounds.ok_or(ChartError::NoPlottableData)?;

        let stats = DatasetStats {
            x: DataAttr::from_range(x_min, x_max),
            y: DataAttr::from_range(y_min, y_max),
        };
        for (axis, attr) in [("x", stats.x), ("y", stats.y)] {
            if !attr.delta.is_finite() {
                return Err(ChartError::UnboundedRange {
                    axis,
                    min: attr.min,
                    max: attr.max,
                });
            }
        }
        Ok(stats)
    }

    /// Clears pairs, ambiguity flags and statistics. Labels are kept.
    pub fn reset(&mut self) {
        self.pairs.clear();
        self.ambiguity.clear();
        self.stats = None;
    }

    #[must_use]
    pub fn pairs(&self) -> &[DataPair] {
        &self.pairs
    }

    #[must_use]
    pub fn ambiguity(&self) -> &[Ambiguity] {
        &self.ambiguity
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    #[must_use]
    pub fn stats(&self) -> Option<DatasetStats> {
        self.stats
    }

    /// Plottable pairs in stored order.
    pub fn plottable_points(&self) -> impl Iterator<Item = DataPoint> + '_ {
        self.pairs
            .iter()
            .zip(&self.ambiguity)
            .filter(|(_, ambiguity)| **ambiguity == Ambiguity::Plottable)
            .filter_map(|(pair, _)| pair.as_point())
    }

    #[must_use]
    pub fn plottable_count(&self) -> usize {
        self.plottable_points().count()
    }

    #[must_use]
    pub fn ambiguous_count(&self) -> usize {
        self.ambiguity
            .iter()
            .filter(|ambiguity| **ambiguity == Ambiguity::Ambiguous)
            .count()
    }
}

pub(crate) fn column_mismatch(x_len: usize, y_len: usize) -> ChartError {
    // Column lengths come from in-memory vectors and always fit in isize.
    let difference = x_len as isize - y_len as isize;
    ChartError::ColumnLengthMismatch {
        x_len,
        y_len,
        difference,
    }
}

#[cfg(test)]
mod tests {
    use super::{Ambiguity, DataPair, PlotData, SortOutcome};
    use crate::error::ChartError;

    #[test]
    fn push_classifies_each_type_combination() {
        let mut data = PlotData::new();
        assert_eq!(data.push("1", "2"), Ambiguity::Plottable);
        assert_eq!(data.push("a", "2"), Ambiguity::Ambiguous);
        assert_eq!(data.push("1", "b"), Ambiguity::Ambiguous);
        assert_eq!(data.push("a", "b"), Ambiguity::Ambiguous);
        let scores: Vec<u8> = data.ambiguity().iter().map(|a| a.score()).collect();
        assert_eq!(scores, vec![0, 1, 1, 1]);
    }

    #[test]
    fn sort_is_skipped_when_any_pair_is_ambiguous() {
        let mut data = PlotData::new();
        data.push("3", "1");
        data.push("x", "1");
        data.push("1", "1");
        assert_eq!(data.sort(), SortOutcome::SkippedAmbiguous { ambiguous: 1 });
        assert_eq!(data.pairs()[0], DataPair::numeric(3.0, 1.0));
    }

    #[test]
    fn sort_orders_by_x_then_y() {
        let mut data = PlotData::new();
        data.push("2", "5");
        data.push("1", "9");
        data.push("2", "1");
        assert_eq!(data.sort(), SortOutcome::Sorted);
        assert_eq!(
            data.pairs(),
            &[
                DataPair::numeric(1.0, 9.0),
                DataPair::numeric(2.0, 1.0),
                DataPair::numeric(2.0, 5.0),
            ]
        );
    }

    #[test]
    fn stats_fail_explicitly_without_plottable_pairs() {
        let mut data = PlotData::new();
        data.push("a", "b");
        assert_eq!(data.compute_stats(), Err(ChartError::NoPlottableData));
        assert!(data.stats().is_none());
    }

    #[test]
    fn overflowing_range_is_reported_and_not_stored() {
        let mut data = PlotData::new();
        data.push("-1e308", "1");
        data.push("1e308", "2");
        assert_eq!(
            data.compute_stats(),
            Err(ChartError::UnboundedRange {
                axis: "x",
                min: -1e308,
                max: 1e308
            })
        );
        assert!(data.stats().is_none());
        assert_eq!(data.plottable_count(), 2);
    }

    #[test]
    fn set_point_keeps_ambiguity_but_replace_raw_reclassifies() {
        let mut data = PlotData::new();
        data.push("1", "1");
        data.set_point(0, DataPair::numeric(5.0, 5.0)).expect("in range");
        assert_eq!(data.ambiguity()[0], Ambiguity::Plottable);

        let ambiguity = data.replace_raw(0, "n/a", "5").expect("in range");
        assert_eq!(ambiguity, Ambiguity::Ambiguous);
        assert_eq!(data.plottable_count(), 0);

        assert!(matches!(
            data.set_point(3, DataPair::numeric(0.0, 0.0)),
            Err(ChartError::PointIndexOutOfRange { index: 3, len: 1 })
        ));
    }

    #[test]
    fn reset_clears_everything_but_labels() {
        let mut data = PlotData::new();
        data.set_labels("Year", "VEI");
        data.push_all(&["2000", "2001"], &["4", "4"]).expect("equal lengths");
        data.reset();
        assert!(data.is_empty());
        assert!(data.ambiguity().is_empty());
        assert!(data.stats().is_none());
        assert_eq!(data.x_label(), "Year");
    }
}
