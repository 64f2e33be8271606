use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::dataset::{PlotData, column_mismatch};
use crate::core::normalize::{CellSource, normalize, parse_numeric};
use crate::error::{ChartError, ChartResult};

/// How the first cell of each submitted column is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HeaderPolicy {
    /// The first cell of each column is always the axis label.
    #[default]
    FirstRow,
    /// The first cells are labels only when at least one of them is not numeric.
    Detect,
    /// Columns carry data cells only; labels keep their defaults.
    Absent,
}

/// Caller policy for empty cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CleaningMode {
    /// Empty cells stay text and make their pair ambiguous.
    #[default]
    Lenient,
    /// An empty cell next to a numeric sibling becomes `0`.
    Strict,
}

/// Two validated, equal-length columns ready to feed a [`PlotData`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSubmission {
    pub x_label: String,
    pub y_label: String,
    pub x_cells: Vec<String>,
    pub y_cells: Vec<String>,
}

impl ColumnSubmission {
    /// Validates two selected columns.
    ///
    /// Columns of different length are rejected with the signed difference
    /// `x_len - y_len`.
    pub fn from_columns<X, Y>(
        column_x: &[X],
        column_y: &[Y],
        header: HeaderPolicy,
    ) -> ChartResult<Self>
    where
        X: CellSource,
        Y: CellSource,
    {
        if column_x.len() != column_y.len() {
            return Err(column_mismatch(column_x.len(), column_y.len()));
        }

        let mut x_cells: Vec<String> = column_x.iter().map(|c| c.cell_text().to_owned()).collect();
        let mut y_cells: Vec<String> = column_y.iter().map(|c| c.cell_text().to_owned()).collect();

        let has_header = match header {
            HeaderPolicy::FirstRow => !x_cells.is_empty(),
            HeaderPolicy::Detect => x_cells.first().zip(y_cells.first()).is_some_and(|(x, y)| {
                parse_numeric(x).is_none() || parse_numeric(y).is_none()
            }),
            HeaderPolicy::Absent => false,
        };

        let (x_label, y_label) = if has_header {
            (x_cells.remove(0), y_cells.remove(0))
        } else {
            ("x".to_owned(), "y".to_owned())
        };

        Ok(Self {
            x_label,
            y_label,
            x_cells,
            y_cells,
        })
    }

    /// Applies the empty-cell policy to every aligned pair.
    #[must_use]
    pub fn cleaned(mut self, mode: CleaningMode) -> Self {
        if mode == CleaningMode::Lenient {
            return self;
        }

        for (x, y) in self.x_cells.iter_mut().zip(self.y_cells.iter_mut()) {
            let x_empty = x.trim().is_empty();
            let y_empty = y.trim().is_empty();
            if x_empty && !y_empty && normalize(y.as_str()).is_numeric() {
                *x = "0".to_owned();
            } else if y_empty && !x_empty && normalize(x.as_str()).is_numeric() {
                *y = "0".to_owned();
            }
        }
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.x_cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x_cells.is_empty()
    }

    /// Title used when the host supplies none.
    #[must_use]
    pub fn default_title(&self) -> String {
        format!("{} by {}", self.y_label, self.x_label)
    }

    /// Resets `data` and loads this submission into it.
    pub fn load_into(&self, data: &mut PlotData) -> ChartResult<()> {
        data.reset();
        data.set_labels(self.x_label.clone(), self.y_label.clone());
        data.push_all(self.x_cells.as_slice(), self.y_cells.as_slice())?;
        debug!(
            x_label = %self.x_label,
            y_label = %self.y_label,
            cells = self.len(),
            "loaded column submission"
        );
        Ok(())
    }
}

/// Extracts two columns from already-parsed table rows.
///
/// The first row decides the table width and must hold at least two cells.
/// Rows too short for a column contribute no cell to it, which later surfaces
/// as a length mismatch.
pub fn select_columns<S: CellSource>(
    rows: &[Vec<S>],
    x_col: usize,
    y_col: usize,
) -> ChartResult<(Vec<String>, Vec<String>)> {
    let width = rows.first().map_or(0, Vec::len);
    if width < 2 {
        return Err(ChartError::InsufficientColumns { found: width });
    }
    for col in [x_col, y_col] {
        if col >= width {
            return Err(ChartError::InvalidData(format!(
                "column index {col} out of range for table of {width} columns"
            )));
        }
    }

    let pick = |col: usize| -> Vec<String> {
        rows.iter()
            .filter_map(|row| row.get(col))
            .map(|cell| cell.cell_text().to_owned())
            .collect()
    };
    Ok((pick(x_col), pick(y_col)))
}
