use serde::{Deserialize, Serialize};

/// Result of coercing one table cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Numeric(f64),
    Text(String),
}

impl CellValue {
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Numeric(value) => Some(*value),
            Self::Text(_) => None,
        }
    }

    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Numeric(_))
    }
}

/// Wrapper shape produced by DOM-like table readers, where the cell string
/// lives in a `data` field.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TextNode {
    pub data: String,
}

impl TextNode {
    #[must_use]
    pub fn new(data: impl Into<String>) -> Self {
        Self { data: data.into() }
    }
}

/// Anything that can hand the normalizer a raw cell string.
pub trait CellSource {
    fn cell_text(&self) -> &str;
}

impl CellSource for str {
    fn cell_text(&self) -> &str {
        self
    }
}

impl CellSource for String {
    fn cell_text(&self) -> &str {
        self
    }
}

impl CellSource for TextNode {
    fn cell_text(&self) -> &str {
        &self.data
    }
}

impl<T: CellSource + ?Sized> CellSource for &T {
    fn cell_text(&self) -> &str {
        (**self).cell_text()
    }
}

/// Coerces a raw cell into a number when possible.
///
/// The value is tried as-is first, then with every `,` and ` ` removed. When
/// neither parses as a finite number the original string is returned as text.
/// Empty cells are text, never zero.
#[must_use]
pub fn normalize<C: CellSource + ?Sized>(raw: &C) -> CellValue {
    let raw = raw.cell_text();
    if let Some(value) = parse_numeric(raw) {
        return CellValue::Numeric(value);
    }

    let stripped: String = raw.chars().filter(|ch| !matches!(ch, ',' | ' ')).collect();
    match parse_numeric(&stripped) {
        Some(value) => CellValue::Numeric(value),
        None => CellValue::Text(raw.to_owned()),
    }
}

/// Returns the value of `raw` when the whole (trimmed) string is a finite number.
#[must_use]
pub fn parse_numeric(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}
