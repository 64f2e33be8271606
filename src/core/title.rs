use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::trace;

/// Scale applied to the title font on each shrink iteration.
pub const TITLE_SHRINK_FACTOR: f64 = 0.75;
/// Shrinking stops once the scale is at or below this value.
pub const TITLE_MIN_SCALE: f64 = 0.5;
/// Upper bound on shrink iterations; `0.75^3 < 0.5` so the loop ends by then.
pub const TITLE_MAX_SHRINK_ITERATIONS: u8 = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    pub face: String,
    pub size_px: f64,
    pub bold: bool,
}

impl FontSpec {
    #[must_use]
    pub fn new(face: impl Into<String>, size_px: f64, bold: bool) -> Self {
        Self {
            face: face.into(),
            size_px,
            bold,
        }
    }

    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            size_px: self.size_px * factor,
            ..self.clone()
        }
    }

    /// CSS shorthand, e.g. `bold 28px 'Open Sans', sans-serif`.
    #[must_use]
    pub fn css(&self) -> String {
        if self.bold {
            format!("bold {}px {}", self.size_px, self.face)
        } else {
            format!("{}px {}", self.size_px, self.face)
        }
    }
}

/// Text measurement provided by the drawing surface.
pub trait TextMeasurer {
    fn measure_text_width(&self, text: &str, font: &FontSpec) -> f64;
}

/// Backend-independent width estimate from per-glyph advance ratios.
#[derive(Debug, Clone, Copy, Default)]
pub struct EstimatingMeasurer;

impl TextMeasurer for EstimatingMeasurer {
    fn measure_text_width(&self, text: &str, font: &FontSpec) -> f64 {
        estimate_text_width_px(text, font)
    }
}

#[must_use]
pub fn estimate_text_width_px(text: &str, font: &FontSpec) -> f64 {
    let units = text.chars().fold(0.0, |acc, ch| {
        acc + match ch {
            '0'..='9' => 0.62,
            '.' | ',' => 0.34,
            '-' | '+' | '%' => 0.42,
            ' ' => 0.33,
            'A'..='Z' => 0.68,
            _ => 0.58,
        }
    });
    let weight = if font.bold { 1.06 } else { 1.0 };
    units * font.size_px * weight
}

/// Final title arrangement after wrapping and shrinking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleLayout {
    pub lines: SmallVec<[String; 2]>,
    pub font: FontSpec,
    pub scale: f64,
    /// Vertical space reserved above the plot frame.
    pub height: f64,
    /// Widest line at the final font size.
    pub width_px: f64,
    pub shrink_iterations: u8,
    pub fits: bool,
}

impl TitleLayout {
    #[must_use]
    pub fn empty(font: &FontSpec) -> Self {
        Self {
            lines: SmallVec::new(),
            font: font.clone(),
            scale: 1.0,
            height: 0.0,
            width_px: 0.0,
            shrink_iterations: 0,
            fits: true,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Baseline of each line for a title block starting at `top`.
    #[must_use]
    pub fn line_baselines(&self, top: f64) -> SmallVec<[f64; 2]> {
        let count = self.lines.len();
        (1..=count)
            .map(|line| top + line as f64 * self.height / count as f64)
            .collect()
    }
}

/// Fits `title` into `max_width`.
///
/// A title that is too wide is split into two halves by word count, then the
/// font is shrunk by [`TITLE_SHRINK_FACTOR`] while it still overflows and the
/// scale is above [`TITLE_MIN_SCALE`]. The last layout is accepted even if it
/// still overflows.
pub fn fit_title<M>(title: &str, max_width: f64, font: &FontSpec, measurer: &M) -> TitleLayout
where
    M: TextMeasurer + ?Sized,
{
    let title = title.trim();
    if title.is_empty() {
        return TitleLayout::empty(font);
    }

    let single_width = measurer.measure_text_width(title, font);
    if single_width <= max_width {
        return TitleLayout {
            lines: SmallVec::from_iter([title.to_owned()]),
            font: font.clone(),
            scale: 1.0,
            height: font.size_px,
            width_px: single_width,
            shrink_iterations: 0,
            fits: true,
        };
    }

    let lines = split_in_two(title);
    let widest = |font: &FontSpec| {
        lines
            .iter()
            .map(|line| measurer.measure_text_width(line, font))
            .fold(0.0, f64::max)
    };

    let mut scale = 1.0;
    let mut shrink_iterations = 0;
    let mut current = font.clone();
    let mut width = widest(&current);
    while width > max_width
        && scale > TITLE_MIN_SCALE
        && shrink_iterations < TITLE_MAX_SHRINK_ITERATIONS
    {
        scale *= TITLE_SHRINK_FACTOR;
        shrink_iterations += 1;
        current = font.scaled(scale);
        width = widest(&current);
        trace!(scale, width, max_width, "shrinking title");
    }

    // Any overflowing title reserves the two-line block, even a single word.
    let height = 2.0 * font.size_px * scale.sqrt();

    TitleLayout {
        fits: width <= max_width,
        lines,
        font: current,
        scale,
        height,
        width_px: width,
        shrink_iterations,
    }
}

/// First line takes `ceil(words / 2)` words; a single word stays one line.
fn split_in_two(title: &str) -> SmallVec<[String; 2]> {
    let words: Vec<&str> = title.split_whitespace().collect();
    let head = words.len().div_ceil(2);
    let mut lines = SmallVec::new();
    lines.push(words[..head].join(" "));
    if head < words.len() {
        lines.push(words[head..].join(" "));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::{FontSpec, TextMeasurer, fit_title, split_in_two};

    /// One em per character.
    struct FixedMeasurer;

    impl TextMeasurer for FixedMeasurer {
        fn measure_text_width(&self, text: &str, font: &FontSpec) -> f64 {
            text.chars().count() as f64 * font.size_px
        }
    }

    fn title_font() -> FontSpec {
        FontSpec::new("sans-serif", 10.0, true)
    }

    #[test]
    fn short_title_stays_on_one_line() {
        let layout = fit_title("Volcanoes", 200.0, &title_font(), &FixedMeasurer);
        assert_eq!(layout.lines.as_slice(), ["Volcanoes"]);
        assert_eq!(layout.height, 10.0);
        assert_eq!(layout.shrink_iterations, 0);
        assert!(layout.fits);
    }

    #[test]
    fn wide_title_splits_by_word_count() {
        let layout = fit_title("one two three four five", 140.0, &title_font(), &FixedMeasurer);
        assert_eq!(layout.lines.as_slice(), ["one two three", "four five"]);
        assert_eq!(layout.shrink_iterations, 0);
        assert_eq!(layout.height, 20.0);
    }

    #[test]
    fn still_too_wide_lines_shrink_by_three_quarters() {
        let layout = fit_title("abcdefghij klmnopqrst", 80.0, &title_font(), &FixedMeasurer);
        assert_eq!(layout.shrink_iterations, 1);
        assert_eq!(layout.scale, 0.75);
        assert_eq!(layout.font.size_px, 7.5);
        assert!(layout.fits);
    }

    #[test]
    fn unfittable_title_is_accepted_after_bounded_shrinking() {
        let layout = fit_title("supercalifragilistic", 1.0, &title_font(), &FixedMeasurer);
        assert_eq!(layout.shrink_iterations, 3);
        assert!(layout.scale <= 0.5);
        assert!(!layout.fits);
        assert_eq!(layout.lines.len(), 1);
    }

    #[test]
    fn overflowing_single_word_reserves_the_shrunk_block_height() {
        let layout = fit_title("supercalifragilistic", 1.0, &title_font(), &FixedMeasurer);
        let expected = 2.0 * 10.0 * layout.scale.sqrt();
        assert!((layout.height - expected).abs() < 1e-12);
        assert!(layout.height > layout.font.size_px);
    }

    #[test]
    fn split_keeps_the_extra_word_on_the_first_line() {
        assert_eq!(split_in_two("a b c").as_slice(), ["a b", "c"]);
        assert_eq!(split_in_two("solo").as_slice(), ["solo"]);
    }
}
