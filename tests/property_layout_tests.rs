use proptest::prelude::*;
use visualisr::core::{
    CellValue, DataAttr, EstimatingMeasurer, FontSpec, PlotData, TITLE_MAX_SHRINK_ITERATIONS,
    compute_period, compute_tick_plan, fit_title, normalize,
};

fn with_thousands_separators(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::new();
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

proptest! {
    #[test]
    fn separators_do_not_change_the_value(value in 0_u64..10_000_000_000, negative in any::<bool>()) {
        let grouped = with_thousands_separators(value);
        let raw = if negative { format!("-{grouped}") } else { grouped };
        let expected = if negative { -(value as f64) } else { value as f64 };
        prop_assert_eq!(normalize(raw.as_str()), CellValue::Numeric(expected));
        let spaced = raw.replace(',', " ");
        prop_assert_eq!(normalize(spaced.as_str()), CellValue::Numeric(expected));
    }

    #[test]
    fn stats_ignore_where_ambiguous_pairs_sit(
        cells in prop::collection::vec(
            prop::option::weighted(0.8, (-500_i32..500, -500_i32..500)),
            1..40,
        )
        .prop_shuffle()
    ) {
        let render_cell = |cell: &Option<(i32, i32)>| match cell {
            Some((x, y)) => (x.to_string(), y.to_string()),
            None => ("n/a".to_owned(), "?".to_owned()),
        };
        let (xs, ys): (Vec<String>, Vec<String>) = cells.iter().map(render_cell).unzip();
        let plottable: Vec<(i32, i32)> = cells.iter().flatten().copied().collect();

        let mut data = PlotData::new();
        data.push_all(xs.as_slice(), ys.as_slice()).expect("equal lengths");

        prop_assert_eq!(data.plottable_count(), plottable.len());
        match plottable.iter().map(|(x, _)| *x).min() {
            Some(x_min) => {
                let stats = data.stats().expect("stats for plottable data");
                let x_max = plottable.iter().map(|(x, _)| *x).max().unwrap_or(x_min);
                let y_min = plottable.iter().map(|(_, y)| *y).min().unwrap_or_default();
                let y_max = plottable.iter().map(|(_, y)| *y).max().unwrap_or_default();
                prop_assert_eq!(stats.x.min, f64::from(x_min));
                prop_assert_eq!(stats.x.max, f64::from(x_max));
                prop_assert_eq!(stats.y.min, f64::from(y_min));
                prop_assert_eq!(stats.y.max, f64::from(y_max));
            }
            None => prop_assert!(data.stats().is_none()),
        }
    }

    #[test]
    fn period_never_grows_with_the_range(
        extent in 1.0_f64..4000.0,
        delta in 0.0_f64..1000.0,
        extra in 0.0_f64..1000.0,
    ) {
        let narrow = compute_period(DataAttr::from_range(0.0, delta), extent).expect("period");
        let wide = compute_period(DataAttr::from_range(0.0, delta + extra), extent).expect("period");
        prop_assert!(narrow >= wide);
        prop_assert!(wide >= 1.0);
    }

    #[test]
    fn notches_stay_inside_the_axis(
        extent in 10.0_f64..4000.0,
        min in -1000.0_f64..1000.0,
        delta in 0.0_f64..5000.0,
        min_spacing in 1.0_f64..200.0,
    ) {
        let attr = DataAttr::from_range(min, min + delta);
        let period = compute_period(attr, extent).expect("period");
        let ticks = compute_tick_plan(attr, period, min_spacing)
            .expect("ticks")
            .clamped_to_extent(period, extent);
        prop_assert!(ticks.multiplier >= 1.0);
        let last = (ticks.count as f64 * ticks.multiplier + 1.0) * period;
        prop_assert!(ticks.count == 0 || last <= extent);
    }

    #[test]
    fn titles_use_at_most_two_lines(
        words in prop::collection::vec("[A-Za-z]{1,12}", 0..12),
        max_width in 40.0_f64..1600.0,
    ) {
        let title = words.join(" ");
        let font = FontSpec::new("sans-serif", 28.0, true);
        let layout = fit_title(&title, max_width, &font, &EstimatingMeasurer);

        prop_assert!(layout.lines.len() <= 2);
        prop_assert!(layout.shrink_iterations <= TITLE_MAX_SHRINK_ITERATIONS);
        prop_assert!(layout.scale > 0.0 && layout.scale <= 1.0);
        prop_assert_eq!(layout.is_empty(), words.is_empty());
        let rejoined = layout.lines.join(" ");
        prop_assert_eq!(rejoined, title);
    }
}
