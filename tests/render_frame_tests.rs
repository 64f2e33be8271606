use visualisr::api::{ChartConfig, resolve_config};
use visualisr::core::{EstimatingMeasurer, FontSpec, LayoutPlan, TextMeasurer, PlotData, Viewport, plan_layout};
use visualisr::render::{
    ChartStyle, Color, DrawCommand, NullSurface, PathOp, RenderLayer, SurfaceCall,
    build_frame, render,
};

fn plan_for(data: &PlotData, config: &ChartConfig) -> (LayoutPlan, ChartStyle) {
    let resolved = resolve_config(config, Viewport::new(800, 600)).config;
    let plan = plan_layout(&resolved.layout_settings(), data, &EstimatingMeasurer).expect("plan");
    (plan, resolved.style)
}

fn volcano_data() -> PlotData {
    let mut data = PlotData::new();
    data.set_labels("Year", "VEI");
    data.set_title("VEI by Year");
    data.push_all(&["1980", "1982", "1991"], &["5", "4", "6"])
        .expect("equal lengths");
    data
}

#[test]
fn layers_replay_bottom_to_top() {
    let data = volcano_data();
    let (plan, style) = plan_for(&data, &ChartConfig::default());
    let frame = build_frame(&data, &plan, &style);

    let layers: Vec<RenderLayer> = frame.commands().map(|(layer, _)| layer).collect();
    assert!(layers.windows(2).all(|pair| pair[0] <= pair[1]));
    for layer in RenderLayer::ORDERED {
        assert!(!frame.layer(layer).is_empty(), "{layer:?} layer is empty");
    }
}

#[test]
fn every_pass_starts_with_a_transform_reset() {
    let data = volcano_data();
    let (plan, style) = plan_for(&data, &ChartConfig::default());
    let mut surface = NullSurface::new();

    render(&mut surface, &data, &plan, &style).expect("first pass");
    render(&mut surface, &data, &plan, &style).expect("second pass");

    assert_eq!(surface.passes(), 2);
    assert_eq!(surface.calls()[0], SurfaceCall::ResetTransform);
    assert_eq!(surface.depth(), 0);
    let frame_len = build_frame(&data, &plan, &style).len();
    assert_eq!(surface.last_pass().len(), frame_len);
}

#[test]
fn series_layer_is_clipped_and_balanced() {
    let data = volcano_data();
    let (plan, style) = plan_for(&data, &ChartConfig::default());
    let frame = build_frame(&data, &plan, &style);
    let series = frame.layer(RenderLayer::Series);

    assert_eq!(series.first(), Some(&DrawCommand::Save));
    assert!(matches!(series.get(1), Some(DrawCommand::Clip(_))));
    assert_eq!(series.last(), Some(&DrawCommand::Restore));
    let bubbles = series
        .iter()
        .filter(|command| matches!(command, DrawCommand::FillPath { .. }))
        .count();
    assert_eq!(bubbles, 3);
}

#[test]
fn bubbles_sit_on_the_x_axis_with_radius_from_y() {
    let data = volcano_data();
    let (plan, style) = plan_for(&data, &ChartConfig::default());
    let layout = plan.data.expect("data layout");
    let frame = build_frame(&data, &plan, &style);

    let radii: Vec<f64> = frame
        .layer(RenderLayer::Series)
        .iter()
        .filter_map(|command| match command {
            DrawCommand::FillPath { path, .. } => path.ops.iter().find_map(|op| match *op {
                PathOp::Arc {
                    center_y, radius, ..
                } => {
                    assert_eq!(center_y, layout.frame.mid_y());
                    Some(radius)
                }
                _ => None,
            }),
            _ => None,
        })
        .collect();
    assert_eq!(
        radii,
        vec![
            layout.y_offset_px(5.0),
            layout.y_offset_px(4.0),
            layout.y_offset_px(6.0)
        ]
    );
}

#[test]
fn single_point_uses_the_start_color_exactly() {
    let mut data = PlotData::new();
    data.push_all(&["5"], &["10"]).expect("equal lengths");
    let (plan, style) = plan_for(&data, &ChartConfig::default());
    let frame = build_frame(&data, &plan, &style);

    let fill = frame
        .layer(RenderLayer::Series)
        .iter()
        .find_map(|command| match command {
            DrawCommand::FillPath { style, .. } => Some(style.color),
            _ => None,
        })
        .expect("one bubble");
    let expected = Color::from_hex("#0055FF").expect("valid hex").with_alpha(0.35);
    assert_eq!(fill, expected);
    assert!(!fill.red.is_nan() && !fill.green.is_nan() && !fill.blue.is_nan());
}

#[test]
fn ambiguous_only_dataset_draws_frame_without_data_layer() {
    let mut data = PlotData::new();
    data.push_all(&["a", "b"], &["c", "d"]).expect("equal lengths");
    let (plan, style) = plan_for(&data, &ChartConfig::default());
    assert!(plan.data.is_none());

    let mut surface = NullSurface::new();
    let stats = render(&mut surface, &data, &plan, &style).expect("frame only");
    assert_eq!(stats.paths_filled, 0);
    assert_eq!(stats.rects_drawn, 1);
    assert_eq!(stats.paths_stroked, 2);
}

#[test]
fn line_and_points_follow_graph_options() {
    let data = volcano_data();
    let mut config = ChartConfig::default();
    config.graph.show_bubbles = false;
    config.graph.show_line = true;
    config.graph.show_points = true;
    let (plan, style) = plan_for(&data, &config);
    let frame = build_frame(&data, &plan, &style);
    let series = frame.layer(RenderLayer::Series);

    let strokes = series
        .iter()
        .filter(|command| matches!(command, DrawCommand::StrokePath { .. }))
        .count();
    let fills = series
        .iter()
        .filter(|command| matches!(command, DrawCommand::FillPath { .. }))
        .count();
    assert_eq!(strokes, 1);
    assert_eq!(fills, 1);
}

#[test]
fn mirrored_y_notation_labels_both_sides_of_the_axis() {
    let data = volcano_data();
    let (plan, style) = plan_for(&data, &ChartConfig::default());
    let layout = plan.data.expect("data layout");
    let frame = build_frame(&data, &plan, &style);

    let texts: Vec<&str> = frame
        .layer(RenderLayer::Notation)
        .iter()
        .filter_map(|command| match command {
            DrawCommand::FillText(text) => Some(text.text.as_str()),
            _ => None,
        })
        .collect();
    let x_labels = layout.x.ticks.count + 1;
    let y_labels = 2 * (layout.y.ticks.count + 1);
    assert_eq!(texts.len(), x_labels + y_labels);
    assert_eq!(texts[0], "1980");
}

#[test]
fn null_surface_measures_text_consistently() {
    let surface = NullSurface::new();
    let font = FontSpec::new("sans-serif", 10.0, false);
    let short = surface.measure_text_width("ab", &font);
    let long = surface.measure_text_width("abcd", &font);
    assert!(long > short);
    assert!(surface.calls().is_empty());
}
