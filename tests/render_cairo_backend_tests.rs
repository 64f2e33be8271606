#![cfg(feature = "cairo-backend")]

use cairo::{Context, Format, ImageSurface};
use visualisr::core::{FontSpec, TextMeasurer, Viewport};
use visualisr::render::CairoSurface;
use visualisr::{ChartConfig, ChartEngine, ChartError, PassOutcome};

#[test]
fn cairo_surface_rejects_invalid_size() {
    let err = CairoSurface::image(0, 480).expect_err("invalid width must fail");
    assert_eq!(err, ChartError::InvalidViewport { width: 0, height: 480 });
}

#[test]
fn cairo_surface_renders_a_bubble_chart_to_png() {
    let surface = CairoSurface::image(640, 480).expect("surface");
    let mut engine = ChartEngine::new(surface, ChartConfig::default(), Viewport::new(640, 480));

    let outcome = engine
        .on_data_submitted(&["Year", "1980", "1982", "1991"], &["VEI", "5", "4", "6"])
        .expect("render");
    let PassOutcome::Rendered(stats) = outcome else {
        panic!("expected a rendered pass, got {outcome:?}");
    };
    assert_eq!(stats.paths_filled, 3);
    assert!(stats.texts_drawn >= 4);

    let surface = engine.into_surface();
    let mut png = Vec::new();
    surface.write_png(&mut png).expect("png");
    assert!(png.starts_with(&[0x89, b'P', b'N', b'G']));
}

#[test]
fn cairo_surface_can_draw_on_external_context() {
    let image = ImageSurface::create(Format::ARgb32, 400, 300).expect("image");
    let context = Context::new(&image).expect("context");
    let surface = CairoSurface::from_context(context);
    let mut engine = ChartEngine::new(surface, ChartConfig::default(), Viewport::new(400, 300));

    engine
        .on_data_submitted(&["x", "1", "2"], &["y", "3", "4"])
        .expect("render on context");
    let surface = engine.into_surface();
    assert!(surface.image_surface().is_none());
    assert!(matches!(
        surface.write_png(&mut Vec::new()),
        Err(ChartError::Backend(_))
    ));
}

#[test]
fn pango_measurement_grows_with_text() {
    let surface = CairoSurface::image(200, 100).expect("surface");
    let font = FontSpec::new("'Open Sans', sans-serif", 16.0, false);
    let short = surface.measure_text_width("VEI", &font);
    let long = surface.measure_text_width("VEI by Year of eruption", &font);
    assert!(long > short);
}
