use visualisr::core::Viewport;
use visualisr::render::{NullSurface, build_frame};
use visualisr::{ChartConfig, ChartEngine, PassOutcome, resolve_config};

const YEARS: [&str; 6] = ["Year", "1,815", "1883", "1991", "1980", "2010"];
const VEI: [&str; 6] = ["VEI", "7", "6", "6", "5", "4"];

#[test]
fn equal_inputs_produce_equal_plans() {
    let mut first = ChartEngine::new(NullSurface::new(), ChartConfig::default(), Viewport::new(1024, 768));
    let mut second = ChartEngine::new(NullSurface::new(), ChartConfig::default(), Viewport::new(1024, 768));

    first.on_data_submitted(&YEARS, &VEI).expect("first engine");
    second.on_data_submitted(&YEARS, &VEI).expect("second engine");

    assert_eq!(first.last_plan(), second.last_plan());
    assert_eq!(first.surface().calls(), second.surface().calls());
}

#[test]
fn resubmitting_the_same_data_repeats_the_pass() {
    let mut engine = ChartEngine::new(NullSurface::new(), ChartConfig::default(), Viewport::new(1024, 768));

    let first = engine.on_data_submitted(&YEARS, &VEI).expect("first pass");
    let plan = engine.last_plan().cloned().expect("plan");
    let pass = engine.surface().last_pass().to_vec();

    let second = engine.on_data_submitted(&YEARS, &VEI).expect("second pass");
    assert_eq!(first, second);
    assert!(matches!(second, PassOutcome::Rendered(_)));
    assert_eq!(engine.last_plan(), Some(&plan));
    assert_eq!(engine.surface().last_pass(), pass.as_slice());
}

#[test]
fn building_a_frame_leaves_the_dataset_untouched() {
    let mut engine = ChartEngine::new(NullSurface::new(), ChartConfig::default(), Viewport::new(1024, 768));
    engine.on_data_submitted(&YEARS, &VEI).expect("pass");

    let before = engine.data().clone();
    let plan = engine.last_plan().cloned().expect("plan");
    let style = resolve_config(engine.config(), engine.viewport()).config.style;
    let once = build_frame(engine.data(), &plan, &style);
    let twice = build_frame(engine.data(), &plan, &style);

    assert_eq!(once, twice);
    assert_eq!(engine.data(), &before);
}
