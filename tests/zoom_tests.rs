use approx::assert_relative_eq;
use chrono::{NaiveDate, NaiveDateTime, Timelike};
use timeline_rs::api::{TimelineConfig, TimelineEngine};
use timeline_rs::core::{EventId, LayoutStyle, TimedEvent, Viewport};
use timeline_rs::render::NullRenderer;

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 12).expect("date")
}

fn at(hour: u32, minute: u32) -> NaiveDateTime {
    day().and_hms_opt(hour, minute, 0).expect("time")
}

fn build_engine() -> TimelineEngine<NullRenderer> {
    let config = TimelineConfig::new(Viewport::new(600, 800));
    let mut engine =
        TimelineEngine::new(NullRenderer::default(), config, day()).expect("engine init");
    engine.set_day_events(
        day(),
        vec![TimedEvent::new(EventId::new(1), at(11, 0), at(12, 30))],
    );
    engine.relayout_if_needed();
    engine
}

fn screen_y(engine: &TimelineEngine<NullRenderer>, time: NaiveDateTime) -> f64 {
    engine.map_time_to_y(time, day()) - engine.scroll_offset()
}

fn scroll_noon_to(engine: &mut TimelineEngine<NullRenderer>, target_screen_y: f64) {
    let noon_y = engine.map_time_to_y(at(12, 0), day());
    let applied = engine
        .set_scroll_offset(noon_y - target_screen_y)
        .expect("scroll");
    assert_relative_eq!(applied, noon_y - target_screen_y);
}

#[test]
fn pinch_to_double_scale_keeps_noon_under_the_focal_point() {
    let mut engine = build_engine();
    scroll_noon_to(&mut engine, 400.0);
    assert_relative_eq!(screen_y(&engine, at(12, 0)), 400.0, epsilon = 1e-9);

    engine.pinch_begin(400.0).expect("pinch begin");
    let anchor = engine.pinch_anchor_time().expect("anchor");
    assert_eq!((anchor.hour(), anchor.minute()), (12, 0));

    engine.pinch_change(1.25).expect("change");
    engine.tick(1.0 / 60.0).expect("tick");
    engine.pinch_change(1.6).expect("change");
    engine.tick(1.0 / 60.0).expect("tick");
    assert!(engine.pinch_end());

    assert_relative_eq!(engine.points_per_minute(), 2.0, epsilon = 1e-12);
    assert_relative_eq!(screen_y(&engine, at(12, 0)), 400.0, epsilon = 1e-9);
}

#[test]
fn deltas_are_coalesced_into_one_application_per_tick() {
    let mut engine = build_engine();
    engine.pinch_begin(300.0).expect("pinch begin");
    let passes_before = engine.layout_pass_count();

    for _ in 0..50 {
        engine.pinch_change(1.01).expect("change");
    }
    assert_relative_eq!(engine.points_per_minute(), 1.0);
    assert_eq!(engine.layout_pass_count(), passes_before);

    let outcome = engine.tick(1.0 / 60.0).expect("tick");
    assert!(outcome.zoom_applied);
    assert_eq!(outcome.days_laid_out, 1);
    assert_eq!(engine.zoom_flush_count(), 1);
    assert_relative_eq!(engine.points_per_minute(), 1.01f64.powi(50), epsilon = 1e-9);

    let idle = engine.tick(1.0 / 60.0).expect("tick");
    assert!(!idle.zoom_applied);
    assert_eq!(idle.days_laid_out, 0);
}

#[test]
fn scale_is_clamped_to_configured_bounds() {
    let mut engine = build_engine();
    engine.pinch_begin(300.0).expect("pinch begin");
    engine.pinch_change(100.0).expect("change");
    engine.tick(0.016).expect("tick");
    assert_relative_eq!(engine.points_per_minute(), 6.0);

    // The container floor (800 - 2 * 8) / 1440 sits above the configured minimum.
    engine.pinch_change(0.0001).expect("change");
    engine.tick(0.016).expect("tick");
    assert_relative_eq!(engine.points_per_minute(), 784.0 / 1_440.0, epsilon = 1e-12);
    engine.pinch_end();
}

#[test]
fn container_floor_raises_the_minimum_scale() {
    let config = TimelineConfig::new(Viewport::new(600, 1_456));
    let mut engine =
        TimelineEngine::new(NullRenderer::default(), config, day()).expect("engine init");
    // (1456 - 2 * 8) / 1440 = 1.0
    assert!(!engine.set_points_per_minute(0.5));
    assert_relative_eq!(engine.points_per_minute(), 1.0);
}

#[test]
fn set_zoom_clamps_silently() {
    let mut engine = build_engine();
    assert!(engine.set_points_per_minute(50.0));
    assert_relative_eq!(engine.points_per_minute(), 6.0);
    assert!(!engine.set_points_per_minute(f64::NAN));
}

#[test]
fn invalid_pinch_samples_are_rejected() {
    let mut engine = build_engine();
    engine.pinch_begin(100.0).expect("pinch begin");
    assert!(engine.pinch_change(-1.0).is_err());
    assert!(engine.pinch_change(f64::INFINITY).is_err());
    assert!(engine.pinch_begin(f64::NAN).is_err());
}

#[test]
fn pinch_cancel_drops_pending_factor_but_relayouts() {
    let mut engine = build_engine();
    engine.pinch_begin(200.0).expect("pinch begin");
    engine.pinch_change(1.5).expect("change");
    let passes = engine.layout_pass_count();

    assert!(engine.pinch_cancel());
    assert!(!engine.is_pinching());
    assert_relative_eq!(engine.points_per_minute(), 1.0);
    assert_eq!(engine.layout_pass_count(), passes + 1);
    assert!(!engine.pinch_cancel());
}

#[test]
fn layout_animations_are_suppressed_during_a_pinch() {
    let mut engine = build_engine();
    assert!(engine.layout_animations_enabled());
    engine.pinch_begin(200.0).expect("pinch begin");
    assert!(!engine.layout_animations_enabled());
    engine.render().expect("render");
    let frame = engine.renderer().last_frame.clone().expect("frame");
    assert!(!frame.layout_animations_enabled);

    engine.pinch_end();
    assert!(engine.layout_animations_enabled());
}

#[test]
fn pinch_end_applies_pending_factor() {
    let mut engine = build_engine();
    engine.pinch_begin(200.0).expect("pinch begin");
    engine.pinch_change(1.5).expect("change");
    assert!(engine.pinch_end());
    assert_relative_eq!(engine.points_per_minute(), 1.5, epsilon = 1e-12);
}

#[test]
fn working_frame_follows_its_interval_while_zooming() {
    let mut engine = build_engine();
    assert!(engine.begin_edit(EventId::new(1)));
    let before = engine.working_frame().expect("frame");

    engine.pinch_begin(300.0).expect("pinch begin");
    engine.pinch_change(2.0).expect("change");
    engine.tick(0.016).expect("tick");

    let after = engine.working_frame().expect("frame");
    assert_relative_eq!(after.x, before.x);
    assert_relative_eq!(after.width, before.width);
    assert_relative_eq!(after.y, engine.map_time_to_y(at(11, 0), day()), epsilon = 1e-9);
    assert_relative_eq!(after.height, 90.0 * 2.0, epsilon = 1e-9);
    assert!(engine.is_editing());
}

#[test]
fn scroll_offset_is_clamped_to_content() {
    let mut engine = build_engine();
    let max = engine.content_height() - 800.0;
    assert_relative_eq!(engine.set_scroll_offset(1e9).expect("scroll"), max);
    assert_relative_eq!(engine.set_scroll_offset(-5.0).expect("scroll"), 0.0);
    assert!(engine.set_scroll_offset(f64::NAN).is_err());
}

#[test]
fn scroll_to_time_places_time_at_top() {
    let mut engine = build_engine();
    let offset = engine.scroll_to_time(at(8, 0));
    assert_relative_eq!(offset, 8.0 + 8.0 * 60.0);
}

#[test]
fn resizing_the_viewport_can_raise_the_scale() {
    let mut engine = build_engine();
    engine
        .set_viewport(Viewport::new(600, 2_896))
        .expect("viewport");
    assert_relative_eq!(engine.points_per_minute(), 2.0, epsilon = 1e-12);
    assert!(engine.set_viewport(Viewport::new(0, 100)).is_err());
}

#[test]
fn default_layout_style_is_used() {
    let engine = build_engine();
    assert_eq!(engine.config().layout_style, LayoutStyle::default());
}
