use approx::assert_relative_eq;
use chrono::{NaiveDate, NaiveDateTime};
use timeline_rs::api::{TimelineConfig, TimelineEngine};
use timeline_rs::core::{
    EditHandle, EventId, LayoutEngine, LayoutStyle, OverlapBehavior, OverlapPolicy, ScaleBounds,
    ScaleState, TimedEvent, Viewport,
};
use timeline_rs::render::NullRenderer;

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 12).expect("date")
}

fn at(hour: u32, minute: u32) -> NaiveDateTime {
    day().and_hms_opt(hour, minute, 0).expect("time")
}

fn timed(id: u64, start: (u32, u32), end: (u32, u32)) -> TimedEvent {
    TimedEvent::new(EventId::new(id), at(start.0, start.1), at(end.0, end.1))
}

fn flat_style() -> LayoutStyle {
    LayoutStyle {
        vertical_inset: 0.0,
        event_gap: 0.0,
        ..LayoutStyle::default()
    }
}

fn build_engine() -> TimelineEngine<NullRenderer> {
    let config = TimelineConfig::new(Viewport::new(700, 800)).with_layout_style(flat_style());
    TimelineEngine::new(NullRenderer::default(), config, day()).expect("engine init")
}

#[test]
fn two_overlapping_events_split_the_day_in_half() {
    let mut engine = build_engine();
    engine.set_day_events(day(), vec![timed(1, (9, 0), (10, 0)), timed(2, (9, 30), (10, 30))]);
    engine.relayout_if_needed();

    let layout = engine.day_layout(day()).expect("layout");
    let first = layout.frame(EventId::new(1)).expect("first frame");
    let second = layout.frame(EventId::new(2)).expect("second frame");
    assert_relative_eq!(first.width, 350.0);
    assert_relative_eq!(second.width, 350.0);
    assert_relative_eq!(first.x, 0.0);
    assert_relative_eq!(second.x, 350.0);
}

#[test]
fn short_event_is_floored_to_a_fifth_of_an_hour() {
    let style = flat_style();
    let engine = LayoutEngine::new(style, OverlapPolicy::CompactPacking);
    let scale = ScaleState::new(50.0 / 60.0, ScaleBounds::default()).expect("scale");

    let layout = engine.layout_day(&[timed(1, (9, 0), (9, 5))], day(), 300.0, scale);
    let frame = layout.frame(EventId::new(1)).expect("frame");
    assert_relative_eq!(frame.height, 0.2 * 50.0, epsilon = 1e-9);
    assert_relative_eq!(frame.y, 9.0 * 50.0, epsilon = 1e-9);
}

#[test]
fn floor_does_not_mutate_the_stored_interval() {
    let mut engine = build_engine();
    engine.set_day_events(day(), vec![timed(1, (9, 0), (9, 5))]);
    engine.relayout_if_needed();
    let event = engine.event(EventId::new(1)).expect("event");
    assert_eq!(event.end, at(9, 5));
}

#[test]
fn floored_events_that_visually_collide_share_a_group() {
    let mut engine = build_engine();
    // 09:00-09:05 is stretched to 09:12 for grouping, reaching into 09:10.
    engine.set_day_events(day(), vec![timed(1, (9, 0), (9, 5)), timed(2, (9, 10), (9, 40))]);
    engine.relayout_if_needed();

    let layout = engine.day_layout(day()).expect("layout");
    let first = layout.assignments[&EventId::new(1)];
    let second = layout.assignments[&EventId::new(2)];
    assert_eq!(first.group, second.group);
    assert_eq!(first.column_count, 2);
}

#[test]
fn touching_events_keep_full_width() {
    let mut engine = build_engine();
    engine.set_day_events(day(), vec![timed(1, (9, 0), (10, 0)), timed(2, (10, 0), (11, 0))]);
    engine.relayout_if_needed();

    let layout = engine.day_layout(day()).expect("layout");
    for id in [1, 2] {
        let frame = layout.frame(EventId::new(id)).expect("frame");
        assert_relative_eq!(frame.x, 0.0);
        assert_relative_eq!(frame.width, 700.0);
    }
}

#[test]
fn unordered_input_is_sorted_before_packing() {
    let mut engine = build_engine();
    engine.set_day_events(day(), vec![timed(2, (9, 30), (10, 30)), timed(1, (9, 0), (10, 0))]);
    engine.relayout_if_needed();

    let layout = engine.day_layout(day()).expect("layout");
    assert_eq!(layout.assignments[&EventId::new(1)].column, 0);
    assert_eq!(layout.assignments[&EventId::new(2)].column, 1);
}

#[test]
fn equal_starts_keep_provider_order() {
    let mut engine = build_engine();
    engine.set_day_events(day(), vec![timed(7, (9, 0), (10, 0)), timed(3, (9, 0), (11, 0))]);
    engine.relayout_if_needed();

    let layout = engine.day_layout(day()).expect("layout");
    assert_eq!(layout.assignments[&EventId::new(7)].column, 0);
    assert_eq!(layout.assignments[&EventId::new(3)].column, 1);
}

#[test]
fn bucket_splitting_groups_events_by_time_bucket() {
    let config = TimelineConfig::new(Viewport::new(600, 800))
        .with_layout_style(flat_style())
        .with_overlap_behavior(OverlapBehavior {
            events_will_overlap: true,
            split_minute_interval: 60,
        });
    let mut engine = TimelineEngine::new(NullRenderer::default(), config, day()).expect("engine");
    engine.set_day_events(
        day(),
        vec![
            timed(1, (9, 0), (9, 20)),
            timed(2, (9, 40), (9, 55)),
            timed(3, (10, 30), (10, 50)),
        ],
    );
    engine.relayout_if_needed();

    let layout = engine.day_layout(day()).expect("layout");
    let a = layout.assignments[&EventId::new(1)];
    let b = layout.assignments[&EventId::new(2)];
    let c = layout.assignments[&EventId::new(3)];
    assert_eq!(a.group, b.group);
    assert_eq!((a.column, b.column, a.column_count), (0, 1, 2));
    assert_ne!(c.group, a.group);
    assert_eq!(c.column_count, 1);
}

#[test]
fn all_day_events_go_to_a_capped_band() {
    let mut engine = build_engine();
    let mut events: Vec<TimedEvent> = (1..=4)
        .map(|id| TimedEvent::all_day(EventId::new(id), day()))
        .collect();
    events.push(timed(10, (9, 0), (10, 0)));
    engine.set_day_events(day(), events);
    engine.relayout_if_needed();

    let layout = engine.day_layout(day()).expect("layout");
    assert_eq!(layout.all_day_frames.len(), 4);
    assert_eq!(layout.timed_frames.len(), 1);
    assert_relative_eq!(layout.all_day_content_height, 96.0);
    assert_relative_eq!(layout.all_day_band_height, 72.0);
}

#[test]
fn no_all_day_events_collapse_the_band() {
    let mut engine = build_engine();
    engine.set_day_events(day(), vec![timed(1, (9, 0), (10, 0))]);
    engine.relayout_if_needed();
    let layout = engine.day_layout(day()).expect("layout");
    assert_relative_eq!(layout.all_day_band_height, 0.0);
}

#[test]
fn relayout_on_unchanged_input_is_idempotent() {
    let mut engine = build_engine();
    engine.set_day_events(
        day(),
        vec![
            timed(1, (8, 0), (9, 30)),
            timed(2, (9, 0), (10, 0)),
            timed(3, (9, 15), (9, 20)),
        ],
    );
    engine.relayout_if_needed();
    let first = engine.day_layout(day()).expect("layout").clone();
    engine.relayout();
    let second = engine.day_layout(day()).expect("layout").clone();
    assert_eq!(first, second);
}

#[test]
fn only_dirty_days_are_laid_out() {
    let mut engine = build_engine();
    let next = day().succ_opt().expect("next day");
    engine
        .set_visible_days(vec![day(), next])
        .expect("visible days");
    assert_eq!(engine.relayout_if_needed(), 2);
    assert_eq!(engine.relayout_if_needed(), 0);

    engine.set_day_events(next, vec![TimedEvent::new(
        EventId::new(1),
        next.and_hms_opt(9, 0, 0).expect("time"),
        next.and_hms_opt(10, 0, 0).expect("time"),
    )]);
    assert_eq!(engine.relayout_if_needed(), 1);
    assert_eq!(engine.layout_pass_count(), 3);
}

#[test]
fn malformed_interval_is_clamped_to_one_minute() {
    let mut engine = build_engine();
    let normalized = engine.set_day_events(day(), vec![timed(1, (9, 0), (8, 0))]);
    assert_eq!(normalized, 1);
    let event = engine.event(EventId::new(1)).expect("event");
    assert_eq!(event.end, at(9, 1));
}

#[test]
fn multi_day_columns_are_offset_in_timeline_space() {
    let mut engine = build_engine();
    let next = day().succ_opt().expect("next day");
    engine
        .set_visible_days(vec![day(), next])
        .expect("visible days");
    engine.set_day_events(next, vec![TimedEvent::new(
        EventId::new(5),
        next.and_hms_opt(2, 0, 0).expect("time"),
        next.and_hms_opt(3, 0, 0).expect("time"),
    )]);
    engine.relayout_if_needed();

    let frame = engine.event_frame(next, EventId::new(5)).expect("frame");
    assert_relative_eq!(frame.x, 350.0);
    assert_relative_eq!(frame.width, 350.0);

    let hit = engine.hit_test(400.0, 150.0).expect("hit");
    assert_eq!(hit.day, next);
    assert_eq!(hit.hit.id, EventId::new(5));
    assert_eq!(hit.hit.handle, EditHandle::Body);
    assert!(engine.hit_test(100.0, 150.0).is_none());
}

#[test]
fn overnight_event_appears_clamped_on_both_days() {
    let mut engine = build_engine();
    let next = day().succ_opt().expect("next day");
    engine
        .set_visible_days(vec![day(), next])
        .expect("visible days");
    let overnight = TimedEvent::new(
        EventId::new(9),
        at(23, 0),
        next.and_hms_opt(1, 0, 0).expect("time"),
    );
    engine.set_day_events(day(), vec![overnight.clone()]);
    engine.set_day_events(next, vec![overnight]);
    engine.relayout_if_needed();

    let today = engine.event_frame(day(), EventId::new(9)).expect("today");
    assert_relative_eq!(today.y, 23.0 * 60.0);
    assert_relative_eq!(today.max_y(), 24.0 * 60.0);
    let tomorrow = engine.event_frame(next, EventId::new(9)).expect("tomorrow");
    assert_relative_eq!(tomorrow.y, 0.0);
    assert_relative_eq!(tomorrow.max_y(), 60.0);
}
