//! Tests for per-date resolution over a `DailyView`.

use chrono::NaiveDate;
use slot_engine::{
    regular_source, resolve_day, AdHocSlot, AdHocSlotId, DailyView, DateException, DayOfWeek,
    ExceptionId, ExceptionSchedule, RegularSource, RuleId, Slot, SlotOrigin, SlotWindow, Status,
    WallTime, WeeklyRule,
};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn t(s: &str) -> WallTime {
    s.parse().unwrap()
}

/// 2026-03-16 is a Monday, 2026-03-17 a Tuesday.
fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 16).unwrap()
}

fn tuesday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 17).unwrap()
}

fn window(start: &str, end: &str, duration: u32, buffer: u32) -> SlotWindow {
    SlotWindow {
        start_time: t(start),
        end_time: t(end),
        duration_minutes: duration,
        buffer_minutes: buffer,
    }
}

fn rule(weekday: DayOfWeek, window: SlotWindow) -> WeeklyRule {
    WeeklyRule {
        id: RuleId::new(),
        weekday,
        window,
        status: Status::Active,
    }
}

fn exception(date: NaiveDate, schedule: ExceptionSchedule) -> DateException {
    DateException {
        id: ExceptionId::new(),
        date,
        schedule,
        status: Status::Active,
    }
}

fn adhoc(date: NaiveDate, window: SlotWindow) -> AdHocSlot {
    AdHocSlot {
        id: AdHocSlotId::new(),
        date,
        window,
        status: Status::Active,
    }
}

fn starts(slots: &[Slot], origin: SlotOrigin) -> Vec<String> {
    slots
        .iter()
        .filter(|s| s.origin == origin)
        .map(|s| s.start_time.to_string())
        .collect()
}

fn monday_view() -> DailyView {
    DailyView {
        rules: vec![rule(DayOfWeek::MONDAY, window("09:00", "12:00", 30, 0))],
        ..DailyView::empty(monday())
    }
}

// ── Weekly rule only ────────────────────────────────────────────────────────

#[test]
fn weekly_rule_governs_when_no_exception() {
    let view = monday_view();

    assert!(matches!(regular_source(&view), RegularSource::Weekly(_)));
    let slots = resolve_day(&view);
    assert_eq!(slots.len(), 6);
    assert!(slots.iter().all(|s| s.origin == SlotOrigin::Regular));
}

#[test]
fn tuesday_rule_plus_adhoc_gives_four_slots() {
    let view = DailyView {
        date: tuesday(),
        rules: vec![rule(DayOfWeek::TUESDAY, window("13:00", "14:00", 20, 0))],
        exception: None,
        adhoc_slots: vec![adhoc(tuesday(), window("18:00", "18:30", 30, 0))],
    };

    let slots = resolve_day(&view);

    assert_eq!(slots.len(), 4);
    assert_eq!(starts(&slots, SlotOrigin::Regular), ["13:00", "13:20", "13:40"]);
    assert_eq!(starts(&slots, SlotOrigin::Adhoc), ["18:00"]);
    // Regular slots always come first.
    assert_eq!(slots[3].origin, SlotOrigin::Adhoc);
}

#[test]
fn rule_for_another_weekday_is_ignored() {
    let view = DailyView {
        rules: vec![rule(DayOfWeek::WEDNESDAY, window("09:00", "12:00", 30, 0))],
        ..DailyView::empty(monday())
    };

    assert!(matches!(regular_source(&view), RegularSource::Closed));
    assert!(resolve_day(&view).is_empty());
}

#[test]
fn inactive_rule_is_ignored() {
    let mut view = monday_view();
    view.rules[0].status = Status::Inactive;

    assert!(resolve_day(&view).is_empty());
}

#[test]
fn nothing_scheduled_resolves_to_empty_list() {
    assert!(resolve_day(&DailyView::empty(monday())).is_empty());
}

// ── Exceptions ──────────────────────────────────────────────────────────────

#[test]
fn override_replaces_the_weekly_rule() {
    let override_window = window("14:00", "15:00", 20, 0);
    let mut view = monday_view();
    view.exception = Some(exception(
        monday(),
        ExceptionSchedule::Override(override_window),
    ));

    let slots = resolve_day(&view);

    assert!(matches!(regular_source(&view), RegularSource::Override(..)));
    assert_eq!(slots, override_window.slots());
    assert_eq!(starts(&slots, SlotOrigin::Regular), ["14:00", "14:20", "14:40"]);
}

#[test]
fn absent_empties_regular_slots_despite_weekly_rule() {
    let mut view = monday_view();
    view.exception = Some(exception(monday(), ExceptionSchedule::Absent));

    assert!(matches!(regular_source(&view), RegularSource::Absent(_)));
    assert!(resolve_day(&view).is_empty());
}

#[test]
fn absent_does_not_suppress_adhoc_slots() {
    let mut view = monday_view();
    view.exception = Some(exception(monday(), ExceptionSchedule::Absent));
    view.adhoc_slots = vec![adhoc(monday(), window("18:00", "19:00", 30, 0))];

    let slots = resolve_day(&view);

    assert_eq!(starts(&slots, SlotOrigin::Regular), Vec::<String>::new());
    assert_eq!(starts(&slots, SlotOrigin::Adhoc), ["18:00", "18:30"]);
}

#[test]
fn inactive_exception_falls_back_to_weekly_rule() {
    let mut view = monday_view();
    let mut absent = exception(monday(), ExceptionSchedule::Absent);
    absent.status = Status::Inactive;
    view.exception = Some(absent);

    assert_eq!(resolve_day(&view).len(), 6);
}

// ── Ad-hoc merging ──────────────────────────────────────────────────────────

#[test]
fn adhoc_windows_are_generated_independently_and_sorted() {
    let view = DailyView {
        adhoc_slots: vec![
            adhoc(monday(), window("20:00", "21:00", 60, 0)),
            adhoc(monday(), window("17:00", "18:00", 25, 5)),
        ],
        ..DailyView::empty(monday())
    };

    let slots = resolve_day(&view);

    assert_eq!(starts(&slots, SlotOrigin::Adhoc), ["17:00", "17:30", "20:00"]);
}

#[test]
fn inactive_or_other_date_adhoc_slots_are_ignored() {
    let mut inactive = adhoc(monday(), window("18:00", "19:00", 30, 0));
    inactive.status = Status::Inactive;
    let view = DailyView {
        adhoc_slots: vec![inactive, adhoc(tuesday(), window("18:00", "19:00", 30, 0))],
        ..DailyView::empty(monday())
    };

    assert!(resolve_day(&view).is_empty());
}

#[test]
fn every_active_adhoc_window_reaches_the_output() {
    // The resolver does not police overlaps; it reports what is stored.
    let mut view = monday_view();
    view.adhoc_slots = vec![
        adhoc(monday(), window("18:30", "19:30", 60, 0)),
        adhoc(monday(), window("11:45", "12:45", 60, 0)),
        adhoc(monday(), window("18:00", "19:00", 60, 0)),
    ];

    let slots = resolve_day(&view);

    assert_eq!(starts(&slots, SlotOrigin::Regular).len(), 6);
    assert_eq!(
        starts(&slots, SlotOrigin::Adhoc),
        ["11:45", "18:00", "18:30"]
    );
}

#[test]
fn resolution_is_deterministic() {
    let mut view = monday_view();
    view.adhoc_slots = vec![adhoc(monday(), window("18:00", "19:00", 20, 0))];

    assert_eq!(resolve_day(&view), resolve_day(&view));
}
