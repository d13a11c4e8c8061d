//! Resolve the bookable slots of one date.
//!
//! The regular slots come from exactly one source, picked by a short
//! precedence chain:
//!
//! 1. an active `override` exception for the date: its own window;
//! 2. an active `absent` exception for the date: nothing;
//! 3. otherwise the active weekly rule for the date's weekday, if any.
//!
//! Active ad-hoc slots for the date are generated independently and appended
//! afterwards, tagged [`SlotOrigin::Adhoc`]. An `absent` exception does not
//! suppress them, and neither does anything else: every active ad-hoc slot
//! for the date is in the output. Keeping slots of one date apart is the
//! store's job at write time.

use crate::model::{DailyView, DateException, Slot, SlotOrigin, SlotWindow, WeeklyRule};
use crate::time::DayOfWeek;

/// The source governing a date's regular slots.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RegularSource<'a> {
    /// An active override exception replaces the weekly rule.
    Override(&'a DateException, &'a SlotWindow),
    /// An active absent exception empties the regular slots.
    Absent(&'a DateException),
    /// No active exception; the weekday's active rule applies.
    Weekly(&'a WeeklyRule),
    /// No active exception and no active rule for the weekday.
    Closed,
}

impl<'a> RegularSource<'a> {
    pub fn window(&self) -> Option<&'a SlotWindow> {
        match *self {
            RegularSource::Override(_, window) => Some(window),
            RegularSource::Weekly(rule) => Some(&rule.window),
            RegularSource::Absent(_) | RegularSource::Closed => None,
        }
    }
}

/// Pick the source of the regular slots for `view.date`.
///
/// Entries in the view that are inactive or belong to another date or
/// weekday are ignored.
pub fn regular_source(view: &DailyView) -> RegularSource<'_> {
    let exception = view
        .exception
        .as_ref()
        .filter(|e| e.status.is_active() && e.date == view.date);

    if let Some(exception) = exception {
        return match exception.schedule.window() {
            Some(window) => RegularSource::Override(exception, window),
            None => RegularSource::Absent(exception),
        };
    }

    let weekday = DayOfWeek::of(view.date);
    view.rules
        .iter()
        .find(|r| r.status.is_active() && r.weekday == weekday)
        .map_or(RegularSource::Closed, RegularSource::Weekly)
}

/// Resolve the full slot list for `view.date`: regular slots first, then
/// ad-hoc slots ordered by their window start.
pub fn resolve_day(view: &DailyView) -> Vec<Slot> {
    let mut slots: Vec<Slot> = regular_source(view)
        .window()
        .map(SlotWindow::slots)
        .unwrap_or_default();

    let mut adhoc: Vec<&SlotWindow> = view
        .adhoc_slots
        .iter()
        .filter(|a| a.status.is_active() && a.date == view.date)
        .map(|a| &a.window)
        .collect();
    adhoc.sort_by_key(|w| (w.start_time, w.end_time));

    slots.extend(
        adhoc
            .into_iter()
            .flat_map(|w| w.slots())
            .map(|s| s.with_origin(SlotOrigin::Adhoc)),
    );
    slots
}
