//! Minimal patches for edits.
//!
//! A patch is the field-by-field difference between the stored record and the
//! validated result of an edit. Only fields whose value actually changes are
//! set, and an empty patch means the edit changes nothing.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::{
    AdHocSlot, DateException, ExceptionKind, ExceptionSchedule, SlotWindow, Status, WeeklyRule,
};
use crate::time::WallTime;

/// The result of an edit request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "patch", rename_all = "snake_case")]
pub enum EditOutcome<P> {
    /// The patch was sent to the store.
    Updated(P),
    /// Nothing differed from the stored record, so no write was made.
    Unchanged,
}

impl<P> EditOutcome<P> {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, EditOutcome::Unchanged)
    }

    pub fn patch(&self) -> Option<&P> {
        match self {
            EditOutcome::Updated(patch) => Some(patch),
            EditOutcome::Unchanged => None,
        }
    }
}

fn changed<T: PartialEq + Copy>(current: T, proposed: T) -> Option<T> {
    (current != proposed).then_some(proposed)
}

/// Sparse change to a [`SlotWindow`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<WallTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<WallTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buffer_minutes: Option<u32>,
}

impl WindowPatch {
    /// Difference from `current` to `proposed`. With no current window every
    /// field of `proposed` is included.
    pub fn between(current: Option<&SlotWindow>, proposed: &SlotWindow) -> Self {
        match current {
            Some(current) => WindowPatch {
                start_time: changed(current.start_time, proposed.start_time),
                end_time: changed(current.end_time, proposed.end_time),
                duration_minutes: changed(current.duration_minutes, proposed.duration_minutes),
                buffer_minutes: changed(current.buffer_minutes, proposed.buffer_minutes),
            },
            None => WindowPatch {
                start_time: Some(proposed.start_time),
                end_time: Some(proposed.end_time),
                duration_minutes: Some(proposed.duration_minutes),
                buffer_minutes: Some(proposed.buffer_minutes),
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == WindowPatch::default()
    }

    pub fn apply(&self, window: &mut SlotWindow) {
        if let Some(start_time) = self.start_time {
            window.start_time = start_time;
        }
        if let Some(end_time) = self.end_time {
            window.end_time = end_time;
        }
        if let Some(duration_minutes) = self.duration_minutes {
            window.duration_minutes = duration_minutes;
        }
        if let Some(buffer_minutes) = self.buffer_minutes {
            window.buffer_minutes = buffer_minutes;
        }
    }

    /// A full window, if every field is set.
    pub fn to_window(&self) -> Option<SlotWindow> {
        Some(SlotWindow {
            start_time: self.start_time?,
            end_time: self.end_time?,
            duration_minutes: self.duration_minutes?,
            buffer_minutes: self.buffer_minutes?,
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulePatch {
    #[serde(flatten)]
    pub window: WindowPatch,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
}

impl RulePatch {
    pub fn between(current: &WeeklyRule, proposed: &WeeklyRule) -> Self {
        RulePatch {
            window: WindowPatch::between(Some(&current.window), &proposed.window),
            status: changed(current.status, proposed.status),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty() && self.status.is_none()
    }

    pub fn apply(&self, rule: &mut WeeklyRule) {
        self.window.apply(&mut rule.window);
        if let Some(status) = self.status {
            rule.status = status;
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExceptionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ExceptionKind>,
    #[serde(flatten)]
    pub window: WindowPatch,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
}

impl ExceptionPatch {
    pub fn between(current: &DateException, proposed: &DateException) -> Self {
        let window = match proposed.schedule.window() {
            Some(window) => WindowPatch::between(current.schedule.window(), window),
            None => WindowPatch::default(),
        };
        ExceptionPatch {
            kind: changed(current.kind(), proposed.kind()),
            window,
            status: changed(current.status, proposed.status),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.kind.is_none() && self.window.is_empty() && self.status.is_none()
    }

    /// Apply to a stored exception. Returns `false`, leaving the exception
    /// untouched, when the patch switches to `override` without a full window.
    pub fn apply(&self, exception: &mut DateException) -> bool {
        let schedule = match (self.kind, exception.schedule) {
            (Some(ExceptionKind::Absent), _) => ExceptionSchedule::Absent,
            (Some(ExceptionKind::Override), ExceptionSchedule::Absent) => {
                match self.window.to_window() {
                    Some(window) => ExceptionSchedule::Override(window),
                    None => return false,
                }
            }
            (_, ExceptionSchedule::Override(mut window)) => {
                self.window.apply(&mut window);
                ExceptionSchedule::Override(window)
            }
            (None, ExceptionSchedule::Absent) => ExceptionSchedule::Absent,
        };
        exception.schedule = schedule;
        if let Some(status) = self.status {
            exception.status = status;
        }
        true
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdHocPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(flatten)]
    pub window: WindowPatch,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
}

impl AdHocPatch {
    pub fn between(current: &AdHocSlot, proposed: &AdHocSlot) -> Self {
        AdHocPatch {
            date: changed(current.date, proposed.date),
            window: WindowPatch::between(Some(&current.window), &proposed.window),
            status: changed(current.status, proposed.status),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.date.is_none() && self.window.is_empty() && self.status.is_none()
    }

    pub fn apply(&self, slot: &mut AdHocSlot) {
        if let Some(date) = self.date {
            slot.date = date;
        }
        self.window.apply(&mut slot.window);
        if let Some(status) = self.status {
            slot.status = status;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ExceptionId, RuleId};
    use crate::time::DayOfWeek;

    fn window(start: &str, end: &str, duration: u32, buffer: u32) -> SlotWindow {
        SlotWindow {
            start_time: start.parse().unwrap(),
            end_time: end.parse().unwrap(),
            duration_minutes: duration,
            buffer_minutes: buffer,
        }
    }

    fn rule(window: SlotWindow) -> WeeklyRule {
        WeeklyRule {
            id: RuleId::new(),
            weekday: DayOfWeek::MONDAY,
            window,
            status: Status::Active,
        }
    }

    #[test]
    fn buffer_only_change_yields_buffer_only_patch() {
        let current = rule(window("09:00", "12:00", 30, 0));
        let mut proposed = current.clone();
        proposed.window.buffer_minutes = 10;

        let patch = RulePatch::between(&current, &proposed);

        assert_eq!(
            patch,
            RulePatch {
                window: WindowPatch {
                    buffer_minutes: Some(10),
                    ..WindowPatch::default()
                },
                status: None,
            }
        );
        let json = serde_json::to_value(patch).unwrap();
        assert_eq!(json, serde_json::json!({ "buffer_minutes": 10 }));
    }

    #[test]
    fn identical_records_give_empty_patch() {
        let current = rule(window("09:00", "12:00", 30, 0));
        assert!(RulePatch::between(&current, &current.clone()).is_empty());
    }

    #[test]
    fn switching_absent_to_override_carries_whole_window() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 16).unwrap();
        let mut current = DateException {
            id: ExceptionId::new(),
            date,
            schedule: ExceptionSchedule::Absent,
            status: Status::Active,
        };
        let mut proposed = current.clone();
        proposed.schedule = ExceptionSchedule::Override(window("10:00", "11:00", 30, 0));

        let patch = ExceptionPatch::between(&current, &proposed);
        assert_eq!(patch.kind, Some(ExceptionKind::Override));
        assert_eq!(patch.window.to_window(), proposed.schedule.window().copied());

        assert!(patch.apply(&mut current));
        assert_eq!(current, proposed);
    }

    #[test]
    fn override_without_window_is_not_applied() {
        let mut exception = DateException {
            id: ExceptionId::new(),
            date: NaiveDate::from_ymd_opt(2026, 3, 16).unwrap(),
            schedule: ExceptionSchedule::Absent,
            status: Status::Active,
        };
        let before = exception.clone();
        let patch = ExceptionPatch {
            kind: Some(ExceptionKind::Override),
            ..ExceptionPatch::default()
        };
        assert!(!patch.apply(&mut exception));
        assert_eq!(exception, before);
    }
}
