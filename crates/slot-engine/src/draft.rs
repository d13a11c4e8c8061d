//! Candidate values for creates, edits and previews.
//!
//! Drafts hold input that has not been validated yet: times may be missing
//! and minute counts are signed so a negative buffer can be reported rather
//! than rejected at parse time. The validators in [`crate::validate`] turn a
//! draft into a [`SlotWindow`]. Edits carry only the fields a caller wants to
//! change and are merged over the stored record before validation, so an
//! edit is checked exactly like a full create.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::{
    AdHocSlot, DateException, ExceptionKind, SlotWindow, Status, WeeklyRule,
};
use crate::time::{DayOfWeek, WallTime};

/// Window fields as supplied by a caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<WallTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<WallTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<i64>,
    /// Missing means no buffer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buffer_minutes: Option<i64>,
}

impl WindowDraft {
    pub fn new(start_time: WallTime, end_time: WallTime, duration_minutes: i64) -> Self {
        Self {
            start_time: Some(start_time),
            end_time: Some(end_time),
            duration_minutes: Some(duration_minutes),
            buffer_minutes: None,
        }
    }

    pub fn with_buffer(mut self, buffer_minutes: i64) -> Self {
        self.buffer_minutes = Some(buffer_minutes);
        self
    }

    /// Take every field `changes` sets, keep the rest of `self`.
    pub fn overlay(self, changes: &WindowDraft) -> WindowDraft {
        WindowDraft {
            start_time: changes.start_time.or(self.start_time),
            end_time: changes.end_time.or(self.end_time),
            duration_minutes: changes.duration_minutes.or(self.duration_minutes),
            buffer_minutes: changes.buffer_minutes.or(self.buffer_minutes),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == WindowDraft::default()
    }
}

impl From<&SlotWindow> for WindowDraft {
    fn from(window: &SlotWindow) -> Self {
        WindowDraft {
            start_time: Some(window.start_time),
            end_time: Some(window.end_time),
            duration_minutes: Some(i64::from(window.duration_minutes)),
            buffer_minutes: Some(i64::from(window.buffer_minutes)),
        }
    }
}

/// Candidate weekly rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDraft {
    pub weekday: DayOfWeek,
    #[serde(flatten)]
    pub window: WindowDraft,
    #[serde(default)]
    pub status: Status,
}

impl RuleDraft {
    pub fn new(weekday: DayOfWeek, window: WindowDraft) -> Self {
        Self {
            weekday,
            window,
            status: Status::Active,
        }
    }
}

/// Candidate date exception. Window fields only matter for `override`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExceptionDraft {
    pub date: NaiveDate,
    pub kind: ExceptionKind,
    #[serde(flatten)]
    pub window: WindowDraft,
    #[serde(default)]
    pub status: Status,
}

impl ExceptionDraft {
    pub fn absent(date: NaiveDate) -> Self {
        Self {
            date,
            kind: ExceptionKind::Absent,
            window: WindowDraft::default(),
            status: Status::Active,
        }
    }

    pub fn override_with(date: NaiveDate, window: WindowDraft) -> Self {
        Self {
            date,
            kind: ExceptionKind::Override,
            window,
            status: Status::Active,
        }
    }
}

/// Candidate ad-hoc slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdHocDraft {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub window: WindowDraft,
    #[serde(default)]
    pub status: Status,
}

impl AdHocDraft {
    pub fn new(date: NaiveDate, window: WindowDraft) -> Self {
        Self {
            date,
            window,
            status: Status::Active,
        }
    }
}

/// Partial change to a weekly rule. The weekday is fixed once created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleEdit {
    #[serde(flatten)]
    pub window: WindowDraft,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
}

impl RuleEdit {
    /// The candidate that results from applying this edit to `current`.
    pub fn merged_onto(&self, current: &WeeklyRule) -> RuleDraft {
        RuleDraft {
            weekday: current.weekday,
            window: WindowDraft::from(&current.window).overlay(&self.window),
            status: self.status.unwrap_or(current.status),
        }
    }
}

/// Partial change to a date exception. Switching from `absent` to `override`
/// needs the full window in the edit, since an absent exception has none.
/// Window fields on an edit that leaves the exception `absent` are rejected,
/// see [`ValidationLimits::validate_exception_edit`](crate::ValidationLimits::validate_exception_edit).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExceptionEdit {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ExceptionKind>,
    #[serde(flatten)]
    pub window: WindowDraft,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
}

impl ExceptionEdit {
    pub fn merged_onto(&self, current: &DateException) -> ExceptionDraft {
        let base = current
            .schedule
            .window()
            .map(WindowDraft::from)
            .unwrap_or_default();
        ExceptionDraft {
            date: current.date,
            kind: self.kind.unwrap_or(current.kind()),
            window: base.overlay(&self.window),
            status: self.status.unwrap_or(current.status),
        }
    }
}

/// Partial change to an ad-hoc slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdHocEdit {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(flatten)]
    pub window: WindowDraft,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
}

impl AdHocEdit {
    pub fn merged_onto(&self, current: &AdHocSlot) -> AdHocDraft {
        AdHocDraft {
            date: self.date.unwrap_or(current.date),
            window: WindowDraft::from(&current.window).overlay(&self.window),
            status: self.status.unwrap_or(current.status),
        }
    }
}
