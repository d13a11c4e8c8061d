//! Invariant checks run before any rule, exception or ad-hoc slot is stored.
//!
//! Validators never stop at the first problem: every violation is collected
//! in order so a caller can report them together. On success they return the
//! normalised [`SlotWindow`] (or [`ExceptionSchedule`]) to store, so a value
//! that passed validation never needs checking again.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::draft::{AdHocDraft, ExceptionDraft, ExceptionEdit, RuleDraft, WindowDraft};
use crate::model::{DateException, ExceptionKind, ExceptionSchedule, SlotWindow};
use crate::time::{WallTime, MINUTES_PER_DAY};

/// A single broken invariant. `Display` is the human-readable message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    #[error("start time is required")]
    MissingStartTime,

    #[error("end time is required")]
    MissingEndTime,

    #[error("duration is required")]
    MissingDuration,

    #[error("duration must be between {min} and {max} minutes, got {actual}")]
    DurationOutOfRange { min: u32, max: u32, actual: i64 },

    #[error("duration must be at least {min} minutes, got {actual}")]
    DurationTooShort { min: u32, actual: i64 },

    #[error("duration of {0} minutes is longer than a day")]
    DurationExceedsDay(i64),

    #[error("buffer must not be negative, got {0}")]
    NegativeBuffer(i64),

    #[error("time fields only apply to an override exception")]
    WindowOnAbsent,

    #[error("end time {end} must be after start time {start}")]
    EndNotAfterStart { start: WallTime, end: WallTime },
}

/// Every violation found in one candidate, in check order. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violations(Vec<Violation>);

impl Violations {
    pub fn as_slice(&self) -> &[Violation] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, violation: &Violation) -> bool {
        self.0.contains(violation)
    }

    /// Messages suitable for showing to the person who entered the data.
    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }

    pub fn into_vec(self) -> Vec<Violation> {
        self.0
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.messages().join("; "))
    }
}

impl std::error::Error for Violations {}

impl<'a> IntoIterator for &'a Violations {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Duration bounds applied by the validators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidationLimits {
    /// Shortest slot a weekly rule or override exception may use.
    pub min_rule_duration: u32,
    /// Longest slot a weekly rule or override exception may use.
    pub max_rule_duration: u32,
    /// Shortest slot an ad-hoc window may use.
    pub min_adhoc_duration: u32,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            min_rule_duration: 15,
            max_rule_duration: 180,
            min_adhoc_duration: 20,
        }
    }
}

impl ValidationLimits {
    /// Check a weekly rule candidate.
    ///
    /// Order: start and end present, duration within the rule bounds, buffer
    /// not negative, end after start.
    pub fn validate_rule(&self, draft: &RuleDraft) -> Result<SlotWindow, Violations> {
        self.check_rule_window(&draft.window)
    }

    /// Check a date exception candidate. `override` gets the weekly rule
    /// checks; `absent` has no time fields to check and always passes.
    pub fn validate_exception(
        &self,
        draft: &ExceptionDraft,
    ) -> Result<ExceptionSchedule, Violations> {
        match draft.kind {
            ExceptionKind::Override => self
                .check_rule_window(&draft.window)
                .map(ExceptionSchedule::Override),
            ExceptionKind::Absent => Ok(ExceptionSchedule::Absent),
        }
    }

    /// Check `edit` merged over the stored `current` exception.
    ///
    /// An edit that carries window fields but leaves the exception `absent`
    /// is rejected with [`Violation::WindowOnAbsent`] instead of having
    /// those fields dropped.
    pub fn validate_exception_edit(
        &self,
        current: &DateException,
        edit: &ExceptionEdit,
    ) -> Result<ExceptionSchedule, Violations> {
        let draft = edit.merged_onto(current);
        if draft.kind == ExceptionKind::Absent && !edit.window.is_empty() {
            return Err(Violations(vec![Violation::WindowOnAbsent]));
        }
        self.validate_exception(&draft)
    }

    /// Check an ad-hoc slot candidate.
    ///
    /// Order: start and end present, start before end, duration at least the
    /// ad-hoc minimum, buffer not negative.
    pub fn validate_adhoc(&self, draft: &AdHocDraft) -> Result<SlotWindow, Violations> {
        let window = &draft.window;
        let mut violations = Vec::new();

        let (start, end) = require_times(window, &mut violations);
        check_order(start, end, &mut violations);
        let duration =
            check_min_duration(window.duration_minutes, self.min_adhoc_duration, &mut violations);
        let buffer = check_buffer(window.buffer_minutes, &mut violations);

        finish(violations, start, end, duration, buffer)
    }

    fn check_rule_window(&self, window: &WindowDraft) -> Result<SlotWindow, Violations> {
        let mut violations = Vec::new();

        let (start, end) = require_times(window, &mut violations);
        let duration = check_duration_range(
            window.duration_minutes,
            self.min_rule_duration,
            self.max_rule_duration,
            &mut violations,
        );
        let buffer = check_buffer(window.buffer_minutes, &mut violations);
        check_order(start, end, &mut violations);

        finish(violations, start, end, duration, buffer)
    }
}

/// [`ValidationLimits::validate_rule`] with the default limits.
pub fn validate_rule(draft: &RuleDraft) -> Result<SlotWindow, Violations> {
    ValidationLimits::default().validate_rule(draft)
}

/// [`ValidationLimits::validate_exception`] with the default limits.
pub fn validate_exception(draft: &ExceptionDraft) -> Result<ExceptionSchedule, Violations> {
    ValidationLimits::default().validate_exception(draft)
}

/// [`ValidationLimits::validate_adhoc`] with the default limits.
pub fn validate_adhoc_slot(draft: &AdHocDraft) -> Result<SlotWindow, Violations> {
    ValidationLimits::default().validate_adhoc(draft)
}

fn require_times(
    window: &WindowDraft,
    violations: &mut Vec<Violation>,
) -> (Option<WallTime>, Option<WallTime>) {
    if window.start_time.is_none() {
        violations.push(Violation::MissingStartTime);
    }
    if window.end_time.is_none() {
        violations.push(Violation::MissingEndTime);
    }
    (window.start_time, window.end_time)
}

fn check_order(start: Option<WallTime>, end: Option<WallTime>, violations: &mut Vec<Violation>) {
    if let (Some(start), Some(end)) = (start, end) {
        if end <= start {
            violations.push(Violation::EndNotAfterStart { start, end });
        }
    }
}

fn check_duration_range(
    duration: Option<i64>,
    min: u32,
    max: u32,
    violations: &mut Vec<Violation>,
) -> Option<u32> {
    let Some(actual) = duration else {
        violations.push(Violation::MissingDuration);
        return None;
    };
    if actual < i64::from(min) || actual > i64::from(max) {
        violations.push(Violation::DurationOutOfRange { min, max, actual });
        return None;
    }
    u32::try_from(actual).ok()
}

fn check_min_duration(
    duration: Option<i64>,
    min: u32,
    violations: &mut Vec<Violation>,
) -> Option<u32> {
    let Some(actual) = duration else {
        violations.push(Violation::MissingDuration);
        return None;
    };
    if actual < i64::from(min) {
        violations.push(Violation::DurationTooShort { min, actual });
        return None;
    }
    if actual > i64::from(MINUTES_PER_DAY) {
        violations.push(Violation::DurationExceedsDay(actual));
        return None;
    }
    u32::try_from(actual).ok()
}

fn check_buffer(buffer: Option<i64>, violations: &mut Vec<Violation>) -> Option<u32> {
    match buffer {
        None => Some(0),
        Some(b) if b < 0 => {
            violations.push(Violation::NegativeBuffer(b));
            None
        }
        // Any buffer past a day behaves like one day, so saturate.
        Some(b) => Some(u32::try_from(b).unwrap_or(u32::MAX)),
    }
}

fn finish(
    violations: Vec<Violation>,
    start: Option<WallTime>,
    end: Option<WallTime>,
    duration: Option<u32>,
    buffer: Option<u32>,
) -> Result<SlotWindow, Violations> {
    match (start, end, duration, buffer) {
        (Some(start_time), Some(end_time), Some(duration_minutes), Some(buffer_minutes))
            if violations.is_empty() =>
        {
            Ok(SlotWindow {
                start_time,
                end_time,
                duration_minutes,
                buffer_minutes,
            })
        }
        _ => Err(Violations(violations)),
    }
}
