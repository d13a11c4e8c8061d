//! Stored schedule entities and the computed [`Slot`].
//!
//! [`WeeklyRule`], [`DateException`] and [`AdHocSlot`] are the durable inputs
//! owned by a single provider. Records of these types have already passed
//! validation, so their time fields live in a [`SlotWindow`] with unsigned
//! minute counts. A [`Slot`] is derived on demand and never stored.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::generator;
use crate::time::{DayOfWeek, WallTime};

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }
    };
}

entity_id!(
    /// Identifier of a [`WeeklyRule`].
    RuleId
);
entity_id!(
    /// Identifier of a [`DateException`].
    ExceptionId
);
entity_id!(
    /// Identifier of an [`AdHocSlot`].
    AdHocSlotId
);

/// Whether a stored entity takes part in resolution.
///
/// Inactive entities are kept so schedule history stays inspectable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Active,
    Inactive,
}

impl Status {
    pub fn is_active(self) -> bool {
        self == Status::Active
    }
}

/// A validated time window with its slot duration and inter-slot buffer.
///
/// Invariant: `end_time > start_time`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotWindow {
    /// Start of the first slot.
    pub start_time: WallTime,
    /// No slot may end after this time.
    pub end_time: WallTime,
    /// Length of every slot in the window.
    pub duration_minutes: u32,
    /// Gap between consecutive slots. Never applied after the last one.
    #[serde(default)]
    pub buffer_minutes: u32,
}

impl SlotWindow {
    /// Run the slot generator over this window.
    pub fn slots(&self) -> Vec<Slot> {
        generator::generate(
            self.start_time,
            self.end_time,
            self.duration_minutes,
            self.buffer_minutes,
        )
    }
}

/// The recurring template for one weekday.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyRule {
    pub id: RuleId,
    /// The weekday this rule applies to. Fixed once created.
    pub weekday: DayOfWeek,
    #[serde(flatten)]
    pub window: SlotWindow,
    #[serde(default)]
    pub status: Status,
}

/// Discriminant of a [`DateException`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExceptionKind {
    /// The date uses its own window instead of the weekly rule.
    Override,
    /// The provider is unavailable under the recurring pattern that date.
    Absent,
}

impl fmt::Display for ExceptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExceptionKind::Override => f.write_str("override"),
            ExceptionKind::Absent => f.write_str("absent"),
        }
    }
}

/// What a date exception does to the regular slots of its date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExceptionSchedule {
    Override(SlotWindow),
    Absent,
}

impl ExceptionSchedule {
    pub fn kind(&self) -> ExceptionKind {
        match self {
            ExceptionSchedule::Override(_) => ExceptionKind::Override,
            ExceptionSchedule::Absent => ExceptionKind::Absent,
        }
    }

    pub fn window(&self) -> Option<&SlotWindow> {
        match self {
            ExceptionSchedule::Override(window) => Some(window),
            ExceptionSchedule::Absent => None,
        }
    }
}

/// A per-date departure from the weekly template. At most one per date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateException {
    pub id: ExceptionId,
    pub date: NaiveDate,
    #[serde(flatten)]
    pub schedule: ExceptionSchedule,
    #[serde(default)]
    pub status: Status,
}

impl DateException {
    pub fn kind(&self) -> ExceptionKind {
        self.schedule.kind()
    }
}

/// Short-notice availability attached to one date.
///
/// Layered on top of the regular slots and never suppressed by an exception.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdHocSlot {
    pub id: AdHocSlotId,
    pub date: NaiveDate,
    #[serde(flatten)]
    pub window: SlotWindow,
    #[serde(default)]
    pub status: Status,
}

/// Which source produced a [`Slot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotOrigin {
    /// From the weekly rule or an override exception.
    Regular,
    /// From an ad-hoc slot for the date.
    Adhoc,
}

/// A concrete bookable interval `[start_time, end_time)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    /// Inclusive start.
    pub start_time: WallTime,
    /// Exclusive end, at most `24:00`.
    pub end_time: WallTime,
    /// The source the slot was generated from.
    pub origin: SlotOrigin,
}

impl Slot {
    pub fn new(start_time: WallTime, end_time: WallTime, origin: SlotOrigin) -> Self {
        Self {
            start_time,
            end_time,
            origin,
        }
    }

    /// The same interval, tagged with another origin.
    pub fn with_origin(self, origin: SlotOrigin) -> Self {
        Self { origin, ..self }
    }

    pub fn duration_minutes(&self) -> u32 {
        self.end_time.minutes().saturating_sub(self.start_time.minutes())
    }

    /// Half-open overlap test. Touching slots do not overlap.
    pub fn overlaps(&self, other: &Slot) -> bool {
        self.start_time < other.end_time && other.start_time < self.end_time
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start_time, self.end_time)
    }
}

/// The raw inputs of resolution for one date, as returned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyView {
    pub date: NaiveDate,
    /// Active weekly rules for the date's weekday.
    pub rules: Vec<WeeklyRule>,
    /// The active exception for the date, if any.
    pub exception: Option<DateException>,
    /// Active ad-hoc slots for the date.
    pub adhoc_slots: Vec<AdHocSlot>,
}

impl DailyView {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            rules: Vec::new(),
            exception: None,
            adhoc_slots: Vec::new(),
        }
    }
}
