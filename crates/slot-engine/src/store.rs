//! Persistence port.
//!
//! The engine never stores anything itself. Every write goes through a
//! [`ScheduleStore`], which owns uniqueness checks (one active rule per
//! weekday, one exception per date, no overlapping slots on a date) and
//! reports them as
//! [`EngineError::Conflict`](crate::EngineError::Conflict). Unknown ids are
//! [`EngineError::NotFound`](crate::EngineError::NotFound); an unreachable
//! backend is [`EngineError::Transport`](crate::EngineError::Transport).

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::Result;
use crate::model::{
    AdHocSlot, AdHocSlotId, DailyView, DateException, ExceptionId, ExceptionSchedule, RuleId,
    SlotWindow, Status, WeeklyRule,
};
use crate::patch::{AdHocPatch, ExceptionPatch, RulePatch};
use crate::time::DayOfWeek;

/// A validated weekly rule that has no id yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewRule {
    pub weekday: DayOfWeek,
    pub window: SlotWindow,
    pub status: Status,
}

/// A validated date exception that has no id yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewException {
    pub date: NaiveDate,
    pub schedule: ExceptionSchedule,
    pub status: Status,
}

/// A validated ad-hoc slot that has no id yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewAdHocSlot {
    pub date: NaiveDate,
    pub window: SlotWindow,
    pub status: Status,
}

/// Storage for one provider's rules, exceptions and ad-hoc slots.
#[async_trait]
pub trait ScheduleStore: Send + Sync {
    /// Store a new rule. `Conflict` if its weekday already has an active
    /// rule or its slots would overlap an ad-hoc slot on that weekday.
    async fn create_rule(&self, rule: NewRule) -> Result<WeeklyRule>;
    /// Apply `patch` to a stored rule and return the updated record.
    async fn update_rule(&self, id: RuleId, patch: &RulePatch) -> Result<WeeklyRule>;
    async fn delete_rule(&self, id: RuleId) -> Result<()>;
    async fn fetch_rule(&self, id: RuleId) -> Result<WeeklyRule>;
    /// All rules, active and inactive.
    async fn list_rules(&self) -> Result<Vec<WeeklyRule>>;

    /// Store a new exception. `Conflict` if the date already has one.
    async fn create_exception(&self, exception: NewException) -> Result<DateException>;
    /// Apply `patch` to a stored exception. A patch switching to `override`
    /// must carry a complete window.
    async fn update_exception(
        &self,
        id: ExceptionId,
        patch: &ExceptionPatch,
    ) -> Result<DateException>;
    /// Remove an exception so its date falls back to the weekly rule.
    async fn delete_exception(&self, id: ExceptionId) -> Result<()>;
    async fn fetch_exception(&self, id: ExceptionId) -> Result<DateException>;
    /// All exceptions ordered by date, active and inactive.
    async fn list_exceptions(&self) -> Result<Vec<DateException>>;

    /// Store a new ad-hoc slot. `Conflict` if its slots would overlap slots
    /// the date already resolves to.
    async fn create_adhoc_slot(&self, slot: NewAdHocSlot) -> Result<AdHocSlot>;
    /// Apply `patch` to a stored ad-hoc slot, possibly moving it to another
    /// date. Subject to the same overlap check as a create.
    async fn update_adhoc_slot(&self, id: AdHocSlotId, patch: &AdHocPatch) -> Result<AdHocSlot>;
    async fn delete_adhoc_slot(&self, id: AdHocSlotId) -> Result<()>;
    async fn fetch_adhoc_slot(&self, id: AdHocSlotId) -> Result<AdHocSlot>;
    /// All ad-hoc slots attached to `date`, active and inactive.
    async fn list_adhoc_slots(&self, date: NaiveDate) -> Result<Vec<AdHocSlot>>;

    /// Active rules for the date's weekday, the date's active exception and
    /// its active ad-hoc slots.
    async fn daily_view(&self, date: NaiveDate) -> Result<DailyView>;
}
