//! In-memory [`ScheduleStore`].
//!
//! Used by the CLI and by tests. Enforces the same rules a real backend
//! would: at most one active rule per weekday, at most one exception per
//! date, and no two slots of a date overlapping once resolved. A write that
//! breaks one of them is rolled back and reported as
//! [`EngineError::Conflict`].

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::error::{EngineError, EntityKind, Result};
use crate::model::{
    AdHocSlot, AdHocSlotId, DailyView, DateException, ExceptionId, RuleId, Status, WeeklyRule,
};
use crate::patch::{AdHocPatch, ExceptionPatch, RulePatch};
use crate::resolver;
use crate::store::{NewAdHocSlot, NewException, NewRule, ScheduleStore};
use crate::time::DayOfWeek;

#[derive(Debug, Default)]
struct Tables {
    rules: Vec<WeeklyRule>,
    exceptions: Vec<DateException>,
    adhoc_slots: Vec<AdHocSlot>,
}

impl Tables {
    fn ensure_weekday_free(
        &self,
        weekday: DayOfWeek,
        status: Status,
        ignore: Option<RuleId>,
    ) -> Result<()> {
        if !status.is_active() {
            return Ok(());
        }
        let taken = self
            .rules
            .iter()
            .any(|r| Some(r.id) != ignore && r.weekday == weekday && r.status.is_active());
        if taken {
            return Err(EngineError::Conflict(format!(
                "an active weekly rule already exists for {weekday}"
            )));
        }
        Ok(())
    }

    fn ensure_date_free(&self, date: NaiveDate, ignore: Option<ExceptionId>) -> Result<()> {
        if self
            .exceptions
            .iter()
            .any(|e| Some(e.id) != ignore && e.date == date)
        {
            return Err(EngineError::Conflict(format!(
                "an exception already exists for {date}"
            )));
        }
        Ok(())
    }

    /// Resolution inputs for `date`, active records only.
    fn view(&self, date: NaiveDate) -> DailyView {
        let weekday = DayOfWeek::of(date);
        let rules = self
            .rules
            .iter()
            .filter(|r| r.weekday == weekday && r.status.is_active())
            .cloned()
            .collect();
        let exception = self
            .exceptions
            .iter()
            .find(|e| e.date == date && e.status.is_active())
            .cloned();
        let mut adhoc_slots: Vec<AdHocSlot> = self
            .adhoc_slots
            .iter()
            .filter(|a| a.date == date && a.status.is_active())
            .cloned()
            .collect();
        adhoc_slots.sort_by_key(|a| a.window.start_time);

        DailyView {
            date,
            rules,
            exception,
            adhoc_slots,
        }
    }

    /// Fail if two of the slots `date` resolves to would overlap.
    fn ensure_no_overlap(&self, date: NaiveDate) -> Result<()> {
        let mut slots = resolver::resolve_day(&self.view(date));
        slots.sort_by_key(|s| (s.start_time, s.end_time));
        // Sorted by start, any overlap shows up between neighbours.
        match slots.windows(2).find(|pair| pair[0].overlaps(&pair[1])) {
            Some(pair) => {
                warn!(%date, first = %pair[0], second = %pair[1], "write would overlap slots");
                Err(EngineError::Conflict(format!(
                    "slot {} would overlap slot {} on {date}",
                    pair[1], pair[0]
                )))
            }
            None => Ok(()),
        }
    }

    /// Re-check every date on `weekday` that carries active ad-hoc slots.
    fn ensure_weekday_clear(&self, weekday: DayOfWeek) -> Result<()> {
        let mut dates: Vec<NaiveDate> = self
            .adhoc_slots
            .iter()
            .filter(|a| a.status.is_active() && DayOfWeek::of(a.date) == weekday)
            .map(|a| a.date)
            .collect();
        dates.sort();
        dates.dedup();
        dates
            .into_iter()
            .try_for_each(|date| self.ensure_no_overlap(date))
    }

    fn rule_index(&self, id: RuleId) -> Result<usize> {
        self.rules
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| not_found(EntityKind::WeeklyRule, id))
    }

    fn exception_index(&self, id: ExceptionId) -> Result<usize> {
        self.exceptions
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| not_found(EntityKind::DateException, id))
    }

    fn adhoc_index(&self, id: AdHocSlotId) -> Result<usize> {
        self.adhoc_slots
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| not_found(EntityKind::AdHocSlot, id))
    }
}

fn not_found(kind: EntityKind, id: impl ToString) -> EngineError {
    EngineError::NotFound {
        kind,
        id: id.to_string(),
    }
}

/// A [`ScheduleStore`] backed by vectors behind an async lock.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ScheduleStore for InMemoryStore {
    async fn create_rule(&self, rule: NewRule) -> Result<WeeklyRule> {
        let mut tables = self.tables.write().await;
        tables.ensure_weekday_free(rule.weekday, rule.status, None)?;
        let record = WeeklyRule {
            id: RuleId::new(),
            weekday: rule.weekday,
            window: rule.window,
            status: rule.status,
        };
        tables.rules.push(record.clone());
        if let Err(err) = tables.ensure_weekday_clear(record.weekday) {
            tables.rules.pop();
            return Err(err);
        }
        debug!(rule_id = %record.id, weekday = %record.weekday, "stored weekly rule");
        Ok(record)
    }

    async fn update_rule(&self, id: RuleId, patch: &RulePatch) -> Result<WeeklyRule> {
        let mut tables = self.tables.write().await;
        let index = tables.rule_index(id)?;
        let mut updated = tables.rules[index].clone();
        patch.apply(&mut updated);
        tables.ensure_weekday_free(updated.weekday, updated.status, Some(id))?;
        let previous = std::mem::replace(&mut tables.rules[index], updated.clone());
        if let Err(err) = tables.ensure_weekday_clear(updated.weekday) {
            tables.rules[index] = previous;
            return Err(err);
        }
        Ok(updated)
    }

    async fn delete_rule(&self, id: RuleId) -> Result<()> {
        let mut tables = self.tables.write().await;
        let index = tables.rule_index(id)?;
        tables.rules.remove(index);
        Ok(())
    }

    async fn fetch_rule(&self, id: RuleId) -> Result<WeeklyRule> {
        let tables = self.tables.read().await;
        let index = tables.rule_index(id)?;
        Ok(tables.rules[index].clone())
    }

    async fn list_rules(&self) -> Result<Vec<WeeklyRule>> {
        let mut rules = self.tables.read().await.rules.clone();
        rules.sort_by_key(|r| r.weekday);
        Ok(rules)
    }

    async fn create_exception(&self, exception: NewException) -> Result<DateException> {
        let mut tables = self.tables.write().await;
        tables.ensure_date_free(exception.date, None)?;
        let record = DateException {
            id: ExceptionId::new(),
            date: exception.date,
            schedule: exception.schedule,
            status: exception.status,
        };
        tables.exceptions.push(record.clone());
        if let Err(err) = tables.ensure_no_overlap(record.date) {
            tables.exceptions.pop();
            return Err(err);
        }
        debug!(exception_id = %record.id, date = %record.date, "stored date exception");
        Ok(record)
    }

    async fn update_exception(
        &self,
        id: ExceptionId,
        patch: &ExceptionPatch,
    ) -> Result<DateException> {
        let mut tables = self.tables.write().await;
        let index = tables.exception_index(id)?;
        let mut updated = tables.exceptions[index].clone();
        if !patch.apply(&mut updated) {
            return Err(EngineError::Conflict(format!(
                "exception {id} cannot become an override without a complete window"
            )));
        }
        let previous = std::mem::replace(&mut tables.exceptions[index], updated.clone());
        if let Err(err) = tables.ensure_no_overlap(updated.date) {
            tables.exceptions[index] = previous;
            return Err(err);
        }
        Ok(updated)
    }

    async fn delete_exception(&self, id: ExceptionId) -> Result<()> {
        let mut tables = self.tables.write().await;
        let index = tables.exception_index(id)?;
        // The date falls back to its weekly rule, which may now collide with
        // the date's ad-hoc slots.
        let removed = tables.exceptions.remove(index);
        if let Err(err) = tables.ensure_no_overlap(removed.date) {
            tables.exceptions.insert(index, removed);
            return Err(err);
        }
        Ok(())
    }

    async fn fetch_exception(&self, id: ExceptionId) -> Result<DateException> {
        let tables = self.tables.read().await;
        let index = tables.exception_index(id)?;
        Ok(tables.exceptions[index].clone())
    }

    async fn list_exceptions(&self) -> Result<Vec<DateException>> {
        let mut exceptions = self.tables.read().await.exceptions.clone();
        exceptions.sort_by_key(|e| e.date);
        Ok(exceptions)
    }

    async fn create_adhoc_slot(&self, slot: NewAdHocSlot) -> Result<AdHocSlot> {
        let mut tables = self.tables.write().await;
        let record = AdHocSlot {
            id: AdHocSlotId::new(),
            date: slot.date,
            window: slot.window,
            status: slot.status,
        };
        tables.adhoc_slots.push(record.clone());
        if let Err(err) = tables.ensure_no_overlap(record.date) {
            tables.adhoc_slots.pop();
            return Err(err);
        }
        debug!(slot_id = %record.id, date = %record.date, "stored ad-hoc slot");
        Ok(record)
    }

    async fn update_adhoc_slot(&self, id: AdHocSlotId, patch: &AdHocPatch) -> Result<AdHocSlot> {
        let mut tables = self.tables.write().await;
        let index = tables.adhoc_index(id)?;
        let mut updated = tables.adhoc_slots[index].clone();
        patch.apply(&mut updated);
        let previous = std::mem::replace(&mut tables.adhoc_slots[index], updated.clone());
        if let Err(err) = tables.ensure_no_overlap(updated.date) {
            tables.adhoc_slots[index] = previous;
            return Err(err);
        }
        Ok(updated)
    }

    async fn delete_adhoc_slot(&self, id: AdHocSlotId) -> Result<()> {
        let mut tables = self.tables.write().await;
        let index = tables.adhoc_index(id)?;
        tables.adhoc_slots.remove(index);
        Ok(())
    }

    async fn fetch_adhoc_slot(&self, id: AdHocSlotId) -> Result<AdHocSlot> {
        let tables = self.tables.read().await;
        let index = tables.adhoc_index(id)?;
        Ok(tables.adhoc_slots[index].clone())
    }

    async fn list_adhoc_slots(&self, date: NaiveDate) -> Result<Vec<AdHocSlot>> {
        let tables = self.tables.read().await;
        let mut slots: Vec<AdHocSlot> = tables
            .adhoc_slots
            .iter()
            .filter(|a| a.date == date)
            .cloned()
            .collect();
        slots.sort_by_key(|a| a.window.start_time);
        Ok(slots)
    }

    async fn daily_view(&self, date: NaiveDate) -> Result<DailyView> {
        Ok(self.tables.read().await.view(date))
    }
}
