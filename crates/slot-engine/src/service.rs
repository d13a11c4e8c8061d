//! Schedule service: the entry point for every create, edit, delete, fetch
//! and resolution request.
//!
//! Writes are validated before the store is contacted, so a validation error
//! never reaches the backend. Edits are merged over the stored record,
//! validated as a whole and reduced to a minimal patch; an edit that changes
//! nothing returns [`EditOutcome::Unchanged`] without a write. Store errors
//! are passed through untouched.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::draft::{AdHocDraft, AdHocEdit, ExceptionDraft, ExceptionEdit, RuleDraft, RuleEdit};
use crate::error::Result;
use crate::model::{
    AdHocSlot, AdHocSlotId, DailyView, DateException, ExceptionId, RuleId, Slot, SlotOrigin,
    WeeklyRule,
};
use crate::patch::{AdHocPatch, EditOutcome, ExceptionPatch, RulePatch};
use crate::resolver;
use crate::store::{NewAdHocSlot, NewException, NewRule, ScheduleStore};
use crate::validate::{ValidationLimits, Violations};

/// Async facade over a [`ScheduleStore`] for one provider's schedule.
///
/// Validation uses the limits from the [`EngineConfig`] it was built with.
/// The service holds no state of its own beyond the store handle.
pub struct ScheduleService {
    /// Backend that owns the stored records and their uniqueness rules.
    store: Arc<dyn ScheduleStore>,
    /// Validation limits and other engine settings.
    config: EngineConfig,
}

impl ScheduleService {
    /// Build a service over `store` with the default configuration.
    pub fn new(store: Arc<dyn ScheduleStore>) -> Self {
        Self::with_config(store, EngineConfig::default())
    }

    pub fn with_config(store: Arc<dyn ScheduleStore>, config: EngineConfig) -> Self {
        Self { store, config }
    }

    /// The validation limits in effect.
    pub fn limits(&self) -> &ValidationLimits {
        &self.config.limits
    }

    // ── Weekly rules ────────────────────────────────────────────────────────

    /// Validate and store a new weekly rule.
    pub async fn create_rule(&self, draft: &RuleDraft) -> Result<WeeklyRule> {
        let window = self
            .limits()
            .validate_rule(draft)
            .map_err(|v| rejected("weekly rule", v))?;
        let rule = self
            .store
            .create_rule(NewRule {
                weekday: draft.weekday,
                window,
                status: draft.status,
            })
            .await?;
        info!(rule_id = %rule.id, weekday = %rule.weekday, "created weekly rule");
        Ok(rule)
    }

    /// Merge `edit` over the stored rule, validate the result and write only
    /// the fields that change.
    pub async fn edit_rule(&self, id: RuleId, edit: &RuleEdit) -> Result<EditOutcome<RulePatch>> {
        let current = self.store.fetch_rule(id).await?;
        let proposed = self.merge_rule(&current, edit)?;

        let patch = RulePatch::between(&current, &proposed);
        if patch.is_empty() {
            debug!(rule_id = %id, "rule edit changes nothing");
            return Ok(EditOutcome::Unchanged);
        }
        self.store.update_rule(id, &patch).await?;
        info!(rule_id = %id, "updated weekly rule");
        Ok(EditOutcome::Updated(patch))
    }

    pub async fn delete_rule(&self, id: RuleId) -> Result<()> {
        self.store.delete_rule(id).await?;
        info!(rule_id = %id, "deleted weekly rule");
        Ok(())
    }

    pub async fn fetch_rule(&self, id: RuleId) -> Result<WeeklyRule> {
        self.store.fetch_rule(id).await
    }

    /// Every rule, inactive ones included, ordered by weekday.
    pub async fn list_rule_summaries(&self) -> Result<Vec<WeeklyRule>> {
        self.store.list_rules().await
    }

    // ── Date exceptions ─────────────────────────────────────────────────────

    /// Validate and store a new date exception.
    pub async fn create_exception(&self, draft: &ExceptionDraft) -> Result<DateException> {
        let schedule = self
            .limits()
            .validate_exception(draft)
            .map_err(|v| rejected("date exception", v))?;
        let exception = self
            .store
            .create_exception(NewException {
                date: draft.date,
                schedule,
                status: draft.status,
            })
            .await?;
        info!(
            exception_id = %exception.id,
            date = %exception.date,
            kind = %exception.kind(),
            "created date exception"
        );
        Ok(exception)
    }

    /// Merge `edit` over the stored exception and write the difference.
    ///
    /// Window fields on an edit that leaves the exception `absent` are a
    /// validation error rather than being ignored.
    pub async fn edit_exception(
        &self,
        id: ExceptionId,
        edit: &ExceptionEdit,
    ) -> Result<EditOutcome<ExceptionPatch>> {
        let current = self.store.fetch_exception(id).await?;
        let schedule = self
            .limits()
            .validate_exception_edit(&current, edit)
            .map_err(|v| rejected("date exception", v))?;
        let proposed = DateException {
            schedule,
            status: edit.status.unwrap_or(current.status),
            ..current.clone()
        };

        let patch = ExceptionPatch::between(&current, &proposed);
        if patch.is_empty() {
            debug!(exception_id = %id, "exception edit changes nothing");
            return Ok(EditOutcome::Unchanged);
        }
        self.store.update_exception(id, &patch).await?;
        info!(exception_id = %id, "updated date exception");
        Ok(EditOutcome::Updated(patch))
    }

    /// Remove the exception; its date falls back to the weekly rule.
    pub async fn delete_exception(&self, id: ExceptionId) -> Result<()> {
        self.store.delete_exception(id).await?;
        info!(exception_id = %id, "deleted date exception");
        Ok(())
    }

    pub async fn fetch_exception(&self, id: ExceptionId) -> Result<DateException> {
        self.store.fetch_exception(id).await
    }

    pub async fn list_exceptions(&self) -> Result<Vec<DateException>> {
        self.store.list_exceptions().await
    }

    // ── Ad-hoc slots ────────────────────────────────────────────────────────

    /// Store a new ad-hoc slot. The store rejects it with a conflict when its
    /// slots would overlap slots the date already resolves to.
    pub async fn create_adhoc_slot(&self, draft: &AdHocDraft) -> Result<AdHocSlot> {
        let window = self
            .limits()
            .validate_adhoc(draft)
            .map_err(|v| rejected("ad-hoc slot", v))?;
        let slot = self
            .store
            .create_adhoc_slot(NewAdHocSlot {
                date: draft.date,
                window,
                status: draft.status,
            })
            .await?;
        info!(slot_id = %slot.id, date = %slot.date, "created ad-hoc slot");
        Ok(slot)
    }

    pub async fn edit_adhoc_slot(
        &self,
        id: AdHocSlotId,
        edit: &AdHocEdit,
    ) -> Result<EditOutcome<AdHocPatch>> {
        let current = self.store.fetch_adhoc_slot(id).await?;
        let draft = edit.merged_onto(&current);
        let window = self
            .limits()
            .validate_adhoc(&draft)
            .map_err(|v| rejected("ad-hoc slot", v))?;
        let proposed = AdHocSlot {
            id,
            date: draft.date,
            window,
            status: draft.status,
        };

        let patch = AdHocPatch::between(&current, &proposed);
        if patch.is_empty() {
            debug!(slot_id = %id, "ad-hoc slot edit changes nothing");
            return Ok(EditOutcome::Unchanged);
        }
        self.store.update_adhoc_slot(id, &patch).await?;
        info!(slot_id = %id, "updated ad-hoc slot");
        Ok(EditOutcome::Updated(patch))
    }

    pub async fn delete_adhoc_slot(&self, id: AdHocSlotId) -> Result<()> {
        self.store.delete_adhoc_slot(id).await?;
        info!(slot_id = %id, "deleted ad-hoc slot");
        Ok(())
    }

    pub async fn fetch_adhoc_slot(&self, id: AdHocSlotId) -> Result<AdHocSlot> {
        self.store.fetch_adhoc_slot(id).await
    }

    pub async fn list_adhoc_slots(&self, date: NaiveDate) -> Result<Vec<AdHocSlot>> {
        self.store.list_adhoc_slots(date).await
    }

    // ── Resolution ──────────────────────────────────────────────────────────

    /// The raw inputs of resolution for `date`.
    pub async fn fetch_daily_view(&self, date: NaiveDate) -> Result<DailyView> {
        self.store.daily_view(date).await
    }

    /// Bookable slots for `date`. A date with nothing scheduled resolves to
    /// an empty list.
    pub async fn resolve(&self, date: NaiveDate) -> Result<Vec<Slot>> {
        let view = self.store.daily_view(date).await?;
        let slots = resolver::resolve_day(&view);
        debug!(%date, slots = slots.len(), "resolved date");
        Ok(slots)
    }

    /// Resolve every date from `from` to `to`, both inclusive.
    pub async fn resolve_range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<(NaiveDate, Vec<Slot>)>> {
        let mut days = Vec::new();
        for date in from.iter_days().take_while(|d| *d <= to) {
            days.push((date, self.resolve(date).await?));
        }
        Ok(days)
    }

    // ── Previews ────────────────────────────────────────────────────────────
    //
    // Previews run the generator over a caller-supplied candidate and never
    // write to the store.

    pub fn preview_rule(&self, draft: &RuleDraft) -> Result<Vec<Slot>> {
        Ok(self.limits().validate_rule(draft)?.slots())
    }

    pub fn preview_exception(&self, draft: &ExceptionDraft) -> Result<Vec<Slot>> {
        let schedule = self.limits().validate_exception(draft)?;
        Ok(schedule.window().map(|w| w.slots()).unwrap_or_default())
    }

    pub fn preview_adhoc(&self, draft: &AdHocDraft) -> Result<Vec<Slot>> {
        let window = self.limits().validate_adhoc(draft)?;
        Ok(window
            .slots()
            .into_iter()
            .map(|s| s.with_origin(SlotOrigin::Adhoc))
            .collect())
    }

    /// Slots the rule would produce if `edit` were applied. Reads the stored
    /// rule but does not change it.
    pub async fn preview_rule_edit(&self, id: RuleId, edit: &RuleEdit) -> Result<Vec<Slot>> {
        let current = self.store.fetch_rule(id).await?;
        Ok(self.merge_rule(&current, edit)?.window.slots())
    }

    fn merge_rule(&self, current: &WeeklyRule, edit: &RuleEdit) -> Result<WeeklyRule> {
        let draft = edit.merged_onto(current);
        let window = self
            .limits()
            .validate_rule(&draft)
            .map_err(|v| rejected("weekly rule", v))?;
        Ok(WeeklyRule {
            id: current.id,
            weekday: current.weekday,
            window,
            status: draft.status,
        })
    }
}

fn rejected(entity: &str, violations: Violations) -> Violations {
    warn!(entity, %violations, "rejected invalid candidate");
    violations
}
