//! Schedule files: a JSON snapshot of one provider's drafts.
//!
//! ```json
//! {
//!   "rules":       [{ "weekday": 1, "start_time": "09:00", "end_time": "12:00", "duration_minutes": 30 }],
//!   "exceptions":  [{ "date": "2026-03-17", "kind": "absent" }],
//!   "adhoc_slots": [{ "date": "2026-03-17", "start_time": "18:00", "end_time": "18:30", "duration_minutes": 30 }]
//! }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use slot_engine::{AdHocDraft, ExceptionDraft, RuleDraft, ScheduleService, ValidationLimits};
use tracing::info;

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScheduleFile {
    pub rules: Vec<RuleDraft>,
    pub exceptions: Vec<ExceptionDraft>,
    pub adhoc_slots: Vec<AdHocDraft>,
}

/// Validation result for one entry of a schedule file.
#[derive(Debug, Serialize)]
pub struct EntryReport {
    pub entry: String,
    pub violations: Vec<String>,
}

impl EntryReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

impl ScheduleFile {
    pub fn parse(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse schedule file")
    }

    /// Run every draft through the validators, one report per entry.
    pub fn validate(&self, limits: &ValidationLimits) -> Vec<EntryReport> {
        let report = |entry: String, result: std::result::Result<(), slot_engine::Violations>| {
            EntryReport {
                entry,
                violations: result.err().map(|v| v.messages()).unwrap_or_default(),
            }
        };

        let rules = self.rules.iter().enumerate().map(|(i, draft)| {
            report(format!("rules[{i}]"), limits.validate_rule(draft).map(drop))
        });
        let exceptions = self.exceptions.iter().enumerate().map(|(i, draft)| {
            report(
                format!("exceptions[{i}]"),
                limits.validate_exception(draft).map(drop),
            )
        });
        let adhoc = self.adhoc_slots.iter().enumerate().map(|(i, draft)| {
            report(
                format!("adhoc_slots[{i}]"),
                limits.validate_adhoc(draft).map(drop),
            )
        });

        rules.chain(exceptions).chain(adhoc).collect()
    }

    /// Create every draft through the service, so validation and store
    /// conflicts apply exactly as they would for a live provider.
    pub async fn load_into(&self, service: &ScheduleService) -> Result<()> {
        for (i, draft) in self.rules.iter().enumerate() {
            service
                .create_rule(draft)
                .await
                .with_context(|| format!("rules[{i}] was rejected"))?;
        }
        for (i, draft) in self.exceptions.iter().enumerate() {
            service
                .create_exception(draft)
                .await
                .with_context(|| format!("exceptions[{i}] was rejected"))?;
        }
        for (i, draft) in self.adhoc_slots.iter().enumerate() {
            service
                .create_adhoc_slot(draft)
                .await
                .with_context(|| format!("adhoc_slots[{i}] was rejected"))?;
        }
        info!(
            rules = self.rules.len(),
            exceptions = self.exceptions.len(),
            adhoc_slots = self.adhoc_slots.len(),
            "loaded schedule"
        );
        Ok(())
    }
}
