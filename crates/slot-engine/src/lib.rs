//! # slot-engine
//!
//! Availability slot resolution for a service provider with a weekly working
//! pattern.
//!
//! Three sources decide what can be booked on a date: a recurring weekly rule
//! per weekday, at most one exception per date (a replacement window or a
//! full absence), and any number of short-notice ad-hoc slots. The engine
//! validates these inputs, turns windows into concrete slots, and resolves
//! which source governs each date.
//!
//! ## Quick start
//!
//! ```rust
//! use slot_engine::{generate, WallTime};
//!
//! let start: WallTime = "09:00".parse().unwrap();
//! let end: WallTime = "12:00".parse().unwrap();
//!
//! // 30-minute slots with a 10-minute buffer between them.
//! let slots = generate(start, end, 30, 10);
//! let starts: Vec<String> = slots.iter().map(|s| s.start_time.to_string()).collect();
//! assert_eq!(starts, ["09:00", "09:40", "10:20", "11:00"]);
//! ```
//!
//! ## Modules
//!
//! - [`time`] — wall-clock times and the Sunday-based weekday index
//! - [`model`] — stored rules, exceptions, ad-hoc slots and computed slots
//! - [`draft`] — unvalidated candidates and partial edits
//! - [`validate`] — invariant checks collecting every violation
//! - [`generator`] — window + duration + buffer → slots
//! - [`resolver`] — per-date precedence and ad-hoc merging
//! - [`patch`] — minimal patches for edits
//! - [`store`] — persistence port
//! - [`memory`] — in-memory store
//! - [`service`] — async facade over a store
//! - [`config`] — engine configuration
//! - [`error`] — error types

pub mod config;
pub mod draft;
pub mod error;
pub mod generator;
pub mod memory;
pub mod model;
pub mod patch;
pub mod resolver;
pub mod service;
pub mod store;
pub mod time;
pub mod validate;

pub use config::EngineConfig;
pub use draft::{AdHocDraft, AdHocEdit, ExceptionDraft, ExceptionEdit, RuleDraft, RuleEdit, WindowDraft};
pub use error::{EngineError, EntityKind};
pub use generator::generate;
pub use memory::InMemoryStore;
pub use model::{
    AdHocSlot, AdHocSlotId, DailyView, DateException, ExceptionId, ExceptionKind,
    ExceptionSchedule, RuleId, Slot, SlotOrigin, SlotWindow, Status, WeeklyRule,
};
pub use patch::{AdHocPatch, EditOutcome, ExceptionPatch, RulePatch, WindowPatch};
pub use resolver::{regular_source, resolve_day, RegularSource};
pub use service::ScheduleService;
pub use store::ScheduleStore;
pub use time::{DayOfWeek, WallTime};
pub use validate::{
    validate_adhoc_slot, validate_exception, validate_rule, ValidationLimits, Violation,
    Violations,
};
