//! Core of randevu: classification, merging and availability for a public,
//! privacy-safe view of an appointment calendar.

pub mod availability;
pub mod category;
pub mod civil;
pub mod classify;
pub mod event;
pub mod fold;
pub mod locale;
pub mod merge;
pub mod name;
pub mod pipeline;
pub mod policy;
pub mod time;
pub mod tracing;

pub use availability::derive_availability;
pub use category::Category;
pub use civil::CivilZone;
pub use classify::{Classifier, ClassifierConfig, Verdict};
pub use event::{AvailableSlot, Block, CalendarEvent, ClassifiedEvent, MergedBlock, PublicEvent};
pub use fold::FoldTable;
pub use locale::Language;
pub use merge::MergeEngine;
pub use name::{NameNormalizer, abbreviate};
pub use pipeline::{Pipeline, PipelineConfig, Schedule, ScheduleRequest};
pub use policy::{BlackoutRule, ClockWindow, DayPolicy, PolicyConfig, PolicyError, WeeklyHours};
pub use time::{EventTime, Interval};
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
