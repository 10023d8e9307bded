//! sprintcast core data models.
//!
//! This crate defines the event log consumed by the projection engine, the run
//! configuration, and the per-day timeline records it produces.

#![warn(missing_docs)]

mod config;
mod date;
mod error;
mod event;
mod stats;
mod timeline;

// Dates
pub use date::{add_days, compare_dates, days_between, increment_date, normalize_date, DateLike};

// Events & configuration
pub use config::{
    Configuration, DEFAULT_DAYS_IN_SPRINT, DEFAULT_UNESTIMATED_EPIC_SIZE,
    DEFAULT_UNESTIMATED_FEATURE_SIZE, DEFAULT_UNESTIMATED_VELOCITY_FACTORS,
};
pub use event::{BucketValue, EventChange, RawEvent, StateBucket, StateBuckets, WorkItemState};

// Output
pub use stats::StatsTriple;
pub use timeline::TimelineRecord;

// Errors
pub use error::{DateError, ProjectionError, Result};
