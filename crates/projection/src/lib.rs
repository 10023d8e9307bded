//! Timeline Projection (Layer 2)
//!
//! Turns a daily event log into per-day statistics and completion forecasts:
//! sprint boundary alignment, same-day aggregation, rolling velocity, and
//! best/average/worst completion dates.

#![warn(missing_docs)]

pub mod aggregate;
pub mod builder;
pub mod projector;
pub mod sprint;
pub mod velocity;

pub use aggregate::DayAggregate;
pub use builder::{create_timeline, TimelineBuilder};
pub use projector::{far_future_date, DateProjector};
pub use sprint::{align_to_boundary, next_boundary_strictly_after, SprintCalendar};
pub use velocity::VelocityCalculator;
