//! Run configuration for the projection engine.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ProjectionError, Result};
use crate::stats::StatsTriple;

/// Default sprint length in days.
pub const DEFAULT_DAYS_IN_SPRINT: u32 = 14;
/// Default story points assumed for an unestimated epic.
pub const DEFAULT_UNESTIMATED_EPIC_SIZE: f64 = 25.0;
/// Default story points assumed for an unestimated feature.
pub const DEFAULT_UNESTIMATED_FEATURE_SIZE: f64 = 8.0;
/// Default `[min, max]` multipliers applied to unestimated work.
pub const DEFAULT_UNESTIMATED_VELOCITY_FACTORS: (f64, f64) = (0.5, 2.0);

/// Immutable parameters for one projection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    /// Any date known to be a sprint boundary
    pub any_sprint_boundary: NaiveDate,

    /// Sprint length in days
    #[serde(default = "default_days_in_sprint")]
    pub days_in_sprint: u32,

    /// Size substituted for each unestimated epic
    #[serde(default = "default_unestimated_epic_size")]
    pub unestimated_epic_size: f64,

    /// Size substituted for each unestimated feature
    #[serde(default = "default_unestimated_feature_size")]
    pub unestimated_feature_size: f64,

    /// Trailing sprint window for velocity stats (None = every sprint)
    #[serde(default)]
    pub use_previous_n_sprints_for_average_velocity: Option<usize>,

    /// `[min, max]` multipliers widening the unestimated-work projection
    #[serde(default = "default_unestimated_velocity_factors")]
    pub unestimated_velocity_factors: (f64, f64),

    /// Externally supplied velocity replacing the computed one
    #[serde(default)]
    pub velocity_overrides: Option<StatsTriple<f64>>,

    /// Apply `velocity_overrides` to every day rather than only the last
    #[serde(default)]
    pub use_velocity_overrides_for_all_dates: bool,
}

fn default_days_in_sprint() -> u32 {
    DEFAULT_DAYS_IN_SPRINT
}

fn default_unestimated_epic_size() -> f64 {
    DEFAULT_UNESTIMATED_EPIC_SIZE
}

fn default_unestimated_feature_size() -> f64 {
    DEFAULT_UNESTIMATED_FEATURE_SIZE
}

fn default_unestimated_velocity_factors() -> (f64, f64) {
    DEFAULT_UNESTIMATED_VELOCITY_FACTORS
}

impl Configuration {
    /// Create a configuration with defaults for everything but the anchor.
    pub fn new(any_sprint_boundary: NaiveDate) -> Self {
        Self {
            any_sprint_boundary,
            days_in_sprint: default_days_in_sprint(),
            unestimated_epic_size: default_unestimated_epic_size(),
            unestimated_feature_size: default_unestimated_feature_size(),
            use_previous_n_sprints_for_average_velocity: None,
            unestimated_velocity_factors: default_unestimated_velocity_factors(),
            velocity_overrides: None,
            use_velocity_overrides_for_all_dates: false,
        }
    }

    /// Set the sprint length.
    pub fn with_days_in_sprint(mut self, days: u32) -> Self {
        self.days_in_sprint = days;
        self
    }

    /// Set the fallback sizes for unestimated epics and features.
    pub fn with_unestimated_sizes(mut self, epic: f64, feature: f64) -> Self {
        self.unestimated_epic_size = epic;
        self.unestimated_feature_size = feature;
        self
    }

    /// Limit velocity stats to the trailing `n` sprints.
    pub fn with_velocity_window(mut self, n: usize) -> Self {
        self.use_previous_n_sprints_for_average_velocity = Some(n);
        self
    }

    /// Set the `[min, max]` unestimated-work multipliers.
    pub fn with_unestimated_velocity_factors(mut self, min: f64, max: f64) -> Self {
        self.unestimated_velocity_factors = (min, max);
        self
    }

    /// Replace computed velocity with `overrides`, on every day or only the last.
    pub fn with_velocity_overrides(mut self, overrides: StatsTriple<f64>, all_dates: bool) -> Self {
        self.velocity_overrides = Some(overrides);
        self.use_velocity_overrides_for_all_dates = all_dates;
        self
    }

    /// Check the configuration for values the engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.days_in_sprint == 0 {
            return Err(ProjectionError::InvalidConfig(
                "days_in_sprint must be greater than zero".to_string(),
            ));
        }

        if self.use_previous_n_sprints_for_average_velocity == Some(0) {
            return Err(ProjectionError::InvalidConfig(
                "use_previous_n_sprints_for_average_velocity must be greater than zero".to_string(),
            ));
        }

        for (name, size) in [
            ("unestimated_epic_size", self.unestimated_epic_size),
            ("unestimated_feature_size", self.unestimated_feature_size),
        ] {
            if !size.is_finite() || size < 0.0 {
                return Err(ProjectionError::InvalidConfig(format!(
                    "{} must be a non-negative number, got {}",
                    name, size
                )));
            }
        }

        let (min, max) = self.unestimated_velocity_factors;
        if !min.is_finite() || !max.is_finite() || min < 0.0 || min > max {
            return Err(ProjectionError::InvalidConfig(format!(
                "unestimated_velocity_factors must satisfy 0 <= min <= max, got [{}, {}]",
                min, max
            )));
        }

        if let Some(overrides) = &self.velocity_overrides {
            if !overrides.min.is_finite() || !overrides.average.is_finite() || !overrides.max.is_finite() {
                return Err(ProjectionError::InvalidConfig(
                    "velocity_overrides must be finite".to_string(),
                ));
            }
        }

        Ok(())
    }
}
