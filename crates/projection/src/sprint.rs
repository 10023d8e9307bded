//! Sprint boundary alignment.
//!
//! Boundaries sit at `anchor + k * days_in_sprint` for every integer `k`,
//! including negative ones, so the anchor can be any boundary at all.

use chrono::NaiveDate;
use sprintcast_core::{days_between, increment_date, ProjectionError, Result};

/// Earliest sprint boundary on or after `date`.
///
/// `days_in_sprint` must be positive; see [`SprintCalendar::new`] for the
/// checked entry point.
pub fn align_to_boundary(anchor: NaiveDate, days_in_sprint: u32, date: NaiveDate) -> NaiveDate {
    let length = i64::from(days_in_sprint.max(1));
    let diff = days_between(anchor, date);
    let sprints = (diff + length - 1).div_euclid(length);

    increment_date(anchor, sprints * length)
}

/// Earliest sprint boundary strictly after `date`.
pub fn next_boundary_strictly_after(anchor: NaiveDate, days_in_sprint: u32, date: NaiveDate) -> NaiveDate {
    let aligned = align_to_boundary(anchor, days_in_sprint, date);

    if aligned == date {
        align_to_boundary(anchor, days_in_sprint, increment_date(date, 1))
    } else {
        aligned
    }
}

/// A validated boundary grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SprintCalendar {
    anchor: NaiveDate,
    days_in_sprint: u32,
}

impl SprintCalendar {
    /// Create a calendar; `days_in_sprint` must be positive.
    pub fn new(anchor: NaiveDate, days_in_sprint: u32) -> Result<Self> {
        if days_in_sprint == 0 {
            return Err(ProjectionError::InvalidConfig(
                "days_in_sprint must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            anchor,
            days_in_sprint,
        })
    }

    /// The reference boundary.
    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    /// Sprint length in days.
    pub fn days_in_sprint(&self) -> u32 {
        self.days_in_sprint
    }

    /// Earliest boundary on or after `date`.
    pub fn align(&self, date: NaiveDate) -> NaiveDate {
        align_to_boundary(self.anchor, self.days_in_sprint, date)
    }

    /// Earliest boundary strictly after `date`.
    pub fn next_boundary_after(&self, date: NaiveDate) -> NaiveDate {
        next_boundary_strictly_after(self.anchor, self.days_in_sprint, date)
    }

    /// Whether `date` is a boundary.
    pub fn is_boundary(&self, date: NaiveDate) -> bool {
        self.align(date) == date
    }

    /// Start of the sprint containing `date` (the latest boundary on or before it).
    pub fn current_sprint_start(&self, date: NaiveDate) -> NaiveDate {
        self.next_boundary_after(increment_date(date, -i64::from(self.days_in_sprint)))
    }

    /// Every boundary in `[from, to]`, ascending.
    pub fn boundaries_between(&self, from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
        let mut boundaries = Vec::new();
        let mut current = self.align(from);

        while current <= to {
            boundaries.push(current);

            let next = increment_date(current, i64::from(self.days_in_sprint));
            if next == current {
                break;
            }
            current = next;
        }

        boundaries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn calendar() -> SprintCalendar {
        SprintCalendar::new(ymd(2023, 1, 1), 14).unwrap()
    }

    #[test]
    fn test_align_on_boundary_is_identity() {
        assert_eq!(calendar().align(ymd(2023, 1, 1)), ymd(2023, 1, 1));
        assert_eq!(calendar().align(ymd(2023, 1, 15)), ymd(2023, 1, 15));
        assert!(calendar().is_boundary(ymd(2023, 1, 29)));
    }

    #[test]
    fn test_align_rounds_up() {
        assert_eq!(calendar().align(ymd(2023, 1, 2)), ymd(2023, 1, 15));
        assert_eq!(calendar().align(ymd(2023, 1, 14)), ymd(2023, 1, 15));
        assert!(!calendar().is_boundary(ymd(2023, 1, 14)));
    }

    #[test]
    fn test_align_before_anchor() {
        assert_eq!(calendar().align(ymd(2022, 12, 31)), ymd(2023, 1, 1));
        assert_eq!(calendar().align(ymd(2022, 12, 18)), ymd(2022, 12, 18));
        assert_eq!(calendar().align(ymd(2022, 12, 17)), ymd(2022, 12, 18));
    }

    #[test]
    fn test_next_boundary_strictly_after() {
        assert_eq!(calendar().next_boundary_after(ymd(2023, 1, 1)), ymd(2023, 1, 15));
        assert_eq!(calendar().next_boundary_after(ymd(2023, 1, 14)), ymd(2023, 1, 15));
        assert_eq!(calendar().next_boundary_after(ymd(2023, 1, 15)), ymd(2023, 1, 29));
    }

    #[test]
    fn test_current_sprint_start() {
        assert_eq!(calendar().current_sprint_start(ymd(2023, 1, 1)), ymd(2023, 1, 1));
        assert_eq!(calendar().current_sprint_start(ymd(2023, 1, 10)), ymd(2023, 1, 1));
        assert_eq!(calendar().current_sprint_start(ymd(2023, 1, 14)), ymd(2023, 1, 1));
        assert_eq!(calendar().current_sprint_start(ymd(2023, 1, 15)), ymd(2023, 1, 15));
    }

    #[test]
    fn test_one_day_sprints() {
        let calendar = SprintCalendar::new(ymd(2023, 1, 1), 1).unwrap();
        assert!(calendar.is_boundary(ymd(2023, 5, 17)));
        assert_eq!(calendar.next_boundary_after(ymd(2023, 5, 17)), ymd(2023, 5, 18));
    }

    #[test]
    fn test_boundaries_between() {
        let boundaries = calendar().boundaries_between(ymd(2023, 1, 2), ymd(2023, 2, 12));
        assert_eq!(boundaries, vec![ymd(2023, 1, 15), ymd(2023, 1, 29), ymd(2023, 2, 12)]);

        assert!(calendar().boundaries_between(ymd(2023, 1, 2), ymd(2023, 1, 3)).is_empty());
    }

    #[test]
    fn test_zero_length_rejected() {
        assert!(matches!(
            SprintCalendar::new(ymd(2023, 1, 1), 0),
            Err(ProjectionError::InvalidConfig(_))
        ));
    }
}
