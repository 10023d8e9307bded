//! Raw event model - daily observations from the work-item source.

use serde::{Deserialize, Serialize};

/// Work-item state as reported by the tracking system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkItemState {
    /// Newly created
    New,
    /// Sized but not yet scheduled
    Estimated,
    /// Scheduled, waiting to start
    Pending,
    /// In progress
    Active,
    /// Done
    Closed,
    /// Removed from the backlog
    Removed,
}

impl WorkItemState {
    /// The status bucket this state is counted in, if any.
    pub fn bucket(&self) -> Option<StateBucket> {
        match self {
            WorkItemState::New | WorkItemState::Estimated => Some(StateBucket::Created),
            WorkItemState::Pending => Some(StateBucket::Pending),
            WorkItemState::Active => Some(StateBucket::Active),
            WorkItemState::Closed => Some(StateBucket::Completed),
            WorkItemState::Removed => None,
        }
    }
}

/// One of the four status buckets tracked per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateBucket {
    /// Created or otherwise uncategorized
    Created,
    /// Waiting to start
    Pending,
    /// In progress
    Active,
    /// Done
    Completed,
}

/// A value that can be tallied in a [`StateBuckets`].
///
/// Integer counts saturate at their maximum instead of overflowing.
pub trait BucketValue: Copy {
    /// Sum of two tallies.
    fn tally(self, other: Self) -> Self;
}

impl BucketValue for u32 {
    fn tally(self, other: Self) -> Self {
        self.saturating_add(other)
    }
}

impl BucketValue for u64 {
    fn tally(self, other: Self) -> Self {
        self.saturating_add(other)
    }
}

impl BucketValue for f64 {
    fn tally(self, other: Self) -> Self {
        self + other
    }
}

/// Per-status totals for one tracked category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StateBuckets<T> {
    /// Created or otherwise uncategorized
    #[serde(default)]
    pub created: T,
    /// Waiting to start
    #[serde(default)]
    pub pending: T,
    /// In progress
    #[serde(default)]
    pub active: T,
    /// Done
    #[serde(default)]
    pub completed: T,
}

impl<T: BucketValue> StateBuckets<T> {
    /// Create buckets from explicit values.
    pub fn new(created: T, pending: T, active: T, completed: T) -> Self {
        Self {
            created,
            pending,
            active,
            completed,
        }
    }

    /// Add another set of buckets into this one, bucket by bucket.
    pub fn merge(&mut self, other: &StateBuckets<T>) {
        self.created = self.created.tally(other.created);
        self.pending = self.pending.tally(other.pending);
        self.active = self.active.tally(other.active);
        self.completed = self.completed.tally(other.completed);
    }

    /// Work not yet completed (created + pending + active).
    pub fn remaining(&self) -> T {
        self.created.tally(self.pending).tally(self.active)
    }

    /// Sum over all buckets.
    pub fn total(&self) -> T {
        self.remaining().tally(self.completed)
    }

    /// Value of a single bucket.
    pub fn get(&self, bucket: StateBucket) -> T {
        match bucket {
            StateBucket::Created => self.created,
            StateBucket::Pending => self.pending,
            StateBucket::Active => self.active,
            StateBucket::Completed => self.completed,
        }
    }
}

/// A single work-item state change recorded on an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventChange {
    /// The work item that changed
    pub work_item_id: String,
    /// The epic the work item belongs to (equal to `work_item_id` for epics)
    pub epic_id: String,
    /// Size after the change, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    /// State after the change
    pub state: WorkItemState,
}

/// An observation of the backlog on a given date.
///
/// Several events may share a date; they are summed, never overwritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    /// Date or date-time of the observation, normalized by the engine
    pub date: String,

    /// Epics with a size
    #[serde(default)]
    pub epics_estimated_num: StateBuckets<u32>,
    /// Epics without a size
    #[serde(default)]
    pub epics_unestimated_num: StateBuckets<u32>,

    /// Features with a size
    #[serde(default)]
    pub features_estimated_num: StateBuckets<u32>,
    /// Features without a size
    #[serde(default)]
    pub features_unestimated_num: StateBuckets<u32>,
    /// Story points of sized features; absent when the source has no size data
    #[serde(default)]
    pub features_estimated_size: Option<StateBuckets<f64>>,

    /// Owning team, if the source tracks one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,

    /// Work-item changes observed on this date
    #[serde(default)]
    pub changes: Vec<EventChange>,
}

impl RawEvent {
    /// Create an empty event for a date.
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            epics_estimated_num: StateBuckets::default(),
            epics_unestimated_num: StateBuckets::default(),
            features_estimated_num: StateBuckets::default(),
            features_unestimated_num: StateBuckets::default(),
            features_estimated_size: None,
            team: None,
            changes: Vec::new(),
        }
    }

    /// Set the estimated feature sizes.
    pub fn with_features_estimated_size(mut self, size: StateBuckets<f64>) -> Self {
        self.features_estimated_size = Some(size);
        self
    }

    /// Set the estimated feature counts.
    pub fn with_features_estimated_num(mut self, num: StateBuckets<u32>) -> Self {
        self.features_estimated_num = num;
        self
    }

    /// Set the unestimated feature counts.
    pub fn with_features_unestimated_num(mut self, num: StateBuckets<u32>) -> Self {
        self.features_unestimated_num = num;
        self
    }

    /// Set the estimated epic counts.
    pub fn with_epics_estimated_num(mut self, num: StateBuckets<u32>) -> Self {
        self.epics_estimated_num = num;
        self
    }

    /// Set the unestimated epic counts.
    pub fn with_epics_unestimated_num(mut self, num: StateBuckets<u32>) -> Self {
        self.epics_unestimated_num = num;
        self
    }

    /// Set the team.
    pub fn with_team(mut self, team: impl Into<String>) -> Self {
        self.team = Some(team.into());
        self
    }

    /// Append a work-item change.
    pub fn with_change(mut self, change: EventChange) -> Self {
        self.changes.push(change);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_bucket_mapping() {
        assert_eq!(WorkItemState::New.bucket(), Some(StateBucket::Created));
        assert_eq!(WorkItemState::Estimated.bucket(), Some(StateBucket::Created));
        assert_eq!(WorkItemState::Pending.bucket(), Some(StateBucket::Pending));
        assert_eq!(WorkItemState::Active.bucket(), Some(StateBucket::Active));
        assert_eq!(WorkItemState::Closed.bucket(), Some(StateBucket::Completed));
        assert_eq!(WorkItemState::Removed.bucket(), None);
    }

    #[test]
    fn test_buckets_merge_and_remaining() {
        let mut a = StateBuckets::new(1u32, 2, 3, 4);
        a.merge(&StateBuckets::new(10, 20, 30, 40));

        assert_eq!(a, StateBuckets::new(11, 22, 33, 44));
        assert_eq!(a.remaining(), 66);
        assert_eq!(a.total(), 110);
        assert_eq!(a.get(StateBucket::Completed), 44);
    }

    #[test]
    fn test_count_buckets_saturate() {
        let mut counts = StateBuckets::new(4_000_000_000u32, 0, 0, 0);
        counts.merge(&StateBuckets::new(4_000_000_000, 0, 0, 1));
        assert_eq!(counts.created, u32::MAX);

        let crowded = StateBuckets::new(3_000_000_000u32, 3_000_000_000, 1, 1);
        assert_eq!(crowded.remaining(), u32::MAX);
        assert_eq!(crowded.total(), u32::MAX);
    }

    #[test]
    fn test_raw_event_missing_categories_default() {
        let event: RawEvent = serde_json::from_str(
            r#"{"date": "2023-01-01", "features_estimated_num": {"active": 2}}"#,
        )
        .unwrap();

        assert_eq!(event.features_estimated_num, StateBuckets::new(0, 0, 2, 0));
        assert_eq!(event.epics_estimated_num, StateBuckets::default());
        assert!(event.features_estimated_size.is_none());
        assert!(event.changes.is_empty());
        assert!(event.team.is_none());
    }

    #[test]
    fn test_raw_event_changes_deserialize() {
        let event: RawEvent = serde_json::from_str(
            r#"{
                "date": "2023-01-01",
                "features_estimated_size": {"created": 3, "pending": 0, "active": 5, "completed": 8},
                "team": "Core",
                "changes": [
                    {"work_item_id": "12", "epic_id": "3", "size": 5, "state": "Active"},
                    {"work_item_id": "3", "epic_id": "3", "state": "New"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(event.features_estimated_size, Some(StateBuckets::new(3.0, 0.0, 5.0, 8.0)));
        assert_eq!(event.team.as_deref(), Some("Core"));
        assert_eq!(event.changes.len(), 2);
        assert_eq!(event.changes[0].size, Some(5.0));
        assert_eq!(event.changes[1].size, None);
        assert_eq!(event.changes[1].state, WorkItemState::New);
    }
}
