//! Same-day event aggregation.

use sprintcast_core::{EventChange, RawEvent, StateBuckets};

/// Running per-category totals for one calendar day.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DayAggregate {
    /// Sized epics
    pub epics_estimated_num: StateBuckets<u32>,
    /// Unsized epics
    pub epics_unestimated_num: StateBuckets<u32>,
    /// Sized features
    pub features_estimated_num: StateBuckets<u32>,
    /// Unsized features
    pub features_unestimated_num: StateBuckets<u32>,
    /// Story points of sized features, `None` until an event reports sizes
    pub features_estimated_size: Option<StateBuckets<f64>>,
    /// Work-item changes, in event order, not deduplicated
    pub changes: Vec<EventChange>,
}

impl DayAggregate {
    /// Aggregate every event of one day into a fresh total.
    pub fn from_events<'a>(events: impl IntoIterator<Item = &'a RawEvent>) -> Self {
        let mut aggregate = Self::default();
        for event in events {
            aggregate.update(event);
        }
        aggregate
    }

    /// Add one event into the running totals.
    pub fn update(&mut self, event: &RawEvent) {
        self.epics_estimated_num.merge(&event.epics_estimated_num);
        self.epics_unestimated_num.merge(&event.epics_unestimated_num);
        self.features_estimated_num.merge(&event.features_estimated_num);
        self.features_unestimated_num.merge(&event.features_unestimated_num);

        if let Some(size) = &event.features_estimated_size {
            self.features_estimated_size
                .get_or_insert_with(StateBuckets::default)
                .merge(size);
        }

        self.changes.extend(event.changes.iter().cloned());
    }

    /// Completed story points, if any event reported sizes.
    pub fn completed_size(&self) -> Option<f64> {
        self.features_estimated_size.map(|size| size.completed)
    }

    /// Remaining sized work (created + pending + active story points).
    pub fn estimated_remaining_size(&self) -> f64 {
        self.features_estimated_size
            .map(|size| size.remaining())
            .unwrap_or(0.0)
    }

    /// Remaining unsized epics at `epic_size` points each.
    pub fn unestimated_epics_size(&self, epic_size: f64) -> f64 {
        f64::from(self.epics_unestimated_num.remaining()) * epic_size
    }

    /// Remaining unsized features at `feature_size` points each.
    pub fn unestimated_features_size(&self, feature_size: f64) -> f64 {
        f64::from(self.features_unestimated_num.remaining()) * feature_size
    }
}
