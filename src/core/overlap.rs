use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::event::intervals_overlap;
use crate::error::{TimelineError, TimelineResult};

/// Host-facing switch between the two grouping policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlapBehavior {
    /// Groups by fixed time buckets instead of transitive overlap.
    pub events_will_overlap: bool,
    /// Bucket size used when `events_will_overlap` is set.
    pub split_minute_interval: u32,
}

impl Default for OverlapBehavior {
    fn default() -> Self {
        Self {
            events_will_overlap: false,
            split_minute_interval: 60,
        }
    }
}

impl OverlapBehavior {
    pub fn validate(self) -> TimelineResult<Self> {
        if self.split_minute_interval == 0 {
            return Err(TimelineError::InvalidConfig(
                "split minute interval must be > 0".to_owned(),
            ));
        }
        Ok(self)
    }

    #[must_use]
    pub fn policy(self) -> OverlapPolicy {
        if self.events_will_overlap {
            OverlapPolicy::BucketSplitting {
                split_minute_interval: self.split_minute_interval,
            }
        } else {
            OverlapPolicy::CompactPacking
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OverlapPolicy {
    /// Connected components of the overlap graph share columns.
    #[default]
    CompactPacking,
    /// Events starting in the same time bucket share columns.
    ///
    /// Overlapping events from neighbouring buckets are still merged into one
    /// group so they never end up stacked on the same column.
    BucketSplitting { split_minute_interval: u32 },
}

/// Layout interval fed to the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeInterval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeInterval {
    #[must_use]
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub fn overlaps(self, other: Self) -> bool {
        intervals_overlap((self.start, self.end), (other.start, other.end))
    }
}

/// Horizontal slot of one event inside its group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ColumnAssignment {
    pub group: usize,
    pub column: usize,
    pub column_count: usize,
}

impl ColumnAssignment {
    /// Returns `(x_offset, width)` of this slot within `usable_width`.
    #[must_use]
    pub fn slot(self, usable_width: f64) -> (f64, f64) {
        let count = self.column_count.max(1) as f64;
        let width = usable_width / count;
        (self.column as f64 * width, width)
    }
}

/// Members of one layout group, listed in column order as input indices.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OverlapGroup {
    pub members: SmallVec<[usize; 4]>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OverlapResolution {
    /// Indexed like the resolver input.
    pub assignments: Vec<ColumnAssignment>,
    pub groups: Vec<OverlapGroup>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OverlapResolver {
    policy: OverlapPolicy,
}

impl OverlapResolver {
    #[must_use]
    pub fn new(policy: OverlapPolicy) -> Self {
        Self { policy }
    }

    #[must_use]
    pub fn policy(self) -> OverlapPolicy {
        self.policy
    }

    /// Partitions `intervals` into groups and assigns columns.
    ///
    /// Columns follow a stable sort on start time, so equal starts keep their
    /// input order.
    #[must_use]
    pub fn resolve(self, intervals: &[TimeInterval]) -> OverlapResolution {
        if intervals.is_empty() {
            return OverlapResolution::default();
        }

        let mut order: Vec<usize> = (0..intervals.len()).collect();
        order.sort_by_key(|&index| intervals[index].start);

        let groups = match self.policy {
            OverlapPolicy::CompactPacking => group_by_transitive_overlap(intervals, &order),
            OverlapPolicy::BucketSplitting {
                split_minute_interval,
            } => group_by_time_bucket(intervals, &order, split_minute_interval),
        };

        let mut assignments = vec![ColumnAssignment::default(); intervals.len()];
        for (group_index, group) in groups.iter().enumerate() {
            for (column, &member) in group.members.iter().enumerate() {
                assignments[member] = ColumnAssignment {
                    group: group_index,
                    column,
                    column_count: group.members.len(),
                };
            }
        }

        OverlapResolution {
            assignments,
            groups,
        }
    }
}

fn group_by_transitive_overlap(intervals: &[TimeInterval], order: &[usize]) -> Vec<OverlapGroup> {
    let mut groups: Vec<OverlapGroup> = Vec::new();
    let mut group_end: Option<NaiveDateTime> = None;

    for &index in order {
        let interval = intervals[index];
        // Sorted by start: reaching past the running max end means overlapping
        // at least the member that owns it.
        match group_end {
            Some(end) if interval.start < end => {
                if let Some(group) = groups.last_mut() {
                    group.members.push(index);
                }
                group_end = Some(end.max(interval.end));
            }
            _ => {
                groups.push(OverlapGroup {
                    members: SmallVec::from_elem(index, 1),
                });
                group_end = Some(interval.end);
            }
        }
    }

    groups
}

fn group_by_time_bucket(
    intervals: &[TimeInterval],
    order: &[usize],
    split_minute_interval: u32,
) -> Vec<OverlapGroup> {
    let Some(&first) = order.first() else {
        return Vec::new();
    };
    let anchor = intervals[first].start;
    let bucket_minutes = i64::from(split_minute_interval.max(1));

    let mut groups: Vec<OverlapGroup> = Vec::new();
    let mut group_end: Option<NaiveDateTime> = None;
    let mut group_bucket: Option<i64> = None;

    for &index in order {
        let interval = intervals[index];
        let bucket = (interval.start - anchor)
            .num_minutes()
            .div_euclid(bucket_minutes);
        let same_bucket = group_bucket == Some(bucket);
        let overlaps_group = group_end.is_some_and(|end| interval.start < end);

        if same_bucket || overlaps_group {
            if let Some(group) = groups.last_mut() {
                group.members.push(index);
            }
            group_end = group_end.map(|end| end.max(interval.end));
        } else {
            groups.push(OverlapGroup {
                members: SmallVec::from_elem(index, 1),
            });
            group_end = Some(interval.end);
        }
        group_bucket = Some(bucket);
    }

    groups
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

    use super::{OverlapPolicy, OverlapResolver, TimeInterval};
    use crate::core::event::day_start;

    fn at(hour: i64, minute: i64) -> NaiveDateTime {
        day_start(NaiveDate::from_ymd_opt(2024, 6, 3).expect("date"))
            + TimeDelta::hours(hour)
            + TimeDelta::minutes(minute)
    }

    fn interval(start: (i64, i64), end: (i64, i64)) -> TimeInterval {
        TimeInterval::new(at(start.0, start.1), at(end.0, end.1))
    }

    #[test]
    fn transitive_chain_shares_one_group() {
        let intervals = [
            interval((9, 0), (10, 0)),
            interval((9, 30), (11, 0)),
            interval((10, 30), (12, 0)),
        ];
        let resolution = OverlapResolver::default().resolve(&intervals);
        assert_eq!(resolution.groups.len(), 1);
        let columns: Vec<_> = resolution.assignments.iter().map(|a| a.column).collect();
        assert_eq!(columns, vec![0, 1, 2]);
        assert!(resolution.assignments.iter().all(|a| a.column_count == 3));
    }

    #[test]
    fn touching_intervals_form_separate_groups() {
        let intervals = [interval((9, 0), (10, 0)), interval((10, 0), (11, 0))];
        let resolution = OverlapResolver::default().resolve(&intervals);
        assert_eq!(resolution.groups.len(), 2);
        assert!(resolution.assignments.iter().all(|a| a.column == 0));
        assert!(resolution.assignments.iter().all(|a| a.column_count == 1));
    }

    #[test]
    fn equal_starts_keep_input_order() {
        let intervals = [
            interval((9, 0), (9, 45)),
            interval((9, 0), (10, 0)),
            interval((8, 0), (9, 30)),
        ];
        let resolution = OverlapResolver::default().resolve(&intervals);
        assert_eq!(resolution.assignments[2].column, 0);
        assert_eq!(resolution.assignments[0].column, 1);
        assert_eq!(resolution.assignments[1].column, 2);
    }

    #[test]
    fn unsorted_input_is_resolved_in_start_order() {
        let intervals = [interval((13, 0), (14, 0)), interval((9, 0), (10, 0))];
        let resolution = OverlapResolver::default().resolve(&intervals);
        assert_eq!(resolution.groups[0].members.as_slice(), &[1]);
        assert_eq!(resolution.groups[1].members.as_slice(), &[0]);
    }

    #[test]
    fn bucket_splitting_groups_non_overlapping_events_in_one_bucket() {
        let intervals = [
            interval((9, 0), (9, 10)),
            interval((9, 20), (9, 30)),
            interval((10, 5), (10, 20)),
        ];
        let resolver = OverlapResolver::new(OverlapPolicy::BucketSplitting {
            split_minute_interval: 60,
        });
        let resolution = resolver.resolve(&intervals);
        assert_eq!(resolution.groups.len(), 2);
        assert_eq!(resolution.assignments[0].column_count, 2);
        assert_eq!(resolution.assignments[1].column, 1);
        assert_eq!(resolution.assignments[2].column_count, 1);
    }

    #[test]
    fn bucket_splitting_merges_overlap_across_bucket_boundary() {
        let intervals = [interval((9, 0), (10, 30)), interval((10, 15), (11, 0))];
        let resolver = OverlapResolver::new(OverlapPolicy::BucketSplitting {
            split_minute_interval: 60,
        });
        let resolution = resolver.resolve(&intervals);
        assert_eq!(resolution.groups.len(), 1);
        assert_ne!(
            resolution.assignments[0].column,
            resolution.assignments[1].column
        );
    }

    #[test]
    fn slot_divides_usable_width_evenly() {
        let intervals = [interval((9, 0), (10, 0)), interval((9, 30), (10, 30))];
        let resolution = OverlapResolver::default().resolve(&intervals);
        assert_eq!(resolution.assignments[0].slot(300.0), (0.0, 150.0));
        assert_eq!(resolution.assignments[1].slot(300.0), (150.0, 150.0));
    }
}
