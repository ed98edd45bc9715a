use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Interval {
    start: f64,
    finish: f64,
}

impl Interval {
    /// Open-interval overlap with `[start, end)`; touching endpoints do not count.
    fn overlaps(&self, start: f64, end: f64) -> bool {
        self.finish > self.start && self.start < end && start < self.finish
    }
}

/// Booked intervals per crew category. Lives for one leveling run.
#[derive(Debug, Default)]
pub(crate) struct CategoryPool {
    booked: HashMap<String, Vec<Interval>>,
}

impl CategoryPool {
    /// Earliest start at or after `ready` where a task of `duration` keeps the
    /// category at or below `capacity` concurrent crews for its whole span.
    ///
    /// Each retry jumps to the earliest finish among the conflicting
    /// intervals, which is strictly later than the current candidate, so the
    /// search ends after at most one step per booked interval.
    pub(crate) fn earliest_slot(&self, category: &str, ready: f64, duration: f64, capacity: usize) -> f64 {
        let capacity = capacity.max(1);
        let Some(booked) = self.booked.get(category) else {
            return ready;
        };
        if duration <= 0.0 {
            return ready;
        }

        let mut start = ready;
        loop {
            let end = start + duration;
            let conflicting: Vec<Interval> = booked
                .iter()
                .copied()
                .filter(|iv| iv.overlaps(start, end))
                .collect();
            if peak_load(&conflicting, start, end) < capacity {
                return start;
            }
            start = conflicting
                .iter()
                .map(|iv| iv.finish)
                .fold(f64::INFINITY, f64::min);
        }
    }

    pub(crate) fn reserve(&mut self, category: &str, start: f64, finish: f64) {
        if finish <= start {
            return;
        }
        self.booked
            .entry(category.to_string())
            .or_default()
            .push(Interval { start, finish });
    }
}

/// Maximum number of intervals simultaneously active inside `[start, end)`.
fn peak_load(intervals: &[Interval], start: f64, end: f64) -> usize {
    let mut events: Vec<(f64, i32)> = Vec::with_capacity(intervals.len() * 2);
    for iv in intervals {
        events.push((iv.start.max(start), 1));
        events.push((iv.finish.min(end), -1));
    }
    // Releases sort before acquisitions at the same instant.
    events.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

    let mut load = 0i32;
    let mut peak = 0i32;
    for (_, delta) in events {
        load += delta;
        peak = peak.max(load);
    }
    peak.max(0) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_category_starts_at_ready_time() {
        let pool = CategoryPool::default();
        assert_eq!(pool.earliest_slot("2", 3.0, 4.0, 1), 3.0);
    }

    #[test]
    fn waits_for_a_free_crew_when_saturated() {
        let mut pool = CategoryPool::default();
        pool.reserve("2", 0.0, 2.0);
        pool.reserve("2", 0.0, 3.0);
        assert_eq!(pool.earliest_slot("2", 0.0, 2.0, 2), 2.0);
        assert_eq!(pool.earliest_slot("2", 0.0, 2.0, 3), 0.0);
    }

    #[test]
    fn boundary_touch_is_not_a_conflict() {
        let mut pool = CategoryPool::default();
        pool.reserve("1", 0.0, 4.0);
        assert_eq!(pool.earliest_slot("1", 4.0, 1.0, 1), 4.0);
    }

    #[test]
    fn later_booking_inside_window_pushes_start_past_it() {
        let mut pool = CategoryPool::default();
        pool.reserve("1", 5.0, 7.0);
        // A 4h task ready at 2 would run into the 5..7 booking.
        assert_eq!(pool.earliest_slot("1", 2.0, 4.0, 1), 7.0);
        // A 3h task fits before it.
        assert_eq!(pool.earliest_slot("1", 2.0, 3.0, 1), 2.0);
    }

    #[test]
    fn zero_capacity_is_treated_as_one() {
        let mut pool = CategoryPool::default();
        pool.reserve("1", 0.0, 2.0);
        assert_eq!(pool.earliest_slot("1", 0.0, 1.0, 0), 2.0);
    }

    #[test]
    fn milestones_never_wait() {
        let mut pool = CategoryPool::default();
        pool.reserve("1", 0.0, 2.0);
        assert_eq!(pool.earliest_slot("1", 1.0, 0.0, 1), 1.0);
    }

    #[test]
    fn peak_load_counts_only_simultaneous_intervals() {
        let intervals = [
            Interval { start: 0.0, finish: 2.0 },
            Interval { start: 2.0, finish: 4.0 },
        ];
        assert_eq!(peak_load(&intervals, 0.0, 4.0), 1);
    }
}
