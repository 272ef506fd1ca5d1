use crate::shared::constants::{DEFAULT_GAP_THRESHOLD_SECS, DEFAULT_MIN_RANGE_SECS};
use crate::shared::time_range::TimeRange;

/// Groups sparse match timestamps into contiguous time ranges.
///
/// Consecutive timestamps at most `gap_threshold` seconds apart belong to the
/// same range. Ranges shorter than `min_duration` are dropped, so an isolated
/// hit never produces output on its own.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RangeBuilder {
    pub gap_threshold: f64,
    pub min_duration: f64,
}

impl Default for RangeBuilder {
    fn default() -> Self {
        Self {
            gap_threshold: DEFAULT_GAP_THRESHOLD_SECS,
            min_duration: DEFAULT_MIN_RANGE_SECS,
        }
    }
}

impl RangeBuilder {
    pub fn new(gap_threshold: f64, min_duration: f64) -> Self {
        Self {
            gap_threshold,
            min_duration,
        }
    }

    /// `timestamps` must be in ascending order (as the sampler produces them).
    pub fn build(&self, timestamps: &[f64]) -> Vec<TimeRange> {
        let mut points = timestamps.iter().copied().filter(|t| t.is_finite());
        let Some(first) = points.next() else {
            return Vec::new();
        };

        let mut ranges = Vec::new();
        let mut start = first;
        let mut prev = first;
        for t in points {
            if t - prev > self.gap_threshold {
                self.close(start, prev, &mut ranges);
                start = t;
            }
            prev = t;
        }
        self.close(start, prev, &mut ranges);

        ranges.retain(|r| r.duration() >= self.min_duration);
        ranges
    }

    fn close(&self, start: f64, end: f64, ranges: &mut Vec<TimeRange>) {
        if end - start < self.min_duration {
            return;
        }
        if let Some(range) = TimeRange::new(start, end) {
            ranges.push(range);
        }
    }
}
