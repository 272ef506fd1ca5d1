use serde::{Deserialize, Serialize};

/// A closed span of seconds within one video, `end >= start`.
///
/// Serialized as a two-element array `[start, end]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "(f64, f64)", into = "(f64, f64)")]
pub struct TimeRange {
    start: f64,
    end: f64,
}

impl TimeRange {
    /// Returns `None` unless both bounds are finite and `end >= start`.
    pub fn new(start: f64, end: f64) -> Option<Self> {
        if start.is_finite() && end.is_finite() && end >= start {
            Some(Self { start, end })
        } else {
            None
        }
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

impl TryFrom<(f64, f64)> for TimeRange {
    type Error = String;

    fn try_from((start, end): (f64, f64)) -> Result<Self, Self::Error> {
        TimeRange::new(start, end).ok_or_else(|| format!("invalid time range [{start}, {end}]"))
    }
}

impl From<TimeRange> for (f64, f64) {
    fn from(range: TimeRange) -> Self {
        (range.start, range.end)
    }
}
