//! Slices over a filtered view
//!
//! Slices follow the usual half-open, stepped semantics: negative bounds
//! count from the end, out-of-range bounds are clamped, and a negative step
//! walks the view backwards.

use std::ops::Range;
use std::str::FromStr;

use crate::errors::{TableError, TableResult};

/// An unresolved slice: bounds may be negative or missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceSpec {
    pub start: Option<i64>,
    pub stop: Option<i64>,
    pub step: i64,
}

impl SliceSpec {
    pub fn new(start: Option<i64>, stop: Option<i64>) -> Self {
        Self {
            start,
            stop,
            step: 1,
        }
    }

    /// The whole view, in order
    pub fn full() -> Self {
        Self::new(None, None)
    }

    pub fn with_step(mut self, step: i64) -> Self {
        self.step = step;
        self
    }

    /// Resolve against a view of `len` rows.
    pub fn resolve(&self, len: u64) -> TableResult<ResolvedSlice> {
        if self.step == 0 {
            return Err(TableError::bad_configuration(
                "slice",
                "step cannot be zero",
            ));
        }

        let len = i64::try_from(len).unwrap_or(i64::MAX);
        let step = self.step;

        let (lower, upper) = if step > 0 { (0, len) } else { (-1, len - 1) };
        let clamp = |bound: i64| {
            let bound = if bound < 0 { bound.saturating_add(len) } else { bound };
            bound.clamp(lower, upper)
        };

        let start = match self.start {
            Some(s) => clamp(s),
            None if step > 0 => lower,
            None => upper,
        };
        let stop = match self.stop {
            Some(s) => clamp(s),
            None if step > 0 => upper,
            None => lower,
        };

        let span = if step > 0 { stop - start } else { start - stop };
        let stride = step.unsigned_abs();
        let count = if span <= 0 {
            0
        } else {
            (span as u64 + stride - 1) / stride
        };

        Ok(ResolvedSlice { start, step, count })
    }
}

impl Default for SliceSpec {
    fn default() -> Self {
        Self::full()
    }
}

impl From<Range<i64>> for SliceSpec {
    fn from(range: Range<i64>) -> Self {
        Self::new(Some(range.start), Some(range.end))
    }
}

impl FromStr for SliceSpec {
    type Err = TableError;

    /// Parses `start:stop` or `start:stop:step`; any part may be empty.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() < 2 || parts.len() > 3 {
            return Err(TableError::bad_configuration(
                "slice",
                format!("expected start:stop[:step], got '{}'", s),
            ));
        }

        let bound = |text: &str| -> TableResult<Option<i64>> {
            let text = text.trim();
            if text.is_empty() {
                return Ok(None);
            }
            text.parse::<i64>().map(Some).map_err(|_| {
                TableError::bad_configuration(
                    "slice",
                    format!("'{}' is not an integer in '{}'", text, s),
                )
            })
        };

        let step = match parts.get(2) {
            Some(text) => bound(*text)?.unwrap_or(1),
            None => 1,
        };

        Ok(Self {
            start: bound(parts[0])?,
            stop: bound(parts[1])?,
            step,
        })
    }
}

/// A slice resolved against a concrete view length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedSlice {
    /// First position visited
    pub start: i64,
    pub step: i64,
    /// Number of positions visited
    pub count: u64,
}

impl ResolvedSlice {
    /// Position of the `k`-th element, `k < count`
    pub fn position(&self, k: u64) -> u64 {
        (self.start + self.step * k as i64) as u64
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}
