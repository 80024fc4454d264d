//! A model-revision date: year/month/day, used on a namespace reference.

use std::fmt;

use crate::error::{Error, Result};

/// A calendar date identifying one revision of a namespace model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RevisionDate {
    /// Full (non-offset) year, e.g. `2023`.
    pub year: u16,
    /// Month, 1-12.
    pub month: u8,
    /// Day of month, 1-31.
    pub day: u8,
}

impl RevisionDate {
    /// Builds a revision date, validating month/day ranges loosely
    /// (no calendar-correctness check beyond the field widths; the wire
    /// format never needs to reject "2023-02-30").
    pub fn new(year: u16, month: u8, day: u8) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(Error::bad_value(format!("revision month {month} out of range")));
        }
        if !(1..=31).contains(&day) {
            return Err(Error::bad_value(format!("revision day {day} out of range")));
        }
        Ok(Self { year, month, day })
    }
}

impl fmt::Display for RevisionDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}{:02}{:02}", self.year, self.month, self.day)
    }
}
