//! A single identifier segment: absent, an integer enumeration, or a
//! text name (§3.2).

use std::fmt;

/// One identifier segment of an object path.
///
/// Text and integer forms are disjoint at the lookup layer, but a text
/// segment may be *derived* into an integer if its contents parse as one
/// (see [`IdSegment::as_int`]).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IdSegment {
    /// The null form: segment is absent.
    Null,
    /// A signed 64-bit integer enumeration.
    Int(i64),
    /// A text name.
    Text(String),
}

impl IdSegment {
    /// True for the null form.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, IdSegment::Null)
    }

    /// Returns the integer value directly, or by parsing a text segment
    /// that fully parses as a signed 64-bit integer.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            IdSegment::Int(v) => Some(*v),
            IdSegment::Text(s) => s.parse::<i64>().ok(),
            IdSegment::Null => None,
        }
    }

    /// Returns the text form directly; integer and null segments have no
    /// text representation here (callers needing a display form should
    /// use `Display`).
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            IdSegment::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for IdSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdSegment::Null => write!(f, "null"),
            IdSegment::Int(v) => write!(f, "{v}"),
            IdSegment::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for IdSegment {
    fn from(v: i64) -> Self {
        IdSegment::Int(v)
    }
}

impl From<String> for IdSegment {
    fn from(v: String) -> Self {
        IdSegment::Text(v)
    }
}

impl From<&str> for IdSegment {
    fn from(v: &str) -> Self {
        IdSegment::Text(v.to_string())
    }
}
