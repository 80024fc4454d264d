//! The AMM type engine (§4.1): builtin types, semantic types, and
//! declarative constraints, all exposed behind one [`TypeObj`] trait.
//!
//! Grounded on `cace/amm/typing.h`'s three-operation `cace_amm_type_t`
//! vtable (`name`, `match`, `convert`), generalized here to a trait object
//! so builtin and semantic types compose without a hand-rolled tag union.

pub mod builtin;
pub mod constraint;
pub mod numeric;
pub mod range;
pub mod semtype;

use crate::error::Result;
use crate::value::Ari;

/// Outcome of [`TypeObj::match_value`].
///
/// Mirrors `CACE_AMM_MATCH_{POSITIVE,NEGATIVE,UNDEFINED,NOINFO}`: `Undefined`
/// is returned exactly when the input is the undefined value (never an
/// error); `NoInfo` is reserved for checks a build was compiled without
/// (e.g. `TEXTPAT` without the `regex` feature).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchResult {
    /// The value satisfies the type.
    Positive,
    /// The value does not satisfy the type.
    Negative,
    /// The input was the undefined value.
    Undefined,
    /// The check could not be performed (e.g. capability compiled out).
    NoInfo,
}

impl MatchResult {
    /// True for [`MatchResult::Positive`].
    #[must_use]
    pub fn is_positive(self) -> bool {
        matches!(self, MatchResult::Positive)
    }
}

/// A type object: the one abstraction shared by builtin types, semantic
/// types, and their constraints.
pub trait TypeObj: std::fmt::Debug {
    /// A canonical self-describing name for this type.
    fn name(&self) -> Ari;

    /// Pure membership predicate.
    fn match_value(&self, value: &Ari) -> MatchResult;

    /// Attempts to coerce `value` into this type, passing the undefined
    /// value through unchanged.
    fn convert(&self, value: &Ari) -> Result<Ari>;
}

/// Convenience used by every [`TypeObj::convert`] implementation: short
/// circuits on the undefined input per §4.1's "conversion passes
/// undefined through unchanged" rule.
pub(crate) fn convert_passthrough_undefined(value: &Ari) -> Option<Ari> {
    if value.is_undefined() {
        Some(Ari::undefined())
    } else {
        None
    }
}
