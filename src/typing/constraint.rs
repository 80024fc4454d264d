//! Declarative value constraints (§4.1.3), grounded on
//! `cace/amm/semtype_cnst.h`'s tagged-union constraint type.

use crate::error::{Error, Result};
use crate::typing::range::Range;
use crate::typing::numeric::convert_numeric;
use crate::ty::AriType;
use crate::value::{Ari, Primitive};

/// One constraint, applied after a USE type's base type has already
/// matched or converted the value.
#[derive(Debug, Clone)]
pub enum Constraint {
    /// Size range over text-string or byte-string length.
    StrLen(Range),
    /// An anchored regular expression over text-string contents, compiled
    /// only when the `regex` feature is enabled.
    TextPat(TextPat),
    /// A range over the value converted to a signed 64-bit integer.
    RangeInt64(Range),
    /// Requires an IDENT reference whose base chain contains `base`.
    IdentBase(Ari),
}

/// A compiled (or, without the `regex` feature, merely recorded) text
/// pattern.
#[derive(Debug, Clone)]
pub struct TextPat {
    /// The original pattern source, kept even when not compiled so the
    /// constraint can still be displayed/debugged.
    pub source: String,
    #[cfg(feature = "regex")]
    compiled: regex::Regex,
}

impl TextPat {
    /// Compiles `pattern`, anchoring it at both ends as TEXTPAT requires.
    #[cfg(feature = "regex")]
    pub fn compile(pattern: &str) -> Result<Self> {
        let anchored = format!("^(?:{pattern})$");
        let compiled =
            regex::Regex::new(&anchored).map_err(|e| Error::argument(format!("invalid TEXTPAT pattern: {e}")))?;
        Ok(Self {
            source: pattern.to_string(),
            compiled,
        })
    }

    /// Records `pattern` without compiling it; any match attempt reports
    /// [`crate::typing::MatchResult::NoInfo`].
    #[cfg(not(feature = "regex"))]
    pub fn compile(pattern: &str) -> Result<Self> {
        Ok(Self {
            source: pattern.to_string(),
        })
    }
}

impl Constraint {
    /// Checks the constraint against an already-base-matched value.
    /// Returns `Ok(None)` for the "no info" outcome (TEXTPAT compiled
    /// out), `Ok(Some(true/false))` otherwise.
    pub fn check(&self, value: &Ari) -> Result<Option<bool>> {
        match self {
            Constraint::StrLen(range) => {
                let len = match value.as_literal().map(|l| &l.value) {
                    Some(Primitive::Text(s)) => s.chars().count() as i64,
                    Some(Primitive::Bytes(b)) => b.len() as i64,
                    _ => return Err(Error::type_mismatch("STRLEN applies to text or byte strings")),
                };
                Ok(Some(range.contains(len)))
            }
            Constraint::TextPat(pat) => {
                let Some(Primitive::Text(s)) = value.as_literal().map(|l| &l.value) else {
                    return Err(Error::type_mismatch("TEXTPAT applies to text strings"));
                };
                text_pat_matches(pat, s)
            }
            Constraint::RangeInt64(range) => {
                let prim = value
                    .as_literal()
                    .map(|l| &l.value)
                    .ok_or_else(|| Error::type_mismatch("RANGE_INT64 applies to literals"))?;
                let ty = value.ari_type().ok_or_else(|| Error::type_mismatch("value has no numeric type"))?;
                let converted = convert_numeric(prim, AriType::Vast)?;
                let Primitive::I64(v) = converted else {
                    return Err(Error::type_mismatch("RANGE_INT64 conversion did not yield an integer"));
                };
                let _ = ty;
                Ok(Some(range.contains(v)))
            }
            Constraint::IdentBase(_base) => {
                // Resolving an IDENT's base chain requires an object store
                // this crate does not model; report NOINFO rather than a
                // hard error so USE types with an IDENT_BASE constraint
                // still compose in a store-less context.
                Ok(None)
            }
        }
    }
}

#[cfg(feature = "regex")]
fn text_pat_matches(pat: &TextPat, s: &str) -> Result<Option<bool>> {
    Ok(Some(pat.compiled.is_match(s)))
}

#[cfg(not(feature = "regex"))]
fn text_pat_matches(_pat: &TextPat, _s: &str) -> Result<Option<bool>> {
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typing::range::Interval;

    #[test]
    fn strlen_checks_text_length() {
        let c = Constraint::StrLen(Range::closed(1, 3));
        assert_eq!(c.check(&Ari::lit_untyped(Primitive::Text("ab".into()))).unwrap(), Some(true));
        assert_eq!(c.check(&Ari::lit_untyped(Primitive::Text(String::new()))).unwrap(), Some(false));
    }

    #[test]
    fn range_int64_converts_before_checking() {
        let c = Constraint::RangeInt64(Range::new(vec![Interval::exact(7)]));
        let v = Ari::lit_typed(AriType::Int, Primitive::I64(7)).unwrap();
        assert_eq!(c.check(&v).unwrap(), Some(true));
        let other = Ari::lit_typed(AriType::Int, Primitive::I64(8)).unwrap();
        assert_eq!(c.check(&other).unwrap(), Some(false));
    }

    #[test]
    fn ident_base_is_always_no_info() {
        let c = Constraint::IdentBase(Ari::undefined());
        assert_eq!(c.check(&Ari::lit_untyped(Primitive::Null)).unwrap(), None);
    }
}
