//! Builtin type singletons, one per literal [`AriType`] (§4.1.1).
//!
//! Grounded on `cace/amm/typing.c`'s cached enum-to-pointer builtin table;
//! here each builtin is a zero-sized [`Builtin`] wrapping its [`AriType`],
//! so "the singleton" is just the value itself rather than a lazily
//! initialized global.

use crate::containers::Container;
use crate::error::{Error, Result};
use crate::typing::numeric::convert_numeric;
use crate::typing::{convert_passthrough_undefined, MatchResult, TypeObj};
use crate::ty::AriType;
use crate::value::{Ari, Literal, Primitive};

/// A builtin type object: one of the 21 literal [`AriType`] enumerations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Builtin(pub AriType);

impl Builtin {
    /// Looks up the builtin for a literal [`AriType`].
    pub fn for_type(t: AriType) -> Result<Self> {
        if !t.is_literal() {
            return Err(Error::type_mismatch(format!("{} is not a literal builtin type", t.name())));
        }
        Ok(Builtin(t))
    }
}

impl TypeObj for Builtin {
    fn name(&self) -> Ari {
        Ari::lit_typed(AriType::Aritype, Primitive::I64(self.0.code() as i64))
            .unwrap_or_else(|_| Ari::undefined())
    }

    fn match_value(&self, value: &Ari) -> MatchResult {
        if value.is_undefined() {
            return MatchResult::Undefined;
        }
        let Ari::Lit(lit) = value else {
            return MatchResult::Negative;
        };
        if let Some(declared) = lit.ari_type {
            return if declared == self.0 { MatchResult::Positive } else { MatchResult::Negative };
        }
        if primitive_matches_builtin(&lit.value, self.0) {
            MatchResult::Positive
        } else {
            MatchResult::Negative
        }
    }

    fn convert(&self, value: &Ari) -> Result<Ari> {
        if let Some(u) = convert_passthrough_undefined(value) {
            return Ok(u);
        }
        if self.0 == AriType::Bool {
            return Ok(Ari::Lit(Literal::typed(AriType::Bool, Primitive::Bool(truthy(value)))?));
        }
        let lit = value.as_literal().ok_or_else(|| Error::null_func("cannot convert a reference to a literal type"))?;
        let converted = if self.0.is_numeric() {
            convert_numeric(&lit.value, self.0)?
        } else {
            match self.0 {
                AriType::Null => Primitive::Null,
                AriType::TextStr | AriType::Label => match &lit.value {
                    Primitive::Text(s) => Primitive::Text(s.clone()),
                    _ => return Err(Error::null_func("value is not convertible to TEXTSTR")),
                },
                AriType::ByteStr | AriType::Cbor => match &lit.value {
                    Primitive::Bytes(b) => Primitive::Bytes(b.clone()),
                    _ => return Err(Error::null_func("value is not convertible to BYTESTR")),
                },
                AriType::Tp | AriType::Td => match &lit.value {
                    Primitive::Timespec(ts) if lit.effective_type() == Some(self.0) => Primitive::Timespec(*ts),
                    Primitive::Timespec(_) => return Err(Error::null_func("TP and TD are not interconvertible")),
                    _ => return Err(Error::null_func("value is not convertible to a timespec")),
                },
                AriType::Ac => match &lit.value {
                    Primitive::Other(Container::Ac(_)) => lit.value.clone(),
                    _ => return Err(Error::null_func("value is not convertible to AC")),
                },
                AriType::Am => match &lit.value {
                    Primitive::Other(Container::Am(_)) => lit.value.clone(),
                    _ => return Err(Error::null_func("value is not convertible to AM")),
                },
                AriType::Tbl => match &lit.value {
                    Primitive::Other(Container::Tbl(_)) => lit.value.clone(),
                    _ => return Err(Error::null_func("value is not convertible to TBL")),
                },
                AriType::ExecSet => match &lit.value {
                    Primitive::Other(Container::ExecSet(_)) => lit.value.clone(),
                    _ => return Err(Error::null_func("value is not convertible to EXECSET")),
                },
                AriType::RptSet => match &lit.value {
                    Primitive::Other(Container::RptSet(_)) => lit.value.clone(),
                    _ => return Err(Error::null_func("value is not convertible to RPTSET")),
                },
                AriType::Aritype => match &lit.value {
                    Primitive::I64(_) => lit.value.clone(),
                    _ => return Err(Error::null_func("value is not convertible to ARITYPE")),
                },
                other => return Err(Error::null_func(format!("no conversion rule for {}", other.name()))),
            }
        };
        Ok(Ari::Lit(Literal::typed(self.0, converted)?))
    }
}

fn primitive_matches_builtin(p: &Primitive, t: AriType) -> bool {
    use Primitive as P;
    match (t, p) {
        (AriType::Null, P::Null) => true,
        (AriType::Bool, P::Bool(_)) => true,
        (AriType::Byte, P::U64(v)) => *v <= u8::MAX as u64,
        (AriType::Uint, P::U64(v)) => *v <= u32::MAX as u64,
        (AriType::Uvast, P::U64(_)) => true,
        (AriType::Int, P::I64(v)) => *v >= i32::MIN as i64 && *v <= i32::MAX as i64,
        (AriType::Vast, P::I64(_)) => true,
        (AriType::Real32 | AriType::Real64, P::F64(_)) => true,
        (AriType::TextStr | AriType::Label, P::Text(_)) => true,
        (AriType::ByteStr | AriType::Cbor, P::Bytes(_)) => true,
        (AriType::Aritype, P::I64(_)) => true,
        (AriType::Tp | AriType::Td, P::Timespec(_)) => true,
        (AriType::Ac, P::Other(Container::Ac(_))) => true,
        (AriType::Am, P::Other(Container::Am(_))) => true,
        (AriType::Tbl, P::Other(Container::Tbl(_))) => true,
        (AriType::ExecSet, P::Other(Container::ExecSet(_))) => true,
        (AriType::RptSet, P::Other(Container::RptSet(_))) => true,
        _ => false,
    }
}

/// Truthy-coercion rule (§4.1.1): references and containers are always
/// true; undefined/null are false; numbers are nonzero-and-non-NaN;
/// strings are nonempty; timespecs are true iff either field is nonzero.
#[must_use]
pub fn truthy(value: &Ari) -> bool {
    match value {
        Ari::Ref(_) => true,
        Ari::Lit(lit) => match &lit.value {
            Primitive::Undefined | Primitive::Null => false,
            Primitive::Bool(b) => *b,
            Primitive::U64(v) => *v != 0,
            Primitive::I64(v) => *v != 0,
            Primitive::F64(v) => *v != 0.0 && !v.is_nan(),
            Primitive::Text(s) => !s.is_empty(),
            Primitive::Bytes(b) => !b.is_empty(),
            Primitive::Timespec(ts) => ts.secs != 0 || ts.nanos != 0,
            Primitive::Other(_) => true,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::{Ac, Container};
    use crate::path::ObjectPath;
    use crate::value::Reference;

    #[test]
    fn bool_conversion_is_truthy_for_references() {
        let b = Builtin::for_type(AriType::Bool).unwrap();
        let r = Ari::Ref(Reference::new(ObjectPath::relative("CTRL".into(), "hi".into())));
        let converted = b.convert(&r).unwrap();
        assert_eq!(converted, Ari::lit_typed(AriType::Bool, Primitive::Bool(true)).unwrap());
    }

    #[test]
    fn bool_conversion_is_truthy_for_numbers_and_strings() {
        let b = Builtin::for_type(AriType::Bool).unwrap();
        assert_eq!(
            b.convert(&Ari::lit_untyped(Primitive::I64(0))).unwrap(),
            Ari::lit_typed(AriType::Bool, Primitive::Bool(false)).unwrap()
        );
        assert_eq!(
            b.convert(&Ari::lit_untyped(Primitive::Text(String::new()))).unwrap(),
            Ari::lit_typed(AriType::Bool, Primitive::Bool(false)).unwrap()
        );
    }

    #[test]
    fn tp_td_are_not_interconvertible() {
        let td = Builtin::for_type(AriType::Td).unwrap();
        let tp_value = Ari::lit_typed(AriType::Tp, Primitive::Timespec(crate::time::TimeSpec::from_secs(0))).unwrap();
        assert!(td.convert(&tp_value).is_err());
    }

    #[test]
    fn undefined_passes_through_every_builtin() {
        let b = Builtin::for_type(AriType::Int).unwrap();
        assert!(b.convert(&Ari::undefined()).unwrap().is_undefined());
    }

    #[test]
    fn match_value_checks_declared_type_equality() {
        let b = Builtin::for_type(AriType::Int).unwrap();
        let v = Ari::lit_typed(AriType::Int, Primitive::I64(5)).unwrap();
        assert_eq!(b.match_value(&v), MatchResult::Positive);
        let other = Ari::lit_typed(AriType::Uint, Primitive::U64(5)).unwrap();
        assert_eq!(b.match_value(&other), MatchResult::Negative);
    }

    #[test]
    fn ac_builtin_requires_container() {
        let b = Builtin::for_type(AriType::Ac).unwrap();
        let ac = Ari::lit_typed(AriType::Ac, Primitive::Other(Container::Ac(Box::new(Ac::new(vec![]))))).unwrap();
        assert!(b.convert(&ac).is_ok());
        assert!(b.convert(&Ari::lit_untyped(Primitive::I64(1))).is_err());
    }
}
