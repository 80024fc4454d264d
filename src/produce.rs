//! Value production (§4.5): dereferencing a const, variable, or
//! externally defined data object into a value, with access control and
//! LABEL-parameter substitution.
//!
//! Grounded on `cace/ari/access.c`'s object-dereference entry point;
//! label substitution reuses the [`crate::algo::Translator`] walk built
//! for the generic structural-copy algorithm (§9).

use crate::algo::{translate, TranslateOutcome, Translator, VisitCtx};
use crate::binding::BoundParams;
use crate::error::{Error, Result};
use crate::ty::AriType;
use crate::value::{Ari, Literal, Primitive};

/// Checks whether `identity` holds the "produce" permission; returns an
/// opaque boolean so callers can plug in any access-control model without
/// this crate depending on one.
pub trait AccessControl {
    /// True if `identity` may produce a value from the named object.
    fn can_produce(&self, identity: &str) -> bool;
}

/// An access-control policy that permits every identity; useful for tests
/// and contexts with no access-control layer configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl AccessControl for AllowAll {
    fn can_produce(&self, _identity: &str) -> bool {
        true
    }
}

/// The stored kind of a dereferenced object.
pub enum ObjectKind<'a> {
    /// A constant: produces a deep copy of its fixed value.
    Const(&'a Ari),
    /// A variable: produces a deep copy of its current value.
    Var(&'a Ari),
    /// Externally defined data: produces by invoking `producer` with the
    /// bound actual parameters, then checking the result against
    /// `declared_type`.
    Edd {
        /// Declared production type; a type mismatch resets to undefined.
        declared_type: AriType,
        /// The registered producer callback.
        producer: &'a dyn Fn(&BoundParams) -> Result<Ari>,
    },
}

/// Produces a value from `object`, acting as `identity`, with `params`
/// already bound against the object's formals.
pub fn produce(object: ObjectKind<'_>, identity: &str, access: &dyn AccessControl, params: &BoundParams) -> Result<Ari> {
    if !access.can_produce(identity) {
        return Err(Error::permission_denied(format!("'{identity}' lacks produce permission")));
    }
    match object {
        ObjectKind::Const(value) | ObjectKind::Var(value) => substitute_labels(value, params),
        ObjectKind::Edd { declared_type, producer } => {
            let produced = producer(params)?;
            if produced.is_undefined() {
                return Ok(produced);
            }
            if produced.ari_type() != Some(declared_type) {
                return Err(Error::type_mismatch(format!(
                    "EDD producer returned {:?}, declared type is {}",
                    produced.ari_type(),
                    declared_type.name()
                )));
            }
            Ok(produced)
        }
    }
}

/// Recursively replaces every LABEL literal whose name/ordinal matches a
/// bound parameter with a deep copy of that parameter (§4.5). Unmatched
/// LABELs are left intact.
pub fn substitute_labels(value: &Ari, params: &BoundParams) -> Result<Ari> {
    let mut translator = LabelSubst { params };
    translate(value, &mut translator)
}

struct LabelSubst<'a> {
    params: &'a BoundParams,
}

impl Translator for LabelSubst<'_> {
    fn map(&mut self, input: &Ari, _ctx: &VisitCtx) -> TranslateOutcome {
        let Ari::Lit(Literal {
            ari_type: Some(AriType::Label),
            value: label_value,
        }) = input
        else {
            return TranslateOutcome::Default;
        };
        let resolved = match label_value {
            Primitive::Text(name) => self.params.get_named(name),
            Primitive::I64(idx) if *idx >= 0 => self.params.get(*idx as usize),
            _ => None,
        };
        match resolved {
            Some(actual) => TranslateOutcome::Final(actual.clone()),
            None => TranslateOutcome::Final(input.clone()),
        }
    }
}

/// Builds a LABEL literal by name, the form produced when encoding a
/// formal-parameter placeholder in object-model definitions.
pub fn label_by_name(name: impl Into<String>) -> Ari {
    Ari::lit_typed(AriType::Label, Primitive::Text(name.into())).unwrap_or_else(|_| Ari::undefined())
}

/// Builds a LABEL literal by ordinal.
pub fn label_by_index(index: i64) -> Ari {
    Ari::lit_typed(AriType::Label, Primitive::I64(index)).unwrap_or_else(|_| Ari::undefined())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::{bind, FormalParam};
    use crate::params::Params;
    use crate::typing::builtin::Builtin;

    #[test]
    fn const_production_substitutes_labels() {
        let template = Ari::lit_untyped(Primitive::Other(crate::containers::Container::Ac(Box::new(
            crate::containers::Ac::new(vec![label_by_name("x"), Ari::lit_untyped(Primitive::I64(9))]),
        ))));
        let formals = vec![FormalParam::new(0, "x", Box::new(Builtin::for_type(AriType::Int).unwrap()), Ari::undefined())];
        let actuals = Params::Ac(crate::containers::Ac::new(vec![Ari::lit_untyped(Primitive::I64(34))]));
        let bound = bind(&formals, &actuals).unwrap();
        let produced = produce(ObjectKind::Const(&template), "anyone", &AllowAll, &bound).unwrap();
        let Ari::Lit(lit) = produced else { panic!("expected literal") };
        let Primitive::Other(crate::containers::Container::Ac(ac)) = lit.value else { panic!("expected AC") };
        assert_eq!(ac.items[0], Ari::lit_typed(AriType::Int, Primitive::I64(34)).unwrap());
        assert_eq!(ac.items[1], Ari::lit_untyped(Primitive::I64(9)));
    }

    #[test]
    fn unmatched_label_is_left_intact() {
        let label = label_by_name("missing");
        let bound = BoundParams::default();
        let out = substitute_labels(&label, &bound).unwrap();
        assert_eq!(out, label);
    }

    struct DenyAll;
    impl AccessControl for DenyAll {
        fn can_produce(&self, _identity: &str) -> bool {
            false
        }
    }

    #[test]
    fn permission_denied_blocks_production() {
        let bound = BoundParams::default();
        let result = produce(ObjectKind::Const(&Ari::undefined()), "anyone", &DenyAll, &bound);
        assert!(result.is_err());
    }

    #[test]
    fn edd_producer_type_mismatch_is_an_error() {
        let producer = |_: &BoundParams| Ari::lit_typed(AriType::TextStr, Primitive::Text("oops".into()));
        let bound = BoundParams::default();
        let result = produce(
            ObjectKind::Edd { declared_type: AriType::Int, producer: &producer },
            "anyone",
            &AllowAll,
            &bound,
        );
        assert!(result.is_err());
    }

    #[test]
    fn edd_producer_undefined_passes_through() {
        let producer = |_: &BoundParams| Ok(Ari::undefined());
        let bound = BoundParams::default();
        let result = produce(
            ObjectKind::Edd { declared_type: AriType::Int, producer: &producer },
            "anyone",
            &AllowAll,
            &bound,
        )
        .unwrap();
        assert!(result.is_undefined());
    }
}
