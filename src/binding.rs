//! Formal/actual parameter binding (§4.4).
//!
//! Grounded on `cace/amm/parameters.c`'s `cace_amm_formal_param_t` /
//! actual-parameter binding routine; generalized here so binding produces
//! both an ordinal-indexed array and a name-keyed dictionary sharing the
//! same bound values, as an itemized parameter set.

use std::collections::BTreeMap;

use crate::containers::Am;
use crate::error::{Error, Result};
use crate::params::Params;
use crate::typing::TypeObj;
use crate::value::{Ari, Primitive};

/// One formal parameter declaration: its ordinal position, name, type,
/// and default value.
pub struct FormalParam {
    /// Zero-based ordinal position among the formals.
    pub index: u64,
    /// Parameter name, matched case-insensitively against AM text keys.
    pub name: String,
    /// The type every supplied actual is converted through.
    pub type_obj: Box<dyn TypeObj>,
    /// The value used when no actual is supplied.
    pub default: Ari,
}

impl FormalParam {
    /// Builds a formal parameter declaration.
    pub fn new(index: u64, name: impl Into<String>, type_obj: Box<dyn TypeObj>, default: Ari) -> Self {
        Self {
            index,
            name: name.into(),
            type_obj,
            default,
        }
    }
}

/// The result of binding actuals against formals: an ordinal array and a
/// name-keyed dictionary over the same bound values, plus a flag noting
/// whether any formal ended up undefined.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundParams {
    /// Bound values, indexed by formal ordinal.
    pub by_index: Vec<Ari>,
    /// The same bound values, keyed by formal name.
    pub by_name: BTreeMap<String, Ari>,
    /// True if any bound value is the undefined value.
    pub has_undefined: bool,
}

impl BoundParams {
    /// Looks up a bound value by ordinal.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Ari> {
        self.by_index.get(index)
    }

    /// Looks up a bound value by name.
    #[must_use]
    pub fn get_named(&self, name: &str) -> Option<&Ari> {
        self.by_name.get(name)
    }
}

/// Binds `actuals` against `formals` per the NONE/AC/AM rules of §4.4.
pub fn bind(formals: &[FormalParam], actuals: &Params) -> Result<BoundParams> {
    match actuals {
        Params::None => bind_none(formals),
        Params::Ac(ac) => bind_positional(formals, &ac.items),
        Params::Am(am) => bind_named(formals, am),
    }
}

fn finish(formals: &[FormalParam], values: Vec<Ari>) -> BoundParams {
    let mut by_name = BTreeMap::new();
    let mut has_undefined = false;
    for (formal, value) in formals.iter().zip(&values) {
        has_undefined |= value.is_undefined();
        by_name.insert(formal.name.clone(), value.clone());
    }
    BoundParams {
        by_index: values,
        by_name,
        has_undefined,
    }
}

fn bind_none(formals: &[FormalParam]) -> Result<BoundParams> {
    let values = formals.iter().map(|f| f.default.clone()).collect();
    Ok(finish(formals, values))
}

fn bind_positional(formals: &[FormalParam], given: &[Ari]) -> Result<BoundParams> {
    if given.len() > formals.len() {
        return Err(Error::invalid_ari(format!(
            "{} extra positional parameter(s) beyond the {} formal(s)",
            given.len() - formals.len(),
            formals.len()
        )));
    }
    let mut values = Vec::with_capacity(formals.len());
    for (formal, actual) in formals.iter().zip(given.iter().map(Some).chain(std::iter::repeat(None))) {
        values.push(match actual {
            Some(a) => formal.type_obj.convert(a)?,
            None => formal.default.clone(),
        });
    }
    Ok(finish(formals, values))
}

fn bind_named(formals: &[FormalParam], given: &Am) -> Result<BoundParams> {
    let mut remaining: BTreeMap<Ari, Ari> = BTreeMap::new();
    for (k, v) in &given.items {
        remaining.insert(Params::normalize_key(k)?, v.clone());
    }
    let mut values = Vec::with_capacity(formals.len());
    for formal in formals {
        let by_index_key = Ari::lit_untyped(Primitive::U64(formal.index));
        let by_name_key = Ari::lit_untyped(Primitive::Text(formal.name.to_ascii_lowercase()));
        let by_index = remaining.remove(&by_index_key);
        let by_name = remaining.remove(&by_name_key);
        let chosen = match (by_index, by_name) {
            (Some(_), Some(_)) => {
                return Err(Error::invalid_ari(format!(
                    "parameter '{}' supplied both by ordinal and by name",
                    formal.name
                )));
            }
            (Some(v), None) | (None, Some(v)) => formal.type_obj.convert(&v)?,
            (None, None) => formal.default.clone(),
        };
        values.push(chosen);
    }
    if !remaining.is_empty() {
        return Err(Error::invalid_ari(format!(
            "{} parameter key(s) did not match any formal",
            remaining.len()
        )));
    }
    Ok(finish(formals, values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::Ac;
    use crate::ty::AriType;
    use crate::typing::builtin::Builtin;

    fn formal(index: u64, name: &str, ty: AriType, default: Ari) -> FormalParam {
        FormalParam::new(index, name, Box::new(Builtin::for_type(ty).unwrap()), default)
    }

    // S4: //example/test/CTRL/hi(34) against formals [(0, "target", int, default=0)].
    #[test]
    fn positional_binding_matches_s4() {
        let formals = vec![formal(0, "target", AriType::Int, Ari::lit_typed(AriType::Int, Primitive::I64(0)).unwrap())];
        let actuals = Params::Ac(Ac::new(vec![Ari::lit_untyped(Primitive::I64(34))]));
        let bound = bind(&formals, &actuals).unwrap();
        assert_eq!(bound.get(0), Some(&Ari::lit_typed(AriType::Int, Primitive::I64(34)).unwrap()));
        assert_eq!(bound.get_named("target"), bound.get(0));
        assert!(!bound.has_undefined);
    }

    #[test]
    fn positional_binding_uses_default_when_omitted() {
        let formals = vec![formal(0, "x", AriType::Int, Ari::lit_typed(AriType::Int, Primitive::I64(7)).unwrap())];
        let bound = bind(&formals, &Params::None).unwrap();
        assert_eq!(bound.get(0), Some(&Ari::lit_typed(AriType::Int, Primitive::I64(7)).unwrap()));
    }

    #[test]
    fn positional_binding_rejects_extra_actuals() {
        let formals = vec![formal(0, "x", AriType::Int, Ari::undefined())];
        let actuals = Params::Ac(Ac::new(vec![Ari::lit_untyped(Primitive::I64(1)), Ari::lit_untyped(Primitive::I64(2))]));
        assert!(bind(&formals, &actuals).is_err());
    }

    #[test]
    fn named_binding_rejects_both_ordinal_and_name() {
        let formals = vec![formal(0, "x", AriType::Int, Ari::undefined())];
        let mut am = Am::new();
        am.insert(Ari::lit_untyped(Primitive::U64(0)), Ari::lit_untyped(Primitive::I64(1))).unwrap();
        am.insert(Ari::lit_untyped(Primitive::Text("x".to_string())), Ari::lit_untyped(Primitive::I64(2))).unwrap();
        let bound = bind(&formals, &Params::Am(am));
        assert!(bound.is_err());
    }

    #[test]
    fn named_binding_rejects_unmatched_keys() {
        let formals: Vec<FormalParam> = vec![];
        let mut am = Am::new();
        am.insert(Ari::lit_untyped(Primitive::Text("nope".to_string())), Ari::lit_untyped(Primitive::I64(1))).unwrap();
        assert!(bind(&formals, &Params::Am(am)).is_err());
    }
}
