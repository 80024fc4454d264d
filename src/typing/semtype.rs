//! Semantic types (§4.1.2): USE, ULIST, DLIST, UMAP, TBLT, UNION, SEQ.
//!
//! Grounded on `cace/amm/semtype.h`'s seven `cace_amm_semtype_*_t` structs;
//! here each is a variant of one [`SemType`] enum implementing [`TypeObj`],
//! since Rust has no direct analogue to the original's tagged-union-plus-
//! vtable split.

use crate::containers::{Ac, Am, Container, Tbl};
use crate::error::{Error, Result};
use crate::path::ObjectPath;
use crate::typing::constraint::Constraint;
use crate::typing::range::Range;
use crate::typing::{convert_passthrough_undefined, MatchResult, TypeObj};
use crate::value::{Ari, Primitive};

/// A boxed type object, the shared "reference to another type" currency
/// used throughout semantic-type definitions.
pub type BoxType = Box<dyn TypeObj>;

/// USE: a named base type plus an ordered list of constraints.
#[derive(Debug)]
pub struct Use {
    /// The base type every value must first match/convert against.
    pub base: BoxType,
    /// Constraints checked, in order, after the base type succeeds.
    pub constraints: Vec<Constraint>,
}

/// ULIST: an AC whose every item matches `item_type`, within `size_range`.
#[derive(Debug)]
pub struct UList {
    /// The type every item must match.
    pub item_type: BoxType,
    /// Allowed item-count range.
    pub size_range: Range,
}

/// One element of a DLIST's ordered type list: either a plain type or a
/// SEQ that consumes a sub-sequence within `size_range`.
#[derive(Debug)]
pub enum DListElem {
    /// A single required positional type.
    Item(BoxType),
    /// A SEQ: consumes zero or more consecutive items of `item_type`.
    Seq {
        /// Type every consumed item must match.
        item_type: BoxType,
        /// Allowed count of items this SEQ consumes.
        size_range: Range,
    },
}

/// DLIST: an AC whose items are split positionally against an ordered
/// list of item-types (any of which may be a SEQ).
#[derive(Debug)]
pub struct DList {
    /// Positional type list.
    pub item_types: Vec<DListElem>,
}

/// UMAP: an AM whose keys and values match separate type objects.
#[derive(Debug)]
pub struct UMap {
    /// Type every key must match.
    pub key_type: BoxType,
    /// Type every value must match.
    pub value_type: BoxType,
}

/// TBLT: a TBL whose column count is fixed and whose items match
/// column-wise (wrapping by column index, not row).
#[derive(Debug)]
pub struct Tblt {
    /// Per-column type list; length is the required column count.
    pub col_types: Vec<BoxType>,
}

/// UNION: an ordered list of choice types.
#[derive(Debug)]
pub struct Union {
    /// Candidate types, tried in order.
    pub choices: Vec<BoxType>,
}

/// SEQ: only meaningful inside a [`DList`]; never matched/converted
/// directly (attempting to do so is a type-mismatch error).
#[derive(Debug)]
pub struct Seq {
    /// Type every consumed item must match.
    pub item_type: BoxType,
    /// Allowed count of items consumed.
    pub size_range: Range,
}

/// A semantic type's self-describing name: a reference into the
/// `//ietf/amm-semtype/` namespace naming its kind (§4.1).
///
/// The full form also carries the type's defining parameters (e.g. a
/// ULIST's item type and size range) as reference params; this crate
/// has no object store to resolve such a reference against, so the
/// simplified name omits them.
fn semtype_name(kind: &str) -> Ari {
    Ari::Ref(crate::value::Reference::new(ObjectPath::relative("semtype".into(), kind.into())))
}

impl TypeObj for Use {
    fn name(&self) -> Ari {
        semtype_name("USE")
    }

    fn match_value(&self, value: &Ari) -> MatchResult {
        match self.base.match_value(value) {
            MatchResult::Positive => {}
            other => return other,
        }
        for c in &self.constraints {
            match c.check(value) {
                Ok(Some(true)) | Ok(None) => {}
                Ok(Some(false)) => return MatchResult::Negative,
                Err(_) => return MatchResult::Negative,
            }
        }
        MatchResult::Positive
    }

    fn convert(&self, value: &Ari) -> Result<Ari> {
        if let Some(u) = convert_passthrough_undefined(value) {
            return Ok(u);
        }
        let converted = self.base.convert(value)?;
        for c in &self.constraints {
            match c.check(&converted)? {
                Some(true) | None => {}
                Some(false) => return Err(Error::failed_constraint("USE constraint failed after conversion")),
            }
        }
        Ok(converted)
    }
}

impl TypeObj for UList {
    fn name(&self) -> Ari {
        semtype_name("ULIST")
    }

    fn match_value(&self, value: &Ari) -> MatchResult {
        if value.is_undefined() {
            return MatchResult::Undefined;
        }
        let Some(ac) = as_ac(value) else { return MatchResult::Negative };
        if !self.size_range.contains(ac.items.len() as i64) {
            return MatchResult::Negative;
        }
        if ac.items.iter().all(|item| self.item_type.match_value(item).is_positive()) {
            MatchResult::Positive
        } else {
            MatchResult::Negative
        }
    }

    fn convert(&self, value: &Ari) -> Result<Ari> {
        if let Some(u) = convert_passthrough_undefined(value) {
            return Ok(u);
        }
        let ac = as_ac(value).ok_or_else(|| Error::type_mismatch("ULIST requires an AC"))?;
        if !self.size_range.contains(ac.items.len() as i64) {
            return Err(Error::failed_constraint("ULIST item count out of range"));
        }
        let items = ac
            .items
            .iter()
            .map(|item| self.item_type.convert(item))
            .collect::<Result<Vec<_>>>()?;
        Ari::lit_typed(crate::ty::AriType::Ac, Primitive::Other(Container::Ac(Box::new(Ac::new(items)))))
    }
}

impl TypeObj for DList {
    fn name(&self) -> Ari {
        semtype_name("DLIST")
    }

    fn match_value(&self, value: &Ari) -> MatchResult {
        if value.is_undefined() {
            return MatchResult::Undefined;
        }
        let Some(ac) = as_ac(value) else { return MatchResult::Negative };
        match split_dlist(&self.item_types, &ac.items, |t, v| t.match_value(v).is_positive()) {
            Some(true) => MatchResult::Positive,
            _ => MatchResult::Negative,
        }
    }

    fn convert(&self, value: &Ari) -> Result<Ari> {
        if let Some(u) = convert_passthrough_undefined(value) {
            return Ok(u);
        }
        let ac = as_ac(value).ok_or_else(|| Error::type_mismatch("DLIST requires an AC"))?;
        let mut out = Vec::with_capacity(ac.items.len());
        let mut idx = 0usize;
        for elem in &self.item_types {
            match elem {
                DListElem::Item(t) => {
                    let item = ac.items.get(idx).ok_or_else(|| Error::no_choice("DLIST item missing"))?;
                    out.push(t.convert(item)?);
                    idx += 1;
                }
                DListElem::Seq { item_type, size_range } => {
                    let start = idx;
                    while idx < ac.items.len() && item_type.match_value(&ac.items[idx]).is_positive() {
                        idx += 1;
                    }
                    let count = (idx - start) as i64;
                    if !size_range.contains(count) {
                        return Err(Error::failed_constraint("DLIST SEQ count out of range"));
                    }
                    for item in &ac.items[start..idx] {
                        out.push(item_type.convert(item)?);
                    }
                }
            }
        }
        if idx != ac.items.len() {
            return Err(Error::no_choice("DLIST did not consume every item"));
        }
        Ari::lit_typed(crate::ty::AriType::Ac, Primitive::Other(Container::Ac(Box::new(Ac::new(out)))))
    }
}

fn split_dlist(elems: &[DListElem], items: &[Ari], matches: impl Fn(&BoxType, &Ari) -> bool + Copy) -> Option<bool> {
    let mut idx = 0usize;
    for elem in elems {
        match elem {
            DListElem::Item(t) => {
                let item = items.get(idx)?;
                if !matches(t, item) {
                    return Some(false);
                }
                idx += 1;
            }
            DListElem::Seq { item_type, size_range } => {
                let start = idx;
                while idx < items.len() && matches(item_type, &items[idx]) {
                    idx += 1;
                }
                if !size_range.contains((idx - start) as i64) {
                    return Some(false);
                }
            }
        }
    }
    Some(idx == items.len())
}

impl TypeObj for UMap {
    fn name(&self) -> Ari {
        semtype_name("UMAP")
    }

    fn match_value(&self, value: &Ari) -> MatchResult {
        if value.is_undefined() {
            return MatchResult::Undefined;
        }
        let Some(am) = as_am(value) else { return MatchResult::Negative };
        let ok = am.items.iter().all(|(k, v)| {
            self.key_type.match_value(k).is_positive() && self.value_type.match_value(v).is_positive()
        });
        if ok {
            MatchResult::Positive
        } else {
            MatchResult::Negative
        }
    }

    fn convert(&self, value: &Ari) -> Result<Ari> {
        if let Some(u) = convert_passthrough_undefined(value) {
            return Ok(u);
        }
        let am = as_am(value).ok_or_else(|| Error::type_mismatch("UMAP requires an AM"))?;
        let mut out = Am::new();
        for (k, v) in &am.items {
            out.insert(self.key_type.convert(k)?, self.value_type.convert(v)?)?;
        }
        Ari::lit_typed(crate::ty::AriType::Am, Primitive::Other(Container::Am(Box::new(out))))
    }
}

impl TypeObj for Tblt {
    fn name(&self) -> Ari {
        semtype_name("TBLT")
    }

    fn match_value(&self, value: &Ari) -> MatchResult {
        if value.is_undefined() {
            return MatchResult::Undefined;
        }
        let Some(tbl) = as_tbl(value) else { return MatchResult::Negative };
        if tbl.ncols != self.col_types.len() {
            return MatchResult::Negative;
        }
        let ok = tbl
            .items
            .iter()
            .enumerate()
            .all(|(i, item)| self.col_types[i % self.col_types.len()].match_value(item).is_positive());
        if ok {
            MatchResult::Positive
        } else {
            MatchResult::Negative
        }
    }

    fn convert(&self, value: &Ari) -> Result<Ari> {
        if let Some(u) = convert_passthrough_undefined(value) {
            return Ok(u);
        }
        let tbl = as_tbl(value).ok_or_else(|| Error::type_mismatch("TBLT requires a TBL"))?;
        if tbl.ncols != self.col_types.len() {
            return Err(Error::failed_constraint("TBLT column count mismatch"));
        }
        let items = tbl
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| self.col_types[i % self.col_types.len()].convert(item))
            .collect::<Result<Vec<_>>>()?;
        let out = Tbl::new(tbl.ncols, items)?;
        Ari::lit_typed(crate::ty::AriType::Tbl, Primitive::Other(Container::Tbl(Box::new(out))))
    }
}

impl TypeObj for Union {
    fn name(&self) -> Ari {
        semtype_name("UNION")
    }

    fn match_value(&self, value: &Ari) -> MatchResult {
        if value.is_undefined() {
            return MatchResult::Undefined;
        }
        for choice in &self.choices {
            if choice.match_value(value).is_positive() {
                return MatchResult::Positive;
            }
        }
        MatchResult::Negative
    }

    fn convert(&self, value: &Ari) -> Result<Ari> {
        if let Some(u) = convert_passthrough_undefined(value) {
            return Ok(u);
        }
        for choice in &self.choices {
            if choice.match_value(value).is_positive() {
                return Ok(value.clone());
            }
        }
        for choice in &self.choices {
            if let Ok(converted) = choice.convert(value) {
                return Ok(converted);
            }
        }
        Err(Error::no_choice("no UNION choice matched or converted"))
    }
}

impl TypeObj for Seq {
    fn name(&self) -> Ari {
        semtype_name("SEQ")
    }

    fn match_value(&self, _value: &Ari) -> MatchResult {
        MatchResult::Negative
    }

    fn convert(&self, _value: &Ari) -> Result<Ari> {
        Err(Error::type_mismatch("SEQ is only usable inside a DLIST"))
    }
}

fn as_ac(value: &Ari) -> Option<&Ac> {
    match value.as_literal()?.value {
        Primitive::Other(Container::Ac(ref ac)) => Some(ac),
        _ => None,
    }
}

fn as_am(value: &Ari) -> Option<&Am> {
    match value.as_literal()?.value {
        Primitive::Other(Container::Am(ref am)) => Some(am),
        _ => None,
    }
}

fn as_tbl(value: &Ari) -> Option<&Tbl> {
    match value.as_literal()?.value {
        Primitive::Other(Container::Tbl(ref tbl)) => Some(tbl),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typing::builtin::Builtin;
    use crate::ty::AriType;

    fn union_int_textstr() -> Union {
        Union {
            choices: vec![
                Box::new(Builtin::for_type(AriType::Int).unwrap()),
                Box::new(Builtin::for_type(AriType::TextStr).unwrap()),
            ],
        }
    }

    // S5: union {INT, TEXTSTR} prefers the first choice whose convert
    // succeeds, passes a matching TEXTSTR through as identity, and rejects
    // an AC container input as NOCHOICE.
    #[test]
    fn union_converts_real_to_int_branch() {
        let u = union_int_textstr();
        let real = Ari::lit_typed(AriType::Real32, Primitive::F64(3.0)).unwrap();
        let converted = u.convert(&real).unwrap();
        assert_eq!(converted, Ari::lit_typed(AriType::Int, Primitive::I64(3)).unwrap());
    }

    #[test]
    fn union_passes_through_matching_textstr() {
        let u = union_int_textstr();
        let text = Ari::lit_typed(AriType::TextStr, Primitive::Text("hello".into())).unwrap();
        assert_eq!(u.convert(&text).unwrap(), text);
    }

    #[test]
    fn union_rejects_unconvertible_input() {
        let u = union_int_textstr();
        let ac = Ari::lit_typed(AriType::Ac, Primitive::Other(Container::Ac(Box::new(Ac::new(vec![]))))).unwrap();
        assert!(u.convert(&ac).is_err());
    }

    #[test]
    fn ulist_enforces_uniform_item_type_and_size() {
        let list = UList {
            item_type: Box::new(Builtin::for_type(AriType::Int).unwrap()),
            size_range: Range::closed(1, 2),
        };
        let ok = Ari::lit_typed(
            AriType::Ac,
            Primitive::Other(Container::Ac(Box::new(Ac::new(vec![
                Ari::lit_typed(AriType::Int, Primitive::I64(1)).unwrap(),
            ])))),
        )
        .unwrap();
        assert_eq!(list.match_value(&ok), MatchResult::Positive);

        let too_many = Ari::lit_typed(
            AriType::Ac,
            Primitive::Other(Container::Ac(Box::new(Ac::new(vec![
                Ari::lit_typed(AriType::Int, Primitive::I64(1)).unwrap(),
                Ari::lit_typed(AriType::Int, Primitive::I64(2)).unwrap(),
                Ari::lit_typed(AriType::Int, Primitive::I64(3)).unwrap(),
            ])))),
        )
        .unwrap();
        assert_eq!(list.match_value(&too_many), MatchResult::Negative);
    }
}
