//! Recursive structural algorithms shared by every part of the crate:
//! visit, translate, hash, total order, and promotion-aware value
//! equality (§4.6, §9).
//!
//! The total order implemented by [`total_order`] backs `Ord`/`Hash` for
//! [`Ari`] (used as a `BTreeMap` key inside [`crate::containers::Am`]) and
//! is deliberately *not* numeric-promotion aware: distinct primitive tags
//! always compare by tag, never by promoted value, so the order stays a
//! well-defined total order over the raw representation. [`value_eq`] is
//! the separate, promotion-aware equality relation (§4.6 property 7):
//! `/INT/1 == /UINT/1 == /REAL32/1.0`.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use crate::containers::{Container, Nonce};
use crate::error::Result;
use crate::params::Params;
use crate::value::{Ari, Primitive, Reference};

/// Context passed to visitor and translator callbacks.
pub struct VisitCtx<'a> {
    /// The parent value of the one being visited, if any.
    pub parent: Option<&'a Ari>,
    /// True if the parent is an AM literal and this node is a map key.
    pub is_map_key: bool,
}

/// A recursive structural visitor over an ARI tree.
///
/// Returning `false` from [`Visitor::visit`] stops the walk immediately
/// (mirrors the original's "non-zero return stops iteration").
pub trait Visitor {
    /// Called for every node, before recursing into its children.
    fn visit(&mut self, ari: &Ari, ctx: &VisitCtx) -> bool;
}

/// Walks `ari` recursively, calling `visitor` on every node.
pub fn visit(ari: &Ari, visitor: &mut dyn Visitor) -> bool {
    visit_ctx(ari, visitor, &VisitCtx { parent: None, is_map_key: false })
}

fn visit_ctx(ari: &Ari, visitor: &mut dyn Visitor, ctx: &VisitCtx) -> bool {
    if !visitor.visit(ari, ctx) {
        return false;
    }
    match ari {
        Ari::Lit(lit) => {
            if let Primitive::Other(c) = &lit.value {
                return visit_container(c, ari, visitor);
            }
        }
        Ari::Ref(r) => {
            return visit_params(&r.params, ari, visitor);
        }
    }
    true
}

fn visit_container(c: &Container, parent: &Ari, visitor: &mut dyn Visitor) -> bool {
    let child_ctx = |is_map_key: bool| VisitCtx { parent: Some(parent), is_map_key };
    match c {
        Container::Ac(ac) => ac.items.iter().all(|it| visit_ctx(it, visitor, &child_ctx(false))),
        Container::Am(am) => am.items.iter().all(|(k, v)| {
            visit_ctx(k, visitor, &child_ctx(true)) && visit_ctx(v, visitor, &child_ctx(false))
        }),
        Container::Tbl(tbl) => tbl.items.iter().all(|it| visit_ctx(it, visitor, &child_ctx(false))),
        Container::ExecSet(es) => es.targets.iter().all(|it| visit_ctx(it, visitor, &child_ctx(false))),
        Container::RptSet(rs) => rs.reports.iter().all(|report| {
            visit_ctx(&report.reltime, visitor, &child_ctx(false))
                && visit_ctx(&report.source, visitor, &child_ctx(false))
                && report.items.iter().all(|it| visit_ctx(it, visitor, &child_ctx(false)))
        }),
    }
}

fn visit_params(params: &Params, parent: &Ari, visitor: &mut dyn Visitor) -> bool {
    let child_ctx = |is_map_key: bool| VisitCtx { parent: Some(parent), is_map_key };
    match params {
        Params::None => true,
        Params::Ac(ac) => ac.items.iter().all(|it| visit_ctx(it, visitor, &child_ctx(false))),
        Params::Am(am) => am.items.iter().all(|(k, v)| {
            visit_ctx(k, visitor, &child_ctx(true)) && visit_ctx(v, visitor, &child_ctx(false))
        }),
    }
}

/// The result of a [`Translator`] callback at one node.
pub enum TranslateOutcome {
    /// Translation failed; propagate `err` and stop.
    Failure(crate::error::Error),
    /// The callback fully translated this node; do not recurse further.
    Final(Ari),
    /// The callback made no change; perform the default structural copy,
    /// recursing into any contained values.
    Default,
}

/// A recursive structural translator (map-copy with callbacks, §9).
pub trait Translator {
    /// Called for every node, before the default recursive copy.
    fn map(&mut self, input: &Ari, ctx: &VisitCtx) -> TranslateOutcome;
}

/// Translates `input` into a new value, applying `translator` at every
/// node and falling back to a structural deep copy where it returns
/// [`TranslateOutcome::Default`].
pub fn translate(input: &Ari, translator: &mut dyn Translator) -> Result<Ari> {
    translate_ctx(input, translator, &VisitCtx { parent: None, is_map_key: false })
}

fn translate_ctx(input: &Ari, translator: &mut dyn Translator, ctx: &VisitCtx) -> Result<Ari> {
    match translator.map(input, ctx) {
        TranslateOutcome::Failure(e) => Err(e),
        TranslateOutcome::Final(v) => Ok(v),
        TranslateOutcome::Default => translate_default(input, translator, ctx),
    }
}

fn translate_default(input: &Ari, translator: &mut dyn Translator, ctx: &VisitCtx) -> Result<Ari> {
    match input {
        Ari::Lit(lit) => {
            let value = match &lit.value {
                Primitive::Other(c) => Primitive::Other(translate_container(c, input, translator)?),
                other => other.clone(),
            };
            Ok(Ari::Lit(crate::value::Literal {
                ari_type: lit.ari_type,
                value,
            }))
        }
        Ari::Ref(r) => {
            let params = translate_params(&r.params, input, translator)?;
            let _ = ctx;
            Ok(Ari::Ref(Reference {
                path: r.path.clone(),
                params,
            }))
        }
    }
}

fn translate_container(c: &Container, parent: &Ari, translator: &mut dyn Translator) -> Result<Container> {
    let child_ctx = |is_map_key: bool| VisitCtx { parent: Some(parent), is_map_key };
    Ok(match c {
        Container::Ac(ac) => {
            let items = ac
                .items
                .iter()
                .map(|it| translate_ctx(it, translator, &child_ctx(false)))
                .collect::<Result<Vec<_>>>()?;
            Container::Ac(Box::new(crate::containers::Ac::new(items)))
        }
        Container::Am(am) => {
            let mut out = crate::containers::Am::new();
            for (k, v) in &am.items {
                let nk = translate_ctx(k, translator, &child_ctx(true))?;
                let nv = translate_ctx(v, translator, &child_ctx(false))?;
                out.insert(nk, nv)?;
            }
            Container::Am(Box::new(out))
        }
        Container::Tbl(tbl) => {
            let items = tbl
                .items
                .iter()
                .map(|it| translate_ctx(it, translator, &child_ctx(false)))
                .collect::<Result<Vec<_>>>()?;
            Container::Tbl(Box::new(crate::containers::Tbl::new(tbl.ncols, items)?))
        }
        Container::ExecSet(es) => {
            let targets = es
                .targets
                .iter()
                .map(|it| translate_ctx(it, translator, &child_ctx(false)))
                .collect::<Result<Vec<_>>>()?;
            Container::ExecSet(Box::new(crate::containers::ExecSet::new(es.nonce.clone(), targets)))
        }
        Container::RptSet(rs) => {
            let mut reports = Vec::with_capacity(rs.reports.len());
            for report in &rs.reports {
                let reltime = translate_ctx(&report.reltime, translator, &child_ctx(false))?;
                let source = translate_ctx(&report.source, translator, &child_ctx(false))?;
                let items = report
                    .items
                    .iter()
                    .map(|it| translate_ctx(it, translator, &child_ctx(false)))
                    .collect::<Result<Vec<_>>>()?;
                reports.push(crate::containers::Report::new(reltime, source, items));
            }
            Container::RptSet(Box::new(crate::containers::RptSet::new(rs.nonce.clone(), rs.reftime.clone(), reports)))
        }
    })
}

fn translate_params(params: &Params, parent: &Ari, translator: &mut dyn Translator) -> Result<Params> {
    let child_ctx = |is_map_key: bool| VisitCtx { parent: Some(parent), is_map_key };
    Ok(match params {
        Params::None => Params::None,
        Params::Ac(ac) => {
            let items = ac
                .items
                .iter()
                .map(|it| translate_ctx(it, translator, &child_ctx(false)))
                .collect::<Result<Vec<_>>>()?;
            Params::Ac(crate::containers::Ac::new(items))
        }
        Params::Am(am) => {
            let mut out = crate::containers::Am::new();
            for (k, v) in &am.items {
                let nk = translate_ctx(k, translator, &child_ctx(true))?;
                let nv = translate_ctx(v, translator, &child_ctx(false))?;
                out.insert(nk, nv)?;
            }
            Params::Am(out)
        }
    })
}

// --- Hashing -----------------------------------------------------------

/// Hashes `ari` into `state`, walking it structurally. Insensitive to the
/// *order* a container happens to be iterated in beyond what the
/// container's own canonical order already guarantees (AM iterates in
/// key order, so this is automatically order-stable).
pub fn hash_into<H: Hasher>(ari: &Ari, state: &mut H) {
    match ari {
        Ari::Lit(lit) => {
            0u8.hash(state);
            lit.ari_type.hash(state);
            hash_primitive(&lit.value, state);
        }
        Ari::Ref(r) => {
            1u8.hash(state);
            hash_path(&r.path, state);
            hash_params(&r.params, state);
        }
    }
}

fn hash_primitive<H: Hasher>(p: &Primitive, state: &mut H) {
    match p {
        Primitive::Undefined => 0u8.hash(state),
        Primitive::Null => 1u8.hash(state),
        Primitive::Bool(b) => {
            2u8.hash(state);
            b.hash(state);
        }
        Primitive::U64(v) => {
            3u8.hash(state);
            v.hash(state);
        }
        Primitive::I64(v) => {
            4u8.hash(state);
            v.hash(state);
        }
        Primitive::F64(v) => {
            5u8.hash(state);
            // Normalize -0.0 to +0.0 and canonicalize NaN so that
            // value_eq-equal floats also hash equal.
            let bits = if *v == 0.0 { 0u64 } else if v.is_nan() { u64::MAX } else { v.to_bits() };
            bits.hash(state);
        }
        Primitive::Text(s) => {
            6u8.hash(state);
            s.hash(state);
        }
        Primitive::Bytes(b) => {
            7u8.hash(state);
            b.hash(state);
        }
        Primitive::Timespec(ts) => {
            8u8.hash(state);
            ts.hash(state);
        }
        Primitive::Other(c) => {
            9u8.hash(state);
            hash_container(c, state);
        }
    }
}

fn hash_container<H: Hasher>(c: &Container, state: &mut H) {
    match c {
        Container::Ac(ac) => {
            0u8.hash(state);
            for it in &ac.items {
                hash_into(it, state);
            }
        }
        Container::Am(am) => {
            1u8.hash(state);
            for (k, v) in &am.items {
                hash_into(k, state);
                hash_into(v, state);
            }
        }
        Container::Tbl(tbl) => {
            2u8.hash(state);
            tbl.ncols.hash(state);
            for it in &tbl.items {
                hash_into(it, state);
            }
        }
        Container::ExecSet(es) => {
            3u8.hash(state);
            hash_nonce(&es.nonce, state);
            for it in &es.targets {
                hash_into(it, state);
            }
        }
        Container::RptSet(rs) => {
            4u8.hash(state);
            hash_nonce(&rs.nonce, state);
            hash_into(&rs.reftime, state);
            for report in &rs.reports {
                hash_into(&report.reltime, state);
                hash_into(&report.source, state);
                for it in &report.items {
                    hash_into(it, state);
                }
            }
        }
    }
}

fn hash_nonce<H: Hasher>(n: &Nonce, state: &mut H) {
    match n {
        Nonce::Null => 0u8.hash(state),
        Nonce::Int(v) => {
            1u8.hash(state);
            v.hash(state);
        }
        Nonce::Bytes(b) => {
            2u8.hash(state);
            b.hash(state);
        }
    }
}

fn hash_path<H: Hasher>(path: &crate::path::ObjectPath, state: &mut H) {
    path.org_id.hash(state);
    path.model_id.hash(state);
    path.model_rev.hash(state);
    path.type_id.hash(state);
    path.object_id.hash(state);
}

fn hash_params<H: Hasher>(params: &Params, state: &mut H) {
    match params {
        Params::None => 0u8.hash(state),
        Params::Ac(ac) => {
            1u8.hash(state);
            for it in &ac.items {
                hash_into(it, state);
            }
        }
        Params::Am(am) => {
            2u8.hash(state);
            for (k, v) in &am.items {
                hash_into(k, state);
                hash_into(v, state);
            }
        }
    }
}

// --- Total order ---------------------------------------------------------

fn primitive_tag_rank(p: &Primitive) -> u8 {
    match p {
        Primitive::Undefined => 0,
        Primitive::Null => 1,
        Primitive::Bool(_) => 2,
        Primitive::U64(_) => 3,
        Primitive::I64(_) => 4,
        Primitive::F64(_) => 5,
        Primitive::Text(_) => 6,
        Primitive::Bytes(_) => 7,
        Primitive::Timespec(_) => 8,
        Primitive::Other(_) => 9,
    }
}

fn container_tag_rank(c: &Container) -> u8 {
    match c {
        Container::Ac(_) => 0,
        Container::Am(_) => 1,
        Container::Tbl(_) => 2,
        Container::ExecSet(_) => 3,
        Container::RptSet(_) => 4,
    }
}

fn cmp_f64(a: f64, b: f64) -> Ordering {
    if a.is_nan() && b.is_nan() {
        Ordering::Equal
    } else if a.is_nan() {
        Ordering::Greater
    } else if b.is_nan() {
        Ordering::Less
    } else {
        // `-0.0 == 0.0` already holds under `PartialOrd for f64`.
        a.partial_cmp(&b).unwrap_or(Ordering::Equal)
    }
}

fn cmp_nonce(a: &Nonce, b: &Nonce) -> Ordering {
    fn rank(n: &Nonce) -> u8 {
        match n {
            Nonce::Null => 0,
            Nonce::Int(_) => 1,
            Nonce::Bytes(_) => 2,
        }
    }
    match (a, b) {
        (Nonce::Null, Nonce::Null) => Ordering::Equal,
        (Nonce::Int(x), Nonce::Int(y)) => x.cmp(y),
        (Nonce::Bytes(x), Nonce::Bytes(y)) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

fn cmp_primitive(a: &Primitive, b: &Primitive) -> Ordering {
    let rank = primitive_tag_rank(a).cmp(&primitive_tag_rank(b));
    if rank != Ordering::Equal {
        return rank;
    }
    match (a, b) {
        (Primitive::Undefined, Primitive::Undefined) => Ordering::Equal,
        (Primitive::Null, Primitive::Null) => Ordering::Equal,
        (Primitive::Bool(x), Primitive::Bool(y)) => x.cmp(y),
        (Primitive::U64(x), Primitive::U64(y)) => x.cmp(y),
        (Primitive::I64(x), Primitive::I64(y)) => x.cmp(y),
        (Primitive::F64(x), Primitive::F64(y)) => cmp_f64(*x, *y),
        (Primitive::Text(x), Primitive::Text(y)) => x.cmp(y),
        (Primitive::Bytes(x), Primitive::Bytes(y)) => x.cmp(y),
        (Primitive::Timespec(x), Primitive::Timespec(y)) => x.cmp(y),
        (Primitive::Other(x), Primitive::Other(y)) => cmp_container(x, y),
        _ => Ordering::Equal, // unreachable: tag rank already distinguished
    }
}

fn cmp_container(a: &Container, b: &Container) -> Ordering {
    let rank = container_tag_rank(a).cmp(&container_tag_rank(b));
    if rank != Ordering::Equal {
        return rank;
    }
    match (a, b) {
        (Container::Ac(x), Container::Ac(y)) => x.items.cmp(&y.items),
        (Container::Am(x), Container::Am(y)) => x.items.cmp(&y.items),
        (Container::Tbl(x), Container::Tbl(y)) => x.ncols.cmp(&y.ncols).then_with(|| x.items.cmp(&y.items)),
        (Container::ExecSet(x), Container::ExecSet(y)) => {
            cmp_nonce(&x.nonce, &y.nonce).then_with(|| x.targets.cmp(&y.targets))
        }
        (Container::RptSet(x), Container::RptSet(y)) => cmp_nonce(&x.nonce, &y.nonce)
            .then_with(|| x.reftime.cmp(&y.reftime))
            .then_with(|| cmp_reports(&x.reports, &y.reports)),
        _ => Ordering::Equal, // unreachable: tag rank already distinguished
    }
}

fn cmp_reports(a: &[crate::containers::Report], b: &[crate::containers::Report]) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| {
        for (x, y) in a.iter().zip(b.iter()) {
            let c = x
                .reltime
                .cmp(&y.reltime)
                .then_with(|| x.source.cmp(&y.source))
                .then_with(|| x.items.cmp(&y.items));
            if c != Ordering::Equal {
                return c;
            }
        }
        Ordering::Equal
    })
}

/// Total order over `Ari` (§4.6): literals before references; within
/// literals, untyped before typed, then declared type, then primitive
/// tag, then value.
pub fn total_order(a: &Ari, b: &Ari) -> Ordering {
    match (a, b) {
        (Ari::Lit(x), Ari::Lit(y)) => x
            .ari_type
            .is_some()
            .cmp(&y.ari_type.is_some())
            .then_with(|| match (x.ari_type, y.ari_type) {
                (Some(tx), Some(ty)) => tx.code().cmp(&ty.code()),
                _ => Ordering::Equal,
            })
            .then_with(|| cmp_primitive(&x.value, &y.value)),
        (Ari::Ref(x), Ari::Ref(y)) => cmp_reference(x, y),
        (Ari::Lit(_), Ari::Ref(_)) => Ordering::Less,
        (Ari::Ref(_), Ari::Lit(_)) => Ordering::Greater,
    }
}

fn cmp_reference(a: &Reference, b: &Reference) -> Ordering {
    a.path
        .org_id
        .cmp(&b.path.org_id)
        .then_with(|| a.path.model_id.cmp(&b.path.model_id))
        .then_with(|| a.path.model_rev.cmp(&b.path.model_rev))
        .then_with(|| a.path.type_id.cmp(&b.path.type_id))
        .then_with(|| a.path.object_id.cmp(&b.path.object_id))
        .then_with(|| cmp_params(&a.params, &b.params))
}

fn cmp_params(a: &Params, b: &Params) -> Ordering {
    fn rank(p: &Params) -> u8 {
        match p {
            Params::None => 0,
            Params::Ac(_) => 1,
            Params::Am(_) => 2,
        }
    }
    let r = rank(a).cmp(&rank(b));
    if r != Ordering::Equal {
        return r;
    }
    match (a, b) {
        (Params::None, Params::None) => Ordering::Equal,
        (Params::Ac(x), Params::Ac(y)) => x.items.cmp(&y.items),
        (Params::Am(x), Params::Am(y)) => x.items.cmp(&y.items),
        _ => Ordering::Equal, // unreachable: rank already distinguished
    }
}

// --- Promotion-aware value equality --------------------------------------

enum NumKind {
    Int(i128),
    Float(f64),
}

fn numeric_kind(p: &Primitive) -> Option<NumKind> {
    match p {
        Primitive::U64(v) => Some(NumKind::Int(*v as i128)),
        Primitive::I64(v) => Some(NumKind::Int(*v as i128)),
        Primitive::F64(v) => Some(NumKind::Float(*v)),
        _ => None,
    }
}

/// Promotion-aware value equality (§4.6, property 7): numeric leaves are
/// compared by mathematical value after promotion, so `/INT/1 ==
/// /UINT/1 == /REAL32/1.0`. Equality does *not* propagate the promotion
/// transitively through container contents — each child is compared with
/// this same rule independently, so only leaves see promotion.
pub fn value_eq(a: &Ari, b: &Ari) -> bool {
    match (a, b) {
        (Ari::Lit(x), Ari::Lit(y)) => literal_eq(x, y),
        (Ari::Ref(x), Ari::Ref(y)) => reference_eq(x, y),
        _ => false,
    }
}

fn literal_eq(a: &crate::value::Literal, b: &crate::value::Literal) -> bool {
    if let (Some(nx), Some(ny)) = (numeric_kind(&a.value), numeric_kind(&b.value)) {
        return numeric_eq(nx, ny);
    }
    primitive_eq(&a.value, &b.value)
}

fn numeric_eq(a: NumKind, b: NumKind) -> bool {
    match (a, b) {
        (NumKind::Int(x), NumKind::Int(y)) => x == y,
        // IEEE value equality: NaN is never equal to anything, including itself.
        (NumKind::Float(x), NumKind::Float(y)) => x == y,
        (NumKind::Int(x), NumKind::Float(y)) | (NumKind::Float(y), NumKind::Int(x)) => (x as f64) == y,
    }
}

fn primitive_eq(a: &Primitive, b: &Primitive) -> bool {
    match (a, b) {
        (Primitive::Undefined, Primitive::Undefined) => true,
        (Primitive::Null, Primitive::Null) => true,
        (Primitive::Bool(x), Primitive::Bool(y)) => x == y,
        (Primitive::Text(x), Primitive::Text(y)) => x == y,
        (Primitive::Bytes(x), Primitive::Bytes(y)) => x == y,
        (Primitive::Timespec(x), Primitive::Timespec(y)) => x == y,
        (Primitive::Other(x), Primitive::Other(y)) => container_eq(x, y),
        _ => false,
    }
}

fn container_eq(a: &Container, b: &Container) -> bool {
    match (a, b) {
        (Container::Ac(x), Container::Ac(y)) => {
            x.items.len() == y.items.len() && x.items.iter().zip(&y.items).all(|(p, q)| value_eq(p, q))
        }
        (Container::Am(x), Container::Am(y)) => {
            x.items.len() == y.items.len()
                && x.items.iter().zip(&y.items).all(|((kx, vx), (ky, vy))| {
                    // Keys are structurally compared (primitive-only, no
                    // promotion ambiguity in practice) while values use
                    // the promotion-aware relation.
                    kx == ky && value_eq(vx, vy)
                })
        }
        (Container::Tbl(x), Container::Tbl(y)) => {
            x.ncols == y.ncols
                && x.items.len() == y.items.len()
                && x.items.iter().zip(&y.items).all(|(p, q)| value_eq(p, q))
        }
        (Container::ExecSet(x), Container::ExecSet(y)) => {
            x.nonce == y.nonce
                && x.targets.len() == y.targets.len()
                && x.targets.iter().zip(&y.targets).all(|(p, q)| value_eq(p, q))
        }
        (Container::RptSet(x), Container::RptSet(y)) => {
            x.nonce == y.nonce
                && value_eq(&x.reftime, &y.reftime)
                && x.reports.len() == y.reports.len()
                && x.reports.iter().zip(&y.reports).all(|(p, q)| {
                    value_eq(&p.reltime, &q.reltime)
                        && value_eq(&p.source, &q.source)
                        && p.items.len() == q.items.len()
                        && p.items.iter().zip(&q.items).all(|(a, b)| value_eq(a, b))
                })
        }
        _ => false,
    }
}

fn reference_eq(a: &Reference, b: &Reference) -> bool {
    a.path == b.path && params_eq(&a.params, &b.params)
}

fn params_eq(a: &Params, b: &Params) -> bool {
    match (a, b) {
        (Params::None, Params::None) => true,
        (Params::Ac(x), Params::Ac(y)) => {
            x.items.len() == y.items.len() && x.items.iter().zip(&y.items).all(|(p, q)| value_eq(p, q))
        }
        (Params::Am(x), Params::Am(y)) => {
            x.items.len() == y.items.len()
                && x.items.iter().zip(&y.items).all(|((kx, vx), (ky, vy))| kx == ky && value_eq(vx, vy))
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ty::AriType;

    fn int(v: i64) -> Ari {
        Ari::lit_untyped(Primitive::I64(v))
    }

    fn typed_real32(v: f64) -> Ari {
        Ari::lit_typed(AriType::Real32, Primitive::F64(v)).unwrap()
    }

    #[test]
    fn value_eq_crosses_numeric_promotion() {
        let a = Ari::lit_typed(AriType::Int, Primitive::I64(1)).unwrap();
        let b = Ari::lit_typed(AriType::Uint, Primitive::U64(1)).unwrap();
        let c = typed_real32(1.0);
        assert!(value_eq(&a, &b));
        assert!(value_eq(&b, &c));
    }

    #[test]
    fn total_order_is_not_promotion_aware() {
        let a = Ari::lit_untyped(Primitive::I64(1));
        let b = Ari::lit_untyped(Primitive::U64(1));
        // Distinct primitive tags never compare equal under total_order,
        // even though value_eq treats them as equal.
        assert_ne!(total_order(&a, &b), std::cmp::Ordering::Equal);
        assert!(value_eq(&a, &b));
    }

    #[test]
    fn total_order_orders_untyped_before_typed() {
        let untyped = int(5);
        let typed = Ari::lit_typed(AriType::Int, Primitive::I64(5)).unwrap();
        assert_eq!(total_order(&untyped, &typed), std::cmp::Ordering::Less);
    }

    #[test]
    fn hash_matches_structural_eq_not_value_eq() {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        fn hash_of(a: &Ari) -> u64 {
            let mut h = DefaultHasher::new();
            a.hash(&mut h);
            h.finish()
        }

        // Hash follows the same tag-sensitive relation as total_order/Eq,
        // so two structurally-identical values hash equal...
        assert_eq!(hash_of(&int(1)), hash_of(&int(1)));
        // ...but promotion-equal values of different primitive tags are
        // not required to hash equal, since they are not `Eq` either.
        let a = Ari::lit_untyped(Primitive::I64(1));
        let b = Ari::lit_untyped(Primitive::U64(1));
        assert!(value_eq(&a, &b));
        assert_ne!(a, b);
    }
}
