//! The top-level ARI discriminated value and the literal primitive union
//! (§3.1).

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::buf::Bytes;
use crate::containers::Container;
use crate::error::{Error, Result};
use crate::params::Params;
use crate::path::ObjectPath;
use crate::time::TimeSpec;
use crate::ty::AriType;

/// The active arm of a literal's primitive union.
///
/// `Other` means the literal holds an owned container pointer (AC, AM,
/// TBL, EXECSET, or RPTSET); the concrete container type is recovered
/// from the declared [`AriType`] or, for an untyped container, from the
/// [`Container`] variant itself.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    /// The singleton undefined value; has no corresponding [`AriType`].
    Undefined,
    /// The null primitive.
    Null,
    /// A boolean.
    Bool(bool),
    /// An unsigned 64-bit integer (backs BYTE, UINT, UVAST).
    U64(u64),
    /// A signed 64-bit integer (backs INT, VAST, and ARITYPE's code).
    I64(i64),
    /// A 64-bit float (backs REAL32 and REAL64).
    F64(f64),
    /// A text string; does not include the trailing nul counted by the
    /// wire-format length (§3.1).
    Text(String),
    /// A byte string.
    Bytes(Bytes),
    /// A TP or TD timespec.
    Timespec(TimeSpec),
    /// An owned container pointer.
    Other(Container),
}

impl Primitive {
    /// True for [`Primitive::Undefined`].
    #[must_use]
    pub fn is_undefined(&self) -> bool {
        matches!(self, Primitive::Undefined)
    }
}

/// A literal ARI value: an optional declared type plus a primitive union.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    /// The declared ARI-type, if any. Its presence is semantically
    /// significant: it distinguishes an untyped `10` from `/INT/10`.
    pub ari_type: Option<AriType>,
    /// The active primitive value.
    pub value: Primitive,
}

impl Literal {
    /// The canonical undefined literal: no declared type, undefined
    /// primitive.
    #[must_use]
    pub fn undefined() -> Self {
        Self {
            ari_type: None,
            value: Primitive::Undefined,
        }
    }

    /// True if this is the undefined literal.
    #[must_use]
    pub fn is_undefined(&self) -> bool {
        self.ari_type.is_none() && self.value.is_undefined()
    }

    /// Builds an untyped literal from a primitive value.
    #[must_use]
    pub fn untyped(value: Primitive) -> Self {
        Self { ari_type: None, value }
    }

    /// Builds a typed literal, validating that `ari_type` is consistent
    /// with the primitive tag of `value` (§3.1 invariant).
    pub fn typed(ari_type: AriType, value: Primitive) -> Result<Self> {
        check_type_consistency(ari_type, &value)?;
        Ok(Self {
            ari_type: Some(ari_type),
            value,
        })
    }

    /// The [`AriType`] this literal would report via its type object,
    /// deriving it from the primitive tag when no type was declared.
    #[must_use]
    pub fn effective_type(&self) -> Option<AriType> {
        if self.ari_type.is_some() {
            return self.ari_type;
        }
        match &self.value {
            Primitive::Undefined => None,
            Primitive::Null => Some(AriType::Null),
            Primitive::Bool(_) => Some(AriType::Bool),
            Primitive::U64(_) => Some(AriType::Uvast),
            Primitive::I64(_) => Some(AriType::Vast),
            Primitive::F64(_) => Some(AriType::Real64),
            Primitive::Text(_) => Some(AriType::TextStr),
            Primitive::Bytes(_) => Some(AriType::ByteStr),
            Primitive::Timespec(_) => Some(AriType::Tp),
            Primitive::Other(c) => Some(c.ari_type()),
        }
    }
}

/// Checks that a declared [`AriType`] is consistent with a primitive tag,
/// per the bounds in §4.1.1 (numeric domains) and §3.1 (tag families).
pub(crate) fn check_type_consistency(ari_type: AriType, value: &Primitive) -> Result<()> {
    use Primitive as P;
    let ok = match (ari_type, value) {
        (AriType::Null, P::Null) => true,
        (AriType::Bool, P::Bool(_)) => true,
        (AriType::Byte, P::U64(v)) => *v <= u8::MAX as u64,
        (AriType::Uint, P::U64(v)) => *v <= u32::MAX as u64,
        (AriType::Uvast, P::U64(_)) => true,
        (AriType::Int, P::I64(v)) => *v >= i32::MIN as i64 && *v <= i32::MAX as i64,
        (AriType::Vast, P::I64(_)) => true,
        (AriType::Real32, P::F64(v)) => v.is_nan() || (*v as f32).is_finite() || v.is_infinite(),
        (AriType::Real64, P::F64(_)) => true,
        (AriType::TextStr, P::Text(_)) => true,
        (AriType::ByteStr, P::Bytes(_)) => true,
        (AriType::Label, P::Text(_)) | (AriType::Label, P::I64(_)) => true,
        (AriType::Cbor, P::Bytes(_)) => true,
        (AriType::Aritype, P::I64(_)) => true,
        (AriType::Tp, P::Timespec(_)) => true,
        (AriType::Td, P::Timespec(_)) => true,
        (AriType::Ac, P::Other(Container::Ac(_))) => true,
        (AriType::Am, P::Other(Container::Am(_))) => true,
        (AriType::Tbl, P::Other(Container::Tbl(_))) => true,
        (AriType::ExecSet, P::Other(Container::ExecSet(_))) => true,
        (AriType::RptSet, P::Other(Container::RptSet(_))) => true,
        (AriType::Literal, _) => true,
        _ => false,
    };
    if ok {
        Ok(())
    } else {
        Err(Error::invalid_ari(format!(
            "declared type {} is inconsistent with primitive value",
            ari_type.name()
        )))
    }
}

/// An object reference: a path plus an optional parameter block.
#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
    /// The addressed object path.
    pub path: ObjectPath,
    /// Actual parameters supplied at the reference site.
    pub params: Params,
}

impl Reference {
    /// Builds a reference with no parameters.
    #[must_use]
    pub fn new(path: ObjectPath) -> Self {
        Self {
            path,
            params: Params::None,
        }
    }

    /// Builds a reference with the given parameter block.
    #[must_use]
    pub fn with_params(path: ObjectPath, params: Params) -> Self {
        Self { path, params }
    }
}

/// The top-level discriminated ARI value: either a literal or an object
/// reference.
#[derive(Debug, Clone, PartialEq)]
pub enum Ari {
    /// A literal value.
    Lit(Literal),
    /// An object reference.
    Ref(Reference),
}

impl Default for Ari {
    fn default() -> Self {
        Ari::undefined()
    }
}

impl Ari {
    /// The canonical undefined ARI: the zero value.
    #[must_use]
    pub fn undefined() -> Self {
        Ari::Lit(Literal::undefined())
    }

    /// True if this is the undefined value.
    #[must_use]
    pub fn is_undefined(&self) -> bool {
        matches!(self, Ari::Lit(lit) if lit.is_undefined())
    }

    /// True for the literal variant.
    #[must_use]
    pub fn is_literal(&self) -> bool {
        matches!(self, Ari::Lit(_))
    }

    /// True for the reference variant.
    #[must_use]
    pub fn is_reference(&self) -> bool {
        matches!(self, Ari::Ref(_))
    }

    /// Borrows the literal payload, if this is a literal.
    #[must_use]
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Ari::Lit(lit) => Some(lit),
            Ari::Ref(_) => None,
        }
    }

    /// Borrows the reference payload, if this is a reference.
    #[must_use]
    pub fn as_reference(&self) -> Option<&Reference> {
        match self {
            Ari::Ref(r) => Some(r),
            Ari::Lit(_) => None,
        }
    }

    /// Moves `self` out, replacing it with the undefined value — the
    /// idiomatic `mem::take` analogue of the source's
    /// "move resets source to undefined" lifecycle rule (property 3).
    #[must_use]
    pub fn take(&mut self) -> Ari {
        std::mem::replace(self, Ari::undefined())
    }

    /// The effective [`AriType`] of this value: for a literal, its
    /// declared or derived type; for a reference, the type carried by its
    /// object path, if recognized.
    #[must_use]
    pub fn ari_type(&self) -> Option<AriType> {
        match self {
            Ari::Lit(lit) => lit.effective_type(),
            Ari::Ref(r) => r.path.ari_type(),
        }
    }

    /// Constructs a literal ARI wrapping `value` with no declared type.
    #[must_use]
    pub fn lit_untyped(value: Primitive) -> Self {
        Ari::Lit(Literal::untyped(value))
    }

    /// Constructs a literal ARI with a declared type, validating
    /// consistency with the primitive tag.
    pub fn lit_typed(ari_type: AriType, value: Primitive) -> Result<Self> {
        Ok(Ari::Lit(Literal::typed(ari_type, value)?))
    }
}

// Structural total order (§4.6): literals order before references; within
// literals, untyped before typed, then by declared type, then by
// primitive tag, then by value. Distinct numeric primitive tags compare
// by tag, never by promoted numeric value — that richer notion of
// equality lives in `crate::algo::value_eq` instead, kept separate so
// this `Ord` stays a well-defined total order usable for BTreeMap keys.
impl Eq for Ari {}

impl PartialOrd for Ari {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ari {
    fn cmp(&self, other: &Self) -> Ordering {
        crate::algo::total_order(self, other)
    }
}

impl Hash for Ari {
    fn hash<H: Hasher>(&self, state: &mut H) {
        crate::algo::hash_into(self, state);
    }
}

impl fmt::Display for Ari {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match crate::text::encode::to_text_default(self) {
            Ok(s) => write!(f, "{s}"),
            Err(_) => write!(f, "<ari:encode-error>"),
        }
    }
}
