//! The five-part object path addressing tuple (§3.3).

use crate::date::RevisionDate;
use crate::idseg::IdSegment;
use crate::ty::AriType;

/// Which parts of a full object path are present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    /// All five parts present: `org, model, [rev], type, object`.
    FullyQualified,
    /// Only `org` and `model` (and optional `rev`) are present.
    Namespace,
    /// Only `type` and `object` are present (no org/model) — a relative
    /// reference resolved against an implicit namespace.
    Relative,
}

/// The five-part `organization-id / model-id / model-revision-date? /
/// type-id / object-id` addressing tuple.
///
/// When `type_id` is present and recognized, [`ObjectPath::ari_type`]
/// caches the derived [`AriType`] alongside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectPath {
    /// Organization identifier segment; `None` for a relative path.
    pub org_id: Option<IdSegment>,
    /// Model identifier segment; `None` for a relative path.
    pub model_id: Option<IdSegment>,
    /// Optional model-revision date, only meaningful alongside `model_id`.
    pub model_rev: Option<RevisionDate>,
    /// Object-type segment; `None` for a bare namespace reference.
    pub type_id: Option<IdSegment>,
    /// Object identifier segment; `None` for a bare namespace reference.
    pub object_id: Option<IdSegment>,
}

impl ObjectPath {
    /// Builds a fully-qualified path: `org, model, [rev], type, object`.
    #[must_use]
    pub fn fully_qualified(
        org_id: IdSegment,
        model_id: IdSegment,
        model_rev: Option<RevisionDate>,
        type_id: IdSegment,
        object_id: IdSegment,
    ) -> Self {
        Self {
            org_id: Some(org_id),
            model_id: Some(model_id),
            model_rev,
            type_id: Some(type_id),
            object_id: Some(object_id),
        }
    }

    /// Builds a namespace-only path: `org, model, [rev]`.
    #[must_use]
    pub fn namespace(org_id: IdSegment, model_id: IdSegment, model_rev: Option<RevisionDate>) -> Self {
        Self {
            org_id: Some(org_id),
            model_id: Some(model_id),
            model_rev,
            type_id: None,
            object_id: None,
        }
    }

    /// Builds a relative path: `type, object` only.
    #[must_use]
    pub fn relative(type_id: IdSegment, object_id: IdSegment) -> Self {
        Self {
            org_id: None,
            model_id: None,
            model_rev: None,
            type_id: Some(type_id),
            object_id: Some(object_id),
        }
    }

    /// Classifies which parts of the path are present.
    #[must_use]
    pub fn kind(&self) -> PathKind {
        if self.org_id.is_some() && self.model_id.is_some() {
            if self.type_id.is_some() && self.object_id.is_some() {
                PathKind::FullyQualified
            } else {
                PathKind::Namespace
            }
        } else {
            PathKind::Relative
        }
    }

    /// The derived [`AriType`] of this path's `type_id`, if it is present
    /// and recognized (either as an integer enumeration or a registered
    /// type name).
    #[must_use]
    pub fn ari_type(&self) -> Option<AriType> {
        match self.type_id.as_ref()? {
            IdSegment::Int(v) => i32::try_from(*v).ok().and_then(|c| AriType::from_code(c).ok()),
            IdSegment::Text(s) => AriType::from_name(s).ok(),
            IdSegment::Null => None,
        }
    }
}
