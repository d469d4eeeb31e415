//! Relation declarations between entities.

use serde::{Deserialize, Serialize};

/// Relation flavor.
///
/// `BelongsTo` owns the foreign key; `HasMany` and `HasOne` are inverse views
/// keyed by the same foreign key on the other side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationKind {
    BelongsTo,
    HasMany,
    HasOne,
}

impl RelationKind {
    /// Returns whether this relation is an inverse view of a `BelongsTo`.
    pub fn is_inverse(self) -> bool {
        matches!(self, Self::HasMany | Self::HasOne)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::BelongsTo => "belongsTo",
            Self::HasMany => "hasMany",
            Self::HasOne => "hasOne",
        }
    }
}

/// One declared relation of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationDef {
    pub name: String,
    pub kind: RelationKind,
    /// Related entity name.
    pub target: String,
    /// For `BelongsTo` a field of the declaring entity, otherwise a field of
    /// `target`.
    pub foreign_key: String,
}

impl RelationDef {
    pub fn new(
        name: impl Into<String>,
        kind: RelationKind,
        target: impl Into<String>,
        foreign_key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            target: target.into(),
            foreign_key: foreign_key.into(),
        }
    }

    pub fn belongs_to(
        name: impl Into<String>,
        target: impl Into<String>,
        foreign_key: impl Into<String>,
    ) -> Self {
        Self::new(name, RelationKind::BelongsTo, target, foreign_key)
    }

    pub fn has_many(
        name: impl Into<String>,
        target: impl Into<String>,
        foreign_key: impl Into<String>,
    ) -> Self {
        Self::new(name, RelationKind::HasMany, target, foreign_key)
    }

    pub fn has_one(
        name: impl Into<String>,
        target: impl Into<String>,
        foreign_key: impl Into<String>,
    ) -> Self {
        Self::new(name, RelationKind::HasOne, target, foreign_key)
    }
}
