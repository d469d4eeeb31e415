//! Immutable schema snapshot handed to the API generator.
//!
//! # Responsibility
//! - Expose resolved entities, fields, relation pairs and authorization config.
//! - Stay read-only once built; only `SchemaRegistry::build_schema` creates one.
//!
//! # Invariants
//! - Entities are keyed and iterated in name order.
//! - Every `BelongsTo` appears in exactly one `RelationPair`.

use crate::config::DataConfig;
use crate::model::auth::AuthorizationRule;
use crate::model::field::FieldDef;
use crate::model::relation::{RelationDef, RelationKind};
use serde::Serialize;
use std::collections::BTreeMap;

/// Resolved entity as seen by the generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntitySchema {
    pub name: String,
    /// Declared fields plus implicit `id`/timestamp fields.
    pub fields: Vec<FieldDef>,
    pub relations: Vec<RelationDef>,
    pub authorization: Vec<AuthorizationRule>,
}

impl EntitySchema {
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn relation(&self, name: &str) -> Option<&RelationDef> {
        self.relations.iter().find(|relation| relation.name == name)
    }

    /// Declared fields only, in declaration order.
    pub fn declared_fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter().filter(|field| !field.implicit)
    }
}

/// One `BelongsTo` and the inverse view that answers it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationPair {
    /// Entity holding the foreign key.
    pub owner: String,
    pub belongs_to: String,
    pub foreign_key: String,
    pub inverse_entity: String,
    pub inverse: String,
    /// `HasMany` or `HasOne`.
    pub inverse_kind: RelationKind,
}

impl RelationPair {
    pub fn is_self_referential(&self) -> bool {
        self.owner == self.inverse_entity
    }
}

/// Validated, immutable schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schema {
    entities: BTreeMap<String, EntitySchema>,
    relations: Vec<RelationPair>,
    authorization: DataConfig,
}

impl Schema {
    pub(crate) fn new(
        entities: BTreeMap<String, EntitySchema>,
        relations: Vec<RelationPair>,
        authorization: DataConfig,
    ) -> Self {
        Self {
            entities,
            relations,
            authorization,
        }
    }

    pub fn entity(&self, name: &str) -> Option<&EntitySchema> {
        self.entities.get(name)
    }

    pub fn entities(&self) -> impl Iterator<Item = &EntitySchema> {
        self.entities.values()
    }

    /// Returns sorted entity names.
    pub fn entity_names(&self) -> Vec<&str> {
        self.entities.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn relations(&self) -> &[RelationPair] {
        &self.relations
    }

    /// Returns pairs where `entity` is either side.
    pub fn relations_of<'a>(&'a self, entity: &'a str) -> impl Iterator<Item = &'a RelationPair> {
        self.relations
            .iter()
            .filter(move |pair| pair.owner == entity || pair.inverse_entity == entity)
    }

    /// Finds the pair a relation of `entity` takes part in.
    pub fn pair_for(&self, entity: &str, relation: &str) -> Option<&RelationPair> {
        self.relations.iter().find(|pair| {
            (pair.owner == entity && pair.belongs_to == relation)
                || (pair.inverse_entity == entity && pair.inverse == relation)
        })
    }

    pub fn authorization(&self) -> &DataConfig {
        &self.authorization
    }
}
