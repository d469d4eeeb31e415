//! Domain model registry.
//!
//! # Responsibility
//! - Collect entity declarations through an explicit builder object.
//! - Resolve cross-entity references and emit an immutable `Schema`.
//!
//! # Invariants
//! - Entity names are unique.
//! - Every relation target resolves to a registered entity.
//! - `BelongsTo` relations and their inverse views are declared in pairs.
//! - `build_schema` does not mutate the registry; repeated builds are equal.

use crate::config::{AuthorizationMode, ConfigError, DataConfig};
use crate::model::auth::AuthorizationRule;
use crate::model::entity::{EntityDef, EntityValidationError};
use crate::model::field::{
    FieldDef, FieldType, CREATED_AT_FIELD, ID_FIELD, UPDATED_AT_FIELD,
};
use crate::model::relation::{RelationDef, RelationKind};
use crate::schema::{EntitySchema, RelationPair, Schema};
use log::{debug, error, info};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Schema declaration and build errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    InvalidEntity {
        entity: String,
        source: EntityValidationError,
    },
    DuplicateEntity(String),
    UnknownReference {
        entity: String,
        relation: String,
        target: String,
    },
    ForeignKeyNotDeclared {
        entity: String,
        relation: String,
        foreign_key: String,
    },
    DanglingRelation {
        entity: String,
        relation: String,
        target: String,
    },
    AmbiguousRelation {
        entity: String,
        relation: String,
    },
    AuthorizationModeMissing {
        entity: String,
        rule: AuthorizationRule,
        mode: AuthorizationMode,
    },
    InvalidConfig(ConfigError),
}

impl SchemaError {
    /// Stable error code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidEntity { .. } => "invalid_entity",
            Self::DuplicateEntity(_) => "duplicate_entity",
            Self::UnknownReference { .. } => "unknown_reference",
            Self::ForeignKeyNotDeclared { .. } => "foreign_key_not_declared",
            Self::DanglingRelation { .. } => "dangling_relation",
            Self::AmbiguousRelation { .. } => "ambiguous_relation",
            Self::AuthorizationModeMissing { .. } => "authorization_mode_missing",
            Self::InvalidConfig(_) => "invalid_config",
        }
    }
}

impl Display for SchemaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidEntity { entity, source } => {
                write!(f, "entity `{entity}` is invalid: {source}")
            }
            Self::DuplicateEntity(name) => write!(f, "entity already registered: {name}"),
            Self::UnknownReference {
                entity,
                relation,
                target,
            } => write!(
                f,
                "relation `{entity}.{relation}` references undeclared entity `{target}`"
            ),
            Self::ForeignKeyNotDeclared {
                entity,
                relation,
                foreign_key,
            } => write!(
                f,
                "relation `{entity}.{relation}` uses foreign key `{foreign_key}` which is not a declared id field"
            ),
            Self::DanglingRelation {
                entity,
                relation,
                target,
            } => write!(
                f,
                "relation `{entity}.{relation}` has no matching inverse on `{target}`"
            ),
            Self::AmbiguousRelation { entity, relation } => write!(
                f,
                "relation `{entity}.{relation}` matches more than one inverse"
            ),
            Self::AuthorizationModeMissing { entity, rule, mode } => write!(
                f,
                "entity `{entity}` uses rule {rule:?} but authorization mode `{}` is not enabled",
                mode.as_str()
            ),
            Self::InvalidConfig(err) => write!(f, "invalid data config: {err}"),
        }
    }
}

impl Error for SchemaError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidEntity { source, .. } => Some(source),
            Self::InvalidConfig(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for SchemaError {
    fn from(value: ConfigError) -> Self {
        Self::InvalidConfig(value)
    }
}

/// Builder that collects entity declarations before validation.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    config: DataConfig,
    entities: BTreeMap<String, EntityDef>,
}

impl SchemaRegistry {
    pub fn new(config: DataConfig) -> Self {
        Self {
            config,
            entities: BTreeMap::new(),
        }
    }

    /// Registers one entity after shape validation.
    ///
    /// Relation targets are resolved by `build_schema`, so entities that
    /// reference each other can be registered in any order.
    pub fn define_entity(&mut self, entity: EntityDef) -> Result<(), SchemaError> {
        entity
            .validate()
            .map_err(|source| SchemaError::InvalidEntity {
                entity: entity.name.clone(),
                source,
            })?;
        if self.entities.contains_key(entity.name.as_str()) {
            return Err(SchemaError::DuplicateEntity(entity.name));
        }

        debug!(
            "event=entity_define module=registry status=ok entity={} fields={} relations={}",
            entity.name,
            entity.fields.len(),
            entity.relations.len()
        );
        self.entities.insert(entity.name.clone(), entity);
        Ok(())
    }

    /// Registers several entities, stopping at the first error.
    pub fn define_entities(
        &mut self,
        entities: impl IntoIterator<Item = EntityDef>,
    ) -> Result<(), SchemaError> {
        for entity in entities {
            self.define_entity(entity)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Returns sorted entity names.
    pub fn entity_names(&self) -> Vec<String> {
        self.entities.keys().cloned().collect()
    }

    pub fn get(&self, name: &str) -> Option<&EntityDef> {
        self.entities.get(name)
    }

    pub fn config(&self) -> &DataConfig {
        &self.config
    }

    /// Validates all cross-references and returns an immutable snapshot.
    ///
    /// # Errors
    /// - `InvalidConfig` when authorization settings are invalid.
    /// - `UnknownReference` when a relation targets an unregistered entity.
    /// - `ForeignKeyNotDeclared` when a foreign key is not an id field.
    /// - `AuthorizationModeMissing` when a rule needs a disabled mode.
    /// - `DanglingRelation` / `AmbiguousRelation` when relation pairs do not
    ///   line up one to one.
    pub fn build_schema(&self) -> Result<Schema, SchemaError> {
        match self.try_build() {
            Ok(schema) => {
                info!(
                    "event=schema_build module=registry status=ok entities={} relation_pairs={}",
                    schema.len(),
                    schema.relations().len()
                );
                Ok(schema)
            }
            Err(err) => {
                error!(
                    "event=schema_build module=registry status=error error_code={} error={}",
                    err.code(),
                    err
                );
                Err(err)
            }
        }
    }

    fn try_build(&self) -> Result<Schema, SchemaError> {
        self.config.validate()?;

        for entity in self.entities.values() {
            for relation in &entity.relations {
                if !self.entities.contains_key(relation.target.as_str()) {
                    return Err(SchemaError::UnknownReference {
                        entity: entity.name.clone(),
                        relation: relation.name.clone(),
                        target: relation.target.clone(),
                    });
                }
            }
        }

        for entity in self.entities.values() {
            for relation in &entity.relations {
                let key_owner = if relation.kind.is_inverse() {
                    &self.entities[relation.target.as_str()]
                } else {
                    entity
                };
                let declared = key_owner
                    .get_field(&relation.foreign_key)
                    .is_some_and(|field| field.kind == FieldType::Id);
                if !declared {
                    return Err(SchemaError::ForeignKeyNotDeclared {
                        entity: entity.name.clone(),
                        relation: relation.name.clone(),
                        foreign_key: relation.foreign_key.clone(),
                    });
                }
            }

            for rule in &entity.authorization {
                let mode = rule.required_mode();
                if !self.config.enables(mode) {
                    return Err(SchemaError::AuthorizationModeMissing {
                        entity: entity.name.clone(),
                        rule: *rule,
                        mode,
                    });
                }
            }
        }

        let relations = self.pair_relations()?;
        let entities = self
            .entities
            .values()
            .map(|entity| (entity.name.clone(), resolve_entity(entity)))
            .collect();
        Ok(Schema::new(entities, relations, self.config.clone()))
    }

    fn pair_relations(&self) -> Result<Vec<RelationPair>, SchemaError> {
        let mut pairs = Vec::new();
        for entity in self.entities.values() {
            for relation in entity
                .relations
                .iter()
                .filter(|relation| relation.kind == RelationKind::BelongsTo)
            {
                let inverse = self.single_match(entity, relation, |candidate| {
                    candidate.kind.is_inverse()
                })?;
                pairs.push(RelationPair {
                    owner: entity.name.clone(),
                    belongs_to: relation.name.clone(),
                    foreign_key: relation.foreign_key.clone(),
                    inverse_entity: relation.target.clone(),
                    inverse: inverse.name.clone(),
                    inverse_kind: inverse.kind,
                });
            }
        }

        // Inverse views must each be answered by exactly one belongsTo too.
        for entity in self.entities.values() {
            for relation in entity
                .relations
                .iter()
                .filter(|relation| relation.kind.is_inverse())
            {
                self.single_match(entity, relation, |candidate| {
                    candidate.kind == RelationKind::BelongsTo
                })?;
            }
        }
        Ok(pairs)
    }

    /// Finds the one relation on `relation.target` pointing back at `entity`
    /// through the same foreign key.
    fn single_match<'a>(
        &'a self,
        entity: &EntityDef,
        relation: &RelationDef,
        kind_matches: impl Fn(&RelationDef) -> bool,
    ) -> Result<&'a RelationDef, SchemaError> {
        let target = &self.entities[relation.target.as_str()];
        let mut matches = target.relations.iter().filter(|candidate| {
            kind_matches(candidate)
                && candidate.target == entity.name
                && candidate.foreign_key == relation.foreign_key
        });
        let Some(found) = matches.next() else {
            return Err(SchemaError::DanglingRelation {
                entity: entity.name.clone(),
                relation: relation.name.clone(),
                target: relation.target.clone(),
            });
        };
        if matches.next().is_some() {
            return Err(SchemaError::AmbiguousRelation {
                entity: entity.name.clone(),
                relation: relation.name.clone(),
            });
        }
        Ok(found)
    }
}

fn resolve_entity(entity: &EntityDef) -> EntitySchema {
    let mut fields = Vec::with_capacity(entity.fields.len() + 3);
    if entity.get_field(ID_FIELD).is_none() {
        fields.push(FieldDef::implicit(ID_FIELD, FieldType::Id));
    }
    fields.extend(entity.fields.iter().cloned());
    for managed in [CREATED_AT_FIELD, UPDATED_AT_FIELD] {
        if entity.get_field(managed).is_none() {
            fields.push(FieldDef::implicit(managed, FieldType::Datetime));
        }
    }

    EntitySchema {
        name: entity.name.clone(),
        fields,
        relations: entity.relations.clone(),
        authorization: entity.authorization.clone(),
    }
}
