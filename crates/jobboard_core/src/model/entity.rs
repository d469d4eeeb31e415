//! Entity declaration and shape validation.
//!
//! # Responsibility
//! - Hold one entity's fields, relations and authorization rules.
//! - Validate naming and member uniqueness before registration.
//!
//! # Invariants
//! - Entity names match `^[A-Z][A-Za-z0-9]*$`.
//! - Field and relation names match `^[a-z][A-Za-z0-9]*$` and never collide.

use crate::model::auth::AuthorizationRule;
use crate::model::field::FieldDef;
use crate::model::relation::RelationDef;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

static ENTITY_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][A-Za-z0-9]*$").expect("valid entity name regex"));
static MEMBER_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][A-Za-z0-9]*$").expect("valid member name regex"));

/// Declarative definition of one entity type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDef {
    pub name: String,
    pub fields: Vec<FieldDef>,
    pub relations: Vec<RelationDef>,
    pub authorization: Vec<AuthorizationRule>,
}

impl EntityDef {
    /// Starts an empty declaration for `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            relations: Vec::new(),
            authorization: Vec::new(),
        }
    }

    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    pub fn relation(mut self, relation: RelationDef) -> Self {
        self.relations.push(relation);
        self
    }

    pub fn authorization(mut self, rule: AuthorizationRule) -> Self {
        if !self.authorization.contains(&rule) {
            self.authorization.push(rule);
        }
        self
    }

    pub fn get_field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn get_relation(&self, name: &str) -> Option<&RelationDef> {
        self.relations.iter().find(|relation| relation.name == name)
    }

    /// Validates declaration-level invariants that need no other entity.
    pub fn validate(&self) -> Result<(), EntityValidationError> {
        if !ENTITY_NAME_RE.is_match(&self.name) {
            return Err(EntityValidationError::InvalidEntityName(self.name.clone()));
        }

        let mut members = BTreeSet::<&str>::new();
        let names = self
            .fields
            .iter()
            .map(|field| field.name.as_str())
            .chain(self.relations.iter().map(|relation| relation.name.as_str()));
        for name in names {
            if !MEMBER_NAME_RE.is_match(name) {
                return Err(EntityValidationError::InvalidMemberName(name.to_string()));
            }
            if !members.insert(name) {
                return Err(EntityValidationError::DuplicateMember(name.to_string()));
            }
        }

        for relation in &self.relations {
            if relation.foreign_key.trim().is_empty() {
                return Err(EntityValidationError::EmptyForeignKey(
                    relation.name.clone(),
                ));
            }
        }
        Ok(())
    }
}

/// Entity shape errors detected before registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityValidationError {
    InvalidEntityName(String),
    InvalidMemberName(String),
    DuplicateMember(String),
    EmptyForeignKey(String),
}

impl Display for EntityValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidEntityName(value) => {
                write!(f, "entity name is invalid: {value} (expected PascalCase)")
            }
            Self::InvalidMemberName(value) => {
                write!(f, "member name is invalid: {value} (expected camelCase)")
            }
            Self::DuplicateMember(value) => write!(f, "member name is duplicated: {value}"),
            Self::EmptyForeignKey(relation) => {
                write!(f, "relation `{relation}` has an empty foreign key")
            }
        }
    }
}

impl Error for EntityValidationError {}
