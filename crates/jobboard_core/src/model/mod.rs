//! Declarative schema building blocks.
//!
//! # Responsibility
//! - Describe entity shapes: typed fields, relations and authorization rules.
//! - Keep declarations as plain data; cross-entity checks live in the registry.
//!
//! # Invariants
//! - Entity names are PascalCase, field and relation names are camelCase.
//! - Member names are unique inside one entity.

pub mod auth;
pub mod entity;
pub mod field;
pub mod relation;
