//! Core data model for the job board backend.
//! This crate declares the entity schema handed to the hosting platform and
//! owns the referential-integrity rules between its records.

pub mod catalog;
pub mod config;
pub mod logging;
pub mod model;
pub mod record;
pub mod registry;
pub mod schema;

pub use catalog::{jobboard_entities, jobboard_registry, jobboard_schema};
pub use config::{ApiKeyAuthorizationMode, AuthorizationMode, ConfigError, DataConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::auth::AuthorizationRule;
pub use model::entity::{EntityDef, EntityValidationError};
pub use model::field::{FieldDef, FieldType};
pub use model::relation::{RelationDef, RelationKind};
pub use record::integrity::{IntegrityError, IntegrityResult, RecordSet};
pub use record::types::{
    Application, ApplicationStatus, InvalidEnumValueError, Job, RecordId,
    RecordValidationError, Role, Todo, User,
};
pub use registry::{SchemaError, SchemaRegistry};
pub use schema::{EntitySchema, RelationPair, Schema};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
