//! Job board data model declaration.
//!
//! # Responsibility
//! - Declare the `Todo`, `User`, `Job` and `Application` entities.
//! - Build the schema snapshot consumed by the API generator.
//!
//! # Invariants
//! - Every entity is reachable with the public API key.
//! - Foreign keys: `User.parentID`, `Job.postedByID`, `Application.jobID`,
//!   `Application.userID`.

use crate::config::DataConfig;
use crate::model::auth::AuthorizationRule;
use crate::model::entity::EntityDef;
use crate::model::field::FieldDef;
use crate::model::relation::RelationDef;
use crate::registry::{SchemaError, SchemaRegistry};
use crate::schema::Schema;

pub const ENTITY_TODO: &str = "Todo";
pub const ENTITY_USER: &str = "User";
pub const ENTITY_JOB: &str = "Job";
pub const ENTITY_APPLICATION: &str = "Application";

pub const USER_PARENT_KEY: &str = "parentID";
pub const JOB_POSTED_BY_KEY: &str = "postedByID";
pub const APPLICATION_JOB_KEY: &str = "jobID";
pub const APPLICATION_USER_KEY: &str = "userID";

/// Returns the four job board entity declarations.
pub fn jobboard_entities() -> Vec<EntityDef> {
    vec![todo_entity(), user_entity(), job_entity(), application_entity()]
}

/// Registers the job board entities on a fresh registry.
pub fn jobboard_registry(config: DataConfig) -> Result<SchemaRegistry, SchemaError> {
    let mut registry = SchemaRegistry::new(config);
    registry.define_entities(jobboard_entities())?;
    Ok(registry)
}

/// Builds the job board schema snapshot.
pub fn jobboard_schema(config: DataConfig) -> Result<Schema, SchemaError> {
    jobboard_registry(config)?.build_schema()
}

fn todo_entity() -> EntityDef {
    EntityDef::new(ENTITY_TODO)
        .field(FieldDef::string("content"))
        .field(FieldDef::boolean("isDone"))
        .authorization(AuthorizationRule::PublicApiKey)
}

fn user_entity() -> EntityDef {
    EntityDef::new(ENTITY_USER)
        .field(FieldDef::id("id"))
        .field(FieldDef::string("username").required())
        .field(FieldDef::string("email").required())
        // STUDENT | PARENT | EMPLOYER, checked by the record layer.
        .field(FieldDef::string("role").required())
        .field(FieldDef::id(USER_PARENT_KEY))
        .relation(RelationDef::belongs_to("parent", ENTITY_USER, USER_PARENT_KEY))
        .relation(RelationDef::has_many("children", ENTITY_USER, USER_PARENT_KEY))
        .relation(RelationDef::has_many("postedJobs", ENTITY_JOB, JOB_POSTED_BY_KEY))
        .relation(RelationDef::has_many(
            "applications",
            ENTITY_APPLICATION,
            APPLICATION_USER_KEY,
        ))
        .authorization(AuthorizationRule::PublicApiKey)
}

fn job_entity() -> EntityDef {
    EntityDef::new(ENTITY_JOB)
        .field(FieldDef::id("id"))
        .field(FieldDef::string("title").required())
        .field(FieldDef::string("description").required())
        .field(FieldDef::string("location"))
        .field(FieldDef::id(JOB_POSTED_BY_KEY).required())
        .relation(RelationDef::belongs_to("postedBy", ENTITY_USER, JOB_POSTED_BY_KEY))
        .relation(RelationDef::has_many(
            "applications",
            ENTITY_APPLICATION,
            APPLICATION_JOB_KEY,
        ))
        .authorization(AuthorizationRule::PublicApiKey)
}

fn application_entity() -> EntityDef {
    EntityDef::new(ENTITY_APPLICATION)
        .field(FieldDef::id("id"))
        .field(FieldDef::id(APPLICATION_JOB_KEY).required())
        .field(FieldDef::id(APPLICATION_USER_KEY).required())
        // PENDING | ACCEPTED | REJECTED
        .field(FieldDef::string("status").required())
        .field(FieldDef::datetime("appliedAt").required())
        .relation(RelationDef::belongs_to("job", ENTITY_JOB, APPLICATION_JOB_KEY))
        .relation(RelationDef::belongs_to("user", ENTITY_USER, APPLICATION_USER_KEY))
        .authorization(AuthorizationRule::PublicApiKey)
}
