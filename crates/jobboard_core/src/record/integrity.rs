//! In-memory referential integrity checks for job board records.
//!
//! # Responsibility
//! - Enforce row-level foreign-key and role rules the schema cannot express.
//! - Refuse removals that would orphan dependent records.
//!
//! # Invariants
//! - A student's `parentID` references an existing `PARENT` user.
//! - Only students carry a `parentID`.
//! - `Job.postedByID` references an existing `EMPLOYER` user.
//! - `Application.jobID` / `userID` reference an existing job and user.
//! - Record ids are unique per entity.

use crate::catalog::{
    APPLICATION_JOB_KEY, APPLICATION_USER_KEY, ENTITY_APPLICATION, ENTITY_JOB, ENTITY_TODO,
    ENTITY_USER, JOB_POSTED_BY_KEY, USER_PARENT_KEY,
};
use crate::record::types::{
    Application, Job, RecordId, RecordValidationError, Role, Todo, User,
};
use log::warn;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type IntegrityResult<T> = Result<T, IntegrityError>;

/// Referential integrity violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityError {
    Invalid(RecordValidationError),
    DuplicateId {
        entity: &'static str,
        id: RecordId,
    },
    NotFound {
        entity: &'static str,
        id: RecordId,
    },
    MissingReference {
        entity: &'static str,
        field: &'static str,
        id: RecordId,
    },
    RoleMismatch {
        field: &'static str,
        id: RecordId,
        expected: Role,
        actual: Role,
    },
    UnexpectedParent {
        user: RecordId,
        role: Role,
    },
    Referenced {
        entity: &'static str,
        id: RecordId,
        by: &'static str,
        count: usize,
    },
}

impl IntegrityError {
    /// Stable error code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Invalid(_) => "invalid_record",
            Self::DuplicateId { .. } => "duplicate_id",
            Self::NotFound { .. } => "not_found",
            Self::MissingReference { .. } => "missing_reference",
            Self::RoleMismatch { .. } => "role_mismatch",
            Self::UnexpectedParent { .. } => "unexpected_parent",
            Self::Referenced { .. } => "still_referenced",
        }
    }
}

impl Display for IntegrityError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid(err) => write!(f, "{err}"),
            Self::DuplicateId { entity, id } => write!(f, "{entity} id already exists: {id}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::MissingReference { entity, field, id } => {
                write!(f, "`{field}` references missing {entity}: {id}")
            }
            Self::RoleMismatch {
                field,
                id,
                expected,
                actual,
            } => write!(
                f,
                "`{field}` must reference a {expected} user, but {id} is {actual}"
            ),
            Self::UnexpectedParent { user, role } => {
                write!(f, "user {user} has role {role} and cannot have a parent")
            }
            Self::Referenced {
                entity,
                id,
                by,
                count,
            } => write!(f, "{entity} {id} is still referenced by {count} {by} record(s)"),
        }
    }
}

impl Error for IntegrityError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RecordValidationError> for IntegrityError {
    fn from(value: RecordValidationError) -> Self {
        Self::Invalid(value)
    }
}

/// Record set that only ever holds referentially consistent data.
///
/// This is a validator over records, not a store; persistence stays with the
/// hosting platform.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordSet {
    todos: BTreeMap<RecordId, Todo>,
    users: BTreeMap<RecordId, User>,
    jobs: BTreeMap<RecordId, Job>,
    applications: BTreeMap<RecordId, Application>,
}

impl RecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a batch of records in any order, then checks the whole set.
    pub fn load(
        users: Vec<User>,
        jobs: Vec<Job>,
        applications: Vec<Application>,
        todos: Vec<Todo>,
    ) -> IntegrityResult<Self> {
        let mut set = Self::new();
        for user in users {
            insert_unique(&mut set.users, ENTITY_USER, user.id, user)?;
        }
        for job in jobs {
            insert_unique(&mut set.jobs, ENTITY_JOB, job.id, job)?;
        }
        for application in applications {
            insert_unique(
                &mut set.applications,
                ENTITY_APPLICATION,
                application.id,
                application,
            )?;
        }
        for todo in todos {
            insert_unique(&mut set.todos, ENTITY_TODO, todo.id, todo)?;
        }
        set.validate()?;
        Ok(set)
    }

    /// Re-checks every record and every reference in the set.
    pub fn validate(&self) -> IntegrityResult<()> {
        let result = self.validate_all();
        if let Err(err) = &result {
            log_rejection("validate", err);
        }
        result
    }

    pub fn insert_todo(&mut self, todo: Todo) -> IntegrityResult<RecordId> {
        self.guard(ENTITY_TODO, |set| {
            todo.validate()?;
            insert_unique(&mut set.todos, ENTITY_TODO, todo.id, todo)
        })
    }

    pub fn insert_user(&mut self, user: User) -> IntegrityResult<RecordId> {
        self.guard(ENTITY_USER, |set| {
            user.validate()?;
            if set.users.contains_key(&user.id) {
                return Err(IntegrityError::DuplicateId {
                    entity: ENTITY_USER,
                    id: user.id,
                });
            }
            set.check_user_refs(&user)?;
            insert_unique(&mut set.users, ENTITY_USER, user.id, user)
        })
    }

    pub fn insert_job(&mut self, job: Job) -> IntegrityResult<RecordId> {
        self.guard(ENTITY_JOB, |set| {
            job.validate()?;
            set.check_job_refs(&job)?;
            insert_unique(&mut set.jobs, ENTITY_JOB, job.id, job)
        })
    }

    pub fn insert_application(&mut self, application: Application) -> IntegrityResult<RecordId> {
        self.guard(ENTITY_APPLICATION, |set| {
            application.validate()?;
            set.check_application_refs(&application)?;
            insert_unique(
                &mut set.applications,
                ENTITY_APPLICATION,
                application.id,
                application,
            )
        })
    }

    pub fn remove_todo(&mut self, id: RecordId) -> IntegrityResult<Todo> {
        self.guard(ENTITY_TODO, |set| {
            set.todos.remove(&id).ok_or(IntegrityError::NotFound {
                entity: ENTITY_TODO,
                id,
            })
        })
    }

    /// Removes a user that no child, job or application references.
    pub fn remove_user(&mut self, id: RecordId) -> IntegrityResult<User> {
        self.guard(ENTITY_USER, |set| {
            if !set.users.contains_key(&id) {
                return Err(IntegrityError::NotFound {
                    entity: ENTITY_USER,
                    id,
                });
            }
            refuse_if_referenced(ENTITY_USER, id, ENTITY_USER, set.children_of(id).len())?;
            refuse_if_referenced(ENTITY_USER, id, ENTITY_JOB, set.jobs_posted_by(id).len())?;
            refuse_if_referenced(
                ENTITY_USER,
                id,
                ENTITY_APPLICATION,
                set.applications_by_user(id).len(),
            )?;
            set.users.remove(&id).ok_or(IntegrityError::NotFound {
                entity: ENTITY_USER,
                id,
            })
        })
    }

    /// Removes a job that no application references.
    pub fn remove_job(&mut self, id: RecordId) -> IntegrityResult<Job> {
        self.guard(ENTITY_JOB, |set| {
            if !set.jobs.contains_key(&id) {
                return Err(IntegrityError::NotFound {
                    entity: ENTITY_JOB,
                    id,
                });
            }
            refuse_if_referenced(
                ENTITY_JOB,
                id,
                ENTITY_APPLICATION,
                set.applications_for_job(id).len(),
            )?;
            set.jobs.remove(&id).ok_or(IntegrityError::NotFound {
                entity: ENTITY_JOB,
                id,
            })
        })
    }

    pub fn remove_application(&mut self, id: RecordId) -> IntegrityResult<Application> {
        self.guard(ENTITY_APPLICATION, |set| {
            set.applications
                .remove(&id)
                .ok_or(IntegrityError::NotFound {
                    entity: ENTITY_APPLICATION,
                    id,
                })
        })
    }

    pub fn todo(&self, id: RecordId) -> Option<&Todo> {
        self.todos.get(&id)
    }

    pub fn user(&self, id: RecordId) -> Option<&User> {
        self.users.get(&id)
    }

    pub fn job(&self, id: RecordId) -> Option<&Job> {
        self.jobs.get(&id)
    }

    pub fn application(&self, id: RecordId) -> Option<&Application> {
        self.applications.get(&id)
    }

    /// Students linked to `parent_id`.
    pub fn children_of(&self, parent_id: RecordId) -> Vec<&User> {
        self.users
            .values()
            .filter(|user| user.parent_id == Some(parent_id))
            .collect()
    }

    pub fn jobs_posted_by(&self, user_id: RecordId) -> Vec<&Job> {
        self.jobs
            .values()
            .filter(|job| job.posted_by_id == user_id)
            .collect()
    }

    pub fn applications_for_job(&self, job_id: RecordId) -> Vec<&Application> {
        self.applications
            .values()
            .filter(|application| application.job_id == job_id)
            .collect()
    }

    pub fn applications_by_user(&self, user_id: RecordId) -> Vec<&Application> {
        self.applications
            .values()
            .filter(|application| application.user_id == user_id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.todos.len() + self.users.len() + self.jobs.len() + self.applications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn guard<T>(
        &mut self,
        entity: &'static str,
        op: impl FnOnce(&mut Self) -> IntegrityResult<T>,
    ) -> IntegrityResult<T> {
        let result = op(self);
        if let Err(err) = &result {
            log_rejection(entity, err);
        }
        result
    }

    fn validate_all(&self) -> IntegrityResult<()> {
        for todo in self.todos.values() {
            todo.validate()?;
        }
        for user in self.users.values() {
            user.validate()?;
            self.check_user_refs(user)?;
        }
        for job in self.jobs.values() {
            job.validate()?;
            self.check_job_refs(job)?;
        }
        for application in self.applications.values() {
            application.validate()?;
            self.check_application_refs(application)?;
        }
        Ok(())
    }

    fn check_user_refs(&self, user: &User) -> IntegrityResult<()> {
        let Some(parent_id) = user.parent_id else {
            return Ok(());
        };
        if user.role != Role::Student {
            return Err(IntegrityError::UnexpectedParent {
                user: user.id,
                role: user.role,
            });
        }
        self.require_user_with_role(USER_PARENT_KEY, parent_id, Role::Parent)
    }

    fn check_job_refs(&self, job: &Job) -> IntegrityResult<()> {
        self.require_user_with_role(JOB_POSTED_BY_KEY, job.posted_by_id, Role::Employer)
    }

    fn check_application_refs(&self, application: &Application) -> IntegrityResult<()> {
        if !self.jobs.contains_key(&application.job_id) {
            return Err(IntegrityError::MissingReference {
                entity: ENTITY_JOB,
                field: APPLICATION_JOB_KEY,
                id: application.job_id,
            });
        }
        if !self.users.contains_key(&application.user_id) {
            return Err(IntegrityError::MissingReference {
                entity: ENTITY_USER,
                field: APPLICATION_USER_KEY,
                id: application.user_id,
            });
        }
        Ok(())
    }

    fn require_user_with_role(
        &self,
        field: &'static str,
        id: RecordId,
        expected: Role,
    ) -> IntegrityResult<()> {
        let Some(user) = self.users.get(&id) else {
            return Err(IntegrityError::MissingReference {
                entity: ENTITY_USER,
                field,
                id,
            });
        };
        if user.role != expected {
            return Err(IntegrityError::RoleMismatch {
                field,
                id,
                expected,
                actual: user.role,
            });
        }
        Ok(())
    }
}

fn insert_unique<T>(
    records: &mut BTreeMap<RecordId, T>,
    entity: &'static str,
    id: RecordId,
    record: T,
) -> IntegrityResult<RecordId> {
    if records.contains_key(&id) {
        return Err(IntegrityError::DuplicateId { entity, id });
    }
    records.insert(id, record);
    Ok(id)
}

fn refuse_if_referenced(
    entity: &'static str,
    id: RecordId,
    by: &'static str,
    count: usize,
) -> IntegrityResult<()> {
    if count > 0 {
        return Err(IntegrityError::Referenced {
            entity,
            id,
            by,
            count,
        });
    }
    Ok(())
}

fn log_rejection(scope: &str, err: &IntegrityError) {
    warn!(
        "event=integrity_check module=record status=rejected scope={} error_code={} error={}",
        scope,
        err.code(),
        err
    );
}

#[cfg(test)]
mod tests {
    use super::{IntegrityError, RecordSet};
    use crate::record::types::{Role, User};

    #[test]
    fn duplicate_user_id_is_rejected() {
        let mut set = RecordSet::new();
        let parent = User::try_new("pat", "pat@example.com", "PARENT").expect("parent");
        set.insert_user(parent.clone()).expect("first insert");

        let err = set.insert_user(parent.clone()).expect_err("duplicate must fail");
        assert_eq!(
            err,
            IntegrityError::DuplicateId {
                entity: "User",
                id: parent.id,
            }
        );
        assert_eq!(err.code(), "duplicate_id");
    }

    #[test]
    fn employer_with_parent_is_rejected() {
        let mut set = RecordSet::new();
        let parent = User::try_new("pat", "pat@example.com", "PARENT").expect("parent");
        let parent_id = set.insert_user(parent).expect("parent insert");

        let employer = User::try_new("acme", "hr@acme.test", "EMPLOYER")
            .expect("employer")
            .with_parent(parent_id);
        let err = set.insert_user(employer.clone()).expect_err("must fail");
        assert_eq!(
            err,
            IntegrityError::UnexpectedParent {
                user: employer.id,
                role: Role::Employer,
            }
        );
        assert_eq!(set.len(), 1);
    }
}
