//! Typed job board records.
//!
//! # Invariants
//! - `role` and `status` only hold their closed enumeration values.
//! - Required string fields are never blank.
//! - Record ids are never nil.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Stable record identifier.
pub type RecordId = Uuid;

/// Account role of a `User`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Student,
    Parent,
    Employer,
}

impl Role {
    pub const ALL: [Role; 3] = [Self::Student, Self::Parent, Self::Employer];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Student => "STUDENT",
            Self::Parent => "PARENT",
            Self::Employer => "EMPLOYER",
        }
    }
}

impl FromStr for Role {
    type Err = InvalidEnumValueError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == value)
            .ok_or_else(|| InvalidEnumValueError::new("Role", value))
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Review state of an `Application`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    Pending,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 3] = [Self::Pending, Self::Accepted, Self::Rejected];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Accepted => "ACCEPTED",
            Self::Rejected => "REJECTED",
        }
    }
}

impl FromStr for ApplicationStatus {
    type Err = InvalidEnumValueError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| InvalidEnumValueError::new("ApplicationStatus", value))
    }
}

impl Display for ApplicationStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value outside a closed enumeration.
///
/// Matching is exact: `student` is not `STUDENT`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidEnumValueError {
    pub enum_name: &'static str,
    pub value: String,
}

impl InvalidEnumValueError {
    fn new(enum_name: &'static str, value: &str) -> Self {
        Self {
            enum_name,
            value: value.to_string(),
        }
    }
}

impl Display for InvalidEnumValueError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid {} value: {}", self.enum_name, self.value)
    }
}

impl Error for InvalidEnumValueError {}

/// Record-level validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordValidationError {
    InvalidEnumValue(InvalidEnumValueError),
    BlankField(&'static str),
    NilId(&'static str),
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidEnumValue(err) => write!(f, "{err}"),
            Self::BlankField(field) => write!(f, "required field `{field}` must not be blank"),
            Self::NilId(field) => write!(f, "id field `{field}` must not be nil"),
        }
    }
}

impl Error for RecordValidationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidEnumValue(err) => Some(err),
            _ => None,
        }
    }
}

impl From<InvalidEnumValueError> for RecordValidationError {
    fn from(value: InvalidEnumValueError) -> Self {
        Self::InvalidEnumValue(value)
    }
}

fn require_text(value: &str, field: &'static str) -> Result<(), RecordValidationError> {
    if value.trim().is_empty() {
        return Err(RecordValidationError::BlankField(field));
    }
    Ok(())
}

fn require_id(value: RecordId, field: &'static str) -> Result<(), RecordValidationError> {
    if value.is_nil() {
        return Err(RecordValidationError::NilId(field));
    }
    Ok(())
}

/// Free-standing todo item. All fields except `id` are optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: RecordId,
    pub content: Option<String>,
    pub is_done: Option<bool>,
}

impl Todo {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: Some(content.into()),
            is_done: Some(false),
        }
    }

    pub fn validate(&self) -> Result<(), RecordValidationError> {
        require_id(self.id, "id")
    }
}

/// Account record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: RecordId,
    pub username: String,
    pub email: String,
    pub role: Role,
    /// Set only for students linked to a parent account.
    #[serde(rename = "parentID", default)]
    pub parent_id: Option<RecordId>,
}

impl User {
    /// Creates a user with a generated id, parsing `role` from its wire value.
    pub fn try_new(
        username: impl Into<String>,
        email: impl Into<String>,
        role: &str,
    ) -> Result<Self, RecordValidationError> {
        let user = Self {
            id: Uuid::new_v4(),
            username: username.into(),
            email: email.into(),
            role: role.parse()?,
            parent_id: None,
        };
        user.validate()?;
        Ok(user)
    }

    /// Links this user to a parent account.
    pub fn with_parent(mut self, parent_id: RecordId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn validate(&self) -> Result<(), RecordValidationError> {
        require_id(self.id, "id")?;
        require_text(&self.username, "username")?;
        require_text(&self.email, "email")?;
        if let Some(parent_id) = self.parent_id {
            require_id(parent_id, "parentID")?;
        }
        Ok(())
    }
}

/// Job posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: RecordId,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(rename = "postedByID")]
    pub posted_by_id: RecordId,
}

impl Job {
    pub fn try_new(
        title: impl Into<String>,
        description: impl Into<String>,
        posted_by_id: RecordId,
    ) -> Result<Self, RecordValidationError> {
        let job = Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: description.into(),
            location: None,
            posted_by_id,
        };
        job.validate()?;
        Ok(job)
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn validate(&self) -> Result<(), RecordValidationError> {
        require_id(self.id, "id")?;
        require_text(&self.title, "title")?;
        require_text(&self.description, "description")?;
        require_id(self.posted_by_id, "postedByID")
    }
}

/// One user's application to one job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: RecordId,
    #[serde(rename = "jobID")]
    pub job_id: RecordId,
    #[serde(rename = "userID")]
    pub user_id: RecordId,
    pub status: ApplicationStatus,
    /// Unix epoch milliseconds.
    pub applied_at: i64,
}

impl Application {
    /// Creates an application, parsing `status` from its wire value.
    pub fn try_new(
        job_id: RecordId,
        user_id: RecordId,
        status: &str,
        applied_at: i64,
    ) -> Result<Self, RecordValidationError> {
        let application = Self {
            id: Uuid::new_v4(),
            job_id,
            user_id,
            status: status.parse()?,
            applied_at,
        };
        application.validate()?;
        Ok(application)
    }

    pub fn validate(&self) -> Result<(), RecordValidationError> {
        require_id(self.id, "id")?;
        require_id(self.job_id, "jobID")?;
        require_id(self.user_id, "userID")
    }
}

#[cfg(test)]
mod tests {
    use super::{ApplicationStatus, InvalidEnumValueError, RecordValidationError, Role, User};

    #[test]
    fn parses_wire_values_exactly() {
        assert_eq!("EMPLOYER".parse::<Role>().expect("role"), Role::Employer);
        assert_eq!(
            "student".parse::<Role>().unwrap_err(),
            InvalidEnumValueError {
                enum_name: "Role",
                value: "student".to_string(),
            }
        );
        assert_eq!(
            "ACCEPTED".parse::<ApplicationStatus>().expect("status"),
            ApplicationStatus::Accepted
        );
    }

    #[test]
    fn display_matches_wire_value() {
        for role in Role::ALL {
            assert_eq!(role.to_string().parse::<Role>().expect("round"), role);
        }
        assert_eq!(ApplicationStatus::Pending.to_string(), "PENDING");
    }

    #[test]
    fn user_rejects_blank_email() {
        let err = User::try_new("ada", "  ", "PARENT").unwrap_err();
        assert_eq!(err, RecordValidationError::BlankField("email"));
    }
}
