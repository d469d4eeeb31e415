//! Typed field declarations.

use serde::{Deserialize, Serialize};

/// Name of the primary key field every entity exposes.
pub const ID_FIELD: &str = "id";
/// Managed creation timestamp added to every entity.
pub const CREATED_AT_FIELD: &str = "createdAt";
/// Managed update timestamp added to every entity.
pub const UPDATED_AT_FIELD: &str = "updatedAt";

/// Scalar type of one declared field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Boolean,
    /// Record identifier, also used for foreign keys.
    Id,
    /// Timestamp stored as epoch milliseconds by the record layer.
    Datetime,
}

/// One declared field of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    /// Serialized as `type` to match generator naming.
    #[serde(rename = "type")]
    pub kind: FieldType,
    pub required: bool,
    /// Set for fields the platform adds on its own (`id`, timestamps).
    #[serde(default)]
    pub implicit: bool,
}

impl FieldDef {
    /// Creates an optional field.
    pub fn new(name: impl Into<String>, kind: FieldType) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
            implicit: false,
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::String)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Boolean)
    }

    pub fn id(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Id)
    }

    pub fn datetime(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Datetime)
    }

    /// Marks this field as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub(crate) fn implicit(name: &str, kind: FieldType) -> Self {
        Self {
            name: name.to_string(),
            kind,
            required: true,
            implicit: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldDef, FieldType};

    #[test]
    fn constructors_default_to_optional() {
        let field = FieldDef::string("location");
        assert_eq!(field.kind, FieldType::String);
        assert!(!field.required);
        assert!(!field.implicit);
        assert!(FieldDef::id("postedByID").required().required);
    }
}
