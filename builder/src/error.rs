//! Builder error types.

use thiserror::Error;
use weft_core::{EntityId, EnumerationId, EnumerationValueId, MemberRef};
use weft_graph::StoreError;

/// Result type for builder operations.
pub type BuildResult<T> = Result<T, BuildError>;

/// Errors that can occur while building a schema.
///
/// Lookups that find nothing are not errors; they return `None`.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Only raised when `strict_user_roles` is enabled.
    #[error("Unknown user role: {name}")]
    UnknownUserRole { name: String },

    #[error("Member {member} does not belong to entity {entity}")]
    MemberNotOnEntity { entity: EntityId, member: MemberRef },

    #[error("Enumeration value {value} not found in enumeration {enumeration}")]
    UnknownEnumerationValue {
        enumeration: EnumerationId,
        value: EnumerationValueId,
    },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

impl BuildError {
    pub fn unknown_user_role(name: impl Into<String>) -> Self {
        Self::UnknownUserRole { name: name.into() }
    }

    pub fn member_not_on_entity(entity: EntityId, member: impl Into<MemberRef>) -> Self {
        Self::MemberNotOnEntity {
            entity,
            member: member.into(),
        }
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}
