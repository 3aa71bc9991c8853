//! Store error types.

use crate::unit::UnitKey;
use thiserror::Error;
use weft_core::{AccessRuleId, AssociationId, EntityId, EnumerationId, ModuleId};

/// Errors raised by the model store and its backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Module not found: {0}")]
    ModuleNotFound(ModuleId),

    #[error("Entity not found: {0}")]
    EntityNotFound(EntityId),

    #[error("Association not found: {0}")]
    AssociationNotFound(AssociationId),

    #[error("Access rule not found: {rule} on entity {entity}")]
    AccessRuleNotFound { entity: EntityId, rule: AccessRuleId },

    #[error("Enumeration not found: {0}")]
    EnumerationNotFound(EnumerationId),

    #[error("Navigation profile not found at index {0}")]
    ProfileNotFound(usize),

    /// The backend has no content for a unit the index promised.
    #[error("Unit missing from backend: {0}")]
    UnitMissing(UnitKey),

    #[error("Unit {key} has kind {actual}, expected {expected}")]
    UnitKindMismatch {
        key: UnitKey,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Backend error: {message}")]
    Backend { message: String },
}

impl StoreError {
    pub fn access_rule_not_found(entity: EntityId, rule: AccessRuleId) -> Self {
        Self::AccessRuleNotFound { entity, rule }
    }

    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
