//! Shared enumerations for domain models and security.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Access rights an access rule grants on a single member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MemberAccessRights {
    #[default]
    None,
    ReadOnly,
    ReadWrite,
}

impl MemberAccessRights {
    /// The rights an auto-number attribute may actually hold.
    ///
    /// Auto-number values are generated by the runtime, so write access is
    /// downgraded to read access.
    pub fn clamped_for_auto_number(self) -> Self {
        match self {
            MemberAccessRights::ReadWrite => MemberAccessRights::ReadOnly,
            other => other,
        }
    }
}

impl fmt::Display for MemberAccessRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MemberAccessRights::None => "None",
            MemberAccessRights::ReadOnly => "ReadOnly",
            MemberAccessRights::ReadWrite => "ReadWrite",
        };
        f.write_str(s)
    }
}

/// Multiplicity of an association.
///
/// Use `Reference` for 1:1 or 1:n associations and `ReferenceSet` for m:n.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AssociationType {
    #[default]
    Reference,
    ReferenceSet,
}

/// Which side(s) of an association store the reference.
///
/// Use `Both` for 1:1 or m:n associations and `Default` for 1:n or m:n.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AssociationOwner {
    #[default]
    Default,
    Both,
}

/// What happens to one side of an association when the object on that side is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DeletingBehavior {
    /// Delete the object and the objects it references.
    DeleteMeAndReferences,
    /// Delete the object, leave referenced objects alone.
    #[default]
    DeleteMeButKeepReferences,
    /// Only delete the object if it is not referenced; requires an error message.
    DeleteMeIfNoReferences,
}

impl DeletingBehavior {
    /// Returns true if this behavior needs an attached error-message text.
    pub fn requires_error_message(&self) -> bool {
        matches!(self, DeletingBehavior::DeleteMeIfNoReferences)
    }
}

/// Project-wide security level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SecurityLevel {
    #[default]
    CheckNothing,
    CheckFormsAndMicroflows,
    CheckEverything,
}

impl SecurityLevel {
    /// Strict checking for production, permissive checking otherwise.
    pub fn for_production(production: bool) -> Self {
        if production {
            SecurityLevel::CheckEverything
        } else {
            SecurityLevel::CheckNothing
        }
    }
}

/// Device profile of a navigation profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ProfileKind {
    #[default]
    Responsive,
    Tablet,
    Phone,
    NativePhone,
}
