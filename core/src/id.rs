//! Identity types for model elements.
//!
//! All identifiers are 64-bit values that are:
//! - Allocated by the model store, never by callers
//! - Unique across the whole project, regardless of element kind
//! - Immutable once assigned

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! element_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Create an identifier from a raw value.
            pub fn new(id: u64) -> Self {
                Self(id)
            }

            /// Get the raw value.
            pub fn raw(&self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

element_id!(
    /// Identifier of a module.
    ModuleId,
    "mod"
);
element_id!(
    /// Identifier of an entity inside a domain model.
    EntityId,
    "ent"
);
element_id!(
    /// Identifier of an attribute on an entity.
    AttributeId,
    "attr"
);
element_id!(
    /// Identifier of an association (in-module or cross-module).
    AssociationId,
    "assoc"
);
element_id!(
    /// Identifier of an access rule on an entity.
    AccessRuleId,
    "rule"
);
element_id!(
    /// Identifier of a module role.
    ModuleRoleId,
    "mr"
);
element_id!(
    /// Identifier of a project-scoped user role.
    UserRoleId,
    "ur"
);
element_id!(
    /// Identifier of an enumeration.
    EnumerationId,
    "enum"
);
element_id!(
    /// Identifier of a value within an enumeration.
    EnumerationValueId,
    "ev"
);

/// The member an access entry governs: exactly one attribute or one association.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberRef {
    Attribute(AttributeId),
    Association(AssociationId),
}

impl MemberRef {
    /// Returns true if this references an attribute.
    pub fn is_attribute(&self) -> bool {
        matches!(self, MemberRef::Attribute(_))
    }

    /// Returns true if this references an association.
    pub fn is_association(&self) -> bool {
        matches!(self, MemberRef::Association(_))
    }

    pub fn as_attribute(&self) -> Option<AttributeId> {
        match self {
            MemberRef::Attribute(id) => Some(*id),
            MemberRef::Association(_) => None,
        }
    }

    pub fn as_association(&self) -> Option<AssociationId> {
        match self {
            MemberRef::Attribute(_) => None,
            MemberRef::Association(id) => Some(*id),
        }
    }
}

impl From<AttributeId> for MemberRef {
    fn from(id: AttributeId) -> Self {
        MemberRef::Attribute(id)
    }
}

impl From<AssociationId> for MemberRef {
    fn from(id: AssociationId) -> Self {
        MemberRef::Association(id)
    }
}

impl fmt::Display for MemberRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberRef::Attribute(id) => write!(f, "{}", id),
            MemberRef::Association(id) => write!(f, "{}", id),
        }
    }
}
