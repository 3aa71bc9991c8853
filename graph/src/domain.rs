//! Domain model elements: entities, attributes, associations and access rules.

use crate::text::Text;
use serde::{Deserialize, Serialize};
use weft_core::{
    AccessRuleId, AssociationId, AssociationOwner, AssociationType, AttributeId, DeletingBehavior,
    EntityId, EnumerationId, MemberAccessRights, MemberRef, ModuleRoleId, QualifiedName,
};

/// Expression that evaluates to the current timestamp when an object is created.
pub const CURRENT_DATE_TIME: &str = "[%CurrentDateTime%]";

/// Position of an entity on the domain model canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub x: i32,
    pub y: i32,
}

/// Persistence and audit flags of an entity without a parent entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoGeneralization {
    pub persistable: bool,
    pub has_owner: bool,
    pub has_created_date: bool,
    pub has_changed_by: bool,
    pub has_changed_date: bool,
}

impl NoGeneralization {
    pub fn new(persistable: bool) -> Self {
        Self {
            persistable,
            has_owner: false,
            has_created_date: false,
            has_changed_by: false,
            has_changed_date: false,
        }
    }
}

impl Default for NoGeneralization {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Inheritance root of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Generalization {
    /// The entity has no parent; carries its own persistence flags.
    NoGeneralization(NoGeneralization),
    /// The entity specializes another entity; flags are inherited.
    Generalized(QualifiedName),
}

impl Generalization {
    pub fn none(persistable: bool) -> Self {
        Generalization::NoGeneralization(NoGeneralization::new(persistable))
    }

    pub fn flags(&self) -> Option<&NoGeneralization> {
        match self {
            Generalization::NoGeneralization(flags) => Some(flags),
            Generalization::Generalized(_) => None,
        }
    }

    pub fn flags_mut(&mut self) -> Option<&mut NoGeneralization> {
        match self {
            Generalization::NoGeneralization(flags) => Some(flags),
            Generalization::Generalized(_) => None,
        }
    }
}

/// The type of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeType {
    AutoNumber,
    Binary,
    Boolean,
    DateTime { localize_date: bool },
    Decimal,
    Enumeration { enumeration: EnumerationId },
    HashedString,
    Integer,
    Long,
    String { length: u32 },
}

impl AttributeType {
    pub fn is_auto_number(&self) -> bool {
        matches!(self, AttributeType::AutoNumber)
    }

    /// Short name of the type, as shown in the modeler.
    pub fn type_name(&self) -> &'static str {
        match self {
            AttributeType::AutoNumber => "AutoNumber",
            AttributeType::Binary => "Binary",
            AttributeType::Boolean => "Boolean",
            AttributeType::DateTime { .. } => "DateTime",
            AttributeType::Decimal => "Decimal",
            AttributeType::Enumeration { .. } => "Enumeration",
            AttributeType::HashedString => "HashedString",
            AttributeType::Integer => "Integer",
            AttributeType::Long => "Long",
            AttributeType::String { .. } => "String",
        }
    }
}

/// A stored attribute value with its default expression.
///
/// An empty default means "no default".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredValue {
    pub default_value: String,
}

impl StoredValue {
    pub fn new(default_value: impl Into<String>) -> Self {
        Self {
            default_value: default_value.into(),
        }
    }

    pub fn has_default(&self) -> bool {
        !self.default_value.is_empty()
    }
}

/// A typed field on an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub id: AttributeId,
    pub name: String,
    pub documentation: String,
    pub attr_type: AttributeType,
    pub value: StoredValue,
}

/// Access rights for one member within an access rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberAccess {
    pub member: MemberRef,
    pub access_rights: MemberAccessRights,
}

/// A per-entity policy granted to a set of module roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRule {
    pub id: AccessRuleId,
    pub module_roles: Vec<ModuleRoleId>,
    pub default_member_access_rights: MemberAccessRights,
    pub allow_create: bool,
    pub allow_delete: bool,
    pub member_accesses: Vec<MemberAccess>,
}

impl AccessRule {
    pub fn new(id: AccessRuleId) -> Self {
        Self {
            id,
            module_roles: Vec::new(),
            default_member_access_rights: MemberAccessRights::None,
            allow_create: false,
            allow_delete: false,
            member_accesses: Vec::new(),
        }
    }

    /// Grant the rule to a module role; granting twice has no effect.
    pub fn grant(&mut self, role: ModuleRoleId) {
        if !self.module_roles.contains(&role) {
            self.module_roles.push(role);
        }
    }

    pub fn member_access(&self, member: MemberRef) -> Option<&MemberAccess> {
        self.member_accesses.iter().find(|ma| ma.member == member)
    }

    /// Set the rights for a member, creating its entry on first use.
    ///
    /// There is never more than one entry per member.
    pub fn upsert_member_access(&mut self, member: MemberRef, rights: MemberAccessRights) {
        match self
            .member_accesses
            .iter_mut()
            .find(|ma| ma.member == member)
        {
            Some(existing) => existing.access_rights = rights,
            None => self.member_accesses.push(MemberAccess {
                member,
                access_rights: rights,
            }),
        }
    }

    /// Drop the entry for a member. Returns true if one was removed.
    pub fn remove_member_access(&mut self, member: MemberRef) -> bool {
        let before = self.member_accesses.len();
        self.member_accesses.retain(|ma| ma.member != member);
        self.member_accesses.len() != before
    }
}

/// A data-record type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    pub documentation: String,
    pub location: Location,
    pub generalization: Generalization,
    pub attributes: Vec<Attribute>,
    pub access_rules: Vec<AccessRule>,
}

impl Entity {
    pub fn new(id: EntityId, name: impl Into<String>, generalization: Generalization) -> Self {
        Self {
            id,
            name: name.into(),
            documentation: String::new(),
            location: Location::default(),
            generalization,
            attributes: Vec::new(),
            access_rules: Vec::new(),
        }
    }

    pub fn attribute(&self, id: AttributeId) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.id == id)
    }

    pub fn attribute_by_name(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn access_rule(&self, id: AccessRuleId) -> Option<&AccessRule> {
        self.access_rules.iter().find(|r| r.id == id)
    }

    pub fn access_rule_mut(&mut self, id: AccessRuleId) -> Option<&mut AccessRule> {
        self.access_rules.iter_mut().find(|r| r.id == id)
    }
}

/// Whether an association stays inside one domain model or crosses modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssociationKind {
    Association,
    CrossAssociation,
}

/// Delete behavior of both sides of an association.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteBehavior {
    pub parent_delete_behavior: DeletingBehavior,
    pub child_delete_behavior: DeletingBehavior,
    pub parent_error_message: Option<Text>,
    pub child_error_message: Option<Text>,
}

/// A directed, typed relationship from a parent entity to a child entity.
///
/// Associations live in the domain model of their parent entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Association {
    pub id: AssociationId,
    pub kind: AssociationKind,
    pub name: String,
    pub documentation: String,
    pub parent: EntityId,
    pub child: EntityId,
    pub association_type: AssociationType,
    pub owner: AssociationOwner,
    pub delete_behavior: DeleteBehavior,
}

impl Association {
    pub fn new(
        id: AssociationId,
        kind: AssociationKind,
        name: impl Into<String>,
        parent: EntityId,
        child: EntityId,
    ) -> Self {
        Self {
            id,
            kind,
            name: name.into(),
            documentation: String::new(),
            parent,
            child,
            association_type: AssociationType::default(),
            owner: AssociationOwner::default(),
            delete_behavior: DeleteBehavior::default(),
        }
    }

    pub fn is_cross_module(&self) -> bool {
        self.kind == AssociationKind::CrossAssociation
    }
}

/// The entities and associations owned by one module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainModel {
    pub documentation: String,
    pub entities: Vec<Entity>,
    pub associations: Vec<Association>,
}

impl DomainModel {
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    pub fn entity_by_name(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.name == name)
    }

    pub fn association(&self, id: AssociationId) -> Option<&Association> {
        self.associations.iter().find(|a| a.id == id)
    }

    pub fn association_mut(&mut self, id: AssociationId) -> Option<&mut Association> {
        self.associations.iter_mut().find(|a| a.id == id)
    }

    /// Find an association (in-module or cross-module) by name.
    pub fn association_by_name(&self, name: &str) -> Option<&Association> {
        self.associations.iter().find(|a| a.name == name)
    }

    /// Associations whose parent is the given entity.
    pub fn associations_from(&self, parent: EntityId) -> impl Iterator<Item = &Association> + '_ {
        self.associations.iter().filter(move |a| a.parent == parent)
    }

    pub fn in_module_associations(&self) -> impl Iterator<Item = &Association> + '_ {
        self.associations.iter().filter(|a| !a.is_cross_module())
    }

    pub fn cross_associations(&self) -> impl Iterator<Item = &Association> + '_ {
        self.associations.iter().filter(|a| a.is_cross_module())
    }

    /// Remove every association touching one of `entities`, together with
    /// the member-access entries that referenced them. Returns the removed ids.
    pub fn prune_associations_touching(
        &mut self,
        entities: &std::collections::HashSet<EntityId>,
    ) -> Vec<AssociationId> {
        let removed: Vec<AssociationId> = self
            .associations
            .iter()
            .filter(|a| entities.contains(&a.parent) || entities.contains(&a.child))
            .map(|a| a.id)
            .collect();
        if removed.is_empty() {
            return removed;
        }

        self.associations.retain(|a| !removed.contains(&a.id));
        for entity in &mut self.entities {
            for rule in &mut entity.access_rules {
                for id in &removed {
                    rule.remove_member_access(MemberRef::Association(*id));
                }
            }
        }
        removed
    }
}
