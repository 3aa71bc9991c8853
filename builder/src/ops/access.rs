//! Access rules and their member accesses.

use tracing::debug;
use weft_core::{
    AccessRuleId, AssociationId, AttributeId, EntityId, MemberAccessRights, MemberRef,
    ModuleRoleId,
};
use weft_graph::{Model, StoreError};

use crate::error::{BuildError, BuildResult};

/// Settings of a new access rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccessRuleOptions {
    pub default_rights: MemberAccessRights,
    pub allow_create: bool,
    pub allow_delete: bool,
}

impl AccessRuleOptions {
    pub fn new(default_rights: MemberAccessRights) -> Self {
        Self {
            default_rights,
            ..Self::default()
        }
    }

    pub fn allow_create(mut self, allow: bool) -> Self {
        self.allow_create = allow;
        self
    }

    pub fn allow_delete(mut self, allow: bool) -> Self {
        self.allow_delete = allow;
        self
    }
}

/// Address of an access rule: rules are owned by their entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccessRuleRef {
    pub entity: EntityId,
    pub rule: AccessRuleId,
}

/// Create an access rule on `entity` granted to `roles`.
///
/// Every attribute of the entity and every association whose parent is the
/// entity gets a member access at `options.default_rights`. Members inherited
/// through a generalization are not included.
pub fn create_access_rule(
    model: &mut Model,
    entity: EntityId,
    roles: &[ModuleRoleId],
    options: AccessRuleOptions,
) -> BuildResult<AccessRuleRef> {
    let owner = model
        .owning_module(entity)
        .ok_or(StoreError::EntityNotFound(entity))?;
    let target = model
        .entity(entity)
        .ok_or(StoreError::EntityNotFound(entity))?;

    let mut members: Vec<(MemberRef, bool)> = target
        .attributes
        .iter()
        .map(|a| (MemberRef::Attribute(a.id), a.attr_type.is_auto_number()))
        .collect();
    if let Some(dm) = model.domain_model(owner) {
        members.extend(
            dm.associations_from(entity)
                .map(|a| (MemberRef::Association(a.id), false)),
        );
    }

    let rule = model.create_access_rule(entity)?;
    let access_rule = model.access_rule_mut(entity, rule)?;
    access_rule.default_member_access_rights = options.default_rights;
    access_rule.allow_create = options.allow_create;
    access_rule.allow_delete = options.allow_delete;
    for role in roles {
        access_rule.grant(*role);
    }
    for (member, auto_number) in &members {
        access_rule.upsert_member_access(*member, rights_for(options.default_rights, *auto_number));
    }

    debug!(
        entity = %entity,
        rule = %rule,
        roles = roles.len(),
        members = members.len(),
        "seeded access rule"
    );
    Ok(AccessRuleRef { entity, rule })
}

/// Set the rights a rule grants on one attribute of its entity.
pub fn set_attribute_access(
    model: &mut Model,
    rule: AccessRuleRef,
    attribute: AttributeId,
    rights: MemberAccessRights,
) -> BuildResult<()> {
    let auto_number = model
        .entity(rule.entity)
        .ok_or(StoreError::EntityNotFound(rule.entity))?
        .attribute(attribute)
        .map(|a| a.attr_type.is_auto_number())
        .ok_or_else(|| BuildError::member_not_on_entity(rule.entity, attribute))?;

    model
        .access_rule_mut(rule.entity, rule.rule)?
        .upsert_member_access(attribute.into(), rights_for(rights, auto_number));
    Ok(())
}

/// Set the rights a rule grants on an association whose parent is the rule's entity.
pub fn set_association_access(
    model: &mut Model,
    rule: AccessRuleRef,
    association: AssociationId,
    rights: MemberAccessRights,
) -> BuildResult<()> {
    let parent = model
        .association(association)
        .map(|a| a.parent)
        .ok_or(StoreError::AssociationNotFound(association))?;
    if parent != rule.entity {
        return Err(BuildError::member_not_on_entity(rule.entity, association));
    }

    model
        .access_rule_mut(rule.entity, rule.rule)?
        .upsert_member_access(association.into(), rights);
    Ok(())
}

/// Add a new member to every access rule of `entity` at each rule's own default rights.
pub(crate) fn propagate_member(
    model: &mut Model,
    entity: EntityId,
    member: MemberRef,
    auto_number: bool,
) -> BuildResult<usize> {
    let target = model.entity_mut(entity)?;
    for rule in &mut target.access_rules {
        let rights = rights_for(rule.default_member_access_rights, auto_number);
        rule.upsert_member_access(member, rights);
    }
    let rules = target.access_rules.len();
    if rules > 0 {
        debug!(entity = %entity, member = %member, rules, "propagated member access");
    }
    Ok(rules)
}

fn rights_for(rights: MemberAccessRights, auto_number: bool) -> MemberAccessRights {
    if auto_number {
        rights.clamped_for_auto_number()
    } else {
        rights
    }
}
