//! Association construction.

use tracing::debug;
use weft_core::{
    AssociationId, AssociationOwner, AssociationType, DeletingBehavior, EntityId, MemberRef,
    ModuleId, NameSanitizer,
};
use weft_graph::{AssociationKind, Model, StoreError, Text};

use crate::error::BuildResult;
use crate::ops::access::propagate_member;

/// Shape of a new association.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssociationOptions {
    pub association_type: AssociationType,
    pub owner: AssociationOwner,
    pub child_delete_behavior: DeletingBehavior,
    pub parent_delete_behavior: DeletingBehavior,
    pub documentation: String,
}

impl AssociationOptions {
    pub fn new(association_type: AssociationType, owner: AssociationOwner) -> Self {
        Self {
            association_type,
            owner,
            ..Self::default()
        }
    }

    pub fn child_delete_behavior(mut self, behavior: DeletingBehavior) -> Self {
        self.child_delete_behavior = behavior;
        self
    }

    pub fn parent_delete_behavior(mut self, behavior: DeletingBehavior) -> Self {
        self.parent_delete_behavior = behavior;
        self
    }

    pub fn documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = documentation.into();
        self
    }
}

/// Create an association from `parent` to `child`.
///
/// Entities of the same module get an in-module association, entities of
/// different modules a cross-module one. A side that only deletes when
/// unreferenced gets an empty error message. The association is added to the
/// access rules of `parent`; rules of `child` are not touched.
///
/// An association with the same name in the parent's domain model is returned
/// as is.
pub fn create_association(
    model: &mut Model,
    sanitizer: &NameSanitizer,
    parent: EntityId,
    child: EntityId,
    name: &str,
    options: AssociationOptions,
) -> BuildResult<AssociationId> {
    let name = sanitizer.clean(name);
    let parent_module = model
        .owning_module(parent)
        .ok_or(StoreError::EntityNotFound(parent))?;
    let child_module = model
        .owning_module(child)
        .ok_or(StoreError::EntityNotFound(child))?;

    if let Some(existing) = model
        .domain_model(parent_module)
        .and_then(|dm| dm.association_by_name(&name))
    {
        debug!(association = %existing.id, name = %name, "association exists");
        return Ok(existing.id);
    }

    let kind = if parent_module == child_module {
        AssociationKind::Association
    } else {
        AssociationKind::CrossAssociation
    };
    let id = model.create_association(kind, name, parent, child)?;

    let association = model.association_mut(id)?;
    association.association_type = options.association_type;
    association.owner = options.owner;
    association.documentation = options.documentation;
    let behavior = &mut association.delete_behavior;
    behavior.parent_delete_behavior = options.parent_delete_behavior;
    behavior.child_delete_behavior = options.child_delete_behavior;
    if options.parent_delete_behavior.requires_error_message() {
        behavior.parent_error_message = Some(Text::new());
    }
    if options.child_delete_behavior.requires_error_message() {
        behavior.child_error_message = Some(Text::new());
    }

    propagate_member(model, parent, MemberRef::Association(id), false)?;
    Ok(id)
}

/// Find an association of a module by name, in-module or cross-module.
pub fn get_association(
    model: &mut Model,
    sanitizer: &NameSanitizer,
    module: ModuleId,
    name: &str,
) -> BuildResult<Option<AssociationId>> {
    let name = sanitizer.clean(name);
    let dm = model.load_domain_model(module)?;
    Ok(dm
        .in_module_associations()
        .chain(dm.cross_associations())
        .find(|a| a.name == name)
        .map(|a| a.id))
}
