//! Entity lifecycle and generalization flags.

use tracing::debug;
use weft_core::{AttributeId, EntityId, ModuleId, NameSanitizer};
use weft_graph::{Generalization, Location, Model, NoGeneralization, StoreError};

use crate::error::BuildResult;

/// Find an entity of a module by name.
pub fn get_entity(
    model: &mut Model,
    sanitizer: &NameSanitizer,
    module: ModuleId,
    name: &str,
) -> BuildResult<Option<EntityId>> {
    let name = sanitizer.clean(name);
    Ok(model
        .load_domain_model(module)?
        .entity_by_name(&name)
        .map(|e| e.id))
}

/// Return the entity with this name, creating a persistable or
/// non-persistable entity without generalization if there is none.
pub fn get_or_create_entity(
    model: &mut Model,
    sanitizer: &NameSanitizer,
    module: ModuleId,
    name: &str,
    documentation: &str,
    persistable: bool,
) -> BuildResult<EntityId> {
    if let Some(existing) = get_entity(model, sanitizer, module, name)? {
        return Ok(existing);
    }
    let id = model.create_entity(
        module,
        sanitizer.clean(name),
        documentation,
        Generalization::none(persistable),
    )?;
    Ok(id)
}

/// Apply `update` to the entity's own flags. Generalized entities inherit
/// their flags, so they are left unchanged.
fn update_flags(
    model: &mut Model,
    entity: EntityId,
    update: impl FnOnce(&mut NoGeneralization),
) -> BuildResult<()> {
    match model.entity_mut(entity)?.generalization.flags_mut() {
        Some(flags) => update(flags),
        None => debug!(entity = %entity, "entity is generalized; flag not set"),
    }
    Ok(())
}

pub fn set_has_owner(model: &mut Model, entity: EntityId, value: bool) -> BuildResult<()> {
    update_flags(model, entity, |flags| flags.has_owner = value)
}

pub fn set_has_created_date(model: &mut Model, entity: EntityId, value: bool) -> BuildResult<()> {
    update_flags(model, entity, |flags| flags.has_created_date = value)
}

pub fn set_has_changed_by(model: &mut Model, entity: EntityId, value: bool) -> BuildResult<()> {
    update_flags(model, entity, |flags| flags.has_changed_by = value)
}

pub fn set_has_changed_date(model: &mut Model, entity: EntityId, value: bool) -> BuildResult<()> {
    update_flags(model, entity, |flags| flags.has_changed_date = value)
}

/// Position an entity on the domain model canvas.
pub fn set_location(model: &mut Model, entity: EntityId, x: i32, y: i32) -> BuildResult<()> {
    model.entity_mut(entity)?.location = Location { x, y };
    Ok(())
}

/// Find an attribute of an entity by name.
pub fn get_attribute(
    model: &Model,
    sanitizer: &NameSanitizer,
    entity: EntityId,
    name: &str,
) -> BuildResult<Option<AttributeId>> {
    let name = sanitizer.clean(name);
    let target = model
        .entity(entity)
        .ok_or(StoreError::EntityNotFound(entity))?;
    Ok(target.attribute_by_name(&name).map(|a| a.id))
}
