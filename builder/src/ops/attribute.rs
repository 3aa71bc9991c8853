//! Typed attribute construction.

use tracing::debug;
use weft_core::{AttributeId, EntityId, EnumerationId, EnumerationValueId, MemberRef, NameSanitizer};
use weft_graph::{AttributeType, Model, StoreError, StoredValue, CURRENT_DATE_TIME};

use crate::error::{BuildError, BuildResult};
use crate::ops::access::propagate_member;

/// The type of a new attribute together with its encoded default value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSpec {
    pub attr_type: AttributeType,
    pub value: StoredValue,
}

impl AttributeSpec {
    pub fn new(attr_type: AttributeType, default_value: Option<String>) -> Self {
        Self {
            attr_type,
            value: StoredValue::new(default_value.unwrap_or_default()),
        }
    }

    pub fn auto_number(seed: i64) -> Self {
        Self::new(AttributeType::AutoNumber, Some(seed.to_string()))
    }

    pub fn binary() -> Self {
        Self::new(AttributeType::Binary, None)
    }

    pub fn boolean(default: bool) -> Self {
        Self::new(AttributeType::Boolean, Some(default.to_string()))
    }

    /// A date-time attribute, optionally defaulting to the creation timestamp.
    pub fn date_time(localize_date: bool, default_now: bool) -> Self {
        Self::new(
            AttributeType::DateTime { localize_date },
            default_now.then(|| CURRENT_DATE_TIME.to_string()),
        )
    }

    pub fn decimal(default: Option<f64>) -> Self {
        Self::new(AttributeType::Decimal, default.map(|v| v.to_string()))
    }

    /// An enumeration attribute; the default is the key of one of its values.
    pub fn enumeration(enumeration: EnumerationId, default_key: Option<&str>) -> Self {
        Self::new(
            AttributeType::Enumeration { enumeration },
            default_key.map(str::to_string),
        )
    }

    pub fn hashed_string(default: Option<&str>) -> Self {
        Self::new(AttributeType::HashedString, default.map(str::to_string))
    }

    pub fn integer(default: Option<i32>) -> Self {
        Self::new(AttributeType::Integer, default.map(|v| v.to_string()))
    }

    pub fn long(default: Option<i64>) -> Self {
        Self::new(AttributeType::Long, default.map(|v| v.to_string()))
    }

    pub fn string(length: u32, default: Option<&str>) -> Self {
        Self::new(AttributeType::String { length }, default.map(str::to_string))
    }
}

/// Add an attribute to an entity.
///
/// If the entity already has an attribute with the sanitized name, that
/// attribute is returned untouched. Otherwise the new attribute is added to
/// every access rule of the entity at the rule's default rights.
pub fn create_attribute(
    model: &mut Model,
    sanitizer: &NameSanitizer,
    entity: EntityId,
    name: &str,
    spec: AttributeSpec,
    documentation: &str,
) -> BuildResult<AttributeId> {
    let name = sanitizer.clean(name);
    let existing = model
        .entity(entity)
        .ok_or(StoreError::EntityNotFound(entity))?
        .attribute_by_name(&name)
        .map(|a| a.id);
    if let Some(id) = existing {
        debug!(entity = %entity, attribute = %id, "attribute exists");
        return Ok(id);
    }

    let auto_number = spec.attr_type.is_auto_number();
    let id = model.create_attribute(entity, name, documentation, spec.attr_type, spec.value)?;
    propagate_member(model, entity, MemberRef::Attribute(id), auto_number)?;
    Ok(id)
}

/// Add an enumeration attribute whose default is one of the enumeration's values.
pub fn create_enumeration_attribute(
    model: &mut Model,
    sanitizer: &NameSanitizer,
    entity: EntityId,
    name: &str,
    enumeration: EnumerationId,
    default: Option<EnumerationValueId>,
    documentation: &str,
) -> BuildResult<AttributeId> {
    let default_key = match default {
        Some(value) => Some(
            model
                .load_enumeration(enumeration)?
                .value(value)
                .map(|v| v.name.clone())
                .ok_or(BuildError::UnknownEnumerationValue { enumeration, value })?,
        ),
        None => None,
    };
    let spec = AttributeSpec::enumeration(enumeration, default_key.as_deref());
    create_attribute(model, sanitizer, entity, name, spec, documentation)
}
