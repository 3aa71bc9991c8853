//! Enumerations, their values and the language settings captions depend on.

use tracing::{debug, info};
use weft_core::{EnumerationId, EnumerationValueId, ModuleId, NameSanitizer, QualifiedName};
use weft_graph::{LanguageSettings, Model, StoreError, Text};

use crate::config::BuilderConfig;
use crate::error::BuildResult;

/// Find an enumeration of a module by name, loading it.
pub fn get_enumeration(
    model: &mut Model,
    sanitizer: &NameSanitizer,
    module: ModuleId,
    name: &str,
) -> BuildResult<Option<EnumerationId>> {
    let module_name = model
        .module_name(module)
        .ok_or(StoreError::ModuleNotFound(module))?;
    let qualified = QualifiedName::new(module_name, sanitizer.clean(name));
    match model.find_enumeration_by_qualified_name(&qualified) {
        Some(id) => {
            model.load_enumeration(id)?;
            Ok(Some(id))
        }
        None => Ok(None),
    }
}

pub fn get_or_create_enumeration(
    model: &mut Model,
    sanitizer: &NameSanitizer,
    module: ModuleId,
    name: &str,
) -> BuildResult<EnumerationId> {
    if let Some(existing) = get_enumeration(model, sanitizer, module, name)? {
        return Ok(existing);
    }
    Ok(model.create_enumeration(module, sanitizer.clean(name))?)
}

/// Append a value with a caption in the project's default language.
///
/// Values keep creation order. A value whose sanitized key already exists is
/// returned without changing its caption.
pub fn create_enumeration_value(
    model: &mut Model,
    sanitizer: &NameSanitizer,
    config: &BuilderConfig,
    enumeration: EnumerationId,
    key: &str,
    caption: &str,
) -> BuildResult<EnumerationValueId> {
    if let Some(existing) = get_enumeration_value(model, sanitizer, enumeration, key)? {
        debug!(enumeration = %enumeration, value = %existing, "enumeration value exists");
        return Ok(existing);
    }

    let language = get_or_create_language_settings(model, config)?.default_language_code;
    let id = model.create_enumeration_value(
        enumeration,
        sanitizer.clean(key),
        Text::single(language, caption),
    )?;
    Ok(id)
}

/// Find a value of an enumeration by sanitized key.
pub fn get_enumeration_value(
    model: &mut Model,
    sanitizer: &NameSanitizer,
    enumeration: EnumerationId,
    key: &str,
) -> BuildResult<Option<EnumerationValueId>> {
    let key = sanitizer.clean(key);
    Ok(model
        .load_enumeration(enumeration)?
        .value_by_name(&key)
        .map(|v| v.id))
}

/// The project language settings, created with the fallback language if absent.
pub fn get_or_create_language_settings(
    model: &mut Model,
    config: &BuilderConfig,
) -> BuildResult<LanguageSettings> {
    if let Some(existing) = model.project_settings()?.language.clone() {
        return Ok(existing);
    }

    let settings = LanguageSettings::new(config.fallback_language_code.as_str());
    model.project_settings_mut()?.language = Some(settings.clone());
    info!(language = %settings.default_language_code, "created language settings");
    Ok(settings)
}
