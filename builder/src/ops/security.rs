//! Project security level and role bindings.

use tracing::{debug, warn};
use weft_core::{ModuleId, ModuleRoleId, NameSanitizer, SecurityLevel, UserRoleId};
use weft_graph::{Model, NavigationProfile, ProjectSecurity};

use crate::config::BuilderConfig;
use crate::error::{BuildError, BuildResult};

/// Check everything in production, nothing otherwise.
pub fn set_security(model: &mut Model, production: bool) -> BuildResult<()> {
    let level = SecurityLevel::for_production(production);
    model.project_security_mut()?.security_level = level;
    debug!(?level, "set security level");
    Ok(())
}

pub fn get_project_security(model: &mut Model) -> BuildResult<&ProjectSecurity> {
    Ok(model.project_security()?)
}

pub fn get_navigation_profiles(model: &mut Model) -> BuildResult<&[NavigationProfile]> {
    Ok(model.navigation()?.profiles.as_slice())
}

pub fn get_module_role(
    model: &mut Model,
    sanitizer: &NameSanitizer,
    module: ModuleId,
    name: &str,
) -> BuildResult<Option<ModuleRoleId>> {
    let name = sanitizer.clean(name);
    Ok(model
        .load_module_security(module)?
        .role_by_name(&name)
        .map(|r| r.id))
}

/// Create a module role and bind it into the user role named `user_role`.
///
/// The user role is matched by its exact name. When no such user role exists
/// the binding is skipped with a warning, or rejected before anything is
/// created if `strict_user_roles` is set. An existing module role of the same
/// name is reused.
pub fn create_module_role(
    model: &mut Model,
    sanitizer: &NameSanitizer,
    config: &BuilderConfig,
    module: ModuleId,
    name: &str,
    user_role: &str,
) -> BuildResult<ModuleRoleId> {
    let user_role_exists = model
        .project_security()?
        .user_role_by_name(user_role)
        .is_some();
    if !user_role_exists && config.strict_user_roles {
        return Err(BuildError::unknown_user_role(user_role));
    }

    let role = match get_module_role(model, sanitizer, module, name)? {
        Some(existing) => existing,
        None => model.create_module_role(module, sanitizer.clean(name))?,
    };

    if user_role_exists {
        if let Some(target) = model
            .project_security_mut()?
            .user_role_by_name_mut(user_role)
        {
            target.add_module_role(role);
        }
    } else {
        warn!(
            module = %module,
            role = %role,
            user_role = %user_role,
            "user role not found; module role left unbound"
        );
    }
    Ok(role)
}

pub fn get_or_create_user_role(
    model: &mut Model,
    sanitizer: &NameSanitizer,
    name: &str,
) -> BuildResult<UserRoleId> {
    let name = sanitizer.clean(name);
    if let Some(existing) = model.project_security()?.user_role_by_name(&name) {
        return Ok(existing.id);
    }
    Ok(model.create_user_role(name)?)
}
