//! Module lifecycle, including cleanup after deletion.

use tracing::info;
use weft_core::{ModuleId, NameSanitizer, ProfileKind};
use weft_graph::{ClientAction, Model, ModuleDeletion, StoreError};

use crate::config::BuilderConfig;
use crate::error::BuildResult;

/// Everything `delete_module` changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleRemoval {
    pub deletion: ModuleDeletion,
    /// Module-role bindings removed from user roles.
    pub unbound_roles: usize,
    /// The responsive profile's home page was reset to the system home microflow.
    pub home_page_reset: bool,
    /// Top-level menu items whose page action was cleared.
    pub menu_items_cleared: usize,
}

/// Find a module by name, loading its domain model.
pub fn get_module(
    model: &mut Model,
    sanitizer: &NameSanitizer,
    name: &str,
) -> BuildResult<Option<ModuleId>> {
    let Some(id) = model.find_module_by_name(&sanitizer.clean(name)) else {
        return Ok(None);
    };
    model.load_domain_model(id)?;
    Ok(Some(id))
}

pub fn get_or_create_module(
    model: &mut Model,
    sanitizer: &NameSanitizer,
    name: &str,
) -> BuildResult<ModuleId> {
    if let Some(existing) = get_module(model, sanitizer, name)? {
        return Ok(existing);
    }
    Ok(model.create_module(sanitizer.clean(name)))
}

/// Delete a module and repair what referenced it.
///
/// User roles lose the module's roles before the module goes away. Afterwards
/// the first responsive navigation profile gets the system home microflow if
/// its home page was in the module, and its top-level menu items that showed
/// a page of the module get no action. Nested menu items are not visited.
///
/// Returns `None` if there is no such module. Every unit the deletion touches
/// is fetched before anything changes.
pub fn delete_module(
    model: &mut Model,
    sanitizer: &NameSanitizer,
    config: &BuilderConfig,
    name: &str,
) -> BuildResult<Option<ModuleRemoval>> {
    let Some(module) = model.find_module_by_name(&sanitizer.clean(name)) else {
        return Ok(None);
    };
    let home_microflow = config.home_microflow()?;

    // Fetch every unit touched below so a failed fetch changes nothing.
    model.load_domain_models()?;
    model.project_security()?;
    model.navigation()?;
    let roles = model.load_module_security(module)?.role_ids();
    let mut unbound_roles = 0;
    if !roles.is_empty() {
        for user_role in &mut model.project_security_mut()?.user_roles {
            for role in &roles {
                if user_role.remove_module_role(*role) {
                    unbound_roles += 1;
                }
            }
        }
    }

    let deletion = model.delete_module(module)?;
    let module_name = deletion.name.clone();

    let mut home_page_reset = false;
    let mut menu_items_cleared = 0;
    let navigation = model.navigation()?;
    if let Some(index) = navigation.profile_index(ProfileKind::Responsive) {
        let profile = navigation
            .profiles
            .get(index)
            .ok_or(StoreError::ProfileNotFound(index))?;
        let reset_home = profile.home_page.points_into(&module_name);
        let clear_menu = profile
            .menu_items
            .iter()
            .any(|item| item.action.targets_page_in(&module_name));

        if reset_home {
            model.set_home_page_to_system_default(index, home_microflow)?;
            home_page_reset = true;
        }
        if clear_menu {
            let profile = model
                .navigation_mut()?
                .profiles
                .get_mut(index)
                .ok_or(StoreError::ProfileNotFound(index))?;
            for item in &mut profile.menu_items {
                if item.action.targets_page_in(&module_name) {
                    item.action = ClientAction::NoAction;
                    menu_items_cleared += 1;
                }
            }
        }
    }

    info!(
        module = %module_name,
        unbound_roles,
        home_page_reset,
        menu_items_cleared,
        "removed module"
    );
    Ok(Some(ModuleRemoval {
        deletion,
        unbound_roles,
        home_page_reset,
        menu_items_cleared,
    }))
}
