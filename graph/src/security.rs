//! Module and project security.

use serde::{Deserialize, Serialize};
use weft_core::{ModuleRoleId, SecurityLevel, UserRoleId};

/// A role defined by a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleRole {
    pub id: ModuleRoleId,
    pub name: String,
    pub description: String,
}

/// The security container of a module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleSecurity {
    pub module_roles: Vec<ModuleRole>,
}

impl ModuleSecurity {
    pub fn role_by_name(&self, name: &str) -> Option<&ModuleRole> {
        self.module_roles.iter().find(|r| r.name == name)
    }

    pub fn role_ids(&self) -> Vec<ModuleRoleId> {
        self.module_roles.iter().map(|r| r.id).collect()
    }
}

/// A project-scoped role aggregating module roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRole {
    pub id: UserRoleId,
    pub name: String,
    pub module_roles: Vec<ModuleRoleId>,
}

impl UserRole {
    pub fn new(id: UserRoleId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            module_roles: Vec::new(),
        }
    }

    pub fn holds(&self, role: ModuleRoleId) -> bool {
        self.module_roles.contains(&role)
    }

    /// Add a module role; returns false if it was already held.
    pub fn add_module_role(&mut self, role: ModuleRoleId) -> bool {
        if self.holds(role) {
            return false;
        }
        self.module_roles.push(role);
        true
    }

    /// Remove a module role; returns false if it was not held.
    pub fn remove_module_role(&mut self, role: ModuleRoleId) -> bool {
        let before = self.module_roles.len();
        self.module_roles.retain(|r| *r != role);
        self.module_roles.len() != before
    }
}

/// The project security container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSecurity {
    pub security_level: SecurityLevel,
    pub user_roles: Vec<UserRole>,
}

impl ProjectSecurity {
    pub fn user_role(&self, id: UserRoleId) -> Option<&UserRole> {
        self.user_roles.iter().find(|r| r.id == id)
    }

    pub fn user_role_by_name(&self, name: &str) -> Option<&UserRole> {
        self.user_roles.iter().find(|r| r.name == name)
    }

    pub fn user_role_by_name_mut(&mut self, name: &str) -> Option<&mut UserRole> {
        self.user_roles.iter_mut().find(|r| r.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_module_roles_are_a_set() {
        let mut role = UserRole::new(UserRoleId::new(1), "User");
        assert!(role.add_module_role(ModuleRoleId::new(7)));
        assert!(!role.add_module_role(ModuleRoleId::new(7)));
        assert_eq!(role.module_roles.len(), 1);

        assert!(role.remove_module_role(ModuleRoleId::new(7)));
        assert!(!role.remove_module_role(ModuleRoleId::new(7)));
        assert!(role.module_roles.is_empty());
    }
}
