//! Module deletion, security and persistence tests.

use pretty_assertions::assert_eq;
use weft_builder::{BuildError, BuilderConfig, SchemaBuilder};
use weft_core::{ModuleId, ModuleRoleId, ProfileKind, QualifiedName, SecurityLevel, UserRoleId};
use weft_graph::unit::ModuleHeader;
use weft_graph::{
    ClientAction, HomePage, MemoryBackend, MenuItem, Model, ModuleRole, ModuleSecurity,
    NavigationDocument, NavigationProfile, ProjectIndex, ProjectSecurity, StoreError, UnitKey,
    UserRole,
};

fn project() -> Model {
    Model::open(MemoryBackend::new_project().unwrap()).unwrap()
}

/// A project whose responsive profile points into `Sales`.
fn project_with_navigation() -> Model {
    let mut responsive = NavigationProfile::new("Responsive", ProfileKind::Responsive);
    responsive.home_page = HomePage::Page(QualifiedName::new("Sales", "Home"));
    let mut orders = MenuItem::new(
        "Orders",
        ClientAction::ShowPage(QualifiedName::new("Sales", "Orders")),
    );
    orders.items.push(MenuItem::new(
        "Open orders",
        ClientAction::ShowPage(QualifiedName::new("Sales", "OpenOrders")),
    ));
    responsive.menu_items = vec![
        orders,
        MenuItem::new(
            "Sync",
            ClientAction::CallMicroflow(QualifiedName::new("Sales", "ACT_Sync")),
        ),
        MenuItem::new(
            "Customers",
            ClientAction::ShowPage(QualifiedName::new("SalesCrm", "Customers")),
        ),
    ];
    let mut phone = NavigationProfile::new("Phone", ProfileKind::Phone);
    phone.home_page = HomePage::Page(QualifiedName::new("Sales", "PhoneHome"));

    let mut backend = MemoryBackend::new_project().unwrap();
    backend
        .put(
            UnitKey::Navigation,
            NavigationDocument {
                profiles: vec![phone, responsive],
            },
        )
        .unwrap();
    Model::open(backend).unwrap()
}

mod module_deletion {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_user_roles_lose_module_roles() {
        let mut model = project();
        let mut builder = SchemaBuilder::new(&mut model);
        let sales = builder.get_or_create_module("Sales").unwrap();
        let crm = builder.get_or_create_module("Crm").unwrap();
        let admin = builder
            .create_module_role(sales, "Administrator", "Administrator")
            .unwrap();
        let user = builder.create_module_role(sales, "User", "User").unwrap();
        let kept = builder.create_module_role(crm, "User", "User").unwrap();

        let removal = builder.delete_module("Sales").unwrap().unwrap();

        assert_eq!(removal.unbound_roles, 2);
        let security = builder.get_project_security().unwrap();
        for user_role in &security.user_roles {
            assert!(!user_role.holds(admin));
            assert!(!user_role.holds(user));
        }
        assert!(security.user_role_by_name("User").unwrap().holds(kept));
    }

    #[test]
    fn test_home_page_reset_to_system_default() {
        let mut model = project_with_navigation();
        let mut builder = SchemaBuilder::new(&mut model);
        builder.get_or_create_module("Sales").unwrap();

        let removal = builder.delete_module("Sales").unwrap().unwrap();

        assert!(removal.home_page_reset);
        let profiles = builder.get_navigation_profiles().unwrap();
        assert_eq!(
            profiles[1].home_page,
            HomePage::Microflow(QualifiedName::new("System", "ShowHomePage"))
        );
        // Only the responsive profile is repaired.
        assert_eq!(
            profiles[0].home_page,
            HomePage::Page(QualifiedName::new("Sales", "PhoneHome"))
        );
    }

    #[test]
    fn test_top_level_page_items_cleared() {
        let mut model = project_with_navigation();
        let mut builder = SchemaBuilder::new(&mut model);
        builder.get_or_create_module("Sales").unwrap();

        let removal = builder.delete_module("Sales").unwrap().unwrap();

        assert_eq!(removal.menu_items_cleared, 1);
        let items = &builder.get_navigation_profiles().unwrap()[1].menu_items;
        assert_eq!(items[0].action, ClientAction::NoAction);
        // Nested items are left as they are.
        assert_eq!(
            items[0].items[0].action,
            ClientAction::ShowPage(QualifiedName::new("Sales", "OpenOrders"))
        );
        assert_eq!(
            items[1].action,
            ClientAction::CallMicroflow(QualifiedName::new("Sales", "ACT_Sync"))
        );
        // A module whose name merely starts with the deleted one is unaffected.
        assert_eq!(
            items[2].action,
            ClientAction::ShowPage(QualifiedName::new("SalesCrm", "Customers"))
        );
    }

    #[test]
    fn test_configured_home_microflow_used() {
        let mut model = project_with_navigation();
        let config = BuilderConfig::new().with_system_home_microflow("Portal.ShowLanding");
        let mut builder = SchemaBuilder::with_config(&mut model, config).unwrap();
        builder.get_or_create_module("Sales").unwrap();

        builder.delete_module("Sales").unwrap();

        assert_eq!(
            builder.get_navigation_profiles().unwrap()[1].home_page,
            HomePage::Microflow(QualifiedName::new("Portal", "ShowLanding"))
        );
    }

    #[test]
    fn test_unrelated_navigation_untouched() {
        let mut model = project_with_navigation();
        let mut builder = SchemaBuilder::new(&mut model);
        builder.get_or_create_module("Crm").unwrap();

        let removal = builder.delete_module("Crm").unwrap().unwrap();

        assert!(!removal.home_page_reset);
        assert_eq!(removal.menu_items_cleared, 0);
        assert_eq!(
            builder.get_navigation_profiles().unwrap()[1].home_page,
            HomePage::Page(QualifiedName::new("Sales", "Home"))
        );
    }

    #[test]
    fn test_missing_module_is_none() {
        let mut model = project();
        let mut builder = SchemaBuilder::new(&mut model);
        assert!(builder.delete_module("Nothing").unwrap().is_none());
    }

    #[test]
    fn test_cross_associations_into_deleted_module_removed() {
        let mut model = project();
        let mut builder = SchemaBuilder::new(&mut model);
        let sales = builder.get_or_create_module("Sales").unwrap();
        let crm = builder.get_or_create_module("Crm").unwrap();
        let order = builder.get_or_create_entity(sales, "Order", "", true).unwrap();
        let customer = builder
            .get_or_create_entity(crm, "Customer", "", true)
            .unwrap();
        let assoc = builder
            .create_association(order, customer, "Order_Customer", Default::default())
            .unwrap();

        let removal = builder.delete_module("Crm").unwrap().unwrap();

        assert_eq!(removal.deletion.pruned_associations, vec![assoc]);
        assert_eq!(builder.get_association(sales, "Order_Customer").unwrap(), None);
        assert_eq!(builder.get_module("Crm").unwrap(), None);
    }

    #[test]
    fn test_failed_fetch_leaves_user_roles_bound() {
        let sales = ModuleId::new(5);
        let role = ModuleRoleId::new(6);
        let mut backend = MemoryBackend::new_project().unwrap();
        backend.set_index(ProjectIndex {
            modules: vec![ModuleHeader {
                id: sales,
                name: "Sales".into(),
            }],
            next_id: 10,
            ..ProjectIndex::default()
        });
        backend
            .put(
                UnitKey::ModuleSecurity(sales),
                ModuleSecurity {
                    module_roles: vec![ModuleRole {
                        id: role,
                        name: "User".into(),
                        description: String::new(),
                    }],
                },
            )
            .unwrap();
        let mut user = UserRole::new(UserRoleId::new(7), "User");
        user.module_roles.push(role);
        backend
            .put(
                UnitKey::ProjectSecurity,
                ProjectSecurity {
                    security_level: SecurityLevel::CheckEverything,
                    user_roles: vec![user],
                },
            )
            .unwrap();
        // No domain model unit for Sales.
        let mut model = Model::open(backend).unwrap();
        let mut builder = SchemaBuilder::new(&mut model);

        let err = builder.delete_module("Sales").unwrap_err();

        assert!(matches!(
            err,
            BuildError::Store(StoreError::UnitMissing(UnitKey::DomainModel(id))) if id == sales
        ));
        let security = builder.get_project_security().unwrap();
        assert!(security.user_role_by_name("User").unwrap().holds(role));
        assert_eq!(builder.get_module("Sales").unwrap(), Some(sales));
        assert!(!model.is_dirty());
    }
}

mod security {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_security_level() {
        let mut model = project();
        let mut builder = SchemaBuilder::new(&mut model);

        builder.set_security(true).unwrap();
        assert_eq!(
            builder.get_project_security().unwrap().security_level,
            SecurityLevel::CheckEverything
        );

        builder.set_security(false).unwrap();
        assert_eq!(
            builder.get_project_security().unwrap().security_level,
            SecurityLevel::CheckNothing
        );
    }

    #[test]
    fn test_module_role_bound_into_user_role() {
        let mut model = project();
        let mut builder = SchemaBuilder::new(&mut model);
        let module = builder.get_or_create_module("Sales").unwrap();

        let role = builder.create_module_role(module, "Manager", "User").unwrap();

        assert_eq!(builder.get_module_role(module, "Manager").unwrap(), Some(role));
        let security = builder.get_project_security().unwrap();
        assert!(security.user_role_by_name("User").unwrap().holds(role));
        assert!(!security.user_role_by_name("Administrator").unwrap().holds(role));
    }

    #[test]
    fn test_user_role_matched_by_exact_name() {
        let mut model = project();
        model
            .project_security_mut()
            .unwrap()
            .user_roles
            .push(UserRole::new(UserRoleId::new(500), "Sales Manager"));
        let mut builder = SchemaBuilder::new(&mut model);
        let module = builder.get_or_create_module("Sales").unwrap();

        let role = builder
            .create_module_role(module, "Manager", "Sales Manager")
            .unwrap();

        let security = builder.get_project_security().unwrap();
        assert!(security.user_role_by_name("Sales Manager").unwrap().holds(role));
    }

    #[test]
    fn test_unknown_user_role_skipped_silently() {
        let mut model = project();
        let mut builder = SchemaBuilder::new(&mut model);
        let module = builder.get_or_create_module("Sales").unwrap();

        let role = builder
            .create_module_role(module, "Manager", "Auditor")
            .unwrap();

        assert_eq!(builder.get_module_role(module, "Manager").unwrap(), Some(role));
        let security = builder.get_project_security().unwrap();
        assert!(security.user_roles.iter().all(|ur| !ur.holds(role)));
    }

    #[test]
    fn test_unknown_user_role_rejected_when_strict() {
        let mut model = project();
        let config = BuilderConfig::new().with_strict_user_roles(true);
        let mut builder = SchemaBuilder::with_config(&mut model, config).unwrap();
        let module = builder.get_or_create_module("Sales").unwrap();

        let err = builder
            .create_module_role(module, "Manager", "Auditor")
            .unwrap_err();

        assert!(matches!(err, BuildError::UnknownUserRole { ref name } if name == "Auditor"));
        assert_eq!(builder.get_module_role(module, "Manager").unwrap(), None);
    }

    #[test]
    fn test_module_role_created_once() {
        let mut model = project();
        let mut builder = SchemaBuilder::new(&mut model);
        let module = builder.get_or_create_module("Sales").unwrap();
        let auditor = builder.get_or_create_user_role("Auditor").unwrap();

        let first = builder.create_module_role(module, "Manager", "User").unwrap();
        let second = builder
            .create_module_role(module, "Manager", "Auditor")
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(model.module_security(module).unwrap().module_roles.len(), 1);
        let mut builder = SchemaBuilder::new(&mut model);
        let security = builder.get_project_security().unwrap();
        assert!(security.user_role(auditor).unwrap().holds(first));
        assert!(security.user_role_by_name("User").unwrap().holds(first));
    }

    #[test]
    fn test_user_role_created_once() {
        let mut model = project();
        let mut builder = SchemaBuilder::new(&mut model);

        let first = builder.get_or_create_user_role("Auditor").unwrap();
        let second = builder.get_or_create_user_role("Auditor").unwrap();
        let existing = builder.get_or_create_user_role("Administrator").unwrap();

        assert_eq!(first, second);
        let security = builder.get_project_security().unwrap();
        assert_eq!(security.user_roles.len(), 3);
        assert_eq!(security.user_role_by_name("Administrator").map(|r| r.id), Some(existing));
    }

    #[test]
    fn test_invalid_config_rejected_by_builder() {
        let mut model = project();
        let config = BuilderConfig::new().with_fallback_language_code("EN");
        assert!(matches!(
            SchemaBuilder::with_config(&mut model, config),
            Err(BuildError::InvalidConfig { .. })
        ));
    }
}

mod persistence {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_built_schema_survives_flush() {
        let mut model = project();
        let mut builder = SchemaBuilder::new(&mut model);
        let module = builder.get_or_create_module("Sales").unwrap();
        let order = builder.get_or_create_entity(module, "Order", "", true).unwrap();
        builder
            .create_string_attribute(order, "Name", None, None, "")
            .unwrap();
        builder.create_module_role(module, "User", "User").unwrap();
        builder.set_security(true).unwrap();
        let stats = builder.flush().unwrap();
        assert!(stats.upserted >= 3);

        let mut reopened = Model::open(model.into_backend()).unwrap();
        let mut builder = SchemaBuilder::new(&mut reopened);
        let module = builder.get_module("Sales").unwrap().unwrap();
        let order = builder.get_entity(module, "Order").unwrap().unwrap();
        assert!(builder.get_attribute(order, "Name").unwrap().is_some());
        assert!(builder.get_module_role(module, "User").unwrap().is_some());
        assert_eq!(
            builder.get_project_security().unwrap().security_level,
            SecurityLevel::CheckEverything
        );
    }

    #[test]
    fn test_repeated_builds_fetch_each_unit_once() {
        let mut model = project();
        let module = SchemaBuilder::new(&mut model)
            .get_or_create_module("Sales")
            .unwrap();
        model.flush().unwrap();

        let mut reopened = Model::open(model.into_backend()).unwrap();
        let mut builder = SchemaBuilder::new(&mut reopened);
        for _ in 0..3 {
            let module = builder.get_or_create_module("Sales").unwrap();
            let order = builder.get_or_create_entity(module, "Order", "", true).unwrap();
            builder.create_boolean_attribute(order, "Paid", false, "").unwrap();
            builder.create_module_role(module, "User", "User").unwrap();
        }

        assert_eq!(reopened.fetch_count(&UnitKey::DomainModel(module)), 1);
        assert_eq!(reopened.fetch_count(&UnitKey::ModuleSecurity(module)), 1);
        assert_eq!(reopened.fetch_count(&UnitKey::ProjectSecurity), 1);
        assert_eq!(reopened.domain_model(module).unwrap().entities.len(), 1);
    }
}
