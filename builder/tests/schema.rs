//! Schema construction tests: idempotent get-or-create, typed attributes,
//! enumerations and generalization flags.

use pretty_assertions::assert_eq;
use weft_builder::{AttributeSpec, BuilderConfig, SchemaBuilder};
use weft_core::QualifiedName;
use weft_graph::{
    AttributeType, Generalization, MemoryBackend, Model, ProjectSettings, Text, UnitKey,
    CURRENT_DATE_TIME,
};

fn project() -> Model {
    Model::open(MemoryBackend::new_project().unwrap()).unwrap()
}

mod idempotency {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_module_created_once() {
        let mut model = project();
        let mut builder = SchemaBuilder::new(&mut model);

        let first = builder.get_or_create_module("My Sales!").unwrap();
        let second = builder.get_or_create_module("My Sales!").unwrap();

        assert_eq!(first, second);
        assert_eq!(model.modules().count(), 1);
        assert_eq!(model.module_name(first), Some("MySales"));
    }

    #[test]
    fn test_entity_created_once_and_not_overwritten() {
        let mut model = project();
        let mut builder = SchemaBuilder::new(&mut model);
        let module = builder.get_or_create_module("Sales").unwrap();

        let first = builder
            .get_or_create_entity(module, "Order", "Orders placed", true)
            .unwrap();
        let second = builder
            .get_or_create_entity(module, "Order", "Something else", false)
            .unwrap();

        assert_eq!(first, second);
        let order = model.entity(first).unwrap();
        assert_eq!(order.documentation, "Orders placed");
        assert_eq!(order.generalization, Generalization::none(true));
        assert_eq!(model.domain_model(module).unwrap().entities.len(), 1);
    }

    #[test]
    fn test_lookup_of_missing_elements_is_none() {
        let mut model = project();
        let mut builder = SchemaBuilder::new(&mut model);
        let module = builder.get_or_create_module("Sales").unwrap();
        let order = builder.get_or_create_entity(module, "Order", "", true).unwrap();

        assert_eq!(builder.get_module("Crm").unwrap(), None);
        assert_eq!(builder.get_entity(module, "Invoice").unwrap(), None);
        assert_eq!(builder.get_attribute(order, "Total").unwrap(), None);
        assert_eq!(builder.get_association(module, "Order_Line").unwrap(), None);
        assert_eq!(builder.get_enumeration(module, "Status").unwrap(), None);
        assert_eq!(builder.get_module_role(module, "Manager").unwrap(), None);
    }

    #[test]
    fn test_lookups_sanitize_names() {
        let mut model = project();
        let mut builder = SchemaBuilder::new(&mut model);
        let module = builder.get_or_create_module("Sales").unwrap();
        let entity = builder.get_or_create_entity(module, "class", "", true).unwrap();

        assert_eq!(model.entity(entity).unwrap().name, "_class");
        let mut builder = SchemaBuilder::new(&mut model);
        assert_eq!(builder.get_entity(module, "class").unwrap(), Some(entity));
        assert_eq!(builder.get_entity(module, "_class").unwrap(), Some(entity));
    }

    #[test]
    fn test_existing_module_found_after_reopen() {
        let mut model = project();
        let module = SchemaBuilder::new(&mut model)
            .get_or_create_module("Sales")
            .unwrap();
        model.flush().unwrap();

        let mut reopened = Model::open(model.into_backend()).unwrap();
        let again = SchemaBuilder::new(&mut reopened)
            .get_or_create_module("Sales")
            .unwrap();

        assert_eq!(again, module);
        assert_eq!(reopened.fetch_count(&UnitKey::DomainModel(module)), 1);
    }

    #[test]
    fn test_attribute_with_same_name_reused() {
        let mut model = project();
        let mut builder = SchemaBuilder::new(&mut model);
        let module = builder.get_or_create_module("Sales").unwrap();
        let order = builder.get_or_create_entity(module, "Order", "", true).unwrap();

        let first = builder
            .create_string_attribute(order, "Name", None, None, "")
            .unwrap();
        let second = builder
            .create_integer_attribute(order, "Name", Some(3), "")
            .unwrap();

        assert_eq!(first, second);
        let attribute = model.attribute(order, first).unwrap();
        assert_eq!(attribute.attr_type, AttributeType::String { length: 200 });
        assert_eq!(model.entity(order).unwrap().attributes.len(), 1);
    }
}

mod attributes {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_typed_constructors_encode_defaults() {
        let mut model = project();
        let mut builder = SchemaBuilder::new(&mut model);
        let module = builder.get_or_create_module("Sales").unwrap();
        let order = builder.get_or_create_entity(module, "Order", "", true).unwrap();

        let number = builder
            .create_autonumber_attribute(order, "Number", None, "")
            .unwrap();
        let paid = builder
            .create_boolean_attribute(order, "Paid", true, "")
            .unwrap();
        let placed = builder
            .create_datetime_attribute(order, "Placed", false, true, "")
            .unwrap();
        let total = builder
            .create_decimal_attribute(order, "Total", Some(9.5), "")
            .unwrap();
        let weight = builder
            .create_long_attribute(order, "Weight", Some(1200), "")
            .unwrap();
        let note = builder
            .create_string_attribute(order, "Note", Some(40), Some("none"), "")
            .unwrap();
        let scan = builder.create_binary_attribute(order, "Scan", "").unwrap();
        let secret = builder
            .create_hashed_string_attribute(order, "Secret", None, "")
            .unwrap();

        let default_of = |id| model.attribute(order, id).unwrap().value.default_value.clone();
        assert_eq!(default_of(number), "1");
        assert_eq!(default_of(paid), "true");
        assert_eq!(default_of(placed), CURRENT_DATE_TIME);
        assert_eq!(default_of(total), "9.5");
        assert_eq!(default_of(weight), "1200");
        assert_eq!(default_of(note), "none");
        assert_eq!(default_of(scan), "");
        assert_eq!(default_of(secret), "");

        assert_eq!(
            model.attribute(order, placed).unwrap().attr_type,
            AttributeType::DateTime {
                localize_date: false
            }
        );
        assert_eq!(
            model.attribute(order, note).unwrap().attr_type,
            AttributeType::String { length: 40 }
        );
    }

    #[test]
    fn test_configured_defaults_apply() {
        let mut model = project();
        let config = BuilderConfig::new()
            .with_default_string_length(80)
            .with_autonumber_seed(1000);
        let mut builder = SchemaBuilder::with_config(&mut model, config).unwrap();
        let module = builder.get_or_create_module("Sales").unwrap();
        let order = builder.get_or_create_entity(module, "Order", "", true).unwrap();

        let name = builder
            .create_string_attribute(order, "Name", None, None, "")
            .unwrap();
        let number = builder
            .create_autonumber_attribute(order, "Number", None, "")
            .unwrap();

        assert_eq!(
            model.attribute(order, name).unwrap().attr_type,
            AttributeType::String { length: 80 }
        );
        assert_eq!(model.attribute(order, number).unwrap().value.default_value, "1000");
    }

    #[test]
    fn test_attribute_names_sanitized() {
        let mut model = project();
        let mut builder = SchemaBuilder::new(&mut model);
        let module = builder.get_or_create_module("Sales").unwrap();
        let order = builder.get_or_create_entity(module, "Order", "", true).unwrap();

        let id = builder
            .create_attribute(order, "2nd line", AttributeSpec::string(20, None), "")
            .unwrap();

        assert_eq!(model.attribute(order, id).unwrap().name, "_2ndline");
    }

    #[test]
    fn test_enumeration_attribute_default_is_value_key() {
        let mut model = project();
        let mut builder = SchemaBuilder::new(&mut model);
        let module = builder.get_or_create_module("Sales").unwrap();
        let order = builder.get_or_create_entity(module, "Order", "", true).unwrap();
        let status = builder.get_or_create_enumeration(module, "Status").unwrap();
        builder.create_enumeration_value(status, "Open", "Open").unwrap();
        let closed = builder
            .create_enumeration_value(status, "Closed", "Closed")
            .unwrap();

        let id = builder
            .create_enumeration_attribute(order, "Status", status, Some(closed), "")
            .unwrap();

        let attribute = model.attribute(order, id).unwrap();
        assert_eq!(
            attribute.attr_type,
            AttributeType::Enumeration {
                enumeration: status
            }
        );
        assert_eq!(attribute.value.default_value, "Closed");
    }
}

mod enumerations {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_values_keep_creation_order() {
        let mut model = project();
        let mut builder = SchemaBuilder::new(&mut model);
        let module = builder.get_or_create_module("Sales").unwrap();
        let status = builder.get_or_create_enumeration(module, "Status").unwrap();

        for key in ["Open", "In progress", "3rd party", "Closed"] {
            builder.create_enumeration_value(status, key, key).unwrap();
        }

        let keys: Vec<&str> = model.enumeration(status).unwrap().keys().collect();
        assert_eq!(keys, vec!["Open", "Inprogress", "_3rdparty", "Closed"]);
    }

    #[test]
    fn test_keys_unique_after_sanitization() {
        let mut model = project();
        let mut builder = SchemaBuilder::new(&mut model);
        let module = builder.get_or_create_module("Sales").unwrap();
        let status = builder.get_or_create_enumeration(module, "Status").unwrap();

        let first = builder
            .create_enumeration_value(status, "On hold", "On hold")
            .unwrap();
        let second = builder
            .create_enumeration_value(status, "On-hold", "Paused")
            .unwrap();

        assert_eq!(first, second);
        let enumeration = model.enumeration(status).unwrap();
        assert_eq!(enumeration.values.len(), 1);
        assert_eq!(
            enumeration.values[0].caption,
            Text::single("en_US", "On hold")
        );
    }

    #[test]
    fn test_enumeration_created_once_per_module() {
        let mut model = project();
        let mut builder = SchemaBuilder::new(&mut model);
        let sales = builder.get_or_create_module("Sales").unwrap();
        let crm = builder.get_or_create_module("Crm").unwrap();

        let a = builder.get_or_create_enumeration(sales, "Status").unwrap();
        let b = builder.get_or_create_enumeration(sales, "Status").unwrap();
        let c = builder.get_or_create_enumeration(crm, "Status").unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(
            model.find_enumeration_by_qualified_name(&QualifiedName::new("Crm", "Status")),
            Some(c)
        );
    }

    #[test]
    fn test_value_lookup_by_sanitized_key() {
        let mut model = project();
        let mut builder = SchemaBuilder::new(&mut model);
        let module = builder.get_or_create_module("Sales").unwrap();
        let status = builder.get_or_create_enumeration(module, "Status").unwrap();
        let id = builder
            .create_enumeration_value(status, "In progress", "Busy")
            .unwrap();

        assert_eq!(
            builder.get_enumeration_value(status, "In progress").unwrap(),
            Some(id)
        );
        assert_eq!(builder.get_enumeration_value(status, "Done").unwrap(), None);
    }

    #[test]
    fn test_language_settings_created_on_demand() {
        let mut backend = MemoryBackend::new_project().unwrap();
        backend
            .put(UnitKey::ProjectSettings, ProjectSettings::default())
            .unwrap();
        let mut model = Model::open(backend).unwrap();
        let config = BuilderConfig::new().with_fallback_language_code("nl_NL");
        let mut builder = SchemaBuilder::with_config(&mut model, config).unwrap();
        let module = builder.get_or_create_module("Sales").unwrap();
        let status = builder.get_or_create_enumeration(module, "Status").unwrap();

        builder.create_enumeration_value(status, "Open", "Open").unwrap();

        let settings = builder.get_or_create_language_settings().unwrap();
        assert_eq!(settings.default_language_code, "nl_NL");
        let enumeration = model.enumeration(status).unwrap();
        assert_eq!(enumeration.values[0].caption.get("nl_NL"), Some("Open"));
    }

    #[test]
    fn test_existing_language_used_for_captions() {
        let mut model = project();
        let mut builder = SchemaBuilder::new(&mut model);
        let module = builder.get_or_create_module("Sales").unwrap();
        let status = builder.get_or_create_enumeration(module, "Status").unwrap();
        builder.create_enumeration_value(status, "Open", "Open").unwrap();

        let caption = &model.enumeration(status).unwrap().values[0].caption;
        assert_eq!(caption.get("en_US"), Some("Open"));
    }
}

mod generalization_flags {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_flags_set_on_entity_without_generalization() {
        let mut model = project();
        let mut builder = SchemaBuilder::new(&mut model);
        let module = builder.get_or_create_module("Sales").unwrap();
        let order = builder.get_or_create_entity(module, "Order", "", false).unwrap();

        builder.set_has_owner(order, true).unwrap();
        builder.set_has_created_date(order, true).unwrap();
        builder.set_has_changed_by(order, true).unwrap();
        builder.set_has_changed_date(order, true).unwrap();
        builder.set_has_changed_date(order, false).unwrap();

        let flags = *model.entity(order).unwrap().generalization.flags().unwrap();
        assert!(!flags.persistable);
        assert!(flags.has_owner);
        assert!(flags.has_created_date);
        assert!(flags.has_changed_by);
        assert!(!flags.has_changed_date);
    }

    #[test]
    fn test_flags_silently_skipped_on_generalized_entity() {
        let mut model = project();
        let module = model.create_module("Sales");
        let account = model
            .create_entity(
                module,
                "Account",
                "",
                Generalization::Generalized(QualifiedName::new("System", "User")),
            )
            .unwrap();
        let mut builder = SchemaBuilder::new(&mut model);

        builder.set_has_owner(account, true).unwrap();
        builder.set_has_created_date(account, true).unwrap();

        assert!(model.entity(account).unwrap().generalization.flags().is_none());
    }

    #[test]
    fn test_entity_location() {
        let mut model = project();
        let mut builder = SchemaBuilder::new(&mut model);
        let module = builder.get_or_create_module("Sales").unwrap();
        let order = builder.get_or_create_entity(module, "Order", "", true).unwrap();

        builder.set_entity_location(order, 120, -40).unwrap();

        let location = model.entity(order).unwrap().location;
        assert_eq!((location.x, location.y), (120, -40));
    }
}
