//! Schema builder - coordinates builder operations.
//!
//! The builder delegates to the operation modules in `ops/`:
//! - `ops/module.rs` - module get-or-create and deletion cleanup
//! - `ops/entity.rs` - entities, generalization flags and layout
//! - `ops/attribute.rs` - typed attributes
//! - `ops/association.rs` - associations and cross-module associations
//! - `ops/access.rs` - access rules and member accesses
//! - `ops/enumeration.rs` - enumerations, values and language settings
//! - `ops/security.rs` - security level, module roles and user roles

use weft_core::{
    AssociationId, AttributeId, EntityId, EnumerationId, EnumerationValueId, MemberAccessRights,
    ModuleId, ModuleRoleId, NameSanitizer, UserRoleId,
};
use weft_graph::{FlushStats, LanguageSettings, Model, NavigationProfile, ProjectSecurity};

use crate::config::BuilderConfig;
use crate::error::BuildResult;
use crate::ops;
use crate::ops::access::{AccessRuleOptions, AccessRuleRef};
use crate::ops::association::AssociationOptions;
use crate::ops::attribute::AttributeSpec;
use crate::ops::module::ModuleRemoval;

/// Idempotent schema construction over one model.
pub struct SchemaBuilder<'m> {
    model: &'m mut Model,
    sanitizer: NameSanitizer,
    config: BuilderConfig,
}

impl<'m> SchemaBuilder<'m> {
    /// Create a builder with the bundled reserved words and default configuration.
    pub fn new(model: &'m mut Model) -> Self {
        Self {
            model,
            sanitizer: NameSanitizer::default(),
            config: BuilderConfig::default(),
        }
    }

    /// Create a builder with a validated configuration.
    pub fn with_config(model: &'m mut Model, config: BuilderConfig) -> BuildResult<Self> {
        config.validate()?;
        Ok(Self {
            model,
            sanitizer: NameSanitizer::default(),
            config,
        })
    }

    pub fn with_sanitizer(mut self, sanitizer: NameSanitizer) -> Self {
        self.sanitizer = sanitizer;
        self
    }

    pub fn model(&self) -> &Model {
        self.model
    }

    pub fn model_mut(&mut self) -> &mut Model {
        self.model
    }

    pub fn sanitizer(&self) -> &NameSanitizer {
        &self.sanitizer
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    pub fn clean_name(&self, raw: &str) -> String {
        self.sanitizer.clean(raw)
    }

    /// Persist everything built so far.
    pub fn flush(&mut self) -> BuildResult<FlushStats> {
        Ok(self.model.flush()?)
    }

    // ==================== Modules ====================

    pub fn get_module(&mut self, name: &str) -> BuildResult<Option<ModuleId>> {
        ops::module::get_module(self.model, &self.sanitizer, name)
    }

    pub fn get_or_create_module(&mut self, name: &str) -> BuildResult<ModuleId> {
        ops::module::get_or_create_module(self.model, &self.sanitizer, name)
    }

    pub fn delete_module(&mut self, name: &str) -> BuildResult<Option<ModuleRemoval>> {
        ops::module::delete_module(self.model, &self.sanitizer, &self.config, name)
    }

    // ==================== Entities ====================

    pub fn get_entity(&mut self, module: ModuleId, name: &str) -> BuildResult<Option<EntityId>> {
        ops::entity::get_entity(self.model, &self.sanitizer, module, name)
    }

    pub fn get_or_create_entity(
        &mut self,
        module: ModuleId,
        name: &str,
        documentation: &str,
        persistable: bool,
    ) -> BuildResult<EntityId> {
        ops::entity::get_or_create_entity(
            self.model,
            &self.sanitizer,
            module,
            name,
            documentation,
            persistable,
        )
    }

    pub fn set_has_owner(&mut self, entity: EntityId, value: bool) -> BuildResult<()> {
        ops::entity::set_has_owner(self.model, entity, value)
    }

    pub fn set_has_created_date(&mut self, entity: EntityId, value: bool) -> BuildResult<()> {
        ops::entity::set_has_created_date(self.model, entity, value)
    }

    pub fn set_has_changed_by(&mut self, entity: EntityId, value: bool) -> BuildResult<()> {
        ops::entity::set_has_changed_by(self.model, entity, value)
    }

    pub fn set_has_changed_date(&mut self, entity: EntityId, value: bool) -> BuildResult<()> {
        ops::entity::set_has_changed_date(self.model, entity, value)
    }

    pub fn set_entity_location(&mut self, entity: EntityId, x: i32, y: i32) -> BuildResult<()> {
        ops::entity::set_location(self.model, entity, x, y)
    }

    pub fn get_attribute(&self, entity: EntityId, name: &str) -> BuildResult<Option<AttributeId>> {
        ops::entity::get_attribute(self.model, &self.sanitizer, entity, name)
    }

    // ==================== Attributes ====================

    pub fn create_attribute(
        &mut self,
        entity: EntityId,
        name: &str,
        spec: AttributeSpec,
        documentation: &str,
    ) -> BuildResult<AttributeId> {
        ops::attribute::create_attribute(
            self.model,
            &self.sanitizer,
            entity,
            name,
            spec,
            documentation,
        )
    }

    /// Auto-number attribute seeded with `seed`, or with the configured seed.
    pub fn create_autonumber_attribute(
        &mut self,
        entity: EntityId,
        name: &str,
        seed: Option<i64>,
        documentation: &str,
    ) -> BuildResult<AttributeId> {
        let seed = seed.unwrap_or(self.config.autonumber_seed);
        self.create_attribute(entity, name, AttributeSpec::auto_number(seed), documentation)
    }

    pub fn create_binary_attribute(
        &mut self,
        entity: EntityId,
        name: &str,
        documentation: &str,
    ) -> BuildResult<AttributeId> {
        self.create_attribute(entity, name, AttributeSpec::binary(), documentation)
    }

    pub fn create_boolean_attribute(
        &mut self,
        entity: EntityId,
        name: &str,
        default: bool,
        documentation: &str,
    ) -> BuildResult<AttributeId> {
        self.create_attribute(entity, name, AttributeSpec::boolean(default), documentation)
    }

    pub fn create_datetime_attribute(
        &mut self,
        entity: EntityId,
        name: &str,
        localize: bool,
        default_now: bool,
        documentation: &str,
    ) -> BuildResult<AttributeId> {
        let spec = AttributeSpec::date_time(localize, default_now);
        self.create_attribute(entity, name, spec, documentation)
    }

    pub fn create_decimal_attribute(
        &mut self,
        entity: EntityId,
        name: &str,
        default: Option<f64>,
        documentation: &str,
    ) -> BuildResult<AttributeId> {
        self.create_attribute(entity, name, AttributeSpec::decimal(default), documentation)
    }

    pub fn create_enumeration_attribute(
        &mut self,
        entity: EntityId,
        name: &str,
        enumeration: EnumerationId,
        default: Option<EnumerationValueId>,
        documentation: &str,
    ) -> BuildResult<AttributeId> {
        ops::attribute::create_enumeration_attribute(
            self.model,
            &self.sanitizer,
            entity,
            name,
            enumeration,
            default,
            documentation,
        )
    }

    pub fn create_hashed_string_attribute(
        &mut self,
        entity: EntityId,
        name: &str,
        default: Option<&str>,
        documentation: &str,
    ) -> BuildResult<AttributeId> {
        let spec = AttributeSpec::hashed_string(default);
        self.create_attribute(entity, name, spec, documentation)
    }

    pub fn create_integer_attribute(
        &mut self,
        entity: EntityId,
        name: &str,
        default: Option<i32>,
        documentation: &str,
    ) -> BuildResult<AttributeId> {
        self.create_attribute(entity, name, AttributeSpec::integer(default), documentation)
    }

    pub fn create_long_attribute(
        &mut self,
        entity: EntityId,
        name: &str,
        default: Option<i64>,
        documentation: &str,
    ) -> BuildResult<AttributeId> {
        self.create_attribute(entity, name, AttributeSpec::long(default), documentation)
    }

    /// String attribute of `max_length`, or of the configured default length.
    pub fn create_string_attribute(
        &mut self,
        entity: EntityId,
        name: &str,
        max_length: Option<u32>,
        default: Option<&str>,
        documentation: &str,
    ) -> BuildResult<AttributeId> {
        let length = max_length.unwrap_or(self.config.default_string_length);
        let spec = AttributeSpec::string(length, default);
        self.create_attribute(entity, name, spec, documentation)
    }

    // ==================== Associations ====================

    pub fn create_association(
        &mut self,
        parent: EntityId,
        child: EntityId,
        name: &str,
        options: AssociationOptions,
    ) -> BuildResult<AssociationId> {
        ops::association::create_association(
            self.model,
            &self.sanitizer,
            parent,
            child,
            name,
            options,
        )
    }

    pub fn get_association(
        &mut self,
        module: ModuleId,
        name: &str,
    ) -> BuildResult<Option<AssociationId>> {
        ops::association::get_association(self.model, &self.sanitizer, module, name)
    }

    // ==================== Access rules ====================

    pub fn create_access_rule(
        &mut self,
        entity: EntityId,
        roles: &[ModuleRoleId],
        options: AccessRuleOptions,
    ) -> BuildResult<AccessRuleRef> {
        ops::access::create_access_rule(self.model, entity, roles, options)
    }

    pub fn set_attribute_access(
        &mut self,
        rule: AccessRuleRef,
        attribute: AttributeId,
        rights: MemberAccessRights,
    ) -> BuildResult<()> {
        ops::access::set_attribute_access(self.model, rule, attribute, rights)
    }

    pub fn set_association_access(
        &mut self,
        rule: AccessRuleRef,
        association: AssociationId,
        rights: MemberAccessRights,
    ) -> BuildResult<()> {
        ops::access::set_association_access(self.model, rule, association, rights)
    }

    // ==================== Enumerations ====================

    pub fn get_enumeration(
        &mut self,
        module: ModuleId,
        name: &str,
    ) -> BuildResult<Option<EnumerationId>> {
        ops::enumeration::get_enumeration(self.model, &self.sanitizer, module, name)
    }

    pub fn get_or_create_enumeration(
        &mut self,
        module: ModuleId,
        name: &str,
    ) -> BuildResult<EnumerationId> {
        ops::enumeration::get_or_create_enumeration(self.model, &self.sanitizer, module, name)
    }

    pub fn create_enumeration_value(
        &mut self,
        enumeration: EnumerationId,
        key: &str,
        caption: &str,
    ) -> BuildResult<EnumerationValueId> {
        ops::enumeration::create_enumeration_value(
            self.model,
            &self.sanitizer,
            &self.config,
            enumeration,
            key,
            caption,
        )
    }

    pub fn get_enumeration_value(
        &mut self,
        enumeration: EnumerationId,
        key: &str,
    ) -> BuildResult<Option<EnumerationValueId>> {
        ops::enumeration::get_enumeration_value(self.model, &self.sanitizer, enumeration, key)
    }

    pub fn get_or_create_language_settings(&mut self) -> BuildResult<LanguageSettings> {
        ops::enumeration::get_or_create_language_settings(self.model, &self.config)
    }

    // ==================== Security ====================

    pub fn set_security(&mut self, production: bool) -> BuildResult<()> {
        ops::security::set_security(self.model, production)
    }

    pub fn get_project_security(&mut self) -> BuildResult<&ProjectSecurity> {
        ops::security::get_project_security(self.model)
    }

    pub fn get_navigation_profiles(&mut self) -> BuildResult<&[NavigationProfile]> {
        ops::security::get_navigation_profiles(self.model)
    }

    pub fn create_module_role(
        &mut self,
        module: ModuleId,
        name: &str,
        user_role: &str,
    ) -> BuildResult<ModuleRoleId> {
        ops::security::create_module_role(
            self.model,
            &self.sanitizer,
            &self.config,
            module,
            name,
            user_role,
        )
    }

    pub fn get_module_role(
        &mut self,
        module: ModuleId,
        name: &str,
    ) -> BuildResult<Option<ModuleRoleId>> {
        ops::security::get_module_role(self.model, &self.sanitizer, module, name)
    }

    pub fn get_or_create_user_role(&mut self, name: &str) -> BuildResult<UserRoleId> {
        ops::security::get_or_create_user_role(self.model, &self.sanitizer, name)
    }
}
