//! The model: an application graph opened from a backend.
//!
//! Units are fetched on first access and cached for the rest of the session.
//! Every mutable accessor marks its unit dirty; [`Model::flush`] sends all
//! dirty units to the backend as one change set.

use crate::backend::Backend;
use crate::domain::{
    AccessRule, Association, AssociationKind, Attribute, AttributeType, DomainModel, Entity,
    Generalization, StoredValue,
};
use crate::enumeration::{Enumeration, EnumerationValue};
use crate::error::{StoreError, StoreResult};
use crate::lazy::{Lazy, Loader};
use crate::navigation::NavigationDocument;
use crate::security::{ModuleRole, ModuleSecurity, ProjectSecurity, UserRole};
use crate::settings::ProjectSettings;
use crate::text::Text;
use crate::unit::{ChangeSet, EnumerationHeader, ModuleHeader, ProjectIndex, Unit, UnitKey};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use tracing::{debug, info};
use weft_core::{
    AccessRuleId, AssociationId, AttributeId, EntityId, EnumerationId, EnumerationValueId,
    ModuleId, ModuleRoleId, QualifiedName, UserRoleId,
};

/// Identifier allocator. One counter serves every element kind.
#[derive(Debug)]
struct IdAllocator {
    next_id: u64,
}

impl IdAllocator {
    fn new(next_id: u64) -> Self {
        Self {
            next_id: next_id.max(1),
        }
    }

    fn alloc(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

#[derive(Debug)]
struct ModuleSlot {
    name: String,
    domain_model: Lazy<DomainModel>,
    security: Lazy<ModuleSecurity>,
}

#[derive(Debug)]
struct EnumerationSlot {
    module: ModuleId,
    name: String,
    document: Lazy<Enumeration>,
}

/// What [`Model::delete_module`] removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDeletion {
    pub module: ModuleId,
    pub name: String,
    pub enumerations: Vec<EnumerationId>,
    /// Cross-module associations in other modules that pointed at the deleted entities.
    pub pruned_associations: Vec<AssociationId>,
}

/// Counts reported by a flush.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushStats {
    pub upserted: usize,
    pub deleted: usize,
}

/// An application model backed by a [`Backend`].
pub struct Model {
    backend: Box<dyn Backend>,
    id_alloc: IdAllocator,
    modules: BTreeMap<ModuleId, ModuleSlot>,
    enumerations: BTreeMap<EnumerationId, EnumerationSlot>,
    /// Owning module of every entity in a loaded domain model.
    entity_owners: HashMap<EntityId, ModuleId>,
    project_security: Lazy<ProjectSecurity>,
    project_settings: Lazy<ProjectSettings>,
    navigation: Lazy<NavigationDocument>,
    dirty: BTreeSet<UnitKey>,
    deleted: BTreeSet<UnitKey>,
    index_dirty: bool,
    fetches: HashMap<UnitKey, usize>,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("modules", &self.modules.len())
            .field("enumerations", &self.enumerations.len())
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}

impl Model {
    /// Open a model. Only the project index is read; units are fetched on demand.
    pub fn open<B: Backend + 'static>(backend: B) -> StoreResult<Self> {
        let mut backend: Box<dyn Backend> = Box::new(backend);
        let index = backend.index()?;

        let modules = index
            .modules
            .into_iter()
            .map(|header| {
                let slot = ModuleSlot {
                    name: header.name,
                    domain_model: Lazy::unloaded(UnitKey::DomainModel(header.id)),
                    security: Lazy::unloaded(UnitKey::ModuleSecurity(header.id)),
                };
                (header.id, slot)
            })
            .collect();
        let enumerations = index
            .enumerations
            .into_iter()
            .map(|header| {
                let slot = EnumerationSlot {
                    module: header.module,
                    name: header.name,
                    document: Lazy::unloaded(UnitKey::Enumeration(header.id)),
                };
                (header.id, slot)
            })
            .collect();

        Ok(Self {
            backend,
            id_alloc: IdAllocator::new(index.next_id),
            modules,
            enumerations,
            entity_owners: HashMap::new(),
            project_security: Lazy::unloaded(UnitKey::ProjectSecurity),
            project_settings: Lazy::unloaded(UnitKey::ProjectSettings),
            navigation: Lazy::unloaded(UnitKey::Navigation),
            dirty: BTreeSet::new(),
            deleted: BTreeSet::new(),
            index_dirty: false,
            fetches: HashMap::new(),
        })
    }

    /// Give the backend back, dropping any unflushed changes.
    pub fn into_backend(self) -> Box<dyn Backend> {
        self.backend
    }

    /// How many times this model fetched a unit from its backend.
    pub fn fetch_count(&self, key: &UnitKey) -> usize {
        self.fetches.get(key).copied().unwrap_or(0)
    }

    pub fn is_dirty(&self) -> bool {
        self.index_dirty || !self.dirty.is_empty() || !self.deleted.is_empty()
    }

    // ==================== Modules ====================

    pub fn modules(&self) -> impl Iterator<Item = (ModuleId, &str)> + '_ {
        self.modules.iter().map(|(id, slot)| (*id, slot.name.as_str()))
    }

    pub fn module_name(&self, module: ModuleId) -> Option<&str> {
        self.modules.get(&module).map(|slot| slot.name.as_str())
    }

    /// Find a module by its exact name.
    pub fn find_module_by_name(&self, name: &str) -> Option<ModuleId> {
        self.modules
            .iter()
            .find(|(_, slot)| slot.name == name)
            .map(|(id, _)| *id)
    }

    /// Create a module with an empty domain model and an empty security container.
    pub fn create_module(&mut self, name: impl Into<String>) -> ModuleId {
        let id = ModuleId::new(self.id_alloc.alloc());

        // Both containers exist before the module is registered under its name.
        let domain_model = Lazy::loaded(UnitKey::DomainModel(id), DomainModel::default());
        let security = Lazy::loaded(UnitKey::ModuleSecurity(id), ModuleSecurity::default());
        self.dirty.insert(domain_model.key());
        self.dirty.insert(security.key());

        let slot = ModuleSlot {
            name: name.into(),
            domain_model,
            security,
        };
        debug!(module = %id, name = %slot.name, "created module");
        self.modules.insert(id, slot);
        self.index_dirty = true;
        id
    }

    /// Delete a module with everything it owns.
    ///
    /// Cross-module associations in other modules that touch one of the
    /// module's entities are removed along with their member accesses. Every
    /// domain model is loaded first, so a failed fetch leaves the model
    /// unchanged. User roles and navigation are left alone.
    pub fn delete_module(&mut self, module: ModuleId) -> StoreResult<ModuleDeletion> {
        if !self.modules.contains_key(&module) {
            return Err(StoreError::ModuleNotFound(module));
        }
        self.load_domain_models()?;
        let doomed: HashSet<EntityId> = self
            .domain_model(module)
            .map(|dm| dm.entities.iter().map(|e| e.id).collect())
            .unwrap_or_default();

        let slot = self
            .modules
            .remove(&module)
            .ok_or(StoreError::ModuleNotFound(module))?;

        let mut removed_keys = vec![slot.domain_model.key(), slot.security.key()];
        let enumerations: Vec<EnumerationId> = self
            .enumerations
            .iter()
            .filter(|(_, e)| e.module == module)
            .map(|(id, _)| *id)
            .collect();
        for id in &enumerations {
            self.enumerations.remove(id);
            removed_keys.push(UnitKey::Enumeration(*id));
        }
        for key in removed_keys {
            self.dirty.remove(&key);
            self.deleted.insert(key);
        }
        self.entity_owners.retain(|_, owner| *owner != module);

        let mut pruned_associations = Vec::new();
        for (id, other) in self.modules.iter_mut() {
            let Some(dm) = other.domain_model.get_mut() else {
                continue;
            };
            let pruned = dm.prune_associations_touching(&doomed);
            if !pruned.is_empty() {
                self.dirty.insert(UnitKey::DomainModel(*id));
                pruned_associations.extend(pruned);
            }
        }

        self.index_dirty = true;
        info!(
            module = %module,
            name = %slot.name,
            enumerations = enumerations.len(),
            pruned = pruned_associations.len(),
            "deleted module"
        );
        Ok(ModuleDeletion {
            module,
            name: slot.name,
            enumerations,
            pruned_associations,
        })
    }

    // ==================== Domain models ====================

    /// The domain model of a module, if it has been loaded.
    pub fn domain_model(&self, module: ModuleId) -> Option<&DomainModel> {
        self.modules.get(&module)?.domain_model.get()
    }

    /// The domain model of a module, fetching it on first access.
    pub fn load_domain_model(&mut self, module: ModuleId) -> StoreResult<&DomainModel> {
        self.fetch_domain_model(module).map(|dm| &*dm)
    }

    pub fn domain_model_mut(&mut self, module: ModuleId) -> StoreResult<&mut DomainModel> {
        self.dirty.insert(UnitKey::DomainModel(module));
        self.fetch_domain_model(module)
    }

    /// Fetch every domain model that is not loaded yet.
    pub fn load_domain_models(&mut self) -> StoreResult<()> {
        let modules: Vec<ModuleId> = self.modules.keys().copied().collect();
        for module in modules {
            self.fetch_domain_model(module)?;
        }
        Ok(())
    }

    fn fetch_domain_model(&mut self, module: ModuleId) -> StoreResult<&mut DomainModel> {
        let slot = self
            .modules
            .get_mut(&module)
            .ok_or(StoreError::ModuleNotFound(module))?;
        let fresh = !slot.domain_model.is_loaded();
        let mut loader = Loader {
            backend: self.backend.as_mut(),
            fetches: &mut self.fetches,
        };
        let dm = slot.domain_model.load(&mut loader)?;
        if fresh {
            for entity in &dm.entities {
                self.entity_owners.insert(entity.id, module);
            }
        }
        Ok(dm)
    }

    // ==================== Entities ====================

    /// The module whose domain model holds an entity.
    pub fn owning_module(&self, entity: EntityId) -> Option<ModuleId> {
        self.entity_owners.get(&entity).copied()
    }

    pub fn entity(&self, entity: EntityId) -> Option<&Entity> {
        let module = self.owning_module(entity)?;
        self.domain_model(module)?.entity(entity)
    }

    pub fn entity_mut(&mut self, entity: EntityId) -> StoreResult<&mut Entity> {
        let module = self
            .owning_module(entity)
            .ok_or(StoreError::EntityNotFound(entity))?;
        self.domain_model_mut(module)?
            .entity_mut(entity)
            .ok_or(StoreError::EntityNotFound(entity))
    }

    /// `Module.Entity` name of an entity.
    pub fn entity_qualified_name(&self, entity: EntityId) -> Option<QualifiedName> {
        let module = self.owning_module(entity)?;
        let name = &self.entity(entity)?.name;
        Some(QualifiedName::new(self.module_name(module)?, name.as_str()))
    }

    pub fn create_entity(
        &mut self,
        module: ModuleId,
        name: impl Into<String>,
        documentation: impl Into<String>,
        generalization: Generalization,
    ) -> StoreResult<EntityId> {
        let id = EntityId::new(self.id_alloc.alloc());
        let mut entity = Entity::new(id, name, generalization);
        entity.documentation = documentation.into();
        debug!(module = %module, entity = %id, name = %entity.name, "created entity");

        self.domain_model_mut(module)?.entities.push(entity);
        self.entity_owners.insert(id, module);
        Ok(id)
    }

    pub fn attribute(&self, entity: EntityId, attribute: AttributeId) -> Option<&Attribute> {
        self.entity(entity)?.attribute(attribute)
    }

    pub fn create_attribute(
        &mut self,
        entity: EntityId,
        name: impl Into<String>,
        documentation: impl Into<String>,
        attr_type: AttributeType,
        value: StoredValue,
    ) -> StoreResult<AttributeId> {
        let id = AttributeId::new(self.id_alloc.alloc());
        let attribute = Attribute {
            id,
            name: name.into(),
            documentation: documentation.into(),
            attr_type,
            value,
        };
        debug!(
            entity = %entity,
            attribute = %id,
            name = %attribute.name,
            attr_type = attr_type.type_name(),
            "created attribute"
        );

        self.entity_mut(entity)?.attributes.push(attribute);
        Ok(id)
    }

    pub fn create_access_rule(&mut self, entity: EntityId) -> StoreResult<AccessRuleId> {
        let id = AccessRuleId::new(self.id_alloc.alloc());
        self.entity_mut(entity)?.access_rules.push(AccessRule::new(id));
        debug!(entity = %entity, rule = %id, "created access rule");
        Ok(id)
    }

    pub fn access_rule_mut(
        &mut self,
        entity: EntityId,
        rule: AccessRuleId,
    ) -> StoreResult<&mut AccessRule> {
        self.entity_mut(entity)?
            .access_rule_mut(rule)
            .ok_or(StoreError::access_rule_not_found(entity, rule))
    }

    // ==================== Associations ====================

    /// Create an association in the domain model of its parent entity.
    pub fn create_association(
        &mut self,
        kind: AssociationKind,
        name: impl Into<String>,
        parent: EntityId,
        child: EntityId,
    ) -> StoreResult<AssociationId> {
        let module = self
            .owning_module(parent)
            .ok_or(StoreError::EntityNotFound(parent))?;
        if self.owning_module(child).is_none() {
            return Err(StoreError::EntityNotFound(child));
        }

        let id = AssociationId::new(self.id_alloc.alloc());
        let association = Association::new(id, kind, name, parent, child);
        debug!(
            module = %module,
            association = %id,
            name = %association.name,
            cross = association.is_cross_module(),
            "created association"
        );
        self.domain_model_mut(module)?.associations.push(association);
        Ok(id)
    }

    fn association_module(&self, association: AssociationId) -> Option<ModuleId> {
        self.modules.iter().find_map(|(id, slot)| {
            slot.domain_model
                .get()?
                .association(association)
                .map(|_| *id)
        })
    }

    /// An association in any loaded domain model.
    pub fn association(&self, association: AssociationId) -> Option<&Association> {
        let module = self.association_module(association)?;
        self.domain_model(module)?.association(association)
    }

    pub fn association_mut(
        &mut self,
        association: AssociationId,
    ) -> StoreResult<&mut Association> {
        let module = self
            .association_module(association)
            .ok_or(StoreError::AssociationNotFound(association))?;
        self.domain_model_mut(module)?
            .association_mut(association)
            .ok_or(StoreError::AssociationNotFound(association))
    }

    // ==================== Security ====================

    pub fn module_security(&self, module: ModuleId) -> Option<&ModuleSecurity> {
        self.modules.get(&module)?.security.get()
    }

    pub fn load_module_security(&mut self, module: ModuleId) -> StoreResult<&ModuleSecurity> {
        self.fetch_module_security(module).map(|s| &*s)
    }

    pub fn module_security_mut(&mut self, module: ModuleId) -> StoreResult<&mut ModuleSecurity> {
        self.dirty.insert(UnitKey::ModuleSecurity(module));
        self.fetch_module_security(module)
    }

    fn fetch_module_security(&mut self, module: ModuleId) -> StoreResult<&mut ModuleSecurity> {
        let slot = self
            .modules
            .get_mut(&module)
            .ok_or(StoreError::ModuleNotFound(module))?;
        let mut loader = Loader {
            backend: self.backend.as_mut(),
            fetches: &mut self.fetches,
        };
        slot.security.load(&mut loader)
    }

    pub fn create_module_role(
        &mut self,
        module: ModuleId,
        name: impl Into<String>,
    ) -> StoreResult<ModuleRoleId> {
        let id = ModuleRoleId::new(self.id_alloc.alloc());
        let role = ModuleRole {
            id,
            name: name.into(),
            description: String::new(),
        };
        debug!(module = %module, role = %id, name = %role.name, "created module role");
        self.module_security_mut(module)?.module_roles.push(role);
        Ok(id)
    }

    pub fn project_security(&mut self) -> StoreResult<&ProjectSecurity> {
        self.fetch_project_security().map(|s| &*s)
    }

    pub fn project_security_mut(&mut self) -> StoreResult<&mut ProjectSecurity> {
        self.dirty.insert(UnitKey::ProjectSecurity);
        self.fetch_project_security()
    }

    fn fetch_project_security(&mut self) -> StoreResult<&mut ProjectSecurity> {
        let mut loader = Loader {
            backend: self.backend.as_mut(),
            fetches: &mut self.fetches,
        };
        self.project_security.load(&mut loader)
    }

    pub fn create_user_role(&mut self, name: impl Into<String>) -> StoreResult<UserRoleId> {
        let id = UserRoleId::new(self.id_alloc.alloc());
        let role = UserRole::new(id, name);
        debug!(role = %id, name = %role.name, "created user role");
        self.project_security_mut()?.user_roles.push(role);
        Ok(id)
    }

    // ==================== Project settings and navigation ====================

    pub fn project_settings(&mut self) -> StoreResult<&ProjectSettings> {
        self.fetch_project_settings().map(|s| &*s)
    }

    pub fn project_settings_mut(&mut self) -> StoreResult<&mut ProjectSettings> {
        self.dirty.insert(UnitKey::ProjectSettings);
        self.fetch_project_settings()
    }

    fn fetch_project_settings(&mut self) -> StoreResult<&mut ProjectSettings> {
        let mut loader = Loader {
            backend: self.backend.as_mut(),
            fetches: &mut self.fetches,
        };
        self.project_settings.load(&mut loader)
    }

    pub fn navigation(&mut self) -> StoreResult<&NavigationDocument> {
        self.fetch_navigation().map(|n| &*n)
    }

    pub fn navigation_mut(&mut self) -> StoreResult<&mut NavigationDocument> {
        self.dirty.insert(UnitKey::Navigation);
        self.fetch_navigation()
    }

    fn fetch_navigation(&mut self) -> StoreResult<&mut NavigationDocument> {
        let mut loader = Loader {
            backend: self.backend.as_mut(),
            fetches: &mut self.fetches,
        };
        self.navigation.load(&mut loader)
    }

    /// Point a navigation profile's home page at the system home microflow.
    pub fn set_home_page_to_system_default(
        &mut self,
        profile: usize,
        microflow: QualifiedName,
    ) -> StoreResult<()> {
        let profile_ref = self
            .navigation_mut()?
            .profiles
            .get_mut(profile)
            .ok_or(StoreError::ProfileNotFound(profile))?;
        profile_ref.set_home_page_to_system_default(microflow);
        Ok(())
    }

    // ==================== Enumerations ====================

    /// Enumerations owned by a module, in creation order.
    pub fn enumerations_in(&self, module: ModuleId) -> Vec<EnumerationId> {
        self.enumerations
            .iter()
            .filter(|(_, slot)| slot.module == module)
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn enumeration_module(&self, enumeration: EnumerationId) -> Option<ModuleId> {
        self.enumerations.get(&enumeration).map(|slot| slot.module)
    }

    pub fn enumeration_name(&self, enumeration: EnumerationId) -> Option<&str> {
        self.enumerations
            .get(&enumeration)
            .map(|slot| slot.name.as_str())
    }

    pub fn find_enumeration_by_qualified_name(&self, name: &QualifiedName) -> Option<EnumerationId> {
        let module = self.find_module_by_name(name.module())?;
        self.enumerations
            .iter()
            .find(|(_, slot)| slot.module == module && slot.name == name.name())
            .map(|(id, _)| *id)
    }

    /// The enumeration document, if it has been loaded.
    pub fn enumeration(&self, enumeration: EnumerationId) -> Option<&Enumeration> {
        self.enumerations.get(&enumeration)?.document.get()
    }

    pub fn load_enumeration(&mut self, enumeration: EnumerationId) -> StoreResult<&Enumeration> {
        self.fetch_enumeration(enumeration).map(|e| &*e)
    }

    pub fn enumeration_mut(&mut self, enumeration: EnumerationId) -> StoreResult<&mut Enumeration> {
        self.dirty.insert(UnitKey::Enumeration(enumeration));
        self.fetch_enumeration(enumeration)
    }

    fn fetch_enumeration(&mut self, enumeration: EnumerationId) -> StoreResult<&mut Enumeration> {
        let slot = self
            .enumerations
            .get_mut(&enumeration)
            .ok_or(StoreError::EnumerationNotFound(enumeration))?;
        let mut loader = Loader {
            backend: self.backend.as_mut(),
            fetches: &mut self.fetches,
        };
        slot.document.load(&mut loader)
    }

    pub fn create_enumeration(
        &mut self,
        module: ModuleId,
        name: impl Into<String>,
    ) -> StoreResult<EnumerationId> {
        if !self.modules.contains_key(&module) {
            return Err(StoreError::ModuleNotFound(module));
        }
        let id = EnumerationId::new(self.id_alloc.alloc());
        let name = name.into();
        let document = Lazy::loaded(UnitKey::Enumeration(id), Enumeration::new(id, name.clone()));
        self.dirty.insert(document.key());
        debug!(module = %module, enumeration = %id, name = %name, "created enumeration");

        self.enumerations.insert(
            id,
            EnumerationSlot {
                module,
                name,
                document,
            },
        );
        self.index_dirty = true;
        Ok(id)
    }

    /// Append a value to an enumeration.
    pub fn create_enumeration_value(
        &mut self,
        enumeration: EnumerationId,
        name: impl Into<String>,
        caption: Text,
    ) -> StoreResult<EnumerationValueId> {
        let id = EnumerationValueId::new(self.id_alloc.alloc());
        let value = EnumerationValue {
            id,
            name: name.into(),
            caption,
        };
        debug!(enumeration = %enumeration, value = %id, name = %value.name, "created enumeration value");
        self.enumeration_mut(enumeration)?.values.push(value);
        Ok(id)
    }

    // ==================== Persistence ====================

    fn index(&self) -> ProjectIndex {
        ProjectIndex {
            modules: self
                .modules
                .iter()
                .map(|(id, slot)| ModuleHeader {
                    id: *id,
                    name: slot.name.clone(),
                })
                .collect(),
            enumerations: self
                .enumerations
                .iter()
                .map(|(id, slot)| EnumerationHeader {
                    id: *id,
                    module: slot.module,
                    name: slot.name.clone(),
                })
                .collect(),
            next_id: self.id_alloc.next_id,
        }
    }

    /// A copy of a loaded unit's content.
    fn snapshot(&self, key: UnitKey) -> Option<Unit> {
        match key {
            UnitKey::DomainModel(m) => self
                .modules
                .get(&m)?
                .domain_model
                .get()
                .cloned()
                .map(Unit::DomainModel),
            UnitKey::ModuleSecurity(m) => self
                .modules
                .get(&m)?
                .security
                .get()
                .cloned()
                .map(Unit::ModuleSecurity),
            UnitKey::Enumeration(e) => self
                .enumerations
                .get(&e)?
                .document
                .get()
                .cloned()
                .map(Unit::Enumeration),
            UnitKey::ProjectSecurity => self
                .project_security
                .get()
                .cloned()
                .map(Unit::ProjectSecurity),
            UnitKey::ProjectSettings => self
                .project_settings
                .get()
                .cloned()
                .map(Unit::ProjectSettings),
            UnitKey::Navigation => self.navigation.get().cloned().map(Unit::Navigation),
        }
    }

    /// Send every change since the last flush to the backend as one change set.
    ///
    /// On failure nothing is cleared, so the flush can be retried.
    pub fn flush(&mut self) -> StoreResult<FlushStats> {
        if !self.is_dirty() {
            return Ok(FlushStats::default());
        }

        let upserts: Vec<(UnitKey, Unit)> = self
            .dirty
            .iter()
            .filter_map(|key| self.snapshot(*key).map(|unit| (*key, unit)))
            .collect();
        let changes = ChangeSet {
            index: self.index(),
            upserts,
            deletions: self.deleted.iter().copied().collect(),
        };
        let stats = FlushStats {
            upserted: changes.upserts.len(),
            deleted: changes.deletions.len(),
        };

        self.backend.commit(changes)?;
        self.dirty.clear();
        self.deleted.clear();
        self.index_dirty = false;
        info!(upserted = stats.upserted, deleted = stats.deleted, "flushed model");
        Ok(stats)
    }
}
