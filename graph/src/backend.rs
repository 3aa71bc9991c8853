//! Backing stores for a model.
//!
//! A [`Backend`] is the external side of the model: it lists what exists,
//! hands out unit contents on request and accepts one change set per flush.

use crate::error::{StoreError, StoreResult};
use crate::navigation::{NavigationDocument, NavigationProfile};
use crate::security::{ProjectSecurity, UserRole};
use crate::settings::{LanguageSettings, ProjectSettings};
use crate::unit::{ChangeSet, ProjectIndex, Unit, UnitKey, UnitPayload};
use std::collections::{BTreeMap, HashMap};
use weft_core::{ProfileKind, UserRoleId};

/// The persistence contract a model is opened against.
pub trait Backend {
    /// The project index. Called once when a model is opened.
    fn index(&mut self) -> StoreResult<ProjectIndex>;

    /// Fetch one unit. `Ok(None)` means the store has no such unit.
    fn fetch(&mut self, key: &UnitKey) -> StoreResult<Option<Unit>>;

    /// Apply a change set atomically.
    fn commit(&mut self, changes: ChangeSet) -> StoreResult<()>;
}

impl<B: Backend + ?Sized> Backend for Box<B> {
    fn index(&mut self) -> StoreResult<ProjectIndex> {
        (**self).index()
    }

    fn fetch(&mut self, key: &UnitKey) -> StoreResult<Option<Unit>> {
        (**self).fetch(key)
    }

    fn commit(&mut self, changes: ChangeSet) -> StoreResult<()> {
        (**self).commit(changes)
    }
}

/// Summary of one applied change set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub sequence: u64,
    pub upserted: Vec<UnitKey>,
    pub deleted: Vec<UnitKey>,
}

/// In-memory backend for tests and simple use cases.
///
/// Units are kept as JSON documents, so every fetch and commit goes through
/// the same serialization a remote store would.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    index: ProjectIndex,
    units: BTreeMap<UnitKey, serde_json::Value>,
    fetches: HashMap<UnitKey, usize>,
    commits: Vec<CommitRecord>,
}

impl MemoryBackend {
    /// A backend with nothing in it, not even the project-level units.
    pub fn bare() -> Self {
        Self::default()
    }

    /// A blank project: `Administrator` and `User` user roles, permissive
    /// security, `en_US` as default language and one responsive profile.
    pub fn new_project() -> StoreResult<Self> {
        let mut backend = Self::bare();
        let mut next = || {
            let id = backend.index.next_id;
            backend.index.next_id += 1;
            UserRoleId::new(id)
        };
        let admin = next();
        let user = next();

        let security = ProjectSecurity {
            user_roles: vec![
                UserRole::new(admin, "Administrator"),
                UserRole::new(user, "User"),
            ],
            ..ProjectSecurity::default()
        };
        let settings = ProjectSettings {
            language: Some(LanguageSettings::new("en_US")),
        };
        let navigation = NavigationDocument {
            profiles: vec![NavigationProfile::new("Responsive", ProfileKind::Responsive)],
        };

        backend.put(UnitKey::ProjectSecurity, security)?;
        backend.put(UnitKey::ProjectSettings, settings)?;
        backend.put(UnitKey::Navigation, navigation)?;
        Ok(backend)
    }

    /// Store a unit directly, bypassing commit.
    pub fn put<T: UnitPayload>(&mut self, key: UnitKey, payload: T) -> StoreResult<()> {
        let doc = serde_json::to_value(payload.into_unit())?;
        self.units.insert(key, doc);
        Ok(())
    }

    /// Replace the project index, bypassing commit.
    pub fn set_index(&mut self, index: ProjectIndex) {
        self.index = index;
    }

    pub fn contains(&self, key: &UnitKey) -> bool {
        self.units.contains_key(key)
    }

    /// How many times a unit was fetched.
    pub fn fetch_count(&self, key: &UnitKey) -> usize {
        self.fetches.get(key).copied().unwrap_or(0)
    }

    /// All change sets applied so far, oldest first.
    pub fn commits(&self) -> &[CommitRecord] {
        &self.commits
    }
}

impl Backend for MemoryBackend {
    fn index(&mut self) -> StoreResult<ProjectIndex> {
        Ok(self.index.clone())
    }

    fn fetch(&mut self, key: &UnitKey) -> StoreResult<Option<Unit>> {
        *self.fetches.entry(*key).or_insert(0) += 1;
        match self.units.get(key) {
            Some(doc) => Ok(Some(serde_json::from_value(doc.clone())?)),
            None => Ok(None),
        }
    }

    fn commit(&mut self, changes: ChangeSet) -> StoreResult<()> {
        // Serialize everything first so a failure leaves the store untouched.
        let mut docs = Vec::with_capacity(changes.upserts.len());
        for (key, unit) in &changes.upserts {
            docs.push((*key, serde_json::to_value(unit)?));
        }

        for key in &changes.deletions {
            self.units.remove(key);
        }
        for (key, doc) in docs {
            self.units.insert(key, doc);
        }
        self.index = changes.index;

        let sequence = self.commits.len() as u64 + 1;
        self.commits.push(CommitRecord {
            sequence,
            upserted: changes.upserts.iter().map(|(k, _)| *k).collect(),
            deleted: changes.deletions,
        });
        Ok(())
    }
}

/// A backend that refuses every operation. Useful for exercising error paths.
#[derive(Debug, Default)]
pub struct FailingBackend;

impl Backend for FailingBackend {
    fn index(&mut self) -> StoreResult<ProjectIndex> {
        Ok(ProjectIndex::default())
    }

    fn fetch(&mut self, key: &UnitKey) -> StoreResult<Option<Unit>> {
        Err(StoreError::backend(format!("fetch of {} refused", key)))
    }

    fn commit(&mut self, _changes: ChangeSet) -> StoreResult<()> {
        Err(StoreError::backend("commit refused"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainModel;
    use weft_core::ModuleId;

    #[test]
    fn test_new_project_has_project_units() {
        let mut backend = MemoryBackend::new_project().unwrap();
        assert!(backend.contains(&UnitKey::ProjectSecurity));
        assert!(backend.contains(&UnitKey::ProjectSettings));
        assert!(backend.contains(&UnitKey::Navigation));
        assert_eq!(backend.index().unwrap().next_id, 3);
    }

    #[test]
    fn test_fetch_missing_unit_is_none() {
        let mut backend = MemoryBackend::bare();
        let key = UnitKey::DomainModel(ModuleId::new(1));
        assert!(backend.fetch(&key).unwrap().is_none());
        assert_eq!(backend.fetch_count(&key), 1);
    }

    #[test]
    fn test_commit_applies_upserts_and_deletions() {
        let mut backend = MemoryBackend::bare();
        let keep = UnitKey::DomainModel(ModuleId::new(1));
        let drop = UnitKey::DomainModel(ModuleId::new(2));
        backend.put(drop, DomainModel::default()).unwrap();

        let changes = ChangeSet {
            index: ProjectIndex {
                next_id: 10,
                ..ProjectIndex::default()
            },
            upserts: vec![(keep, Unit::DomainModel(DomainModel::default()))],
            deletions: vec![drop],
        };
        backend.commit(changes).unwrap();

        assert!(backend.contains(&keep));
        assert!(!backend.contains(&drop));
        assert_eq!(backend.index().unwrap().next_id, 10);
        assert_eq!(backend.commits().len(), 1);
        assert_eq!(backend.commits()[0].upserted, vec![keep]);
    }
}
