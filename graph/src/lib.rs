//! Weft Graph
//!
//! The application model graph and its persistence seam:
//! - Element types: entities, attributes, associations, access rules, roles,
//!   enumerations, navigation and project settings
//! - Units: the sub-graphs that are fetched and persisted independently
//! - `Lazy<T>` handles with fetch-once caching
//! - `Backend`: the external store, with an in-memory implementation
//! - `Model`: lookups, create-under-parent factories, module deletion and flush

pub mod backend;
pub mod domain;
pub mod enumeration;
mod error;
pub mod export;
mod lazy;
mod model;
pub mod navigation;
pub mod security;
pub mod settings;
pub mod text;
pub mod unit;

pub use backend::{Backend, CommitRecord, FailingBackend, MemoryBackend};
pub use domain::{
    AccessRule, Association, AssociationKind, Attribute, AttributeType, DeleteBehavior,
    DomainModel, Entity, Generalization, Location, MemberAccess, NoGeneralization, StoredValue,
    CURRENT_DATE_TIME,
};
pub use enumeration::{Enumeration, EnumerationValue};
pub use error::{StoreError, StoreResult};
pub use lazy::Lazy;
pub use model::{FlushStats, Model, ModuleDeletion};
pub use navigation::{ClientAction, HomePage, MenuItem, NavigationDocument, NavigationProfile};
pub use security::{ModuleRole, ModuleSecurity, ProjectSecurity, UserRole};
pub use settings::{LanguageSettings, ProjectSettings};
pub use text::{Text, Translation};
pub use unit::{ChangeSet, ProjectIndex, Unit, UnitKey, UnitPayload};
