//! Units: the independently loaded and persisted sub-graphs of a project.

use crate::domain::DomainModel;
use crate::enumeration::Enumeration;
use crate::navigation::NavigationDocument;
use crate::security::{ModuleSecurity, ProjectSecurity};
use crate::settings::ProjectSettings;
use serde::{Deserialize, Serialize};
use std::fmt;
use weft_core::{EnumerationId, ModuleId};

/// Address of a unit in the backing store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UnitKey {
    DomainModel(ModuleId),
    ModuleSecurity(ModuleId),
    Enumeration(EnumerationId),
    ProjectSecurity,
    ProjectSettings,
    Navigation,
}

impl fmt::Display for UnitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitKey::DomainModel(m) => write!(f, "domain_model({})", m),
            UnitKey::ModuleSecurity(m) => write!(f, "module_security({})", m),
            UnitKey::Enumeration(e) => write!(f, "enumeration({})", e),
            UnitKey::ProjectSecurity => f.write_str("project_security"),
            UnitKey::ProjectSettings => f.write_str("project_settings"),
            UnitKey::Navigation => f.write_str("navigation"),
        }
    }
}

/// The content of one unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "body")]
pub enum Unit {
    DomainModel(DomainModel),
    ModuleSecurity(ModuleSecurity),
    Enumeration(Enumeration),
    ProjectSecurity(ProjectSecurity),
    ProjectSettings(ProjectSettings),
    Navigation(NavigationDocument),
}

impl Unit {
    pub fn kind(&self) -> &'static str {
        match self {
            Unit::DomainModel(_) => DomainModel::KIND,
            Unit::ModuleSecurity(_) => ModuleSecurity::KIND,
            Unit::Enumeration(_) => Enumeration::KIND,
            Unit::ProjectSecurity(_) => ProjectSecurity::KIND,
            Unit::ProjectSettings(_) => ProjectSettings::KIND,
            Unit::Navigation(_) => NavigationDocument::KIND,
        }
    }
}

/// A type that is stored as one kind of unit.
pub trait UnitPayload: Sized + Clone {
    const KIND: &'static str;

    /// Extract the payload, returning the unit back if it is of another kind.
    fn from_unit(unit: Unit) -> Result<Self, Unit>;

    fn into_unit(self) -> Unit;
}

macro_rules! unit_payload {
    ($ty:ty, $variant:ident, $kind:literal) => {
        impl UnitPayload for $ty {
            const KIND: &'static str = $kind;

            fn from_unit(unit: Unit) -> Result<Self, Unit> {
                match unit {
                    Unit::$variant(payload) => Ok(payload),
                    other => Err(other),
                }
            }

            fn into_unit(self) -> Unit {
                Unit::$variant(self)
            }
        }
    };
}

unit_payload!(DomainModel, DomainModel, "domain_model");
unit_payload!(ModuleSecurity, ModuleSecurity, "module_security");
unit_payload!(Enumeration, Enumeration, "enumeration");
unit_payload!(ProjectSecurity, ProjectSecurity, "project_security");
unit_payload!(ProjectSettings, ProjectSettings, "project_settings");
unit_payload!(NavigationDocument, Navigation, "navigation");

/// A module as listed in the project index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleHeader {
    pub id: ModuleId,
    pub name: String,
}

/// An enumeration as listed in the project index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumerationHeader {
    pub id: EnumerationId,
    pub module: ModuleId,
    pub name: String,
}

/// The always-available part of a project: which modules and documents
/// exist, and the identifier high-water mark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectIndex {
    pub modules: Vec<ModuleHeader>,
    pub enumerations: Vec<EnumerationHeader>,
    /// Next identifier the store may hand out.
    pub next_id: u64,
}

impl Default for ProjectIndex {
    fn default() -> Self {
        Self {
            modules: Vec::new(),
            enumerations: Vec::new(),
            next_id: 1,
        }
    }
}

/// Everything a flush sends to the backend, applied as one unit.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeSet {
    pub index: ProjectIndex,
    pub upserts: Vec<(UnitKey, Unit)>,
    pub deletions: Vec<UnitKey>,
}
