//! Navigation document: profiles, home pages and menus.

use serde::{Deserialize, Serialize};
use weft_core::{ProfileKind, QualifiedName};

/// What a profile shows when a user signs in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HomePage {
    #[default]
    Unset,
    Page(QualifiedName),
    Microflow(QualifiedName),
}

impl HomePage {
    /// Returns true if the home page is a document of the given module.
    pub fn points_into(&self, module: &str) -> bool {
        match self {
            HomePage::Unset => false,
            HomePage::Page(q) | HomePage::Microflow(q) => q.is_in_module(module),
        }
    }
}

/// The action a menu item performs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClientAction {
    #[default]
    NoAction,
    ShowPage(QualifiedName),
    CallMicroflow(QualifiedName),
}

impl ClientAction {
    pub fn targets_page_in(&self, module: &str) -> bool {
        matches!(self, ClientAction::ShowPage(q) if q.is_in_module(module))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub caption: String,
    pub action: ClientAction,
    pub items: Vec<MenuItem>,
}

impl MenuItem {
    pub fn new(caption: impl Into<String>, action: ClientAction) -> Self {
        Self {
            caption: caption.into(),
            action,
            items: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationProfile {
    pub name: String,
    pub kind: ProfileKind,
    pub home_page: HomePage,
    pub menu_items: Vec<MenuItem>,
}

impl NavigationProfile {
    pub fn new(name: impl Into<String>, kind: ProfileKind) -> Self {
        Self {
            name: name.into(),
            kind,
            home_page: HomePage::Unset,
            menu_items: Vec::new(),
        }
    }

    /// Point the home page at the platform's default home microflow.
    pub fn set_home_page_to_system_default(&mut self, microflow: QualifiedName) {
        self.home_page = HomePage::Microflow(microflow);
    }
}

/// The project navigation document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationDocument {
    pub profiles: Vec<NavigationProfile>,
}

impl NavigationDocument {
    /// Index of the first profile of the given kind.
    pub fn profile_index(&self, kind: ProfileKind) -> Option<usize> {
        self.profiles.iter().position(|p| p.kind == kind)
    }
}
