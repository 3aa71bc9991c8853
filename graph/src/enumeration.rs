//! Enumerations and their values.

use crate::text::Text;
use serde::{Deserialize, Serialize};
use weft_core::{EnumerationId, EnumerationValueId};

/// One captioned constant of an enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumerationValue {
    pub id: EnumerationValueId,
    pub name: String,
    pub caption: Text,
}

/// A named, ordered set of values. Value order is display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enumeration {
    pub id: EnumerationId,
    pub name: String,
    pub documentation: String,
    pub values: Vec<EnumerationValue>,
}

impl Enumeration {
    pub fn new(id: EnumerationId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            documentation: String::new(),
            values: Vec::new(),
        }
    }

    pub fn value(&self, id: EnumerationValueId) -> Option<&EnumerationValue> {
        self.values.iter().find(|v| v.id == id)
    }

    pub fn value_by_name(&self, name: &str) -> Option<&EnumerationValue> {
        self.values.iter().find(|v| v.name == name)
    }

    /// Value keys in display order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.values.iter().map(|v| v.name.as_str())
    }
}
