//! Serializable summaries of a model for inspection.

use crate::domain::Generalization;
use crate::model::Model;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ModelData {
    pub modules: Vec<ModuleData>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModuleData {
    pub id: u64,
    pub name: String,
    /// False when the domain model was never loaded; `entities` and
    /// `associations` are then empty.
    pub loaded: bool,
    pub entities: Vec<EntityData>,
    pub associations: Vec<AssociationData>,
    pub module_roles: Vec<String>,
    pub enumerations: Vec<EnumerationData>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EntityData {
    pub id: u64,
    pub name: String,
    pub generalization: Option<String>,
    pub attributes: Vec<AttributeData>,
    pub access_rules: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttributeData {
    pub id: u64,
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub default_value: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssociationData {
    pub id: u64,
    pub name: String,
    pub parent: u64,
    pub child: u64,
    pub cross_module: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnumerationData {
    pub id: u64,
    pub name: String,
    /// Value keys in display order. Empty when the enumeration was never loaded.
    pub values: Vec<String>,
}

/// Summarise every loaded part of a model. Nothing is fetched.
pub fn export_model(model: &Model) -> ModelData {
    let mut modules = Vec::new();
    for (id, name) in model.modules() {
        let domain_model = model.domain_model(id);
        let entities = domain_model
            .map(|dm| {
                dm.entities
                    .iter()
                    .map(|e| EntityData {
                        id: e.id.raw(),
                        name: e.name.clone(),
                        generalization: match &e.generalization {
                            Generalization::Generalized(parent) => {
                                Some(parent.to_string())
                            }
                            Generalization::NoGeneralization(_) => None,
                        },
                        attributes: e
                            .attributes
                            .iter()
                            .map(|a| AttributeData {
                                id: a.id.raw(),
                                name: a.name.clone(),
                                type_name: a.attr_type.type_name().to_string(),
                                default_value: a.value.default_value.clone(),
                            })
                            .collect(),
                        access_rules: e.access_rules.len(),
                    })
                    .collect()
            })
            .unwrap_or_default();
        let associations = domain_model
            .map(|dm| {
                dm.associations
                    .iter()
                    .map(|a| AssociationData {
                        id: a.id.raw(),
                        name: a.name.clone(),
                        parent: a.parent.raw(),
                        child: a.child.raw(),
                        cross_module: a.is_cross_module(),
                    })
                    .collect()
            })
            .unwrap_or_default();
        let module_roles = model
            .module_security(id)
            .map(|s| s.module_roles.iter().map(|r| r.name.clone()).collect())
            .unwrap_or_default();
        let enumerations = model
            .enumerations_in(id)
            .into_iter()
            .map(|e| EnumerationData {
                id: e.raw(),
                name: model.enumeration_name(e).unwrap_or_default().to_string(),
                values: model
                    .enumeration(e)
                    .map(|doc| doc.keys().map(str::to_string).collect())
                    .unwrap_or_default(),
            })
            .collect();

        modules.push(ModuleData {
            id: id.raw(),
            name: name.to_string(),
            loaded: domain_model.is_some(),
            entities,
            associations,
            module_roles,
            enumerations,
        });
    }
    ModelData { modules }
}
