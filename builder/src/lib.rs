//! Weft Builder
//!
//! Idempotent schema construction over a weft model.
//!
//! Responsibilities:
//! - Sanitize every name entering the model
//! - Get-or-create modules, entities, attributes, associations, enumerations and roles
//! - Keep access rules consistent as members are added
//! - Repair roles and navigation when a module is deleted
//!
//! # Module Structure
//!
//! - `builder` - `SchemaBuilder`, the facade over all operations
//! - `ops/` - operation implementations, one module per manager
//! - `config` - builder defaults and policies
//! - `error` - error types for builder failures

mod builder;
mod config;
mod error;
pub mod ops;

pub use builder::SchemaBuilder;
pub use config::BuilderConfig;
pub use error::{BuildError, BuildResult};
pub use ops::access::{AccessRuleOptions, AccessRuleRef};
pub use ops::association::AssociationOptions;
pub use ops::attribute::AttributeSpec;
pub use ops::module::ModuleRemoval;
