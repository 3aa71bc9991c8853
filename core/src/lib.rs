//! Weft Core Types
//!
//! This crate provides the foundational types used throughout Weft:
//! - Identity types for every model element (ModuleId, EntityId, ...)
//! - Member references (attribute or association)
//! - Qualified names (`Module.Element`)
//! - Shared enumerations (access rights, association kinds, delete behavior, security level)
//! - Name sanitization against a reserved-word list
//! - Common error types

mod error;
mod id;
mod kinds;
mod name;
mod qualified;

pub use error::*;
pub use id::*;
pub use kinds::*;
pub use name::*;
pub use qualified::*;
