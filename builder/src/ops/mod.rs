//! Builder operation implementations.
//!
//! Each manager is implemented in its own module as free functions over a
//! `Model`; `SchemaBuilder` bundles them with a sanitizer and a configuration.

pub mod access;
pub mod association;
pub mod attribute;
pub mod entity;
pub mod enumeration;
pub mod module;
pub mod security;
