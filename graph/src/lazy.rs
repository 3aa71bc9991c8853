//! Lazily fetched unit handles.

use crate::backend::Backend;
use crate::error::{StoreError, StoreResult};
use crate::unit::{UnitKey, UnitPayload};
use std::collections::HashMap;
use tracing::debug;

/// Fetches units from a backend and counts how often each key was fetched.
pub(crate) struct Loader<'a> {
    pub(crate) backend: &'a mut dyn Backend,
    pub(crate) fetches: &'a mut HashMap<UnitKey, usize>,
}

impl Loader<'_> {
    fn fetch<T: UnitPayload>(&mut self, key: UnitKey) -> StoreResult<T> {
        debug!(unit = %key, "fetching unit");
        *self.fetches.entry(key).or_insert(0) += 1;

        let unit = self
            .backend
            .fetch(&key)?
            .ok_or(StoreError::UnitMissing(key))?;
        T::from_unit(unit).map_err(|other| StoreError::UnitKindMismatch {
            key,
            expected: T::KIND,
            actual: other.kind(),
        })
    }
}

/// A handle to a unit that is fetched on first access and cached afterwards.
///
/// Units created during the session start out loaded.
#[derive(Debug, Clone)]
pub struct Lazy<T> {
    key: UnitKey,
    state: Option<T>,
}

impl<T: UnitPayload> Lazy<T> {
    /// A handle to a unit that still lives in the backend.
    pub fn unloaded(key: UnitKey) -> Self {
        Self { key, state: None }
    }

    /// A handle to a unit that already exists in memory.
    pub fn loaded(key: UnitKey, value: T) -> Self {
        Self {
            key,
            state: Some(value),
        }
    }

    pub fn key(&self) -> UnitKey {
        self.key
    }

    pub fn is_loaded(&self) -> bool {
        self.state.is_some()
    }

    /// The cached content, without fetching.
    pub fn get(&self) -> Option<&T> {
        self.state.as_ref()
    }

    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.state.as_mut()
    }

    /// The content, fetching it on first access. A failed fetch leaves the
    /// handle unloaded so a later call can retry.
    pub(crate) fn load(&mut self, loader: &mut Loader<'_>) -> StoreResult<&mut T> {
        let value = match self.state.take() {
            Some(value) => value,
            None => loader.fetch(self.key)?,
        };
        Ok(self.state.insert(value))
    }
}
