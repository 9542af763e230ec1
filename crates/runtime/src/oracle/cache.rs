//! Administrator override records for the move catalog.
//!
//! [`OverrideCache`] is an explicit cache object: it owns the current
//! override records and a version counter, and is shared by reference
//! with every reader. Each mutation bumps the version and wakes
//! subscribers, so renderers and providers can react to admin edits.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use battle_core::MoveDefinition;
use thiserror::Error;
use tokio::sync::watch;

#[derive(Debug, Error)]
pub enum OverrideError {
    #[error("override source unavailable: {0}")]
    Unavailable(String),
}

/// Version-counted store of override records keyed by move id.
#[derive(Debug)]
pub struct OverrideCache {
    entries: RwLock<HashMap<String, MoveDefinition>>,
    version: watch::Sender<u64>,
}

impl OverrideCache {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            version: watch::channel(0).0,
        }
    }

    pub fn get(&self, id: &str) -> Option<MoveDefinition> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    pub fn ids(&self) -> Vec<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Inserts or replaces one override record.
    pub fn upsert(&self, definition: MoveDefinition) -> u64 {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(definition.id.clone(), definition);
        self.bump()
    }

    /// Replaces every override record at once.
    pub fn replace_all(&self, definitions: impl IntoIterator<Item = MoveDefinition>) -> u64 {
        let fresh: HashMap<_, _> = definitions
            .into_iter()
            .map(|definition| (definition.id.clone(), definition))
            .collect();
        *self.entries.write().unwrap_or_else(PoisonError::into_inner) = fresh;
        self.bump()
    }

    /// Drops every override so reads fall back to catalog defaults until the
    /// next refresh.
    pub fn invalidate(&self) -> u64 {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.bump()
    }

    pub fn version(&self) -> u64 {
        *self.version.borrow()
    }

    /// Receiver that changes whenever the cache does.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }

    fn bump(&self) -> u64 {
        self.version.send_modify(|version| *version += 1);
        let version = self.version();
        tracing::debug!(target: "runtime::catalog", version, "override cache updated");
        version
    }
}

impl Default for OverrideCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Where override records come from (an admin service, a file, a fixture).
#[async_trait]
pub trait OverrideSource: Send + Sync {
    async fn fetch_overrides(&self) -> Result<Vec<MoveDefinition>, OverrideError>;
}

/// In-memory source, editable at runtime.
#[derive(Debug, Default)]
pub struct StaticOverrideSource {
    records: RwLock<Vec<MoveDefinition>>,
    fail: RwLock<bool>,
}

impl StaticOverrideSource {
    pub fn new(records: impl IntoIterator<Item = MoveDefinition>) -> Self {
        Self {
            records: RwLock::new(records.into_iter().collect()),
            fail: RwLock::new(false),
        }
    }

    pub fn set(&self, records: impl IntoIterator<Item = MoveDefinition>) {
        *self.records.write().unwrap_or_else(PoisonError::into_inner) =
            records.into_iter().collect();
    }

    /// Makes subsequent fetches fail until cleared.
    pub fn set_unavailable(&self, unavailable: bool) {
        *self.fail.write().unwrap_or_else(PoisonError::into_inner) = unavailable;
    }
}

#[async_trait]
impl OverrideSource for StaticOverrideSource {
    async fn fetch_overrides(&self) -> Result<Vec<MoveDefinition>, OverrideError> {
        if *self.fail.read().unwrap_or_else(PoisonError::into_inner) {
            return Err(OverrideError::Unavailable("source offline".into()));
        }
        Ok(self
            .records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }
}
