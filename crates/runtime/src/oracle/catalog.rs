//! Override-aware move catalog.
//!
//! Reads check the [`OverrideCache`] first and fall back to the catalog
//! defaults. The synchronous getters read whatever the cache currently
//! holds; the `fetch_*` variants refresh from the [`OverrideSource`] first.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use battle_core::{Magnitude, MoveDefinition, MoveOracle, StatusEffectTemplate};
use tracing::{debug, warn};

use super::cache::{OverrideCache, OverrideError, OverrideSource};

/// Base numeric parameters of a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveMagnitude {
    pub damage: Option<Magnitude>,
    pub healing: Option<Magnitude>,
    pub shield_boost: Option<Magnitude>,
    pub resource_steal: u32,
}

impl From<&MoveDefinition> for MoveMagnitude {
    fn from(definition: &MoveDefinition) -> Self {
        Self {
            damage: definition.damage,
            healing: definition.healing,
            shield_boost: definition.shield_boost,
            resource_steal: definition.resource_steal,
        }
    }
}

pub struct MoveCatalog {
    defaults: HashMap<String, MoveDefinition>,
    overrides: Arc<OverrideCache>,
    source: Option<Arc<dyn OverrideSource>>,
}

impl MoveCatalog {
    pub fn new(defaults: impl IntoIterator<Item = MoveDefinition>) -> Self {
        Self {
            defaults: defaults
                .into_iter()
                .map(|definition| (definition.id.clone(), definition))
                .collect(),
            overrides: Arc::new(OverrideCache::new()),
            source: None,
        }
    }

    /// Shares an existing cache, e.g. one the admin collaborator also holds.
    pub fn with_cache(mut self, overrides: Arc<OverrideCache>) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn with_source(mut self, source: Arc<dyn OverrideSource>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn overrides(&self) -> &Arc<OverrideCache> {
        &self.overrides
    }

    /// Effective definition: override first, then the default.
    pub fn resolve(&self, id: &str) -> Option<MoveDefinition> {
        self.overrides
            .get(id)
            .or_else(|| self.defaults.get(id).cloned())
    }

    pub fn move_magnitude(&self, id: &str) -> Option<MoveMagnitude> {
        self.resolve(id).map(|definition| MoveMagnitude::from(&definition))
    }

    pub fn move_name(&self, id: &str) -> Option<String> {
        self.resolve(id).map(|definition| definition.name)
    }

    pub fn move_description(&self, id: &str) -> Option<String> {
        self.resolve(id).map(|definition| definition.description)
    }

    pub fn move_status_effects(&self, id: &str) -> Vec<StatusEffectTemplate> {
        self.resolve(id)
            .map(|definition| definition.status_effects)
            .unwrap_or_default()
    }

    /// Pulls every override from the source into the cache.
    ///
    /// Returns the new cache version. Without a source this is a no-op that
    /// returns the current version.
    pub async fn refresh(&self) -> Result<u64, OverrideError> {
        let Some(source) = &self.source else {
            return Ok(self.overrides.version());
        };
        let records = source.fetch_overrides().await?;
        debug!(target: "runtime::catalog", count = records.len(), "fetched move overrides");
        Ok(self.overrides.replace_all(records))
    }

    /// Refreshes, logging a failure and keeping the cached records.
    async fn refresh_or_keep(&self) {
        if let Err(error) = self.refresh().await {
            warn!(target: "runtime::catalog", %error, "override refresh failed; using cached records");
        }
    }

    pub async fn fetch_move_magnitude(&self, id: &str) -> Option<MoveMagnitude> {
        self.refresh_or_keep().await;
        self.move_magnitude(id)
    }

    pub async fn fetch_move_name(&self, id: &str) -> Option<String> {
        self.refresh_or_keep().await;
        self.move_name(id)
    }

    pub async fn fetch_move_description(&self, id: &str) -> Option<String> {
        self.refresh_or_keep().await;
        self.move_description(id)
    }

    pub async fn fetch_move_status_effects(&self, id: &str) -> Vec<StatusEffectTemplate> {
        self.refresh_or_keep().await;
        self.move_status_effects(id)
    }
}

impl MoveOracle for MoveCatalog {
    fn definition(&self, id: &str) -> Option<MoveDefinition> {
        self.resolve(id)
    }

    fn move_ids(&self) -> Vec<String> {
        let ids: BTreeSet<String> = self
            .defaults
            .keys()
            .cloned()
            .chain(self.overrides.ids())
            .collect();
        ids.into_iter().collect()
    }
}

impl std::fmt::Debug for MoveCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MoveCatalog")
            .field("defaults", &self.defaults.len())
            .field("overrides", &self.overrides.len())
            .field("version", &self.overrides.version())
            .finish()
    }
}
