use std::collections::HashMap;

use crate::state::MoveDefinition;

/// Oracle providing effective move definitions.
///
/// Implementations resolve administrator overrides before returning, so the
/// engine never sees the raw catalog entry when an override exists.
pub trait MoveOracle: Send + Sync {
    fn definition(&self, id: &str) -> Option<MoveDefinition>;

    /// Identifiers of every move this oracle knows about.
    fn move_ids(&self) -> Vec<String>;
}

/// Move oracle backed by a fixed map.
#[derive(Clone, Debug, Default)]
pub struct StaticMoveOracle {
    moves: HashMap<String, MoveDefinition>,
}

impl StaticMoveOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, definition: MoveDefinition) -> Option<MoveDefinition> {
        self.moves.insert(definition.id.clone(), definition)
    }

    pub fn with(mut self, definition: MoveDefinition) -> Self {
        self.insert(definition);
        self
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

impl FromIterator<MoveDefinition> for StaticMoveOracle {
    fn from_iter<I: IntoIterator<Item = MoveDefinition>>(iter: I) -> Self {
        let mut oracle = Self::new();
        for definition in iter {
            oracle.insert(definition);
        }
        oracle
    }
}

impl MoveOracle for StaticMoveOracle {
    fn definition(&self, id: &str) -> Option<MoveDefinition> {
        self.moves.get(id).cloned()
    }

    fn move_ids(&self) -> Vec<String> {
        let mut ids: Vec<_> = self.moves.keys().cloned().collect();
        ids.sort();
        ids
    }
}
