use crate::roll::RollTables;

/// Battle configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleConfig {
    /// Weight applied to a move's priority modifier when ordering a round.
    pub priority_weight: f64,

    /// Exclusive upper bound of the per-entry tie-breaking jitter.
    pub jitter_bound: f64,

    /// Multiplier tables used by the damage, healing, and shield-boost rolls.
    pub roll_tables: RollTables,
}

impl BattleConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum number of active status effect instances per participant.
    pub const MAX_STATUS_EFFECTS: usize = 16;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_PRIORITY_WEIGHT: f64 = 100.0;
    pub const DEFAULT_JITTER_BOUND: f64 = 10.0;

    pub fn new() -> Self {
        Self {
            priority_weight: Self::DEFAULT_PRIORITY_WEIGHT,
            jitter_bound: Self::DEFAULT_JITTER_BOUND,
            roll_tables: RollTables::default(),
        }
    }

    pub fn with_priority_weight(mut self, priority_weight: f64) -> Self {
        self.priority_weight = priority_weight;
        self
    }

    pub fn with_jitter_bound(mut self, jitter_bound: f64) -> Self {
        self.jitter_bound = jitter_bound.max(0.0);
        self
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}
