//! Structured scores for CPU move candidates.
//!
//! Every candidate is scored with the same four components so a decision can
//! be traced back to what drove it:
//!
//! - **is_possible**: the move can reach the target at all
//! - **situation**: how much the move achieves right now (0-100)
//! - **personality**: how strongly the archetype favors this kind of move (0-100)
//! - **modifier**: contextual adjustment (0-200, typically 100)
//!
//! ```text
//! final_score = is_possible × situation × personality × modifier / 10000
//! ```

use battle_core::CpuArchetype;

/// Scoring result for one (move, target) candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    pub is_possible: bool,
    /// Favorability of the current battle state for this candidate (0-100).
    pub situation: u32,
    /// Archetype preference (0-100).
    pub personality: u32,
    /// Contextual adjustment (0-200, typically 100).
    pub modifier: u32,
}

impl Score {
    pub const fn new(is_possible: bool, situation: u32, personality: u32, modifier: u32) -> Self {
        Self {
            is_possible,
            situation,
            personality,
            modifier,
        }
    }

    pub const fn impossible() -> Self {
        Self {
            is_possible: false,
            situation: 0,
            personality: 0,
            modifier: 0,
        }
    }

    /// Final score, 0 when impossible. Max theoretical value is 200.
    pub const fn value(&self) -> u32 {
        if !self.is_possible {
            return 0;
        }
        (self.situation * self.personality * self.modifier) / 10000
    }
}

/// Personality weights for each kind of candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchetypeWeights {
    /// Damage against an opponent.
    pub offense: u32,
    /// Shields, guards, and `reduce`.
    pub defense: u32,
    /// Healing and cleansing.
    pub recovery: u32,
    /// Status effects and steals on an opponent.
    pub affliction: u32,
    /// Blows that can defeat the target outright.
    pub finisher: u32,
}

impl ArchetypeWeights {
    pub const fn new(
        offense: u32,
        defense: u32,
        recovery: u32,
        affliction: u32,
        finisher: u32,
    ) -> Self {
        Self {
            offense,
            defense,
            recovery,
            affliction,
            finisher,
        }
    }

    pub const fn for_archetype(archetype: CpuArchetype) -> Self {
        match archetype {
            CpuArchetype::Aggressor => Self::new(90, 20, 30, 40, 100),
            CpuArchetype::Guardian => Self::new(50, 90, 70, 30, 60),
            CpuArchetype::Tactician => Self::new(50, 40, 50, 90, 70),
            CpuArchetype::Balanced => Self::new(70, 50, 60, 50, 80),
            CpuArchetype::Boss => Self::new(80, 50, 40, 60, 100),
        }
    }
}

impl From<CpuArchetype> for ArchetypeWeights {
    fn from(archetype: CpuArchetype) -> Self {
        Self::for_archetype(archetype)
    }
}
