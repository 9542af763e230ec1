//! Mastery multiplier tables.
//!
//! Each destination tier `t >= 2` has its own `(min, max)` boost. A move at
//! tier `t` applies the boost of every step `2..=t` cumulatively, so the table
//! is a fixed lookup rather than a common ratio. Tiers 1-5 read the standard
//! half of the table and tiers 6-10 the ascended half.

use crate::state::MasteryTier;

/// Boost applied to both range bounds when a move reaches a tier.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StepBoost {
    pub min: f64,
    pub max: f64,
}

impl StepBoost {
    pub const IDENTITY: Self = Self::new(1.0, 1.0);

    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Halves the part of each boost above 1.0.
    pub fn gentler(self) -> Self {
        Self::new(1.0 + (self.min - 1.0) / 2.0, 1.0 + (self.max - 1.0) / 2.0)
    }
}

/// Per-tier boosts for one roll kind.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MultiplierTable {
    /// Destination tiers 2..=5.
    pub standard: [StepBoost; 4],
    /// Destination tiers 6..=10.
    pub ascended: [StepBoost; 5],
}

impl MultiplierTable {
    /// Default table shared by damage and healing.
    pub fn standard() -> Self {
        Self {
            standard: [
                StepBoost::new(1.05, 1.10),
                StepBoost::new(1.05, 1.12),
                StepBoost::new(1.08, 1.15),
                StepBoost::new(1.10, 1.20),
            ],
            ascended: [
                StepBoost::new(1.15, 1.25),
                StepBoost::new(1.15, 1.30),
                StepBoost::new(1.20, 1.35),
                StepBoost::new(1.20, 1.40),
                StepBoost::new(1.25, 1.50),
            ],
        }
    }

    /// Standard table with every boost halved above 1.0; used for shields.
    pub fn gentle() -> Self {
        let base = Self::standard();
        Self {
            standard: base.standard.map(StepBoost::gentler),
            ascended: base.ascended.map(StepBoost::gentler),
        }
    }

    /// Boost for stepping up into `tier`. Tier 1 has no step.
    pub fn step(&self, tier: u8) -> StepBoost {
        match tier {
            2..=5 => self.standard[usize::from(tier - 2)],
            6..=10 => self.ascended[usize::from(tier - 6)],
            _ => StepBoost::IDENTITY,
        }
    }

    /// Product of every step boost from tier 2 up to `tier`.
    pub fn cumulative(&self, tier: MasteryTier) -> StepBoost {
        (2..=tier.get()).fold(StepBoost::IDENTITY, |acc, t| {
            let step = self.step(t);
            StepBoost::new(acc.min * step.min, acc.max * step.max)
        })
    }
}

/// Which magnitude a roll is for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum RollKind {
    Damage,
    Healing,
    Shield,
}

/// Every table and scaling constant the roll calculator reads.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RollTables {
    pub damage: MultiplierTable,
    pub healing: MultiplierTable,
    pub shield: MultiplierTable,
    /// Bonus per move level above 1, in percent.
    pub level_step_percent: u32,
    /// Spread below a fixed base value, in percent.
    pub base_spread_percent: u32,
}

impl RollTables {
    pub const DEFAULT_LEVEL_STEP_PERCENT: u32 = 10;
    pub const DEFAULT_BASE_SPREAD_PERCENT: u32 = 20;

    pub fn table(&self, kind: RollKind) -> &MultiplierTable {
        match kind {
            RollKind::Damage => &self.damage,
            RollKind::Healing => &self.healing,
            RollKind::Shield => &self.shield,
        }
    }
}

impl Default for RollTables {
    fn default() -> Self {
        Self {
            damage: MultiplierTable::standard(),
            healing: MultiplierTable::standard(),
            shield: MultiplierTable::gentle(),
            level_step_percent: Self::DEFAULT_LEVEL_STEP_PERCENT,
            base_spread_percent: Self::DEFAULT_BASE_SPREAD_PERCENT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn tier_one_is_identity() {
        let table = MultiplierTable::standard();
        assert_eq!(table.cumulative(MasteryTier::MIN), StepBoost::IDENTITY);
    }

    #[test]
    fn boosts_accumulate_across_both_halves() {
        let table = MultiplierTable::standard();
        let tier3 = table.cumulative(MasteryTier::new(3));
        assert!(close(tier3.min, 1.05 * 1.05));
        assert!(close(tier3.max, 1.10 * 1.12));

        let tier6 = table.cumulative(MasteryTier::new(6));
        assert!(close(tier6.max, 1.10 * 1.12 * 1.15 * 1.20 * 1.25));
    }

    #[test]
    fn gentle_table_halves_each_boost() {
        let gentle = MultiplierTable::gentle();
        let step = gentle.step(10);
        assert!(close(step.min, 1.125));
        assert!(close(step.max, 1.25));
    }
}
