//! Roll calculator.
//!
//! Converts a move's base magnitude into a scaled `[min, max]` range and draws
//! a value from it. Damage, healing, and shield boost share the mechanism but
//! read their own multiplier table.
//!
//! ```text
//! fixed base b     -> [b - b * spread%, b]   (min >= 1 when b > 0)
//! level factor     =  1 + level_step% * (move_level - 1)
//! tier boost       =  product of step boosts for tiers 2..=mastery
//! scaled bound     =  round(bound * level factor * tier boost)
//! ```
mod tables;

pub use tables::{MultiplierTable, RollKind, RollTables, StepBoost};

use crate::env::BattleRng;
use crate::state::{Magnitude, MasteryTier, MoveDefinition};

/// Inclusive roll range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RollRange {
    pub min: u32,
    pub max: u32,
}

impl RollRange {
    /// Builds a range, swapping bounds if they arrive reversed.
    pub fn new(min: u32, max: u32) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    pub fn contains(&self, value: u32) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// A drawn value plus the inputs recorded for narration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Roll {
    pub value: u32,
    /// Value hit the top of the range. Narrative only.
    pub is_max_roll: bool,
    pub actor_level: u32,
    pub move_level: u32,
    pub mastery: MasteryTier,
}

/// Scales `base` by move level and mastery tier using `table`.
pub fn range(
    base: Magnitude,
    move_level: u32,
    mastery: MasteryTier,
    table: &MultiplierTable,
    tables: &RollTables,
) -> RollRange {
    let base = base_range(base, tables.base_spread_percent);
    if base.max == 0 {
        return base;
    }

    let level_factor =
        1.0 + f64::from(tables.level_step_percent) / 100.0 * f64::from(move_level.max(1) - 1);
    let boost = table.cumulative(mastery);

    let min = scale(base.min, level_factor * boost.min);
    let max = scale(base.max, level_factor * boost.max).max(min);
    RollRange { min, max }
}

/// Draws uniformly from `range`.
pub fn roll(
    range: RollRange,
    actor_level: u32,
    move_level: u32,
    mastery: MasteryTier,
    rng: &mut impl BattleRng,
) -> Roll {
    let value = rng.range(range.min, range.max);
    Roll {
        value,
        is_max_roll: value == range.max,
        actor_level,
        move_level,
        mastery,
    }
}

/// Range and roll for one magnitude of a move.
pub fn roll_move(
    definition: &MoveDefinition,
    kind: RollKind,
    actor_level: u32,
    tables: &RollTables,
    rng: &mut impl BattleRng,
) -> Option<Roll> {
    let base = match kind {
        RollKind::Damage => definition.damage,
        RollKind::Healing => definition.healing,
        RollKind::Shield => definition.shield_boost,
    }?;
    let range = range(
        base,
        definition.level,
        definition.mastery,
        tables.table(kind),
        tables,
    );
    Some(roll(
        range,
        actor_level,
        definition.level,
        definition.mastery,
        rng,
    ))
}

/// Damage call site.
pub fn roll_damage(
    definition: &MoveDefinition,
    actor_level: u32,
    tables: &RollTables,
    rng: &mut impl BattleRng,
) -> Option<Roll> {
    roll_move(definition, RollKind::Damage, actor_level, tables, rng)
}

/// Healing call site.
pub fn roll_healing(
    definition: &MoveDefinition,
    actor_level: u32,
    tables: &RollTables,
    rng: &mut impl BattleRng,
) -> Option<Roll> {
    roll_move(definition, RollKind::Healing, actor_level, tables, rng)
}

/// Shield-boost call site.
pub fn roll_shield(
    definition: &MoveDefinition,
    actor_level: u32,
    tables: &RollTables,
    rng: &mut impl BattleRng,
) -> Option<Roll> {
    roll_move(definition, RollKind::Shield, actor_level, tables, rng)
}

fn base_range(base: Magnitude, spread_percent: u32) -> RollRange {
    match base {
        Magnitude::Fixed(value) => {
            let spread = (u64::from(value) * u64::from(spread_percent.min(100)) / 100) as u32;
            let mut min = value - spread;
            if value > 0 {
                min = min.max(1);
            }
            RollRange { min, max: value }
        }
        Magnitude::Range { min, max } => RollRange::new(min, max),
    }
}

fn scale(value: u32, factor: f64) -> u32 {
    let scaled = (f64::from(value) * factor).round();
    if scaled <= 0.0 {
        0
    } else if scaled >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        scaled as u32
    }
}
