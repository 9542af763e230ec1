//! Move catalog data.
//!
//! Moves are immutable catalog entries. Administrator overrides are resolved
//! before a definition reaches the engine, so everything here is already the
//! effective shape.

use super::status::StatusEffectTemplate;

/// Broad move type; decides who a move may target.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum MoveType {
    Attack,
    Defense,
    Heal,
    Utility,
    Support,
}

impl MoveType {
    /// Offensive moves target an opponent; the rest target the actor or an ally.
    pub const fn is_offensive(self) -> bool {
        matches!(self, Self::Attack | Self::Utility)
    }
}

/// Base magnitude for damage, healing, or shield boost.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Magnitude {
    /// A single value; the roll range spreads below it.
    Fixed(u32),
    /// An explicit inclusive range.
    Range { min: u32, max: u32 },
}

impl Magnitude {
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Fixed(value) => *value == 0,
            Self::Range { max, .. } => *max == 0,
        }
    }
}

/// Move upgrade level, 1-10. Tiers above 5 are "ascended".
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MasteryTier(u8);

impl MasteryTier {
    pub const MIN: Self = Self(1);
    pub const MAX: Self = Self(10);
    pub const LAST_STANDARD: u8 = 5;

    /// Creates a tier, clamping into `1..=10`.
    pub fn new(tier: u8) -> Self {
        Self(tier.clamp(Self::MIN.0, Self::MAX.0))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn is_ascended(self) -> bool {
        self.0 > Self::LAST_STANDARD
    }
}

impl Default for MasteryTier {
    fn default() -> Self {
        Self::MIN
    }
}

/// Incoming damage mitigation granted by a defense move until the holder's
/// next action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Guard {
    pub flat: u32,
    pub percent: u8,
}

impl Guard {
    pub fn new(flat: u32, percent: u8) -> Self {
        Self {
            flat,
            percent: percent.min(100),
        }
    }
}

/// Effective move definition after override resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveDefinition {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub kind: MoveType,
    pub damage: Option<Magnitude>,
    pub healing: Option<Magnitude>,
    pub shield_boost: Option<Magnitude>,
    pub resource_steal: u32,
    pub priority: i32,
    pub level: u32,
    pub mastery: MasteryTier,
    pub guard: Option<Guard>,
    pub status_effects: Vec<StatusEffectTemplate>,
}

impl MoveDefinition {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: MoveType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            category: String::new(),
            kind,
            damage: None,
            healing: None,
            shield_boost: None,
            resource_steal: 0,
            priority: 0,
            level: 1,
            mastery: MasteryTier::MIN,
            guard: None,
            status_effects: Vec::new(),
        }
    }

    pub fn with_damage(mut self, damage: Magnitude) -> Self {
        self.damage = Some(damage);
        self
    }

    pub fn with_healing(mut self, healing: Magnitude) -> Self {
        self.healing = Some(healing);
        self
    }

    pub fn with_shield_boost(mut self, shield_boost: Magnitude) -> Self {
        self.shield_boost = Some(shield_boost);
        self
    }

    pub fn with_steal(mut self, resource_steal: u32) -> Self {
        self.resource_steal = resource_steal;
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level.max(1);
        self
    }

    pub fn with_mastery(mut self, mastery: MasteryTier) -> Self {
        self.mastery = mastery;
        self
    }

    pub fn with_guard(mut self, guard: Guard) -> Self {
        self.guard = Some(guard);
        self
    }

    pub fn with_effect(mut self, effect: StatusEffectTemplate) -> Self {
        self.status_effects.push(effect);
        self
    }

    pub fn is_offensive(&self) -> bool {
        self.kind.is_offensive()
    }
}
