//! Status effect data carried by participants.
//!
//! Effects are counted in owner turns: `remaining` drops by one each time the
//! owning participant starts an action, and the instance is removed when it
//! reaches zero. Instances are unique per kind except [`StatusEffectKind::Poison`],
//! which stacks. [`StatusEffectKind::Cleanse`] never persists; it is a one-shot
//! clearing action resolved at application time.

use arrayvec::ArrayVec;

use crate::config::BattleConfig;
use crate::state::ParticipantId;

/// Types of status effects.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum StatusEffectKind {
    /// Periodic damage, shield first.
    Burn,
    /// Skips the owner's action.
    Stun,
    /// Direct primary resource loss that bypasses the shield.
    Bleed,
    /// Periodic damage, shield first. Stacks.
    Poison,
    /// Tracked as data only; no resolution path consumes it yet.
    Confuse,
    /// Steals primary resource from the owner and heals the effect source.
    Drain,
    /// Clears every active effect on the target. Never stored.
    Cleanse,
    /// Skips the owner's action.
    Freeze,
    /// Reduces incoming move damage by a percentage.
    Reduce,
}

impl StatusEffectKind {
    /// True for kinds that may hold several instances at once.
    pub const fn stacks(self) -> bool {
        matches!(self, Self::Poison)
    }

    /// True for kinds that cost the owner its action.
    pub const fn skips_turn(self) -> bool {
        matches!(self, Self::Stun | Self::Freeze)
    }
}

/// Catalog description of an effect a move may attach.
///
/// `kind` is required in catalog data; every other field has a default.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffectTemplate {
    pub kind: StatusEffectKind,
    /// Owner turns the effect lasts.
    #[cfg_attr(feature = "serde", serde(default = "default_duration"))]
    pub duration: u32,
    /// Percentage chance (0-100) that the effect lands.
    #[cfg_attr(feature = "serde", serde(default = "default_success_chance"))]
    pub success_chance: u8,
    #[cfg_attr(feature = "serde", serde(default))]
    pub damage_per_turn: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub resource_loss: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub resource_steal: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub heal_per_turn: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub reduction_percent: u8,
    #[cfg_attr(feature = "serde", serde(default))]
    pub trigger_chance: u8,
}

#[cfg(feature = "serde")]
fn default_duration() -> u32 {
    1
}

#[cfg(feature = "serde")]
fn default_success_chance() -> u8 {
    100
}

impl StatusEffectTemplate {
    pub fn new(kind: StatusEffectKind, duration: u32) -> Self {
        Self {
            kind,
            duration,
            success_chance: 100,
            damage_per_turn: 0,
            resource_loss: 0,
            resource_steal: 0,
            heal_per_turn: 0,
            reduction_percent: 0,
            trigger_chance: 0,
        }
    }

    pub fn with_chance(mut self, success_chance: u8) -> Self {
        self.success_chance = success_chance.min(100);
        self
    }

    pub fn with_damage(mut self, damage_per_turn: u32) -> Self {
        self.damage_per_turn = damage_per_turn;
        self
    }

    pub fn with_resource_loss(mut self, resource_loss: u32) -> Self {
        self.resource_loss = resource_loss;
        self
    }

    pub fn with_steal(mut self, resource_steal: u32, heal_per_turn: u32) -> Self {
        self.resource_steal = resource_steal;
        self.heal_per_turn = heal_per_turn;
        self
    }

    pub fn with_reduction(mut self, reduction_percent: u8) -> Self {
        self.reduction_percent = reduction_percent.min(100);
        self
    }

    pub fn with_trigger_chance(mut self, trigger_chance: u8) -> Self {
        self.trigger_chance = trigger_chance.min(100);
        self
    }

    /// Materializes the template as an instance owned by the target.
    pub fn instantiate(&self, source: ParticipantId) -> ActiveStatusEffect {
        ActiveStatusEffect {
            kind: self.kind,
            remaining: self.duration,
            damage_per_turn: self.damage_per_turn,
            resource_loss: self.resource_loss,
            resource_steal: self.resource_steal,
            heal_per_turn: self.heal_per_turn,
            reduction_percent: self.reduction_percent,
            trigger_chance: self.trigger_chance,
            source,
        }
    }
}

/// A status effect instance attached to a participant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveStatusEffect {
    pub kind: StatusEffectKind,
    /// Owner turns left before the effect wears off.
    pub remaining: u32,
    pub damage_per_turn: u32,
    pub resource_loss: u32,
    pub resource_steal: u32,
    pub heal_per_turn: u32,
    pub reduction_percent: u8,
    pub trigger_chance: u8,
    /// Participant whose move applied the effect.
    pub source: ParticipantId,
}

/// Active status effects on a participant, in application order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffects {
    effects: ArrayVec<ActiveStatusEffect, { BattleConfig::MAX_STATUS_EFFECTS }>,
}

impl StatusEffects {
    pub fn empty() -> Self {
        Self {
            effects: ArrayVec::new(),
        }
    }

    /// Adds an instance following the uniqueness rules.
    ///
    /// Stacking kinds append; every other kind replaces any existing instance
    /// of the same kind. Returns false if the list is full.
    pub fn insert(&mut self, effect: ActiveStatusEffect) -> bool {
        if !effect.kind.stacks() {
            self.remove(effect.kind);
        }
        self.effects.try_push(effect).is_ok()
    }

    /// Removes every instance of `kind`.
    pub fn remove(&mut self, kind: StatusEffectKind) {
        self.effects.retain(|e| e.kind != kind);
    }

    /// Removes every instance, returning how many were active.
    pub fn clear(&mut self) -> usize {
        let count = self.effects.len();
        self.effects.clear();
        count
    }

    pub fn has(&self, kind: StatusEffectKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    pub fn count(&self, kind: StatusEffectKind) -> usize {
        self.effects.iter().filter(|e| e.kind == kind).count()
    }

    /// Percentage of incoming damage removed by an active `reduce` effect.
    pub fn reduction_percent(&self) -> u8 {
        self.effects
            .iter()
            .filter(|e| e.kind == StatusEffectKind::Reduce)
            .map(|e| e.reduction_percent)
            .max()
            .unwrap_or(0)
            .min(100)
    }

    /// Decrements every duration by one and drops expired instances.
    ///
    /// Returns the kinds removed, in list order.
    pub fn decrement(&mut self) -> Vec<StatusEffectKind> {
        let mut expired = Vec::new();
        for effect in self.effects.iter_mut() {
            effect.remaining = effect.remaining.saturating_sub(1);
            if effect.remaining == 0 {
                expired.push(effect.kind);
            }
        }
        self.effects.retain(|e| e.remaining > 0);
        expired
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActiveStatusEffect> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.effects.is_full()
    }
}

impl FromIterator<ActiveStatusEffect> for StatusEffects {
    fn from_iter<I: IntoIterator<Item = ActiveStatusEffect>>(iter: I) -> Self {
        let mut effects = Self::empty();
        for effect in iter {
            if effects.effects.try_push(effect).is_err() {
                break;
            }
        }
        effects
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instance(kind: StatusEffectKind, remaining: u32) -> ActiveStatusEffect {
        StatusEffectTemplate::new(kind, remaining).instantiate(ParticipantId(1))
    }

    #[test]
    fn non_stacking_kind_is_replaced() {
        let mut effects = StatusEffects::empty();
        effects.insert(instance(StatusEffectKind::Burn, 2));
        effects.insert(instance(StatusEffectKind::Burn, 5));
        assert_eq!(effects.count(StatusEffectKind::Burn), 1);
        assert_eq!(effects.iter().next().map(|e| e.remaining), Some(5));
    }

    #[test]
    fn poison_stacks() {
        let mut effects = StatusEffects::empty();
        effects.insert(instance(StatusEffectKind::Poison, 2));
        effects.insert(instance(StatusEffectKind::Poison, 3));
        assert_eq!(effects.count(StatusEffectKind::Poison), 2);
    }

    #[test]
    fn decrement_reports_expired_in_order() {
        let mut effects = StatusEffects::empty();
        effects.insert(instance(StatusEffectKind::Stun, 1));
        effects.insert(instance(StatusEffectKind::Burn, 2));
        effects.insert(instance(StatusEffectKind::Bleed, 1));
        assert_eq!(
            effects.decrement(),
            vec![StatusEffectKind::Stun, StatusEffectKind::Bleed]
        );
        assert_eq!(effects.len(), 1);
    }

    #[test]
    fn kind_parses_from_snake_case() {
        assert_eq!("drain".parse::<StatusEffectKind>(), Ok(StatusEffectKind::Drain));
        assert_eq!(StatusEffectKind::Freeze.to_string(), "freeze");
    }
}
