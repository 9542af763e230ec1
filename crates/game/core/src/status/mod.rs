//! Status effect engine.
//!
//! Two entry points: [`apply_effect`] attaches a template to a target after a
//! chance roll, and [`tick_turn_start`] runs an owner's per-turn consequences
//! at the start of its action. Neither function touches other participants;
//! linked heals (from `drain`) are reported back for the caller to route.

use crate::combat::apply_damage;
use crate::env::BattleRng;
use crate::state::{Participant, ParticipantId, StatusEffectKind, StatusEffectTemplate};

/// Result of an application attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Application {
    /// Instance stored on the target.
    Applied,
    /// `cleanse` succeeded and removed this many instances.
    Cleansed(usize),
    /// Chance roll failed; nothing changed.
    Resisted,
    /// Chance roll succeeded but the effect list was full.
    Dropped,
}

impl Application {
    /// True when the chance roll succeeded and the effect took hold.
    pub fn applied(self) -> bool {
        matches!(self, Self::Applied | Self::Cleansed(_))
    }
}

/// Rolls `success_chance` and, on success, attaches `template` to `target`.
///
/// `cleanse` clears every active instance instead of being stored. `poison`
/// stacks; every other kind replaces an existing instance of the same kind.
pub fn apply_effect(
    target: &mut Participant,
    template: &StatusEffectTemplate,
    success_chance: u8,
    source: ParticipantId,
    rng: &mut impl BattleRng,
) -> Application {
    if !rng.chance(success_chance) {
        return Application::Resisted;
    }

    if template.kind == StatusEffectKind::Cleanse {
        return Application::Cleansed(target.status.clear());
    }

    if target.status.insert(template.instantiate(source)) {
        Application::Applied
    } else {
        Application::Dropped
    }
}

/// Consequences of one turn-start tick.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickOutcome {
    pub skip_turn: bool,
    pub shield_loss: u32,
    pub health_loss: u32,
    /// Primary resource drained from the owner.
    pub drained: u32,
    /// Heals owed to effect sources, in effect order.
    pub linked_heals: Vec<(ParticipantId, u32)>,
    /// Flat heal granted by the arena.
    pub healed: u32,
    pub expired: Vec<StatusEffectKind>,
    pub log: Vec<String>,
}

/// Runs `owner`'s active effects once, then decrements their durations.
///
/// Periodic damage (`burn`, `poison`) hits the shield first. `bleed` and
/// `drain` bypass the shield and are bounded by the owner's current primary
/// resource. `reduce` and `confuse` have no periodic action. `periodic_heal`
/// is applied after effect processing and before the decrement.
pub fn tick_turn_start(owner: &mut Participant, periodic_heal: u32) -> TickOutcome {
    let mut outcome = TickOutcome::default();

    let mut periodic = 0u32;
    let mut bleed = 0u32;
    let mut drains: Vec<(ParticipantId, u32, u32)> = Vec::new();

    for effect in owner.status.iter() {
        match effect.kind {
            StatusEffectKind::Stun | StatusEffectKind::Freeze => {
                if effect.remaining > 0 {
                    outcome.skip_turn = true;
                }
            }
            StatusEffectKind::Burn | StatusEffectKind::Poison => {
                periodic = periodic.saturating_add(effect.damage_per_turn);
            }
            StatusEffectKind::Bleed => {
                bleed = bleed.saturating_add(effect.resource_loss);
            }
            StatusEffectKind::Drain => {
                drains.push((effect.source, effect.resource_steal, effect.heal_per_turn));
            }
            StatusEffectKind::Reduce | StatusEffectKind::Confuse | StatusEffectKind::Cleanse => {}
        }
    }

    if periodic > 0 {
        let report = apply_damage(owner, periodic);
        outcome.shield_loss += report.absorbed;
        outcome.health_loss += report.health_loss;
        outcome.log.push(format!(
            "{} suffers {} damage from lingering effects.",
            owner.name, periodic
        ));
    }

    if bleed > 0 {
        let lost = owner.health.deplete(bleed);
        outcome.health_loss += lost;
        outcome
            .log
            .push(format!("{} bleeds for {}.", owner.name, lost));
    }

    for (source, steal, heal) in drains {
        let stolen = owner.health.deplete(steal);
        outcome.health_loss += stolen;
        outcome.drained += stolen;
        let owed = if heal > 0 { heal } else { stolen };
        if owed > 0 {
            outcome.linked_heals.push((source, owed));
        }
        outcome
            .log
            .push(format!("{} is drained of {}.", owner.name, stolen));
    }

    if periodic_heal > 0 && owner.is_alive() {
        outcome.healed = owner.health.restore(periodic_heal);
        if outcome.healed > 0 {
            outcome.log.push(format!(
                "{} recovers {} from the arena.",
                owner.name, outcome.healed
            ));
        }
    }

    if outcome.skip_turn {
        outcome
            .log
            .push(format!("{} is unable to act!", owner.name));
    }

    outcome.expired = owner.status.decrement();
    for kind in &outcome.expired {
        outcome
            .log
            .push(format!("{}'s {} wore off.", owner.name, kind));
    }

    outcome
}
