//! Move and target selection for CPU participants.
//!
//! Every (move, target) pair is scored with a [`Score`]. A pair that can
//! bring the target's shield and primary resource to zero this action always
//! outranks one that cannot. When nothing scores above zero the first move
//! that has a valid target is used against that target, so a CPU never
//! passes while a move and a target exist.

use battle_core::combat::mitigate;
use battle_core::roll::{self, RollTables};
use battle_core::{MoveDefinition, MoveSelection, Participant, StatusEffectKind};
use tracing::debug;

use super::scoring::{ArchetypeWeights, Score};
use super::situation::Situation;

/// Picks a move and target, or `None` when no move has a valid target.
pub fn select(
    situation: &Situation<'_>,
    moves: &[MoveDefinition],
    tables: &RollTables,
) -> Option<MoveSelection> {
    let weights = situation.weights();
    let mut best: Option<(u32, &MoveDefinition, &Participant)> = None;

    for definition in moves {
        for target in targets_for(situation, definition) {
            let score = score_candidate(situation.actor, definition, target, &weights, tables);
            let value = score.value();
            if value > best.map_or(0, |(current, _, _)| current) {
                best = Some((value, definition, target));
            }
        }
    }

    if let Some((value, definition, target)) = best {
        debug!(
            target: "runtime::cpu",
            actor = %situation.actor.id,
            archetype = %situation.archetype,
            move_id = %definition.id,
            target_id = %target.id,
            score = value,
            "cpu selected move"
        );
        return Some(MoveSelection::new(situation.actor.id, definition.id.clone(), target.id));
    }

    let (definition, target) = moves.iter().find_map(|definition| {
        targets_for(situation, definition)
            .first()
            .map(|target| (definition, *target))
    })?;
    debug!(
        target: "runtime::cpu",
        actor = %situation.actor.id,
        move_id = %definition.id,
        target_id = %target.id,
        "no candidate scored; using first available move"
    );
    Some(MoveSelection::new(situation.actor.id, definition.id.clone(), target.id))
}

/// Valid targets for `definition`. Offensive moves never include the actor.
fn targets_for<'a>(situation: &Situation<'a>, definition: &MoveDefinition) -> Vec<&'a Participant> {
    if definition.is_offensive() {
        situation
            .opponents
            .iter()
            .copied()
            .filter(|target| target.id != situation.actor.id)
            .collect()
    } else {
        situation.allies.clone()
    }
}

pub(crate) fn score_candidate(
    actor: &Participant,
    definition: &MoveDefinition,
    target: &Participant,
    weights: &ArchetypeWeights,
    tables: &RollTables,
) -> Score {
    if definition.is_offensive() {
        if target.id == actor.id {
            return Score::impossible();
        }
        score_offensive(definition, target, weights, tables)
    } else {
        score_supportive(actor, definition, target, weights)
    }
}

fn score_offensive(
    definition: &MoveDefinition,
    target: &Participant,
    weights: &ArchetypeWeights,
    tables: &RollTables,
) -> Score {
    let guard = target.guard;
    let reduce = target.status.reduction_percent();
    let (expected, best_case) = match definition.damage {
        Some(base) => {
            let range = roll::range(
                base,
                definition.level,
                definition.mastery,
                &tables.damage,
                tables,
            );
            let midpoint = range.min + (range.max - range.min) / 2;
            (
                mitigate(midpoint, guard, reduce).final_damage,
                mitigate(range.max, guard, reduce).final_damage,
            )
        }
        None => (0, 0),
    };

    let pool = target.shield.current + target.health.current;
    let steal = definition.resource_steal;
    let reach = best_case + steal;
    if pool > 0 && reach >= pool {
        return Score::new(true, 100, weights.finisher, 200);
    }

    let mut situation = (u64::from(expected + steal) * 100 / u64::from(pool.max(1))) as u32;
    let fresh_effects = definition
        .status_effects
        .iter()
        .filter(|effect| effect.kind != StatusEffectKind::Cleanse && !target.status.has(effect.kind))
        .count() as u32;
    situation += fresh_effects * 15;

    let personality = if expected == 0 || fresh_effects > 0 || steal > 0 {
        weights.affliction.max(if expected > 0 { weights.offense } else { 0 })
    } else {
        weights.offense
    };

    Score::new(true, situation.min(100), personality, 100)
}

fn score_supportive(
    actor: &Participant,
    definition: &MoveDefinition,
    target: &Participant,
    weights: &ArchetypeWeights,
) -> Score {
    let mut best = Score::new(true, 0, 0, 100);
    let mut consider = |situation: u32, personality: u32| {
        let candidate = Score::new(true, situation.min(100), personality, 100);
        if candidate.value() > best.value() {
            best = candidate;
        }
    };

    if definition.healing.is_some() {
        consider(100 - target.health.percent().min(100), weights.recovery);
    }
    if definition.shield_boost.is_some() && target.shield.maximum > 0 {
        consider(100 - target.shield.percent().min(100), weights.defense);
    }
    if definition.guard.is_some() && target.id == actor.id && target.guard.is_none() {
        consider(100 - actor.health.percent().min(100), weights.defense);
    }
    for effect in &definition.status_effects {
        match effect.kind {
            StatusEffectKind::Cleanse => {
                let harmful = target
                    .status
                    .iter()
                    .filter(|active| active.kind != StatusEffectKind::Reduce)
                    .count() as u32;
                consider(harmful * 40, weights.recovery);
            }
            StatusEffectKind::Reduce if !target.status.has(StatusEffectKind::Reduce) => {
                consider(40, weights.defense);
            }
            _ => {}
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::{
        Controller, CpuArchetype, Guard, Magnitude, MoveType, ParticipantId, Role,
        StatusEffectTemplate,
    };

    const CPU: ParticipantId = ParticipantId(1);
    const HERO: ParticipantId = ParticipantId(0);
    const SIDEKICK: ParticipantId = ParticipantId(2);

    fn cpu(archetype: CpuArchetype) -> Participant {
        Participant::new(CPU, "Brute", Role::Opponent, Controller::Cpu(archetype))
            .with_health(60, 60)
            .with_shield(0, 20)
    }

    fn hero(health: u32, shield: u32) -> Participant {
        Participant::new(HERO, "Hero", Role::Player, Controller::Local)
            .with_health(health, 80)
            .with_shield(shield, 20)
    }

    fn strike() -> MoveDefinition {
        MoveDefinition::new("strike", "Strike", MoveType::Attack).with_damage(Magnitude::Fixed(20))
    }

    fn jab() -> MoveDefinition {
        MoveDefinition::new("jab", "Jab", MoveType::Attack).with_damage(Magnitude::Fixed(5))
    }

    fn mend() -> MoveDefinition {
        MoveDefinition::new("mend", "Mend", MoveType::Heal).with_healing(Magnitude::Fixed(15))
    }

    #[test]
    fn prefers_a_finishing_blow() {
        let actor = cpu(CpuArchetype::Guardian);
        let weak = hero(10, 5);
        let sturdy = Participant::new(SIDEKICK, "Squire", Role::Ally, Controller::Peer)
            .with_health(80, 80);
        let situation = Situation::new(&actor, CpuArchetype::Guardian)
            .with_opponent(&sturdy)
            .with_opponent(&weak);

        let pick = select(&situation, &[mend(), jab(), strike()], &RollTables::default()).unwrap();
        assert_eq!(pick.move_id, "strike");
        assert_eq!(pick.target, HERO);
    }

    #[test]
    fn guard_can_rule_out_a_finisher() {
        let actor = cpu(CpuArchetype::Aggressor);
        let mut guarded = hero(18, 0);
        guarded.guard = Some(Guard::new(10, 0));
        let weights = ArchetypeWeights::from(CpuArchetype::Aggressor);

        let score = score_candidate(&actor, &strike(), &guarded, &weights, &RollTables::default());
        assert!(score.modifier < 200);
    }

    #[test]
    fn offensive_moves_never_target_the_actor() {
        let actor = cpu(CpuArchetype::Balanced);
        let situation = Situation::new(&actor, CpuArchetype::Balanced).with_opponent(&actor);

        assert!(select(&situation, &[strike()], &RollTables::default()).is_none());
        let weights = ArchetypeWeights::from(CpuArchetype::Balanced);
        let score = score_candidate(&actor, &strike(), &actor, &weights, &RollTables::default());
        assert_eq!(score, Score::impossible());
    }

    #[test]
    fn falls_back_to_the_first_move_with_a_target() {
        let actor = cpu(CpuArchetype::Balanced);
        let target = hero(80, 20);
        let situation = Situation::new(&actor, CpuArchetype::Balanced).with_opponent(&target);
        let idle = MoveDefinition::new("idle", "Idle", MoveType::Attack);
        let wait = MoveDefinition::new("wait", "Wait", MoveType::Support);

        let pick = select(&situation, &[idle, wait], &RollTables::default()).unwrap();
        assert_eq!(pick.move_id, "idle");
        assert_eq!(pick.target, HERO);
    }

    #[test]
    fn wounded_guardian_heals_itself() {
        let mut actor = cpu(CpuArchetype::Guardian);
        actor.health.set(12);
        let target = hero(80, 20);
        let situation = Situation::new(&actor, CpuArchetype::Guardian).with_opponent(&target);

        let pick = select(&situation, &[jab(), mend()], &RollTables::default()).unwrap();
        assert_eq!(pick.move_id, "mend");
        assert_eq!(pick.target, CPU);
    }

    #[test]
    fn tactician_spreads_fresh_effects() {
        let actor = cpu(CpuArchetype::Tactician);
        let target = hero(80, 20);
        let situation = Situation::new(&actor, CpuArchetype::Tactician).with_opponent(&target);
        let venom = MoveDefinition::new("venom", "Venom", MoveType::Utility)
            .with_damage(Magnitude::Fixed(4))
            .with_effect(StatusEffectTemplate::new(StatusEffectKind::Poison, 3).with_damage(4));

        let pick = select(&situation, &[jab(), venom], &RollTables::default()).unwrap();
        assert_eq!(pick.move_id, "venom");
    }

    #[test]
    fn fallback_target_fills_an_empty_situation() {
        let actor = cpu(CpuArchetype::Boss);
        let target = hero(80, 0);
        let situation = Situation::new(&actor, CpuArchetype::Boss)
            .with_fallback_target(Some(&actor))
            .with_fallback_target(Some(&target));

        assert_eq!(situation.opponents.len(), 1);
        let pick = select(&situation, &[jab()], &RollTables::default()).unwrap();
        assert_eq!(pick.target, HERO);
    }
}
