//! Single-move resolution.
//!
//! [`resolve_move`] applies one committed selection to the battle state:
//!
//! 1. validate actor, move, and target (failures fizzle with a log line)
//! 2. store the move's guard on the actor
//! 3. damage: roll, mitigate, shield, primary
//! 4. steal into the battle's steal pool
//! 5. healing and shield boost
//! 6. status effect templates
//!
//! Unknown references never raise; they resolve to a zero-effect report.

use crate::env::{BattleEnv, BattleRng};
use crate::roll::{Roll, roll_damage, roll_healing, roll_shield};
use crate::state::{
    ActiveStatusEffect, BattleState, MoveDefinition, MoveSelection, ParticipantId,
    StatusEffectKind,
};
use crate::status::{Application, apply_effect};

use super::damage::{DamageReport, Mitigation, apply_damage, mitigate};

/// One template's application attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectGrant {
    pub target: ParticipantId,
    pub kind: StatusEffectKind,
    pub application: Application,
    /// Stored instance when `application` is `Applied`.
    pub instance: Option<ActiveStatusEffect>,
}

/// Everything one move did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveReport {
    pub actor: ParticipantId,
    /// Effective target after redirection of supportive moves.
    pub target: ParticipantId,
    pub move_id: String,
    pub move_name: String,
    /// True when the move resolved to a no-op.
    pub fizzled: bool,
    pub damage_roll: Option<Roll>,
    pub mitigation: Option<Mitigation>,
    pub damage: DamageReport,
    pub stolen: u32,
    pub healed: u32,
    pub shield_gained: u32,
    pub effects: Vec<EffectGrant>,
    pub log: Vec<String>,
}

impl MoveReport {
    fn new(selection: &MoveSelection) -> Self {
        Self {
            actor: selection.actor,
            target: selection.target,
            move_id: selection.move_id.clone(),
            move_name: selection.move_id.clone(),
            fizzled: false,
            damage_roll: None,
            mitigation: None,
            damage: DamageReport::default(),
            stolen: 0,
            healed: 0,
            shield_gained: 0,
            effects: Vec::new(),
            log: Vec::new(),
        }
    }

    fn fizzle(mut self, line: String) -> Self {
        self.fizzled = true;
        self.log.push(line);
        self
    }
}

/// Resolves `selection` against `state`.
pub fn resolve_move(
    state: &mut BattleState,
    env: &BattleEnv<'_>,
    selection: &MoveSelection,
    rng: &mut impl BattleRng,
) -> MoveReport {
    let report = MoveReport::new(selection);

    let Some(actor) = state.participant(selection.actor) else {
        return report.fizzle(format!(
            "Participant {} is not in this battle.",
            selection.actor
        ));
    };
    if actor.is_defeated() {
        let line = format!("{} is down and cannot act.", actor.name);
        return report.fizzle(line);
    }
    let actor_id = actor.id;
    let actor_name = actor.name.clone();
    let actor_level = actor.level;

    let Some(definition) = env.move_definition(&selection.move_id) else {
        return report.fizzle(format!(
            "{actor_name} tried an unknown move ({}).",
            selection.move_id
        ));
    };

    let mut report = report;
    report.move_name = definition.name.clone();

    let target_id = match effective_target(state, &definition, actor_id, selection.target) {
        Ok(target) => target,
        Err(line) => return report.fizzle(line),
    };
    report.target = target_id;

    let target_name = state
        .participant(target_id)
        .map(|p| p.name.clone())
        .unwrap_or_default();
    if target_id == actor_id {
        report
            .log
            .push(format!("{actor_name} uses {}!", definition.name));
    } else {
        report.log.push(format!(
            "{actor_name} uses {} on {target_name}!",
            definition.name
        ));
    }

    if let Some(guard) = definition.guard
        && let Some(actor) = state.participant_mut(actor_id)
    {
        actor.guard = Some(guard);
        report.log.push(format!(
            "{actor_name} braces for impact (-{} flat, -{}%).",
            guard.flat, guard.percent
        ));
    }

    let tables = &env.config().roll_tables;

    if definition.is_offensive() {
        if let Some(roll) = roll_damage(&definition, actor_level, tables, rng)
            && let Some(target) = state.participant_mut(target_id)
        {
            let mitigation = mitigate(roll.value, target.guard, target.status.reduction_percent());
            let damage = apply_damage(target, mitigation.final_damage);
            if roll.is_max_roll && roll.value > 0 {
                report.log.push("A perfect roll!".to_string());
            }
            report.log.push(damage_line(&target_name, &mitigation, &damage));
            if target.is_defeated() {
                report.log.push(format!("{target_name} is defeated!"));
            }
            report.damage_roll = Some(roll);
            report.mitigation = Some(mitigation);
            report.damage = damage;
        }

        if definition.resource_steal > 0
            && let Some(target) = state.participant_mut(target_id)
            && target.is_alive()
        {
            let stolen = target.health.deplete(definition.resource_steal);
            if stolen > 0 {
                let defeated = target.is_defeated();
                state.steal_pool = state.steal_pool.saturating_add(stolen);
                report.stolen = stolen;
                report
                    .log
                    .push(format!("{actor_name} steals {stolen} from {target_name}."));
                if defeated {
                    report.log.push(format!("{target_name} is defeated!"));
                }
            }
        }
    }

    // Offensive moves heal and shield their user; supportive moves their target.
    let beneficiary = if definition.is_offensive() {
        actor_id
    } else {
        target_id
    };

    if let Some(roll) = roll_healing(&definition, actor_level, tables, rng)
        && let Some(recipient) = state.participant_mut(beneficiary)
        && recipient.is_alive()
    {
        report.healed = recipient.health.restore(roll.value);
        report.log.push(format!(
            "{} recovers {} ({}).",
            recipient.name, report.healed, recipient.health
        ));
    }

    if let Some(roll) = roll_shield(&definition, actor_level, tables, rng)
        && let Some(recipient) = state.participant_mut(beneficiary)
        && recipient.is_alive()
    {
        report.shield_gained = recipient.shield.restore(roll.value);
        report.log.push(format!(
            "{}'s shield rises by {} ({}).",
            recipient.name, report.shield_gained, recipient.shield
        ));
    }

    for template in &definition.status_effects {
        let Some(recipient) = state.participant_mut(target_id) else {
            break;
        };
        if recipient.is_defeated() {
            break;
        }
        let application = apply_effect(recipient, template, template.success_chance, actor_id, rng);
        let instance = (application == Application::Applied).then(|| template.instantiate(actor_id));
        report.log.push(effect_line(&recipient.name, template.kind, application));
        report.effects.push(EffectGrant {
            target: target_id,
            kind: template.kind,
            application,
            instance,
        });
    }

    report
}

/// Picks the participant a move actually lands on.
///
/// Offensive moves must name a living opponent of the actor. Supportive moves
/// land on the named participant if it is the actor or an ally, otherwise on
/// the actor.
fn effective_target(
    state: &BattleState,
    definition: &MoveDefinition,
    actor_id: ParticipantId,
    requested: ParticipantId,
) -> Result<ParticipantId, String> {
    let Some(actor) = state.participant(actor_id) else {
        return Err(format!("Participant {actor_id} is not in this battle."));
    };

    if !definition.is_offensive() {
        return Ok(match state.participant(requested) {
            Some(target) if !target.is_opponent_of(actor) => target.id,
            _ => actor_id,
        });
    }

    let Some(target) = state.participant(requested) else {
        return Err(format!(
            "{}'s {} has no target.",
            actor.name, definition.name
        ));
    };
    if target.id == actor_id {
        return Err(format!(
            "{} cannot turn {} on itself.",
            actor.name, definition.name
        ));
    }
    if !target.is_opponent_of(actor) {
        return Err(format!(
            "{} holds back {} against an ally.",
            actor.name, definition.name
        ));
    }
    if target.is_defeated() {
        return Err(format!(
            "{} is already down; {}'s {} finds no mark.",
            target.name, actor.name, definition.name
        ));
    }
    Ok(target.id)
}

fn damage_line(target: &str, mitigation: &Mitigation, damage: &DamageReport) -> String {
    let mut line = format!("{target} takes {} damage", damage.total());
    if damage.absorbed > 0 {
        line.push_str(&format!(" ({} absorbed by shield)", damage.absorbed));
    }
    if mitigation.prevented() > 0 {
        line.push_str(&format!(", {} blocked", mitigation.prevented()));
    }
    line.push('.');
    line
}

fn effect_line(target: &str, kind: StatusEffectKind, application: Application) -> String {
    match application {
        Application::Applied => format!("{target} is affected by {kind}."),
        Application::Cleansed(0) => format!("{target} is cleansed."),
        Application::Cleansed(count) => {
            format!("{target} is cleansed of {count} effect(s).")
        }
        Application::Resisted => format!("{target} resisted {kind}."),
        Application::Dropped => format!("{target} cannot hold another effect; {kind} fades."),
    }
}
