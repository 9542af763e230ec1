//! Phase transitions.
//!
//! ```text
//! duel:      selection -> execution -> opponent_turn -> selection (turn + 1)
//!            (a leading peer shifts the boundary: turn + 1 after execution)
//! skirmish:  selection (collect all) -> execution (one entry per event)
//!            -> selection (turn + 1)
//! any non-terminal phase -> escaped
//! execution / opponent_turn -> victory | defeat | cutscene
//! cutscene -> victory | defeat
//! ```

use crate::combat::resolve_move;
use crate::env::{BattleEnv, BattleRng};
use crate::state::{
    BattleMode, BattleOutcome, BattleResult, BattleState, MoveSelection, ParticipantId, Phase,
    ResourceDelta, RewardDeltas, Side,
};
use crate::status::{Application, tick_turn_start};

use super::errors::EngineError;
use super::outcome::{BattleEvent, ResolvedMove};
use super::turns::{OrderEntry, compute_order};

/// Side results of a transition, beyond the state mutation itself.
#[derive(Debug, Default)]
pub(super) struct Transition {
    pub resolved: Vec<ResolvedMove>,
    pub cutscene: Option<ParticipantId>,
}

pub(super) fn apply(
    state: &mut BattleState,
    env: &BattleEnv<'_>,
    event: &BattleEvent,
    rng: &mut impl BattleRng,
) -> Result<Transition, EngineError> {
    if state.phase.is_terminal() {
        return Err(EngineError::BattleOver { phase: state.phase });
    }

    let mut transition = Transition::default();
    match (state.phase, state.mode, event) {
        (_, _, BattleEvent::Escape) => finish(state, BattleResult::Escape),

        (Phase::Selection, BattleMode::Duel, BattleEvent::Select(selection)) => {
            duel_select(state, selection)?
        }
        (Phase::Execution, BattleMode::Duel, BattleEvent::Execute) => {
            duel_execute(state, env, rng, &mut transition)?
        }
        (Phase::OpponentTurn, BattleMode::Duel, BattleEvent::OpponentAct(selection)) => {
            duel_opponent_act(state, env, selection, rng, &mut transition)?
        }
        (Phase::OpponentTurn, BattleMode::Duel, BattleEvent::ApplyRemote(resolved)) => {
            duel_apply_remote(state, resolved, &mut transition)?
        }

        (Phase::Selection, BattleMode::Skirmish, BattleEvent::Select(selection)) => {
            skirmish_select(state, env, selection, rng)?
        }
        (Phase::Execution, BattleMode::Skirmish, BattleEvent::Execute) => {
            skirmish_execute(state, env, rng, &mut transition)
        }

        (Phase::Cutscene, _, BattleEvent::ResolveCutscene { victory }) => finish(
            state,
            if *victory {
                BattleResult::Victory
            } else {
                BattleResult::Defeat
            },
        ),

        (phase, _, event) => {
            return Err(EngineError::UnexpectedEvent {
                phase,
                event: event.name(),
            });
        }
    }

    Ok(transition)
}

// ============================================================================
// Duel
// ============================================================================

fn duel_select(state: &mut BattleState, selection: &MoveSelection) -> Result<(), EngineError> {
    if selection.actor != state.local {
        return Err(EngineError::WrongActor {
            expected: state.local,
            actual: selection.actor,
        });
    }
    ensure_can_act(state, selection.actor)?;

    state.selection = Some(selection.clone());
    state.phase = Phase::Execution;
    Ok(())
}

fn duel_execute(
    state: &mut BattleState,
    env: &BattleEnv<'_>,
    rng: &mut impl BattleRng,
    transition: &mut Transition,
) -> Result<(), EngineError> {
    let selection = state.selection.take().ok_or(EngineError::MissingSelection)?;
    let closes_round = state.peer_leads();

    let resolved = take_turn(state, env, &selection, rng);
    transition.resolved.push(resolved);

    if !settle_if_over(state, transition) {
        if closes_round {
            next_round(state);
        }
        state.phase = Phase::OpponentTurn;
    }
    Ok(())
}

fn duel_opponent_act(
    state: &mut BattleState,
    env: &BattleEnv<'_>,
    selection: &MoveSelection,
    rng: &mut impl BattleRng,
    transition: &mut Transition,
) -> Result<(), EngineError> {
    expect_duel_opponent(state, selection.actor)?;

    let resolved = take_turn(state, env, selection, rng);
    transition.resolved.push(resolved);

    if !settle_if_over(state, transition) {
        end_opponent_turn(state);
    }
    Ok(())
}

fn duel_apply_remote(
    state: &mut BattleState,
    resolved: &ResolvedMove,
    transition: &mut Transition,
) -> Result<(), EngineError> {
    expect_duel_opponent(state, resolved.actor)?;

    apply_remote(state, resolved);

    if !settle_if_over(state, transition) {
        end_opponent_turn(state);
    }
    Ok(())
}

/// Hands control back to the local participant. The turn counter only
/// advances when the opponent's move closed the round.
fn end_opponent_turn(state: &mut BattleState) {
    if state.peer_leads() {
        state.phase = Phase::Selection;
    } else {
        next_round(state);
    }
}

fn expect_duel_opponent(state: &BattleState, actor: ParticipantId) -> Result<(), EngineError> {
    let expected = state
        .duel_opponent()
        .map(|p| p.id)
        .ok_or(EngineError::UnknownParticipant { id: actor })?;
    if actor != expected {
        return Err(EngineError::WrongActor { expected, actual: actor });
    }
    Ok(())
}

/// Replays a peer-resolved action on local state.
///
/// Resource deltas are applied relative to local values so concurrent local
/// changes are preserved. The actor's own effects and guard come from its
/// snapshot; effects it granted to others are inserted individually.
pub(super) fn apply_remote(state: &mut BattleState, resolved: &ResolvedMove) {
    for delta in &resolved.deltas {
        if let Some(participant) = state.participant_mut(delta.participant) {
            apply_signed(&mut participant.shield, delta.shield);
            apply_signed(&mut participant.health, delta.health);
        }
    }

    if let Some(snapshot) = resolved.snapshot_of(resolved.actor)
        && let Some(actor) = state.participant_mut(resolved.actor)
    {
        actor.status = snapshot.effects.iter().copied().collect();
        actor.guard = snapshot.guard;
    }

    for grant in &resolved.effects {
        if grant.target == resolved.actor {
            continue;
        }
        let Some(target) = state.participant_mut(grant.target) else {
            continue;
        };
        match (grant.application, grant.instance) {
            (Application::Applied, Some(instance)) => {
                target.status.insert(instance);
            }
            (Application::Cleansed(_), _) => {
                target.status.clear();
            }
            _ => {}
        }
    }

    state.steal_pool = state.steal_pool.saturating_add(resolved.stolen);
    state.log.extend(resolved.log.iter().cloned());
}

fn apply_signed(meter: &mut crate::state::ResourceMeter, delta: i64) {
    let magnitude = u32::try_from(delta.unsigned_abs()).unwrap_or(u32::MAX);
    if delta < 0 {
        meter.deplete(magnitude);
    } else {
        meter.restore(magnitude);
    }
}

// ============================================================================
// Skirmish
// ============================================================================

fn skirmish_select(
    state: &mut BattleState,
    env: &BattleEnv<'_>,
    selection: &MoveSelection,
    rng: &mut impl BattleRng,
) -> Result<(), EngineError> {
    ensure_can_act(state, selection.actor)?;
    if state.round.selections.contains_key(&selection.actor) {
        return Err(EngineError::DuplicateSelection {
            id: selection.actor,
        });
    }

    state
        .round
        .selections
        .insert(selection.actor, selection.clone());

    if !state.pending_selectors().is_empty() {
        return Ok(());
    }

    let entries: Vec<OrderEntry> = state
        .round
        .selections
        .values()
        .filter_map(|selection| {
            let participant = state.participant(selection.actor)?;
            let priority = env
                .move_definition(&selection.move_id)
                .map_or(0, |definition| definition.priority);
            Some(OrderEntry::new(participant.id, participant.speed, priority))
        })
        .collect();

    state.round.order = compute_order(&entries, env.config(), rng);
    state.round.cursor = 0;

    let names: Vec<String> = state
        .round
        .order
        .iter()
        .filter_map(|turn| state.participant(turn.participant))
        .map(|p| p.name.clone())
        .collect();
    state.log.push(format!(
        "Turn {} order: {}.",
        state.turn,
        names.join(", ")
    ));
    state.phase = Phase::Execution;
    Ok(())
}

fn skirmish_execute(
    state: &mut BattleState,
    env: &BattleEnv<'_>,
    rng: &mut impl BattleRng,
    transition: &mut Transition,
) {
    let Some(entry) = state.round.order.get(state.round.cursor).copied() else {
        next_round(state);
        return;
    };
    state.round.cursor += 1;

    let selection = state.round.selections.get(&entry.participant).cloned();
    let actor_alive = state
        .participant(entry.participant)
        .is_some_and(|p| p.is_alive());

    match selection {
        Some(selection) if actor_alive => {
            let resolved = take_turn(state, env, &selection, rng);
            transition.resolved.push(resolved);
        }
        _ => {
            if let Some(actor) = state.participant(entry.participant) {
                let line = format!("{} is down; turn skipped.", actor.name);
                state.log.push(line);
            }
        }
    }

    if settle_if_over(state, transition) {
        return;
    }
    if state.round.is_finished() {
        next_round(state);
    }
}

// ============================================================================
// Shared
// ============================================================================

fn ensure_can_act(state: &BattleState, id: ParticipantId) -> Result<(), EngineError> {
    let participant = state
        .participant(id)
        .ok_or(EngineError::UnknownParticipant { id })?;
    if participant.is_defeated() {
        return Err(EngineError::DefeatedParticipant { id });
    }
    Ok(())
}

/// Runs one participant's action: guard expiry, effect tick, then the move
/// unless the tick cost the action.
fn take_turn(
    state: &mut BattleState,
    env: &BattleEnv<'_>,
    selection: &MoveSelection,
    rng: &mut impl BattleRng,
) -> ResolvedMove {
    let actor_id = selection.actor;
    let before: Vec<(ParticipantId, u32, u32)> = state
        .participants
        .iter()
        .map(|p| (p.id, p.shield.current, p.health.current))
        .collect();
    let log_start = state.log.len();

    let mut resolved = ResolvedMove {
        actor: actor_id,
        target: selection.target,
        move_id: selection.move_id.clone(),
        move_name: selection.move_id.clone(),
        turn: state.turn,
        skipped: false,
        fizzled: false,
        is_max_roll: false,
        stolen: 0,
        deltas: Vec::new(),
        effects: Vec::new(),
        snapshot: Vec::new(),
        log: Vec::new(),
    };

    let heal = state
        .participant(actor_id)
        .map_or(0, |actor| env.periodic_heal(actor));
    let tick = match state.participant_mut(actor_id) {
        Some(actor) => {
            actor.guard = None;
            Some(tick_turn_start(actor, heal))
        }
        None => None,
    };

    if let Some(tick) = tick {
        state.log.extend(tick.log);
        for (source, amount) in tick.linked_heals {
            if let Some(source) = state.participant_mut(source)
                && source.is_alive()
            {
                let gained = source.health.restore(amount);
                if gained > 0 {
                    let line = format!("{} absorbs {} life.", source.name, gained);
                    state.log.push(line);
                }
            }
        }

        let fell = state
            .participant(actor_id)
            .is_some_and(|actor| actor.is_defeated());
        if fell {
            if let Some(actor) = state.participant(actor_id) {
                let line = format!("{} succumbs before acting.", actor.name);
                state.log.push(line);
            }
            resolved.skipped = true;
        } else if tick.skip_turn {
            resolved.skipped = true;
        }
    }

    if !resolved.skipped {
        let report = resolve_move(state, env, selection, rng);
        resolved.target = report.target;
        resolved.move_name = report.move_name;
        resolved.fizzled = report.fizzled;
        resolved.is_max_roll = report.damage_roll.is_some_and(|roll| roll.is_max_roll);
        resolved.stolen = report.stolen;
        resolved.effects = report.effects;
        state.log.extend(report.log);
    }

    resolved.deltas = before
        .into_iter()
        .filter_map(|(id, shield, health)| {
            let current = state.participant(id)?;
            let delta = ResourceDelta {
                participant: id,
                shield: i64::from(current.shield.current) - i64::from(shield),
                health: i64::from(current.health.current) - i64::from(health),
                shield_after: current.shield.current,
                health_after: current.health.current,
            };
            (!delta.is_empty()).then_some(delta)
        })
        .collect();

    resolved.snapshot = [actor_id, resolved.target]
        .into_iter()
        .enumerate()
        .filter(|(index, id)| *index == 0 || *id != actor_id)
        .filter_map(|(_, id)| state.participant(id).map(|p| p.snapshot()))
        .collect();

    resolved.log = state.log.since(log_start).to_vec();
    resolved
}

fn next_round(state: &mut BattleState) {
    state.round.clear();
    state.selection = None;
    state.turn += 1;
    state.phase = Phase::Selection;
}

/// Moves to a terminal or cutscene phase if the battle should stop.
///
/// Returns true when the battle left the normal round flow.
fn settle_if_over(state: &mut BattleState, transition: &mut Transition) -> bool {
    if state.side_defeated(Side::Away) {
        finish(state, BattleResult::Victory);
        return true;
    }
    if state.side_defeated(Side::Home) {
        finish(state, BattleResult::Defeat);
        return true;
    }

    if let Some(script) = state.scripted_defeat
        && let Some(target) = state.participant(script.target)
        && target.health.percent() <= script.threshold_percent
    {
        let line = format!("{} falls to a scripted defeat!", target.name);
        state.log.push(line);
        state.phase = Phase::Cutscene;
        transition.cutscene = Some(script.target);
        return true;
    }

    false
}

/// Enters a terminal phase and records the settlement.
///
/// Victory credits the local participant with the steal pool plus the
/// opponents' remaining primary resource; defeat credits the lead opponent
/// with the pool plus the home side's remainder. Escape forfeits the pool.
fn finish(state: &mut BattleState, result: BattleResult) {
    let (phase, recipient, resource) = match result {
        BattleResult::Victory => (
            Phase::Victory,
            state.local,
            state.steal_pool.saturating_add(state.side_health(Side::Away)),
        ),
        BattleResult::Defeat => (
            Phase::Defeat,
            state.duel_opponent().map_or(state.local, |p| p.id),
            state.steal_pool.saturating_add(state.side_health(Side::Home)),
        ),
        BattleResult::Escape => (Phase::Escaped, state.local, 0),
    };

    let line = match result {
        BattleResult::Victory => format!("Victory! {resource} resource claimed."),
        BattleResult::Defeat => "Defeat...".to_string(),
        BattleResult::Escape if state.steal_pool > 0 => {
            format!("Escaped, forfeiting {} stolen resource.", state.steal_pool)
        }
        BattleResult::Escape => "Escaped safely.".to_string(),
    };
    state.log.push(line);

    state.phase = phase;
    state.selection = None;
    state.round.clear();
    state.outcome = Some(BattleOutcome {
        result,
        rewards: RewardDeltas {
            recipient,
            resource,
            turns: state.turn,
        },
    });
}
