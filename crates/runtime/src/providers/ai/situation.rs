use battle_core::{BattleState, CpuArchetype, Participant};

use super::scoring::ArchetypeWeights;

/// Everything the heuristic may look at when picking a move.
///
/// Opponents and allies only contain participants still standing. The actor
/// is listed among its allies so supportive moves can target itself.
#[derive(Debug, Clone)]
pub struct Situation<'a> {
    pub actor: &'a Participant,
    pub archetype: CpuArchetype,
    pub opponents: Vec<&'a Participant>,
    pub allies: Vec<&'a Participant>,
}

impl<'a> Situation<'a> {
    pub fn new(actor: &'a Participant, archetype: CpuArchetype) -> Self {
        Self {
            actor,
            archetype,
            opponents: Vec::new(),
            allies: vec![actor],
        }
    }

    /// Reads targets for `actor` from the live battle state.
    pub fn from_state(state: &'a BattleState, actor: &'a Participant, archetype: CpuArchetype) -> Self {
        let opponents = state.live_opponents_of(actor.id);
        let mut allies: Vec<&Participant> = state
            .live_participants()
            .filter(|p| p.id != actor.id && p.side() == actor.side())
            .collect();
        allies.insert(0, actor);
        Self {
            actor,
            archetype,
            opponents,
            allies,
        }
    }

    pub fn with_opponent(mut self, opponent: &'a Participant) -> Self {
        self.opponents.push(opponent);
        self
    }

    /// Supplies a target when no opponent is left to choose from.
    ///
    /// Ignored when opponents exist or when `fallback` is the actor itself.
    pub fn with_fallback_target(mut self, fallback: Option<&'a Participant>) -> Self {
        if self.opponents.is_empty()
            && let Some(target) = fallback
            && target.id != self.actor.id
        {
            self.opponents.push(target);
        }
        self
    }

    pub fn weights(&self) -> ArchetypeWeights {
        ArchetypeWeights::for_archetype(self.archetype)
    }

    pub fn has_opponents(&self) -> bool {
        !self.opponents.is_empty()
    }
}
