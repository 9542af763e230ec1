use crate::state::{BattleState, ParticipantId, Phase};

/// Signed change of one participant's resources across an engine step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceDelta {
    pub participant: ParticipantId,
    pub shield: i64,
    pub health: i64,
    /// Shield value after the step.
    pub shield_after: u32,
    /// Health value after the step.
    pub health_after: u32,
}

impl ResourceDelta {
    pub fn is_empty(&self) -> bool {
        self.shield == 0 && self.health == 0
    }
}

/// Minimal description of an engine step's impact on the battle state.
///
/// Only the externally persisted quantities are tracked: participant
/// resources (handed to the resource collaborator) and the phase.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StateDelta {
    pub resources: Vec<ResourceDelta>,
    pub phase: Option<(Phase, Phase)>,
    /// Number of log lines appended during the step.
    pub log_lines: usize,
}

impl StateDelta {
    /// Creates a delta by comparing two battle states.
    pub fn from_states(before: &BattleState, after: &BattleState) -> Self {
        let resources = after
            .participants
            .iter()
            .filter_map(|current| {
                let previous = before.participant(current.id)?;
                let delta = ResourceDelta {
                    participant: current.id,
                    shield: i64::from(current.shield.current) - i64::from(previous.shield.current),
                    health: i64::from(current.health.current) - i64::from(previous.health.current),
                    shield_after: current.shield.current,
                    health_after: current.health.current,
                };
                (!delta.is_empty()).then_some(delta)
            })
            .collect();

        let phase = (before.phase != after.phase).then_some((before.phase, after.phase));

        Self {
            resources,
            phase,
            log_lines: after.log.len().saturating_sub(before.log.len()),
        }
    }

    /// Returns true if no tracked state changed.
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty() && self.phase.is_none() && self.log_lines == 0
    }

    pub fn for_participant(&self, id: ParticipantId) -> Option<&ResourceDelta> {
        self.resources.iter().find(|delta| delta.participant == id)
    }
}
