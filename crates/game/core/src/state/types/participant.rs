//! Battle participants and their resource state.

use super::common::{ParticipantId, ResourceMeter};
use super::moves::Guard;
use super::status::{ActiveStatusEffect, StatusEffects};

/// Which side of the encounter a participant fights for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    /// The participant controlled from this client.
    Player,
    Ally,
    Opponent,
}

/// Coarse grouping of roles into the two sides of the encounter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    Home,
    Away,
}

impl Role {
    pub const fn side(self) -> Side {
        match self {
            Role::Player | Role::Ally => Side::Home,
            Role::Opponent => Side::Away,
        }
    }
}

/// CPU behavior profile, assigned once at battle setup.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display, strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CpuArchetype {
    /// Favors raw damage and finishing blows.
    Aggressor,
    /// Protects itself before trading blows.
    Guardian,
    /// Leans on status effects and steals.
    Tactician,
    #[default]
    Balanced,
    /// Scripted encounter boss; heavy finisher bias.
    Boss,
}

/// Who decides a participant's moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Controller {
    /// Human input on this client.
    Local,
    /// Human on another client; moves arrive over the move-exchange channel.
    Peer,
    /// Heuristic selection.
    Cpu(CpuArchetype),
}

impl Controller {
    pub const fn is_human(self) -> bool {
        matches!(self, Self::Local | Self::Peer)
    }
}

/// A combatant in the battle.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    pub role: Role,
    pub controller: Controller,
    pub level: u32,
    pub speed: u32,
    /// Primary, health-like resource.
    pub health: ResourceMeter,
    /// Secondary resource that absorbs damage before health.
    pub shield: ResourceMeter,
    pub status: StatusEffects,
    /// Mitigation held until the participant's next action.
    pub guard: Option<Guard>,
    /// Move identifiers this participant may use.
    pub moves: Vec<String>,
}

impl Participant {
    pub fn new(id: ParticipantId, name: impl Into<String>, role: Role, controller: Controller) -> Self {
        Self {
            id,
            name: name.into(),
            role,
            controller,
            level: 1,
            speed: 0,
            health: ResourceMeter::full(100),
            shield: ResourceMeter::new(0, 0),
            status: StatusEffects::empty(),
            guard: None,
            moves: Vec::new(),
        }
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level.max(1);
        self
    }

    pub fn with_speed(mut self, speed: u32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_health(mut self, current: u32, maximum: u32) -> Self {
        self.health = ResourceMeter::new(current, maximum);
        self
    }

    pub fn with_shield(mut self, current: u32, maximum: u32) -> Self {
        self.shield = ResourceMeter::new(current, maximum);
        self
    }

    pub fn with_moves<I, S>(mut self, moves: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.moves = moves.into_iter().map(Into::into).collect();
        self
    }

    pub fn side(&self) -> Side {
        self.role.side()
    }

    pub fn is_defeated(&self) -> bool {
        self.health.is_empty()
    }

    pub fn is_alive(&self) -> bool {
        !self.is_defeated()
    }

    pub fn is_opponent_of(&self, other: &Participant) -> bool {
        self.side() != other.side()
    }

    pub fn snapshot(&self) -> ParticipantSnapshot {
        ParticipantSnapshot {
            id: self.id,
            health: self.health.current,
            shield: self.shield.current,
            effects: self.status.iter().copied().collect(),
            guard: self.guard,
        }
    }

    /// Overwrites mutable combat state from a peer-produced snapshot.
    pub fn restore(&mut self, snapshot: &ParticipantSnapshot) {
        self.health.set(snapshot.health);
        self.shield.set(snapshot.shield);
        self.status = snapshot.effects.iter().copied().collect();
        self.guard = snapshot.guard;
    }
}

/// Resource and effect state of one participant after a resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParticipantSnapshot {
    pub id: ParticipantId,
    pub health: u32,
    pub shield: u32,
    pub effects: Vec<ActiveStatusEffect>,
    pub guard: Option<Guard>,
}
