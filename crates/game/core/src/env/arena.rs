//! Arena-level modifiers supplied by the host.
//!
//! Battlefield bonuses (a healing grove, a restorative shrine) are not part of
//! the engine rules. The host injects them through [`ArenaOracle`] and the
//! status tick applies whatever flat heal it reports.

use crate::state::{Participant, Role};

pub trait ArenaOracle: Send + Sync {
    /// Flat heal granted to `owner` during its turn-start tick.
    fn periodic_heal(&self, owner: &Participant) -> u32;
}

/// Arena without modifiers.
#[derive(Clone, Copy, Debug, Default)]
pub struct NeutralArena;

impl ArenaOracle for NeutralArena {
    fn periodic_heal(&self, _owner: &Participant) -> u32 {
        0
    }
}

/// Grants a flat heal every turn, optionally only to one role.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FlatHealArena {
    pub amount: u32,
    pub role: Option<Role>,
}

impl FlatHealArena {
    pub fn new(amount: u32) -> Self {
        Self { amount, role: None }
    }

    pub fn for_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }
}

impl ArenaOracle for FlatHealArena {
    fn periodic_heal(&self, owner: &Participant) -> u32 {
        match self.role {
            Some(role) if role != owner.role => 0,
            _ => self.amount,
        }
    }
}
