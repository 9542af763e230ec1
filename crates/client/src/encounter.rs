//! Builds the battle setup from client configuration and roster content.
use anyhow::{Context, Result, bail, ensure};
use battle_content::RosterEntry;
use battle_core::{BattleSetup, Controller, Participant, ParticipantId, Role};

use crate::config::ClientConfig;

/// Moves every human-controlled participant starts with.
pub const PLAYER_MOVES: [&str; 5] = ["strike", "quick_jab", "siphon", "brace", "mend"];

const PLAYER_HEALTH: u32 = 100;
const PLAYER_SHIELD: u32 = 20;
const PLAYER_SPEED: u32 = 25;

fn player(id: ParticipantId, role: Role, controller: Controller) -> Participant {
    Participant::new(id, format!("Player {}", id.0 + 1), role, controller)
        .with_speed(PLAYER_SPEED)
        .with_health(PLAYER_HEALTH, PLAYER_HEALTH)
        .with_shield(PLAYER_SHIELD, PLAYER_SHIELD)
        .with_moves(PLAYER_MOVES)
}

/// Participants for this client's view of the battle.
///
/// With an exchange directory the battle is a duel between participants 0
/// and 1, each client controlling one of them. Otherwise the local player
/// fights the configured roster entries.
pub fn build_setup(config: &ClientConfig, roster: &[RosterEntry]) -> Result<BattleSetup> {
    let local = ParticipantId(config.player_id);

    if config.is_networked() {
        ensure!(
            config.player_id <= 1,
            "networked duels use player ids 0 and 1, got {}",
            config.player_id
        );
        let peer = ParticipantId(1 - config.player_id);
        let mut participants = vec![
            player(local, Role::Player, Controller::Local),
            player(peer, Role::Opponent, Controller::Peer),
        ];
        participants.sort_by_key(|p| p.id);
        return Ok(BattleSetup::new(config.seed, local, participants));
    }

    if config.opponents.is_empty() {
        bail!("at least one opponent is required");
    }

    let mut participants = vec![player(local, Role::Player, Controller::Local)];
    let mut next_id = (0u32..).filter(|id| *id != config.player_id);
    let lineup = config
        .allies
        .iter()
        .map(|id| (id, Role::Ally))
        .chain(config.opponents.iter().map(|id| (id, Role::Opponent)));
    for (entry_id, role) in lineup {
        let entry = roster
            .iter()
            .find(|entry| &entry.id == entry_id)
            .with_context(|| format!("unknown roster entry {entry_id}"))?;
        let id = next_id.next().context("participant ids exhausted")?;
        participants.push(entry.into_participant(ParticipantId(id), role));
    }

    Ok(BattleSetup::new(config.seed, local, participants))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use battle_content::RosterLoader;
    use battle_core::{BattleMode, BattleState, Phase};

    fn roster() -> Vec<RosterEntry> {
        RosterLoader::load_embedded().unwrap()
    }

    #[test]
    fn local_duel_against_the_default_brute() {
        let config = ClientConfig {
            seed: 9,
            ..ClientConfig::default()
        };
        let setup = build_setup(&config, &roster()).unwrap();
        assert_eq!(setup.participants.len(), 2);
        assert_eq!(setup.participants[1].name, "Cave Brute");

        let state = BattleState::new(setup).unwrap();
        assert_eq!(state.mode, BattleMode::Duel);
    }

    #[test]
    fn allies_make_a_skirmish_and_ids_skip_the_player() {
        let config = ClientConfig {
            player_id: 1,
            allies: vec!["iron_warden".into()],
            opponents: vec!["cave_brute".into(), "hex_weaver".into()],
            ..ClientConfig::default()
        };
        let setup = build_setup(&config, &roster()).unwrap();
        let ids: Vec<u32> = setup.participants.iter().map(|p| p.id.0).collect();
        assert_eq!(ids, vec![1, 0, 2, 3]);
        assert_eq!(setup.participants[1].role, Role::Ally);

        let state = BattleState::new(setup).unwrap();
        assert_eq!(state.mode, BattleMode::Skirmish);
        assert_eq!(state.phase, Phase::Selection);
    }

    #[test]
    fn unknown_roster_entries_are_rejected() {
        let config = ClientConfig {
            opponents: vec!["dragon".into()],
            ..ClientConfig::default()
        };
        let err = build_setup(&config, &roster()).unwrap_err();
        assert!(err.to_string().contains("dragon"));
    }

    #[test]
    fn networked_setups_mirror_each_other() {
        let networked = |player_id| ClientConfig {
            seed: 5,
            player_id,
            exchange_dir: Some(PathBuf::from("/tmp/exchange")),
            ..ClientConfig::default()
        };
        let first = build_setup(&networked(0), &[]).unwrap();
        let second = build_setup(&networked(1), &[]).unwrap();

        assert_eq!(first.participants[0].controller, Controller::Local);
        assert_eq!(second.participants[0].controller, Controller::Peer);
        assert_eq!(first.participants[1].name, second.participants[1].name);
        assert!(build_setup(&networked(2), &[]).is_err());
    }
}
