//! Terminal move input for the local participant.
use std::io::Write;
use std::sync::Arc;

use async_trait::async_trait;
use battle_core::{BattleState, MoveDefinition, MoveSelection, Participant, ParticipantId};
use battle_runtime::{MoveCatalog, MoveProvider, ProviderKind, Result, RuntimeError};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;

/// Reads `<move> [target]` choices from stdin.
///
/// Both numbers are 1-based indices into the printed menus. Without a
/// target, offensive moves hit the first live opponent and everything else
/// targets the actor.
pub struct StdinMoveProvider {
    catalog: Arc<MoveCatalog>,
    lines: Mutex<Lines<BufReader<Stdin>>>,
}

impl StdinMoveProvider {
    pub fn new(catalog: Arc<MoveCatalog>) -> Self {
        Self {
            catalog,
            lines: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
        }
    }
}

#[async_trait]
impl MoveProvider for StdinMoveProvider {
    async fn provide_move(&self, actor: ParticipantId, state: &BattleState) -> Result<MoveSelection> {
        let participant = state
            .participant(actor)
            .ok_or(RuntimeError::UnknownParticipant { id: actor })?;
        let moves: Vec<MoveDefinition> = participant
            .moves
            .iter()
            .filter_map(|id| self.catalog.resolve(id))
            .collect();
        let targets: Vec<&Participant> = state.live_participants().collect();

        println!();
        println!("-- turn {} --", state.turn);
        for target in &targets {
            println!(
                "  {} health {}/{} shield {}/{}",
                target.name,
                target.health.current,
                target.health.maximum,
                target.shield.current,
                target.shield.maximum
            );
        }
        println!("Moves:");
        for (index, definition) in moves.iter().enumerate() {
            println!("  {}. {}", index + 1, definition.name);
        }
        println!("Targets:");
        for (index, target) in targets.iter().enumerate() {
            println!("  {}. {}", index + 1, target.name);
        }

        let mut lines = self.lines.lock().await;
        loop {
            print!("{} > ", participant.name);
            let _ = std::io::stdout().flush();
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) | Err(_) => {
                    return Err(RuntimeError::ProviderExhausted {
                        kind: ProviderKind::Local,
                        participant: actor,
                    });
                }
            };
            match parse_choice(&line, participant, &moves, &targets) {
                Some(selection) => return Ok(selection),
                None => println!("Enter a move number and optionally a target number, e.g. `1 2`."),
            }
        }
    }
}

/// Turns one input line into a selection for `actor`.
pub fn parse_choice(
    line: &str,
    actor: &Participant,
    moves: &[MoveDefinition],
    targets: &[&Participant],
) -> Option<MoveSelection> {
    let mut parts = line.split_whitespace();
    let move_index: usize = parts.next()?.parse().ok()?;
    let definition = moves.get(move_index.checked_sub(1)?)?;

    let target = match parts.next() {
        Some(raw) => {
            let index: usize = raw.parse().ok()?;
            targets.get(index.checked_sub(1)?)?.id
        }
        None if definition.is_offensive() => {
            targets
                .iter()
                .find(|target| target.is_opponent_of(actor))?
                .id
        }
        None => actor.id,
    };
    if parts.next().is_some() {
        return None;
    }

    Some(MoveSelection::new(actor.id, definition.id.clone(), target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::{Controller, CpuArchetype, Magnitude, MoveType, Role};

    fn hero() -> Participant {
        Participant::new(ParticipantId(0), "Hero", Role::Player, Controller::Local)
            .with_health(50, 50)
    }

    fn brute() -> Participant {
        Participant::new(
            ParticipantId(1),
            "Brute",
            Role::Opponent,
            Controller::Cpu(CpuArchetype::Aggressor),
        )
        .with_health(50, 50)
    }

    fn moves() -> Vec<MoveDefinition> {
        vec![
            MoveDefinition::new("strike", "Strike", MoveType::Attack)
                .with_damage(Magnitude::Fixed(10)),
            MoveDefinition::new("mend", "Mend", MoveType::Heal).with_healing(Magnitude::Fixed(10)),
        ]
    }

    #[test]
    fn default_targets_follow_the_move_kind() {
        let (hero, brute) = (hero(), brute());
        let targets = [&hero, &brute];

        let attack = parse_choice("1", &hero, &moves(), &targets).unwrap();
        assert_eq!(attack.move_id, "strike");
        assert_eq!(attack.target, ParticipantId(1));

        let heal = parse_choice(" 2 ", &hero, &moves(), &targets).unwrap();
        assert_eq!(heal.target, ParticipantId(0));
    }

    #[test]
    fn explicit_targets_and_bad_input() {
        let (hero, brute) = (hero(), brute());
        let targets = [&hero, &brute];

        let pick = parse_choice("2 2", &hero, &moves(), &targets).unwrap();
        assert_eq!(pick.target, ParticipantId(1));

        for bad in ["", "0", "3", "1 3", "x", "1 2 3"] {
            assert!(parse_choice(bad, &hero, &moves(), &targets).is_none(), "{bad:?}");
        }
    }
}
