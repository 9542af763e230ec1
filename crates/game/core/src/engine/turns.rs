//! Turn order scheduler.
//!
//! ```text
//! score = speed + priority * priority_weight + random
//! random ~ U[0, jitter_bound), drawn once per entry per round
//! ```
//!
//! Entries are sorted by descending score. Exact ties fall back to the higher
//! random draw, then to the lower participant id, so the result is a strict
//! total order.

use std::cmp::Ordering;

use crate::config::BattleConfig;
use crate::env::BattleRng;
use crate::state::{ParticipantId, ScheduledTurn};

/// Scheduler input for one participant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OrderEntry {
    pub participant: ParticipantId,
    pub speed: u32,
    pub priority: i32,
}

impl OrderEntry {
    pub fn new(participant: ParticipantId, speed: u32, priority: i32) -> Self {
        Self {
            participant,
            speed,
            priority,
        }
    }
}

/// Orders `entries` for one round. Draws exactly one random value per entry,
/// in input order.
pub fn compute_order(
    entries: &[OrderEntry],
    config: &BattleConfig,
    rng: &mut impl BattleRng,
) -> Vec<ScheduledTurn> {
    let mut order: Vec<ScheduledTurn> = entries
        .iter()
        .map(|entry| {
            let random = rng.unit() * config.jitter_bound;
            let score = f64::from(entry.speed)
                + f64::from(entry.priority) * config.priority_weight
                + random;
            ScheduledTurn {
                participant: entry.participant,
                speed: entry.speed,
                priority: entry.priority,
                random,
                score,
            }
        })
        .collect();

    order.sort_by(compare);
    order
}

fn compare(a: &ScheduledTurn, b: &ScheduledTurn) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| b.random.total_cmp(&a.random))
        .then_with(|| a.participant.cmp(&b.participant))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{PcgRng, SequenceRng};

    const A: ParticipantId = ParticipantId(1);
    const B: ParticipantId = ParticipantId(2);

    #[test]
    fn faster_participant_acts_first_almost_always() {
        let config = BattleConfig::default();
        let entries = [OrderEntry::new(B, 60, 0), OrderEntry::new(A, 80, 0)];
        let trials = 10_000;
        let mut a_first: u64 = 0;
        for seed in 0..trials {
            let mut rng = PcgRng::new(seed);
            if compute_order(&entries, &config, &mut rng)[0].participant == A {
                a_first += 1;
            }
        }
        assert!(a_first * 1000 >= trials * 999);
    }

    #[test]
    fn dominant_priority_flips_the_order() {
        let config = BattleConfig::default();
        let entries = [OrderEntry::new(A, 80, 0), OrderEntry::new(B, 60, 1)];
        for seed in 0..500 {
            let order = compute_order(&entries, &config, &mut PcgRng::new(seed));
            assert_eq!(order[0].participant, B);
        }
    }

    #[test]
    fn ties_break_on_random_then_id() {
        let config = BattleConfig::default().with_jitter_bound(0.0);
        let entries = [OrderEntry::new(B, 50, 0), OrderEntry::new(A, 50, 0)];
        let order = compute_order(&entries, &config, &mut SequenceRng::zeros());
        assert_eq!(order[0].participant, A);
        assert_eq!(order[1].participant, B);
    }

    #[test]
    fn score_components_are_recorded() {
        let config = BattleConfig::default();
        let entries = [OrderEntry::new(A, 10, 2)];
        let order = compute_order(&entries, &config, &mut SequenceRng::zeros());
        assert_eq!(order.len(), 1);
        assert_eq!(order[0].random, 0.0);
        assert_eq!(order[0].score, 210.0);
    }
}
