//! Damage mitigation and application.

use crate::state::{Guard, Participant};

/// Incoming damage after each mitigation stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mitigation {
    pub raw: u32,
    pub after_flat: u32,
    pub after_percent: u32,
    /// Damage that reaches the shield.
    pub final_damage: u32,
}

impl Mitigation {
    pub fn prevented(&self) -> u32 {
        self.raw - self.final_damage
    }
}

/// Reduces rolled damage by the defender's guard and `reduce` effect.
///
/// # Order
///
/// ```text
/// after_flat    = raw - guard.flat                      (floored at 0)
/// after_percent = after_flat * (100 - guard.percent) / 100
/// final         = after_percent * (100 - reduce%) / 100
/// ```
///
/// Integer division rounds each stage down.
pub fn mitigate(raw: u32, guard: Option<Guard>, reduce_percent: u8) -> Mitigation {
    let guard = guard.unwrap_or_default();
    let after_flat = raw.saturating_sub(guard.flat);
    let after_percent = percent_of(after_flat, 100 - u32::from(guard.percent.min(100)));
    let final_damage = percent_of(after_percent, 100 - u32::from(reduce_percent.min(100)));
    Mitigation {
        raw,
        after_flat,
        after_percent,
        final_damage,
    }
}

/// How a hit split between shield and primary resource.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageReport {
    /// Taken by the shield.
    pub absorbed: u32,
    /// Taken by the primary resource.
    pub health_loss: u32,
}

impl DamageReport {
    pub fn total(&self) -> u32 {
        self.absorbed + self.health_loss
    }
}

/// Applies `amount` to the shield first and the remainder to health.
///
/// Both meters clamp at zero.
pub fn apply_damage(target: &mut Participant, amount: u32) -> DamageReport {
    let absorbed = target.shield.deplete(amount);
    let health_loss = target.health.deplete(amount - absorbed);
    DamageReport {
        absorbed,
        health_loss,
    }
}

fn percent_of(value: u32, percent: u32) -> u32 {
    (u64::from(value) * u64::from(percent) / 100) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Controller, ParticipantId, Role};

    fn defender(shield: u32, health: u32) -> Participant {
        Participant::new(ParticipantId(1), "Wall", Role::Opponent, Controller::Local)
            .with_shield(shield, 50)
            .with_health(health, 100)
    }

    #[test]
    fn shield_absorbs_damage_up_to_its_value() {
        let mut target = defender(10, 60);
        let report = apply_damage(&mut target, 10);
        assert_eq!(report, DamageReport { absorbed: 10, health_loss: 0 });
        assert_eq!(target.health.current, 60);
        assert_eq!(target.shield.current, 0);
    }

    #[test]
    fn overflow_reaches_primary_exactly() {
        for (shield, damage) in [(0, 7), (4, 9), (12, 40)] {
            let mut target = defender(shield, 60);
            apply_damage(&mut target, damage);
            assert_eq!(target.shield.current, 0);
            assert_eq!(target.health.current, 60 - (damage - shield));
        }
    }

    #[test]
    fn health_never_goes_below_zero() {
        let mut target = defender(0, 5);
        let report = apply_damage(&mut target, 50);
        assert_eq!(report.health_loss, 5);
        assert!(target.is_defeated());
    }

    #[test]
    fn mitigation_applies_flat_then_percent_then_reduce() {
        let result = mitigate(40, Some(Guard::new(10, 50)), 20);
        assert_eq!(result.after_flat, 30);
        assert_eq!(result.after_percent, 15);
        assert_eq!(result.final_damage, 12);
        assert_eq!(result.prevented(), 28);

        assert_eq!(mitigate(5, Some(Guard::new(10, 0)), 0).final_damage, 0);
        assert_eq!(mitigate(33, None, 0).final_damage, 33);
    }
}
