//! Combat resolution.
//!
//! Pure functions that apply a committed move to the battle state. Damage
//! flows through a fixed pipeline:
//!
//! ```text
//! roll -> flat guard -> percent guard -> reduce effect -> shield -> primary
//! ```

pub mod damage;
pub mod resolve;

pub use damage::{DamageReport, Mitigation, apply_damage, mitigate};
pub use resolve::{EffectGrant, MoveReport, resolve_move};
