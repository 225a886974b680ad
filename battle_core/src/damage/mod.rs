//! Damage system - Move damage, effectiveness and secondary-effect candidates

mod calculation;
mod result;

pub use calculation::{calculate_damage, calculate_move_impact, confusion_self_damage, raw_damage};
pub use result::{DamageOutcome, MoveImpact};
