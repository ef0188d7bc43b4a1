//! Arrondi exact des valeurs temporelles sur une période, en ticks entiers.
//!
//! Fonctions libres et sans état : la valeur arrondie est toujours le premier
//! paramètre, la période le second.

mod duration;
mod instant;
mod types;

pub use duration::{
    checked_round_up_duration, round_down_duration, round_duration, round_up_duration,
};
pub use instant::{checked_round_up, round, round_down, round_up};
pub use types::{MidpointRounding, RoundingError};
