#![forbid(unsafe_code)]
//! precom-slots — quantification du temps pour le client PreCom.
//!
//! - Instants en ticks de 100 ns + décalage UTC fixe, jamais normalisés.
//! - Arrondi exact (haut, bas, plus proche avec politique de point milieu).
//! - Table des créneaux : heure du jour → `Hour20`, `Hour20_15`, ...
//! - Tout est pur et sans état ; la table se construit une fois et se partage par référence.

pub mod clock;
#[cfg(feature = "serde")]
pub mod io;
pub mod model;
pub mod occupancy;
pub mod rounding;
pub mod slots;

pub use clock::{Clock, FixedClock, SystemClock};
pub use model::{Duration, Instant, TickError};
pub use occupancy::Occupancy;
pub use rounding::{
    checked_round_up, checked_round_up_duration, round, round_down, round_down_duration,
    round_duration, round_up, round_up_duration, MidpointRounding, RoundingError,
};
pub use slots::{Granularity, SlotError, SlotKey, SlotTable};
