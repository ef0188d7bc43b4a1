use crate::model::Instant;
use chrono::{Local, Offset};

/// Source de « maintenant ».
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Horloge système, décalage local courant ; sature au dernier tick au-delà de la plage.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        let now = Local::now();
        Instant::try_from_datetime(&now)
            .unwrap_or_else(|_| Instant::new(i64::MAX, now.offset().fix()))
    }
}

/// Horloge figée (tests, rejeu).
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub Instant);

impl Clock for FixedClock {
    fn now(&self) -> Instant {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slots::SlotTable;

    #[test]
    fn fixed_clock_drives_current_key() {
        let at: Instant = "2019-04-22T20:41:44+02:00".parse().unwrap();
        let table = SlotTable::quarter_hourly();
        assert_eq!(table.current_key(&FixedClock(at)), "Hour20_30");
    }

    #[test]
    fn system_clock_maps_to_some_slot() {
        let table = SlotTable::hourly();
        let key = table.current_key(&SystemClock);
        assert!(key.as_str().starts_with("Hour"));
    }
}
