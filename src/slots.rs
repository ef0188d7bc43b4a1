use crate::clock::Clock;
use crate::model::{Duration, Instant, TICKS_PER_DAY, TICKS_PER_MINUTE};
use crate::rounding::round_down;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlotError {
    #[error("invalid granularity {0}: must be a positive whole number of minutes dividing one day")]
    InvalidGranularity(Duration),
    #[error("invalid granularity: {0} minutes is out of the tick range")]
    GranularityOutOfRange(i64),
}

/// Largeur d'un créneau : nombre entier de minutes, strictement positif, divisant 24 h.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Granularity(Duration);

impl Granularity {
    pub const QUARTER_HOUR: Granularity = Granularity(Duration::from_minutes(15));
    pub const HOUR: Granularity = Granularity(Duration::from_minutes(60));

    pub fn new(period: Duration) -> Result<Self, SlotError> {
        let t = period.ticks();
        if t <= 0 || t % TICKS_PER_MINUTE != 0 || TICKS_PER_DAY % t != 0 {
            return Err(SlotError::InvalidGranularity(period));
        }
        Ok(Self(period))
    }

    pub fn from_minutes(minutes: i64) -> Result<Self, SlotError> {
        let period = Duration::checked_from_minutes(minutes)
            .ok_or(SlotError::GranularityOutOfRange(minutes))?;
        Self::new(period)
    }

    pub fn as_duration(&self) -> Duration {
        self.0
    }

    pub fn minutes(&self) -> i64 {
        self.0.total_minutes()
    }

    pub fn slots_per_day(&self) -> usize {
        (TICKS_PER_DAY / self.0.ticks()) as usize
    }
}

/// Taille de créneau déployée côté service.
impl Default for Granularity {
    fn default() -> Self {
        Self::QUARTER_HOUR
    }
}

/// Clé de créneau, utilisée telle quelle comme nom de champ JSON côté service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SlotKey(String);

impl SlotKey {
    /// `HourH` pile sur l'heure, `HourH_MM` sinon.
    fn for_time_of_day(tod: Duration) -> Self {
        let mut buf = itoa::Buffer::new();
        let mut key = String::with_capacity(10);
        key.push_str("Hour");
        key.push_str(buf.format(tod.hours()));
        let minute = tod.minutes();
        if minute != 0 {
            key.push('_');
            if minute < 10 {
                key.push('0');
            }
            key.push_str(buf.format(minute));
        }
        Self(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for SlotKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for SlotKey {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for SlotKey {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Table immuable heure-du-jour quantifiée → clé de créneau.
///
/// Construite une fois à partir d'une [`Granularity`], puis partagée par
/// référence ; aucune écriture après construction.
#[derive(Debug, Clone)]
pub struct SlotTable {
    granularity: Granularity,
    // index i ↔ heure du jour i * granularité
    keys: Vec<SlotKey>,
}

impl SlotTable {
    pub fn build(granularity: Granularity) -> Self {
        let step = granularity.as_duration();
        let mut keys = Vec::with_capacity(granularity.slots_per_day());
        let mut tod = Duration::ZERO;
        while tod < Duration::DAY {
            keys.push(SlotKey::for_time_of_day(tod));
            tod = tod + step;
        }
        #[cfg(feature = "logging")]
        tracing::debug!(
            granularity_minutes = granularity.minutes(),
            slots = keys.len(),
            "slot table built"
        );
        Self { granularity, keys }
    }

    /// Valide la période puis construit la table.
    pub fn from_period(period: Duration) -> Result<Self, SlotError> {
        Ok(Self::build(Granularity::new(period)?))
    }

    pub fn hourly() -> Self {
        Self::build(Granularity::HOUR)
    }

    pub fn quarter_hourly() -> Self {
        Self::build(Granularity::QUARTER_HOUR)
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Clé d'une heure du jour déjà quantifiée ; `None` hors table.
    pub fn get(&self, time_of_day: Duration) -> Option<&SlotKey> {
        let t = time_of_day.ticks();
        let step = self.granularity.as_duration().ticks();
        if t < 0 || t % step != 0 {
            return None;
        }
        self.keys.get((t / step) as usize)
    }

    /// Clé du créneau contenant `instant` (heure locale, décalage de l'instant).
    pub fn map_to_key(&self, instant: Instant) -> &SlotKey {
        let tod = round_down(instant, self.granularity.as_duration()).time_of_day();
        match self.get(tod) {
            Some(key) => key,
            None => unreachable!(
                "time of day {tod} not aligned on granularity {}",
                self.granularity.as_duration()
            ),
        }
    }

    /// Clé du créneau courant selon `clock`.
    pub fn current_key<C: Clock + ?Sized>(&self, clock: &C) -> &SlotKey {
        self.map_to_key(clock.now())
    }

    /// Couples (heure du jour, clé) dans l'ordre de la journée.
    pub fn iter(&self) -> impl Iterator<Item = (Duration, &SlotKey)> + '_ {
        let step = self.granularity.as_duration().ticks();
        self.keys
            .iter()
            .enumerate()
            .map(move |(i, key)| (Duration::from_ticks(i as i64 * step), key))
    }
}

impl Default for SlotTable {
    fn default() -> Self {
        Self::build(Granularity::default())
    }
}
