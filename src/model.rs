use chrono::{DateTime, FixedOffset, NaiveDate, Offset, TimeDelta, TimeZone};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Un tick = 100 ns.
pub const TICKS_PER_MILLISECOND: i64 = 10_000;
pub const TICKS_PER_SECOND: i64 = 1_000 * TICKS_PER_MILLISECOND;
pub const TICKS_PER_MINUTE: i64 = 60 * TICKS_PER_SECOND;
pub const TICKS_PER_HOUR: i64 = 60 * TICKS_PER_MINUTE;
pub const TICKS_PER_DAY: i64 = 24 * TICKS_PER_HOUR;

/// Ticks de l'époque Unix (1970-01-01T00:00:00) comptés depuis 0001-01-01T00:00:00.
pub const UNIX_EPOCH_TICKS: i64 = 719_162 * TICKS_PER_DAY;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TickError {
    #[error("value out of the tick range")]
    OutOfRange,
    #[error(transparent)]
    Parse(#[from] chrono::ParseError),
}

/// Instant absolu : ticks de l'horloge locale depuis 0001-01-01T00:00:00 + décalage UTC fixe.
///
/// Égalité, ordre et hash portent uniquement sur les ticks ; le décalage est
/// conservé tel quel et n'est jamais normalisé vers UTC.
#[derive(Debug, Clone, Copy)]
pub struct Instant {
    ticks: i64,
    offset: FixedOffset,
}

impl Instant {
    pub fn new(ticks: i64, offset: FixedOffset) -> Self {
        Self { ticks, offset }
    }

    pub fn ticks(&self) -> i64 {
        self.ticks
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Même décalage, autres ticks.
    pub fn with_ticks(&self, ticks: i64) -> Self {
        Self {
            ticks,
            offset: self.offset,
        }
    }

    /// Durée écoulée depuis minuit (heure locale).
    pub fn time_of_day(&self) -> Duration {
        Duration::from_ticks(self.ticks.rem_euclid(TICKS_PER_DAY))
    }

    /// Date locale, si l'instant est représentable par chrono.
    pub fn date(&self) -> Option<NaiveDate> {
        self.to_datetime().map(|dt| dt.date_naive())
    }

    /// Conversion depuis chrono ; échoue au-delà de la plage des ticks (an ~29 000).
    pub fn try_from_datetime<Tz: TimeZone>(dt: &DateTime<Tz>) -> Result<Self, TickError> {
        let offset = dt.offset().fix();
        let local = dt.naive_local().and_utc();
        let ticks = local
            .timestamp()
            .checked_mul(TICKS_PER_SECOND)
            .and_then(|t| t.checked_add(UNIX_EPOCH_TICKS))
            .and_then(|t| t.checked_add(i64::from(local.timestamp_subsec_nanos()) / 100))
            .ok_or(TickError::OutOfRange)?;
        Ok(Self { ticks, offset })
    }

    /// Conversion vers chrono ; `None` hors de la plage représentable.
    pub fn to_datetime(&self) -> Option<DateTime<FixedOffset>> {
        let since_unix = self.ticks.checked_sub(UNIX_EPOCH_TICKS)?;
        let secs = since_unix.div_euclid(TICKS_PER_SECOND);
        let nanos = (since_unix.rem_euclid(TICKS_PER_SECOND) * 100) as u32;
        let local = DateTime::from_timestamp(secs, nanos)?.naive_utc();
        local.and_local_timezone(self.offset).single()
    }
}

impl PartialEq for Instant {
    fn eq(&self, other: &Self) -> bool {
        self.ticks == other.ticks
    }
}

impl Eq for Instant {}

impl PartialOrd for Instant {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Instant {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.ticks.cmp(&other.ticks)
    }
}

impl std::hash::Hash for Instant {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.ticks.hash(state);
    }
}

impl TryFrom<DateTime<FixedOffset>> for Instant {
    type Error = TickError;

    fn try_from(dt: DateTime<FixedOffset>) -> Result<Self, Self::Error> {
        Self::try_from_datetime(&dt)
    }
}

impl FromStr for Instant {
    type Err = TickError;

    /// RFC 3339, décalage conservé.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from_datetime(&DateTime::parse_from_rfc3339(s.trim())?)
    }
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Some(dt) => f.write_str(&dt.to_rfc3339()),
            None => write!(f, "{} ticks {}", self.ticks, self.offset),
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Instant {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::Error;
        let dt = self
            .to_datetime()
            .ok_or_else(|| S::Error::custom("instant out of representable range"))?;
        serializer.serialize_str(&dt.to_rfc3339())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Instant {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Durée signée en ticks, sans décalage ; peut être négative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Duration(i64);

impl Duration {
    pub const ZERO: Duration = Duration(0);
    pub const DAY: Duration = Duration(TICKS_PER_DAY);

    pub const fn from_ticks(ticks: i64) -> Self {
        Self(ticks)
    }
    pub const fn from_seconds(seconds: i64) -> Self {
        Self(seconds * TICKS_PER_SECOND)
    }
    pub const fn from_minutes(minutes: i64) -> Self {
        Self(minutes * TICKS_PER_MINUTE)
    }
    pub const fn from_hours(hours: i64) -> Self {
        Self(hours * TICKS_PER_HOUR)
    }

    /// `None` si la valeur sort de la plage des ticks.
    pub fn checked_from_seconds(seconds: i64) -> Option<Self> {
        seconds.checked_mul(TICKS_PER_SECOND).map(Self)
    }
    pub fn checked_from_minutes(minutes: i64) -> Option<Self> {
        minutes.checked_mul(TICKS_PER_MINUTE).map(Self)
    }
    pub fn checked_from_hours(hours: i64) -> Option<Self> {
        hours.checked_mul(TICKS_PER_HOUR).map(Self)
    }

    pub const fn ticks(&self) -> i64 {
        self.0
    }

    /// Composante heures (0–23 pour une durée positive de moins d'un jour).
    pub fn hours(&self) -> i64 {
        (self.0 / TICKS_PER_HOUR) % 24
    }

    pub fn minutes(&self) -> i64 {
        (self.0 / TICKS_PER_MINUTE) % 60
    }

    pub fn total_minutes(&self) -> i64 {
        self.0 / TICKS_PER_MINUTE
    }
}

impl TryFrom<TimeDelta> for Duration {
    type Error = TickError;

    fn try_from(delta: TimeDelta) -> Result<Self, Self::Error> {
        delta
            .num_seconds()
            .checked_mul(TICKS_PER_SECOND)
            .and_then(|t| t.checked_add(i64::from(delta.subsec_nanos()) / 100))
            .map(Self)
            .ok_or(TickError::OutOfRange)
    }
}

impl From<Duration> for TimeDelta {
    fn from(d: Duration) -> Self {
        TimeDelta::seconds(d.0 / TICKS_PER_SECOND)
            + TimeDelta::nanoseconds((d.0 % TICKS_PER_SECOND) * 100)
    }
}

impl std::ops::Add for Duration {
    type Output = Duration;
    fn add(self, rhs: Duration) -> Duration {
        Duration(self.0 + rhs.0)
    }
}

impl std::ops::Sub for Duration {
    type Output = Duration;
    fn sub(self, rhs: Duration) -> Duration {
        Duration(self.0 - rhs.0)
    }
}

impl std::ops::Neg for Duration {
    type Output = Duration;
    fn neg(self) -> Duration {
        Duration(-self.0)
    }
}

/// Format `[-][d.]hh:mm:ss[.fffffff]`.
impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let abs = self.0.unsigned_abs();
        if self.0 < 0 {
            f.write_str("-")?;
        }
        let per_day = TICKS_PER_DAY as u64;
        let days = abs / per_day;
        if days > 0 {
            write!(f, "{days}.")?;
        }
        let hours = abs / TICKS_PER_HOUR as u64 % 24;
        let minutes = abs / TICKS_PER_MINUTE as u64 % 60;
        let seconds = abs / TICKS_PER_SECOND as u64 % 60;
        write!(f, "{hours:02}:{minutes:02}:{seconds:02}")?;
        let fraction = abs % TICKS_PER_SECOND as u64;
        if fraction > 0 {
            write!(f, ".{fraction:07}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plus2() -> FixedOffset {
        FixedOffset::east_opt(2 * 3600).unwrap()
    }

    #[test]
    fn tick_epoch_is_year_one() {
        let dt = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(1, 1, 1, 0, 0, 0)
            .unwrap();
        assert_eq!(Instant::try_from(dt).unwrap().ticks(), 0);

        let unix = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(1970, 1, 1, 0, 0, 0)
            .unwrap();
        assert_eq!(Instant::try_from(unix).unwrap().ticks(), UNIX_EPOCH_TICKS);
    }

    #[test]
    fn ticks_count_local_wall_clock() {
        let dt = plus2().with_ymd_and_hms(2019, 4, 22, 20, 41, 44).unwrap();
        let instant = Instant::try_from(dt).unwrap();
        assert_eq!(
            instant.time_of_day(),
            Duration::from_hours(20) + Duration::from_minutes(41) + Duration::from_seconds(44)
        );
        assert_eq!(instant.date(), NaiveDate::from_ymd_opt(2019, 4, 22));
    }

    #[test]
    fn offset_survives_roundtrip() {
        let raw = "2019-04-22T20:41:44.3496587+02:00";
        let instant: Instant = raw.parse().unwrap();
        assert_eq!(instant.offset(), plus2());
        assert_eq!(instant.ticks() % TICKS_PER_SECOND, 3_496_587);
        let back = instant.to_datetime().unwrap();
        assert_eq!(back, DateTime::parse_from_rfc3339(raw).unwrap());
        assert_eq!(back.offset(), &plus2());
    }

    #[test]
    fn equality_ignores_offset() {
        let a = Instant::new(42, plus2());
        let b = Instant::new(42, FixedOffset::west_opt(5 * 3600).unwrap());
        assert_eq!(a, b);
        assert!(Instant::new(41, plus2()) < b);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn instant_serializes_as_rfc3339() {
        let instant: Instant = "2019-04-22T20:41:44+02:00".parse().unwrap();
        let json = serde_json::to_string(&instant).unwrap();
        assert_eq!(json, "\"2019-04-22T20:41:44+02:00\"");
        let back: Instant = serde_json::from_str(&json).unwrap();
        assert_eq!(back, instant);
        assert_eq!(back.offset(), instant.offset());
    }

    #[test]
    fn far_future_dates_are_out_of_range() {
        let utc = FixedOffset::east_opt(0).unwrap();
        let far = utc.with_ymd_and_hms(40000, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(Instant::try_from(far), Err(TickError::OutOfRange));
        let last = utc.with_ymd_and_hms(9999, 12, 31, 23, 59, 59).unwrap();
        assert!(Instant::try_from(last).is_ok());
    }

    #[test]
    fn checked_constructors_reject_overflow() {
        assert_eq!(Duration::checked_from_minutes(15), Some(Duration::from_minutes(15)));
        assert_eq!(Duration::checked_from_minutes(36_028_797_018_963_983), None);
        assert_eq!(Duration::checked_from_seconds(i64::MAX / 1000), None);
        assert_eq!(Duration::checked_from_hours(-2), Some(-Duration::from_hours(2)));
        assert_eq!(Duration::checked_from_hours(i64::MIN / 2), None);
    }

    #[test]
    fn duration_display() {
        assert_eq!(Duration::from_minutes(15).to_string(), "00:15:00");
        assert_eq!(Duration::from_hours(23).to_string(), "23:00:00");
        assert_eq!((-Duration::from_minutes(90)).to_string(), "-01:30:00");
        assert_eq!(Duration::from_ticks(TICKS_PER_DAY + 5).to_string(), "1.00:00:00.0000005");
    }

    #[test]
    fn duration_from_time_delta() {
        let d = Duration::try_from(TimeDelta::milliseconds(-1_500)).unwrap();
        assert_eq!(d.ticks(), -15_000_000);
        assert_eq!(TimeDelta::from(d), TimeDelta::milliseconds(-1_500));
        assert_eq!(
            Duration::try_from(TimeDelta::days(1_000_000_000)),
            Err(TickError::OutOfRange)
        );
    }
}
