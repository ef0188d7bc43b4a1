use crate::model::Instant;
use crate::slots::SlotTable;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Valeurs par jour et par créneau, telles que renvoyées par le service
/// (`date → clé de créneau → valeur`).
///
/// `T` vaut typiquement `Option<bool>` (disponibilité) ou `i32` (totaux).
#[derive(Debug, Clone, PartialEq)]
pub struct Occupancy<T> {
    days: BTreeMap<NaiveDate, BTreeMap<String, T>>,
}

impl<T> Default for Occupancy<T> {
    fn default() -> Self {
        Self {
            days: BTreeMap::new(),
        }
    }
}

impl<T> Occupancy<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remplace la valeur existante, le cas échéant.
    pub fn insert<K: Into<String>>(&mut self, date: NaiveDate, key: K, value: T) -> Option<T> {
        self.days.entry(date).or_default().insert(key.into(), value)
    }

    pub fn insert_day(&mut self, date: NaiveDate, slots: BTreeMap<String, T>) {
        self.days.insert(date, slots);
    }

    pub fn day(&self, date: NaiveDate) -> Option<&BTreeMap<String, T>> {
        self.days.get(&date)
    }

    pub fn days(&self) -> impl Iterator<Item = (&NaiveDate, &BTreeMap<String, T>)> {
        self.days.iter()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Valeur du créneau contenant `instant` (date et heure locales de l'instant).
    pub fn at(&self, table: &SlotTable, instant: Instant) -> Option<&T> {
        let date = instant.date()?;
        let key = table.map_to_key(instant);
        self.days.get(&date)?.get(key.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_uses_local_date_and_slot() {
        let date = NaiveDate::from_ymd_opt(2019, 4, 22).unwrap();
        let mut occ: Occupancy<Option<bool>> = Occupancy::new();
        occ.insert(date, "Hour20_30", Some(true));
        occ.insert(date, "Hour20_45", None);

        let table = SlotTable::quarter_hourly();
        let at: Instant = "2019-04-22T20:41:44+02:00".parse().unwrap();
        assert_eq!(occ.at(&table, at), Some(&Some(true)));

        let later: Instant = "2019-04-22T20:50:00+02:00".parse().unwrap();
        assert_eq!(occ.at(&table, later), Some(&None));

        // même instant UTC, autre jour local
        let tokyo: Instant = "2019-04-23T03:41:44+09:00".parse().unwrap();
        assert_eq!(occ.at(&table, tokyo), None);
    }

    #[test]
    fn insert_replaces() {
        let date = NaiveDate::from_ymd_opt(2019, 4, 22).unwrap();
        let mut occ = Occupancy::new();
        assert_eq!(occ.insert(date, "Hour1", 1), None);
        assert_eq!(occ.insert(date, "Hour1", 2), Some(1));
        assert_eq!(occ.day(date).map(|d| d.len()), Some(1));
    }
}
