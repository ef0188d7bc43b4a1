use crate::occupancy::Occupancy;
use crate::slots::SlotTable;
use anyhow::{bail, Context};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use csv::WriterBuilder;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Charge un fichier JSON `{ "<date>": { "<clé de créneau>": valeur, ... }, ... }`.
pub fn load_occupancy_json<T: DeserializeOwned, P: AsRef<Path>>(
    path: P,
) -> anyhow::Result<Occupancy<T>> {
    let path = path.as_ref();
    let data =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    parse_occupancy_json(&data).with_context(|| format!("loading {}", path.display()))
}

pub fn parse_occupancy_json<T: DeserializeOwned>(json: &str) -> anyhow::Result<Occupancy<T>> {
    let raw: BTreeMap<String, BTreeMap<String, T>> =
        serde_json::from_str(json).context("parsing occupancy json")?;
    let mut occupancy = Occupancy::new();
    for (day, slots) in raw {
        let date = parse_date_only(&day).with_context(|| format!("invalid day key {day}"))?;
        if occupancy.day(date).is_some() {
            bail!("duplicate day {date}");
        }
        occupancy.insert_day(date, slots);
    }
    Ok(occupancy)
}

/// Date seule : `YYYY-MM-DD`, ou date-heure à minuit pile (avec ou sans décalage).
pub fn parse_date_only(raw: &str) -> anyhow::Result<NaiveDate> {
    let raw = raw.trim();
    let (date, time) = if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        (dt.date_naive(), dt.time())
    } else if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        (dt.date(), dt.time())
    } else {
        let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").context("expected a date")?;
        (date, NaiveTime::MIN)
    };
    if time != NaiveTime::MIN {
        bail!("must contain only a date");
    }
    Ok(date)
}

/// Export CSV de la table : `time_of_day,key`.
pub fn export_table_csv<P: AsRef<Path>>(path: P, table: &SlotTable) -> anyhow::Result<()> {
    let path = path.as_ref();
    let mut w = WriterBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    w.write_record(["time_of_day", "key"])?;
    for (tod, key) in table.iter() {
        w.write_record([tod.to_string().as_str(), key.as_str()])?;
    }
    w.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_only_formats() {
        let expected = NaiveDate::from_ymd_opt(2019, 4, 22).unwrap();
        for raw in [
            "2019-04-22",
            "2019-04-22T00:00:00",
            "2019-04-22T00:00:00+02:00",
        ] {
            assert_eq!(parse_date_only(raw).unwrap(), expected, "{raw}");
        }
    }

    #[test]
    fn time_component_is_rejected() {
        let err = parse_date_only("2019-04-22T20:41:44").unwrap_err();
        assert!(err.to_string().contains("only a date"));
        assert!(parse_date_only("22/04/2019").is_err());
    }

    #[test]
    fn duplicate_days_are_rejected() {
        let json = r#"{ "2019-04-22": {"Hour0": 1}, "2019-04-22T00:00:00": {"Hour0": 2} }"#;
        assert!(parse_occupancy_json::<i32>(json).is_err());
    }
}
