#![forbid(unsafe_code)]
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use precom_slots::{
    io,
    model::{Duration, Instant},
    rounding::{checked_round_up, round, round_down, MidpointRounding},
    slots::{Granularity, SlotTable},
    Clock, SystemClock,
};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// Créneaux horaires PreCom : clés de slot et arrondi d'instants
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Largeur d'un créneau, en minutes
    #[arg(long, global = true, default_value_t = 15)]
    granularity: i64,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Clé du créneau contenant un instant
    Key {
        /// RFC3339 avec décalage (défaut : maintenant)
        #[arg(long)]
        at: Option<String>,
    },

    /// Lister la table des créneaux
    Table {
        #[arg(long)]
        out_csv: Option<String>,
    },

    /// Arrondir un instant sur une période
    Round {
        /// RFC3339 avec décalage
        #[arg(long)]
        at: String,
        #[arg(long)]
        period_minutes: i64,
        #[arg(long, value_enum, default_value_t = Mode::Nearest)]
        mode: Mode,
        #[arg(long, value_enum, default_value_t = Midpoint::ToEven)]
        midpoint: Midpoint,
    },

    /// Valeur d'occupation pour le créneau d'un instant
    Occupancy {
        /// JSON `{ "<date>": { "<clé>": valeur } }`
        #[arg(long)]
        file: String,
        /// RFC3339 avec décalage (défaut : maintenant)
        #[arg(long)]
        at: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    Up,
    Down,
    Nearest,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Midpoint {
    ToEven,
    AwayFromZero,
    ToZero,
    ToNegativeInfinity,
    ToPositiveInfinity,
}

impl From<Midpoint> for MidpointRounding {
    fn from(m: Midpoint) -> Self {
        match m {
            Midpoint::ToEven => MidpointRounding::ToEven,
            Midpoint::AwayFromZero => MidpointRounding::AwayFromZero,
            Midpoint::ToZero => MidpointRounding::ToZero,
            Midpoint::ToNegativeInfinity => MidpointRounding::ToNegativeInfinity,
            Midpoint::ToPositiveInfinity => MidpointRounding::ToPositiveInfinity,
        }
    }
}

fn parse_instant(at: Option<&str>) -> Result<Instant> {
    match at {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("invalid RFC3339 instant: {raw}")),
        None => Ok(SystemClock.now()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let granularity = Granularity::from_minutes(cli.granularity)?;
    let table = SlotTable::build(granularity);

    match cli.cmd {
        Commands::Key { at } => {
            let instant = parse_instant(at.as_deref())?;
            println!("{}", table.map_to_key(instant));
        }
        Commands::Table { out_csv } => {
            if let Some(path) = out_csv {
                io::export_table_csv(path, &table)?;
            }
            for (tod, key) in table.iter() {
                println!("{tod} | {key}");
            }
        }
        Commands::Round {
            at,
            period_minutes,
            mode,
            midpoint,
        } => {
            // up/down divisent par la période
            if period_minutes <= 0 {
                anyhow::bail!("period must be positive");
            }
            let period = Duration::checked_from_minutes(period_minutes)
                .with_context(|| format!("period of {period_minutes} minutes is out of range"))?;
            let instant = parse_instant(Some(&at))?;
            let rounded = match mode {
                Mode::Up => checked_round_up(instant, period)
                    .context("rounded instant is out of the tick range")?,
                Mode::Down => round_down(instant, period),
                Mode::Nearest => round(instant, period, midpoint.into())?,
            };
            println!("{rounded}");
        }
        Commands::Occupancy { file, at } => {
            let occupancy = io::load_occupancy_json::<serde_json::Value, _>(&file)?;
            let instant = parse_instant(at.as_deref())?;
            let key = table.map_to_key(instant);
            match occupancy.at(&table, instant) {
                Some(value) => println!("{key} = {value}"),
                None => println!("{key} = -"),
            }
        }
    }

    Ok(())
}
