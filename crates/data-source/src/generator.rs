//! Seeded synthetic hotel records.
//!
//! Produces one record per (date, room type) with seasonal occupancy, so the
//! dashboards can run without real operating data. The same seed always
//! yields the same records.

use crate::error::DataSourceError;
use chrono::{Datelike, NaiveDate};
use core_types::HotelRecord;
use rand::distributions::WeightedIndex;
use rand::prelude::*;
use rand_distr::{Binomial, Normal};
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use std::f64::consts::TAU;
use std::ops::Range;
use std::path::Path;

/// A room type with a fixed inventory and a nightly rate distribution.
struct RoomProfile {
    name: &'static str,
    capacity: u32,
    adr_mean: f64,
    adr_std_dev: f64,
}

const ROOM_PROFILES: [RoomProfile; 4] = [
    RoomProfile { name: "Single", capacity: 10, adr_mean: 60.0, adr_std_dev: 10.0 },
    RoomProfile { name: "Double", capacity: 30, adr_mean: 90.0, adr_std_dev: 12.0 },
    RoomProfile { name: "Deluxe", capacity: 15, adr_mean: 140.0, adr_std_dev: 20.0 },
    RoomProfile { name: "Suite", capacity: 5, adr_mean: 260.0, adr_std_dev: 40.0 },
];

/// Sales channels and the probability of each.
const CHANNELS: [(&str, f64); 4] = [
    ("Direct", 0.35),
    ("OTA", 0.40),
    ("Corporate", 0.15),
    ("Agency", 0.10),
];

/// Floor for a drawn nightly rate.
const MIN_ADR: f64 = 20.0;

pub const DEFAULT_SEED: u64 = 42;

/// What to generate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// First business date (inclusive).
    pub from: NaiveDate,
    /// Last business date (inclusive).
    pub to: NaiveDate,
    pub hotel: String,
    /// Random seed for reproducibility.
    pub seed: u64,
}

impl GeneratorConfig {
    pub fn new(from: NaiveDate, to: NaiveDate, hotel: impl Into<String>) -> Self {
        Self {
            from,
            to,
            hotel: hotel.into(),
            seed: DEFAULT_SEED,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Synthetic hotel record generator.
pub struct SyntheticGenerator {
    config: GeneratorConfig,
    rng: StdRng,
    channels: WeightedIndex<f64>,
}

impl SyntheticGenerator {
    pub fn new(config: GeneratorConfig) -> Result<Self, DataSourceError> {
        if config.from > config.to {
            return Err(DataSourceError::Generator(format!(
                "the range starts on {} but ends on {}",
                config.from, config.to
            )));
        }
        let channels = WeightedIndex::new(CHANNELS.iter().map(|(_, weight)| *weight))
            .map_err(|e| DataSourceError::Generator(e.to_string()))?;
        Ok(Self {
            rng: StdRng::seed_from_u64(config.seed),
            config,
            channels,
        })
    }

    /// Every record of the configured range, date by date, room types in a
    /// fixed order. Each record passes `HotelRecord::validate`.
    pub fn generate(&mut self) -> Result<Vec<HotelRecord>, DataSourceError> {
        let (from, to) = (self.config.from, self.config.to);
        let mut records = Vec::new();
        for date in from.iter_days().take_while(|d| *d <= to) {
            let occupancy = seasonal_occupancy(date);
            for room in &ROOM_PROFILES {
                records.push(self.record(date, room, occupancy)?);
            }
        }

        tracing::info!(
            hotel = %self.config.hotel,
            from = %from,
            to = %to,
            seed = self.config.seed,
            records = records.len(),
            "Generated synthetic hotel records."
        );
        Ok(records)
    }

    fn record(&mut self, date: NaiveDate, room: &RoomProfile, occupancy: f64) -> Result<HotelRecord, DataSourceError> {
        let occupied = Binomial::new(u64::from(room.capacity), occupancy)
            .map_err(|e| DataSourceError::Generator(e.to_string()))?
            .sample(&mut self.rng);
        let occupied = u32::try_from(occupied).map_or(room.capacity, |n| n.min(room.capacity));

        let adr = Normal::new(room.adr_mean, room.adr_std_dev)
            .map_err(|e| DataSourceError::Generator(e.to_string()))?
            .sample(&mut self.rng)
            .max(MIN_ADR);
        let room_revenue = money(adr) * Decimal::from(occupied);

        let fnb_revenue = self.fraction_of(room_revenue, 0.05..0.25);
        let spa_revenue = self.fraction_of(room_revenue, 0.0..0.08);
        let other_revenue = money(self.rng.gen_range(50.0..250.0));

        let rooms_cost = self.fraction_of(room_revenue, 0.15..0.30);
        let fnb_cost = self.fraction_of(fnb_revenue, 0.25..0.45);
        let spa_cost = self.fraction_of(spa_revenue, 0.2..0.4);
        let other_cost = self.fraction_of(other_revenue, 0.3..0.6);

        let channel = CHANNELS[self.channels.sample(&mut self.rng)].0;

        Ok(HotelRecord {
            date,
            hotel: self.config.hotel.clone(),
            room_type: room.name.to_string(),
            channel: channel.to_string(),
            capacity: room.capacity,
            occupied,
            room_revenue,
            fnb_revenue,
            spa_revenue,
            other_revenue,
            rooms_cost,
            fnb_cost,
            spa_cost,
            other_cost,
        })
    }

    /// `base` times a uniform draw from `range`, to the cent.
    fn fraction_of(&mut self, base: Decimal, range: Range<f64>) -> Decimal {
        (base * fraction(self.rng.gen_range(range))).round_dp(2)
    }
}

/// Occupancy probability for `date`: 60% on average, peaking mid-spring and
/// bottoming out mid-autumn.
fn seasonal_occupancy(date: NaiveDate) -> f64 {
    0.6 + 0.15 * (f64::from(date.ordinal()) / 365.0 * TAU).sin()
}

fn money(value: f64) -> Decimal {
    fraction(value).round_dp(2)
}

fn fraction(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Writes `records` as CSV with a header row, in the column layout
/// `CsvRecordSource` reads. Missing parent directories are created.
pub fn write_csv(records: &[HotelRecord], path: impl AsRef<Path>) -> Result<(), DataSourceError> {
    let path = path.as_ref();
    let io_error = |source: std::io::Error| DataSourceError::Io {
        path: path.to_path_buf(),
        source,
    };
    let csv_error = |source: csv::Error| DataSourceError::Csv {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_error)?;
    }
    let mut writer = csv::Writer::from_path(path).map_err(csv_error)?;
    for record in records {
        writer.serialize(record).map_err(csv_error)?;
    }
    writer.flush().map_err(io_error)?;

    tracing::info!(path = %path.display(), records = records.len(), "Wrote hotel records.");
    Ok(())
}
