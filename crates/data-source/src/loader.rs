use crate::error::DataSourceError;
use chrono::NaiveDate;
use core_types::{CoreError, HotelRecord};
use csv::{ReaderBuilder, Trim};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;
use std::str::FromStr;

/// A CSV row exactly as read. Every cell is optional so that a missing value
/// is reported against its field instead of failing the whole file.
#[derive(Debug, Default, Deserialize)]
struct RawRecord {
    date: Option<String>,
    hotel: Option<String>,
    room_type: Option<String>,
    channel: Option<String>,
    capacity: Option<String>,
    occupied: Option<String>,
    room_revenue: Option<String>,
    fnb_revenue: Option<String>,
    spa_revenue: Option<String>,
    other_revenue: Option<String>,
    rooms_cost: Option<String>,
    fnb_cost: Option<String>,
    spa_cost: Option<String>,
    other_cost: Option<String>,
}

fn present<'a>(field: &str, value: &'a Option<String>) -> Result<&'a str, CoreError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(CoreError::schema(field, "value is missing")),
    }
}

fn text(field: &str, value: &Option<String>) -> Result<String, CoreError> {
    present(field, value).map(str::to_string)
}

fn date(field: &str, value: &Option<String>) -> Result<NaiveDate, CoreError> {
    let v = present(field, value)?;
    NaiveDate::parse_from_str(v, "%Y-%m-%d")
        .map_err(|e| CoreError::schema(field, format!("'{v}' is not a YYYY-MM-DD date ({e})")))
}

fn count(field: &str, value: &Option<String>) -> Result<u32, CoreError> {
    let v = present(field, value)?;
    let n = i64::from_str(v).map_err(|_| CoreError::schema(field, format!("'{v}' is not an integer")))?;
    if n < 0 {
        return Err(CoreError::schema(field, format!("{n} is negative")));
    }
    u32::try_from(n).map_err(|_| CoreError::schema(field, format!("{n} is out of range")))
}

fn amount(field: &str, value: &Option<String>) -> Result<Decimal, CoreError> {
    let v = present(field, value)?;
    Decimal::from_str(v).map_err(|_| CoreError::schema(field, format!("'{v}' is not a decimal number")))
}

/// Departments a hotel does not run (no spa, no restaurant) may leave their
/// columns empty; those amounts read as zero.
fn optional_amount(field: &str, value: &Option<String>) -> Result<Decimal, CoreError> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(Decimal::ZERO),
        Some(_) => amount(field, value),
    }
}

impl TryFrom<RawRecord> for HotelRecord {
    type Error = CoreError;

    fn try_from(raw: RawRecord) -> Result<Self, Self::Error> {
        let record = HotelRecord {
            date: date("date", &raw.date)?,
            hotel: text("hotel", &raw.hotel)?,
            room_type: text("room_type", &raw.room_type)?,
            channel: text("channel", &raw.channel)?,
            capacity: count("capacity", &raw.capacity)?,
            occupied: count("occupied", &raw.occupied)?,
            room_revenue: amount("room_revenue", &raw.room_revenue)?,
            fnb_revenue: optional_amount("fnb_revenue", &raw.fnb_revenue)?,
            spa_revenue: optional_amount("spa_revenue", &raw.spa_revenue)?,
            other_revenue: optional_amount("other_revenue", &raw.other_revenue)?,
            rooms_cost: optional_amount("rooms_cost", &raw.rooms_cost)?,
            fnb_cost: optional_amount("fnb_cost", &raw.fnb_cost)?,
            spa_cost: optional_amount("spa_cost", &raw.spa_cost)?,
            other_cost: optional_amount("other_cost", &raw.other_cost)?,
        };
        record.validate()?;
        Ok(record)
    }
}

/// A data row that failed validation in lenient mode.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRow {
    /// 1-based data row number, not counting the header.
    pub row: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    pub rejected: Vec<RejectedRow>,
}

impl LoadReport {
    pub fn skipped_rows(&self) -> usize {
        self.rejected.len()
    }
}

/// Validated records together with the report of how they were loaded.
#[derive(Debug, Clone, Default)]
pub struct LoadedRecords {
    pub records: Vec<HotelRecord>,
    pub report: LoadReport,
}

/// Reads hotel records from a CSV file with a header row.
///
/// Columns are matched by name, so their order does not matter and extra
/// columns are ignored.
#[derive(Debug, Clone)]
pub struct CsvRecordSource {
    path: PathBuf,
    skip_invalid: bool,
}

impl CsvRecordSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            skip_invalid: false,
        }
    }

    /// In lenient mode invalid rows are counted and logged instead of
    /// aborting the load.
    pub fn skip_invalid(mut self, skip_invalid: bool) -> Self {
        self.skip_invalid = skip_invalid;
        self
    }

    pub fn load(&self) -> Result<LoadedRecords, DataSourceError> {
        let file = File::open(&self.path).map_err(|source| DataSourceError::Io {
            path: self.path.clone(),
            source,
        })?;
        let loaded = self.load_from_reader(file)?;
        tracing::info!(
            path = %self.path.display(),
            loaded = loaded.report.loaded_rows,
            skipped = loaded.report.skipped_rows(),
            "Loaded hotel records."
        );
        Ok(loaded)
    }

    /// Same as `load`, reading from any byte source.
    pub fn load_from_reader<R: Read>(&self, reader: R) -> Result<LoadedRecords, DataSourceError> {
        let mut rdr = ReaderBuilder::new()
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let mut loaded = LoadedRecords::default();
        for (index, result) in rdr.deserialize::<RawRecord>().enumerate() {
            let row = index + 1;
            loaded.report.total_rows += 1;

            let outcome = match result {
                Ok(raw) => HotelRecord::try_from(raw),
                Err(source) if !self.skip_invalid => {
                    return Err(DataSourceError::Csv {
                        path: self.path.clone(),
                        source,
                    });
                }
                Err(e) => Err(CoreError::InvalidInput(format!("row {row}"), e.to_string())),
            };

            match outcome {
                Ok(record) => loaded.records.push(record),
                Err(source) if !self.skip_invalid => {
                    return Err(DataSourceError::Schema { row, source });
                }
                Err(e) => {
                    tracing::warn!(row, error = %e, "Skipping invalid hotel record.");
                    loaded.report.rejected.push(RejectedRow {
                        row,
                        reason: e.to_string(),
                    });
                }
            }
        }
        loaded.report.loaded_rows = loaded.records.len();
        Ok(loaded)
    }
}
