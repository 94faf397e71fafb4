use analytics::{PeriodReferences, StatementBindings};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
///
/// Every section falls back to its default, so an empty file is a valid
/// configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub data: DataSettings,
    pub forecast: ForecastSettings,
    pub scenario: ScenarioSettings,
    pub statements: StatementSettings,
    pub alerts: AlertSettings,
}

/// Where the Data Source reads its inputs from.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    /// CSV file with one hotel record per (date, hotel, room type, channel).
    pub records_path: PathBuf,
    /// TOML statement book.
    pub statements_path: PathBuf,
    /// Skip and count invalid CSV rows instead of aborting on the first one.
    pub skip_invalid: bool,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            records_path: PathBuf::from("data/hotel_records.csv"),
            statements_path: PathBuf::from("data/statements.toml"),
            skip_invalid: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ForecastSettings {
    /// Number of days to project the occupancy trend forward.
    pub horizon: usize,
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self { horizon: 30 }
    }
}

/// Default uplifts for the what-if simulator, both in percent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScenarioSettings {
    pub adr_uplift_pct: Decimal,
    pub occupancy_uplift_pct: Decimal,
}

/// Statement label bindings and the balance-sheet references of each period.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StatementSettings {
    pub bindings: StatementBindings,
    pub prior: PeriodReferences,
    pub current: PeriodReferences,
}

/// How important a triggered alert is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    #[default]
    Warning,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        };
        f.write_str(s)
    }
}

/// One threshold rule as written in the configuration file.
///
/// The comparator is kept as text here; the alerter parses it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AlertRuleConfig {
    /// Metric name as produced by the report `metrics()` maps,
    /// e.g. `occupancy_rate` or `channel_share.OTA`.
    pub metric: String,
    /// One of `lt`, `le`, `gt`, `ge` (or `<`, `<=`, `>`, `>=`).
    pub comparator: String,
    pub threshold: Decimal,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub severity: Severity,
}

impl AlertRuleConfig {
    fn new(metric: &str, comparator: &str, threshold: Decimal, message: &str, severity: Severity) -> Self {
        Self {
            metric: metric.to_string(),
            comparator: comparator.to_string(),
            threshold,
            message: message.to_string(),
            severity,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AlertSettings {
    pub enabled: bool,
    pub rules: Vec<AlertRuleConfig>,
}

// --- Default Implementations ---
// Omitting the `[alerts]` section keeps the usual hotel control thresholds.

impl Default for AlertSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            rules: vec![
                AlertRuleConfig::new(
                    "occupancy_rate",
                    "lt",
                    dec!(0.55),
                    "Average occupancy is low: review promotions and channels.",
                    Severity::Warning,
                ),
                AlertRuleConfig::new(
                    "adr",
                    "lt",
                    dec!(80),
                    "ADR is low: check pricing and rate parity.",
                    Severity::Warning,
                ),
                AlertRuleConfig::new(
                    "revpar_dispersion",
                    "gt",
                    dec!(0.4),
                    "RevPAR varies widely across room types: revisit segmentation.",
                    Severity::Info,
                ),
                AlertRuleConfig::new(
                    "channel_share_gap.OTA",
                    "gt",
                    Decimal::ZERO,
                    "OTA is the leading sales channel: strengthen direct bookings.",
                    Severity::Info,
                ),
                AlertRuleConfig::new(
                    "net_margin",
                    "lt",
                    dec!(5),
                    "Net margin is below 5%.",
                    Severity::Warning,
                ),
                AlertRuleConfig::new(
                    "net_debt_to_equity",
                    "gt",
                    dec!(0.5),
                    "Net debt exceeds half of equity.",
                    Severity::Critical,
                ),
                AlertRuleConfig::new(
                    "cash",
                    "lt",
                    dec!(1000),
                    "Cash position is below 1000.",
                    Severity::Critical,
                ),
            ],
        }
    }
}
