use alerter::{Alert, ThresholdAlerter};
use analytics::AnalyticsEngine;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use configuration::{Settings, Severity};
use core_types::{Dimension, HotelRecord};
use data_source::{
    write_csv, CsvRecordSource, GeneratorConfig, RecordFilter, Repository, StatementSource, SyntheticGenerator,
};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod render;

/// The main entry point for the hotel KPI application.
fn main() -> Result<()> {
    // Optional HOTEL_KPI__* overrides may live in a .env file.
    dotenvy::dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Parse command-line arguments
    let cli = Cli::parse();
    let settings = configuration::load_config(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    let app = App::new(&cli, settings)?;

    // Execute the appropriate command
    match cli.command {
        Commands::Kpi(args) => app.handle_kpi(args),
        Commands::Breakdown(args) => app.handle_breakdown(args),
        Commands::Daily(args) => app.handle_daily(args),
        Commands::Forecast(args) => app.handle_forecast(args),
        Commands::Statements(args) => app.handle_statements(args),
        Commands::Simulate(args) => app.handle_simulate(args),
        Commands::Generate(args) => app.handle_generate(args),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Hotel KPI and financial-ratio dashboard for the terminal.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, short, global = true, default_value = "config.toml")]
    config: PathBuf,

    /// Hotel records CSV; overrides `data.records_path`.
    #[arg(long, global = true)]
    records: Option<PathBuf>,

    /// Skip invalid CSV rows instead of stopping at the first one.
    #[arg(long, global = true)]
    skip_invalid: bool,

    /// Print machine-readable JSON instead of tables.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Period KPIs, department and channel mix, and threshold alerts.
    Kpi(KpiArgs),
    /// KPIs grouped by one dimension (date, hotel, room-type, channel).
    Breakdown(BreakdownArgs),
    /// One KPI row per business date.
    Daily(FilterArgs),
    /// Linear occupancy trend projected forward.
    Forecast(ForecastArgs),
    /// Profitability, liquidity and leverage ratios with line variances.
    Statements(StatementsArgs),
    /// What-if revenue impact of an ADR and/or occupancy uplift.
    Simulate(SimulateArgs),
    /// Write seeded synthetic hotel records to a CSV file.
    Generate(GenerateArgs),
}

/// The record selection shared by every record-based command.
#[derive(Args, Clone, Default)]
struct FilterArgs {
    /// First business date to include (format: YYYY-MM-DD).
    #[arg(long)]
    from: Option<NaiveDate>,
    /// Last business date to include (format: YYYY-MM-DD).
    #[arg(long)]
    to: Option<NaiveDate>,
    /// Only this hotel.
    #[arg(long)]
    hotel: Option<String>,
    /// Only these room types (repeatable).
    #[arg(long = "room-type")]
    room_types: Vec<String>,
    /// Only these sales channels (repeatable).
    #[arg(long = "channel")]
    channels: Vec<String>,
}

impl From<FilterArgs> for RecordFilter {
    fn from(args: FilterArgs) -> Self {
        RecordFilter {
            from: args.from,
            to: args.to,
            hotel: args.hotel,
            room_types: args.room_types,
            channels: args.channels,
        }
    }
}

#[derive(Args)]
struct KpiArgs {
    #[command(flatten)]
    filter: FilterArgs,
    /// Hide alerts below this severity.
    #[arg(long, value_enum, default_value_t = Severity::Info)]
    min_severity: Severity,
}

#[derive(Args)]
struct BreakdownArgs {
    /// The dimension to group by.
    #[arg(long)]
    by: Dimension,
    #[command(flatten)]
    filter: FilterArgs,
}

#[derive(Args)]
struct ForecastArgs {
    /// Days to project; defaults to `forecast.horizon`.
    #[arg(long)]
    horizon: Option<usize>,
    #[command(flatten)]
    filter: FilterArgs,
}

#[derive(Args)]
struct StatementsArgs {
    /// Statement book TOML; overrides `data.statements_path`.
    #[arg(long)]
    book: Option<PathBuf>,
    /// Hide alerts below this severity.
    #[arg(long, value_enum, default_value_t = Severity::Info)]
    min_severity: Severity,
}

#[derive(Args)]
struct SimulateArgs {
    /// ADR increase in percent; defaults to `scenario.adr_uplift_pct`.
    #[arg(long)]
    adr_pct: Option<Decimal>,
    /// Occupied-room increase in percent; defaults to `scenario.occupancy_uplift_pct`.
    #[arg(long)]
    occupancy_pct: Option<Decimal>,
    #[command(flatten)]
    filter: FilterArgs,
}

#[derive(Args)]
struct GenerateArgs {
    /// First business date (format: YYYY-MM-DD).
    #[arg(long, default_value = "2024-01-01")]
    from: NaiveDate,
    /// Last business date (format: YYYY-MM-DD); defaults to today.
    #[arg(long)]
    to: Option<NaiveDate>,
    /// Hotel name written on every record.
    #[arg(long, default_value = "Hotel des Iles")]
    hotel: String,
    /// Output CSV; defaults to `data.records_path`.
    #[arg(long)]
    out: Option<PathBuf>,
    /// Random seed; the same seed reproduces the same file.
    #[arg(long, default_value_t = data_source::generator::DEFAULT_SEED)]
    seed: u64,
}

// ==============================================================================
// Command Logic
// ==============================================================================

/// Everything a command handler needs: settings, inputs and the engine.
struct App {
    settings: Settings,
    repository: Repository,
    engine: AnalyticsEngine,
    alerter: Option<ThresholdAlerter>,
    json: bool,
}

impl App {
    fn new(cli: &Cli, settings: Settings) -> Result<Self> {
        let records_path = cli.records.clone().unwrap_or_else(|| settings.data.records_path.clone());
        let skip_invalid = cli.skip_invalid || settings.data.skip_invalid;
        let statements_path = match &cli.command {
            Commands::Statements(StatementsArgs { book: Some(book), .. }) => book.clone(),
            _ => settings.data.statements_path.clone(),
        };

        let repository = Repository::new(
            CsvRecordSource::new(records_path).skip_invalid(skip_invalid),
            StatementSource::new(statements_path),
        );
        let alerter = ThresholdAlerter::new(&settings.alerts).context("Invalid alert rule in configuration")?;

        Ok(Self {
            settings,
            repository,
            engine: AnalyticsEngine::new(),
            alerter,
            json: cli.json,
        })
    }

    /// Loads the validated records and applies the command's filter.
    fn records(&self, filter: FilterArgs) -> Result<Vec<HotelRecord>> {
        let filter = RecordFilter::from(filter);
        let records = self.repository.filtered(&filter).context("Failed to load hotel records")?;

        let report = self.repository.load_report()?;
        if report.skipped_rows() > 0 {
            tracing::warn!(skipped = report.skipped_rows(), total = report.total_rows, "Some rows were skipped.");
        }
        if records.is_empty() {
            tracing::warn!("No hotel records match the selection.");
        }
        Ok(records)
    }

    fn alerts(&self, metrics: &BTreeMap<String, Option<Decimal>>, min_severity: Severity) -> Vec<Alert> {
        let mut alerts = self
            .alerter
            .as_ref()
            .map(|alerter| alerter.evaluate_present(metrics))
            .unwrap_or_default();
        alerts.retain(|a| a.severity >= min_severity);
        alerts
    }

    fn print_json<T: Serialize>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    fn print_alerts(&self, alerts: &[Alert]) {
        if alerts.is_empty() {
            println!("\nNo alerts.");
        } else {
            println!("\nAlerts\n{}", render::alerts_table(alerts));
        }
    }

    fn handle_kpi(&self, args: KpiArgs) -> Result<()> {
        let records = self.records(args.filter)?;
        let report = self.engine.kpi_report(&records);
        let alerts = self.alerts(&report.metrics(), args.min_severity);

        if self.json {
            return self.print_json(&serde_json::json!({ "report": report, "alerts": alerts }));
        }
        println!("Key performance indicators\n{}", render::kpi_table(&report));
        println!("\nDepartments\n{}", render::department_table(&report.departments));
        println!("\nSales channels\n{}", render::channel_table(&report.channels));
        self.print_alerts(&alerts);
        Ok(())
    }

    fn handle_breakdown(&self, args: BreakdownArgs) -> Result<()> {
        let records = self.records(args.filter)?;
        let rows = self.engine.breakdown(&records, args.by);

        if self.json {
            return self.print_json(&rows);
        }
        println!("{}", render::breakdown_table(args.by.as_str(), rows.values()));
        Ok(())
    }

    fn handle_daily(&self, args: FilterArgs) -> Result<()> {
        let records = self.records(args)?;
        let daily = self.engine.daily(&records);

        if self.json {
            return self.print_json(&daily);
        }
        println!("{}", render::daily_table(&daily));
        Ok(())
    }

    fn handle_forecast(&self, args: ForecastArgs) -> Result<()> {
        let horizon = args.horizon.unwrap_or(self.settings.forecast.horizon);
        anyhow::ensure!(horizon > 0, "The forecast horizon must be at least 1 day");

        let records = self.records(args.filter)?;
        let forecast = self
            .engine
            .occupancy_forecast(&records, horizon)
            .context("Cannot fit an occupancy trend to the selected records")?;

        if self.json {
            return self.print_json(&forecast);
        }
        println!("Occupancy trend, next {horizon} days\n{}", render::forecast_table(&forecast));
        Ok(())
    }

    fn handle_statements(&self, args: StatementsArgs) -> Result<()> {
        let book = self.repository.statements().context("Failed to load statement book")?;
        let statements = &self.settings.statements;
        let report = self
            .engine
            .financial_report(book, &statements.bindings, &statements.prior, &statements.current)
            .context("The statement book does not match the configured bindings")?;
        let alerts = self.alerts(&report.metrics(), args.min_severity);

        if self.json {
            return self.print_json(&serde_json::json!({ "report": report, "alerts": alerts }));
        }
        println!("Financial ratios\n{}", render::ratios_table(&report));
        for period in [&report.prior, &report.current] {
            for reason in &period.undefined {
                println!("  {}: {reason}", period.label);
            }
        }
        for (name, variances) in &report.variances {
            println!("\nVariances: {name}\n{}", render::variance_table(variances));
        }
        self.print_alerts(&alerts);
        Ok(())
    }

    fn handle_simulate(&self, args: SimulateArgs) -> Result<()> {
        let adr_pct = args.adr_pct.unwrap_or(self.settings.scenario.adr_uplift_pct);
        let occupancy_pct = args.occupancy_pct.unwrap_or(self.settings.scenario.occupancy_uplift_pct);
        anyhow::ensure!(
            adr_pct >= -Decimal::ONE_HUNDRED && occupancy_pct >= -Decimal::ONE_HUNDRED,
            "Uplifts below -100% are not meaningful"
        );

        let records = self.records(args.filter)?;
        let outcome = self
            .engine
            .simulate(&records, adr_pct, occupancy_pct)
            .context("The scenario is out of range")?;

        if self.json {
            return self.print_json(&outcome);
        }
        println!(
            "Scenario: ADR +{adr_pct}%, occupancy +{occupancy_pct}%\n{}",
            render::scenario_table(&outcome)
        );
        Ok(())
    }

    fn handle_generate(&self, args: GenerateArgs) -> Result<()> {
        let to = args.to.unwrap_or_else(|| chrono::Local::now().date_naive());
        let out = args.out.unwrap_or_else(|| self.settings.data.records_path.clone());
        let config = GeneratorConfig::new(args.from, to, args.hotel).with_seed(args.seed);

        let records = SyntheticGenerator::new(config)?.generate()?;
        write_csv(&records, &out).with_context(|| format!("Failed to write {}", out.display()))?;

        if self.json {
            return self.print_json(&serde_json::json!({ "path": out, "records": records.len() }));
        }
        println!("Wrote {} records to {}", records.len(), out.display());
        Ok(())
    }
}
