//! # Hotel KPI Analytics Engine
//!
//! This crate turns validated hotel records and financial statements into
//! operating KPIs, financial ratios, mixes, trends and what-if scenarios.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of files,
//!   terminals or configuration. It depends only on `core-types` (Layer 0).
//! - **Exact Arithmetic:** Every amount and ratio is a `Decimal`. Sums over
//!   partitions of a record set equal the sum over the whole set.
//! - **Explicit Undefined:** A ratio with a zero denominator is returned as
//!   `AnalyticsError::DivisionUndefined`, never as zero or infinity. Report value
//!   objects carry it as `None`.
//! - **Stateless Calculation:** The `AnalyticsEngine` holds no state. It takes
//!   records or statements as input and produces reports as output.
//!
//! ## Public API
//!
//! - `AnalyticsEngine`: Facade over every calculation in this crate.
//! - `KpiReport`, `DailyKpi`, `FinancialReport`: The report value objects.
//! - `Totals` / `aggregate`: Additive sums grouped by any set of dimensions.
//! - `AnalyticsError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod aggregate;
pub mod engine;
pub mod error;
pub mod financial;
pub mod forecast;
pub mod mix;
pub mod ratios;
pub mod report;
pub mod scenario;

// Re-export the key components to create a clean, public-facing API.
pub use aggregate::{aggregate, breakdown_by, AggregatedRow, GroupKey, Totals};
pub use engine::{AnalyticsEngine, FinancialReport, PeriodRatios, PeriodReferences, StatementBindings};
pub use error::AnalyticsError;
pub use financial::{
    leverage_ratios, liquidity_ratios, profitability_ratios, statement_variances,
    BalanceReferences, IncomeStatementLabels, LeverageRatios, LineVariance, LiquidityRatios,
    ProfitabilityRatios,
};
pub use forecast::{linear_trend_forecast, TrendLine};
pub use mix::{
    channel_mix, channel_share_gaps, department_mix, revpar_dispersion, ChannelShare, DepartmentShare,
};
pub use ratios::{adr, copar, goppar, occupancy_rate, period_delta, revpar, trevpar, PeriodDelta};
pub use report::{daily_kpis, forecast_occupancy, DailyKpi, KpiReport, OccupancyForecast};
pub use scenario::{simulate_uplift, ScenarioOutcome};
