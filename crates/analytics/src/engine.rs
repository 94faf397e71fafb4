use crate::aggregate::{aggregate, breakdown_by, AggregatedRow};
use crate::error::AnalyticsError;
use crate::financial::{
    leverage_ratios, liquidity_ratios, profitability_ratios, statement_variances,
    BalanceReferences, IncomeStatementLabels, LeverageRatios, LineVariance, LiquidityRatios,
    ProfitabilityRatios,
};
use crate::report::{daily_kpis, forecast_occupancy, DailyKpi, KpiReport, OccupancyForecast};
use crate::scenario::{simulate_uplift, ScenarioOutcome};
use core_types::{Dimension, HotelRecord, Period, StatementBook};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Declares where every statement-based input comes from.
///
/// Statement names and line labels replace the positional lookups a
/// spreadsheet would use, so reordering lines never changes a ratio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatementBindings {
    pub income_statement: String,
    pub assets: String,
    pub liabilities: String,
    pub income: IncomeStatementLabels,
    pub current_asset_lines: Vec<String>,
    pub inventory_line: String,
    pub cash_line: String,
    pub current_liability_lines: Vec<String>,
    pub financial_debt_lines: Vec<String>,
}

impl Default for StatementBindings {
    fn default() -> Self {
        Self {
            income_statement: "income_statement".to_string(),
            assets: "assets".to_string(),
            liabilities: "liabilities".to_string(),
            income: IncomeStatementLabels::default(),
            current_asset_lines: vec![
                "Inventories".to_string(),
                "Trade receivables".to_string(),
                "Other current assets".to_string(),
                "Cash and cash equivalents".to_string(),
            ],
            inventory_line: "Inventories".to_string(),
            cash_line: "Cash and cash equivalents".to_string(),
            current_liability_lines: vec![
                "Current financial debt".to_string(),
                "Trade payables".to_string(),
                "Other current liabilities".to_string(),
            ],
            financial_debt_lines: vec![
                "Non-current financial debt".to_string(),
                "Current financial debt".to_string(),
            ],
        }
    }
}

/// Externally supplied snapshot values for one period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeriodReferences {
    /// Equity attributable to the group, the ROE denominator.
    pub equity_reference: Decimal,
    pub total_assets_reference: Decimal,
    /// Total equity including minorities, the net-debt/equity denominator.
    pub total_equity: Decimal,
    pub interest_expense: Decimal,
}

impl PeriodReferences {
    pub fn balance(&self) -> BalanceReferences {
        BalanceReferences {
            equity_reference: self.equity_reference,
            total_assets_reference: self.total_assets_reference,
        }
    }
}

/// Financial ratios of one period. A `None` set had a zero denominator; the
/// reason is in `undefined`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodRatios {
    pub period: Period,
    pub label: String,
    pub cash: Decimal,
    pub profitability: Option<ProfitabilityRatios>,
    pub liquidity: Option<LiquidityRatios>,
    pub leverage: Option<LeverageRatios>,
    pub undefined: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialReport {
    pub prior: PeriodRatios,
    pub current: PeriodRatios,
    /// Line variances per statement name.
    pub variances: BTreeMap<String, Vec<LineVariance>>,
}

impl FinancialReport {
    /// Current-period figures as a flat metric map for threshold alerts.
    pub fn metrics(&self) -> BTreeMap<String, Option<Decimal>> {
        let c = &self.current;
        let p = c.profitability.as_ref();
        let l = c.liquidity.as_ref();
        let v = c.leverage.as_ref();
        [
            ("cash", Some(c.cash)),
            ("net_margin", p.map(|r| r.net_margin)),
            ("operating_margin", p.map(|r| r.operating_margin)),
            ("roe", p.map(|r| r.roe)),
            ("roa", p.map(|r| r.roa)),
            ("current_ratio", l.map(|r| r.current_ratio)),
            ("quick_ratio", l.map(|r| r.quick_ratio)),
            ("cash_ratio_pct", l.map(|r| r.cash_ratio_pct)),
            ("net_debt", v.map(|r| r.net_debt)),
            ("net_debt_to_equity", v.map(|r| r.net_debt_to_equity)),
            ("net_debt_to_ebitda", v.map(|r| r.net_debt_to_ebitda)),
            ("interest_coverage", v.map(|r| r.interest_coverage)),
        ]
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
    }
}

/// Keeps an undefined ratio set as `None` with a note; any other error aborts.
fn optional<T>(result: Result<T, AnalyticsError>, notes: &mut Vec<String>) -> Result<Option<T>, AnalyticsError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_undefined() => {
            tracing::debug!(error = %e, "Ratio set left undefined.");
            notes.push(e.to_string());
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// A stateless calculator for deriving hotel KPIs and financial ratios.
///
/// Every method is a pure function of its arguments; the engine holds no
/// state and can be shared freely between threads.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnalyticsEngine {}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn aggregate(&self, records: &[HotelRecord], group_keys: &[Dimension]) -> Vec<AggregatedRow> {
        aggregate(records, group_keys)
    }

    pub fn breakdown(&self, records: &[HotelRecord], dimension: Dimension) -> BTreeMap<String, AggregatedRow> {
        breakdown_by(records, dimension)
    }

    pub fn kpi_report(&self, records: &[HotelRecord]) -> KpiReport {
        KpiReport::from_records(records)
    }

    pub fn daily(&self, records: &[HotelRecord]) -> Vec<DailyKpi> {
        daily_kpis(records)
    }

    pub fn occupancy_forecast(
        &self,
        records: &[HotelRecord],
        horizon: usize,
    ) -> Result<Vec<OccupancyForecast>, AnalyticsError> {
        forecast_occupancy(&daily_kpis(records), horizon)
    }

    pub fn simulate(
        &self,
        records: &[HotelRecord],
        adr_uplift_pct: Decimal,
        occupancy_uplift_pct: Decimal,
    ) -> Result<ScenarioOutcome, AnalyticsError> {
        simulate_uplift(records, adr_uplift_pct, occupancy_uplift_pct)
    }

    /// Computes profitability, liquidity and leverage for both periods plus
    /// line variances of every statement in the book.
    ///
    /// # Arguments
    ///
    /// * `book` - The statements, looked up by the names in `bindings`.
    /// * `bindings` - Which statements and lines feed which ratio.
    /// * `prior` / `current` - Snapshot references for each period.
    ///
    /// # Returns
    ///
    /// A `FinancialReport`, or an error when a declared statement or line is
    /// missing. Zero denominators do not fail the report.
    pub fn financial_report(
        &self,
        book: &StatementBook,
        bindings: &StatementBindings,
        prior: &PeriodReferences,
        current: &PeriodReferences,
    ) -> Result<FinancialReport, AnalyticsError> {
        let report = FinancialReport {
            prior: self.period_ratios(book, bindings, Period::Prior, prior)?,
            current: self.period_ratios(book, bindings, Period::Current, current)?,
            variances: book
                .iter()
                .map(|table| (table.name().to_string(), statement_variances(table)))
                .collect(),
        };
        tracing::debug!(statements = book.len(), "Computed financial report.");
        Ok(report)
    }

    fn period_ratios(
        &self,
        book: &StatementBook,
        bindings: &StatementBindings,
        period: Period,
        references: &PeriodReferences,
    ) -> Result<PeriodRatios, AnalyticsError> {
        let income = book.get(&bindings.income_statement)?;
        let assets = book.get(&bindings.assets)?;
        let liabilities = book.get(&bindings.liabilities)?;

        let current_assets = assets.sum_of(&bindings.current_asset_lines, period)?;
        let inventory = assets.value(&bindings.inventory_line, period)?;
        let cash = assets.value(&bindings.cash_line, period)?;
        let current_liabilities = liabilities.sum_of(&bindings.current_liability_lines, period)?;
        let financial_debt = liabilities.sum_of(&bindings.financial_debt_lines, period)?;
        let operating_result = income.value(&bindings.income.operating_result, period)?;

        let mut undefined = Vec::new();
        let profitability = optional(
            profitability_ratios(income, period, &bindings.income, &references.balance()),
            &mut undefined,
        )?;
        let liquidity = optional(
            liquidity_ratios(current_assets, inventory, cash, current_liabilities),
            &mut undefined,
        )?;
        let leverage = optional(
            leverage_ratios(
                financial_debt,
                cash,
                references.total_equity,
                operating_result,
                references.interest_expense,
            ),
            &mut undefined,
        )?;

        Ok(PeriodRatios {
            period,
            label: income.period_label(period).to_string(),
            cash,
            profitability,
            liquidity,
            leverage,
            undefined,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{CoreError, StatementKind, StatementLine, StatementTable};
    use rust_decimal_macros::dec;

    fn book() -> StatementBook {
        let income = StatementTable::new(
            "income_statement",
            StatementKind::IncomeStatement,
            vec![
                StatementLine::new("Revenue", dec!(2677), dec!(2745)),
                StatementLine::new("Operating result", dec!(343), dec!(399)),
                StatementLine::new("Net result", dec!(272), dec!(258)),
            ],
        )
        .unwrap()
        .with_period_labels("H1 2024", "H1 2025");
        // Lines deliberately out of the order the bindings list them in.
        let assets = StatementTable::new(
            "assets",
            StatementKind::Assets,
            vec![
                StatementLine::new("Cash and cash equivalents", dec!(1244), dec!(1135)),
                StatementLine::new("Other current assets", dec!(884), dec!(1053)),
                StatementLine::new("Trade receivables", dec!(803), dec!(856)),
                StatementLine::new("Inventories", dec!(39), dec!(36)),
            ],
        )
        .unwrap();
        let liabilities = StatementTable::new(
            "liabilities",
            StatementKind::Liabilities,
            vec![
                StatementLine::new("Non-current financial debt", dec!(2524), dec!(3128)),
                StatementLine::new("Current financial debt", dec!(478), dec!(465)),
                StatementLine::new("Trade payables", dec!(557), dec!(497)),
                StatementLine::new("Other current liabilities", dec!(1784), dec!(1791)),
            ],
        )
        .unwrap();
        vec![income, assets, liabilities].into_iter().collect()
    }

    fn current_refs() -> PeriodReferences {
        PeriodReferences {
            equity_reference: dec!(4350),
            total_assets_reference: dec!(11829),
            total_equity: dec!(4771),
            interest_expense: dec!(53),
        }
    }

    #[test]
    fn financial_report_resolves_every_binding() {
        let engine = AnalyticsEngine::new();
        let report = engine
            .financial_report(&book(), &StatementBindings::default(), &PeriodReferences::default(), &current_refs())
            .unwrap();

        let current = &report.current;
        assert_eq!(current.label, "H1 2025");
        assert_eq!(current.cash, dec!(1135));
        let liquidity = current.liquidity.unwrap();
        assert_eq!(liquidity.current_ratio.round_dp(2), dec!(1.12));
        let leverage = current.leverage.unwrap();
        assert_eq!(leverage.net_debt, dec!(2458));
        assert_eq!(leverage.interest_coverage.round_dp(2), dec!(7.53));
        assert_eq!(current.profitability.unwrap().roe.round_dp(2), dec!(5.93));
        assert!(current.undefined.is_empty());
    }

    #[test]
    fn missing_references_leave_ratio_sets_undefined() {
        let engine = AnalyticsEngine::new();
        let report = engine
            .financial_report(&book(), &StatementBindings::default(), &PeriodReferences::default(), &current_refs())
            .unwrap();

        let prior = &report.prior;
        assert!(prior.profitability.is_none());
        assert!(prior.leverage.is_none());
        assert!(prior.liquidity.is_some());
        assert_eq!(prior.undefined.len(), 2);
    }

    #[test]
    fn missing_statement_is_a_schema_violation() {
        let bindings = StatementBindings {
            assets: "balance_sheet".to_string(),
            ..StatementBindings::default()
        };
        let err = AnalyticsEngine::new()
            .financial_report(&book(), &bindings, &current_refs(), &current_refs())
            .unwrap_err();
        assert_eq!(
            err,
            AnalyticsError::SchemaViolation(CoreError::MissingStatement("balance_sheet".to_string()))
        );
    }

    #[test]
    fn metrics_report_the_current_period() {
        let report = AnalyticsEngine::new()
            .financial_report(&book(), &StatementBindings::default(), &current_refs(), &current_refs())
            .unwrap();
        let metrics = report.metrics();
        assert_eq!(metrics["cash"], Some(dec!(1135)));
        assert_eq!(metrics["net_margin"].map(|v| v.round_dp(2)), Some(dec!(9.40)));
        assert_eq!(report.variances["income_statement"][0].absolute, dec!(68));
    }
}
