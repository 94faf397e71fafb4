//! Profitability, liquidity and leverage ratios over labeled statements.
//!
//! Statement lines are always addressed through declared labels, and
//! balance-sheet snapshot values (equity, total assets, interest expense) are
//! passed in explicitly rather than read from a fixed row position.

use crate::error::AnalyticsError;
use crate::ratios::{checked_pct, checked_ratio, period_delta};
use core_types::{Period, StatementTable};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which income-statement lines feed the profitability ratios.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IncomeStatementLabels {
    pub revenue: String,
    pub operating_result: String,
    pub net_result: String,
}

impl Default for IncomeStatementLabels {
    fn default() -> Self {
        Self {
            revenue: "Revenue".to_string(),
            operating_result: "Operating result".to_string(),
            net_result: "Net result".to_string(),
        }
    }
}

/// Snapshot values that are not flows and therefore not on the income statement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceReferences {
    /// Equity attributable to the group, the ROE denominator.
    pub equity_reference: Decimal,
    /// Total assets, the ROA denominator.
    pub total_assets_reference: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfitabilityRatios {
    pub net_margin: Decimal,
    pub operating_margin: Decimal,
    pub roe: Decimal,
    pub roa: Decimal,
}

/// Net and operating margin, ROE and ROA for one period, all in percent.
pub fn profitability_ratios(
    income_statement: &StatementTable,
    period: Period,
    labels: &IncomeStatementLabels,
    references: &BalanceReferences,
) -> Result<ProfitabilityRatios, AnalyticsError> {
    let revenue = income_statement.value(&labels.revenue, period)?;
    let operating_result = income_statement.value(&labels.operating_result, period)?;
    let net_result = income_statement.value(&labels.net_result, period)?;

    Ok(ProfitabilityRatios {
        net_margin: checked_pct("net_margin", net_result, revenue)?,
        operating_margin: checked_pct("operating_margin", operating_result, revenue)?,
        roe: checked_pct("roe", net_result, references.equity_reference)?,
        roa: checked_pct("roa", net_result, references.total_assets_reference)?,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityRatios {
    pub current_ratio: Decimal,
    pub quick_ratio: Decimal,
    pub cash_ratio_pct: Decimal,
}

pub fn liquidity_ratios(
    current_assets: Decimal,
    inventory: Decimal,
    cash: Decimal,
    current_liabilities: Decimal,
) -> Result<LiquidityRatios, AnalyticsError> {
    Ok(LiquidityRatios {
        current_ratio: checked_ratio("current_ratio", current_assets, current_liabilities)?,
        quick_ratio: checked_ratio("quick_ratio", current_assets - inventory, current_liabilities)?,
        cash_ratio_pct: checked_pct("cash_ratio_pct", cash, current_liabilities)?,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeverageRatios {
    /// Financial debt minus cash and cash equivalents.
    pub net_debt: Decimal,
    pub net_debt_to_equity: Decimal,
    /// Uses the operating result as an EBITDA proxy.
    pub net_debt_to_ebitda: Decimal,
    pub interest_coverage: Decimal,
}

/// Debt ratios. `operating_result` stands in for EBITDA in both the
/// net-debt/EBITDA and the interest coverage ratio.
pub fn leverage_ratios(
    financial_debt: Decimal,
    cash: Decimal,
    equity: Decimal,
    operating_result: Decimal,
    interest_expense: Decimal,
) -> Result<LeverageRatios, AnalyticsError> {
    let net_debt = financial_debt - cash;
    Ok(LeverageRatios {
        net_debt,
        net_debt_to_equity: checked_ratio("net_debt_to_equity", net_debt, equity)?,
        net_debt_to_ebitda: checked_ratio("net_debt_to_ebitda", net_debt, operating_result)?,
        interest_coverage: checked_ratio("interest_coverage", operating_result, interest_expense)?,
    })
}

/// Prior vs current for one statement line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineVariance {
    pub label: String,
    pub prior: Decimal,
    pub current: Decimal,
    pub absolute: Decimal,
    /// `None` when the prior value is zero.
    pub percent: Option<Decimal>,
}

/// Variance analysis of every line of a statement, in statement order.
pub fn statement_variances(table: &StatementTable) -> Vec<LineVariance> {
    table
        .lines()
        .iter()
        .map(|line| {
            let percent = match period_delta(line.current, line.prior) {
                Ok(delta) => Some(delta.percent),
                Err(e) => {
                    tracing::debug!(statement = table.name(), line = %line.label, error = %e, "No relative variance.");
                    None
                }
            };
            LineVariance {
                label: line.label.clone(),
                prior: line.prior,
                current: line.current,
                absolute: line.current - line.prior,
                percent,
            }
        })
        .collect()
}
