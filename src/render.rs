use alerter::Alert;
use analytics::{
    AggregatedRow, ChannelShare, DailyKpi, DepartmentShare, FinancialReport, KpiReport,
    LineVariance, OccupancyForecast, PeriodRatios, ScenarioOutcome,
};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, Color, ContentArrangement, Table};
use configuration::Severity;
use rust_decimal::Decimal;

pub const UNDEFINED: &str = "n/a";

pub fn amount(value: Decimal) -> String {
    value.round_dp(2).to_string()
}

pub fn ratio(value: Option<Decimal>) -> String {
    value.map_or_else(|| UNDEFINED.to_string(), |v| v.round_dp(2).to_string())
}

/// A fraction in `[0, 1]` shown as a percentage.
pub fn fraction_pct(value: Option<Decimal>) -> String {
    value.map_or_else(
        || UNDEFINED.to_string(),
        |v| format!("{}%", (v * Decimal::ONE_HUNDRED).round_dp(1)),
    )
}

/// A value that is already a percentage.
pub fn pct(value: Option<Decimal>) -> String {
    value.map_or_else(|| UNDEFINED.to_string(), |v| format!("{}%", v.round_dp(2)))
}

fn table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.to_vec());
    table
}

fn right(text: String) -> Cell {
    Cell::new(text).set_alignment(CellAlignment::Right)
}

pub fn kpi_table(report: &KpiReport) -> Table {
    let mut t = table(&["KPI", "Value"]);
    let rows = [
        ("Records", report.records.to_string()),
        ("Rooms available", report.totals.capacity.to_string()),
        ("Rooms sold", report.totals.occupied.to_string()),
        ("Occupancy", fraction_pct(report.occupancy_rate)),
        ("ADR", ratio(report.adr)),
        ("RevPAR", ratio(report.revpar)),
        ("TRevPAR", ratio(report.trevpar)),
        ("Total revenue", amount(report.total_revenue)),
        ("Total cost", amount(report.total_cost)),
        ("GOP", amount(report.gop)),
        ("GOP margin", pct(report.gop_margin_pct)),
        ("GOPPAR", ratio(report.goppar)),
        ("CostPAR", ratio(report.copar)),
        ("RevPAR dispersion", ratio(report.revpar_dispersion)),
    ];
    for (name, value) in rows {
        t.add_row(vec![Cell::new(name), right(value)]);
    }
    t
}

pub fn department_table(departments: &[DepartmentShare]) -> Table {
    let mut t = table(&["Department", "Revenue", "Cost", "GOP", "Revenue share"]);
    for d in departments {
        t.add_row(vec![
            Cell::new(d.department.label()),
            right(amount(d.revenue)),
            right(amount(d.cost)),
            right(amount(d.gop)),
            right(fraction_pct(d.revenue_share)),
        ]);
    }
    t
}

pub fn channel_table(channels: &[ChannelShare]) -> Table {
    let mut t = table(&["Channel", "Records", "Share"]);
    for c in channels {
        t.add_row(vec![
            Cell::new(&c.channel),
            right(c.records.to_string()),
            right(fraction_pct(Some(c.share))),
        ]);
    }
    t
}

pub fn breakdown_table<'a>(dimension: &str, rows: impl IntoIterator<Item = &'a AggregatedRow>) -> Table {
    let mut t = table(&[
        dimension, "Capacity", "Occupied", "Occupancy", "ADR", "RevPAR", "Revenue", "GOP", "GOPPAR",
    ]);
    for row in rows {
        t.add_row(vec![
            Cell::new(row.label()),
            right(row.totals.capacity.to_string()),
            right(row.totals.occupied.to_string()),
            right(fraction_pct(row.occupancy_rate().ok())),
            right(ratio(row.adr().ok())),
            right(ratio(row.revpar().ok())),
            right(amount(row.totals.total_revenue())),
            right(amount(row.gop())),
            right(ratio(row.goppar().ok())),
        ]);
    }
    t
}

pub fn daily_table(daily: &[DailyKpi]) -> Table {
    let mut t = table(&["Date", "Capacity", "Occupied", "Occupancy", "ADR", "RevPAR", "GOPPAR"]);
    for d in daily {
        t.add_row(vec![
            Cell::new(d.date.format("%Y-%m-%d")),
            right(d.totals.capacity.to_string()),
            right(d.totals.occupied.to_string()),
            right(fraction_pct(d.occupancy_rate)),
            right(ratio(d.adr)),
            right(ratio(d.revpar)),
            right(ratio(d.goppar)),
        ]);
    }
    t
}

pub fn forecast_table(forecast: &[OccupancyForecast]) -> Table {
    let mut t = table(&["Date", "Projected occupancy"]);
    for f in forecast {
        t.add_row(vec![
            Cell::new(f.date.format("%Y-%m-%d")),
            right(fraction_pct(Some(f.occupancy_rate))),
        ]);
    }
    t
}

pub fn scenario_table(outcome: &ScenarioOutcome) -> Table {
    let mut t = table(&["", "Baseline", "Simulated"]);
    t.add_row(vec![
        Cell::new("Rooms sold"),
        right(outcome.baseline_occupied.to_string()),
        right(outcome.simulated_occupied.to_string()),
    ]);
    t.add_row(vec![
        Cell::new("Total revenue"),
        right(amount(outcome.baseline_total_revenue)),
        right(amount(outcome.simulated_total_revenue)),
    ]);
    t.add_row(vec![Cell::new("Delta"), Cell::new(""), right(amount(outcome.delta))]);
    t
}

type RatioRow = (&'static str, fn(&PeriodRatios) -> String);

const RATIO_ROWS: [RatioRow; 12] = [
    ("Net margin", |p| pct(p.profitability.map(|r| r.net_margin))),
    ("Operating margin", |p| pct(p.profitability.map(|r| r.operating_margin))),
    ("ROE", |p| pct(p.profitability.map(|r| r.roe))),
    ("ROA", |p| pct(p.profitability.map(|r| r.roa))),
    ("Current ratio", |p| ratio(p.liquidity.map(|r| r.current_ratio))),
    ("Quick ratio", |p| ratio(p.liquidity.map(|r| r.quick_ratio))),
    ("Cash ratio", |p| pct(p.liquidity.map(|r| r.cash_ratio_pct))),
    ("Cash", |p| amount(p.cash)),
    ("Net debt", |p| ratio(p.leverage.map(|r| r.net_debt))),
    ("Net debt / equity", |p| ratio(p.leverage.map(|r| r.net_debt_to_equity))),
    ("Net debt / operating result", |p| ratio(p.leverage.map(|r| r.net_debt_to_ebitda))),
    ("Interest coverage", |p| ratio(p.leverage.map(|r| r.interest_coverage))),
];

pub fn ratios_table(report: &FinancialReport) -> Table {
    let mut t = table(&["Ratio", report.prior.label.as_str(), report.current.label.as_str()]);
    for (name, value) in RATIO_ROWS {
        t.add_row(vec![
            Cell::new(name),
            right(value(&report.prior)),
            right(value(&report.current)),
        ]);
    }
    t
}

pub fn variance_table(variances: &[LineVariance]) -> Table {
    let mut t = table(&["Line", "Prior", "Current", "Change", "Change %"]);
    for v in variances {
        t.add_row(vec![
            Cell::new(&v.label),
            right(amount(v.prior)),
            right(amount(v.current)),
            right(amount(v.absolute)),
            right(pct(v.percent)),
        ]);
    }
    t
}

pub fn alerts_table(alerts: &[Alert]) -> Table {
    let mut t = table(&["Severity", "Metric", "Value", "Rule", "Message"]);
    for a in alerts {
        let color = match a.severity {
            Severity::Critical => Color::Red,
            Severity::Warning => Color::Yellow,
            Severity::Info => Color::Cyan,
        };
        t.add_row(vec![
            Cell::new(a.severity).fg(color),
            Cell::new(&a.metric),
            right(a.value.round_dp(4).normalize().to_string()),
            Cell::new(format!("{} {}", a.comparator, a.threshold)),
            Cell::new(&a.message),
        ]);
    }
    t
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn undefined_values_render_as_na() {
        assert_eq!(ratio(None), "n/a");
        assert_eq!(pct(None), "n/a");
        assert_eq!(fraction_pct(None), "n/a");
    }

    #[test]
    fn values_are_rounded_for_display() {
        assert_eq!(ratio(Some(dec!(111.428571))), "111.43");
        assert_eq!(fraction_pct(Some(dec!(0.7))), "70.0%");
        assert_eq!(pct(Some(dec!(14.5355))), "14.54%");
        assert_eq!(amount(dec!(-14)), "-14");
    }

    #[test]
    fn kpi_table_shows_undefined_adr() {
        let report = KpiReport::from_records(&[]);
        let rendered = kpi_table(&report).to_string();
        assert!(rendered.contains("ADR"));
        assert!(rendered.contains(UNDEFINED));
    }
}
