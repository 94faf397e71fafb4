use crate::aggregate::Totals;
use crate::error::AnalyticsError;
use crate::forecast::TrendLine;
use crate::mix::{
    channel_mix, channel_share_gaps, department_mix, revpar_dispersion, ChannelShare, DepartmentShare,
};
use crate::ratios::checked_pct;
use chrono::{Duration, NaiveDate};
use core_types::HotelRecord;
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Turns an engine result into the "explicit undefined" marker used by reports.
///
/// Undefined ratios become `None`. Any other failure is also reported as
/// `None`, but logged as a warning since it points at bad input.
pub(crate) fn defined(result: Result<Decimal, AnalyticsError>) -> Option<Decimal> {
    match result {
        Ok(value) => Some(value),
        Err(e) if e.is_undefined() => {
            tracing::debug!(error = %e, "Metric left undefined.");
            None
        }
        Err(e) => {
            tracing::warn!(error = %e, "Metric could not be computed.");
            None
        }
    }
}

/// Period KPIs for a set of hotel records.
///
/// This is the value object handed to presentation and export layers. Ratios
/// are pooled over the whole record set, and `None` means "undefined".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiReport {
    pub records: usize,
    pub totals: Totals,
    pub total_revenue: Decimal,
    pub total_cost: Decimal,
    pub gop: Decimal,
    pub gop_margin_pct: Option<Decimal>,
    pub occupancy_rate: Option<Decimal>,
    pub adr: Option<Decimal>,
    pub revpar: Option<Decimal>,
    pub goppar: Option<Decimal>,
    pub trevpar: Option<Decimal>,
    pub copar: Option<Decimal>,
    pub revpar_dispersion: Option<Decimal>,
    pub departments: Vec<DepartmentShare>,
    pub channels: Vec<ChannelShare>,
}

impl KpiReport {
    pub fn from_records(records: &[HotelRecord]) -> Self {
        let totals: Totals = records.iter().sum();
        let gop = totals.gop();
        Self {
            records: records.len(),
            total_revenue: totals.total_revenue(),
            total_cost: totals.total_cost(),
            gop,
            gop_margin_pct: defined(checked_pct("gop_margin", gop, totals.total_revenue())),
            occupancy_rate: defined(totals.occupancy_rate()),
            adr: defined(totals.adr()),
            revpar: defined(totals.revpar()),
            goppar: defined(totals.goppar()),
            trevpar: defined(totals.trevpar()),
            copar: defined(totals.copar()),
            revpar_dispersion: defined(revpar_dispersion(records)),
            departments: department_mix(records),
            channels: channel_mix(records),
            totals,
        }
    }

    /// Flat metric-name -> value view, used for threshold alerts and exports.
    ///
    /// Channel shares appear as `channel_share.<channel>`, and each channel's
    /// lead over the next largest as `channel_share_gap.<channel>`.
    pub fn metrics(&self) -> BTreeMap<String, Option<Decimal>> {
        let mut metrics: BTreeMap<String, Option<Decimal>> = [
            ("total_revenue", Some(self.total_revenue)),
            ("total_cost", Some(self.total_cost)),
            ("gop", Some(self.gop)),
            ("gop_margin_pct", self.gop_margin_pct),
            ("occupancy_rate", self.occupancy_rate),
            ("adr", self.adr),
            ("revpar", self.revpar),
            ("goppar", self.goppar),
            ("trevpar", self.trevpar),
            ("copar", self.copar),
            ("revpar_dispersion", self.revpar_dispersion),
        ]
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect();

        for channel in &self.channels {
            metrics.insert(format!("channel_share.{}", channel.channel), Some(channel.share));
        }
        for (channel, gap) in channel_share_gaps(&self.channels) {
            metrics.insert(format!("channel_share_gap.{channel}"), Some(gap));
        }
        metrics
    }
}

/// KPIs of a single business date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyKpi {
    pub date: NaiveDate,
    pub totals: Totals,
    pub occupancy_rate: Option<Decimal>,
    pub adr: Option<Decimal>,
    pub revpar: Option<Decimal>,
    pub goppar: Option<Decimal>,
}

/// One KPI row per date present in the input, in chronological order.
pub fn daily_kpis(records: &[HotelRecord]) -> Vec<DailyKpi> {
    let mut by_date: BTreeMap<NaiveDate, Totals> = BTreeMap::new();
    for r in records {
        *by_date.entry(r.date).or_default() += Totals::from_record(r);
    }
    by_date
        .into_iter()
        .map(|(date, totals)| DailyKpi {
            date,
            occupancy_rate: defined(totals.occupancy_rate()),
            adr: defined(totals.adr()),
            revpar: defined(totals.revpar()),
            goppar: defined(totals.goppar()),
            totals,
        })
        .collect()
}

/// A projected occupancy rate for a future date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancyForecast {
    pub date: NaiveDate,
    pub occupancy_rate: Decimal,
}

/// Extrapolates the daily occupancy trend `horizon` days forward.
///
/// The regression feature is the number of days since the first observed
/// date; days with undefined occupancy are left out of the fit. Projections
/// are not clamped to `[0, 1]`.
pub fn forecast_occupancy(
    daily: &[DailyKpi],
    horizon: usize,
) -> Result<Vec<OccupancyForecast>, AnalyticsError> {
    let Some(origin) = daily.first().map(|d| d.date) else {
        return Err(AnalyticsError::InsufficientData {
            operation: "forecast_occupancy".to_string(),
            required: 2,
            actual: 0,
        });
    };

    let series: Vec<(Decimal, Decimal)> = daily
        .iter()
        .filter_map(|d| {
            d.occupancy_rate
                .map(|rate| (Decimal::from((d.date - origin).num_days()), rate))
        })
        .collect();

    let last_x = series.last().map(|(x, _)| *x).unwrap_or_default();
    let line = TrendLine::fit(&series)?;

    // Project on whole days after the last observation.
    Ok((1..=horizon)
        .filter_map(|k| {
            let x = last_x + Decimal::from(k);
            let offset = x.to_i64()?;
            Some(OccupancyForecast {
                date: origin + Duration::days(offset),
                occupancy_rate: line.predict(x),
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn record(day: u32, capacity: u32, occupied: u32, room_revenue: Decimal) -> HotelRecord {
        HotelRecord {
            date: NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
            hotel: "Harbour".to_string(),
            room_type: "Double".to_string(),
            channel: if day % 2 == 0 { "OTA" } else { "Direct" }.to_string(),
            capacity,
            occupied,
            room_revenue,
            fnb_revenue: dec!(0),
            spa_revenue: dec!(0),
            other_revenue: dec!(0),
            rooms_cost: dec!(0),
            fnb_cost: dec!(0),
            spa_cost: dec!(0),
            other_cost: dec!(0),
        }
    }

    #[test]
    fn report_pools_ratios_over_all_records() {
        let records = vec![record(1, 10, 6, dec!(600)), record(2, 10, 8, dec!(960))];
        let report = KpiReport::from_records(&records);
        assert_eq!(report.occupancy_rate, Some(dec!(0.7)));
        assert_eq!(report.adr.map(|v| v.round_dp(2)), Some(dec!(111.43)));
        assert_eq!(report.revpar, Some(dec!(78)));
        assert_eq!(report.gop, dec!(1560));
        assert_eq!(report.gop_margin_pct, Some(dec!(100)));
    }

    #[test]
    fn empty_report_is_all_undefined() {
        let report = KpiReport::from_records(&[]);
        assert_eq!(report.records, 0);
        assert_eq!(report.occupancy_rate, None);
        assert_eq!(report.adr, None);
        assert_eq!(report.revpar_dispersion, None);
        assert_eq!(report.gop, Decimal::ZERO);
    }

    #[test]
    fn metrics_expose_channel_shares() {
        let records = vec![record(1, 10, 6, dec!(600)), record(2, 10, 8, dec!(960))];
        let metrics = KpiReport::from_records(&records).metrics();
        assert_eq!(metrics["channel_share.OTA"], Some(dec!(0.5)));
        assert_eq!(metrics["channel_share_gap.OTA"], Some(Decimal::ZERO));
        assert_eq!(metrics["occupancy_rate"], Some(dec!(0.7)));
        assert!(metrics.contains_key("goppar"));
    }

    #[test]
    fn daily_rows_are_chronological_and_keep_undefined_adr() {
        let records = vec![
            record(3, 10, 0, dec!(0)),
            record(1, 10, 5, dec!(500)),
            record(1, 5, 5, dec!(700)),
        ];
        let daily = daily_kpis(&records);
        assert_eq!(daily.len(), 2);
        assert_eq!(daily[0].date, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(daily[0].totals.capacity, 15);
        assert_eq!(daily[0].adr, Some(dec!(120)));
        assert_eq!(daily[1].adr, None);
        assert_eq!(daily[1].occupancy_rate, Some(Decimal::ZERO));
    }

    #[test]
    fn occupancy_forecast_continues_daily_trend() {
        let records = vec![
            record(1, 10, 5, dec!(500)),
            record(2, 10, 6, dec!(600)),
            record(3, 10, 7, dec!(700)),
        ];
        let forecast = forecast_occupancy(&daily_kpis(&records), 2).unwrap();
        assert_eq!(forecast.len(), 2);
        assert_eq!(forecast[0].date, NaiveDate::from_ymd_opt(2025, 1, 4).unwrap());
        assert_eq!(forecast[0].occupancy_rate, dec!(0.8));
        assert_eq!(forecast[1].occupancy_rate, dec!(0.9));
    }

    #[test]
    fn occupancy_forecast_needs_two_days() {
        let daily = daily_kpis(&[record(1, 10, 5, dec!(500))]);
        assert!(matches!(
            forecast_occupancy(&daily, 30),
            Err(AnalyticsError::InsufficientData { .. })
        ));
        assert!(forecast_occupancy(&[], 30).is_err());
    }
}
