use crate::aggregate::breakdown_by;
use crate::error::AnalyticsError;
use crate::ratios::checked_ratio;
use core_types::{Department, Dimension, HotelRecord};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Revenue, cost and profit of one operating department.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentShare {
    pub department: Department,
    pub revenue: Decimal,
    pub cost: Decimal,
    pub gop: Decimal,
    /// Fraction of total revenue; `None` when there is no revenue at all.
    pub revenue_share: Option<Decimal>,
}

/// Splits revenue and cost by department, in a fixed department order.
pub fn department_mix(records: &[HotelRecord]) -> Vec<DepartmentShare> {
    let total_revenue: Decimal = records.iter().map(HotelRecord::total_revenue).sum();

    Department::ALL
        .iter()
        .map(|&department| {
            let revenue: Decimal = records.iter().map(|r| r.revenue_for(department)).sum();
            let cost: Decimal = records.iter().map(|r| r.cost_for(department)).sum();
            DepartmentShare {
                department,
                revenue,
                cost,
                gop: revenue - cost,
                revenue_share: checked_ratio("revenue_share", revenue, total_revenue).ok(),
            }
        })
        .collect()
}

/// How often a sales channel appears among the records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelShare {
    pub channel: String,
    pub records: usize,
    pub share: Decimal,
}

/// Record-count share of each channel, largest first (ties by name).
pub fn channel_mix(records: &[HotelRecord]) -> Vec<ChannelShare> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for r in records {
        *counts.entry(r.channel.as_str()).or_default() += 1;
    }
    let total = Decimal::from(records.len());

    let mut shares: Vec<ChannelShare> = counts
        .into_iter()
        .map(|(channel, n)| ChannelShare {
            channel: channel.to_string(),
            records: n,
            // `total` is non-zero whenever a channel was counted.
            share: Decimal::from(n) / total,
        })
        .collect();
    shares.sort_by(|a, b| b.records.cmp(&a.records).then_with(|| a.channel.cmp(&b.channel)));
    shares
}

/// Each channel's share minus the largest share held by any other channel.
///
/// Positive only for a channel that strictly leads the mix; a tie for first
/// place gives zero. A lone channel's gap is its whole share.
pub fn channel_share_gaps(channels: &[ChannelShare]) -> Vec<(String, Decimal)> {
    channels
        .iter()
        .enumerate()
        .map(|(i, channel)| {
            let largest_other = channels
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, other)| other.share)
                .max()
                .unwrap_or(Decimal::ZERO);
            (channel.channel.clone(), channel.share - largest_other)
        })
        .collect()
}

/// Relative RevPAR spread across room types: `(max - min) / max`.
///
/// Room types without capacity have no RevPAR and are left out.
pub fn revpar_dispersion(records: &[HotelRecord]) -> Result<Decimal, AnalyticsError> {
    let revpars: Vec<Decimal> = breakdown_by(records, Dimension::RoomType)
        .values()
        .filter_map(|row| row.totals.revpar().ok())
        .collect();

    let (min, max) = match (revpars.iter().min(), revpars.iter().max()) {
        (Some(min), Some(max)) => (*min, *max),
        _ => {
            return Err(AnalyticsError::InsufficientData {
                operation: "revpar_dispersion".to_string(),
                required: 1,
                actual: 0,
            });
        }
    };
    checked_ratio("revpar_dispersion", max - min, max)
}
