//! Per-room hospitality ratios and period-over-period deltas.
//!
//! Every function returns `AnalyticsError::DivisionUndefined` when its
//! denominator is zero. Callers decide whether that becomes "n/a", an omitted
//! row, or a documented business default.

use crate::error::AnalyticsError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Divides `numerator` by `denominator`, surfacing a zero denominator as an
/// undefined `metric`.
pub(crate) fn checked_ratio(
    metric: &str,
    numerator: Decimal,
    denominator: Decimal,
) -> Result<Decimal, AnalyticsError> {
    if denominator.is_zero() {
        return Err(AnalyticsError::undefined(metric));
    }
    numerator
        .checked_div(denominator)
        .ok_or_else(|| AnalyticsError::Overflow(metric.to_string()))
}

/// Same as `checked_ratio`, scaled to a percentage.
pub(crate) fn checked_pct(
    metric: &str,
    numerator: Decimal,
    denominator: Decimal,
) -> Result<Decimal, AnalyticsError> {
    checked_ratio(metric, numerator, denominator)?
        .checked_mul(HUNDRED)
        .ok_or_else(|| AnalyticsError::Overflow(metric.to_string()))
}

/// Occupied rooms over available rooms, as a fraction in `[0, 1]` for valid input.
pub fn occupancy_rate(occupied: u64, capacity: u64) -> Result<Decimal, AnalyticsError> {
    checked_ratio("occupancy_rate", Decimal::from(occupied), Decimal::from(capacity))
}

/// Average Daily Rate. A hotel with no occupied rooms has no rate, not a free one.
pub fn adr(room_revenue: Decimal, occupied: u64) -> Result<Decimal, AnalyticsError> {
    checked_ratio("adr", room_revenue, Decimal::from(occupied))
}

/// Revenue Per Available Room.
pub fn revpar(room_revenue: Decimal, capacity: u64) -> Result<Decimal, AnalyticsError> {
    checked_ratio("revpar", room_revenue, Decimal::from(capacity))
}

/// Gross Operating Profit Per Available Room.
pub fn goppar(gop: Decimal, capacity: u64) -> Result<Decimal, AnalyticsError> {
    checked_ratio("goppar", gop, Decimal::from(capacity))
}

/// Total revenue per available room.
pub fn trevpar(total_revenue: Decimal, capacity: u64) -> Result<Decimal, AnalyticsError> {
    checked_ratio("trevpar", total_revenue, Decimal::from(capacity))
}

/// Total cost per available room.
pub fn copar(total_cost: Decimal, capacity: u64) -> Result<Decimal, AnalyticsError> {
    checked_ratio("copar", total_cost, Decimal::from(capacity))
}

/// The change between two period values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodDelta {
    /// `current - prior`, exact.
    pub absolute: Decimal,
    /// `(current - prior) / prior * 100`.
    pub percent: Decimal,
}

/// Computes the absolute and relative change from `prior` to `current`.
///
/// Fails with `DivisionUndefined` when `prior` is zero; the absolute change is
/// still available through `current - prior` in that case.
pub fn period_delta(current: Decimal, prior: Decimal) -> Result<PeriodDelta, AnalyticsError> {
    let absolute = current - prior;
    let percent = checked_pct("period_delta", absolute, prior)?;
    Ok(PeriodDelta { absolute, percent })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn occupancy_is_a_fraction() {
        assert_eq!(occupancy_rate(14, 20).unwrap(), dec!(0.7));
        assert_eq!(occupancy_rate(0, 20).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn zero_denominators_are_undefined_not_zero() {
        assert!(occupancy_rate(0, 0).unwrap_err().is_undefined());
        assert!(adr(dec!(500), 0).unwrap_err().is_undefined());
        assert!(revpar(dec!(500), 0).unwrap_err().is_undefined());
        assert!(goppar(dec!(500), 0).unwrap_err().is_undefined());
        assert!(trevpar(dec!(500), 0).unwrap_err().is_undefined());
        assert!(copar(dec!(500), 0).unwrap_err().is_undefined());
    }

    #[test]
    fn undefined_error_names_the_metric() {
        let err = adr(dec!(1), 0).unwrap_err();
        assert_eq!(
            err,
            AnalyticsError::DivisionUndefined {
                metric: "adr".to_string()
            }
        );
    }

    #[test]
    fn period_delta_matches_variance_table() {
        let revenue = period_delta(dec!(2745), dec!(2677)).unwrap();
        assert_eq!(revenue.absolute, dec!(68));
        assert_eq!(revenue.percent.round_dp(1), dec!(2.5));

        let net = period_delta(dec!(258), dec!(272)).unwrap();
        assert_eq!(net.absolute, dec!(-14));
        assert_eq!(net.percent.round_dp(1), dec!(-5.1));
    }

    #[test]
    fn period_delta_absolute_is_exact() {
        let d = period_delta(dec!(0.3), dec!(0.1)).unwrap();
        assert_eq!(d.absolute, dec!(0.2));
        assert_eq!(d.percent, dec!(200));
    }

    #[test]
    fn period_delta_from_zero_prior_is_undefined() {
        assert!(period_delta(dec!(10), Decimal::ZERO).unwrap_err().is_undefined());
    }
}
