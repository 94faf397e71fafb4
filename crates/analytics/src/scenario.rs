use crate::error::AnalyticsError;
use core_types::HotelRecord;
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Result of replaying the records with a higher rate and/or occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    pub adr_uplift_pct: Decimal,
    pub occupancy_uplift_pct: Decimal,
    pub baseline_occupied: u64,
    pub simulated_occupied: u64,
    pub baseline_total_revenue: Decimal,
    pub simulated_total_revenue: Decimal,
    pub delta: Decimal,
}

/// What-if simulator: raise every row's ADR by `adr_uplift_pct` percent and its
/// occupied rooms by `occupancy_uplift_pct` percent.
///
/// Simulated occupancy is rounded to whole rooms (half to even) and clamped to
/// `[0, capacity]`. Rows with no occupied rooms have no ADR to scale and keep
/// zero room revenue. F&B, spa and other revenue are carried over unchanged.
///
/// Uplifts large enough to push an amount past `Decimal::MAX` give
/// `AnalyticsError::Overflow`.
pub fn simulate_uplift(
    records: &[HotelRecord],
    adr_uplift_pct: Decimal,
    occupancy_uplift_pct: Decimal,
) -> Result<ScenarioOutcome, AnalyticsError> {
    let adr_factor = uplift_factor("adr_uplift", adr_uplift_pct)?;
    let occupancy_factor = uplift_factor("occupancy_uplift", occupancy_uplift_pct)?;

    let mut outcome = ScenarioOutcome {
        adr_uplift_pct,
        occupancy_uplift_pct,
        baseline_occupied: 0,
        simulated_occupied: 0,
        baseline_total_revenue: Decimal::ZERO,
        simulated_total_revenue: Decimal::ZERO,
        delta: Decimal::ZERO,
    };

    for r in records {
        let simulated_occupied = simulated_rooms(r, occupancy_factor)?;
        let simulated_room_revenue = if r.occupied == 0 {
            Decimal::ZERO
        } else {
            r.room_revenue
                .checked_mul(adr_factor)
                .and_then(|v| v.checked_mul(Decimal::from(simulated_occupied)))
                .and_then(|v| v.checked_div(Decimal::from(r.occupied)))
                .ok_or_else(|| overflow("simulated_room_revenue"))?
        };
        let simulated_revenue = [r.fnb_revenue, r.spa_revenue, r.other_revenue]
            .into_iter()
            .try_fold(simulated_room_revenue, Decimal::checked_add)
            .ok_or_else(|| overflow("simulated_total_revenue"))?;

        outcome.baseline_occupied += u64::from(r.occupied);
        outcome.simulated_occupied += u64::from(simulated_occupied);
        outcome.baseline_total_revenue = outcome
            .baseline_total_revenue
            .checked_add(r.total_revenue())
            .ok_or_else(|| overflow("baseline_total_revenue"))?;
        outcome.simulated_total_revenue = outcome
            .simulated_total_revenue
            .checked_add(simulated_revenue)
            .ok_or_else(|| overflow("simulated_total_revenue"))?;
    }
    outcome.delta = outcome
        .simulated_total_revenue
        .checked_sub(outcome.baseline_total_revenue)
        .ok_or_else(|| overflow("revenue_delta"))?;

    tracing::debug!(
        adr_uplift_pct = %adr_uplift_pct,
        occupancy_uplift_pct = %occupancy_uplift_pct,
        delta = %outcome.delta,
        "Simulated uplift scenario."
    );
    Ok(outcome)
}

fn overflow(metric: &str) -> AnalyticsError {
    AnalyticsError::Overflow(metric.to_string())
}

/// `1 + pct / 100`.
fn uplift_factor(metric: &str, pct: Decimal) -> Result<Decimal, AnalyticsError> {
    (pct / Decimal::ONE_HUNDRED)
        .checked_add(Decimal::ONE)
        .ok_or_else(|| overflow(metric))
}

fn simulated_rooms(record: &HotelRecord, occupancy_factor: Decimal) -> Result<u32, AnalyticsError> {
    let rooms = Decimal::from(record.occupied)
        .checked_mul(occupancy_factor)
        .ok_or_else(|| overflow("simulated_occupied"))?
        .round();
    if rooms <= Decimal::ZERO {
        return Ok(0);
    }
    Ok(rooms
        .to_u32()
        .map_or(record.capacity, |n| n.min(record.capacity)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn record(capacity: u32, occupied: u32, room_revenue: Decimal) -> HotelRecord {
        HotelRecord {
            date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            hotel: "Harbour".to_string(),
            room_type: "Double".to_string(),
            channel: "Direct".to_string(),
            capacity,
            occupied,
            room_revenue,
            fnb_revenue: dec!(100),
            spa_revenue: dec!(0),
            other_revenue: dec!(50),
            rooms_cost: dec!(0),
            fnb_cost: dec!(0),
            spa_cost: dec!(0),
            other_cost: dec!(0),
        }
    }

    #[test]
    fn no_uplift_reproduces_baseline() {
        let records = vec![record(30, 20, dec!(1800)), record(5, 0, dec!(0))];
        let outcome = simulate_uplift(&records, Decimal::ZERO, Decimal::ZERO).unwrap();
        assert_eq!(outcome.delta, Decimal::ZERO);
        assert_eq!(outcome.simulated_occupied, 20);
        assert_eq!(outcome.baseline_total_revenue, dec!(2100));
    }

    #[test]
    fn adr_uplift_scales_room_revenue_only() {
        let outcome = simulate_uplift(&[record(30, 20, dec!(1800))], dec!(10), Decimal::ZERO).unwrap();
        assert_eq!(outcome.simulated_total_revenue, dec!(2130));
        assert_eq!(outcome.delta, dec!(180));
    }

    #[test]
    fn occupancy_uplift_sells_rooms_at_the_same_rate() {
        // 20 rooms at 90 -> 25 rooms at 90
        let outcome = simulate_uplift(&[record(30, 20, dec!(1800))], Decimal::ZERO, dec!(25)).unwrap();
        assert_eq!(outcome.simulated_occupied, 25);
        assert_eq!(outcome.delta, dec!(450));
    }

    #[test]
    fn simulated_occupancy_never_exceeds_capacity() {
        let outcome = simulate_uplift(&[record(22, 20, dec!(1800))], Decimal::ZERO, dec!(30)).unwrap();
        assert_eq!(outcome.simulated_occupied, 22);
    }

    #[test]
    fn empty_rows_stay_empty() {
        let outcome = simulate_uplift(&[record(5, 0, dec!(0))], dec!(50), dec!(30)).unwrap();
        assert_eq!(outcome.simulated_occupied, 0);
        assert_eq!(outcome.delta, Decimal::ZERO);
    }

    #[test]
    fn huge_adr_uplift_is_an_overflow_error() {
        let err = simulate_uplift(&[record(30, 20, dec!(1800))], Decimal::MAX, Decimal::ZERO).unwrap_err();
        assert_eq!(err, AnalyticsError::Overflow("simulated_room_revenue".to_string()));
    }

    #[test]
    fn huge_occupancy_uplift_fills_to_capacity() {
        let outcome = simulate_uplift(&[record(30, 20, dec!(1800))], Decimal::ZERO, dec!(1000000)).unwrap();
        assert_eq!(outcome.simulated_occupied, 30);
        assert_eq!(outcome.delta, dec!(900));
    }
}
