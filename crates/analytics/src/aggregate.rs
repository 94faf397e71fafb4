use crate::error::AnalyticsError;
use crate::ratios;
use core_types::{Dimension, HotelRecord};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Summed capacity, occupancy, revenue and cost components of a set of records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub capacity: u64,
    pub occupied: u64,
    pub room_revenue: Decimal,
    pub fnb_revenue: Decimal,
    pub spa_revenue: Decimal,
    pub other_revenue: Decimal,
    pub rooms_cost: Decimal,
    pub fnb_cost: Decimal,
    pub spa_cost: Decimal,
    pub other_cost: Decimal,
}

impl Totals {
    pub fn from_record(record: &HotelRecord) -> Self {
        Self {
            capacity: u64::from(record.capacity),
            occupied: u64::from(record.occupied),
            room_revenue: record.room_revenue,
            fnb_revenue: record.fnb_revenue,
            spa_revenue: record.spa_revenue,
            other_revenue: record.other_revenue,
            rooms_cost: record.rooms_cost,
            fnb_cost: record.fnb_cost,
            spa_cost: record.spa_cost,
            other_cost: record.other_cost,
        }
    }

    pub fn total_revenue(&self) -> Decimal {
        self.room_revenue + self.fnb_revenue + self.spa_revenue + self.other_revenue
    }

    pub fn total_cost(&self) -> Decimal {
        self.rooms_cost + self.fnb_cost + self.spa_cost + self.other_cost
    }

    /// Gross Operating Profit.
    pub fn gop(&self) -> Decimal {
        self.total_revenue() - self.total_cost()
    }

    pub fn occupancy_rate(&self) -> Result<Decimal, AnalyticsError> {
        ratios::occupancy_rate(self.occupied, self.capacity)
    }

    pub fn adr(&self) -> Result<Decimal, AnalyticsError> {
        ratios::adr(self.room_revenue, self.occupied)
    }

    pub fn revpar(&self) -> Result<Decimal, AnalyticsError> {
        ratios::revpar(self.room_revenue, self.capacity)
    }

    pub fn goppar(&self) -> Result<Decimal, AnalyticsError> {
        ratios::goppar(self.gop(), self.capacity)
    }

    pub fn trevpar(&self) -> Result<Decimal, AnalyticsError> {
        ratios::trevpar(self.total_revenue(), self.capacity)
    }

    pub fn copar(&self) -> Result<Decimal, AnalyticsError> {
        ratios::copar(self.total_cost(), self.capacity)
    }
}

impl AddAssign for Totals {
    fn add_assign(&mut self, rhs: Self) {
        self.capacity += rhs.capacity;
        self.occupied += rhs.occupied;
        self.room_revenue += rhs.room_revenue;
        self.fnb_revenue += rhs.fnb_revenue;
        self.spa_revenue += rhs.spa_revenue;
        self.other_revenue += rhs.other_revenue;
        self.rooms_cost += rhs.rooms_cost;
        self.fnb_cost += rhs.fnb_cost;
        self.spa_cost += rhs.spa_cost;
        self.other_cost += rhs.other_cost;
    }
}

impl Add for Totals {
    type Output = Totals;

    fn add(mut self, rhs: Self) -> Self::Output {
        self += rhs;
        self
    }
}

impl Sum for Totals {
    fn sum<I: Iterator<Item = Totals>>(iter: I) -> Self {
        iter.fold(Totals::default(), |acc, t| acc + t)
    }
}

impl<'a> Sum<&'a HotelRecord> for Totals {
    fn sum<I: Iterator<Item = &'a HotelRecord>>(iter: I) -> Self {
        iter.map(Totals::from_record).sum()
    }
}

/// The value of each grouping dimension, in the order the dimensions were requested.
pub type GroupKey = Vec<(Dimension, String)>;

/// One output row of `aggregate`: a distinct key combination and its totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedRow {
    pub key: GroupKey,
    pub totals: Totals,
}

impl AggregatedRow {
    /// The key values joined for display, e.g. `2025-01-01 / Suite`.
    pub fn label(&self) -> String {
        if self.key.is_empty() {
            return "ALL".to_string();
        }
        self.key
            .iter()
            .map(|(_, value)| value.as_str())
            .collect::<Vec<_>>()
            .join(" / ")
    }

    pub fn gop(&self) -> Decimal {
        self.totals.gop()
    }

    pub fn occupancy_rate(&self) -> Result<Decimal, AnalyticsError> {
        self.totals.occupancy_rate()
    }

    pub fn adr(&self) -> Result<Decimal, AnalyticsError> {
        self.totals.adr()
    }

    pub fn revpar(&self) -> Result<Decimal, AnalyticsError> {
        self.totals.revpar()
    }

    pub fn goppar(&self) -> Result<Decimal, AnalyticsError> {
        self.totals.goppar()
    }

    pub fn trevpar(&self) -> Result<Decimal, AnalyticsError> {
        self.totals.trevpar()
    }

    pub fn copar(&self) -> Result<Decimal, AnalyticsError> {
        self.totals.copar()
    }
}

/// Groups records by `group_keys` and sums every component.
///
/// Rows come back ordered by key. An empty key list yields a single
/// grand-total row; empty input yields no rows at all.
pub fn aggregate(records: &[HotelRecord], group_keys: &[Dimension]) -> Vec<AggregatedRow> {
    let mut groups: BTreeMap<Vec<String>, Totals> = BTreeMap::new();
    for record in records {
        let key = group_keys.iter().map(|d| d.value_of(record)).collect();
        *groups.entry(key).or_default() += Totals::from_record(record);
    }

    tracing::debug!(
        records = records.len(),
        groups = groups.len(),
        keys = ?group_keys,
        "Aggregated hotel records."
    );

    groups
        .into_iter()
        .map(|(values, totals)| AggregatedRow {
            key: group_keys.iter().copied().zip(values).collect(),
            totals,
        })
        .collect()
}

/// Aggregates by a single categorical dimension, keyed by that dimension's value.
pub fn breakdown_by(records: &[HotelRecord], dimension: Dimension) -> BTreeMap<String, AggregatedRow> {
    aggregate(records, &[dimension])
        .into_iter()
        .map(|row| {
            let value = row
                .key
                .first()
                .map(|(_, v)| v.clone())
                .unwrap_or_default();
            (value, row)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn record(day: u32, room_type: &str, capacity: u32, occupied: u32, room_revenue: Decimal) -> HotelRecord {
        HotelRecord {
            date: NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
            hotel: "Harbour".to_string(),
            room_type: room_type.to_string(),
            channel: "Direct".to_string(),
            capacity,
            occupied,
            room_revenue,
            fnb_revenue: dec!(50),
            spa_revenue: Decimal::ZERO,
            other_revenue: dec!(10),
            rooms_cost: dec!(100),
            fnb_cost: dec!(20),
            spa_cost: Decimal::ZERO,
            other_cost: dec!(5),
        }
    }

    fn sample() -> Vec<HotelRecord> {
        vec![
            record(1, "Double", 30, 20, dec!(1800)),
            record(1, "Suite", 5, 2, dec!(520)),
            record(2, "Double", 30, 25, dec!(2250.50)),
            record(2, "Suite", 5, 0, Decimal::ZERO),
        ]
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert!(aggregate(&[], &[]).is_empty());
        assert!(aggregate(&[], &[Dimension::Date]).is_empty());
        assert!(breakdown_by(&[], Dimension::RoomType).is_empty());
    }

    #[test]
    fn no_keys_gives_one_grand_total() {
        let rows = aggregate(&sample(), &[]);
        assert_eq!(rows.len(), 1);
        let t = rows[0].totals;
        assert_eq!(t.capacity, 70);
        assert_eq!(t.occupied, 47);
        assert_eq!(t.room_revenue, dec!(4570.50));
        assert_eq!(rows[0].label(), "ALL");
    }

    #[test]
    fn every_distinct_key_appears_once() {
        let rows = aggregate(&sample(), &[Dimension::Date, Dimension::RoomType]);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].label(), "2025-03-01 / Double");
        assert_eq!(rows[3].label(), "2025-03-02 / Suite");

        let by_date = aggregate(&sample(), &[Dimension::Date]);
        assert_eq!(by_date.len(), 2);
        assert_eq!(by_date[0].totals.occupied, 22);
        assert_eq!(by_date[1].totals.occupied, 25);
    }

    #[test]
    fn gop_is_revenue_minus_cost() {
        let rows = aggregate(&sample(), &[Dimension::RoomType]);
        let suite = rows.iter().find(|r| r.label() == "Suite").unwrap();
        // revenue 520 + 2 * 60, cost 2 * 125
        assert_eq!(suite.gop(), dec!(390));
    }

    #[test]
    fn zero_occupancy_group_has_undefined_adr() {
        let day_two_suite = aggregate(&sample(), &[Dimension::Date, Dimension::RoomType])
            .into_iter()
            .find(|r| r.label() == "2025-03-02 / Suite")
            .unwrap();
        assert!(day_two_suite.totals.adr().unwrap_err().is_undefined());
        assert_eq!(day_two_suite.totals.occupancy_rate().unwrap(), Decimal::ZERO);
    }

    #[test]
    fn breakdown_is_keyed_by_dimension_value() {
        let by_room = breakdown_by(&sample(), Dimension::RoomType);
        assert_eq!(by_room.keys().collect::<Vec<_>>(), vec!["Double", "Suite"]);
        assert_eq!(by_room["Double"].totals.capacity, 60);
    }
}
