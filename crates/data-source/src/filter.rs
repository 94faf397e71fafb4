use chrono::NaiveDate;
use core_types::HotelRecord;

/// Row selection applied before records reach the engine.
///
/// Empty criteria match everything. Date bounds are inclusive and string
/// matches are exact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub hotel: Option<String>,
    pub room_types: Vec<String>,
    pub channels: Vec<String>,
}

impl RecordFilter {
    pub fn is_empty(&self) -> bool {
        *self == RecordFilter::default()
    }

    pub fn matches(&self, record: &HotelRecord) -> bool {
        self.from.is_none_or(|from| record.date >= from)
            && self.to.is_none_or(|to| record.date <= to)
            && self.hotel.as_ref().is_none_or(|hotel| record.hotel == *hotel)
            && (self.room_types.is_empty() || self.room_types.contains(&record.room_type))
            && (self.channels.is_empty() || self.channels.contains(&record.channel))
    }

    pub fn apply(&self, records: &[HotelRecord]) -> Vec<HotelRecord> {
        let selected: Vec<HotelRecord> = records.iter().filter(|r| self.matches(r)).cloned().collect();
        tracing::debug!(input = records.len(), selected = selected.len(), "Applied record filter.");
        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn record(day: u32, hotel: &str, room_type: &str, channel: &str) -> HotelRecord {
        HotelRecord {
            date: NaiveDate::from_ymd_opt(2025, 6, day).unwrap(),
            hotel: hotel.to_string(),
            room_type: room_type.to_string(),
            channel: channel.to_string(),
            capacity: 10,
            occupied: 5,
            room_revenue: Decimal::from(500),
            fnb_revenue: Decimal::ZERO,
            spa_revenue: Decimal::ZERO,
            other_revenue: Decimal::ZERO,
            rooms_cost: Decimal::ZERO,
            fnb_cost: Decimal::ZERO,
            spa_cost: Decimal::ZERO,
            other_cost: Decimal::ZERO,
        }
    }

    fn records() -> Vec<HotelRecord> {
        vec![
            record(1, "Harbour", "Double", "OTA"),
            record(2, "Harbour", "Suite", "Direct"),
            record(3, "Alpine", "Double", "Agency"),
            record(4, "Alpine", "Single", "OTA"),
        ]
    }

    #[test]
    fn empty_filter_keeps_everything() {
        let filter = RecordFilter::default();
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&records()).len(), 4);
    }

    #[test]
    fn date_bounds_are_inclusive() {
        let filter = RecordFilter {
            from: NaiveDate::from_ymd_opt(2025, 6, 2),
            to: NaiveDate::from_ymd_opt(2025, 6, 3),
            ..RecordFilter::default()
        };
        let days: Vec<u32> = filter.apply(&records()).iter().map(|r| chrono::Datelike::day(&r.date)).collect();
        assert_eq!(days, vec![2, 3]);
    }

    #[test]
    fn criteria_combine() {
        let filter = RecordFilter {
            hotel: Some("Alpine".to_string()),
            channels: vec!["OTA".to_string(), "Direct".to_string()],
            ..RecordFilter::default()
        };
        let selected = filter.apply(&records());
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].room_type, "Single");

        let by_room = RecordFilter {
            room_types: vec!["Double".to_string()],
            ..RecordFilter::default()
        };
        assert_eq!(by_room.apply(&records()).len(), 2);
    }
}
