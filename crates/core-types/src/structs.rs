use crate::enums::{Department, Period, StatementKind};
use crate::error::CoreError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// One row of operational hotel data: a (date, hotel, room type, channel) cell.
///
/// Derived figures such as occupancy or RevPAR are never stored here; the
/// analytics engine computes them on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelRecord {
    pub date: NaiveDate,
    pub hotel: String,
    pub room_type: String,
    pub channel: String,
    /// Rooms available.
    pub capacity: u32,
    /// Rooms sold. Never exceeds `capacity` in a validated record.
    pub occupied: u32,
    pub room_revenue: Decimal,
    pub fnb_revenue: Decimal,
    pub spa_revenue: Decimal,
    pub other_revenue: Decimal,
    pub rooms_cost: Decimal,
    pub fnb_cost: Decimal,
    pub spa_cost: Decimal,
    pub other_cost: Decimal,
}

impl HotelRecord {
    /// Checks the domain invariants of a record.
    ///
    /// Called at the data-source boundary; the engine assumes every record it
    /// receives has already passed this check.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.occupied > self.capacity {
            return Err(CoreError::schema(
                "occupied",
                format!(
                    "{} occupied rooms exceed the capacity of {}",
                    self.occupied, self.capacity
                ),
            ));
        }
        let amounts = [
            ("room_revenue", self.room_revenue),
            ("fnb_revenue", self.fnb_revenue),
            ("spa_revenue", self.spa_revenue),
            ("other_revenue", self.other_revenue),
            ("rooms_cost", self.rooms_cost),
            ("fnb_cost", self.fnb_cost),
            ("spa_cost", self.spa_cost),
            ("other_cost", self.other_cost),
        ];
        for (field, value) in amounts {
            if value < Decimal::ZERO {
                return Err(CoreError::schema(field, format!("{} is negative", value)));
            }
        }
        Ok(())
    }

    pub fn revenue_for(&self, department: Department) -> Decimal {
        match department {
            Department::Rooms => self.room_revenue,
            Department::FoodAndBeverage => self.fnb_revenue,
            Department::Spa => self.spa_revenue,
            Department::Other => self.other_revenue,
        }
    }

    pub fn cost_for(&self, department: Department) -> Decimal {
        match department {
            Department::Rooms => self.rooms_cost,
            Department::FoodAndBeverage => self.fnb_cost,
            Department::Spa => self.spa_cost,
            Department::Other => self.other_cost,
        }
    }

    pub fn total_revenue(&self) -> Decimal {
        self.room_revenue + self.fnb_revenue + self.spa_revenue + self.other_revenue
    }

    pub fn total_cost(&self) -> Decimal {
        self.rooms_cost + self.fnb_cost + self.spa_cost + self.other_cost
    }
}

/// A labeled statement line with one value per reporting period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementLine {
    pub label: String,
    pub prior: Decimal,
    pub current: Decimal,
}

impl StatementLine {
    pub fn new(label: impl Into<String>, prior: Decimal, current: Decimal) -> Self {
        Self {
            label: label.into(),
            prior,
            current,
        }
    }

    pub fn value(&self, period: Period) -> Decimal {
        match period {
            Period::Prior => self.prior,
            Period::Current => self.current,
        }
    }
}

/// The on-disk shape of a statement, validated into a `StatementTable`.
#[derive(Debug, Clone, Deserialize)]
struct RawStatementTable {
    name: String,
    kind: StatementKind,
    #[serde(default = "default_prior_label")]
    prior_label: String,
    #[serde(default = "default_current_label")]
    current_label: String,
    #[serde(default)]
    lines: Vec<StatementLine>,
}

fn default_prior_label() -> String {
    "prior".to_string()
}

fn default_current_label() -> String {
    "current".to_string()
}

/// A named financial statement whose lines are addressed by label.
///
/// Line order is kept for display, but every lookup goes through the label so
/// reordering lines never changes a computed ratio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawStatementTable")]
pub struct StatementTable {
    name: String,
    kind: StatementKind,
    prior_label: String,
    current_label: String,
    lines: Vec<StatementLine>,
}

impl TryFrom<RawStatementTable> for StatementTable {
    type Error = CoreError;

    fn try_from(raw: RawStatementTable) -> Result<Self, Self::Error> {
        StatementTable::new(raw.name, raw.kind, raw.lines)
            .map(|table| table.with_period_labels(raw.prior_label, raw.current_label))
    }
}

impl StatementTable {
    /// Builds a statement, rejecting duplicate labels.
    pub fn new(
        name: impl Into<String>,
        kind: StatementKind,
        lines: Vec<StatementLine>,
    ) -> Result<Self, CoreError> {
        let name = name.into();
        let mut seen = HashSet::with_capacity(lines.len());
        for line in &lines {
            if !seen.insert(line.label.as_str()) {
                return Err(CoreError::DuplicateLine {
                    statement: name,
                    label: line.label.clone(),
                });
            }
        }
        Ok(Self {
            name,
            kind,
            prior_label: default_prior_label(),
            current_label: default_current_label(),
            lines,
        })
    }

    /// Sets the display names of the two period columns (e.g. "S1_2024", "S1_2025").
    pub fn with_period_labels(
        mut self,
        prior_label: impl Into<String>,
        current_label: impl Into<String>,
    ) -> Self {
        self.prior_label = prior_label.into();
        self.current_label = current_label.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    pub fn period_label(&self, period: Period) -> &str {
        match period {
            Period::Prior => &self.prior_label,
            Period::Current => &self.current_label,
        }
    }

    pub fn lines(&self) -> &[StatementLine] {
        &self.lines
    }

    pub fn line(&self, label: &str) -> Result<&StatementLine, CoreError> {
        self.lines
            .iter()
            .find(|l| l.label == label)
            .ok_or_else(|| CoreError::MissingLine {
                statement: self.name.clone(),
                label: label.to_string(),
            })
    }

    pub fn value(&self, label: &str, period: Period) -> Result<Decimal, CoreError> {
        Ok(self.line(label)?.value(period))
    }

    /// Sums the named lines for one period. Every label must exist.
    pub fn sum_of<S: AsRef<str>>(&self, labels: &[S], period: Period) -> Result<Decimal, CoreError> {
        labels
            .iter()
            .map(|label| self.value(label.as_ref(), period))
            .sum()
    }
}

/// A set of statements addressed by name (income statement, assets, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatementBook {
    statements: BTreeMap<String, StatementTable>,
}

impl StatementBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a statement, replacing any previous one with the same name.
    pub fn insert(&mut self, table: StatementTable) -> Option<StatementTable> {
        self.statements.insert(table.name().to_string(), table)
    }

    pub fn get(&self, name: &str) -> Result<&StatementTable, CoreError> {
        self.statements
            .get(name)
            .ok_or_else(|| CoreError::MissingStatement(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatementTable> {
        self.statements.values()
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

impl FromIterator<StatementTable> for StatementBook {
    fn from_iter<I: IntoIterator<Item = StatementTable>>(iter: I) -> Self {
        let mut book = StatementBook::new();
        for table in iter {
            book.insert(table);
        }
        book
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn record(capacity: u32, occupied: u32) -> HotelRecord {
        HotelRecord {
            date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            hotel: "Harbour".to_string(),
            room_type: "Double".to_string(),
            channel: "Direct".to_string(),
            capacity,
            occupied,
            room_revenue: dec!(100),
            fnb_revenue: dec!(20),
            spa_revenue: dec!(5),
            other_revenue: dec!(10),
            rooms_cost: dec!(30),
            fnb_cost: dec!(8),
            spa_cost: dec!(2),
            other_cost: dec!(4),
        }
    }

    #[test]
    fn validate_rejects_overbooked_rows() {
        let err = record(10, 11).validate().unwrap_err();
        assert!(matches!(err, CoreError::SchemaViolation { ref field, .. } if field == "occupied"));
        assert!(record(10, 10).validate().is_ok());
    }

    #[test]
    fn validate_rejects_negative_amounts() {
        let mut r = record(10, 5);
        r.spa_cost = dec!(-1);
        let err = r.validate().unwrap_err();
        assert!(matches!(err, CoreError::SchemaViolation { ref field, .. } if field == "spa_cost"));
    }

    #[test]
    fn totals_sum_all_departments() {
        let r = record(10, 5);
        assert_eq!(r.total_revenue(), dec!(135));
        assert_eq!(r.total_cost(), dec!(44));
        let by_dept: Decimal = Department::ALL.iter().map(|d| r.revenue_for(*d)).sum();
        assert_eq!(by_dept, r.total_revenue());
    }

    fn income() -> StatementTable {
        StatementTable::new(
            "income_statement",
            StatementKind::IncomeStatement,
            vec![
                StatementLine::new("Revenue", dec!(2677), dec!(2745)),
                StatementLine::new("Operating result", dec!(343), dec!(399)),
            ],
        )
        .unwrap()
    }

    #[test]
    fn lines_are_found_by_label_not_position() {
        let table = income();
        assert_eq!(table.value("Operating result", Period::Current).unwrap(), dec!(399));
        assert_eq!(table.value("Revenue", Period::Prior).unwrap(), dec!(2677));

        let err = table.value("Net result", Period::Current).unwrap_err();
        assert!(matches!(err, CoreError::MissingLine { .. }));
    }

    #[test]
    fn duplicate_labels_are_rejected() {
        let err = StatementTable::new(
            "assets",
            StatementKind::Assets,
            vec![
                StatementLine::new("Cash", dec!(1), dec!(2)),
                StatementLine::new("Cash", dec!(3), dec!(4)),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::DuplicateLine { .. }));
    }

    #[test]
    fn book_finds_statements_by_name() {
        let book: StatementBook = vec![income()].into_iter().collect();
        assert_eq!(book.len(), 1);
        assert_eq!(book.get("income_statement").unwrap().kind(), StatementKind::IncomeStatement);
        assert_eq!(
            book.get("cash_flow").unwrap_err(),
            CoreError::MissingStatement("cash_flow".to_string())
        );
    }

    #[test]
    fn sum_of_adds_named_lines() {
        let table = income();
        let total = table.sum_of(&["Revenue", "Operating result"], Period::Current).unwrap();
        assert_eq!(total, dec!(3144));
        assert!(table.sum_of(&["Revenue", "Missing"], Period::Current).is_err());
    }
}
