use crate::error::CoreError;
use crate::structs::HotelRecord;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A categorical column of `HotelRecord` that aggregations can group by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Date,
    Hotel,
    RoomType,
    Channel,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [
        Dimension::Date,
        Dimension::Hotel,
        Dimension::RoomType,
        Dimension::Channel,
    ];

    /// Returns the value of this dimension for a record.
    ///
    /// Dates are rendered as `YYYY-MM-DD` so that lexical order matches
    /// chronological order.
    pub fn value_of(&self, record: &HotelRecord) -> String {
        match self {
            Dimension::Date => record.date.format("%Y-%m-%d").to_string(),
            Dimension::Hotel => record.hotel.clone(),
            Dimension::RoomType => record.room_type.clone(),
            Dimension::Channel => record.channel.clone(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Date => "date",
            Dimension::Hotel => "hotel",
            Dimension::RoomType => "room_type",
            Dimension::Channel => "channel",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dimension {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "date" => Ok(Dimension::Date),
            "hotel" => Ok(Dimension::Hotel),
            "room_type" | "roomtype" => Ok(Dimension::RoomType),
            "channel" => Ok(Dimension::Channel),
            other => Err(CoreError::InvalidInput(
                "dimension".to_string(),
                format!("'{}' is not one of date, hotel, room_type, channel", other),
            )),
        }
    }
}

/// Operating departments a hotel record splits its revenue and cost into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Department {
    Rooms,
    FoodAndBeverage,
    Spa,
    Other,
}

impl Department {
    pub const ALL: [Department; 4] = [
        Department::Rooms,
        Department::FoodAndBeverage,
        Department::Spa,
        Department::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Department::Rooms => "ROOMS",
            Department::FoodAndBeverage => "F&B",
            Department::Spa => "SPA",
            Department::Other => "OTHER",
        }
    }
}

/// Selects one of the two period columns of a statement table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Prior,
    Current,
}

/// The kind of financial statement a table represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    IncomeStatement,
    Assets,
    Liabilities,
    CashFlow,
    Segments,
}
