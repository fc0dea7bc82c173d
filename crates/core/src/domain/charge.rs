use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Settlement state of the booking a charge line belongs to.
///
/// Revenue aggregations only consider `Stayed` bookings; everything else is
/// filtered out at the fact store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingStatus {
    Stayed,
    Cancelled,
    NoShow,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stayed => "Stayed",
            Self::Cancelled => "Cancelled",
            Self::NoShow => "No-show",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "Stayed" => Self::Stayed,
            "Cancelled" => Self::Cancelled,
            _ => Self::NoShow,
        }
    }
}

/// Charge line category. The category list in the source data is open-ended;
/// anything outside the named scheme lands in `Other` and contributes to
/// total revenue without appearing in a visible sub-total.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChargeCategory {
    Room,
    FoodAndBeverage,
    SkiPass,
    EquipmentRental,
    Spa,
    AirportTransfer,
    Other(String),
}

impl ChargeCategory {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Room => "Room",
            Self::FoodAndBeverage => "F&B",
            Self::SkiPass => "SkiPass",
            Self::EquipmentRental => "EquipmentRental",
            Self::Spa => "Spa",
            Self::AirportTransfer => "AirportTransfer",
            Self::Other(label) => label,
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "Room" => Self::Room,
            "F&B" => Self::FoodAndBeverage,
            "SkiPass" => Self::SkiPass,
            "EquipmentRental" => Self::EquipmentRental,
            "Spa" => Self::Spa,
            "AirportTransfer" => Self::AirportTransfer,
            other => Self::Other(other.to_string()),
        }
    }

    /// Categories rolled up into the "activities" revenue sub-total.
    pub fn is_activity(&self) -> bool {
        matches!(self, Self::SkiPass | Self::EquipmentRental | Self::Spa | Self::AirportTransfer)
    }

    /// Categories rolled up into ski revenue for the weather correlation.
    pub fn is_ski(&self) -> bool {
        matches!(self, Self::SkiPass | Self::EquipmentRental)
    }
}

/// One charge line of a booking folio, as recorded by the upstream ETL.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChargeRecord {
    pub booking_id: String,
    pub check_in_date: NaiveDate,
    pub nights: u32,
    pub booking_channel: String,
    pub room_type: String,
    pub guest_country: String,
    pub booking_status: BookingStatus,
    pub charge_date: NaiveDate,
    pub charge_category: ChargeCategory,
    pub line_amount_eur: Decimal,
}
