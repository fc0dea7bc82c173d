use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Sentinel room-type scope marking the whole-property occupancy row.
/// Per-room-type rows exist in the fact table but property-level KPIs always
/// read the `All` rows.
pub const PROPERTY_SCOPE: &str = "All";

/// One daily occupancy snapshot row, including the weather attributes the
/// upstream ETL attaches to each day.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OccupancyRecord {
    pub date: NaiveDate,
    pub room_type: String,
    pub rooms_sold: i64,
    pub occupancy_pct: Decimal,
    pub room_revenue_eur: Decimal,
    pub adr_eur: Decimal,
    pub revpar_eur: Decimal,
    pub weather_condition: String,
    pub avg_temperature_c: Decimal,
    pub snow_depth_cm: Decimal,
}
