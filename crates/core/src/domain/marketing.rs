use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One day of marketing performance for a single acquisition channel. The
/// per-record ratios (cpc/cpa/roas/conversion rate) are computed upstream and
/// averaged as-is; only the per-group overall ROAS is recomputed here.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarketingRecord {
    pub date: NaiveDate,
    pub channel: String,
    pub impressions: i64,
    pub clicks: i64,
    pub sessions: i64,
    pub bookings: i64,
    pub room_nights: i64,
    pub total_revenue_eur: Decimal,
    pub marketing_cost_eur: Decimal,
    pub cpc_eur: Decimal,
    pub cpa_eur: Decimal,
    pub roas: Decimal,
    pub conversion_rate: Decimal,
}
