use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One guest profile with lifetime value metrics. Lifetime metrics are not
/// date-scoped; the guest dimension ignores any supplied date range.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GuestProfileRecord {
    pub guest_id: String,
    pub country_of_residence: String,
    pub age_at_check_in: Option<i64>,
    pub loyalty_tier: String,
    pub primary_purpose_of_stay: String,
    pub lifetime_bookings: i64,
    pub lifetime_revenue_eur: Decimal,
}

/// Fixed display rank for loyalty tiers: Platinum, Gold, Silver, then
/// everything else (including `None`).
pub fn loyalty_tier_rank(tier: &str) -> u8 {
    match tier {
        "Platinum" => 1,
        "Gold" => 2,
        "Silver" => 3,
        _ => 4,
    }
}
