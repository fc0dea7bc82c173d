use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::analytics::ratio::safe_mean;
use crate::analytics::spec::{AggregationSpec, OrderingRule, RevenueDimension};
use crate::domain::charge::{ChargeCategory, ChargeRecord};

/// One revenue group. `avg_nights` is a booking-level attribute and is
/// omitted for the charge-date grouping, where it has no per-day meaning.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RevenueRow {
    pub dimension_value: String,
    pub total_bookings: i64,
    pub room_revenue: Decimal,
    pub fb_revenue: Decimal,
    pub activities_revenue: Decimal,
    pub total_revenue: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_nights: Option<Decimal>,
}

#[derive(Default)]
struct Accumulator {
    // distinct booking -> nights, for booking count and the nights average
    bookings: BTreeMap<String, u32>,
    room: Decimal,
    fb: Decimal,
    activities: Decimal,
    total: Decimal,
}

impl Accumulator {
    fn push(&mut self, record: &ChargeRecord) {
        self.bookings.entry(record.booking_id.clone()).or_insert(record.nights);
        // Total revenue sums every category. Categories outside the named
        // scheme count here but in none of the three sub-totals, so total
        // can exceed room + fb + activities.
        self.total += record.line_amount_eur;
        match &record.charge_category {
            ChargeCategory::Room => self.room += record.line_amount_eur,
            ChargeCategory::FoodAndBeverage => self.fb += record.line_amount_eur,
            category if category.is_activity() => self.activities += record.line_amount_eur,
            _ => {}
        }
    }

    fn into_row(self, dimension_value: String, with_nights: bool) -> RevenueRow {
        let nights_sum: Decimal = self.bookings.values().map(|n| Decimal::from(*n)).sum();
        let avg_nights = with_nights.then(|| safe_mean(nights_sum, self.bookings.len()));
        RevenueRow {
            dimension_value,
            total_bookings: self.bookings.len() as i64,
            room_revenue: self.room,
            fb_revenue: self.fb,
            activities_revenue: self.activities,
            total_revenue: self.total,
            avg_nights,
        }
    }
}

/// Group `Stayed` charge lines by the resolved revenue dimension. The fact
/// store has already applied the status and date-range filters (check-in
/// date for channel/room_type/country, charge date for the date grouping).
pub fn aggregate(
    dimension: RevenueDimension,
    spec: &AggregationSpec,
    records: &[ChargeRecord],
) -> Vec<RevenueRow> {
    let mut groups: BTreeMap<String, Accumulator> = BTreeMap::new();

    for record in records {
        let key = match dimension {
            RevenueDimension::Channel => record.booking_channel.clone(),
            RevenueDimension::RoomType => record.room_type.clone(),
            RevenueDimension::Country => record.guest_country.clone(),
            RevenueDimension::Date => record.charge_date.format("%Y-%m-%d").to_string(),
        };
        groups.entry(key).or_default().push(record);
    }

    let with_nights = dimension != RevenueDimension::Date;
    let mut rows: Vec<RevenueRow> =
        groups.into_iter().map(|(value, accum)| accum.into_row(value, with_nights)).collect();

    if spec.ordering == OrderingRule::TotalRevenueDesc {
        // BTreeMap already yields label order, kept as the tie-break.
        rows.sort_by(|a, b| b.total_revenue.cmp(&a.total_revenue));
    }

    spec.apply_cap(rows)
}
