//! Deterministic demo winter-season dataset.
//!
//! Small enough to reason about by hand, but it exercises every edge the
//! aggregators care about: a cancelled booking, a zero-night day-use
//! booking, an out-of-scheme charge category, per-room-type occupancy rows
//! next to the `All` scope, one date with inconsistent weather attributes,
//! a zero-cost marketing channel, and a guest with no recorded age.

use crate::facts::FactStoreError;
use crate::DbPool;

/// (booking_id, check_in, nights, channel, room_type, country, status,
///  charge_date, category, amount)
type ChargeSeed = (&'static str, &'static str, i64, &'static str, &'static str, &'static str, &'static str, &'static str, &'static str, f64);

const CHARGES: &[ChargeSeed] = &[
    ("BK-1001", "2025-01-10", 3, "Direct-Web", "Deluxe", "Italy", "Stayed", "2025-01-10", "Room", 540.0),
    ("BK-1001", "2025-01-10", 3, "Direct-Web", "Deluxe", "Italy", "Stayed", "2025-01-11", "F&B", 85.0),
    ("BK-1001", "2025-01-10", 3, "Direct-Web", "Deluxe", "Italy", "Stayed", "2025-01-11", "SkiPass", 120.0),
    ("BK-1001", "2025-01-10", 3, "Direct-Web", "Deluxe", "Italy", "Stayed", "2025-01-12", "Parking", 18.0),
    ("BK-1002", "2025-01-11", 2, "OTA-Booking.com", "Standard", "Germany", "Stayed", "2025-01-11", "Room", 280.0),
    ("BK-1002", "2025-01-11", 2, "OTA-Booking.com", "Standard", "Germany", "Stayed", "2025-01-12", "EquipmentRental", 45.0),
    ("BK-1003", "2025-02-01", 5, "Direct-Phone", "Suite", "Switzerland", "Stayed", "2025-02-01", "Room", 1750.0),
    ("BK-1003", "2025-02-01", 5, "Direct-Phone", "Suite", "Switzerland", "Stayed", "2025-02-02", "Spa", 200.0),
    ("BK-1003", "2025-02-01", 5, "Direct-Phone", "Suite", "Switzerland", "Stayed", "2025-02-03", "SkiPass", 300.0),
    ("BK-1003", "2025-02-01", 5, "Direct-Phone", "Suite", "Switzerland", "Stayed", "2025-02-04", "F&B", 240.0),
    // zero-night day-use booking: counts as a booking, adds nothing to nights
    ("BK-1004", "2025-01-10", 0, "Corporate", "Standard", "UK", "Stayed", "2025-01-10", "Room", 95.0),
    // cancelled booking: must never surface in revenue aggregations
    ("BK-CANCELLED", "2025-01-15", 2, "Direct-Web", "Deluxe", "France", "Cancelled", "2025-01-15", "Room", 320.0),
    ("BK-1005", "2025-03-05", 4, "TravelAgent", "Family", "Netherlands", "Stayed", "2025-03-05", "Room", 880.0),
    ("BK-1005", "2025-03-05", 4, "TravelAgent", "Family", "Netherlands", "Stayed", "2025-03-05", "AirportTransfer", 70.0),
];

/// (date, room_type, rooms_sold, occupancy_pct, room_revenue, adr, revpar,
///  weather, temperature, snow_depth)
type OccupancySeed = (&'static str, &'static str, i64, f64, f64, f64, f64, &'static str, f64, f64);

const OCCUPANCY: &[OccupancySeed] = &[
    ("2025-01-10", "All", 82, 82.0, 14350.0, 175.0, 143.5, "Snow", -4.0, 85.0),
    // per-room-type rows exist but are excluded from property-level KPIs
    ("2025-01-10", "Deluxe", 20, 80.0, 4200.0, 210.0, 168.0, "Snow", -4.0, 85.0),
    ("2025-01-11", "All", 88, 88.0, 15840.0, 180.0, 158.4, "Blizzard", -7.0, 110.0),
    // same date recorded again with different weather attributes; the day
    // view keeps both rows
    ("2025-01-11", "All", 88, 88.0, 15840.0, 180.0, 158.4, "Snow", -6.0, 105.0),
    ("2025-01-12", "All", 75, 75.0, 12750.0, 170.0, 127.5, "Sunny", -2.0, 95.0),
    ("2025-02-01", "All", 90, 90.0, 17100.0, 190.0, 171.0, "Snow", -5.0, 120.0),
    ("2025-02-02", "Suite", 8, 90.0, 3000.0, 375.0, 337.5, "Snow", -5.0, 120.0),
    ("2025-03-05", "All", 65, 65.0, 10400.0, 160.0, 104.0, "Rain", 4.0, 30.0),
];

/// (date, channel, impressions, clicks, sessions, bookings, room_nights,
///  revenue, cost, cpc, cpa, roas, conversion_rate)
type MarketingSeed = (&'static str, &'static str, i64, i64, i64, i64, i64, f64, f64, f64, f64, f64, f64);

const MARKETING: &[MarketingSeed] = &[
    ("2025-01-10", "Social-Paid", 12000, 480, 400, 12, 30, 5200.0, 1300.0, 2.71, 108.33, 4.0, 3.0),
    ("2025-01-11", "Social-Paid", 9000, 360, 300, 9, 22, 3900.0, 975.0, 2.71, 108.33, 4.0, 3.0),
    // organic channel with zero spend: exercises the ROAS guard
    ("2025-01-10", "SEO", 8000, 520, 460, 10, 26, 4100.0, 0.0, 0.0, 0.0, 0.0, 2.17),
    ("2025-01-10", "Email", 3000, 150, 130, 5, 12, 2100.0, 180.0, 1.2, 36.0, 11.67, 3.85),
];

/// (guest_id, country, age, loyalty_tier, purpose, lifetime_bookings,
///  lifetime_revenue)
type GuestSeed = (&'static str, &'static str, Option<i64>, &'static str, &'static str, i64, f64);

const GUESTS: &[GuestSeed] = &[
    ("G-0001", "Italy", Some(34), "Gold", "Leisure-Ski", 6, 9400.0),
    ("G-0002", "Germany", Some(24), "None", "Leisure-Ski", 1, 1150.0),
    // no recorded age: excluded from the age dimension
    ("G-0003", "Switzerland", None, "Platinum", "Business", 12, 28800.0),
    ("G-0004", "UK", Some(57), "Silver", "Leisure-Summer", 3, 2700.0),
    ("G-0005", "Italy", Some(41), "Silver", "Leisure-Ski", 4, 5200.0),
    ("G-0006", "Netherlands", Some(65), "None", "Event", 2, 1900.0),
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeedSummary {
    pub charge_lines: usize,
    pub occupancy_rows: usize,
    pub marketing_rows: usize,
    pub guest_profiles: usize,
}

pub struct DemoSeason;

impl DemoSeason {
    /// Insert the demo dataset in one transaction.
    pub async fn load(pool: &DbPool) -> Result<SeedSummary, FactStoreError> {
        let mut tx = pool.begin().await?;

        for (booking_id, check_in, nights, channel, room_type, country, status, charge_date, category, amount) in
            CHARGES
        {
            sqlx::query(
                "INSERT INTO booking_charges (booking_id, check_in_date, nights, booking_channel, \
                 room_type, guest_country, booking_status, charge_date, charge_category, line_amount_eur) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            )
            .bind(booking_id)
            .bind(check_in)
            .bind(nights)
            .bind(channel)
            .bind(room_type)
            .bind(country)
            .bind(status)
            .bind(charge_date)
            .bind(category)
            .bind(amount)
            .execute(&mut *tx)
            .await?;
        }

        for (date, room_type, rooms_sold, occupancy_pct, revenue, adr, revpar, weather, temperature, snow) in
            OCCUPANCY
        {
            sqlx::query(
                "INSERT INTO daily_occupancy (date, room_type, rooms_sold, occupancy_pct, \
                 room_revenue_eur, adr_eur, revpar_eur, weather_condition, avg_temperature_c, snow_depth_cm) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            )
            .bind(date)
            .bind(room_type)
            .bind(rooms_sold)
            .bind(occupancy_pct)
            .bind(revenue)
            .bind(adr)
            .bind(revpar)
            .bind(weather)
            .bind(temperature)
            .bind(snow)
            .execute(&mut *tx)
            .await?;
        }

        for (date, channel, impressions, clicks, sessions, bookings, room_nights, revenue, cost, cpc, cpa, roas, conversion) in
            MARKETING
        {
            sqlx::query(
                "INSERT INTO marketing_performance (date, channel, impressions, clicks, sessions, \
                 bookings, room_nights, total_revenue_eur, marketing_cost_eur, cpc_eur, cpa_eur, roas, conversion_rate) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            )
            .bind(date)
            .bind(channel)
            .bind(impressions)
            .bind(clicks)
            .bind(sessions)
            .bind(bookings)
            .bind(room_nights)
            .bind(revenue)
            .bind(cost)
            .bind(cpc)
            .bind(cpa)
            .bind(roas)
            .bind(conversion)
            .execute(&mut *tx)
            .await?;
        }

        for (guest_id, country, age, tier, purpose, bookings, revenue) in GUESTS {
            sqlx::query(
                "INSERT INTO guest_profiles (guest_id, country_of_residence, age_at_check_in, \
                 loyalty_tier, primary_purpose_of_stay, lifetime_bookings, lifetime_revenue_eur) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )
            .bind(guest_id)
            .bind(country)
            .bind(age)
            .bind(tier)
            .bind(purpose)
            .bind(bookings)
            .bind(revenue)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(SeedSummary {
            charge_lines: CHARGES.len(),
            occupancy_rows: OCCUPANCY.len(),
            marketing_rows: MARKETING.len(),
            guest_profiles: GUESTS.len(),
        })
    }

    /// True when no fact table holds any row yet. Bootstrap only seeds an
    /// empty store.
    pub async fn fact_tables_empty(pool: &DbPool) -> Result<bool, FactStoreError> {
        let counts: (i64, i64, i64, i64) = sqlx::query_as(
            "SELECT (SELECT COUNT(*) FROM booking_charges), \
                    (SELECT COUNT(*) FROM daily_occupancy), \
                    (SELECT COUNT(*) FROM marketing_performance), \
                    (SELECT COUNT(*) FROM guest_profiles)",
        )
        .fetch_one(pool)
        .await?;

        Ok(counts == (0, 0, 0, 0))
    }
}
