//! Contract tests for the demo season fixtures.
//!
//! The aggregator test suites assume the seed carries specific edge cases.
//! These tests pin that contract so a fixture edit that silently drops an
//! edge case fails here instead of weakening the downstream suites.

use rust_decimal::Decimal;
use snowline_core::domain::charge::{BookingStatus, ChargeCategory};
use snowline_core::{DateRange, PROPERTY_SCOPE};
use snowline_db::{
    connect_with_settings, migrations, ChargeFacts, DbPool, DemoSeason, GuestFacts,
    MarketingFacts, OccupancyFacts, SqlChargeFacts, SqlGuestFacts, SqlMarketingFacts,
    SqlOccupancyFacts,
};

async fn seeded_pool() -> DbPool {
    let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
    migrations::run_pending(&pool).await.expect("migrate");
    DemoSeason::load(&pool).await.expect("seed");
    pool
}

fn season() -> DateRange {
    DateRange::parse(None, None).expect("default range")
}

#[tokio::test]
async fn seed_summary_matches_the_persisted_row_counts() {
    let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
    migrations::run_pending(&pool).await.expect("migrate");

    let summary = DemoSeason::load(&pool).await.expect("seed");

    for (table, expected) in [
        ("booking_charges", summary.charge_lines),
        ("daily_occupancy", summary.occupancy_rows),
        ("marketing_performance", summary.marketing_rows),
        ("guest_profiles", summary.guest_profiles),
    ] {
        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .expect("count");
        assert_eq!(count as usize, expected, "{table} row count");
    }

    pool.close().await;
}

#[tokio::test]
async fn seed_carries_a_cancelled_booking_that_the_fact_store_filters() {
    let pool = seeded_pool().await;

    let cancelled: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM booking_charges WHERE booking_status = 'Cancelled'",
    )
    .fetch_one(&pool)
    .await
    .expect("count");
    assert!(cancelled > 0, "seed must include a cancelled booking");

    let facts = SqlChargeFacts::new(pool.clone());
    let records = facts.stayed_by_check_in(&season()).await.expect("fetch");
    assert!(records.iter().all(|r| r.booking_status == BookingStatus::Stayed));

    pool.close().await;
}

#[tokio::test]
async fn seed_carries_the_charge_edge_cases_the_revenue_suite_relies_on() {
    let pool = seeded_pool().await;
    let facts = SqlChargeFacts::new(pool.clone());

    let records = facts.stayed_by_check_in(&season()).await.expect("fetch");

    // out-of-scheme category for the reconciliation-gap behavior
    assert!(records
        .iter()
        .any(|r| matches!(&r.charge_category, ChargeCategory::Other(label) if label == "Parking")));
    // zero-night day-use booking for the avg_nights denominator
    assert!(records.iter().any(|r| r.nights == 0));
    // at least one ski category for the weather correlation
    assert!(records.iter().any(|r| r.charge_category.is_ski()));

    pool.close().await;
}

#[tokio::test]
async fn seed_carries_scoped_and_duplicate_occupancy_rows() {
    let pool = seeded_pool().await;

    let scoped: i64 = sqlx::query_scalar(&format!(
        "SELECT COUNT(*) FROM daily_occupancy WHERE room_type != '{PROPERTY_SCOPE}'"
    ))
    .fetch_one(&pool)
    .await
    .expect("count");
    assert!(scoped > 0, "seed must include per-room-type rows to exclude");

    let facts = SqlOccupancyFacts::new(pool.clone());
    let records = facts.property_daily(&season()).await.expect("fetch");
    assert!(records.iter().all(|r| r.room_type == PROPERTY_SCOPE));

    // one calendar date recorded twice with different weather attributes
    let mut dates: Vec<_> = records.iter().map(|r| r.date).collect();
    dates.sort();
    let before = dates.len();
    dates.dedup();
    assert!(dates.len() < before, "seed must include a weather-inconsistent duplicate date");

    pool.close().await;
}

#[tokio::test]
async fn seed_carries_a_zero_cost_marketing_channel() {
    let pool = seeded_pool().await;
    let facts = SqlMarketingFacts::new(pool.clone());

    let records = facts.in_range(&season()).await.expect("fetch");

    assert!(records
        .iter()
        .any(|r| r.marketing_cost_eur == Decimal::ZERO && r.total_revenue_eur > Decimal::ZERO));

    pool.close().await;
}

#[tokio::test]
async fn seed_carries_a_guest_without_a_recorded_age_and_all_loyalty_tiers() {
    let pool = seeded_pool().await;
    let facts = SqlGuestFacts::new(pool.clone());

    let records = facts.all_profiles().await.expect("fetch");

    assert!(records.iter().any(|r| r.age_at_check_in.is_none()));
    for tier in ["Platinum", "Gold", "Silver", "None"] {
        assert!(
            records.iter().any(|r| r.loyalty_tier == tier),
            "seed must cover loyalty tier {tier}"
        );
    }

    pool.close().await;
}
