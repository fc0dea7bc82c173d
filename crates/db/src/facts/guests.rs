use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use snowline_core::GuestProfileRecord;

use super::{decimal_column, FactStoreError, GuestFacts};
use crate::DbPool;

const ALL_PROFILES: &str = "SELECT guest_id, country_of_residence, age_at_check_in, loyalty_tier, \
     primary_purpose_of_stay, lifetime_bookings, lifetime_revenue_eur \
     FROM guest_profiles";

pub struct SqlGuestFacts {
    pool: DbPool,
}

impl SqlGuestFacts {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GuestFacts for SqlGuestFacts {
    async fn all_profiles(&self) -> Result<Vec<GuestProfileRecord>, FactStoreError> {
        let rows = sqlx::query(ALL_PROFILES).fetch_all(&self.pool).await?;
        rows.iter().map(decode_guest).collect()
    }
}

fn decode_guest(row: &SqliteRow) -> Result<GuestProfileRecord, FactStoreError> {
    Ok(GuestProfileRecord {
        guest_id: row.try_get("guest_id")?,
        country_of_residence: row.try_get("country_of_residence")?,
        age_at_check_in: row.try_get("age_at_check_in")?,
        loyalty_tier: row.try_get("loyalty_tier")?,
        primary_purpose_of_stay: row.try_get("primary_purpose_of_stay")?,
        lifetime_bookings: row.try_get("lifetime_bookings")?,
        lifetime_revenue_eur: decimal_column(row, "lifetime_revenue_eur")?,
    })
}

#[cfg(test)]
mod tests {
    use super::SqlGuestFacts;
    use crate::facts::GuestFacts;
    use crate::fixtures::DemoSeason;
    use crate::{connect_with_settings, migrations};

    #[tokio::test]
    async fn null_ages_decode_as_none() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrate");
        DemoSeason::load(&pool).await.expect("seed");

        let facts = SqlGuestFacts::new(pool.clone());
        let records = facts.all_profiles().await.expect("fetch");

        assert!(!records.is_empty());
        assert!(records.iter().any(|r| r.age_at_check_in.is_none()));
        pool.close().await;
    }
}
