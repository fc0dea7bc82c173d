use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use snowline_core::{DateRange, OccupancyRecord, PROPERTY_SCOPE};

use super::{decimal_column, FactStoreError, OccupancyFacts};
use crate::DbPool;

const PROPERTY_DAILY: &str = "SELECT date, room_type, rooms_sold, occupancy_pct, room_revenue_eur, adr_eur, \
     revpar_eur, weather_condition, avg_temperature_c, snow_depth_cm \
     FROM daily_occupancy \
     WHERE date BETWEEN ?1 AND ?2 AND room_type = ?3";

pub struct SqlOccupancyFacts {
    pool: DbPool,
}

impl SqlOccupancyFacts {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OccupancyFacts for SqlOccupancyFacts {
    async fn property_daily(
        &self,
        range: &DateRange,
    ) -> Result<Vec<OccupancyRecord>, FactStoreError> {
        let rows = sqlx::query(PROPERTY_DAILY)
            .bind(range.start)
            .bind(range.end)
            .bind(PROPERTY_SCOPE)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(decode_occupancy).collect()
    }
}

fn decode_occupancy(row: &SqliteRow) -> Result<OccupancyRecord, FactStoreError> {
    Ok(OccupancyRecord {
        date: row.try_get("date")?,
        room_type: row.try_get("room_type")?,
        rooms_sold: row.try_get("rooms_sold")?,
        occupancy_pct: decimal_column(row, "occupancy_pct")?,
        room_revenue_eur: decimal_column(row, "room_revenue_eur")?,
        adr_eur: decimal_column(row, "adr_eur")?,
        revpar_eur: decimal_column(row, "revpar_eur")?,
        weather_condition: row.try_get("weather_condition")?,
        avg_temperature_c: decimal_column(row, "avg_temperature_c")?,
        snow_depth_cm: decimal_column(row, "snow_depth_cm")?,
    })
}

#[cfg(test)]
mod tests {
    use snowline_core::{DateRange, PROPERTY_SCOPE};

    use super::SqlOccupancyFacts;
    use crate::facts::OccupancyFacts;
    use crate::fixtures::DemoSeason;
    use crate::{connect_with_settings, migrations};

    #[tokio::test]
    async fn per_room_type_rows_are_excluded_from_property_scope() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrate");
        DemoSeason::load(&pool).await.expect("seed");

        let facts = SqlOccupancyFacts::new(pool.clone());
        let range = DateRange::parse(None, None).expect("range");

        let records = facts.property_daily(&range).await.expect("fetch");

        // the fixture includes Deluxe/Suite scoped rows that must not appear
        assert!(!records.is_empty());
        assert!(records.iter().all(|r| r.room_type == PROPERTY_SCOPE));
        pool.close().await;
    }
}
