use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use snowline_core::{DateRange, MarketingRecord};

use super::{decimal_column, FactStoreError, MarketingFacts};
use crate::DbPool;

const IN_RANGE: &str = "SELECT date, channel, impressions, clicks, sessions, bookings, room_nights, \
     total_revenue_eur, marketing_cost_eur, cpc_eur, cpa_eur, roas, conversion_rate \
     FROM marketing_performance \
     WHERE date BETWEEN ?1 AND ?2";

pub struct SqlMarketingFacts {
    pool: DbPool,
}

impl SqlMarketingFacts {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MarketingFacts for SqlMarketingFacts {
    async fn in_range(&self, range: &DateRange) -> Result<Vec<MarketingRecord>, FactStoreError> {
        let rows = sqlx::query(IN_RANGE)
            .bind(range.start)
            .bind(range.end)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(decode_marketing).collect()
    }
}

fn decode_marketing(row: &SqliteRow) -> Result<MarketingRecord, FactStoreError> {
    Ok(MarketingRecord {
        date: row.try_get("date")?,
        channel: row.try_get("channel")?,
        impressions: row.try_get("impressions")?,
        clicks: row.try_get("clicks")?,
        sessions: row.try_get("sessions")?,
        bookings: row.try_get("bookings")?,
        room_nights: row.try_get("room_nights")?,
        total_revenue_eur: decimal_column(row, "total_revenue_eur")?,
        marketing_cost_eur: decimal_column(row, "marketing_cost_eur")?,
        cpc_eur: decimal_column(row, "cpc_eur")?,
        cpa_eur: decimal_column(row, "cpa_eur")?,
        roas: decimal_column(row, "roas")?,
        conversion_rate: decimal_column(row, "conversion_rate")?,
    })
}
