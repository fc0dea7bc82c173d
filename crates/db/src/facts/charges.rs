use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use snowline_core::domain::charge::{BookingStatus, ChargeCategory};
use snowline_core::{ChargeRecord, DateRange};

use super::{decimal_column, ChargeFacts, FactStoreError};
use crate::DbPool;

const BY_CHECK_IN: &str = "SELECT booking_id, check_in_date, nights, booking_channel, room_type, \
     guest_country, booking_status, charge_date, charge_category, line_amount_eur \
     FROM booking_charges \
     WHERE booking_status = 'Stayed' AND check_in_date BETWEEN ?1 AND ?2";

const BY_CHARGE_DATE: &str = "SELECT booking_id, check_in_date, nights, booking_channel, room_type, \
     guest_country, booking_status, charge_date, charge_category, line_amount_eur \
     FROM booking_charges \
     WHERE booking_status = 'Stayed' AND charge_date BETWEEN ?1 AND ?2";

pub struct SqlChargeFacts {
    pool: DbPool,
}

impl SqlChargeFacts {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, sql: &str, range: &DateRange) -> Result<Vec<ChargeRecord>, FactStoreError> {
        let rows = sqlx::query(sql)
            .bind(range.start)
            .bind(range.end)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(decode_charge).collect()
    }
}

#[async_trait]
impl ChargeFacts for SqlChargeFacts {
    async fn stayed_by_check_in(
        &self,
        range: &DateRange,
    ) -> Result<Vec<ChargeRecord>, FactStoreError> {
        self.fetch(BY_CHECK_IN, range).await
    }

    async fn stayed_by_charge_date(
        &self,
        range: &DateRange,
    ) -> Result<Vec<ChargeRecord>, FactStoreError> {
        self.fetch(BY_CHARGE_DATE, range).await
    }
}

fn decode_charge(row: &SqliteRow) -> Result<ChargeRecord, FactStoreError> {
    let nights: i64 = row.try_get("nights")?;
    let nights = u32::try_from(nights)
        .map_err(|_| FactStoreError::Decode(format!("negative nights value: {nights}")))?;
    let status: String = row.try_get("booking_status")?;
    let category: String = row.try_get("charge_category")?;

    Ok(ChargeRecord {
        booking_id: row.try_get("booking_id")?,
        check_in_date: row.try_get("check_in_date")?,
        nights,
        booking_channel: row.try_get("booking_channel")?,
        room_type: row.try_get("room_type")?,
        guest_country: row.try_get("guest_country")?,
        booking_status: BookingStatus::parse(&status),
        charge_date: row.try_get("charge_date")?,
        charge_category: ChargeCategory::parse(&category),
        line_amount_eur: decimal_column(row, "line_amount_eur")?,
    })
}
