use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use thiserror::Error;

use snowline_core::{
    ChargeRecord, DateRange, GuestProfileRecord, MarketingRecord, OccupancyRecord,
};

pub mod charges;
pub mod guests;
pub mod marketing;
pub mod occupancy;

pub use charges::SqlChargeFacts;
pub use guests::SqlGuestFacts;
pub use marketing::SqlMarketingFacts;
pub use occupancy::SqlOccupancyFacts;

#[derive(Debug, Error)]
pub enum FactStoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

/// Charge-line access, pre-filtered to `Stayed` bookings. The two methods
/// differ only in which date column the range applies to: check-in date for
/// the booking-level dimensions, charge date for the per-day views.
#[async_trait]
pub trait ChargeFacts: Send + Sync {
    async fn stayed_by_check_in(
        &self,
        range: &DateRange,
    ) -> Result<Vec<ChargeRecord>, FactStoreError>;

    async fn stayed_by_charge_date(
        &self,
        range: &DateRange,
    ) -> Result<Vec<ChargeRecord>, FactStoreError>;
}

/// Daily occupancy access, pre-filtered to the whole-property `All` scope.
#[async_trait]
pub trait OccupancyFacts: Send + Sync {
    async fn property_daily(
        &self,
        range: &DateRange,
    ) -> Result<Vec<OccupancyRecord>, FactStoreError>;
}

#[async_trait]
pub trait MarketingFacts: Send + Sync {
    async fn in_range(&self, range: &DateRange) -> Result<Vec<MarketingRecord>, FactStoreError>;
}

/// Guest profiles carry lifetime metrics, so there is no range parameter.
#[async_trait]
pub trait GuestFacts: Send + Sync {
    async fn all_profiles(&self) -> Result<Vec<GuestProfileRecord>, FactStoreError>;
}

/// Monetary and ratio columns are stored as REAL; convert to `Decimal` once
/// at this boundary so the aggregators never touch floats.
pub(crate) fn decimal_column(row: &SqliteRow, column: &str) -> Result<Decimal, FactStoreError> {
    let value: f64 = row.try_get(column)?;
    Decimal::from_f64_retain(value).ok_or_else(|| {
        FactStoreError::Decode(format!("column `{column}` held a non-finite value: {value}"))
    })
}
