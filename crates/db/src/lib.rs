pub mod connection;
pub mod facts;
pub mod fixtures;
pub mod migrations;

pub use connection::{connect, connect_with_settings, DbPool};
pub use facts::{
    ChargeFacts, FactStoreError, GuestFacts, MarketingFacts, OccupancyFacts, SqlChargeFacts,
    SqlGuestFacts, SqlMarketingFacts, SqlOccupancyFacts,
};
pub use fixtures::{DemoSeason, SeedSummary};
