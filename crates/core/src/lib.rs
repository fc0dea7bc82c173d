pub mod analytics;
pub mod config;
pub mod domain;
pub mod errors;

pub use analytics::envelope::Envelope;
pub use analytics::spec::{
    resolve, AggregationSpec, DateRange, Domain, GuestDimension, Grouping, MarketingGrouping,
    OccupancyGranularity, OrderingRule, RevenueDimension,
};
pub use domain::charge::{BookingStatus, ChargeCategory, ChargeRecord};
pub use domain::guest::GuestProfileRecord;
pub use domain::marketing::MarketingRecord;
pub use domain::occupancy::{OccupancyRecord, PROPERTY_SCOPE};
pub use errors::{ApplicationError, InterfaceError, QueryError};
