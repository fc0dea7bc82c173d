//! The aggregation core: dimension resolution, the four domain aggregators,
//! the weather correlation joiner, and the response envelope.
//!
//! Aggregators are pure functions over fact records. Grouping uses ordered
//! maps so that the same request against unchanged facts always produces the
//! same row sequence, byte for byte.

pub mod envelope;
pub mod guest;
pub mod marketing;
pub mod occupancy;
pub mod ratio;
pub mod revenue;
pub mod spec;
pub mod weather;
