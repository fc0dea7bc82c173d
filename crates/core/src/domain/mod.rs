pub mod charge;
pub mod guest;
pub mod marketing;
pub mod occupancy;
