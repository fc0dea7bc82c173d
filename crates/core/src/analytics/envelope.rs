use serde::Serialize;

use crate::analytics::spec::DateRange;

/// Self-describing response wrapper echoing the resolved request parameters.
/// `data` is always present, an empty sequence when nothing matched. Row
/// contents pass through untouched.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Envelope<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimension: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    pub data: Vec<T>,
}

impl<T> Envelope<T> {
    /// Dimension-selected, date-scoped result (revenue).
    pub fn dimension(dimension: &str, range: &DateRange, data: Vec<T>) -> Self {
        Self {
            dimension: Some(dimension.to_string()),
            group_by: None,
            start_date: Some(range.start_str()),
            end_date: Some(range.end_str()),
            data,
        }
    }

    /// Group-by-selected, date-scoped result (occupancy, marketing).
    pub fn grouped(group_by: &str, range: &DateRange, data: Vec<T>) -> Self {
        Self {
            dimension: None,
            group_by: Some(group_by.to_string()),
            start_date: Some(range.start_str()),
            end_date: Some(range.end_str()),
            data,
        }
    }

    /// Lifetime-metric result with no date scope (guests).
    pub fn lifetime(dimension: &str, data: Vec<T>) -> Self {
        Self {
            dimension: Some(dimension.to_string()),
            group_by: None,
            start_date: None,
            end_date: None,
            data,
        }
    }

    /// Date-scoped result with no selector (weather correlation).
    pub fn range_only(range: &DateRange, data: Vec<T>) -> Self {
        Self {
            dimension: None,
            group_by: None,
            start_date: Some(range.start_str()),
            end_date: Some(range.end_str()),
            data,
        }
    }
}
