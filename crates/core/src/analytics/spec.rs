use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::QueryError;

/// Default reporting window: the winter season the fact tables cover.
pub const DEFAULT_START_DATE: &str = "2024-12-01";
pub const DEFAULT_END_DATE: &str = "2025-04-30";

/// Unbounded-cardinality dimensions (guest/revenue `country`) are capped at
/// the top N groups by the domain's primary metric.
pub const COUNTRY_ROW_CAP: usize = 20;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Revenue,
    Occupancy,
    Marketing,
    Guest,
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Revenue => "revenue",
            Self::Occupancy => "occupancy",
            Self::Marketing => "marketing",
            Self::Guest => "guest",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevenueDimension {
    Channel,
    RoomType,
    Country,
    Date,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OccupancyGranularity {
    Day,
    Week,
    Month,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarketingGrouping {
    Channel,
    Date,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuestDimension {
    Country,
    Age,
    Loyalty,
    Purpose,
}

/// Tagged `(Domain, Dimension)` pair, the key of every aggregation formula.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Grouping {
    Revenue(RevenueDimension),
    Occupancy(OccupancyGranularity),
    Marketing(MarketingGrouping),
    Guest(GuestDimension),
}

/// Deterministic output ordering fixed by the resolved spec. Every rule has
/// a total tie-break on the group label so repeated requests return
/// byte-identical row sequences.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrderingRule {
    /// Descending by the domain's primary revenue metric.
    TotalRevenueDesc,
    /// Ascending by date or bucket start.
    Chronological,
    /// Descending by guest count.
    GuestCountDesc,
    /// Fixed loyalty tier rank: Platinum, Gold, Silver, everything else.
    LoyaltyTierRank,
    /// Ascending by group label (age bands).
    LabelAsc,
}

/// The resolved aggregation recipe for one request: grouping key, ordering
/// rule, and row cap. Built once by [`resolve`], immutable afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AggregationSpec {
    pub domain: Domain,
    pub grouping: Grouping,
    pub ordering: OrderingRule,
    pub row_cap: Option<usize>,
}

/// The fixed enumeration of valid `(domain, dimension)` pairs. Adding a
/// dimension means adding one entry here plus one formula implementation.
const DIMENSION_TABLE: &[(Domain, &str, Grouping)] = &[
    (Domain::Revenue, "channel", Grouping::Revenue(RevenueDimension::Channel)),
    (Domain::Revenue, "room_type", Grouping::Revenue(RevenueDimension::RoomType)),
    (Domain::Revenue, "country", Grouping::Revenue(RevenueDimension::Country)),
    (Domain::Revenue, "date", Grouping::Revenue(RevenueDimension::Date)),
    (Domain::Occupancy, "day", Grouping::Occupancy(OccupancyGranularity::Day)),
    (Domain::Occupancy, "week", Grouping::Occupancy(OccupancyGranularity::Week)),
    (Domain::Occupancy, "month", Grouping::Occupancy(OccupancyGranularity::Month)),
    (Domain::Marketing, "channel", Grouping::Marketing(MarketingGrouping::Channel)),
    (Domain::Marketing, "date", Grouping::Marketing(MarketingGrouping::Date)),
    (Domain::Guest, "country", Grouping::Guest(GuestDimension::Country)),
    (Domain::Guest, "age", Grouping::Guest(GuestDimension::Age)),
    (Domain::Guest, "loyalty", Grouping::Guest(GuestDimension::Loyalty)),
    (Domain::Guest, "purpose", Grouping::Guest(GuestDimension::Purpose)),
];

/// Map a requested `(domain, dimension)` pair to its aggregation spec.
/// Fails closed: anything outside the table is an `InvalidDimension` client
/// error, reported before any fact store access.
pub fn resolve(domain: Domain, dimension: &str) -> Result<AggregationSpec, QueryError> {
    let grouping = DIMENSION_TABLE
        .iter()
        .find(|(entry_domain, key, _)| *entry_domain == domain && *key == dimension)
        .map(|(_, _, grouping)| *grouping)
        .ok_or_else(|| QueryError::InvalidDimension {
            domain: domain.as_str().to_string(),
            dimension: dimension.to_string(),
        })?;

    Ok(AggregationSpec {
        domain,
        grouping,
        ordering: ordering_for(grouping),
        row_cap: row_cap_for(grouping),
    })
}

fn ordering_for(grouping: Grouping) -> OrderingRule {
    match grouping {
        Grouping::Revenue(RevenueDimension::Date) => OrderingRule::Chronological,
        Grouping::Revenue(_) => OrderingRule::TotalRevenueDesc,
        Grouping::Occupancy(_) => OrderingRule::Chronological,
        Grouping::Marketing(MarketingGrouping::Date) => OrderingRule::Chronological,
        Grouping::Marketing(MarketingGrouping::Channel) => OrderingRule::TotalRevenueDesc,
        Grouping::Guest(GuestDimension::Loyalty) => OrderingRule::LoyaltyTierRank,
        Grouping::Guest(GuestDimension::Age) => OrderingRule::LabelAsc,
        Grouping::Guest(_) => OrderingRule::GuestCountDesc,
    }
}

fn row_cap_for(grouping: Grouping) -> Option<usize> {
    match grouping {
        Grouping::Revenue(RevenueDimension::Country) | Grouping::Guest(GuestDimension::Country) => {
            Some(COUNTRY_ROW_CAP)
        }
        _ => None,
    }
}

impl AggregationSpec {
    /// The dimension key as requested, for echoing in the response envelope.
    pub fn dimension_key(&self) -> &'static str {
        DIMENSION_TABLE
            .iter()
            .find(|(_, _, grouping)| *grouping == self.grouping)
            .map(|(_, key, _)| *key)
            .unwrap_or_default()
    }

    /// Truncate sorted rows to the spec's cap, if any.
    pub fn apply_cap<T>(&self, mut rows: Vec<T>) -> Vec<T> {
        if let Some(cap) = self.row_cap {
            rows.truncate(cap);
        }
        rows
    }
}

/// Inclusive reporting window. Both bounds default to the demo season when
/// the caller omits them; a malformed or inverted range is rejected before
/// any fact store call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self, QueryError> {
        let start = parse_iso_date(start.unwrap_or(DEFAULT_START_DATE))?;
        let end = parse_iso_date(end.unwrap_or(DEFAULT_END_DATE))?;
        if start > end {
            return Err(QueryError::InvalidRange(format!(
                "start date {start} is after end date {end}"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn start_str(&self) -> String {
        self.start.format("%Y-%m-%d").to_string()
    }

    pub fn end_str(&self) -> String {
        self.end.format("%Y-%m-%d").to_string()
    }
}

fn parse_iso_date(value: &str) -> Result<NaiveDate, QueryError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| QueryError::InvalidRange(format!("`{value}` is not an ISO date (YYYY-MM-DD)")))
}
