use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::analytics::ratio::{safe_mean, safe_ratio};
use crate::analytics::spec::{AggregationSpec, MarketingGrouping, OrderingRule};
use crate::domain::marketing::MarketingRecord;

/// Channel-grouped marketing performance. The `avg_*` ratios are unweighted
/// means of the per-record values computed upstream; `overall_roas` is the
/// only ratio recomputed from the group totals, guarded to zero when the
/// group spent nothing.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MarketingChannelRow {
    pub channel: String,
    pub total_impressions: i64,
    pub total_clicks: i64,
    pub total_sessions: i64,
    pub total_bookings: i64,
    pub total_room_nights: i64,
    pub total_revenue: Decimal,
    pub total_cost: Decimal,
    pub avg_cpc: Decimal,
    pub avg_cpa: Decimal,
    pub avg_roas: Decimal,
    pub avg_conversion_rate: Decimal,
    pub overall_roas: Decimal,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MarketingDateRow {
    pub date: NaiveDate,
    pub total_impressions: i64,
    pub total_clicks: i64,
    pub total_sessions: i64,
    pub total_bookings: i64,
    pub total_revenue: Decimal,
    pub total_cost: Decimal,
    pub roas: Decimal,
}

#[derive(Clone, Debug, PartialEq)]
pub enum MarketingRows {
    Channel(Vec<MarketingChannelRow>),
    Date(Vec<MarketingDateRow>),
}

#[derive(Default)]
struct Accumulator {
    impressions: i64,
    clicks: i64,
    sessions: i64,
    bookings: i64,
    room_nights: i64,
    revenue: Decimal,
    cost: Decimal,
    cpc_sum: Decimal,
    cpa_sum: Decimal,
    roas_sum: Decimal,
    conversion_sum: Decimal,
    count: usize,
}

impl Accumulator {
    fn push(&mut self, record: &MarketingRecord) {
        self.impressions += record.impressions;
        self.clicks += record.clicks;
        self.sessions += record.sessions;
        self.bookings += record.bookings;
        self.room_nights += record.room_nights;
        self.revenue += record.total_revenue_eur;
        self.cost += record.marketing_cost_eur;
        self.cpc_sum += record.cpc_eur;
        self.cpa_sum += record.cpa_eur;
        self.roas_sum += record.roas;
        self.conversion_sum += record.conversion_rate;
        self.count += 1;
    }
}

pub fn aggregate(
    grouping: MarketingGrouping,
    spec: &AggregationSpec,
    records: &[MarketingRecord],
) -> MarketingRows {
    match grouping {
        MarketingGrouping::Channel => MarketingRows::Channel(by_channel(spec, records)),
        MarketingGrouping::Date => MarketingRows::Date(by_date(records)),
    }
}

fn by_channel(spec: &AggregationSpec, records: &[MarketingRecord]) -> Vec<MarketingChannelRow> {
    let mut groups: BTreeMap<String, Accumulator> = BTreeMap::new();
    for record in records {
        groups.entry(record.channel.clone()).or_default().push(record);
    }

    let mut rows: Vec<MarketingChannelRow> = groups
        .into_iter()
        .map(|(channel, accum)| MarketingChannelRow {
            channel,
            total_impressions: accum.impressions,
            total_clicks: accum.clicks,
            total_sessions: accum.sessions,
            total_bookings: accum.bookings,
            total_room_nights: accum.room_nights,
            total_revenue: accum.revenue,
            total_cost: accum.cost,
            avg_cpc: safe_mean(accum.cpc_sum, accum.count),
            avg_cpa: safe_mean(accum.cpa_sum, accum.count),
            avg_roas: safe_mean(accum.roas_sum, accum.count),
            avg_conversion_rate: safe_mean(accum.conversion_sum, accum.count),
            overall_roas: safe_ratio(accum.revenue, accum.cost),
        })
        .collect();

    if spec.ordering == OrderingRule::TotalRevenueDesc {
        rows.sort_by(|a, b| b.total_revenue.cmp(&a.total_revenue));
    }
    rows
}

fn by_date(records: &[MarketingRecord]) -> Vec<MarketingDateRow> {
    let mut groups: BTreeMap<NaiveDate, Accumulator> = BTreeMap::new();
    for record in records {
        groups.entry(record.date).or_default().push(record);
    }

    groups
        .into_iter()
        .map(|(date, accum)| MarketingDateRow {
            date,
            total_impressions: accum.impressions,
            total_clicks: accum.clicks,
            total_sessions: accum.sessions,
            total_bookings: accum.bookings,
            total_revenue: accum.revenue,
            total_cost: accum.cost,
            roas: safe_ratio(accum.revenue, accum.cost),
        })
        .collect()
}
