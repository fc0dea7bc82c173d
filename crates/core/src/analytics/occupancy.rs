use std::collections::BTreeMap;

use chrono::{Datelike, Days, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::analytics::ratio::safe_mean;
use crate::analytics::spec::OccupancyGranularity;
use crate::domain::occupancy::OccupancyRecord;

/// Day-granularity row. One row per distinct (date, weather attributes)
/// combination: when the source records a date twice with inconsistent
/// weather, both rows survive. That duplication is observed upstream data
/// behavior and is deliberately not collapsed.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OccupancyDayRow {
    pub date: NaiveDate,
    pub rooms_sold: i64,
    pub occupancy_pct: Decimal,
    pub room_revenue: Decimal,
    pub adr: Decimal,
    pub revpar: Decimal,
    pub weather_condition: String,
    pub avg_temperature_c: Decimal,
    pub snow_depth_cm: Decimal,
}

/// Week/month bucket row. Rooms sold and revenue are summed; the rate
/// metrics are simple unweighted means over contributing days.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OccupancyBucketRow {
    pub bucket_start: NaiveDate,
    pub rooms_sold: i64,
    pub avg_occupancy_pct: Decimal,
    pub room_revenue: Decimal,
    pub avg_adr: Decimal,
    pub avg_revpar: Decimal,
}

#[derive(Clone, Debug, PartialEq)]
pub enum OccupancyRows {
    Day(Vec<OccupancyDayRow>),
    Bucketed(Vec<OccupancyBucketRow>),
}

#[derive(Default)]
struct Accumulator {
    rooms_sold: i64,
    room_revenue: Decimal,
    occupancy_sum: Decimal,
    adr_sum: Decimal,
    revpar_sum: Decimal,
    count: usize,
}

impl Accumulator {
    fn push(&mut self, record: &OccupancyRecord) {
        self.rooms_sold += record.rooms_sold;
        self.room_revenue += record.room_revenue_eur;
        self.occupancy_sum += record.occupancy_pct;
        self.adr_sum += record.adr_eur;
        self.revpar_sum += record.revpar_eur;
        self.count += 1;
    }
}

/// Aggregate whole-property occupancy rows at the requested granularity.
/// Records arrive already restricted to the `All` room-type scope.
pub fn aggregate(granularity: OccupancyGranularity, records: &[OccupancyRecord]) -> OccupancyRows {
    match granularity {
        OccupancyGranularity::Day => OccupancyRows::Day(aggregate_days(records)),
        OccupancyGranularity::Week => {
            OccupancyRows::Bucketed(aggregate_buckets(records, iso_week_start))
        }
        OccupancyGranularity::Month => {
            OccupancyRows::Bucketed(aggregate_buckets(records, month_start))
        }
    }
}

fn aggregate_days(records: &[OccupancyRecord]) -> Vec<OccupancyDayRow> {
    // Key includes the weather attributes so inconsistent recordings for one
    // calendar date stay separate rows.
    let mut groups: BTreeMap<(NaiveDate, String, Decimal, Decimal), Accumulator> = BTreeMap::new();

    for record in records {
        groups
            .entry((
                record.date,
                record.weather_condition.clone(),
                record.avg_temperature_c,
                record.snow_depth_cm,
            ))
            .or_default()
            .push(record);
    }

    groups
        .into_iter()
        .map(|((date, weather, temperature, snow), accum)| OccupancyDayRow {
            date,
            rooms_sold: accum.rooms_sold,
            occupancy_pct: safe_mean(accum.occupancy_sum, accum.count),
            room_revenue: accum.room_revenue,
            adr: safe_mean(accum.adr_sum, accum.count),
            revpar: safe_mean(accum.revpar_sum, accum.count),
            weather_condition: weather,
            avg_temperature_c: temperature,
            snow_depth_cm: snow,
        })
        .collect()
}

fn aggregate_buckets(
    records: &[OccupancyRecord],
    bucket: fn(NaiveDate) -> NaiveDate,
) -> Vec<OccupancyBucketRow> {
    let mut groups: BTreeMap<NaiveDate, Accumulator> = BTreeMap::new();

    for record in records {
        groups.entry(bucket(record.date)).or_default().push(record);
    }

    groups
        .into_iter()
        .map(|(bucket_start, accum)| OccupancyBucketRow {
            bucket_start,
            rooms_sold: accum.rooms_sold,
            avg_occupancy_pct: safe_mean(accum.occupancy_sum, accum.count),
            room_revenue: accum.room_revenue,
            avg_adr: safe_mean(accum.adr_sum, accum.count),
            avg_revpar: safe_mean(accum.revpar_sum, accum.count),
        })
        .collect()
}

/// Monday of the ISO week containing `date`.
fn iso_week_start(date: NaiveDate) -> NaiveDate {
    date.checked_sub_days(Days::new(u64::from(date.weekday().num_days_from_monday())))
        .unwrap_or(date)
}

fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}
