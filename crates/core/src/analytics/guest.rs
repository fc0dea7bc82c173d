use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::analytics::ratio::safe_mean;
use crate::analytics::spec::{AggregationSpec, GuestDimension, OrderingRule};
use crate::domain::guest::{loyalty_tier_rank, GuestProfileRecord};

/// One demographic group. Lifetime metrics, so no date scope applies.
/// `avg_lifetime_value` is the unweighted mean over guest records, not
/// weighted by bookings.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GuestRow {
    pub dimension_value: String,
    pub guest_count: i64,
    pub total_bookings: i64,
    pub total_revenue: Decimal,
    pub avg_lifetime_value: Decimal,
}

#[derive(Default)]
struct Accumulator {
    guests: i64,
    bookings: i64,
    revenue: Decimal,
}

impl Accumulator {
    fn push(&mut self, record: &GuestProfileRecord) {
        self.guests += 1;
        self.bookings += record.lifetime_bookings;
        self.revenue += record.lifetime_revenue_eur;
    }
}

/// Five-year age bands over age at check-in. Callers exclude null ages
/// before bucketing; the bands' labels sort lexicographically in
/// chronological order by construction.
fn age_band(age: i64) -> &'static str {
    match age {
        a if a < 25 => "18-24",
        a if a < 35 => "25-34",
        a if a < 45 => "35-44",
        a if a < 55 => "45-54",
        a if a < 65 => "55-64",
        _ => "65+",
    }
}

pub fn aggregate(
    dimension: GuestDimension,
    spec: &AggregationSpec,
    records: &[GuestProfileRecord],
) -> Vec<GuestRow> {
    let mut groups: BTreeMap<String, Accumulator> = BTreeMap::new();

    for record in records {
        let key = match dimension {
            GuestDimension::Country => record.country_of_residence.clone(),
            GuestDimension::Loyalty => record.loyalty_tier.clone(),
            GuestDimension::Purpose => record.primary_purpose_of_stay.clone(),
            GuestDimension::Age => match record.age_at_check_in {
                Some(age) => age_band(age).to_string(),
                // null ages are excluded outright, not bucketed as unknown
                None => continue,
            },
        };
        groups.entry(key).or_default().push(record);
    }

    let mut rows: Vec<GuestRow> = groups
        .into_iter()
        .map(|(value, accum)| GuestRow {
            dimension_value: value,
            guest_count: accum.guests,
            total_bookings: accum.bookings,
            total_revenue: accum.revenue,
            avg_lifetime_value: safe_mean(accum.revenue, accum.guests as usize),
        })
        .collect();

    match spec.ordering {
        OrderingRule::GuestCountDesc => {
            rows.sort_by(|a, b| b.guest_count.cmp(&a.guest_count));
        }
        OrderingRule::LoyaltyTierRank => {
            rows.sort_by_key(|row| loyalty_tier_rank(&row.dimension_value));
        }
        // LabelAsc is the BTreeMap iteration order already
        _ => {}
    }

    spec.apply_cap(rows)
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{age_band, aggregate};
    use crate::analytics::spec::{resolve, Domain, GuestDimension};
    use crate::domain::guest::GuestProfileRecord;

    fn guest(
        id: &str,
        country: &str,
        age: Option<i64>,
        tier: &str,
        purpose: &str,
        bookings: i64,
        revenue: i64,
    ) -> GuestProfileRecord {
        GuestProfileRecord {
            guest_id: id.to_string(),
            country_of_residence: country.to_string(),
            age_at_check_in: age,
            loyalty_tier: tier.to_string(),
            primary_purpose_of_stay: purpose.to_string(),
            lifetime_bookings: bookings,
            lifetime_revenue_eur: Decimal::from(revenue),
        }
    }

    #[test]
    fn age_band_boundaries_match_the_bucketing_contract() {
        assert_eq!(age_band(24), "18-24");
        assert_eq!(age_band(25), "25-34");
        assert_eq!(age_band(34), "25-34");
        assert_eq!(age_band(44), "35-44");
        assert_eq!(age_band(54), "45-54");
        assert_eq!(age_band(64), "55-64");
        assert_eq!(age_band(65), "65+");
        assert_eq!(age_band(90), "65+");
    }

    #[test]
    fn null_ages_are_excluded_from_the_age_dimension() {
        let records = vec![
            guest("G-1", "Italy", Some(30), "Gold", "Leisure-Ski", 3, 3000),
            guest("G-2", "Italy", None, "Gold", "Leisure-Ski", 5, 9000),
            guest("G-3", "UK", Some(24), "None", "Business", 1, 500),
        ];
        let spec = resolve(Domain::Guest, "age").expect("spec");

        let rows = aggregate(GuestDimension::Age, &spec, &records);

        let total_guests: i64 = rows.iter().map(|row| row.guest_count).sum();
        assert_eq!(total_guests, 2);
        let labels: Vec<_> = rows.iter().map(|row| row.dimension_value.as_str()).collect();
        assert_eq!(labels, vec!["18-24", "25-34"]);
    }

    #[test]
    fn country_groups_sort_by_guest_count_and_cap_at_twenty() {
        let mut records = Vec::new();
        for i in 0..22 {
            // country i gets i+1 guests
            for g in 0..=i {
                records.push(guest(
                    &format!("G-{i}-{g}"),
                    &format!("Country-{i:02}"),
                    Some(40),
                    "Silver",
                    "Leisure-Ski",
                    2,
                    1000,
                ));
            }
        }
        let spec = resolve(Domain::Guest, "country").expect("spec");

        let rows = aggregate(GuestDimension::Country, &spec, &records);

        assert_eq!(rows.len(), 20);
        assert_eq!(rows[0].dimension_value, "Country-21");
        assert!(rows.windows(2).all(|w| w[0].guest_count >= w[1].guest_count));
    }

    #[test]
    fn loyalty_orders_by_fixed_tier_rank() {
        let records = vec![
            guest("G-1", "Italy", Some(30), "None", "Leisure-Ski", 1, 100),
            guest("G-2", "Italy", Some(31), "Silver", "Leisure-Ski", 2, 200),
            guest("G-3", "Italy", Some(32), "Platinum", "Leisure-Ski", 9, 9000),
            guest("G-4", "Italy", Some(33), "Gold", "Leisure-Ski", 5, 4000),
        ];
        let spec = resolve(Domain::Guest, "loyalty").expect("spec");

        let rows = aggregate(GuestDimension::Loyalty, &spec, &records);

        let tiers: Vec<_> = rows.iter().map(|row| row.dimension_value.as_str()).collect();
        assert_eq!(tiers, vec!["Platinum", "Gold", "Silver", "None"]);
    }

    #[test]
    fn lifetime_value_average_is_over_records_not_bookings() {
        let records = vec![
            guest("G-1", "Italy", Some(30), "Gold", "Business", 10, 1000),
            guest("G-2", "Italy", Some(40), "Gold", "Business", 1, 3000),
        ];
        let spec = resolve(Domain::Guest, "purpose").expect("spec");

        let rows = aggregate(GuestDimension::Purpose, &spec, &records);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].guest_count, 2);
        assert_eq!(rows[0].total_bookings, 11);
        assert_eq!(rows[0].total_revenue, Decimal::from(4000));
        assert_eq!(rows[0].avg_lifetime_value, Decimal::from(2000));
    }
}
