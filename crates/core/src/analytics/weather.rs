use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::charge::ChargeRecord;
use crate::domain::occupancy::OccupancyRecord;

/// One occupancy day joined with the ski spend charged on that date. A day
/// with no matching charges still yields a row with zero ski revenue and
/// zero contributing bookings.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WeatherCorrelationRow {
    pub date: NaiveDate,
    pub weather_condition: String,
    pub snow_depth_cm: Decimal,
    pub avg_temperature_c: Decimal,
    pub occupancy_pct: Decimal,
    pub ski_revenue: Decimal,
    pub bookings_with_ski_charges: i64,
}

#[derive(Default)]
struct SkiSpend {
    revenue: Decimal,
    bookings: BTreeSet<String>,
}

/// Left-join whole-property occupancy rows with `Stayed` charges on charge
/// date, rolling up `SkiPass`/`EquipmentRental` lines. Like the day-level
/// occupancy view, one calendar date can produce several rows when its
/// weather attributes were recorded inconsistently; each inherits the full
/// ski spend for that date.
pub fn correlate(
    occupancy: &[OccupancyRecord],
    charges: &[ChargeRecord],
) -> Vec<WeatherCorrelationRow> {
    let mut spend_by_date: HashMap<NaiveDate, SkiSpend> = HashMap::new();
    for charge in charges {
        if charge.charge_category.is_ski() {
            let spend = spend_by_date.entry(charge.charge_date).or_default();
            spend.revenue += charge.line_amount_eur;
            spend.bookings.insert(charge.booking_id.clone());
        }
    }

    let mut groups: BTreeSet<(NaiveDate, String, Decimal, Decimal, Decimal)> = BTreeSet::new();
    for record in occupancy {
        groups.insert((
            record.date,
            record.weather_condition.clone(),
            record.snow_depth_cm,
            record.avg_temperature_c,
            record.occupancy_pct,
        ));
    }

    groups
        .into_iter()
        .map(|(date, weather, snow, temperature, occupancy_pct)| {
            let (ski_revenue, bookings) = spend_by_date
                .get(&date)
                .map(|spend| (spend.revenue, spend.bookings.len() as i64))
                .unwrap_or((Decimal::ZERO, 0));
            WeatherCorrelationRow {
                date,
                weather_condition: weather,
                snow_depth_cm: snow,
                avg_temperature_c: temperature,
                occupancy_pct,
                ski_revenue,
                bookings_with_ski_charges: bookings,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use super::correlate;
    use crate::domain::charge::{BookingStatus, ChargeCategory, ChargeRecord};
    use crate::domain::occupancy::OccupancyRecord;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, day).expect("date")
    }

    fn occupancy(day: u32, weather: &str, snow: i64) -> OccupancyRecord {
        OccupancyRecord {
            date: date(day),
            room_type: "All".to_string(),
            rooms_sold: 85,
            occupancy_pct: Decimal::from(85),
            room_revenue_eur: Decimal::from(12_000),
            adr_eur: Decimal::from(190),
            revpar_eur: Decimal::from(162),
            weather_condition: weather.to_string(),
            avg_temperature_c: Decimal::from(-5),
            snow_depth_cm: Decimal::from(snow),
        }
    }

    fn charge(day: u32, booking_id: &str, category: ChargeCategory, amount: i64) -> ChargeRecord {
        ChargeRecord {
            booking_id: booking_id.to_string(),
            check_in_date: date(1),
            nights: 5,
            booking_channel: "Direct-Web".to_string(),
            room_type: "Suite".to_string(),
            guest_country: "Switzerland".to_string(),
            booking_status: BookingStatus::Stayed,
            charge_date: date(day),
            charge_category: category,
            line_amount_eur: Decimal::from(amount),
        }
    }

    #[test]
    fn ski_categories_roll_up_with_distinct_booking_count() {
        let occupancy = vec![occupancy(10, "Snow", 80)];
        let charges = vec![
            charge(10, "B-1", ChargeCategory::SkiPass, 120),
            charge(10, "B-1", ChargeCategory::EquipmentRental, 45),
            charge(10, "B-2", ChargeCategory::SkiPass, 60),
            charge(10, "B-3", ChargeCategory::Spa, 200),
        ];

        let rows = correlate(&occupancy, &charges);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].ski_revenue, Decimal::from(225));
        // B-3 only bought spa, which is not a ski category
        assert_eq!(rows[0].bookings_with_ski_charges, 2);
    }

    #[test]
    fn zero_match_days_yield_zero_rows_not_missing_rows() {
        let occupancy = vec![occupancy(10, "Rain", 20), occupancy(11, "Snow", 70)];
        let charges = vec![charge(11, "B-1", ChargeCategory::SkiPass, 90)];

        let rows = correlate(&occupancy, &charges);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, date(10));
        assert_eq!(rows[0].ski_revenue, Decimal::ZERO);
        assert_eq!(rows[0].bookings_with_ski_charges, 0);
        assert_eq!(rows[1].ski_revenue, Decimal::from(90));
    }

    #[test]
    fn weather_inconsistent_duplicate_days_each_inherit_the_full_spend() {
        let occupancy = vec![occupancy(12, "Snow", 75), occupancy(12, "Blizzard", 75)];
        let charges = vec![charge(12, "B-1", ChargeCategory::SkiPass, 100)];

        let rows = correlate(&occupancy, &charges);

        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|row| row.ski_revenue == Decimal::from(100)));
        assert!(rows.iter().all(|row| row.bookings_with_ski_charges == 1));
    }

    #[test]
    fn rows_are_chronological_and_deterministic() {
        let occupancy = vec![occupancy(14, "Sunny", 40), occupancy(9, "Snow", 90)];

        let first = correlate(&occupancy, &[]);
        let second = correlate(&occupancy, &[]);

        assert_eq!(first, second);
        assert_eq!(first[0].date, date(9));
        assert_eq!(first[1].date, date(14));
    }
}
