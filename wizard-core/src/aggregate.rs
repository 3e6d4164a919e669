//! Reduction of hourly forecast records into a [`DailySummary`].

use chrono::NaiveDate;

use crate::model::{DailySummary, HourlyRecord};

#[derive(Debug)]
struct Fold {
    max_temp: f64,
    min_temp: f64,
    feels_like_sum: f64,
    humidity_sum: f64,
    will_rain: bool,
    count: usize,
}

impl Default for Fold {
    fn default() -> Self {
        Self {
            max_temp: f64::NEG_INFINITY,
            min_temp: f64::INFINITY,
            feels_like_sum: 0.0,
            humidity_sum: 0.0,
            will_rain: false,
            count: 0,
        }
    }
}

impl Fold {
    fn push(mut self, record: &HourlyRecord) -> Self {
        self.max_temp = self.max_temp.max(record.temp_max);
        self.min_temp = self.min_temp.min(record.temp_min);
        self.feels_like_sum += record.feels_like;
        self.humidity_sum += record.humidity;
        self.will_rain |= record.is_precipitation();
        self.count += 1;
        self
    }
}

/// Summarize every record whose timestamp falls on `date`.
///
/// Dates are compared as reported by the provider, without timezone
/// conversion. Returns `None` when no record matches.
pub fn aggregate(city: &str, records: &[HourlyRecord], date: NaiveDate) -> Option<DailySummary> {
    let fold = records
        .iter()
        .filter(|r| r.timestamp.date() == date)
        .fold(Fold::default(), Fold::push);

    if fold.count == 0 {
        return None;
    }

    let count = fold.count as f64;
    Some(DailySummary {
        city: city.to_string(),
        date,
        will_rain: fold.will_rain,
        max_temp: fold.max_temp,
        min_temp: fold.min_temp,
        feels_like: fold.feels_like_sum / count,
        avg_humidity: fold.humidity_sum / count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    const EPS: f64 = 1e-9;

    fn record(dt: &str, max: f64, min: f64, feels: f64, humidity: f64, id: i32) -> HourlyRecord {
        HourlyRecord {
            timestamp: NaiveDateTime::parse_from_str(dt, "%Y-%m-%d %H:%M:%S").unwrap(),
            temp_max: max,
            temp_min: min,
            feels_like: feels,
            humidity,
            condition_code: id,
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn two_records_on_target_date() {
        let records = vec![
            record("2024-01-01 09:00:00", 290.0, 285.0, 288.0, 60.0, 800),
            record("2024-01-01 15:00:00", 295.0, 287.0, 291.0, 55.0, 500),
        ];

        let summary = aggregate("Bern", &records, day(2024, 1, 1)).unwrap();

        assert_eq!(summary.city, "Bern");
        assert_eq!(summary.date, day(2024, 1, 1));
        assert!(summary.will_rain);
        assert!((summary.max_temp - 295.0).abs() < EPS);
        assert!((summary.min_temp - 285.0).abs() < EPS);
        assert!((summary.feels_like - 289.5).abs() < EPS);
        assert!((summary.avg_humidity - 57.5).abs() < EPS);
    }

    #[test]
    fn no_matching_records_yields_none() {
        let records = vec![
            record("2023-12-31 21:00:00", 290.0, 285.0, 288.0, 60.0, 500),
            record("2024-01-02 00:00:00", 290.0, 285.0, 288.0, 60.0, 500),
        ];

        assert!(aggregate("Bern", &records, day(2024, 1, 1)).is_none());
        assert!(aggregate("Bern", &[], day(2024, 1, 1)).is_none());
    }

    #[test]
    fn single_record_passes_through() {
        let records = vec![record("2024-03-10 12:00:00", 280.5, 279.0, 277.25, 81.0, 801)];

        let summary = aggregate("Oslo", &records, day(2024, 3, 10)).unwrap();

        assert!((summary.max_temp - 280.5).abs() < EPS);
        assert!((summary.min_temp - 279.0).abs() < EPS);
        assert!((summary.feels_like - 277.25).abs() < EPS);
        assert!((summary.avg_humidity - 81.0).abs() < EPS);
        assert!(!summary.will_rain);
    }

    #[test]
    fn only_target_date_contributes() {
        let records = vec![
            record("2024-01-01 21:00:00", 300.0, 250.0, 260.0, 10.0, 200),
            record("2024-01-02 00:00:00", 281.0, 275.0, 274.0, 70.0, 800),
            record("2024-01-02 03:00:00", 283.0, 276.0, 276.0, 80.0, 803),
            record("2024-01-02 06:00:00", 285.0, 277.0, 281.0, 90.0, 701),
            record("2024-01-03 00:00:00", 310.0, 240.0, 300.0, 0.0, 300),
        ];

        let summary = aggregate("Lima", &records, day(2024, 1, 2)).unwrap();

        assert!((summary.max_temp - 285.0).abs() < EPS);
        assert!((summary.min_temp - 275.0).abs() < EPS);
        assert!((summary.feels_like - 277.0).abs() < EPS);
        assert!((summary.avg_humidity - 80.0).abs() < EPS);
        assert!(!summary.will_rain, "700 and above is not precipitation");
    }

    #[test]
    fn code_699_counts_as_rain() {
        let records = vec![
            record("2024-01-01 00:00:00", 270.0, 268.0, 265.0, 95.0, 699),
            record("2024-01-01 03:00:00", 270.0, 268.0, 265.0, 95.0, 800),
        ];

        assert!(aggregate("Kiruna", &records, day(2024, 1, 1)).unwrap().will_rain);
    }
}
