use std::collections::{HashMap, HashSet};

use chrono::{DateTime, NaiveDate, Timelike, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::period::Bucket;
use super::round1;

/// An attendance event as the trend aggregator sees it.
#[derive(Debug, Clone)]
pub struct ClockIn {
    pub employee_id: String,
    pub clock_in: DateTime<Utc>,
}

/// One chart segment. `present` carries only the on-time share; `late` is
/// reported separately so the two stack to total presence.
#[derive(Debug, Serialize, ToSchema, PartialEq)]
pub struct TrendPoint {
    #[schema(example = "Week of 2026-07-09")]
    pub month: String,
    #[schema(example = 91.4)]
    pub present: f64,
    #[schema(example = 6.2)]
    pub absent: f64,
    #[schema(example = 2.4)]
    pub late: f64,
}

const LATE_HOUR: u32 = 9;
const LATE_MINUTE: u32 = 30;

fn is_late(clock_in: &DateTime<Utc>) -> bool {
    clock_in.hour() > LATE_HOUR || (clock_in.hour() == LATE_HOUR && clock_in.minute() > LATE_MINUTE)
}

/// Collapse one bucket's clock-ins into a trend point.
///
/// An employee clocking in twice on the same calendar day counts once for
/// that day. Buckets without any events yield `None` and are omitted from
/// the chart rather than rendered as empty segments.
pub fn trend_point(bucket: &Bucket, logs: &[ClockIn], employee_count: usize) -> Option<TrendPoint> {
    if logs.is_empty() {
        return None;
    }

    let mut present_by_day: HashMap<NaiveDate, HashSet<&str>> = HashMap::new();
    let mut late_by_day: HashMap<NaiveDate, HashSet<&str>> = HashMap::new();
    for log in logs {
        let day = log.clock_in.date_naive();
        present_by_day
            .entry(day)
            .or_default()
            .insert(log.employee_id.as_str());
        if is_late(&log.clock_in) {
            late_by_day
                .entry(day)
                .or_default()
                .insert(log.employee_id.as_str());
        }
    }

    let present_days: usize = present_by_day.values().map(HashSet::len).sum();
    let late_days: usize = late_by_day.values().map(HashSet::len).sum();

    let denom = employee_count.max(1) as f64 * bucket.days as f64;
    let present_pct_total = (present_days as f64 / denom * 100.0).clamp(0.0, 100.0);
    let late_pct = (late_days as f64 / denom * 100.0).clamp(0.0, 100.0);
    let present_on_time_pct = (present_pct_total - late_pct).max(0.0);
    let absent_pct = (100.0 - present_pct_total).max(0.0);

    Some(TrendPoint {
        month: bucket.label.clone(),
        present: round1(present_on_time_pct),
        absent: round1(absent_pct),
        late: round1(late_pct),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day_bucket(date: &str) -> Bucket {
        let d = date.parse::<NaiveDate>().unwrap();
        Bucket {
            start: super::super::period::start_of_day(d),
            end: super::super::period::end_of_day(d),
            label: date.to_string(),
            days: 1,
        }
    }

    fn clock_in(employee_id: &str, ts: &str) -> ClockIn {
        let naive = chrono::NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S").unwrap();
        ClockIn {
            employee_id: employee_id.to_string(),
            clock_in: Utc.from_utc_datetime(&naive),
        }
    }

    #[test]
    fn empty_bucket_is_omitted() {
        let bucket = day_bucket("2026-08-07");
        assert_eq!(trend_point(&bucket, &[], 10), None);
    }

    #[test]
    fn duplicate_clock_ins_count_once_per_day() {
        let bucket = day_bucket("2026-08-07");
        let logs = vec![
            clock_in("e1", "2026-08-07 08:00:00"),
            clock_in("e1", "2026-08-07 13:00:00"),
        ];
        let point = trend_point(&bucket, &logs, 2).unwrap();
        // one present-day out of 2 employees x 1 day
        assert_eq!(point.present, 50.0);
        assert_eq!(point.absent, 50.0);
        assert_eq!(point.late, 0.0);
    }

    #[test]
    fn late_cutoff_is_exclusive_of_nine_thirty() {
        let bucket = day_bucket("2026-08-07");
        let on_time = vec![clock_in("e1", "2026-08-07 09:30:00")];
        let point = trend_point(&bucket, &on_time, 1).unwrap();
        assert_eq!(point.late, 0.0);
        assert_eq!(point.present, 100.0);

        let late = vec![clock_in("e1", "2026-08-07 09:31:00")];
        let point = trend_point(&bucket, &late, 1).unwrap();
        assert_eq!(point.late, 100.0);
        assert_eq!(point.present, 0.0);
    }

    #[test]
    fn late_share_is_subtracted_from_presence() {
        let bucket = day_bucket("2026-08-07");
        let logs = vec![
            clock_in("e1", "2026-08-07 08:55:00"),
            clock_in("e2", "2026-08-07 10:05:00"),
        ];
        let point = trend_point(&bucket, &logs, 4).unwrap();
        assert_eq!(point.present, 25.0);
        assert_eq!(point.late, 25.0);
        assert_eq!(point.absent, 50.0);
    }

    #[test]
    fn multi_day_bucket_normalizes_by_day_count() {
        let d = "2026-08-01".parse::<NaiveDate>().unwrap();
        let bucket = Bucket {
            start: super::super::period::start_of_day(d),
            end: super::super::period::end_of_day(d + chrono::Duration::days(6)),
            label: "Week of 2026-08-01".to_string(),
            days: 7,
        };
        // one employee present every day of the week, on time
        let logs: Vec<ClockIn> = (1..=7)
            .map(|day| clock_in("e1", &format!("2026-08-0{day} 09:00:00")))
            .collect();
        let point = trend_point(&bucket, &logs, 1).unwrap();
        assert_eq!(point.present, 100.0);
        assert_eq!(point.absent, 0.0);
    }

    #[test]
    fn empty_roster_does_not_divide_by_zero() {
        let bucket = day_bucket("2026-08-07");
        let logs = vec![clock_in("e1", "2026-08-07 08:00:00")];
        let point = trend_point(&bucket, &logs, 0).unwrap();
        // denominator floored at one employee
        assert_eq!(point.present, 100.0);
    }

    #[test]
    fn shares_never_go_negative() {
        let bucket = day_bucket("2026-08-07");
        // more distinct present employees than the roster claims
        let logs = vec![
            clock_in("e1", "2026-08-07 10:00:00"),
            clock_in("e2", "2026-08-07 10:00:00"),
            clock_in("e3", "2026-08-07 08:00:00"),
        ];
        let point = trend_point(&bucket, &logs, 1).unwrap();
        assert!(point.present >= 0.0);
        assert!(point.absent >= 0.0);
        assert!(point.late <= 100.0);
    }
}
