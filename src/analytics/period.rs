use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};

/// A labeled sub-interval of the reporting period.
///
/// `days` is the clipped span in calendar days. Clipped buckets (a month
/// partially inside the period) must carry the clipped count, since it is
/// used as a normalization denominator downstream.
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub label: String,
    pub days: i64,
}

pub(crate) fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap())
}

pub(crate) fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_hms_milli_opt(23, 59, 59, 999).unwrap())
}

fn range_bounds(days: i64, now: DateTime<Utc>) -> (NaiveDate, NaiveDate) {
    let end = now.date_naive();
    (end - Duration::days(days - 1), end)
}

/// The whole trailing period as a single `[start, end]` window.
pub fn period_range(days: i64, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let (start, end) = range_bounds(days, now);
    (start_of_day(start), end_of_day(end))
}

/// Partition the trailing `days`-day period ending today into chart buckets:
/// daily up to a week, weekly up to a year, monthly beyond that.
pub fn buckets_for_period(days: i64, now: DateTime<Utc>) -> Vec<Bucket> {
    if days <= 7 {
        daily_buckets(days, now)
    } else if days >= 365 {
        monthly_buckets(days, now)
    } else {
        weekly_buckets(days, now)
    }
}

fn daily_buckets(days: i64, now: DateTime<Utc>) -> Vec<Bucket> {
    let (start, end) = range_bounds(days, now);
    let mut buckets = Vec::new();
    let mut cur = start;
    while cur <= end {
        buckets.push(Bucket {
            start: start_of_day(cur),
            end: end_of_day(cur),
            label: cur.format("%Y-%m-%d").to_string(),
            days: 1,
        });
        cur += Duration::days(1);
    }
    buckets
}

fn weekly_buckets(days: i64, now: DateTime<Utc>) -> Vec<Bucket> {
    let (start, end) = range_bounds(days, now);
    let mut buckets = Vec::new();
    let mut cur = start;
    while cur <= end {
        // last window is clipped to the range end
        let week_end = (cur + Duration::days(6)).min(end);
        buckets.push(Bucket {
            start: start_of_day(cur),
            end: end_of_day(week_end),
            label: format!("Week of {}", cur.format("%Y-%m-%d")),
            days: (week_end - cur).num_days() + 1,
        });
        cur += Duration::days(7);
    }
    buckets
}

fn first_of_next_month(date: NaiveDate) -> NaiveDate {
    if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1).unwrap()
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1).unwrap()
    }
}

fn monthly_buckets(days: i64, now: DateTime<Utc>) -> Vec<Bucket> {
    let (start, end) = range_bounds(days, now);
    let mut buckets = Vec::new();
    let mut cur = NaiveDate::from_ymd_opt(start.year(), start.month(), 1).unwrap();
    while cur <= end {
        let next_month = first_of_next_month(cur);
        // clip both edges to the requested range
        let month_end = (next_month - Duration::days(1)).min(end);
        let effective_start = cur.max(start);
        buckets.push(Bucket {
            start: start_of_day(effective_start),
            end: end_of_day(month_end),
            label: cur.format("%b %Y").to_string(),
            days: (month_end - effective_start).num_days() + 1,
        });
        cur = next_month;
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 7, 14, 30, 0).unwrap()
    }

    #[test]
    fn short_periods_get_one_bucket_per_day() {
        for days in 1..=7 {
            let buckets = buckets_for_period(days, fixed_now());
            assert_eq!(buckets.len(), days as usize);
            assert!(buckets.iter().all(|b| b.days == 1));
        }
    }

    #[test]
    fn single_day_period_is_today() {
        let buckets = buckets_for_period(1, fixed_now());
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].label, "2026-08-07");
        assert_eq!(buckets[0].start, start_of_day(NaiveDate::from_ymd_opt(2026, 8, 7).unwrap()));
    }

    #[test]
    fn daily_buckets_are_chronological() {
        let buckets = buckets_for_period(7, fixed_now());
        assert_eq!(buckets[0].label, "2026-08-01");
        assert_eq!(buckets[6].label, "2026-08-07");
        for pair in buckets.windows(2) {
            assert!(pair[0].end < pair[1].start);
        }
    }

    #[test]
    fn final_week_is_clipped() {
        // 10 days starting 2026-07-29: a full week plus a 3-day remainder
        let buckets = buckets_for_period(10, fixed_now());
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].days, 7);
        assert_eq!(buckets[0].label, "Week of 2026-07-29");
        assert_eq!(buckets[1].days, 3);
        assert_eq!(buckets[1].label, "Week of 2026-08-05");
        assert_eq!(buckets[1].end, end_of_day(NaiveDate::from_ymd_opt(2026, 8, 7).unwrap()));
    }

    #[test]
    fn thirty_days_is_five_weeks() {
        let buckets = buckets_for_period(30, fixed_now());
        assert_eq!(buckets.len(), 5);
        let day_counts: Vec<i64> = buckets.iter().map(|b| b.days).collect();
        assert_eq!(day_counts, vec![7, 7, 7, 7, 2]);
    }

    #[test]
    fn yearly_period_uses_clipped_months() {
        // 365 days ending 2026-08-07 starts on 2025-08-08
        let buckets = buckets_for_period(365, fixed_now());
        assert_eq!(buckets.len(), 13);

        let first = &buckets[0];
        assert_eq!(first.label, "Aug 2025");
        // Aug 8 through Aug 31, not the full calendar month
        assert_eq!(first.days, 24);
        assert_eq!(first.start, start_of_day(NaiveDate::from_ymd_opt(2025, 8, 8).unwrap()));

        let last = &buckets[12];
        assert_eq!(last.label, "Aug 2026");
        assert_eq!(last.days, 7);
        assert_eq!(last.end, end_of_day(NaiveDate::from_ymd_opt(2026, 8, 7).unwrap()));

        // interior months keep their full calendar length
        assert_eq!(buckets[1].label, "Sep 2025");
        assert_eq!(buckets[1].days, 30);
        assert_eq!(buckets[6].label, "Feb 2026");
        assert_eq!(buckets[6].days, 28);
    }

    #[test]
    fn bucket_boundaries_are_day_normalized() {
        let buckets = buckets_for_period(30, fixed_now());
        for b in &buckets {
            assert_eq!(b.start.format("%H:%M:%S%.3f").to_string(), "00:00:00.000");
            assert_eq!(b.end.format("%H:%M:%S%.3f").to_string(), "23:59:59.999");
        }
    }

    #[test]
    fn period_range_spans_whole_window() {
        let (start, end) = period_range(30, fixed_now());
        assert_eq!(start, start_of_day(NaiveDate::from_ymd_opt(2026, 7, 9).unwrap()));
        assert_eq!(end, end_of_day(NaiveDate::from_ymd_opt(2026, 8, 7).unwrap()));
    }
}
