use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use super::period::{end_of_day, start_of_day};
use super::round1;

/// The comparison windows behind the KPI cards, all UTC.
///
/// The previous window immediately precedes the current one and has the
/// same length; today/yesterday are calendar days, not rolling 24h windows.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodRanges {
    pub start_current: DateTime<Utc>,
    pub end_current: DateTime<Utc>,
    pub start_prev: DateTime<Utc>,
    pub end_prev: DateTime<Utc>,
    pub today_start: DateTime<Utc>,
    pub today_end: DateTime<Utc>,
    pub yesterday_start: DateTime<Utc>,
    pub yesterday_end: DateTime<Utc>,
}

impl PeriodRanges {
    pub fn new(days: i64, now: DateTime<Utc>) -> Self {
        let today = now.date_naive();
        let current_start_day = today - Duration::days(days - 1);
        let prev_end_day = current_start_day - Duration::days(1);
        let prev_start_day = prev_end_day - Duration::days(days - 1);
        let yesterday = today - Duration::days(1);

        Self {
            start_current: start_of_day(current_start_day),
            end_current: end_of_day(today),
            start_prev: start_of_day(prev_start_day),
            end_prev: end_of_day(prev_end_day),
            today_start: start_of_day(today),
            today_end: end_of_day(today),
            yesterday_start: start_of_day(yesterday),
            yesterday_end: end_of_day(yesterday),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Increase,
    Decrease,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PctChange {
    pub pct: f64,
    pub change_type: ChangeType,
}

/// Signed percent change between two observations.
///
/// A zero previous value pins the change at 0 rather than dividing; the
/// direction then reflects the sign of the current value. Otherwise the
/// direction follows the unrounded difference.
pub fn pct_change(current: f64, previous: f64) -> PctChange {
    if previous == 0.0 {
        return PctChange {
            pct: 0.0,
            change_type: if current >= 0.0 {
                ChangeType::Increase
            } else {
                ChangeType::Decrease
            },
        };
    }
    let diff = (current - previous) / previous * 100.0;
    PctChange {
        pct: round1(diff),
        change_type: if diff >= 0.0 {
            ChangeType::Increase
        } else {
            ChangeType::Decrease
        },
    }
}

/// Mean of a rating sample, 0 for an empty sample.
pub fn mean_rating(ratings: &[f64]) -> f64 {
    let total: f64 = ratings.iter().sum();
    total / ratings.len().max(1) as f64
}

/// One dashboard KPI card.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Metric {
    #[schema(example = "Total Employees")]
    pub title: String,
    #[schema(value_type = Object, example = json!(128))]
    pub value: Value,
    #[schema(example = 12.5)]
    pub change: f64,
    pub change_type: ChangeType,
    #[schema(example = "users")]
    pub icon: String,
}

/// Assemble the four KPI cards from raw per-window observations.
#[allow(clippy::too_many_arguments)]
pub fn build_metrics(
    current_employees: i64,
    prev_employees: i64,
    today_present: i64,
    yesterday_present: i64,
    current_ratings: &[f64],
    prev_ratings: &[f64],
    pending_leave_current: i64,
    all_leave_prev: i64,
) -> Vec<Metric> {
    let employees = pct_change(current_employees as f64, prev_employees as f64);
    let presence = pct_change(today_present as f64, yesterday_present as f64);

    let current_avg = mean_rating(current_ratings);
    let prev_avg = mean_rating(prev_ratings);
    // change compares the raw means, not the displayed percentage
    let performance = pct_change(current_avg, prev_avg);
    let performance_percent = round1(current_avg / 5.0 * 100.0);

    // The current window counts only pending requests while the previous
    // window counts every status. The dashboard has always reported the
    // comparison this way, so it is kept as-is.
    let leave = pct_change(pending_leave_current as f64, all_leave_prev as f64);

    vec![
        Metric {
            title: "Total Employees".to_string(),
            value: current_employees.into(),
            change: employees.pct,
            change_type: employees.change_type,
            icon: "users".to_string(),
        },
        Metric {
            title: "Present Today".to_string(),
            value: today_present.into(),
            change: presence.pct,
            change_type: presence.change_type,
            icon: "user-check".to_string(),
        },
        Metric {
            title: "Average Performance".to_string(),
            value: format!("{performance_percent}%").into(),
            change: performance.pct,
            change_type: performance.change_type,
            icon: "trending-up".to_string(),
        },
        Metric {
            title: "Pending Leave Requests".to_string(),
            value: pending_leave_current.into(),
            change: leave.pct,
            change_type: leave.change_type,
            icon: "file-text".to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn zero_previous_pins_change_at_zero() {
        let change = pct_change(5.0, 0.0);
        assert_eq!(change.pct, 0.0);
        assert_eq!(change.change_type, ChangeType::Increase);
    }

    #[test]
    fn halving_is_minus_fifty_percent() {
        let change = pct_change(25.0, 50.0);
        assert_eq!(change.pct, -50.0);
        assert_eq!(change.change_type, ChangeType::Decrease);
    }

    #[test]
    fn flat_values_count_as_increase() {
        let change = pct_change(10.0, 10.0);
        assert_eq!(change.pct, 0.0);
        assert_eq!(change.change_type, ChangeType::Increase);
    }

    #[test]
    fn direction_follows_unrounded_difference() {
        // -0.04% rounds to 0.0 but the direction stays a decrease
        let change = pct_change(9996.0, 10000.0);
        assert_eq!(change.pct, 0.0);
        assert_eq!(change.change_type, ChangeType::Decrease);
    }

    #[test]
    fn windows_are_adjacent_and_equal_length() {
        let now = Utc.with_ymd_and_hms(2026, 8, 7, 10, 0, 0).unwrap();
        let ranges = PeriodRanges::new(30, now);

        assert_eq!(
            ranges.end_prev + chrono::Duration::milliseconds(1),
            ranges.start_current
        );
        assert_eq!(
            ranges.end_current.date_naive() - ranges.start_current.date_naive(),
            ranges.end_prev.date_naive() - ranges.start_prev.date_naive()
        );
        assert_eq!(ranges.today_start.date_naive(), now.date_naive());
        assert_eq!(
            ranges.yesterday_start.date_naive(),
            now.date_naive() - chrono::Duration::days(1)
        );
    }

    #[test]
    fn empty_rating_sample_means_zero() {
        assert_eq!(mean_rating(&[]), 0.0);
        assert_eq!(mean_rating(&[4.0, 5.0]), 4.5);
    }

    #[test]
    fn metric_cards_carry_expected_titles() {
        let metrics = build_metrics(10, 8, 7, 7, &[4.0, 5.0], &[3.0], 2, 0);
        let titles: Vec<&str> = metrics.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Total Employees",
                "Present Today",
                "Average Performance",
                "Pending Leave Requests"
            ]
        );
        // 4.5 mean displays as 90%
        assert_eq!(metrics[2].value, Value::from("90%"));
        // zero previous leave count pins the change
        assert_eq!(metrics[3].change, 0.0);
        assert_eq!(metrics[3].change_type, ChangeType::Increase);
    }
}
