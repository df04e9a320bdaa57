pub mod department;
pub mod distribution;
pub mod kpis;
pub mod period;
pub mod top_performers;
pub mod trends;

/// Every numeric figure leaves this module rounded to one decimal place.
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Parse the `period` query parameter into a trailing day count.
/// Missing or unparsable values fall back to 30; the floor is 1.
pub fn period_days(param: Option<&str>) -> i64 {
    param
        .and_then(|p| p.trim().parse::<i64>().ok())
        .unwrap_or(30)
        .max(1)
}

/// Parse the `limit` query parameter for ranking endpoints.
pub fn ranking_limit(param: Option<&str>) -> usize {
    param
        .and_then(|p| p.trim().parse::<usize>().ok())
        .unwrap_or(5)
        .clamp(1, 50)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_defaults_to_thirty() {
        assert_eq!(period_days(None), 30);
        assert_eq!(period_days(Some("abc")), 30);
        assert_eq!(period_days(Some("")), 30);
    }

    #[test]
    fn period_is_floored_at_one() {
        assert_eq!(period_days(Some("0")), 1);
        assert_eq!(period_days(Some("-5")), 1);
        assert_eq!(period_days(Some("90")), 90);
    }

    #[test]
    fn limit_is_clamped() {
        assert_eq!(ranking_limit(None), 5);
        assert_eq!(ranking_limit(Some("200")), 50);
        assert_eq!(ranking_limit(Some("0")), 1);
        assert_eq!(ranking_limit(Some("10")), 10);
    }

    #[test]
    fn rounding_is_one_decimal() {
        assert_eq!(round1(33.333), 33.3);
        assert_eq!(round1(66.666), 66.7);
        assert_eq!(round1(0.0), 0.0);
    }
}
