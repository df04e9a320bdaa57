use serde::Serialize;
use utoipa::ToSchema;

use super::round1;

#[derive(Debug, Serialize, ToSchema, PartialEq)]
pub struct DistributionRow {
    #[schema(example = "Excellent (90-100)")]
    pub rating: String,
    #[schema(example = 12)]
    pub count: i64,
    #[schema(example = 28.1)]
    pub percentage: f64,
}

struct Band {
    key: &'static str,
    min: f64,
    max: f64,
}

const BANDS: [Band; 5] = [
    Band { key: "Excellent (90-100)", min: 90.0, max: 100.0 },
    Band { key: "Good (80-89)", min: 80.0, max: 89.999 },
    Band { key: "Satisfactory (70-79)", min: 70.0, max: 79.999 },
    Band { key: "Needs Improvement (60-69)", min: 60.0, max: 69.999 },
    Band { key: "Poor (<60)", min: f64::NEG_INFINITY, max: 59.999 },
];

/// Bucket 0-5 ratings into the five fixed dashboard bands.
///
/// Ratings are scaled to a 0-100 percentage first. Every band is always
/// present in the output, zero counts included; a value the partition
/// somehow misses falls back to the Poor band.
pub fn rating_distribution(ratings: &[f64]) -> Vec<DistributionRow> {
    let mut counts = [0i64; BANDS.len()];
    for rating in ratings {
        let pct = rating / 5.0 * 100.0;
        let idx = BANDS
            .iter()
            .position(|band| pct >= band.min && pct <= band.max)
            .unwrap_or(BANDS.len() - 1);
        counts[idx] += 1;
    }

    let total = ratings.len().max(1) as f64;
    BANDS
        .iter()
        .zip(counts)
        .map(|(band, count)| DistributionRow {
            rating: band.key.to_string(),
            count,
            percentage: round1(count as f64 / total * 100.0),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_bands_present_even_when_empty() {
        let rows = rating_distribution(&[]);
        assert_eq!(rows.len(), 5);
        assert!(rows.iter().all(|r| r.count == 0 && r.percentage == 0.0));
        assert_eq!(rows[0].rating, "Excellent (90-100)");
        assert_eq!(rows[4].rating, "Poor (<60)");
    }

    #[test]
    fn ratings_scale_into_expected_bands() {
        // 5 -> 100, 5 -> 100, 4 -> 80, 1 -> 20
        let rows = rating_distribution(&[5.0, 5.0, 4.0, 1.0]);
        assert_eq!(rows[0].count, 2); // Excellent
        assert_eq!(rows[1].count, 1); // Good
        assert_eq!(rows[2].count, 0);
        assert_eq!(rows[3].count, 0);
        assert_eq!(rows[4].count, 1); // Poor

        let total: f64 = rows.iter().map(|r| r.percentage).sum();
        assert!((total - 100.0).abs() < 0.2);
    }

    #[test]
    fn band_edges_are_inclusive_on_the_low_side() {
        // 4.5 -> exactly 90, the Excellent floor
        let rows = rating_distribution(&[4.5]);
        assert_eq!(rows[0].count, 1);
        // 4.0 -> exactly 80, the Good floor
        let rows = rating_distribution(&[4.0]);
        assert_eq!(rows[1].count, 1);
    }

    #[test]
    fn out_of_range_rating_falls_back_to_poor() {
        // 5.5 scales past every band ceiling
        let rows = rating_distribution(&[5.5]);
        assert_eq!(rows[4].count, 1);
    }

    #[test]
    fn percentages_use_the_full_sample_as_denominator() {
        let rows = rating_distribution(&[5.0, 4.0, 3.5, 1.0]);
        assert_eq!(rows[0].percentage, 25.0);
        assert_eq!(rows[1].percentage, 25.0);
        assert_eq!(rows[2].percentage, 25.0);
        assert_eq!(rows[4].percentage, 25.0);
    }
}
