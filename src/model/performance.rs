use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ReviewStatus {
    Draft,
    Pending,
    InProgress,
    Completed,
}

/// A completed (or in-flight) performance review. Names are denormalized
/// alongside the ids, matching how the review forms submit them.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct PerformanceReview {
    pub id: String,
    pub employee_id: String,
    #[schema(example = "John Doe")]
    pub employee_name: String,
    pub reviewer_id: String,
    #[schema(example = "Jane Admin")]
    pub reviewer_name: String,
    #[schema(nullable = true)]
    pub position: Option<String>,
    #[schema(example = "Q2 2026", nullable = true)]
    pub period: Option<String>,
    #[schema(example = "2026-06-30T00:00:00Z", value_type = String, format = "date-time")]
    pub review_date: DateTime<Utc>,
    #[schema(example = "completed")]
    pub status: String,
    /// Nominal 0-5 scale; creation enforces 1-5
    #[schema(example = 4.5)]
    pub overall_rating: f64,
    #[schema(nullable = true)]
    pub strengths: Option<Vec<String>>,
    #[schema(nullable = true)]
    pub areas_for_improvement: Option<Vec<String>>,
    #[schema(nullable = true)]
    pub goals: Option<Vec<String>>,
    #[schema(nullable = true)]
    pub comments: Option<String>,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub created_at: Option<DateTime<Utc>>,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub updated_at: Option<DateTime<Utc>>,
}
