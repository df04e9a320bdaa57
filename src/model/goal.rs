use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum GoalStatus {
    NotStarted,
    InProgress,
    Completed,
    Overdue,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Goal {
    pub id: String,
    pub employee_id: String,
    #[schema(example = "Ship the reporting dashboard")]
    pub title: String,
    pub description: String,
    #[schema(example = "professional")]
    pub category: String,
    #[schema(example = "in-progress")]
    pub status: String,
    /// 0-100
    #[schema(example = 60)]
    pub progress: i32,
    #[schema(example = "2026-12-31", value_type = String, format = "date")]
    pub deadline: NaiveDate,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub created_at: Option<DateTime<Utc>>,
}
