use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AttendanceStatus {
    Open,
    Closed,
}

/// One clock-in/clock-out pair. Employee name and department are copied
/// from the roster at clock-in time so listings survive roster edits.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct AttendanceLog {
    pub id: String,
    pub employee_id: String,
    #[schema(example = "John Doe")]
    pub employee_name: String,
    #[schema(example = "Engineering")]
    pub department: String,
    #[schema(example = "2026-08-07T08:55:00Z", value_type = String, format = "date-time")]
    pub clock_in: DateTime<Utc>,
    #[schema(value_type = Option<String>, format = "date-time", nullable = true)]
    pub clock_out: Option<DateTime<Utc>>,
    #[schema(example = "open")]
    pub status: String,
}
