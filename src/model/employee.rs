use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EmployeeStatus {
    Active,
    Inactive,
    Pending,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": "3f6c1d3e-2f57-4a3b-9f6e-1f0c9a4d8b21",
        "name": "John Doe",
        "email": "john.doe@company.com",
        "department": "Engineering",
        "position": "Backend Engineer",
        "status": "active",
        "avatar": null,
        "phone": "+8801712345678",
        "location": "Dhaka",
        "join_date": "2024-01-01T00:00:00Z"
    })
)]
pub struct Employee {
    pub id: String,

    #[schema(example = "John Doe")]
    pub name: String,

    #[schema(example = "john.doe@company.com")]
    pub email: String,

    /// Free-text label, not a foreign key
    #[schema(example = "Engineering")]
    pub department: String,

    #[schema(example = "Backend Engineer")]
    pub position: String,

    #[schema(example = "active")]
    pub status: String,

    #[schema(nullable = true)]
    pub avatar: Option<String>,

    #[schema(example = "+8801712345678", nullable = true)]
    pub phone: Option<String>,

    #[schema(nullable = true)]
    pub location: Option<String>,

    #[schema(example = "2024-01-01T00:00:00Z", value_type = String, format = "date-time")]
    pub join_date: DateTime<Utc>,
}
