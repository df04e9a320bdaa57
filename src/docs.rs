use crate::analytics::department::DepartmentRow;
use crate::analytics::distribution::DistributionRow;
use crate::analytics::kpis::{ChangeType, Metric};
use crate::analytics::top_performers::TopPerformer;
use crate::analytics::trends::TrendPoint;
use crate::api::analytics::AnalyticsQuery;
use crate::api::attendance::{AttendanceQuery, ClockInRequest};
use crate::api::employee::{CreateEmployee, EmployeeListResponse, EmployeeQuery};
use crate::api::leave_request::{LeaveFilter, LeaveListResponse, SubmitLeave};
use crate::api::performance::{CreateGoal, CreateReview, GoalQuery, ReviewQuery, StatsQuery};
use crate::model::attendance::{AttendanceLog, AttendanceStatus};
use crate::model::employee::{Employee, EmployeeStatus};
use crate::model::goal::{Goal, GoalStatus};
use crate::model::leave_request::{LeaveRequest, LeaveStatus};
use crate::model::performance::{PerformanceReview, ReviewStatus};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HR Dashboard API",
        version = "1.0.0",
        description = r#"
## HR Dashboard Backend

Backend for an HR management dashboard: employee directory, attendance
tracking, leave workflow, performance reviews and goals, plus the
reporting widgets that power the analytics page.

### 🔹 Key Features
- **Employee Directory**
  - Create, update, list, and view employee profiles
- **Attendance**
  - Clock-in / clock-out with open-log tracking
- **Leave Management**
  - Submit requests, approve/reject pending ones, browse history
- **Performance**
  - Reviews, goals, and summary statistics
- **Analytics**
  - KPI cards, attendance trends, department rollups, rating
    distribution, top performers

### 🔐 Security
Most endpoints are protected using **JWT Bearer authentication**.
Approvals and listings are limited to **Admin** or **HR** roles.

### 📦 Response Format
- JSON-based RESTful responses
- Pagination supported for list endpoints
- All reporting figures rounded to one decimal place

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::leave_request::leave_list,
        crate::api::leave_request::get_leave,
        crate::api::leave_request::submit_leave,
        crate::api::leave_request::approve_leave,
        crate::api::leave_request::reject_leave,

        crate::api::attendance::list_attendance,
        crate::api::attendance::clock_in,
        crate::api::attendance::clock_out,

        crate::api::employee::create_employee,
        crate::api::employee::get_employee,
        crate::api::employee::list_employees,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,

        crate::api::performance::list_reviews,
        crate::api::performance::create_review,
        crate::api::performance::get_review,
        crate::api::performance::update_review,
        crate::api::performance::delete_review,
        crate::api::performance::list_goals,
        crate::api::performance::create_goal,
        crate::api::performance::update_goal,
        crate::api::performance::delete_goal,
        crate::api::performance::performance_stats,

        crate::api::analytics::kpis,
        crate::api::analytics::attendance_trends,
        crate::api::analytics::department,
        crate::api::analytics::performance_distribution,
        crate::api::analytics::top_performer_ranking
    ),
    components(
        schemas(
            Employee,
            EmployeeStatus,
            CreateEmployee,
            EmployeeQuery,
            EmployeeListResponse,
            AttendanceLog,
            AttendanceStatus,
            AttendanceQuery,
            ClockInRequest,
            LeaveRequest,
            LeaveStatus,
            LeaveFilter,
            LeaveListResponse,
            SubmitLeave,
            PerformanceReview,
            ReviewStatus,
            CreateReview,
            ReviewQuery,
            Goal,
            GoalStatus,
            CreateGoal,
            GoalQuery,
            StatsQuery,
            AnalyticsQuery,
            Metric,
            ChangeType,
            TrendPoint,
            DepartmentRow,
            DistributionRow,
            TopPerformer
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Employee", description = "Employee directory APIs"),
        (name = "Attendance", description = "Attendance tracking APIs"),
        (name = "Leave", description = "Leave workflow APIs"),
        (name = "Performance", description = "Review and goal APIs"),
        (name = "Analytics", description = "Reporting dashboard APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
