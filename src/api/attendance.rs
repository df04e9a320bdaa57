use crate::auth::auth::AuthUser;
use crate::model::attendance::{AttendanceLog, AttendanceStatus};
use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use serde::Deserialize;
use sqlx::PgPool;
use tracing::error;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Deserialize, ToSchema)]
pub struct ClockInRequest {
    /// Defaults to the caller's own employee profile
    pub employee_id: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct AttendanceQuery {
    /// Filter by department ("all" disables the filter)
    pub dept: Option<String>,
    /// Filter by log status
    pub status: Option<String>,
    /// Search by employee name or department
    pub q: Option<String>,
}

/// List attendance logs, newest first
#[utoipa::path(
    get,
    path = "/api/v1/attendance",
    params(AttendanceQuery),
    responses(
        (status = 200, description = "Attendance logs", body = [AttendanceLog]),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn list_attendance(
    pool: web::Data<PgPool>,
    query: web::Query<AttendanceQuery>,
) -> actix_web::Result<impl Responder> {
    let mut conditions: Vec<String> = Vec::new();
    let mut bindings: Vec<String> = Vec::new();

    if let Some(dept) = &query.dept {
        if !dept.eq_ignore_ascii_case("all") {
            bindings.push(dept.clone());
            conditions.push(format!("department = ${}", bindings.len()));
        }
    }

    if let Some(status) = &query.status {
        bindings.push(status.clone());
        conditions.push(format!("status = ${}", bindings.len()));
    }

    if let Some(q) = &query.q {
        if !q.trim().is_empty() {
            bindings.push(format!("%{}%", q.trim()));
            let n = bindings.len();
            conditions.push(format!("(employee_name ILIKE ${n} OR department ILIKE ${n})"));
        }
    }

    let where_clause = if conditions.is_empty() {
        "".to_string()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    let sql = format!(
        "SELECT * FROM attendance_logs {} ORDER BY clock_in DESC",
        where_clause
    );

    let mut data_query = sqlx::query_as::<_, AttendanceLog>(&sql);
    for b in &bindings {
        data_query = data_query.bind(b);
    }

    let logs = data_query.fetch_all(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to fetch attendance logs");
        ErrorInternalServerError("Database error")
    })?;

    Ok(HttpResponse::Ok().json(logs))
}

/// Clock-in endpoint
#[utoipa::path(
    post,
    path = "/api/v1/attendance/clock-in",
    request_body = ClockInRequest,
    responses(
        (status = 201, description = "Clocked in", body = AttendanceLog),
        (status = 400, description = "Already clocked in", body = Object, example = json!({
            "message": "Already clocked in"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn clock_in(
    auth: AuthUser,
    pool: web::Data<PgPool>,
    payload: web::Json<ClockInRequest>,
) -> actix_web::Result<impl Responder> {
    let employee_id = payload
        .into_inner()
        .employee_id
        .or(auth.employee_id)
        .ok_or_else(|| actix_web::error::ErrorForbidden("No employee profile"))?;

    let employee = sqlx::query_as::<_, (String, String)>(
        r#"SELECT name, department FROM employees WHERE id = $1"#,
    )
    .bind(&employee_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, employee_id, "Failed to look up employee");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let Some((employee_name, department)) = employee else {
        return Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Employee not found"
        })));
    };

    let already_open = sqlx::query_scalar::<_, bool>(
        r#"SELECT EXISTS(SELECT 1 FROM attendance_logs WHERE employee_id = $1 AND status = $2)"#,
    )
    .bind(&employee_id)
    .bind(AttendanceStatus::Open.to_string())
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, employee_id, "Clock-in lookup failed");
        ErrorInternalServerError("Internal Server Error")
    })?;

    if already_open {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Already clocked in"
        })));
    }

    let log = sqlx::query_as::<_, AttendanceLog>(
        r#"
        INSERT INTO attendance_logs
        (id, employee_id, employee_name, department, clock_in, clock_out, status)
        VALUES ($1, $2, $3, $4, NOW(), NULL, $5)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(&employee_id)
    .bind(&employee_name)
    .bind(&department)
    .bind(AttendanceStatus::Open.to_string())
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, employee_id, "Clock-in failed");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Created().json(log))
}

/// Clock-out endpoint
#[utoipa::path(
    put,
    path = "/api/v1/attendance/{log_id}/clock-out",
    params(
        ("log_id", Path, description = "Attendance log ID")
    ),
    responses(
        (status = 200, description = "Clocked out", body = AttendanceLog),
        (status = 400, description = "No open attendance log", body = Object, example = json!({
            "message": "No open attendance log found"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn clock_out(
    pool: web::Data<PgPool>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let log_id = path.into_inner();

    let updated = sqlx::query_as::<_, AttendanceLog>(
        r#"
        UPDATE attendance_logs
        SET clock_out = NOW(), status = $1
        WHERE id = $2
        AND status = $3
        RETURNING *
        "#,
    )
    .bind(AttendanceStatus::Closed.to_string())
    .bind(&log_id)
    .bind(AttendanceStatus::Open.to_string())
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, log_id, "Clock-out failed");
        ErrorInternalServerError("Internal Server Error")
    })?;

    match updated {
        Some(log) => Ok(HttpResponse::Ok().json(log)),
        None => Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "No open attendance log found"
        }))),
    }
}
