use std::collections::HashMap;

use actix_web::{HttpResponse, Responder, web};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::PgPool;
use utoipa::{IntoParams, ToSchema};

use crate::analytics::department::{DepartmentRow, RosterEntry, department_rollup};
use crate::analytics::distribution::{DistributionRow, rating_distribution};
use crate::analytics::kpis::{Metric, PeriodRanges, build_metrics};
use crate::analytics::period::{buckets_for_period, period_range};
use crate::analytics::top_performers::{EmployeeInfo, TopPerformer, top_performers};
use crate::analytics::trends::{ClockIn, TrendPoint, trend_point};
use crate::analytics::{period_days, ranking_limit};
use crate::api::error::ApiError;
use crate::model::leave_request::LeaveStatus;

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct AnalyticsQuery {
    /// Trailing window length in days (default 30)
    #[param(example = "30")]
    pub period: Option<String>,
    /// Row cap for ranking endpoints (default 5, max 50)
    #[param(example = "5")]
    pub limit: Option<String>,
}

/* =========================
Shared fetches
========================= */

async fn fetch_ratings(
    pool: &PgPool,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Vec<f64>, sqlx::Error> {
    sqlx::query_scalar::<_, f64>(
        r#"
        SELECT overall_rating
        FROM performance_reviews
        WHERE review_date >= $1 AND review_date <= $2
        "#,
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await
}

async fn fetch_reviews(
    pool: &PgPool,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Vec<(String, f64)>, sqlx::Error> {
    sqlx::query_as::<_, (String, f64)>(
        r#"
        SELECT employee_id, overall_rating
        FROM performance_reviews
        WHERE review_date >= $1 AND review_date <= $2
        "#,
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await
}

async fn count_attendance(
    pool: &PgPool,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        r#"SELECT COUNT(*) FROM attendance_logs WHERE clock_in >= $1 AND clock_in <= $2"#,
    )
    .bind(start)
    .bind(end)
    .fetch_one(pool)
    .await
}

/* =========================
KPI cards
========================= */

/// Dashboard KPI cards: current window vs the preceding window
#[utoipa::path(
    get,
    path = "/api/v1/analytics/kpis",
    params(AnalyticsQuery),
    responses(
        (status = 200, description = "KPI metric cards", body = [Metric]),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Analytics"
)]
pub async fn kpis(
    pool: web::Data<PgPool>,
    query: web::Query<AnalyticsQuery>,
) -> Result<impl Responder, ApiError> {
    let days = period_days(query.period.as_deref());
    let ranges = PeriodRanges::new(days, Utc::now());
    let pool = pool.get_ref();

    let current_employees = sqlx::query_scalar::<_, i64>(
        r#"SELECT COUNT(*) FROM employees WHERE join_date <= $1"#,
    )
    .bind(ranges.end_current)
    .fetch_one(pool)
    .await?;

    let prev_employees = sqlx::query_scalar::<_, i64>(
        r#"SELECT COUNT(*) FROM employees WHERE join_date <= $1"#,
    )
    .bind(ranges.end_prev)
    .fetch_one(pool)
    .await?;

    let today_present = count_attendance(pool, ranges.today_start, ranges.today_end).await?;
    let yesterday_present =
        count_attendance(pool, ranges.yesterday_start, ranges.yesterday_end).await?;

    let current_ratings = fetch_ratings(pool, ranges.start_current, ranges.end_current).await?;
    let prev_ratings = fetch_ratings(pool, ranges.start_prev, ranges.end_prev).await?;

    let pending_current = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM leave_requests
        WHERE status = $1 AND created_at >= $2 AND created_at <= $3
        "#,
    )
    .bind(LeaveStatus::Pending.to_string())
    .bind(ranges.start_current)
    .bind(ranges.end_current)
    .fetch_one(pool)
    .await?;

    // the previous window deliberately counts every status, see build_metrics
    let all_prev = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM leave_requests
        WHERE created_at >= $1 AND created_at <= $2
        "#,
    )
    .bind(ranges.start_prev)
    .bind(ranges.end_prev)
    .fetch_one(pool)
    .await?;

    let metrics = build_metrics(
        current_employees,
        prev_employees,
        today_present,
        yesterday_present,
        &current_ratings,
        &prev_ratings,
        pending_current,
        all_prev,
    );

    Ok(HttpResponse::Ok().json(metrics))
}

/* =========================
Attendance trends
========================= */

/// Attendance trend chart rows, one per non-empty bucket
#[utoipa::path(
    get,
    path = "/api/v1/analytics/attendance/trends",
    params(AnalyticsQuery),
    responses(
        (status = 200, description = "Trend rows", body = [TrendPoint]),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Analytics"
)]
pub async fn attendance_trends(
    pool: web::Data<PgPool>,
    query: web::Query<AnalyticsQuery>,
) -> Result<impl Responder, ApiError> {
    let days = period_days(query.period.as_deref());
    let buckets = buckets_for_period(days, Utc::now());
    let pool = pool.get_ref();

    let employee_count = sqlx::query_scalar::<_, i64>(r#"SELECT COUNT(*) FROM employees"#)
        .fetch_one(pool)
        .await?;

    let mut points: Vec<TrendPoint> = Vec::new();
    for bucket in &buckets {
        let rows = sqlx::query_as::<_, (String, DateTime<Utc>)>(
            r#"
            SELECT employee_id, clock_in
            FROM attendance_logs
            WHERE clock_in >= $1 AND clock_in <= $2
            "#,
        )
        .bind(bucket.start)
        .bind(bucket.end)
        .fetch_all(pool)
        .await?;

        let logs: Vec<ClockIn> = rows
            .into_iter()
            .map(|(employee_id, clock_in)| ClockIn {
                employee_id,
                clock_in,
            })
            .collect();

        if let Some(point) = trend_point(bucket, &logs, employee_count as usize) {
            points.push(point);
        }
    }

    Ok(HttpResponse::Ok().json(points))
}

/* =========================
Department rollup
========================= */

/// Per-department headcount, attendance and performance rollup
#[utoipa::path(
    get,
    path = "/api/v1/analytics/department",
    params(AnalyticsQuery),
    responses(
        (status = 200, description = "Department rows", body = [DepartmentRow]),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Analytics"
)]
pub async fn department(
    pool: web::Data<PgPool>,
    query: web::Query<AnalyticsQuery>,
) -> Result<impl Responder, ApiError> {
    let days = period_days(query.period.as_deref());
    let (start, end) = period_range(days, Utc::now());
    let pool = pool.get_ref();

    let roster: Vec<RosterEntry> =
        sqlx::query_as::<_, (String, Option<String>)>(r#"SELECT id, department FROM employees"#)
            .fetch_all(pool)
            .await?
            .into_iter()
            .map(|(id, department)| RosterEntry {
                id,
                department: department.unwrap_or_default(),
            })
            .collect();

    let attendance = sqlx::query_scalar::<_, String>(
        r#"
        SELECT employee_id
        FROM attendance_logs
        WHERE clock_in >= $1 AND clock_in <= $2
        "#,
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;

    let reviews = fetch_reviews(pool, start, end).await?;

    let rows = department_rollup(&roster, &attendance, &reviews, days);
    Ok(HttpResponse::Ok().json(rows))
}

/* =========================
Performance distribution
========================= */

/// Rating distribution across the five fixed bands
#[utoipa::path(
    get,
    path = "/api/v1/analytics/performance/distribution",
    params(AnalyticsQuery),
    responses(
        (status = 200, description = "Distribution rows, all five bands", body = [DistributionRow]),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Analytics"
)]
pub async fn performance_distribution(
    pool: web::Data<PgPool>,
    query: web::Query<AnalyticsQuery>,
) -> Result<impl Responder, ApiError> {
    let days = period_days(query.period.as_deref());
    let (start, end) = period_range(days, Utc::now());

    let ratings = fetch_ratings(pool.get_ref(), start, end).await?;

    Ok(HttpResponse::Ok().json(rating_distribution(&ratings)))
}

/* =========================
Top performers
========================= */

/// Highest average review ratings within the period
#[utoipa::path(
    get,
    path = "/api/v1/analytics/top-performers",
    params(AnalyticsQuery),
    responses(
        (status = 200, description = "Ranked rows", body = [TopPerformer]),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Analytics"
)]
pub async fn top_performer_ranking(
    pool: web::Data<PgPool>,
    query: web::Query<AnalyticsQuery>,
) -> Result<impl Responder, ApiError> {
    let days = period_days(query.period.as_deref());
    let limit = ranking_limit(query.limit.as_deref());
    let (start, end) = period_range(days, Utc::now());
    let pool = pool.get_ref();

    let reviews = fetch_reviews(pool, start, end).await?;
    if reviews.is_empty() {
        return Ok(HttpResponse::Ok().json(Vec::<TopPerformer>::new()));
    }

    let mut ids: Vec<String> = Vec::new();
    for (employee_id, _) in &reviews {
        if !employee_id.trim().is_empty() && !ids.contains(employee_id) {
            ids.push(employee_id.clone());
        }
    }

    let roster: HashMap<String, EmployeeInfo> =
        sqlx::query_as::<_, (String, Option<String>, Option<String>)>(
            r#"SELECT id, name, department FROM employees WHERE id = ANY($1)"#,
        )
        .bind(&ids)
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(|(id, name, department)| {
            (
                id,
                EmployeeInfo {
                    name: name.unwrap_or_default(),
                    department: department.unwrap_or_default(),
                },
            )
        })
        .collect();

    let rows = top_performers(&reviews, &roster, limit);
    Ok(HttpResponse::Ok().json(rows))
}
