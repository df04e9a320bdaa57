use crate::analytics::kpis::mean_rating;
use crate::analytics::round1;
use crate::model::goal::{Goal, GoalStatus};
use crate::model::performance::{PerformanceReview, ReviewStatus};
use crate::utils::db_utils::{build_update_sql, execute_update};
use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::{Value, json};
use sqlx::PgPool;
use tracing::error;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/* =========================
Reviews
========================= */

#[derive(Deserialize, ToSchema)]
pub struct CreateReview {
    pub employee_id: String,
    #[schema(example = "John Doe")]
    pub employee_name: String,
    pub reviewer_id: String,
    #[schema(example = "Jane Admin")]
    pub reviewer_name: String,
    #[schema(example = "2026-06-30T00:00:00Z", format = "date-time", value_type = String)]
    pub review_date: DateTime<Utc>,
    /// 1-5
    #[schema(example = 4.5)]
    pub overall_rating: f64,
    pub position: Option<String>,
    #[schema(example = "Q2 2026")]
    pub period: Option<String>,
    pub status: Option<ReviewStatus>,
    pub strengths: Option<Vec<String>>,
    pub areas_for_improvement: Option<Vec<String>>,
    pub goals: Option<Vec<String>>,
    pub comments: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct ReviewQuery {
    pub employee_id: Option<String>,
    pub reviewer_id: Option<String>,
}

/// List performance reviews, newest first
#[utoipa::path(
    get,
    path = "/api/v1/performance/reviews",
    params(ReviewQuery),
    responses(
        (status = 200, description = "Performance reviews", body = [PerformanceReview])
    ),
    tag = "Performance",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_reviews(
    pool: web::Data<PgPool>,
    query: web::Query<ReviewQuery>,
) -> actix_web::Result<impl Responder> {
    let mut conditions: Vec<String> = Vec::new();
    let mut bindings: Vec<&str> = Vec::new();

    if let Some(employee_id) = query.employee_id.as_deref() {
        bindings.push(employee_id);
        conditions.push(format!("employee_id = ${}", bindings.len()));
    }

    if let Some(reviewer_id) = query.reviewer_id.as_deref() {
        bindings.push(reviewer_id);
        conditions.push(format!("reviewer_id = ${}", bindings.len()));
    }

    let where_clause = if conditions.is_empty() {
        "".to_string()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    let sql = format!(
        "SELECT * FROM performance_reviews {} ORDER BY review_date DESC",
        where_clause
    );

    let mut data_query = sqlx::query_as::<_, PerformanceReview>(&sql);
    for b in &bindings {
        data_query = data_query.bind(*b);
    }

    let reviews = data_query.fetch_all(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to fetch reviews");
        ErrorInternalServerError("Database error")
    })?;

    Ok(HttpResponse::Ok().json(reviews))
}

/// Create a performance review
#[utoipa::path(
    post,
    path = "/api/v1/performance/reviews",
    request_body = CreateReview,
    responses(
        (status = 201, description = "Review created", body = PerformanceReview),
        (status = 400, description = "Invalid payload", body = Object, example = json!({
            "message": "Rating must be between 1 and 5"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Performance",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_review(
    pool: web::Data<PgPool>,
    payload: web::Json<CreateReview>,
) -> actix_web::Result<impl Responder> {
    let payload = payload.into_inner();

    let required = [
        &payload.employee_id,
        &payload.employee_name,
        &payload.reviewer_id,
        &payload.reviewer_name,
    ];
    if required.iter().any(|f| f.trim().is_empty()) {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "employee_id, employee_name, reviewer_id and reviewer_name are required"
        })));
    }

    if !(1.0..=5.0).contains(&payload.overall_rating) {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Rating must be between 1 and 5"
        })));
    }

    let review = sqlx::query_as::<_, PerformanceReview>(
        r#"
        INSERT INTO performance_reviews
        (id, employee_id, employee_name, reviewer_id, reviewer_name, position,
         period, review_date, status, overall_rating, strengths,
         areas_for_improvement, goals, comments, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, NOW(), NOW())
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(&payload.employee_id)
    .bind(&payload.employee_name)
    .bind(&payload.reviewer_id)
    .bind(&payload.reviewer_name)
    .bind(&payload.position)
    .bind(&payload.period)
    .bind(payload.review_date)
    .bind(payload.status.unwrap_or(ReviewStatus::Completed).to_string())
    .bind(payload.overall_rating)
    .bind(&payload.strengths)
    .bind(&payload.areas_for_improvement)
    .bind(&payload.goals)
    .bind(&payload.comments)
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to create review");
        ErrorInternalServerError("Database error")
    })?;

    Ok(HttpResponse::Created().json(review))
}

/// Get a review by ID
#[utoipa::path(
    get,
    path = "/api/v1/performance/reviews/{review_id}",
    params(
        ("review_id", Path, description = "Review ID")
    ),
    responses(
        (status = 200, description = "Review found", body = PerformanceReview),
        (status = 404, description = "Review not found")
    ),
    tag = "Performance",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_review(
    pool: web::Data<PgPool>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let review_id = path.into_inner();

    let review =
        sqlx::query_as::<_, PerformanceReview>("SELECT * FROM performance_reviews WHERE id = $1")
            .bind(&review_id)
            .fetch_optional(pool.get_ref())
            .await
            .map_err(|e| {
                error!(error = %e, review_id, "Failed to fetch review");
                ErrorInternalServerError("Internal Server Error")
            })?;

    match review {
        Some(r) => Ok(HttpResponse::Ok().json(r)),
        None => Ok(HttpResponse::NotFound().json(json!({
            "message": "Review not found"
        }))),
    }
}

/// Update a review (partial)
#[utoipa::path(
    put,
    path = "/api/v1/performance/reviews/{review_id}",
    params(
        ("review_id", Path, description = "Review ID")
    ),
    request_body = Object,
    responses(
        (status = 200, description = "Review updated"),
        (status = 404, description = "Review not found")
    ),
    tag = "Performance",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_review(
    pool: web::Data<PgPool>,
    path: web::Path<String>,
    body: web::Json<Value>,
) -> actix_web::Result<impl Responder> {
    let review_id = path.into_inner();

    let mut payload = body.into_inner();
    if let Some(obj) = payload.as_object_mut() {
        obj.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));
    }

    let update = build_update_sql("performance_reviews", &payload, "id", &review_id)?;

    let affected = execute_update(pool.get_ref(), update)
        .await
        .map_err(actix_web::error::ErrorInternalServerError)?;

    if affected == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Review not found"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Review updated successfully"
    })))
}

/// Delete a review
#[utoipa::path(
    delete,
    path = "/api/v1/performance/reviews/{review_id}",
    params(
        ("review_id", Path, description = "Review ID")
    ),
    responses(
        (status = 200, description = "Review deleted"),
        (status = 404, description = "Review not found")
    ),
    tag = "Performance",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_review(
    pool: web::Data<PgPool>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let review_id = path.into_inner();

    let result = sqlx::query("DELETE FROM performance_reviews WHERE id = $1")
        .bind(&review_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, review_id, "Failed to delete review");
            ErrorInternalServerError("Internal Server Error")
        })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Review not found"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Review deleted"
    })))
}

/* =========================
Goals
========================= */

#[derive(Deserialize, ToSchema)]
pub struct CreateGoal {
    pub employee_id: String,
    #[schema(example = "Ship the reporting dashboard")]
    pub title: String,
    pub description: Option<String>,
    #[schema(example = "professional")]
    pub category: Option<String>,
    pub status: Option<GoalStatus>,
    /// 0-100
    #[schema(example = 0)]
    pub progress: Option<i32>,
    #[schema(example = "2026-12-31", format = "date", value_type = String)]
    pub deadline: NaiveDate,
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct GoalQuery {
    pub status: Option<String>,
    pub employee_id: Option<String>,
}

/// List goals
#[utoipa::path(
    get,
    path = "/api/v1/performance/goals",
    params(GoalQuery),
    responses(
        (status = 200, description = "Goals", body = [Goal])
    ),
    tag = "Performance",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_goals(
    pool: web::Data<PgPool>,
    query: web::Query<GoalQuery>,
) -> actix_web::Result<impl Responder> {
    let mut conditions: Vec<String> = Vec::new();
    let mut bindings: Vec<&str> = Vec::new();

    if let Some(status) = query.status.as_deref() {
        bindings.push(status);
        conditions.push(format!("status = ${}", bindings.len()));
    }

    if let Some(employee_id) = query.employee_id.as_deref() {
        bindings.push(employee_id);
        conditions.push(format!("employee_id = ${}", bindings.len()));
    }

    let where_clause = if conditions.is_empty() {
        "".to_string()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    let sql = format!(
        "SELECT * FROM goals {} ORDER BY created_at DESC",
        where_clause
    );

    let mut data_query = sqlx::query_as::<_, Goal>(&sql);
    for b in &bindings {
        data_query = data_query.bind(*b);
    }

    let goals = data_query.fetch_all(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to fetch goals");
        ErrorInternalServerError("Database error")
    })?;

    Ok(HttpResponse::Ok().json(goals))
}

/// Create a goal
#[utoipa::path(
    post,
    path = "/api/v1/performance/goals",
    request_body = CreateGoal,
    responses(
        (status = 201, description = "Goal created", body = Goal),
        (status = 400, description = "Invalid payload")
    ),
    tag = "Performance",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_goal(
    pool: web::Data<PgPool>,
    payload: web::Json<CreateGoal>,
) -> actix_web::Result<impl Responder> {
    let payload = payload.into_inner();

    if payload.employee_id.trim().is_empty() || payload.title.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "employee_id and title are required"
        })));
    }

    let goal = sqlx::query_as::<_, Goal>(
        r#"
        INSERT INTO goals
        (id, employee_id, title, description, category, status, progress, deadline, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW())
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(&payload.employee_id)
    .bind(&payload.title)
    .bind(payload.description.unwrap_or_default())
    .bind(payload.category.unwrap_or_else(|| "professional".to_string()))
    .bind(payload.status.unwrap_or(GoalStatus::NotStarted).to_string())
    .bind(payload.progress.unwrap_or(0).clamp(0, 100))
    .bind(payload.deadline)
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to create goal");
        ErrorInternalServerError("Database error")
    })?;

    Ok(HttpResponse::Created().json(goal))
}

/// Update a goal (partial)
#[utoipa::path(
    put,
    path = "/api/v1/performance/goals/{goal_id}",
    params(
        ("goal_id", Path, description = "Goal ID")
    ),
    request_body = Object,
    responses(
        (status = 200, description = "Goal updated"),
        (status = 404, description = "Goal not found")
    ),
    tag = "Performance",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_goal(
    pool: web::Data<PgPool>,
    path: web::Path<String>,
    body: web::Json<Value>,
) -> actix_web::Result<impl Responder> {
    let goal_id = path.into_inner();

    let update = build_update_sql("goals", &body, "id", &goal_id)?;

    let affected = execute_update(pool.get_ref(), update)
        .await
        .map_err(actix_web::error::ErrorInternalServerError)?;

    if affected == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Goal not found"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Goal updated successfully"
    })))
}

/// Delete a goal
#[utoipa::path(
    delete,
    path = "/api/v1/performance/goals/{goal_id}",
    params(
        ("goal_id", Path, description = "Goal ID")
    ),
    responses(
        (status = 200, description = "Goal deleted"),
        (status = 404, description = "Goal not found")
    ),
    tag = "Performance",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_goal(
    pool: web::Data<PgPool>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let goal_id = path.into_inner();

    let result = sqlx::query("DELETE FROM goals WHERE id = $1")
        .bind(&goal_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, goal_id, "Failed to delete goal");
            ErrorInternalServerError("Internal Server Error")
        })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Goal not found"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Goal deleted"
    })))
}

/* =========================
Stats
========================= */

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct StatsQuery {
    /// Scope the stats to one employee
    pub employee_id: Option<String>,
}

/// Review and goal statistics, optionally per employee
#[utoipa::path(
    get,
    path = "/api/v1/performance/stats",
    params(StatsQuery),
    responses(
        (status = 200, description = "Performance statistics", body = Object, example = json!({
            "totalReviews": 12,
            "averageRating": 4.2,
            "totalGoals": 8,
            "goalsCompleted": 3,
            "goalsInProgress": 4,
            "averageProgress": 61.5
        }))
    ),
    tag = "Performance",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn performance_stats(
    pool: web::Data<PgPool>,
    query: web::Query<StatsQuery>,
) -> actix_web::Result<impl Responder> {
    let employee_id = query.employee_id.as_deref();

    let ratings_sql = match employee_id {
        Some(_) => "SELECT overall_rating FROM performance_reviews WHERE employee_id = $1",
        None => "SELECT overall_rating FROM performance_reviews",
    };
    let mut ratings_q = sqlx::query_scalar::<_, f64>(ratings_sql);
    if let Some(id) = employee_id {
        ratings_q = ratings_q.bind(id);
    }
    let ratings = ratings_q.fetch_all(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to fetch ratings");
        ErrorInternalServerError("Database error")
    })?;

    let goals_sql = match employee_id {
        Some(_) => "SELECT status, progress FROM goals WHERE employee_id = $1",
        None => "SELECT status, progress FROM goals",
    };
    let mut goals_q = sqlx::query_as::<_, (String, i32)>(goals_sql);
    if let Some(id) = employee_id {
        goals_q = goals_q.bind(id);
    }
    let goals = goals_q.fetch_all(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to fetch goals");
        ErrorInternalServerError("Database error")
    })?;

    let completed = GoalStatus::Completed.to_string();
    let in_progress = GoalStatus::InProgress.to_string();
    let goals_completed = goals.iter().filter(|(s, _)| *s == completed).count();
    let goals_in_progress = goals.iter().filter(|(s, _)| *s == in_progress).count();
    let progress_sum: i64 = goals.iter().map(|(_, p)| *p as i64).sum();
    let average_progress = progress_sum as f64 / goals.len().max(1) as f64;

    Ok(HttpResponse::Ok().json(json!({
        "totalReviews": ratings.len(),
        "averageRating": round1(mean_rating(&ratings)),
        "totalGoals": goals.len(),
        "goalsCompleted": goals_completed,
        "goalsInProgress": goals_in_progress,
        "averageProgress": round1(average_progress),
    })))
}
