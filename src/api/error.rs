use actix_web::{HttpResponse, ResponseError};
use derive_more::{Display, From};

/// Storage failure inside a reporting handler. One aggregation request
/// issues several sequential fetches; any failure aborts the whole call
/// with no partial results.
#[derive(Debug, Display, From)]
pub enum ApiError {
    #[display(fmt = "database error: {}", _0)]
    Db(sqlx::Error),
}

impl ResponseError for ApiError {
    fn error_response(&self) -> HttpResponse {
        tracing::error!(error = %self, "Request aborted");
        HttpResponse::InternalServerError().json(serde_json::json!({
            "message": "Internal Server Error"
        }))
    }
}
