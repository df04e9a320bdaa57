use actix_web::error::ErrorBadRequest;
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use sqlx::PgPool;

/// ===============================
/// SQL bindable value enum
/// ===============================
#[derive(Debug)]
pub enum SqlValue {
    String(String),
    I64(i64),
    F64(f64),
    Bool(bool),
    Date(NaiveDate),
    DateTime(DateTime<Utc>),
    StringArray(Vec<String>),
    Null,
}

/// ===============================
/// SQL update container
/// ===============================
#[derive(Debug)]
pub struct SqlUpdate {
    pub sql: String,
    pub values: Vec<SqlValue>,
}

/// ===============================
/// Build dynamic UPDATE SQL
/// ===============================
///
/// Turns a flat JSON object into `UPDATE <table> SET col = $1, ... WHERE
/// <id_column> = $n`. String values that parse as dates or RFC 3339
/// timestamps are bound with their temporal type so Postgres accepts them
/// against DATE/TIMESTAMPTZ columns.
pub fn build_update_sql(
    table: &str,
    payload: &Value,
    id_column: &str,
    id_value: &str,
) -> Result<SqlUpdate, actix_web::Error> {
    let obj = payload
        .as_object()
        .ok_or_else(|| ErrorBadRequest("Payload must be a JSON object"))?;

    if obj.is_empty() {
        return Err(ErrorBadRequest("No fields provided for update"));
    }

    let set_clause = obj
        .keys()
        .enumerate()
        .map(|(i, k)| format!("{} = ${}", k, i + 1))
        .collect::<Vec<_>>()
        .join(", ");

    let sql = format!(
        "UPDATE {} SET {} WHERE {} = ${}",
        table,
        set_clause,
        id_column,
        obj.len() + 1
    );

    let mut values = Vec::with_capacity(obj.len() + 1);

    for value in obj.values() {
        match value {
            Value::String(s) => {
                if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                    values.push(SqlValue::Date(d));
                } else if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                    values.push(SqlValue::DateTime(dt.with_timezone(&Utc)));
                } else {
                    values.push(SqlValue::String(s.clone()));
                }
            }
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    values.push(SqlValue::I64(i));
                } else if let Some(f) = n.as_f64() {
                    values.push(SqlValue::F64(f));
                }
            }
            Value::Bool(b) => values.push(SqlValue::Bool(*b)),
            Value::Null => values.push(SqlValue::Null),
            Value::Array(items) => {
                let mut strings = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::String(s) => strings.push(s.clone()),
                        _ => return Err(ErrorBadRequest("Only string arrays are supported")),
                    }
                }
                values.push(SqlValue::StringArray(strings));
            }
            _ => return Err(ErrorBadRequest("Unsupported JSON value type")),
        }
    }

    // WHERE id = $n
    values.push(SqlValue::String(id_value.to_string()));

    Ok(SqlUpdate { sql, values })
}

/// ===============================
/// Execute the update
/// ===============================
pub async fn execute_update(pool: &PgPool, update: SqlUpdate) -> Result<u64, sqlx::Error> {
    let mut query = sqlx::query(&update.sql);

    for value in update.values {
        query = match value {
            SqlValue::String(v) => query.bind(v),
            SqlValue::I64(v) => query.bind(v),
            SqlValue::F64(v) => query.bind(v),
            SqlValue::Bool(v) => query.bind(v),
            SqlValue::Date(v) => query.bind(v),
            SqlValue::DateTime(v) => query.bind(v),
            SqlValue::StringArray(v) => query.bind(v),
            SqlValue::Null => query.bind(None::<String>),
        };
    }

    let result = query.execute(pool).await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn placeholders_are_numbered_and_id_comes_last() {
        let payload = json!({"department": "Sales", "progress": 80});
        let update = build_update_sql("goals", &payload, "id", "g-1").unwrap();
        assert_eq!(
            update.sql,
            "UPDATE goals SET department = $1, progress = $2 WHERE id = $3"
        );
        assert_eq!(update.values.len(), 3);
        assert!(matches!(update.values[2], SqlValue::String(ref v) if v == "g-1"));
    }

    #[test]
    fn date_strings_bind_as_dates() {
        let payload = json!({"deadline": "2026-12-31"});
        let update = build_update_sql("goals", &payload, "id", "g-1").unwrap();
        assert!(matches!(update.values[0], SqlValue::Date(_)));
    }

    #[test]
    fn rfc3339_strings_bind_as_timestamps() {
        let payload = json!({"updated_at": "2026-08-07T10:00:00Z"});
        let update = build_update_sql("performance_reviews", &payload, "id", "r-1").unwrap();
        assert!(matches!(update.values[0], SqlValue::DateTime(_)));
    }

    #[test]
    fn empty_payload_is_rejected() {
        assert!(build_update_sql("employees", &json!({}), "id", "e-1").is_err());
        assert!(build_update_sql("employees", &json!([1, 2]), "id", "e-1").is_err());
    }

    #[test]
    fn string_arrays_are_supported() {
        let payload = json!({"strengths": ["ownership", "mentoring"]});
        let update = build_update_sql("performance_reviews", &payload, "id", "r-1").unwrap();
        assert!(matches!(update.values[0], SqlValue::StringArray(ref v) if v.len() == 2));
    }
}
