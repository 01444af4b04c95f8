//! Customer API routes.
//!
//! ```text
//! GET    /api/customer/            - All customers, name ascending
//! GET    /api/customer/{id}        - One customer (400 if absent)
//! DELETE /api/customer/delete/{id} - Delete, returning the deleted customer
//! POST   /api/customer/post        - Create from query parameters
//! POST   /api/customer/search      - Substring search on name/email
//! POST   /api/customer/setStats    - Replace one order-history entry
//! ```

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::instrument;

use nighthawk_core::CustomerId;

use crate::error::{AppError, Result};
use crate::models::{Customer, CustomerDraft, parse_api_date};
use crate::state::AppState;

/// Query parameters of `POST /api/customer/post`.
#[derive(Debug, Deserialize)]
pub struct CreateParams {
    pub email: String,
    pub password: String,
    pub name: String,
    /// Date of last visit, `MM-dd-yyyy`.
    pub dob: String,
}

/// Body of `POST /api/customer/search`.
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub term: String,
}

fn absent(id: CustomerId) -> AppError {
    AppError::BadRequest(format!("customer {id} not found"))
}

/// List every customer.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Customer>>> {
    Ok(Json(state.customers().list_all().await?))
}

/// Fetch one customer.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<CustomerId>,
) -> Result<Json<Customer>> {
    state
        .customers()
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| absent(id))
}

/// Delete a customer and their memberships.
#[instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<CustomerId>,
) -> Result<Json<Customer>> {
    state
        .customers()
        .delete(id)
        .await?
        .map(Json)
        .ok_or_else(|| absent(id))
}

/// Create a customer from query parameters.
#[instrument(skip(state, params), fields(email = %params.email))]
pub async fn create(
    State(state): State<AppState>,
    Query(params): Query<CreateParams>,
) -> Result<(StatusCode, String)> {
    let dob = parse_api_date(&params.dob).map_err(|e| AppError::BadRequest(e.to_string()))?;
    let draft = CustomerDraft::new(&params.email, &params.password, &params.name, Some(dob))
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let customer = state.customers().save(&draft).await?;
    Ok((
        StatusCode::CREATED,
        format!("{} is created successfully", customer.email),
    ))
}

/// Case-insensitive substring search on name or email.
pub async fn search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<Vec<Customer>>> {
    Ok(Json(state.customers().search(request.term.trim()).await?))
}

/// Replace the order-history entry for a date.
///
/// Body: `{"id": <string or number>, "date": "<key>", ...attributes}`.
#[instrument(skip(state, body))]
pub async fn set_stats(
    State(state): State<AppState>,
    Json(body): Json<Map<String, Value>>,
) -> Result<Json<Customer>> {
    let id = stats_customer_id(&body)?;
    let date = body
        .get("date")
        .and_then(Value::as_str)
        .ok_or_else(|| AppError::BadRequest("date is required".to_string()))?;

    state
        .customers()
        .set_stats(id, date, &body)
        .await?
        .map(Json)
        .ok_or_else(|| absent(id))
}

/// Read the customer ID from a stats body, accepting a number or a numeric string.
fn stats_customer_id(body: &Map<String, Value>) -> Result<CustomerId> {
    let invalid = || AppError::BadRequest("id must be a customer id".to_string());

    match body.get("id") {
        Some(Value::Number(n)) => n
            .as_i64()
            .and_then(|n| i32::try_from(n).ok())
            .map(CustomerId::new)
            .ok_or_else(invalid),
        Some(Value::String(s)) => s.parse().map_err(|_| invalid()),
        Some(_) => Err(invalid()),
        None => Err(AppError::BadRequest("id is required".to_string())),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn body(value: &Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_stats_id_accepts_number_and_string() {
        assert_eq!(
            stats_customer_id(&body(&json!({"id": 3}))).unwrap(),
            CustomerId::new(3)
        );
        assert_eq!(
            stats_customer_id(&body(&json!({"id": " 12 "}))).unwrap(),
            CustomerId::new(12)
        );
    }

    #[test]
    fn test_stats_id_rejects_garbage() {
        for value in [json!({}), json!({"id": "x"}), json!({"id": 1.5}), json!({"id": [1]})] {
            assert!(matches!(
                stats_customer_id(&body(&value)),
                Err(AppError::BadRequest(_))
            ));
        }
        assert!(stats_customer_id(&body(&json!({"id": 4_000_000_000_i64}))).is_err());
    }
}
