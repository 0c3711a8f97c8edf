//! HTTP adapter: routes requests through parsing, validation and the repository.

use std::{collections::HashMap, sync::Arc};

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use readings_core::{
    domain::{
        validate_customer_meter, validate_customer_reading, validate_customer_supply, CustomerMeter,
        CustomerReading, CustomerSupply, InvariantViolation,
    },
    error::StorageError,
    CustomerReadingRepository, Page, Paginator,
};

use crate::serialization::{optional_int, parse_customer_reading_bytes, SerializationError};

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Serialization(#[from] SerializationError),
    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Serialization(_) => StatusCode::BAD_REQUEST,
            Self::Invariant(_) => StatusCode::CONFLICT,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Serialization(e) => {
                tracing::warn!(error = %e, "malformed reading payload");
                metrics::counter!("readings_rejected_total", "kind" => "serialization").increment(1);
            }
            Self::Invariant(e) => {
                tracing::warn!(error = %e, "reading violates domain invariant");
                metrics::counter!("readings_rejected_total", "kind" => "invariant").increment(1);
            }
            Self::Storage(e) => {
                tracing::error!(error = %e, "reading storage failed");
                metrics::counter!("readings_storage_errors_total").increment(1);
            }
        }

        let body = serde_json::json!({ "error": self.to_string() });
        (self.status(), Json(body)).into_response()
    }
}

#[derive(Clone)]
struct AppState {
    repository: Arc<dyn CustomerReadingRepository>,
}

pub fn router(repository: Arc<dyn CustomerReadingRepository>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/customer-reading", post(write_reading))
        .route(
            "/customer/:customer_id/meter/:serial_number/readings",
            get(read_by_meter),
        )
        .route("/customer/:customer_id/supply/:mpxn/readings", get(read_by_supply))
        .with_state(AppState { repository })
}

fn paginator_from(params: &HashMap<String, String>) -> Paginator {
    Paginator::new(optional_int(params, "limit"), optional_int(params, "skip"))
}

async fn health() -> &'static str {
    "ok"
}

async fn write_reading(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<CustomerReading>), ApiError> {
    let customer_reading = parse_customer_reading_bytes(&body)?;
    validate_customer_reading(&customer_reading)?;

    state.repository.save(&customer_reading).await?;

    metrics::counter!("readings_ingested_total").increment(1);
    tracing::info!(
        customer_id = %customer_reading.customer_id,
        serial_number = %customer_reading.serial_number,
        "reading accepted"
    );

    Ok((StatusCode::CREATED, Json(customer_reading)))
}

async fn read_by_meter(
    State(state): State<AppState>,
    Path((customer_id, serial_number)): Path<(String, String)>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Page<CustomerReading>>, ApiError> {
    let customer_meter = CustomerMeter {
        customer_id,
        serial_number,
    };
    validate_customer_meter(&customer_meter)?;

    metrics::counter!("readings_queries_total", "axis" => "meter").increment(1);
    let page = state
        .repository
        .find_by_customer_meter(&customer_meter, Some(paginator_from(&params)))
        .await?;

    Ok(Json(page))
}

async fn read_by_supply(
    State(state): State<AppState>,
    Path((customer_id, mpxn)): Path<(String, String)>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Page<CustomerReading>>, ApiError> {
    let customer_supply = CustomerSupply { customer_id, mpxn };
    validate_customer_supply(&customer_supply)?;

    metrics::counter!("readings_queries_total", "axis" => "supply").increment(1);
    let page = state
        .repository
        .find_by_customer_supply(&customer_supply, Some(paginator_from(&params)))
        .await?;

    Ok(Json(page))
}
