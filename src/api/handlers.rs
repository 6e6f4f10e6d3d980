//! HTTP request handlers for the Payroll Engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{
    calculate_salary_slip, calculate_tax, compare_regimes, create_settlement, preview_settlement,
    project_monthly_tds,
};
use crate::error::EngineError;
use crate::models::{SalarySlipContext, SettlementInput};
use crate::repository::SettlementRepository;

use super::request::{
    IncomeRequest, MonthlyTdsRequest, SalarySlipRequest, SettlementRequest,
    TaxCalculationRequest,
};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/tax/calculate", post(calculate_tax_handler))
        .route("/tax/compare", post(compare_regimes_handler))
        .route("/tds/monthly", post(monthly_tds_handler))
        .route("/salary-slips/calculate", post(salary_slip_handler))
        .route("/settlements/preview", post(preview_settlement_handler))
        .route("/settlements", post(create_settlement_handler))
        .route("/settlements/:id", get(get_settlement_handler))
        .with_state(state)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (status, [(header::CONTENT_TYPE, "application/json")], Json(body)).into_response()
}

fn engine_error_response(correlation_id: Uuid, err: EngineError) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %err,
        "Request failed"
    );
    let api_error: ApiErrorResponse = err.into();
    json_response(api_error.status, api_error.error)
}

/// Maps a body rejection to a 400, distinguishing missing fields from bad JSON.
fn json_rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries serde's description of the problem
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new(
                "MISSING_CONTENT_TYPE",
                "Content-Type must be application/json",
            )
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    json_response(StatusCode::BAD_REQUEST, error)
}

/// Handler for POST /tax/calculate.
async fn calculate_tax_handler(
    State(state): State<AppState>,
    payload: Result<Json<TaxCalculationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing tax calculation request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return json_rejection_response(correlation_id, rejection),
    };

    let result = calculate_tax(
        request.regime,
        request.income.gross_income,
        request.income.hra_exemption(),
        &request.income.deductions,
        state.config().config(),
    );

    info!(
        correlation_id = %correlation_id,
        regime = %request.regime,
        total_tax = %result.total_tax,
        "Tax calculated"
    );
    json_response(StatusCode::OK, result)
}

/// Handler for POST /tax/compare.
async fn compare_regimes_handler(
    State(state): State<AppState>,
    payload: Result<Json<IncomeRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing regime comparison request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return json_rejection_response(correlation_id, rejection),
    };

    let comparison = compare_regimes(
        request.gross_income,
        request.hra_exemption(),
        &request.deductions,
        state.config().config(),
    );

    info!(
        correlation_id = %correlation_id,
        recommended = %comparison.recommended,
        annual_saving = %comparison.annual_saving,
        "Regimes compared"
    );
    json_response(StatusCode::OK, comparison)
}

/// Handler for POST /tds/monthly.
async fn monthly_tds_handler(
    State(state): State<AppState>,
    payload: Result<Json<MonthlyTdsRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing monthly TDS request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return json_rejection_response(correlation_id, rejection),
    };

    let projection = request.month_number().and_then(|month_number| {
        project_monthly_tds(
            request.monthly_gross,
            request.regime,
            month_number,
            request.previous_tds,
            request.monthly_hra_exemption,
            &request.deductions,
            state.config().config(),
        )
    });

    match projection {
        Ok(projection) => {
            info!(
                correlation_id = %correlation_id,
                month_number = projection.month_number,
                monthly_tds = %projection.monthly_tds,
                "Monthly TDS projected"
            );
            json_response(StatusCode::OK, projection)
        }
        Err(err) => engine_error_response(correlation_id, err),
    }
}

/// Handler for POST /salary-slips/calculate.
async fn salary_slip_handler(
    State(state): State<AppState>,
    payload: Result<Json<SalarySlipRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing salary slip request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return json_rejection_response(correlation_id, rejection),
    };

    let start_time = Instant::now();
    let slip = SalarySlipContext::try_from(request.context).and_then(|context| {
        calculate_salary_slip(&request.earnings, &context, state.config().config())
    });

    match slip {
        Ok(slip) => {
            info!(
                correlation_id = %correlation_id,
                gross_salary = %slip.gross_salary,
                net_salary = %slip.net_salary,
                duration_us = start_time.elapsed().as_micros(),
                "Salary slip calculated"
            );
            json_response(StatusCode::OK, slip)
        }
        Err(err) => engine_error_response(correlation_id, err),
    }
}

/// Handler for POST /settlements/preview.
///
/// Calculates without storing anything.
async fn preview_settlement_handler(
    State(state): State<AppState>,
    payload: Result<Json<SettlementRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing settlement preview request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return json_rejection_response(correlation_id, rejection),
    };

    let start_time = Instant::now();
    let result = SettlementInput::try_from(request)
        .and_then(|input| preview_settlement(&input, state.config().config()));

    match result {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                net_settlement = %result.net_settlement,
                warnings = result.audit_trace.warnings.len(),
                duration_us = start_time.elapsed().as_micros(),
                "Settlement previewed"
            );
            json_response(StatusCode::OK, result)
        }
        Err(err) => engine_error_response(correlation_id, err),
    }
}

/// Handler for POST /settlements.
///
/// Stores the settlement as a draft and returns the record with 201.
async fn create_settlement_handler(
    State(state): State<AppState>,
    payload: Result<Json<SettlementRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing settlement creation request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return json_rejection_response(correlation_id, rejection),
    };

    let input = match SettlementInput::try_from(request) {
        Ok(input) => input,
        Err(err) => return engine_error_response(correlation_id, err),
    };

    let created_on = Utc::now().date_naive();
    let mut settlements = state.settlements().write().await;
    match create_settlement(
        &input,
        created_on,
        state.config().config(),
        &mut *settlements,
    ) {
        Ok(record) => {
            info!(
                correlation_id = %correlation_id,
                settlement_id = %record.id,
                settlement_number = %record.settlement_number,
                "Settlement created"
            );
            json_response(StatusCode::CREATED, record)
        }
        Err(err) => engine_error_response(correlation_id, err),
    }
}

/// Handler for GET /settlements/:id.
async fn get_settlement_handler(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let id = match id {
        Ok(Path(id)) => id,
        Err(rejection) => {
            warn!(
                correlation_id = %correlation_id,
                error = %rejection.body_text(),
                "Invalid settlement id"
            );
            return json_response(
                StatusCode::BAD_REQUEST,
                ApiError::with_details(
                    "INVALID_ID",
                    "Settlement id must be a UUID",
                    rejection.body_text(),
                ),
            );
        }
    };

    info!(correlation_id = %correlation_id, settlement_id = %id, "Fetching settlement");

    match state.settlements().read().await.get(id) {
        Ok(record) => json_response(StatusCode::OK, record),
        Err(err) => engine_error_response(correlation_id, err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;
    use crate::models::{SettlementRecord, TaxCalculationResult};
    use axum::{body::Body, http::Request};
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use tower::ServiceExt;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_test_state() -> AppState {
        let config = ConfigLoader::load("./config/fy2024-25").expect("Failed to load config");
        AppState::new(config)
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    const SETTLEMENT_BODY: &str = r#"{
        "employee_id": "emp_001",
        "gross_monthly_salary": "60000",
        "basic_salary": "30000",
        "date_of_joining": "2017-04-01",
        "date_of_leaving": "2024-06-15",
        "last_working_day": "2024-06-15",
        "notice_period_days": 60,
        "notice_period_served": 45,
        "earned_leave_balance": "12.5",
        "bonus": "10000",
        "advance_recovery": "5000"
    }"#;

    #[tokio::test]
    async fn test_tax_calculate_returns_200() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(post_json(
                "/tax/calculate",
                r#"{"regime": "new", "gross_income": "800000"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers().get("content-type").unwrap();
        assert_eq!(content_type, "application/json");

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let result: TaxCalculationResult = serde_json::from_slice(&body).unwrap();
        assert_eq!(result.taxable_income, dec("750000"));
        assert_eq!(result.total_tax, dec("26000"));
        assert_eq!(result.monthly_tds, dec("2167"));
    }

    #[tokio::test]
    async fn test_malformed_json_returns_400() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(post_json("/tax/calculate", "{invalid json"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "MALFORMED_JSON");
    }

    #[tokio::test]
    async fn test_missing_field_returns_validation_error() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(post_json("/tax/calculate", r#"{"regime": "new"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "VALIDATION_ERROR");
        assert!(error.message.contains("gross_income"));
    }

    #[tokio::test]
    async fn test_invalid_date_returns_400() {
        let router = create_router(create_test_state());
        let body = SETTLEMENT_BODY.replace("\"2017-04-01\"", "\"2017-02-30\"");

        let response = router
            .oneshot(post_json("/settlements/preview", &body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "INVALID_DATE");
        assert_eq!(error.details.as_deref(), Some("date_of_joining"));
    }

    #[tokio::test]
    async fn test_create_then_get_settlement() {
        let router = create_router(create_test_state());

        let response = router
            .clone()
            .oneshot(post_json("/settlements", SETTLEMENT_BODY))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let created: SettlementRecord = serde_json::from_slice(&body).unwrap();
        assert_eq!(created.settlement_number, "FNF/2024-25/0001");
        assert_eq!(created.result.net_settlement, dec("136039"));

        let response = router
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(format!("/settlements/{}", created.id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let fetched: SettlementRecord = serde_json::from_slice(&body).unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_get_unknown_settlement_returns_404() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(format!("/settlements/{}", Uuid::new_v4()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_get_settlement_with_bad_id_returns_400() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/settlements/not-a-uuid")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "INVALID_ID");
    }
}
