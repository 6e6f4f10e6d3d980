//! HTTP API module for the Payroll Engine.
//!
//! This module exposes the tax, TDS, salary-slip and settlement
//! calculations as JSON endpoints.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    IncomeRequest, MonthlyTdsRequest, SalarySlipContextRequest, SalarySlipRequest,
    SettlementRequest, TaxCalculationRequest,
};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
