//! Core data models for the Payroll Engine.
//!
//! Every model is a value type built fresh for each calculation.

mod audit;
mod salary_slip;
mod settlement;
mod tax;

pub use audit::{AuditStep, AuditTrace, AuditWarning};
pub use salary_slip::{SalarySlipContext, SalarySlipInput, SalarySlipResult};
pub use settlement::{SettlementInput, SettlementRecord, SettlementResult, SettlementStatus};
pub use tax::{
    DeductionInputs, HraExemptionInputs, RegimeComparison, TaxCalculationResult, TaxRegime,
};
