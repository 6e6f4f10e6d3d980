//! Full-and-final settlement models.
//!
//! This module contains the [`SettlementInput`] supplied by the HR system
//! when an employee exits, the computed [`SettlementResult`], and the
//! [`SettlementRecord`] that wraps a result once it has been persisted.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AuditTrace;

/// Everything needed to settle an exiting employee.
///
/// The `Option` amounts are overrides: `None` means the engine computes the
/// figure, while `Some(x)` (including `Some(0)`) replaces the computed value.
/// The remaining amounts have no computed counterpart and default to zero.
///
/// # Example
///
/// ```
/// use payroll_engine::models::SettlementInput;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let input = SettlementInput::new(
///     "emp_001",
///     Decimal::new(60000, 0),
///     Decimal::new(30000, 0),
///     NaiveDate::from_ymd_opt(2019, 4, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
///     NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
/// );
/// assert_eq!(input.notice_period_days, 0);
/// assert!(input.gratuity_amount.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementInput {
    /// Identifier of the exiting employee.
    pub employee_id: String,
    /// Monthly gross salary, used for the daily rate.
    pub gross_monthly_salary: Decimal,
    /// Monthly basic salary, used for gratuity.
    pub basic_salary: Decimal,
    /// Date the employee joined.
    pub date_of_joining: NaiveDate,
    /// Date the employee formally left.
    pub date_of_leaving: NaiveDate,
    /// Last day the employee actually worked.
    pub last_working_day: NaiveDate,
    /// Contractual notice period in days.
    #[serde(default)]
    pub notice_period_days: u32,
    /// Notice days actually served.
    #[serde(default)]
    pub notice_period_served: u32,
    /// Earned-leave balance in days for the current financial year.
    #[serde(default)]
    pub earned_leave_balance: Decimal,
    /// Override for pending salary.
    #[serde(default)]
    pub pending_salary_amount: Option<Decimal>,
    /// Override for leave encashment.
    #[serde(default)]
    pub leave_encashment_amount: Option<Decimal>,
    /// Override for gratuity.
    #[serde(default)]
    pub gratuity_amount: Option<Decimal>,
    /// Override for the notice-period shortfall recovery.
    #[serde(default)]
    pub notice_period_recovery: Option<Decimal>,
    /// Bonus payable.
    #[serde(default)]
    pub bonus: Decimal,
    /// Incentive payable.
    #[serde(default)]
    pub incentive: Decimal,
    /// Any other amount payable.
    #[serde(default)]
    pub other_dues: Decimal,
    /// Outstanding salary advance to recover.
    #[serde(default)]
    pub advance_recovery: Decimal,
    /// Outstanding loan to recover.
    #[serde(default)]
    pub loan_recovery: Decimal,
    /// Value of unreturned company assets.
    #[serde(default)]
    pub asset_recovery: Decimal,
    /// Any other amount to recover.
    #[serde(default)]
    pub other_recoveries: Decimal,
}

impl SettlementInput {
    /// Creates an input with no notice period, no leave balance, no
    /// overrides, and zero for every other amount.
    pub fn new(
        employee_id: impl Into<String>,
        gross_monthly_salary: Decimal,
        basic_salary: Decimal,
        date_of_joining: NaiveDate,
        date_of_leaving: NaiveDate,
        last_working_day: NaiveDate,
    ) -> Self {
        Self {
            employee_id: employee_id.into(),
            gross_monthly_salary,
            basic_salary,
            date_of_joining,
            date_of_leaving,
            last_working_day,
            notice_period_days: 0,
            notice_period_served: 0,
            earned_leave_balance: Decimal::ZERO,
            pending_salary_amount: None,
            leave_encashment_amount: None,
            gratuity_amount: None,
            notice_period_recovery: None,
            bonus: Decimal::ZERO,
            incentive: Decimal::ZERO,
            other_dues: Decimal::ZERO,
            advance_recovery: Decimal::ZERO,
            loan_recovery: Decimal::ZERO,
            asset_recovery: Decimal::ZERO,
            other_recoveries: Decimal::ZERO,
        }
    }
}

/// The computed settlement.
///
/// # Invariants
///
/// - `total_dues` is the sum of the six dues components
/// - `total_recoveries` is the sum of the five recovery components
/// - `gross_settlement = total_dues - total_recoveries` (may be negative)
/// - `net_settlement = gross_settlement - tax_deduction` (may be negative)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementResult {
    /// Financial year of the last working day (e.g. "2024-25").
    pub financial_year: String,
    /// Service length in years (days / 365.25, two decimals).
    pub years_of_service: Decimal,
    /// Salary for days worked in the final month.
    pub pending_salary: Decimal,
    /// Encashed earned leave.
    pub leave_encashment: Decimal,
    /// Bonus payable.
    pub bonus: Decimal,
    /// Incentive payable.
    pub incentive: Decimal,
    /// Gratuity payable.
    pub gratuity: Decimal,
    /// Other dues.
    pub other_dues: Decimal,
    /// Sum of all dues.
    pub total_dues: Decimal,
    /// Advance recovered.
    pub advance_recovery: Decimal,
    /// Loan recovered.
    pub loan_recovery: Decimal,
    /// Days of notice not served.
    pub notice_shortfall_days: u32,
    /// Recovery for notice not served.
    pub notice_period_recovery: Decimal,
    /// Asset recovery.
    pub asset_recovery: Decimal,
    /// Other recoveries.
    pub other_recoveries: Decimal,
    /// Sum of all recoveries.
    pub total_recoveries: Decimal,
    /// Dues less recoveries; negative when the employee owes the company.
    pub gross_settlement: Decimal,
    /// Flat TDS on the settlement.
    pub tax_deduction: Decimal,
    /// Amount payable after TDS; negative when the employee owes the company.
    pub net_settlement: Decimal,
    /// The rules applied, in order.
    pub audit_trace: AuditTrace,
}

/// Lifecycle state of a stored settlement.
///
/// The engine only ever creates drafts; approval and payment are recorded
/// by the systems that consume the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementStatus {
    /// Created, awaiting approval.
    Draft,
}

/// A settlement that has been persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementRecord {
    /// Unique identifier of the record.
    pub id: Uuid,
    /// Human-readable settlement number, e.g. "FNF/2024-25/0001".
    pub settlement_number: String,
    /// Identifier of the exiting employee.
    pub employee_id: String,
    /// The date the record was created.
    pub created_on: NaiveDate,
    /// Lifecycle state.
    pub status: SettlementStatus,
    /// The computed figures.
    pub result: SettlementResult,
}
