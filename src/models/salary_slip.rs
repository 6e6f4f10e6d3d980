//! Salary-slip models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{AuditTrace, DeductionInputs, TaxRegime};
use crate::config::DEFAULT_PROFESSIONAL_TAX_STATE;

/// Monthly compensation and attendance for one salary slip.
///
/// The fixed components are full-month figures; they are prorated by
/// `paid_days / working_days`. `bonus` and `overtime` are paid as given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalarySlipInput {
    /// Basic salary for a full month.
    pub basic_salary: Decimal,
    /// House rent allowance for a full month.
    #[serde(default)]
    pub hra: Decimal,
    /// Special allowance for a full month.
    #[serde(default)]
    pub special_allowance: Decimal,
    /// Transport allowance for a full month.
    #[serde(default)]
    pub transport_allowance: Decimal,
    /// Medical allowance for a full month.
    #[serde(default)]
    pub medical_allowance: Decimal,
    /// Other allowances for a full month.
    #[serde(default)]
    pub other_allowances: Decimal,
    /// Bonus paid this month.
    #[serde(default)]
    pub bonus: Decimal,
    /// Overtime paid this month.
    #[serde(default)]
    pub overtime: Decimal,
    /// Working days in the month.
    pub working_days: u32,
    /// Days paid.
    pub paid_days: u32,
    /// Loss-of-pay days (informational; already excluded from `paid_days`).
    #[serde(default)]
    pub lop_days: u32,
}

/// Tax position and deduction settings for the employee in the slip month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalarySlipContext {
    /// The pay date; determines the financial year and its month number.
    pub pay_date: NaiveDate,
    /// The regime the employee has opted for.
    pub regime: TaxRegime,
    /// TDS already withheld earlier in the financial year.
    #[serde(default)]
    pub previous_tds: Decimal,
    /// Monthly HRA exemption (old regime only).
    #[serde(default)]
    pub monthly_hra_exemption: Decimal,
    /// Declared deductions (old regime only).
    #[serde(default)]
    pub deductions: DeductionInputs,
    /// State whose professional tax table applies.
    #[serde(default = "default_state")]
    pub professional_tax_state: String,
    /// Non-statutory deductions (canteen, recoveries, ...).
    #[serde(default)]
    pub other_deductions: Decimal,
}

fn default_state() -> String {
    DEFAULT_PROFESSIONAL_TAX_STATE.to_string()
}

/// The computed salary slip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalarySlipResult {
    /// Financial year of the pay date.
    pub financial_year: String,
    /// Financial-year month (April = 1).
    pub month_number: u32,
    /// `paid_days / working_days`.
    pub attendance_ratio: Decimal,
    /// Prorated basic salary.
    pub earned_basic: Decimal,
    /// Prorated allowances (HRA, special, transport, medical, other).
    pub earned_allowances: Decimal,
    /// Earned basic + allowances + bonus + overtime.
    pub gross_salary: Decimal,
    /// Employee PF contribution.
    pub provident_fund: Decimal,
    /// Employee ESIC contribution.
    pub esic: Decimal,
    /// Professional tax.
    pub professional_tax: Decimal,
    /// Income tax withheld this month.
    pub tds: Decimal,
    /// Non-statutory deductions.
    pub other_deductions: Decimal,
    /// Sum of all deductions.
    pub total_deductions: Decimal,
    /// Gross less deductions.
    pub net_salary: Decimal,
    /// The rules applied, in order.
    pub audit_trace: AuditTrace,
}
