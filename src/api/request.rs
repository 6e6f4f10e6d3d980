//! Request types for the Payroll Engine API.
//!
//! Dates arrive as strings and are converted with
//! [`parse_date`](crate::calculation::parse_date), so a malformed date is
//! reported against the field that carried it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::{calculate_hra_exemption, get_financial_year_month, parse_date};
use crate::config::DEFAULT_PROFESSIONAL_TAX_STATE;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    DeductionInputs, HraExemptionInputs, SalarySlipContext, SalarySlipInput, SettlementInput,
    TaxRegime,
};

/// Annual income and reliefs shared by the tax endpoints.
///
/// The HRA exemption may be given directly or as the figures it is computed
/// from; when both are present the computed exemption wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeRequest {
    /// Annual gross income.
    pub gross_income: Decimal,
    /// Annual HRA exemption, already computed.
    #[serde(default)]
    pub hra_exemption: Option<Decimal>,
    /// Annual HRA figures to compute the exemption from.
    #[serde(default)]
    pub hra: Option<HraExemptionInputs>,
    /// Declared deductions (old regime only).
    #[serde(default)]
    pub deductions: DeductionInputs,
}

impl IncomeRequest {
    /// Returns the annual HRA exemption to apply.
    pub fn hra_exemption(&self) -> Decimal {
        self.hra
            .as_ref()
            .map(calculate_hra_exemption)
            .or(self.hra_exemption)
            .unwrap_or(Decimal::ZERO)
    }
}

/// Request body for `POST /tax/calculate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxCalculationRequest {
    /// The regime to calculate under.
    pub regime: TaxRegime,
    /// Income and reliefs.
    #[serde(flatten)]
    pub income: IncomeRequest,
}

/// Request body for `POST /tds/monthly`.
///
/// The financial-year month comes from `month_number` if given, otherwise
/// from `pay_date`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyTdsRequest {
    /// Gross salary for the month.
    pub monthly_gross: Decimal,
    /// The employee's regime.
    pub regime: TaxRegime,
    /// Financial-year month, April = 1.
    #[serde(default)]
    pub month_number: Option<u32>,
    /// Pay date as `YYYY-MM-DD`.
    #[serde(default)]
    pub pay_date: Option<String>,
    /// TDS already withheld this financial year.
    #[serde(default)]
    pub previous_tds: Decimal,
    /// Monthly HRA exemption (old regime only).
    #[serde(default)]
    pub monthly_hra_exemption: Decimal,
    /// Declared deductions (old regime only).
    #[serde(default)]
    pub deductions: DeductionInputs,
}

impl MonthlyTdsRequest {
    /// Resolves the financial-year month.
    ///
    /// Range checking is left to the projector.
    pub fn month_number(&self) -> EngineResult<u32> {
        match (self.month_number, &self.pay_date) {
            (Some(month), _) => Ok(month),
            (None, Some(pay_date)) => {
                Ok(get_financial_year_month(parse_date("pay_date", pay_date)?))
            }
            (None, None) => Err(EngineError::InvalidInput {
                field: "month_number".to_string(),
                message: "either month_number or pay_date is required".to_string(),
            }),
        }
    }
}

/// The employee's tax position in a salary-slip request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalarySlipContextRequest {
    /// Pay date as `YYYY-MM-DD`.
    pub pay_date: String,
    /// The employee's regime.
    pub regime: TaxRegime,
    /// TDS already withheld this financial year.
    #[serde(default)]
    pub previous_tds: Decimal,
    /// Monthly HRA exemption (old regime only).
    #[serde(default)]
    pub monthly_hra_exemption: Decimal,
    /// Declared deductions (old regime only).
    #[serde(default)]
    pub deductions: DeductionInputs,
    /// State whose professional tax table applies.
    #[serde(default)]
    pub professional_tax_state: Option<String>,
    /// Non-statutory deductions.
    #[serde(default)]
    pub other_deductions: Decimal,
}

impl TryFrom<SalarySlipContextRequest> for SalarySlipContext {
    type Error = EngineError;

    fn try_from(req: SalarySlipContextRequest) -> EngineResult<Self> {
        Ok(Self {
            pay_date: parse_date("pay_date", &req.pay_date)?,
            regime: req.regime,
            previous_tds: req.previous_tds,
            monthly_hra_exemption: req.monthly_hra_exemption,
            deductions: req.deductions,
            professional_tax_state: req
                .professional_tax_state
                .unwrap_or_else(|| DEFAULT_PROFESSIONAL_TAX_STATE.to_string()),
            other_deductions: req.other_deductions,
        })
    }
}

/// Request body for `POST /salary-slips/calculate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalarySlipRequest {
    /// Compensation and attendance.
    pub earnings: SalarySlipInput,
    /// Tax position and deduction settings.
    pub context: SalarySlipContextRequest,
}

/// Request body for `POST /settlements` and `POST /settlements/preview`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementRequest {
    /// Identifier of the exiting employee.
    pub employee_id: String,
    /// Monthly gross salary.
    pub gross_monthly_salary: Decimal,
    /// Monthly basic salary.
    pub basic_salary: Decimal,
    /// Joining date as `YYYY-MM-DD`.
    pub date_of_joining: String,
    /// Leaving date as `YYYY-MM-DD`.
    pub date_of_leaving: String,
    /// Last working day as `YYYY-MM-DD`.
    pub last_working_day: String,
    /// Contractual notice period in days.
    #[serde(default)]
    pub notice_period_days: u32,
    /// Notice days served.
    #[serde(default)]
    pub notice_period_served: u32,
    /// Earned-leave balance in days.
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
    /// Override for the notice shortfall recovery.
    #[serde(default)]
    pub notice_period_recovery: Option<Decimal>,
    /// Bonus payable.
    #[serde(default)]
    pub bonus: Decimal,
    /// Incentive payable.
    #[serde(default)]
    pub incentive: Decimal,
    /// Other amounts payable.
    #[serde(default)]
    pub other_dues: Decimal,
    /// Salary advance to recover.
    #[serde(default)]
    pub advance_recovery: Decimal,
    /// Loan to recover.
    #[serde(default)]
    pub loan_recovery: Decimal,
    /// Value of unreturned assets.
    #[serde(default)]
    pub asset_recovery: Decimal,
    /// Other amounts to recover.
    #[serde(default)]
    pub other_recoveries: Decimal,
}

impl TryFrom<SettlementRequest> for SettlementInput {
    type Error = EngineError;

    fn try_from(req: SettlementRequest) -> EngineResult<Self> {
        Ok(Self {
            date_of_joining: parse_date("date_of_joining", &req.date_of_joining)?,
            date_of_leaving: parse_date("date_of_leaving", &req.date_of_leaving)?,
            last_working_day: parse_date("last_working_day", &req.last_working_day)?,
            employee_id: req.employee_id,
            gross_monthly_salary: req.gross_monthly_salary,
            basic_salary: req.basic_salary,
            notice_period_days: req.notice_period_days,
            notice_period_served: req.notice_period_served,
            earned_leave_balance: req.earned_leave_balance,
            pending_salary_amount: req.pending_salary_amount,
            leave_encashment_amount: req.leave_encashment_amount,
            gratuity_amount: req.gratuity_amount,
            notice_period_recovery: req.notice_period_recovery,
            bonus: req.bonus,
            incentive: req.incentive,
            other_dues: req.other_dues,
            advance_recovery: req.advance_recovery,
            loan_recovery: req.loan_recovery,
            asset_recovery: req.asset_recovery,
            other_recoveries: req.other_recoveries,
        })
    }
}
