//! Monthly salary-slip calculation.
//!
//! Fixed components are prorated by attendance, then PF, ESIC, professional
//! tax and the month's TDS are deducted.

use rust_decimal::Decimal;
use tracing::debug;

use crate::config::TaxConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditStep, AuditTrace, AuditWarning, SalarySlipContext, SalarySlipInput, SalarySlipResult,
};

use super::financial_year::{get_financial_year, get_financial_year_month};
use super::monthly_tds::project_monthly_tds;
use super::rounding::{checked_sum, round_rupee};
use super::statutory::{calculate_esic, calculate_professional_tax, calculate_provident_fund};

/// Calculates a salary slip.
///
/// # Errors
///
/// Returns `InvalidInput` if `working_days` is zero, `StateNotFound` if the
/// context names a state with no professional tax table, and
/// `AmountOutOfRange` if a component or total leaves the `Decimal` range.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::calculate_salary_slip;
/// use payroll_engine::config::TaxConfig;
/// use payroll_engine::models::{SalarySlipContext, SalarySlipInput, TaxRegime};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let input: SalarySlipInput = serde_json::from_str(
///     r#"{"basic_salary": "30000", "hra": "15000", "special_allowance": "15000",
///         "working_days": 30, "paid_days": 30}"#,
/// )
/// .unwrap();
/// let context: SalarySlipContext = serde_json::from_str(
///     r#"{"pay_date": "2024-06-30", "regime": "new"}"#,
/// )
/// .unwrap();
///
/// let slip = calculate_salary_slip(&input, &context, &TaxConfig::fy2024_25()).unwrap();
/// assert_eq!(slip.gross_salary, Decimal::new(60000, 0));
/// // PF 3,600 + PT 200; no TDS below the rebate limit
/// assert_eq!(slip.net_salary, Decimal::new(56200, 0));
/// ```
pub fn calculate_salary_slip(
    input: &SalarySlipInput,
    context: &SalarySlipContext,
    config: &TaxConfig,
) -> EngineResult<SalarySlipResult> {
    if input.working_days == 0 {
        return Err(EngineError::InvalidInput {
            field: "working_days".to_string(),
            message: "must be greater than zero".to_string(),
        });
    }

    let mut trace = AuditTrace::default();

    let paid_days = input.paid_days.min(input.working_days);
    if paid_days != input.paid_days {
        trace.warn(AuditWarning::new(
            "PAID_DAYS_CLAMPED",
            format!(
                "{} paid days exceeds {} working days; clamped",
                input.paid_days, input.working_days
            ),
            "medium",
        ));
    }
    let attended = paid_days.checked_add(input.lop_days);
    if input.lop_days > 0 && attended != Some(input.working_days) {
        trace.warn(AuditWarning::new(
            "ATTENDANCE_MISMATCH",
            format!(
                "{} paid + {} loss-of-pay days does not equal {} working days",
                paid_days, input.lop_days, input.working_days
            ),
            "low",
        ));
    }

    let paid = Decimal::from(paid_days);
    let working = Decimal::from(input.working_days);
    // Multiply before dividing so exact halves still round up.
    let prorate = |quantity: &str, amount: Decimal| {
        amount
            .checked_mul(paid)
            .map(|earned| round_rupee(earned / working))
            .ok_or_else(|| EngineError::out_of_range(quantity))
    };

    // Proration
    let earned_basic = prorate("basic_salary", input.basic_salary)?;
    let earned_allowances = checked_sum(
        "earned_allowances",
        &[
            prorate("hra", input.hra)?,
            prorate("special_allowance", input.special_allowance)?,
            prorate("transport_allowance", input.transport_allowance)?,
            prorate("medical_allowance", input.medical_allowance)?,
            prorate("other_allowances", input.other_allowances)?,
        ],
    )?;
    let gross_salary = checked_sum(
        "gross_salary",
        &[earned_basic, earned_allowances, input.bonus, input.overtime],
    )?;
    let attendance_ratio = (paid / working).round_dp(4);

    trace.push(AuditStep {
        step_number: trace.next_step_number(),
        rule_id: "attendance_proration".to_string(),
        rule_name: "Attendance Proration".to_string(),
        statute_ref: "Payment of Wages Act 1936".to_string(),
        input: serde_json::json!({
            "working_days": input.working_days,
            "paid_days": paid_days,
            "lop_days": input.lop_days
        }),
        output: serde_json::json!({
            "attendance_ratio": attendance_ratio.normalize().to_string(),
            "earned_basic": earned_basic.to_string(),
            "earned_allowances": earned_allowances.to_string(),
            "gross_salary": gross_salary.normalize().to_string()
        }),
        reasoning: format!(
            "{}/{} days of fixed pay plus {} bonus and {} overtime = {}",
            paid_days,
            input.working_days,
            input.bonus.normalize(),
            input.overtime.normalize(),
            gross_salary.normalize()
        ),
    });

    // Statutory deductions
    let statutory = config.statutory();
    let provident_fund = calculate_provident_fund(earned_basic, statutory);
    trace.push(AuditStep {
        step_number: trace.next_step_number(),
        rule_id: "provident_fund".to_string(),
        rule_name: "Provident Fund".to_string(),
        statute_ref: "EPF Act 1952, s.6".to_string(),
        input: serde_json::json!({
            "earned_basic": earned_basic.to_string(),
            "rate": statutory.provident_fund_rate.normalize().to_string()
        }),
        output: serde_json::json!({ "amount": provident_fund.to_string() }),
        reasoning: format!(
            "{} of {} = {}",
            statutory.provident_fund_rate.normalize(),
            earned_basic,
            provident_fund
        ),
    });

    let esic = calculate_esic(gross_salary, statutory);
    trace.push(AuditStep {
        step_number: trace.next_step_number(),
        rule_id: "esic".to_string(),
        rule_name: "Employees' State Insurance".to_string(),
        statute_ref: "ESI Act 1948, s.39".to_string(),
        input: serde_json::json!({
            "gross_salary": gross_salary.normalize().to_string(),
            "wage_ceiling": statutory.esic_wage_ceiling.normalize().to_string()
        }),
        output: serde_json::json!({ "amount": esic.to_string() }),
        reasoning: if gross_salary > statutory.esic_wage_ceiling {
            format!(
                "{} is above the {} ceiling; not covered",
                gross_salary.normalize(),
                statutory.esic_wage_ceiling.normalize()
            )
        } else {
            format!(
                "{} of {} = {}",
                statutory.esic_rate.normalize(),
                gross_salary.normalize(),
                esic
            )
        },
    });

    let slabs = config.professional_tax_slabs(&context.professional_tax_state)?;
    let professional_tax = calculate_professional_tax(gross_salary, slabs);
    trace.push(AuditStep {
        step_number: trace.next_step_number(),
        rule_id: "professional_tax".to_string(),
        rule_name: "Professional Tax".to_string(),
        statute_ref: format!(
            "State professional tax ({})",
            context.professional_tax_state
        ),
        input: serde_json::json!({
            "gross_salary": gross_salary.normalize().to_string(),
            "state": context.professional_tax_state
        }),
        output: serde_json::json!({ "amount": professional_tax.to_string() }),
        reasoning: format!(
            "{} slab for a gross of {}",
            professional_tax.normalize(),
            gross_salary.normalize()
        ),
    });

    // Income tax
    let month_number = get_financial_year_month(context.pay_date);
    let projection = project_monthly_tds(
        gross_salary,
        context.regime,
        month_number,
        context.previous_tds,
        context.monthly_hra_exemption,
        &context.deductions,
        config,
    )?;
    let tds = projection.monthly_tds;
    trace.push(AuditStep {
        step_number: trace.next_step_number(),
        rule_id: "monthly_tds".to_string(),
        rule_name: "Monthly TDS".to_string(),
        statute_ref: "Income-tax Act 1961, s.192".to_string(),
        input: serde_json::json!({
            "regime": context.regime,
            "month_number": month_number,
            "projected_annual_income": projection.projected_annual_income.normalize().to_string(),
            "previous_tds": context.previous_tds.normalize().to_string()
        }),
        output: serde_json::json!({
            "annual_tax": projection.annual_tax.total_tax.to_string(),
            "amount": tds.to_string()
        }),
        reasoning: format!(
            "{} still due over {} remaining months = {}",
            projection.remaining_tax.normalize(),
            projection.remaining_months,
            tds
        ),
    });

    let total_deductions = checked_sum(
        "total_deductions",
        &[
            provident_fund,
            esic,
            professional_tax,
            tds,
            context.other_deductions,
        ],
    )?;
    let net_salary = gross_salary
        .checked_sub(total_deductions)
        .ok_or_else(|| EngineError::out_of_range("net_salary"))?;

    trace.push(AuditStep {
        step_number: trace.next_step_number(),
        rule_id: "net_salary".to_string(),
        rule_name: "Net Salary".to_string(),
        statute_ref: "Payment of Wages Act 1936, s.7".to_string(),
        input: serde_json::json!({
            "gross_salary": gross_salary.normalize().to_string(),
            "total_deductions": total_deductions.normalize().to_string()
        }),
        output: serde_json::json!({ "net_salary": net_salary.normalize().to_string() }),
        reasoning: format!(
            "{} - {} = {}",
            gross_salary.normalize(),
            total_deductions.normalize(),
            net_salary.normalize()
        ),
    });

    debug!(
        pay_date = %context.pay_date,
        gross_salary = %gross_salary,
        total_deductions = %total_deductions,
        net_salary = %net_salary,
        "Calculated salary slip"
    );

    Ok(SalarySlipResult {
        financial_year: get_financial_year(context.pay_date),
        month_number,
        attendance_ratio,
        earned_basic,
        earned_allowances,
        gross_salary,
        provident_fund,
        esic,
        professional_tax,
        tds,
        other_deductions: context.other_deductions,
        total_deductions,
        net_salary,
        audit_trace: trace,
    })
}
