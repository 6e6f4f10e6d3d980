//! Month-by-month TDS projection.
//!
//! A single month's gross is projected to an annual income, the annual tax
//! is computed, and whatever has not yet been withheld is spread evenly over
//! the months left in the financial year. Re-running the projection every
//! month self-corrects: by month 12 the cumulative TDS equals the annual tax.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::TaxConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{DeductionInputs, TaxCalculationResult, TaxRegime};

use super::rounding::round_rupee;
use super::slab_tax::calculate_tax;

/// Months in a financial year.
pub const MONTHS_IN_FINANCIAL_YEAR: u32 = 12;

/// The breakdown behind a monthly TDS figure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyTdsProjection {
    /// Financial-year month (April = 1).
    pub month_number: u32,
    /// Months left including the current one.
    pub remaining_months: u32,
    /// Income the current monthly gross projects to over the year.
    pub projected_annual_income: Decimal,
    /// Annual tax on the projected income.
    pub annual_tax: TaxCalculationResult,
    /// TDS already withheld this financial year.
    pub previous_tds: Decimal,
    /// Annual tax not yet withheld, floored at zero.
    pub remaining_tax: Decimal,
    /// TDS to withhold this month.
    pub monthly_tds: Decimal,
}

/// Projects the annual tax and this month's share of what remains unpaid.
///
/// # Arguments
///
/// * `monthly_gross` - The gross salary for the current month
/// * `regime` - The employee's tax regime
/// * `month_number` - Financial-year month, April = 1 … March = 12
/// * `previous_tds` - TDS already withheld earlier in the financial year
/// * `monthly_hra_exemption` - Monthly HRA exemption, annualised ×12 (old regime only)
/// * `deductions` - Declared annual deductions (old regime only)
/// * `config` - Statutory tables
///
/// # Errors
///
/// Returns `InvalidMonth` if `month_number` is outside 1..=12, and
/// `AmountOutOfRange` if the annualised figures leave the `Decimal` range.
pub fn project_monthly_tds(
    monthly_gross: Decimal,
    regime: TaxRegime,
    month_number: u32,
    previous_tds: Decimal,
    monthly_hra_exemption: Decimal,
    deductions: &DeductionInputs,
    config: &TaxConfig,
) -> EngineResult<MonthlyTdsProjection> {
    if !(1..=MONTHS_IN_FINANCIAL_YEAR).contains(&month_number) {
        return Err(EngineError::InvalidMonth {
            month: month_number,
        });
    }

    let remaining_months = MONTHS_IN_FINANCIAL_YEAR - month_number + 1;

    // Remaining months plus elapsed months, both at the current gross.
    // Equals 12 × gross while the elapsed term uses the current figure.
    let annualise = |quantity: &str, amount: Decimal, months: u32| {
        amount
            .checked_mul(Decimal::from(months))
            .ok_or_else(|| EngineError::out_of_range(quantity))
    };
    let remaining_income = annualise("projected_annual_income", monthly_gross, remaining_months)?;
    let elapsed_income = annualise("projected_annual_income", monthly_gross, month_number - 1)?;
    let projected_annual_income = remaining_income
        .checked_add(elapsed_income)
        .ok_or_else(|| EngineError::out_of_range("projected_annual_income"))?;

    let annual_hra_exemption = annualise(
        "annual_hra_exemption",
        monthly_hra_exemption,
        MONTHS_IN_FINANCIAL_YEAR,
    )?;
    let annual_tax = calculate_tax(
        regime,
        projected_annual_income,
        annual_hra_exemption,
        deductions,
        config,
    );

    let remaining_tax = annual_tax
        .total_tax
        .checked_sub(previous_tds)
        .ok_or_else(|| EngineError::out_of_range("remaining_tax"))?
        .max(Decimal::ZERO);
    let monthly_tds = round_rupee(remaining_tax / Decimal::from(remaining_months));

    debug!(
        regime = %regime,
        month_number,
        projected_annual_income = %projected_annual_income,
        annual_tax = %annual_tax.total_tax,
        previous_tds = %previous_tds,
        monthly_tds = %monthly_tds,
        "Projected monthly TDS"
    );

    Ok(MonthlyTdsProjection {
        month_number,
        remaining_months,
        projected_annual_income,
        annual_tax,
        previous_tds,
        remaining_tax,
        monthly_tds,
    })
}

/// Returns the TDS to withhold this month.
///
/// Shorthand for [`project_monthly_tds`] when only the figure is needed.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::calculate_monthly_tds;
/// use payroll_engine::config::TaxConfig;
/// use payroll_engine::models::{DeductionInputs, TaxRegime};
/// use rust_decimal::Decimal;
///
/// let config = TaxConfig::fy2024_25();
/// let tds = calculate_monthly_tds(
///     Decimal::new(100000, 0),
///     TaxRegime::New,
///     1,
///     Decimal::ZERO,
///     Decimal::ZERO,
///     &DeductionInputs::default(),
///     &config,
/// )
/// .unwrap();
///
/// // 75,400 annual tax over 12 months
/// assert_eq!(tds, Decimal::new(6283, 0));
/// ```
pub fn calculate_monthly_tds(
    monthly_gross: Decimal,
    regime: TaxRegime,
    month_number: u32,
    previous_tds: Decimal,
    monthly_hra_exemption: Decimal,
    deductions: &DeductionInputs,
    config: &TaxConfig,
) -> EngineResult<Decimal> {
    project_monthly_tds(
        monthly_gross,
        regime,
        month_number,
        previous_tds,
        monthly_hra_exemption,
        deductions,
        config,
    )
    .map(|projection| projection.monthly_tds)
}
