//! Income-tax models.
//!
//! This module contains the [`TaxRegime`] selector, the optional deduction
//! and HRA inputs, and the [`TaxCalculationResult`] produced by the slab
//! tax calculator.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The income-tax regime an employee has opted for.
///
/// # Example
///
/// ```
/// use payroll_engine::models::TaxRegime;
///
/// let regime: TaxRegime = serde_json::from_str("\"new\"").unwrap();
/// assert_eq!(regime, TaxRegime::New);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxRegime {
    /// The old regime, honouring Chapter VI-A deductions and HRA exemption.
    Old,
    /// The new regime (section 115BAC), standard deduction only.
    New,
}

impl std::fmt::Display for TaxRegime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaxRegime::Old => write!(f, "old"),
            TaxRegime::New => write!(f, "new"),
        }
    }
}

/// Declared deductions for the old regime.
///
/// Every field defaults to zero, so a missing declaration and a declared
/// zero are the same value. Caps are applied by the calculator, not here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeductionInputs {
    /// Section 80C investments (capped at 1,50,000).
    pub section_80c: Decimal,
    /// Section 80D health insurance premium (capped at 25,000).
    pub section_80d: Decimal,
    /// Section 80CCD(1B) additional NPS contribution (capped at 50,000).
    pub section_80ccd_1b: Decimal,
    /// Interest on a self-occupied home loan (capped at 2,00,000).
    pub home_loan_interest: Decimal,
    /// Any other deduction, uncapped.
    pub other_deductions: Decimal,
}

/// Inputs for the section 10(13A) HRA exemption.
///
/// Amounts must share a period: all monthly or all annual.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HraExemptionInputs {
    /// HRA received.
    pub hra: Decimal,
    /// Basic salary.
    pub basic_salary: Decimal,
    /// Rent paid.
    pub rent_paid: Decimal,
    /// Whether the rented accommodation is in a metro city.
    #[serde(default)]
    pub is_metro_city: bool,
}

/// The full breakdown of an annual income-tax calculation.
///
/// # Invariants
///
/// - `taxable_income` is never negative
/// - `tax_on_income` is the slab tax after the section 87A rebate
/// - `total_tax = round(tax_on_income + surcharge + health_and_education_cess)`
/// - `monthly_tds = round(total_tax / 12)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxCalculationResult {
    /// Annual gross income as supplied.
    pub gross_income: Decimal,
    /// Standard deduction applied.
    pub standard_deduction: Decimal,
    /// HRA exemption applied (old regime only).
    pub hra_exemption: Decimal,
    /// Section 80C deduction after capping.
    pub section_80c_deduction: Decimal,
    /// Section 80D deduction after capping.
    pub section_80d_deduction: Decimal,
    /// 80CCD(1B), home-loan interest and other deductions after capping.
    pub other_deductions: Decimal,
    /// Sum of every deduction above.
    pub total_deductions: Decimal,
    /// Income after deductions, floored at zero.
    pub taxable_income: Decimal,
    /// Slab tax net of the section 87A rebate.
    pub tax_on_income: Decimal,
    /// Section 87A rebate actually applied.
    pub rebate_87a: Decimal,
    /// Surcharge on `tax_on_income`.
    pub surcharge: Decimal,
    /// Health and education cess.
    pub health_and_education_cess: Decimal,
    /// Total annual tax liability.
    pub total_tax: Decimal,
    /// Flat annual/12 estimate of monthly TDS.
    pub monthly_tds: Decimal,
    /// The regime the calculation was performed under.
    pub regime: TaxRegime,
}

/// Side-by-side results for both regimes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeComparison {
    /// The old-regime calculation.
    pub old_regime: TaxCalculationResult,
    /// The new-regime calculation.
    pub new_regime: TaxCalculationResult,
    /// The regime with the lower total tax (new on a tie).
    pub recommended: TaxRegime,
    /// How much tax the recommended regime saves over the other one.
    pub annual_saving: Decimal,
}
