//! Slab income-tax calculation under the old and new regimes.
//!
//! Both regimes share one pipeline: deductions, taxable income, slab tax,
//! section 87A rebate, surcharge, health and education cess. They differ
//! only in their slab tables and in which deductions they honour.

use rust_decimal::Decimal;

use crate::config::{SurchargeBand, TaxConfig, TaxSlab};
use crate::models::{DeductionInputs, RegimeComparison, TaxCalculationResult, TaxRegime};

use super::rounding::round_rupee;

/// Computes the slab tax on a taxable income.
///
/// Slabs are walked in ascending order; the portion of income in
/// `[min, min(max, income))` is taxed at the slab's rate, and the walk
/// stops at the first slab whose `min` is not below the income. The sum is
/// rounded to the rupee.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::calculate_slab_tax;
/// use payroll_engine::config::TaxConfig;
/// use payroll_engine::models::TaxRegime;
/// use rust_decimal::Decimal;
///
/// let config = TaxConfig::fy2024_25();
/// let slabs = &config.regime(TaxRegime::New).slabs;
///
/// // 5% of 400,000 + 10% of 50,000
/// assert_eq!(calculate_slab_tax(Decimal::new(750000, 0), slabs), Decimal::new(25000, 0));
/// ```
pub fn calculate_slab_tax(taxable_income: Decimal, slabs: &[TaxSlab]) -> Decimal {
    let mut tax = Decimal::ZERO;

    for slab in slabs {
        if taxable_income <= slab.min {
            break;
        }
        let upper = match slab.max {
            Some(max) => taxable_income.min(max),
            None => taxable_income,
        };
        tax += (upper - slab.min) * slab.rate;
    }

    round_rupee(tax)
}

/// Returns the surcharge rate for a taxable income.
pub fn surcharge_rate(taxable_income: Decimal, bands: &[SurchargeBand]) -> Decimal {
    bands
        .iter()
        .find(|band| band.up_to.is_none_or(|max| taxable_income <= max))
        .map(|band| band.rate)
        .unwrap_or(Decimal::ZERO)
}

/// Deductions after capping, as they appear on the result.
struct AllowedDeductions {
    standard: Decimal,
    hra_exemption: Decimal,
    section_80c: Decimal,
    section_80d: Decimal,
    other: Decimal,
}

impl AllowedDeductions {
    /// Saturates at `Decimal::MAX`; taxable income is floored at zero anyway.
    fn total(&self) -> Decimal {
        [
            self.hra_exemption,
            self.section_80c,
            self.section_80d,
            self.other,
        ]
        .into_iter()
        .fold(self.standard, Decimal::saturating_add)
    }
}

fn capped(amount: Decimal, cap: Decimal) -> Decimal {
    amount.max(Decimal::ZERO).min(cap)
}

/// Calculates annual income tax under the old regime.
///
/// The standard deduction, the pre-computed HRA exemption and every
/// Chapter VI-A deduction are applied, each capped independently:
///
/// | Deduction | Cap |
/// |---|---|
/// | 80C | 1,50,000 |
/// | 80D | 25,000 |
/// | 80CCD(1B) | 50,000 |
/// | Home-loan interest | 2,00,000 |
/// | Other | none |
///
/// 80CCD(1B), home-loan interest and other deductions are reported together
/// as `other_deductions`.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::calculate_tax_old_regime;
/// use payroll_engine::config::TaxConfig;
/// use payroll_engine::models::DeductionInputs;
/// use rust_decimal::Decimal;
///
/// let config = TaxConfig::fy2024_25();
/// let deductions = DeductionInputs {
///     section_80c: Decimal::new(150000, 0),
///     ..Default::default()
/// };
/// let result = calculate_tax_old_regime(Decimal::new(700000, 0), Decimal::ZERO, &deductions, &config);
///
/// // 700,000 - 50,000 - 150,000 = 500,000: fully rebated under 87A
/// assert_eq!(result.taxable_income, Decimal::new(500000, 0));
/// assert_eq!(result.total_tax, Decimal::ZERO);
/// ```
pub fn calculate_tax_old_regime(
    annual_gross_income: Decimal,
    hra_exemption: Decimal,
    deductions: &DeductionInputs,
    config: &TaxConfig,
) -> TaxCalculationResult {
    let caps = &config.income_tax().deduction_caps;

    let capped_other = capped(deductions.section_80ccd_1b, caps.section_80ccd_1b)
        + capped(deductions.home_loan_interest, caps.home_loan_interest);

    let allowed = AllowedDeductions {
        standard: config.regime(TaxRegime::Old).standard_deduction,
        hra_exemption: hra_exemption.max(Decimal::ZERO),
        section_80c: capped(deductions.section_80c, caps.section_80c),
        section_80d: capped(deductions.section_80d, caps.section_80d),
        other: capped_other.saturating_add(deductions.other_deductions.max(Decimal::ZERO)),
    };

    compute_tax(annual_gross_income, TaxRegime::Old, allowed, config)
}

/// Calculates annual income tax under the new regime.
///
/// Only the standard deduction is allowed; HRA and Chapter VI-A deductions
/// are not accepted by this function at all.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::calculate_tax_new_regime;
/// use payroll_engine::config::TaxConfig;
/// use rust_decimal::Decimal;
///
/// let config = TaxConfig::fy2024_25();
/// let result = calculate_tax_new_regime(Decimal::new(800000, 0), &config);
///
/// assert_eq!(result.taxable_income, Decimal::new(750000, 0));
/// assert_eq!(result.tax_on_income, Decimal::new(25000, 0));
/// assert_eq!(result.health_and_education_cess, Decimal::new(1000, 0));
/// assert_eq!(result.total_tax, Decimal::new(26000, 0));
/// assert_eq!(result.monthly_tds, Decimal::new(2167, 0));
/// ```
pub fn calculate_tax_new_regime(
    annual_gross_income: Decimal,
    config: &TaxConfig,
) -> TaxCalculationResult {
    let allowed = AllowedDeductions {
        standard: config.regime(TaxRegime::New).standard_deduction,
        hra_exemption: Decimal::ZERO,
        section_80c: Decimal::ZERO,
        section_80d: Decimal::ZERO,
        other: Decimal::ZERO,
    };

    compute_tax(annual_gross_income, TaxRegime::New, allowed, config)
}

/// Calculates tax for whichever regime is requested.
///
/// `hra_exemption` and `deductions` are ignored for the new regime.
pub fn calculate_tax(
    regime: TaxRegime,
    annual_gross_income: Decimal,
    hra_exemption: Decimal,
    deductions: &DeductionInputs,
    config: &TaxConfig,
) -> TaxCalculationResult {
    match regime {
        TaxRegime::Old => {
            calculate_tax_old_regime(annual_gross_income, hra_exemption, deductions, config)
        }
        TaxRegime::New => calculate_tax_new_regime(annual_gross_income, config),
    }
}

/// Calculates both regimes and recommends the cheaper one.
///
/// On a tie the new regime is recommended, as it is the default regime
/// when an employee makes no declaration.
pub fn compare_regimes(
    annual_gross_income: Decimal,
    hra_exemption: Decimal,
    deductions: &DeductionInputs,
    config: &TaxConfig,
) -> RegimeComparison {
    let old_regime =
        calculate_tax_old_regime(annual_gross_income, hra_exemption, deductions, config);
    let new_regime = calculate_tax_new_regime(annual_gross_income, config);

    let (recommended, annual_saving) = if old_regime.total_tax < new_regime.total_tax {
        (TaxRegime::Old, new_regime.total_tax - old_regime.total_tax)
    } else {
        (TaxRegime::New, old_regime.total_tax - new_regime.total_tax)
    };

    RegimeComparison {
        old_regime,
        new_regime,
        recommended,
        annual_saving,
    }
}

fn compute_tax(
    annual_gross_income: Decimal,
    regime: TaxRegime,
    allowed: AllowedDeductions,
    config: &TaxConfig,
) -> TaxCalculationResult {
    let regime_config = config.regime(regime);
    let income_tax = config.income_tax();

    let total_deductions = allowed.total();
    let taxable_income = annual_gross_income
        .saturating_sub(total_deductions)
        .max(Decimal::ZERO);

    let slab_tax = calculate_slab_tax(taxable_income, &regime_config.slabs);

    // Rebate comes off before surcharge and cess.
    let rebate_87a = if taxable_income <= regime_config.rebate_87a.income_limit {
        slab_tax.min(regime_config.rebate_87a.max_rebate)
    } else {
        Decimal::ZERO
    };
    let tax_on_income = slab_tax - rebate_87a;

    let rate = surcharge_rate(taxable_income, &income_tax.surcharge);
    let surcharge = round_rupee(tax_on_income * rate);
    let tax_with_surcharge = tax_on_income.saturating_add(surcharge);
    let health_and_education_cess = round_rupee(tax_with_surcharge * income_tax.cess_rate);
    let total_tax = round_rupee(tax_with_surcharge.saturating_add(health_and_education_cess));
    let monthly_tds = round_rupee(total_tax / Decimal::new(12, 0));

    TaxCalculationResult {
        gross_income: annual_gross_income,
        standard_deduction: allowed.standard,
        hra_exemption: allowed.hra_exemption,
        section_80c_deduction: allowed.section_80c,
        section_80d_deduction: allowed.section_80d,
        other_deductions: allowed.other,
        total_deductions,
        taxable_income,
        tax_on_income,
        rebate_87a,
        surcharge,
        health_and_education_cess,
        total_tax,
        monthly_tds,
        regime,
    }
}
