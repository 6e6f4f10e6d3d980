//! Statutory payroll deductions: Provident Fund, ESIC and Professional Tax.

use rust_decimal::Decimal;

use crate::config::{ProfessionalTaxSlab, StatutoryConfig};

use super::rounding::round_rupee;

/// Calculates the employee's Provident Fund contribution.
///
/// `round(basic_salary × 12%)`.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::calculate_provident_fund;
/// use payroll_engine::config::TaxConfig;
/// use rust_decimal::Decimal;
///
/// let config = TaxConfig::fy2024_25();
/// assert_eq!(
///     calculate_provident_fund(Decimal::new(30000, 0), config.statutory()),
///     Decimal::new(3600, 0)
/// );
/// ```
pub fn calculate_provident_fund(basic_salary: Decimal, config: &StatutoryConfig) -> Decimal {
    round_rupee(basic_salary * config.provident_fund_rate)
}

/// Calculates the employee's ESIC contribution.
///
/// ESIC applies only while monthly gross is at or below the wage ceiling
/// (21,000). Above the ceiling the contribution is zero; there is no
/// partial contribution.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::calculate_esic;
/// use payroll_engine::config::TaxConfig;
/// use rust_decimal::Decimal;
///
/// let config = TaxConfig::fy2024_25();
/// assert_eq!(calculate_esic(Decimal::new(20000, 0), config.statutory()), Decimal::new(150, 0));
/// assert_eq!(calculate_esic(Decimal::new(21001, 0), config.statutory()), Decimal::ZERO);
/// ```
pub fn calculate_esic(gross_salary: Decimal, config: &StatutoryConfig) -> Decimal {
    if gross_salary > config.esic_wage_ceiling {
        return Decimal::ZERO;
    }
    round_rupee(gross_salary * config.esic_rate)
}

/// Calculates monthly professional tax from a state's slab table.
///
/// The first slab whose `up_to` bound covers the gross applies; a slab
/// without a bound covers everything above. Tables differ by state and come
/// from configuration (see [`crate::config::TaxConfig::professional_tax_slabs`]).
/// An empty table yields zero.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::calculate_professional_tax;
/// use payroll_engine::config::TaxConfig;
/// use rust_decimal::Decimal;
///
/// let config = TaxConfig::fy2024_25();
/// let slabs = config.professional_tax_slabs("default").unwrap();
///
/// assert_eq!(calculate_professional_tax(Decimal::new(7500, 0), slabs), Decimal::ZERO);
/// assert_eq!(calculate_professional_tax(Decimal::new(9000, 0), slabs), Decimal::new(175, 0));
/// assert_eq!(calculate_professional_tax(Decimal::new(50000, 0), slabs), Decimal::new(200, 0));
/// ```
pub fn calculate_professional_tax(
    monthly_gross: Decimal,
    slabs: &[ProfessionalTaxSlab],
) -> Decimal {
    slabs
        .iter()
        .find(|slab| slab.up_to.is_none_or(|max| monthly_gross <= max))
        .map(|slab| slab.amount)
        .unwrap_or(Decimal::ZERO)
}
