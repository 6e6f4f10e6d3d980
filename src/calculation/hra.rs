//! HRA exemption under section 10(13A).

use rust_decimal::Decimal;

use crate::models::HraExemptionInputs;

/// Calculates the exempt portion of house rent allowance.
///
/// The exemption is the least of:
/// 1. HRA received
/// 2. 50% of basic (metro) or 40% of basic (non-metro)
/// 3. Rent paid less 10% of basic
///
/// floored at zero. No rent or no HRA means no exemption. Only the old
/// regime consumes this figure.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::calculate_hra_exemption;
/// use payroll_engine::models::HraExemptionInputs;
/// use rust_decimal::Decimal;
///
/// let exemption = calculate_hra_exemption(&HraExemptionInputs {
///     hra: Decimal::new(20000, 0),
///     basic_salary: Decimal::new(50000, 0),
///     rent_paid: Decimal::new(18000, 0),
///     is_metro_city: true,
/// });
///
/// // min(20,000, 25,000, 18,000 - 5,000)
/// assert_eq!(exemption, Decimal::new(13000, 0));
/// ```
pub fn calculate_hra_exemption(inputs: &HraExemptionInputs) -> Decimal {
    if inputs.rent_paid.is_zero() || inputs.hra.is_zero() {
        return Decimal::ZERO;
    }

    let basic_share = if inputs.is_metro_city {
        Decimal::new(50, 2)
    } else {
        Decimal::new(40, 2)
    };
    let salary_limit = inputs.basic_salary * basic_share;
    // Saturating is exact here: anything below zero is floored below.
    let rent_over_basic = inputs
        .rent_paid
        .saturating_sub(inputs.basic_salary * Decimal::new(10, 2));

    inputs
        .hra
        .min(salary_limit)
        .min(rent_over_basic)
        .max(Decimal::ZERO)
}
