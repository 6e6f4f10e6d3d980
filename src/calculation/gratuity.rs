//! Gratuity under the Payment of Gratuity Act, 1972.
//!
//! Gratuity is payable once an employee has completed five years of
//! service: 15 days' basic for every completed year, on a 26-working-day
//! month, up to the statutory ceiling of 20 lakh.

use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::config::GratuityConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::AuditStep;

use super::rounding::round_rupee;

/// Statute cited on gratuity audit steps.
pub const GRATUITY_STATUTE: &str = "Payment of Gratuity Act 1972, s.4";

/// The result of a gratuity calculation, including the audit step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GratuityResult {
    /// Calendar days between joining and leaving.
    pub days_of_service: i64,
    /// Service length as days / 365.25, to two decimals.
    pub years_of_service: Decimal,
    /// Whole years of service completed, counted by anniversary.
    pub completed_years: u32,
    /// Whether the minimum service requirement is met.
    pub eligible: bool,
    /// Whether the statutory ceiling limited the amount.
    pub capped: bool,
    /// Gratuity payable.
    pub amount: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Counts whole years from `from` to `to` by anniversary.
///
/// An anniversary falling on 29 February in a non-leap year is taken as
/// 28 February.
pub fn completed_years_of_service(from: NaiveDate, to: NaiveDate) -> u32 {
    if to <= from {
        return 0;
    }

    let mut years = (to.year() - from.year()) as u32;
    let anniversary = from.checked_add_months(Months::new(12 * years));
    if anniversary.is_none_or(|date| date > to) {
        years -= 1;
    }
    years
}

/// Calculates gratuity for an exiting employee.
///
/// # Arguments
///
/// * `basic_salary` - Last drawn monthly basic salary
/// * `date_of_joining` - Date the employee joined
/// * `date_of_leaving` - Date the employee left
/// * `config` - Gratuity rules
/// * `step_number` - The step number for audit trail sequencing
///
/// # Returns
///
/// Fewer completed years than `config.minimum_years` gives zero. Otherwise
/// `round(min(basic × completed_years × 15 / 26, cap))`. A product too large
/// for a `Decimal` is paid at the cap.
///
/// # Errors
///
/// Returns `CalculationError` if `days_per_year` or `working_days_per_month`
/// is not positive.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::calculate_gratuity;
/// use payroll_engine::config::TaxConfig;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let config = TaxConfig::fy2024_25();
/// let result = calculate_gratuity(
///     Decimal::new(40000, 0),
///     NaiveDate::from_ymd_opt(2018, 1, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
///     &config.settlement().gratuity,
///     1,
/// )
/// .unwrap();
///
/// assert_eq!(result.completed_years, 6);
/// assert_eq!(result.amount, Decimal::new(138462, 0));
/// ```
pub fn calculate_gratuity(
    basic_salary: Decimal,
    date_of_joining: NaiveDate,
    date_of_leaving: NaiveDate,
    config: &GratuityConfig,
    step_number: u32,
) -> EngineResult<GratuityResult> {
    for (name, divisor) in [
        ("days_per_year", config.days_per_year),
        ("working_days_per_month", config.working_days_per_month),
    ] {
        if divisor <= Decimal::ZERO {
            return Err(EngineError::CalculationError {
                message: format!("gratuity {} must be positive, got {}", name, divisor),
            });
        }
    }

    let days_of_service = (date_of_leaving - date_of_joining).num_days();
    let years_of_service = Decimal::from(days_of_service)
        .checked_div(config.days_per_year)
        .ok_or_else(|| EngineError::out_of_range("years_of_service"))?
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let completed_years = completed_years_of_service(date_of_joining, date_of_leaving);
    let eligible = completed_years >= config.minimum_years;

    let (amount, capped, reasoning) = if eligible {
        let uncapped = basic_salary
            .max(Decimal::ZERO)
            .checked_mul(Decimal::from(completed_years))
            .and_then(|amount| amount.checked_mul(config.wage_days_per_year))
            .and_then(|amount| amount.checked_div(config.working_days_per_month));
        // Past the Decimal range is past the ceiling.
        let capped = uncapped.is_none_or(|amount| amount > config.cap);
        let amount = round_rupee(uncapped.map_or(config.cap, |amount| amount.min(config.cap)));
        let reasoning = if capped {
            format!(
                "{} x {} years x {}/{} exceeds the ceiling; capped at {}",
                basic_salary.normalize(),
                completed_years,
                config.wage_days_per_year.normalize(),
                config.working_days_per_month.normalize(),
                config.cap.normalize()
            )
        } else {
            format!(
                "{} x {} years x {}/{} = {}",
                basic_salary.normalize(),
                completed_years,
                config.wage_days_per_year.normalize(),
                config.working_days_per_month.normalize(),
                amount
            )
        };
        (amount, capped, reasoning)
    } else {
        (
            Decimal::ZERO,
            false,
            format!(
                "{} completed years is below the {} year minimum; no gratuity",
                completed_years, config.minimum_years
            ),
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "gratuity".to_string(),
        rule_name: "Gratuity".to_string(),
        statute_ref: GRATUITY_STATUTE.to_string(),
        input: serde_json::json!({
            "basic_salary": basic_salary.normalize().to_string(),
            "date_of_joining": date_of_joining.to_string(),
            "date_of_leaving": date_of_leaving.to_string()
        }),
        output: serde_json::json!({
            "years_of_service": years_of_service.to_string(),
            "completed_years": completed_years,
            "eligible": eligible,
            "capped": capped,
            "amount": amount.to_string()
        }),
        reasoning,
    };

    Ok(GratuityResult {
        days_of_service,
        years_of_service,
        completed_years,
        eligible,
        capped,
        amount,
        audit_step,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TaxConfig;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn gratuity(basic: &str, joining: NaiveDate, leaving: NaiveDate) -> GratuityResult {
        let config = TaxConfig::fy2024_25();
        let rules = &config.settlement().gratuity;
        calculate_gratuity(dec(basic), joining, leaving, rules, 1).unwrap()
    }

    /// Concrete scenario: 6 years at 40,000 basic.
    #[test]
    fn test_six_years_service() {
        let result = gratuity("40000", date(2018, 1, 1), date(2024, 1, 1));

        assert_eq!(result.days_of_service, 2191);
        assert_eq!(result.years_of_service, dec("6.00"));
        assert_eq!(result.completed_years, 6);
        assert!(result.eligible);
        assert!(!result.capped);
        assert_eq!(result.amount, dec("138462"));
    }

    #[test]
    fn test_four_years_eleven_months_not_eligible() {
        let result = gratuity("40000", date(2019, 1, 1), date(2023, 12, 1));

        assert_eq!(result.completed_years, 4);
        assert!(!result.eligible);
        assert_eq!(result.amount, Decimal::ZERO);
        assert!(result.audit_step.reasoning.contains("below"));
    }

    #[test]
    fn test_exactly_five_years_eligible() {
        let result = gratuity("40000", date(2019, 1, 1), date(2024, 1, 1));

        assert_eq!(result.completed_years, 5);
        assert!(result.eligible);
        // 40,000 x 5 x 15 / 26 = 115,384.62
        assert_eq!(result.amount, dec("115385"));
    }

    #[test]
    fn test_one_day_short_of_five_years() {
        let result = gratuity("40000", date(2019, 1, 1), date(2023, 12, 31));
        assert_eq!(result.completed_years, 4);
        assert_eq!(result.amount, Decimal::ZERO);
    }

    #[test]
    fn test_partial_year_not_counted() {
        let result = gratuity("26000", date(2015, 6, 1), date(2024, 5, 31));
        // 8 completed years, 11 months ignored
        assert_eq!(result.completed_years, 8);
        assert_eq!(result.amount, dec("120000"));
    }

    #[test]
    fn test_ceiling_applies() {
        let result = gratuity("500000", date(2000, 1, 1), date(2024, 1, 1));

        assert!(result.capped);
        assert_eq!(result.amount, dec("2000000"));
        assert!(result.audit_step.reasoning.contains("capped"));
    }

    #[test]
    fn test_largest_basic_is_paid_at_ceiling() {
        let config = TaxConfig::fy2024_25();
        let result = calculate_gratuity(
            Decimal::MAX,
            date(1990, 1, 1),
            date(2024, 1, 1),
            &config.settlement().gratuity,
            1,
        )
        .unwrap();

        assert!(result.capped);
        assert_eq!(result.amount, dec("2000000"));
    }

    #[test]
    fn test_zero_working_days_per_month_is_an_error() {
        let mut rules = TaxConfig::fy2024_25().settlement().gratuity.clone();
        rules.working_days_per_month = Decimal::ZERO;

        let result = calculate_gratuity(
            dec("40000"),
            date(2018, 1, 1),
            date(2024, 1, 1),
            &rules,
            1,
        );

        match result {
            Err(EngineError::CalculationError { message }) => {
                assert!(message.contains("working_days_per_month"));
            }
            other => panic!("Expected CalculationError, got {:?}", other),
        }
    }

    #[test]
    fn test_leap_day_joining_anniversary() {
        let joining = date(2016, 2, 29);
        assert_eq!(completed_years_of_service(joining, date(2021, 2, 28)), 5);
        assert_eq!(completed_years_of_service(joining, date(2021, 2, 27)), 4);
    }

    #[test]
    fn test_leaving_before_joining_is_zero() {
        let result = gratuity("40000", date(2024, 1, 1), date(2018, 1, 1));

        assert_eq!(result.completed_years, 0);
        assert!(result.days_of_service < 0);
        assert_eq!(result.amount, Decimal::ZERO);
    }

    #[test]
    fn test_audit_step_content() {
        let result = gratuity("40000", date(2018, 1, 1), date(2024, 1, 1));

        assert_eq!(result.audit_step.rule_id, "gratuity");
        assert_eq!(result.audit_step.statute_ref, GRATUITY_STATUTE);
        assert_eq!(result.audit_step.output["completed_years"], 6);
        assert_eq!(result.audit_step.output["amount"], "138462");
    }
}
