//! Full-and-final settlement calculation.
//!
//! Dues (pending salary, leave encashment, bonus, incentive, gratuity, other
//! dues) are netted against recoveries (advance, loan, notice shortfall,
//! assets, other) and a flat TDS is deducted. Preview and create share
//! [`calculate_settlement`], so they always agree to the rupee.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::{SettlementConfig, SettlementTdsRule, TaxConfig};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditStep, AuditTrace, AuditWarning, SettlementInput, SettlementRecord, SettlementResult,
    SettlementStatus,
};
use crate::repository::SettlementRepository;

use super::financial_year::get_financial_year;
use super::gratuity::{GRATUITY_STATUTE, calculate_gratuity};
use super::rounding::{checked_sum, round_rupee};

/// Converts a monthly gross to a daily rate using the fixed divisor.
///
/// The divisor is a constant (30), not the number of days in the month.
///
/// # Errors
///
/// Returns `CalculationError` if the configured divisor is not positive.
pub fn daily_salary(
    gross_monthly_salary: Decimal,
    config: &SettlementConfig,
) -> EngineResult<Decimal> {
    if config.daily_salary_divisor <= Decimal::ZERO {
        return Err(EngineError::CalculationError {
            message: format!(
                "daily salary divisor must be positive, got {}",
                config.daily_salary_divisor
            ),
        });
    }
    gross_monthly_salary
        .checked_div(config.daily_salary_divisor)
        .ok_or_else(|| EngineError::out_of_range("daily_salary"))
}

/// Salary for the days worked in the final month.
///
/// The settlement month is assumed to start on the 1st, so the number of
/// pending days is the day-of-month of the last working day.
pub fn calculate_pending_salary(
    daily_salary: Decimal,
    last_working_day: NaiveDate,
) -> EngineResult<Decimal> {
    daily_salary
        .checked_mul(Decimal::from(last_working_day.day()))
        .map(round_rupee)
        .ok_or_else(|| EngineError::out_of_range("pending_salary"))
}

/// Encashment of the earned-leave balance at the daily rate.
pub fn calculate_leave_encashment(
    daily_salary: Decimal,
    earned_leave_balance: Decimal,
) -> EngineResult<Decimal> {
    daily_salary
        .checked_mul(earned_leave_balance.max(Decimal::ZERO))
        .map(round_rupee)
        .ok_or_else(|| EngineError::out_of_range("leave_encashment"))
}

/// Returns the notice shortfall in days and the amount to recover for it.
pub fn calculate_notice_recovery(
    daily_salary: Decimal,
    notice_period_days: u32,
    notice_period_served: u32,
) -> EngineResult<(u32, Decimal)> {
    let shortfall = notice_period_days.saturating_sub(notice_period_served);
    let recovery = daily_salary
        .checked_mul(Decimal::from(shortfall))
        .map(round_rupee)
        .ok_or_else(|| EngineError::out_of_range("notice_period_recovery"))?;
    Ok((shortfall, recovery))
}

/// Flat TDS on a settlement: `rate` of the gross when it exceeds the threshold.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::calculate_settlement_tds;
/// use payroll_engine::config::TaxConfig;
/// use rust_decimal::Decimal;
///
/// let config = TaxConfig::fy2024_25();
/// let rule = &config.settlement().tds;
///
/// assert_eq!(calculate_settlement_tds(Decimal::new(50000, 0), rule)?, Decimal::ZERO);
/// assert_eq!(calculate_settlement_tds(Decimal::new(60000, 0), rule)?, Decimal::new(6000, 0));
/// # Ok::<(), payroll_engine::error::EngineError>(())
/// ```
pub fn calculate_settlement_tds(
    gross_settlement: Decimal,
    rule: &SettlementTdsRule,
) -> EngineResult<Decimal> {
    if gross_settlement <= rule.threshold {
        return Ok(Decimal::ZERO);
    }
    gross_settlement
        .checked_mul(rule.rate)
        .map(round_rupee)
        .ok_or_else(|| EngineError::out_of_range("tax_deduction"))
}

fn override_step(
    step_number: u32,
    rule_id: &str,
    rule_name: &str,
    statute_ref: &str,
    amount: Decimal,
) -> AuditStep {
    AuditStep {
        step_number,
        rule_id: rule_id.to_string(),
        rule_name: rule_name.to_string(),
        statute_ref: statute_ref.to_string(),
        input: serde_json::json!({
            "override": amount.to_string()
        }),
        output: serde_json::json!({
            "amount": amount.to_string(),
            "source": "override"
        }),
        reasoning: format!(
            "Using supplied amount {} instead of the computed value",
            amount
        ),
    }
}

/// Calculates a full-and-final settlement.
///
/// Overrides on the input take precedence over computed components whenever
/// they are `Some`, including `Some(0)`. `gross_settlement` and
/// `net_settlement` are never floored: a negative figure means the employee
/// owes the company.
///
/// # Errors
///
/// Returns `CalculationError` if a configured divisor is not positive, and
/// `AmountOutOfRange` if a component or total leaves the `Decimal` range.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::calculate_settlement;
/// use payroll_engine::config::TaxConfig;
/// use payroll_engine::models::SettlementInput;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let config = TaxConfig::fy2024_25();
/// let input = SettlementInput::new(
///     "emp_001",
///     Decimal::new(60000, 0),
///     Decimal::new(30000, 0),
///     NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
///     NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
/// );
///
/// let result = calculate_settlement(&input, &config).unwrap();
/// // 10 days at 60,000 / 30
/// assert_eq!(result.pending_salary, Decimal::new(20000, 0));
/// assert_eq!(result.net_settlement, Decimal::new(20000, 0));
/// ```
pub fn calculate_settlement(
    input: &SettlementInput,
    config: &TaxConfig,
) -> EngineResult<SettlementResult> {
    let settlement_config = config.settlement();
    let mut trace = AuditTrace::default();

    if input.date_of_leaving < input.date_of_joining {
        trace.warn(AuditWarning::new(
            "LEAVING_BEFORE_JOINING",
            format!(
                "Leaving date {} is before the joining date {}; no service is counted",
                input.date_of_leaving, input.date_of_joining
            ),
            "high",
        ));
    }
    if input.last_working_day < input.date_of_joining {
        trace.warn(AuditWarning::new(
            "LAST_WORKING_DAY_BEFORE_JOINING",
            format!(
                "Last working day {} is before the joining date {}",
                input.last_working_day, input.date_of_joining
            ),
            "high",
        ));
    }
    if input.last_working_day > input.date_of_leaving {
        trace.warn(AuditWarning::new(
            "LAST_WORKING_DAY_AFTER_LEAVING",
            format!(
                "Last working day {} is after the leaving date {}",
                input.last_working_day, input.date_of_leaving
            ),
            "medium",
        ));
    }

    // Daily rate
    let daily = daily_salary(input.gross_monthly_salary, settlement_config)?;
    trace.push(AuditStep {
        step_number: trace.next_step_number(),
        rule_id: "daily_salary".to_string(),
        rule_name: "Daily Salary".to_string(),
        statute_ref: "Company policy: fixed 30-day month".to_string(),
        input: serde_json::json!({
            "gross_monthly_salary": input.gross_monthly_salary.normalize().to_string(),
            "divisor": settlement_config.daily_salary_divisor.normalize().to_string()
        }),
        output: serde_json::json!({
            "daily_salary": daily.round_dp(2).normalize().to_string()
        }),
        reasoning: format!(
            "{} / {} = {} per day",
            input.gross_monthly_salary.normalize(),
            settlement_config.daily_salary_divisor.normalize(),
            daily.round_dp(2).normalize()
        ),
    });

    // Pending salary
    let pending_salary = match input.pending_salary_amount {
        Some(amount) => {
            trace.push(override_step(
                trace.next_step_number(),
                "pending_salary",
                "Pending Salary",
                "Payment of Wages Act 1936, s.5",
                amount,
            ));
            amount
        }
        None => {
            let days = input.last_working_day.day();
            let amount = calculate_pending_salary(daily, input.last_working_day)?;
            trace.push(AuditStep {
                step_number: trace.next_step_number(),
                rule_id: "pending_salary".to_string(),
                rule_name: "Pending Salary".to_string(),
                statute_ref: "Payment of Wages Act 1936, s.5".to_string(),
                input: serde_json::json!({
                    "last_working_day": input.last_working_day.to_string(),
                    "pending_days": days
                }),
                output: serde_json::json!({
                    "amount": amount.to_string(),
                    "source": "computed"
                }),
                reasoning: format!(
                    "{} days from the 1st to {} at the daily rate = {}",
                    days, input.last_working_day, amount
                ),
            });
            amount
        }
    };

    // Leave encashment
    let leave_encashment = match input.leave_encashment_amount {
        Some(amount) => {
            trace.push(override_step(
                trace.next_step_number(),
                "leave_encashment",
                "Leave Encashment",
                "Income-tax Act 1961, s.10(10AA)",
                amount,
            ));
            amount
        }
        None => {
            let amount = calculate_leave_encashment(daily, input.earned_leave_balance)?;
            trace.push(AuditStep {
                step_number: trace.next_step_number(),
                rule_id: "leave_encashment".to_string(),
                rule_name: "Leave Encashment".to_string(),
                statute_ref: "Income-tax Act 1961, s.10(10AA)".to_string(),
                input: serde_json::json!({
                    "earned_leave_balance": input.earned_leave_balance.normalize().to_string()
                }),
                output: serde_json::json!({
                    "amount": amount.to_string(),
                    "source": "computed"
                }),
                reasoning: format!(
                    "{} days of earned leave at the daily rate = {}",
                    input.earned_leave_balance.normalize(),
                    amount
                ),
            });
            amount
        }
    };

    // Gratuity is always evaluated so the result can report service length.
    let gratuity_result = calculate_gratuity(
        input.basic_salary,
        input.date_of_joining,
        input.date_of_leaving,
        &settlement_config.gratuity,
        trace.next_step_number(),
    )?;
    let years_of_service = gratuity_result.years_of_service;
    let gratuity = match input.gratuity_amount {
        Some(amount) => {
            trace.push(override_step(
                trace.next_step_number(),
                "gratuity",
                "Gratuity",
                GRATUITY_STATUTE,
                amount,
            ));
            amount
        }
        None => {
            if !gratuity_result.eligible {
                trace.warn(AuditWarning::new(
                    "GRATUITY_NOT_ELIGIBLE",
                    format!(
                        "{} completed years of service; gratuity requires {}",
                        gratuity_result.completed_years, settlement_config.gratuity.minimum_years
                    ),
                    "low",
                ));
            }
            let amount = gratuity_result.amount;
            trace.push(gratuity_result.audit_step);
            amount
        }
    };

    // Notice period recovery
    let (notice_shortfall_days, computed_notice_recovery) = calculate_notice_recovery(
        daily,
        input.notice_period_days,
        input.notice_period_served,
    )?;
    let notice_period_recovery = match input.notice_period_recovery {
        Some(amount) => {
            trace.push(override_step(
                trace.next_step_number(),
                "notice_period_recovery",
                "Notice Period Recovery",
                "Employment contract: notice clause",
                amount,
            ));
            amount
        }
        None => {
            if notice_shortfall_days > 0 {
                trace.warn(AuditWarning::new(
                    "NOTICE_SHORTFALL",
                    format!(
                        "{} of {} notice days not served",
                        notice_shortfall_days, input.notice_period_days
                    ),
                    "medium",
                ));
            }
            trace.push(AuditStep {
                step_number: trace.next_step_number(),
                rule_id: "notice_period_recovery".to_string(),
                rule_name: "Notice Period Recovery".to_string(),
                statute_ref: "Employment contract: notice clause".to_string(),
                input: serde_json::json!({
                    "notice_period_days": input.notice_period_days,
                    "notice_period_served": input.notice_period_served
                }),
                output: serde_json::json!({
                    "shortfall_days": notice_shortfall_days,
                    "amount": computed_notice_recovery.to_string(),
                    "source": "computed"
                }),
                reasoning: format!(
                    "{} notice days not served at the daily rate = {}",
                    notice_shortfall_days, computed_notice_recovery
                ),
            });
            computed_notice_recovery
        }
    };

    // Netting
    let total_dues = checked_sum(
        "total_dues",
        &[
            pending_salary,
            leave_encashment,
            input.bonus,
            input.incentive,
            gratuity,
            input.other_dues,
        ],
    )?;
    let total_recoveries = checked_sum(
        "total_recoveries",
        &[
            input.advance_recovery,
            input.loan_recovery,
            notice_period_recovery,
            input.asset_recovery,
            input.other_recoveries,
        ],
    )?;
    let gross_settlement = total_dues
        .checked_sub(total_recoveries)
        .ok_or_else(|| EngineError::out_of_range("gross_settlement"))?;

    trace.push(AuditStep {
        step_number: trace.next_step_number(),
        rule_id: "settlement_netting".to_string(),
        rule_name: "Settlement Netting".to_string(),
        statute_ref: "Full and final settlement".to_string(),
        input: serde_json::json!({
            "total_dues": total_dues.to_string(),
            "total_recoveries": total_recoveries.to_string()
        }),
        output: serde_json::json!({
            "gross_settlement": gross_settlement.to_string()
        }),
        reasoning: format!(
            "{} dues - {} recoveries = {}",
            total_dues, total_recoveries, gross_settlement
        ),
    });
    if gross_settlement < Decimal::ZERO {
        trace.warn(AuditWarning::new(
            "NEGATIVE_SETTLEMENT",
            format!(
                "Recoveries exceed dues; employee owes {}",
                gross_settlement.abs()
            ),
            "high",
        ));
    }

    // Settlement TDS
    let tds_rule = &settlement_config.tds;
    let tax_deduction = calculate_settlement_tds(gross_settlement, tds_rule)?;
    let net_settlement = gross_settlement
        .checked_sub(tax_deduction)
        .ok_or_else(|| EngineError::out_of_range("net_settlement"))?;
    trace.push(AuditStep {
        step_number: trace.next_step_number(),
        rule_id: "settlement_tds".to_string(),
        rule_name: "Settlement TDS".to_string(),
        statute_ref: "Income-tax Act 1961, s.192".to_string(),
        input: serde_json::json!({
            "gross_settlement": gross_settlement.to_string(),
            "threshold": tds_rule.threshold.normalize().to_string(),
            "rate": tds_rule.rate.normalize().to_string()
        }),
        output: serde_json::json!({
            "tax_deduction": tax_deduction.to_string(),
            "net_settlement": net_settlement.to_string()
        }),
        reasoning: if tax_deduction > Decimal::ZERO {
            format!(
                "{} exceeds {}; flat {} TDS = {}",
                gross_settlement,
                tds_rule.threshold.normalize(),
                tds_rule.rate.normalize(),
                tax_deduction
            )
        } else {
            format!(
                "{} does not exceed {}; no TDS",
                gross_settlement,
                tds_rule.threshold.normalize()
            )
        },
    });

    debug!(
        employee_id = %input.employee_id,
        total_dues = %total_dues,
        total_recoveries = %total_recoveries,
        net_settlement = %net_settlement,
        "Calculated settlement"
    );

    Ok(SettlementResult {
        financial_year: get_financial_year(input.last_working_day),
        years_of_service,
        pending_salary,
        leave_encashment,
        bonus: input.bonus,
        incentive: input.incentive,
        gratuity,
        other_dues: input.other_dues,
        total_dues,
        advance_recovery: input.advance_recovery,
        loan_recovery: input.loan_recovery,
        notice_shortfall_days,
        notice_period_recovery,
        asset_recovery: input.asset_recovery,
        other_recoveries: input.other_recoveries,
        total_recoveries,
        gross_settlement,
        tax_deduction,
        net_settlement,
        audit_trace: trace,
    })
}

/// Calculates a settlement without persisting it.
pub fn preview_settlement(
    input: &SettlementInput,
    config: &TaxConfig,
) -> EngineResult<SettlementResult> {
    calculate_settlement(input, config)
}

/// Calculates a settlement and stores it as a draft record.
///
/// The figures are exactly those [`preview_settlement`] returns for the
/// same input. Settlement numbers run per financial year:
/// `FNF/<financial year>/<sequence>`.
pub fn create_settlement<R: SettlementRepository>(
    input: &SettlementInput,
    created_on: NaiveDate,
    config: &TaxConfig,
    repository: &mut R,
) -> EngineResult<SettlementRecord> {
    let result = calculate_settlement(input, config)?;

    let sequence = repository.count_for_financial_year(&result.financial_year)? + 1;
    let record = SettlementRecord {
        id: Uuid::new_v4(),
        settlement_number: format!("FNF/{}/{:04}", result.financial_year, sequence),
        employee_id: input.employee_id.clone(),
        created_on,
        status: SettlementStatus::Draft,
        result,
    };

    repository.insert(record.clone())?;

    info!(
        settlement_id = %record.id,
        settlement_number = %record.settlement_number,
        employee_id = %record.employee_id,
        net_settlement = %record.result.net_settlement,
        "Created settlement"
    );

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemorySettlementRepository;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn create_test_input() -> SettlementInput {
        let mut input = SettlementInput::new(
            "emp_001",
            dec("60000"),
            dec("30000"),
            date(2017, 4, 1),
            date(2024, 6, 15),
            date(2024, 6, 15),
        );
        input.notice_period_days = 60;
        input.notice_period_served = 45;
        input.earned_leave_balance = dec("12.5");
        input.bonus = dec("10000");
        input.advance_recovery = dec("5000");
        input
    }

    // ==========================================================================
    // Components
    // ==========================================================================

    #[test]
    fn test_daily_salary_uses_fixed_divisor() {
        let config = TaxConfig::fy2024_25();
        assert_eq!(
            daily_salary(dec("60000"), config.settlement()).unwrap(),
            dec("2000")
        );
    }

    #[test]
    fn test_daily_salary_rejects_zero_divisor() {
        let mut settlement = TaxConfig::fy2024_25().settlement().clone();
        settlement.daily_salary_divisor = Decimal::ZERO;

        assert!(matches!(
            daily_salary(dec("60000"), &settlement),
            Err(EngineError::CalculationError { .. })
        ));
    }

    #[test]
    fn test_pending_salary_counts_from_first_of_month() {
        let pending = calculate_pending_salary(dec("2000"), date(2024, 6, 15)).unwrap();
        assert_eq!(pending, dec("30000"));

        let pending = calculate_pending_salary(dec("2000"), date(2024, 6, 1)).unwrap();
        assert_eq!(pending, dec("2000"));
    }

    #[test]
    fn test_pending_salary_rounds_fractional_daily_rate() {
        let daily = dec("50000") / dec("30");
        let pending = calculate_pending_salary(daily, date(2024, 6, 10)).unwrap();
        assert_eq!(pending, dec("16667"));
    }

    #[test]
    fn test_leave_encashment_fractional_balance() {
        let encashment = calculate_leave_encashment(dec("2000"), dec("12.5")).unwrap();
        assert_eq!(encashment, dec("25000"));
    }

    #[test]
    fn test_notice_recovery_shortfall() {
        let recovery = calculate_notice_recovery(dec("2000"), 60, 45).unwrap();
        assert_eq!(recovery, (15, dec("30000")));
    }

    #[test]
    fn test_notice_recovery_overserved_is_zero() {
        let recovery = calculate_notice_recovery(dec("2000"), 30, 45).unwrap();
        assert_eq!(recovery, (0, Decimal::ZERO));
    }

    #[test]
    fn test_settlement_tds_threshold_is_exclusive() {
        let config = TaxConfig::fy2024_25();
        let rule = &config.settlement().tds;

        let tds = |gross| calculate_settlement_tds(dec(gross), rule).unwrap();

        assert_eq!(tds("50000"), Decimal::ZERO);
        assert_eq!(tds("50001"), dec("5000"));
        assert_eq!(tds("-20000"), Decimal::ZERO);
    }

    #[test]
    fn test_component_overflow_is_reported() {
        let daily = Decimal::MAX / dec("30");

        match calculate_leave_encashment(daily, dec("365")) {
            Err(EngineError::AmountOutOfRange { quantity }) => {
                assert_eq!(quantity, "leave_encashment");
            }
            other => panic!("Expected AmountOutOfRange, got {:?}", other),
        }
        assert!(calculate_pending_salary(daily, date(2024, 7, 31)).is_err());
        assert!(calculate_notice_recovery(daily, 90, 0).is_err());
    }

    // ==========================================================================
    // Full settlement
    // ==========================================================================

    #[test]
    fn test_full_settlement_computed_components() {
        let result = calculate_settlement(&create_test_input(), &TaxConfig::fy2024_25()).unwrap();

        assert_eq!(result.financial_year, "2024-25");
        assert_eq!(result.years_of_service, dec("7.21"));
        assert_eq!(result.pending_salary, dec("30000"));
        assert_eq!(result.leave_encashment, dec("25000"));
        assert_eq!(result.gratuity, dec("121154"));
        assert_eq!(result.total_dues, dec("186154"));
        assert_eq!(result.notice_shortfall_days, 15);
        assert_eq!(result.notice_period_recovery, dec("30000"));
        assert_eq!(result.total_recoveries, dec("35000"));
        assert_eq!(result.gross_settlement, dec("151154"));
        assert_eq!(result.tax_deduction, dec("15115"));
        assert_eq!(result.net_settlement, dec("136039"));
    }

    #[test]
    fn test_audit_trace_order() {
        let result = calculate_settlement(&create_test_input(), &TaxConfig::fy2024_25()).unwrap();
        let rule_ids: Vec<&str> = result
            .audit_trace
            .steps
            .iter()
            .map(|s| s.rule_id.as_str())
            .collect();

        assert_eq!(
            rule_ids,
            vec![
                "daily_salary",
                "pending_salary",
                "leave_encashment",
                "gratuity",
                "notice_period_recovery",
                "settlement_netting",
                "settlement_tds"
            ]
        );
        for (index, step) in result.audit_trace.steps.iter().enumerate() {
            assert_eq!(step.step_number, index as u32 + 1);
        }
        assert!(result.audit_trace.has_warning("NOTICE_SHORTFALL"));
    }

    /// Concrete scenario: recoveries exceed dues.
    #[test]
    fn test_negative_settlement_not_clamped() {
        let mut input = SettlementInput::new(
            "emp_002",
            dec("60000"),
            dec("30000"),
            date(2022, 1, 1),
            date(2024, 6, 15),
            date(2024, 6, 15),
        );
        input.pending_salary_amount = Some(dec("100000"));
        input.leave_encashment_amount = Some(Decimal::ZERO);
        input.advance_recovery = dec("120000");

        let result = calculate_settlement(&input, &TaxConfig::fy2024_25()).unwrap();

        assert_eq!(result.total_dues, dec("100000"));
        assert_eq!(result.total_recoveries, dec("120000"));
        assert_eq!(result.gross_settlement, dec("-20000"));
        assert_eq!(result.tax_deduction, Decimal::ZERO);
        assert_eq!(result.net_settlement, dec("-20000"));
        assert!(result.audit_trace.has_warning("NEGATIVE_SETTLEMENT"));
    }

    #[test]
    fn test_zero_override_takes_precedence() {
        let mut input = create_test_input();
        input.gratuity_amount = Some(Decimal::ZERO);
        input.notice_period_recovery = Some(Decimal::ZERO);

        let result = calculate_settlement(&input, &TaxConfig::fy2024_25()).unwrap();

        assert_eq!(result.gratuity, Decimal::ZERO);
        assert_eq!(result.notice_period_recovery, Decimal::ZERO);
        // Shortfall is still reported even when the recovery is waived.
        assert_eq!(result.notice_shortfall_days, 15);
        assert!(!result.audit_trace.has_warning("NOTICE_SHORTFALL"));
        let gratuity_step = result
            .audit_trace
            .steps
            .iter()
            .find(|s| s.rule_id == "gratuity")
            .unwrap();
        assert_eq!(gratuity_step.output["source"].as_str().unwrap(), "override");
    }

    #[test]
    fn test_ineligible_gratuity_warns() {
        let mut input = create_test_input();
        input.date_of_joining = date(2021, 1, 1);

        let result = calculate_settlement(&input, &TaxConfig::fy2024_25()).unwrap();

        assert_eq!(result.gratuity, Decimal::ZERO);
        assert!(result.audit_trace.has_warning("GRATUITY_NOT_ELIGIBLE"));
    }

    #[test]
    fn test_inconsistent_dates_warn_but_calculate() {
        let mut input = create_test_input();
        input.last_working_day = date(2024, 6, 20);

        let result = calculate_settlement(&input, &TaxConfig::fy2024_25()).unwrap();
        let trace = &result.audit_trace;

        assert!(trace.has_warning("LAST_WORKING_DAY_AFTER_LEAVING"));
        assert_eq!(result.pending_salary, dec("40000"));
    }

    #[test]
    fn test_leaving_before_joining_warns() {
        let mut input = create_test_input();
        input.date_of_leaving = date(2017, 3, 1);
        input.last_working_day = date(2017, 3, 1);

        let result = calculate_settlement(&input, &TaxConfig::fy2024_25()).unwrap();

        assert!(result.audit_trace.has_warning("LEAVING_BEFORE_JOINING"));
        assert_eq!(result.gratuity, Decimal::ZERO);
        assert!(result.years_of_service < Decimal::ZERO);
    }

    #[test]
    fn test_consistent_dates_raise_no_date_warnings() {
        let result = calculate_settlement(&create_test_input(), &TaxConfig::fy2024_25()).unwrap();

        let trace = &result.audit_trace;

        assert!(!trace.has_warning("LEAVING_BEFORE_JOINING"));
        assert!(!trace.has_warning("LAST_WORKING_DAY_BEFORE_JOINING"));
        assert!(!trace.has_warning("LAST_WORKING_DAY_AFTER_LEAVING"));
    }

    #[test]
    fn test_largest_salary_settles_with_capped_gratuity() {
        let mut input = create_test_input();
        input.gross_monthly_salary = Decimal::MAX;
        input.basic_salary = Decimal::MAX;

        let result = calculate_settlement(&input, &TaxConfig::fy2024_25()).unwrap();

        assert_eq!(result.gratuity, dec("2000000"));
        assert!(result.net_settlement > Decimal::ZERO);
    }

    #[test]
    fn test_dues_past_decimal_range_are_reported() {
        let mut input = create_test_input();
        input.gross_monthly_salary = Decimal::MAX;
        input.earned_leave_balance = dec("20");

        match calculate_settlement(&input, &TaxConfig::fy2024_25()) {
            Err(EngineError::AmountOutOfRange { quantity }) => assert_eq!(quantity, "total_dues"),
            other => panic!("Expected AmountOutOfRange, got {:?}", other.map(|_| ())),
        }
    }

    // ==========================================================================
    // Preview and create
    // ==========================================================================

    #[test]
    fn test_preview_matches_create() {
        let config = TaxConfig::fy2024_25();
        let input = create_test_input();
        let mut repository = InMemorySettlementRepository::default();

        let preview = preview_settlement(&input, &config).unwrap();
        let record =
            create_settlement(&input, date(2024, 6, 20), &config, &mut repository).unwrap();

        assert_eq!(preview, record.result);
    }

    #[test]
    fn test_create_persists_draft_with_sequence() {
        let config = TaxConfig::fy2024_25();
        let input = create_test_input();
        let mut repository = InMemorySettlementRepository::default();

        let first = create_settlement(&input, date(2024, 6, 20), &config, &mut repository).unwrap();
        let second =
            create_settlement(&input, date(2024, 6, 21), &config, &mut repository).unwrap();

        assert_eq!(first.settlement_number, "FNF/2024-25/0001");
        assert_eq!(second.settlement_number, "FNF/2024-25/0002");
        assert_eq!(first.status, SettlementStatus::Draft);
        assert_eq!(first.created_on, date(2024, 6, 20));
        assert_ne!(first.id, second.id);

        let stored = repository.get(first.id).unwrap();
        assert_eq!(stored, first);
    }
}
