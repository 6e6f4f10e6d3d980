//! Calculation logic for the Payroll Engine.
//!
//! This module contains the slab tax calculator for both regimes, HRA
//! exemption, the statutory deductions (PF, ESIC, professional tax),
//! financial-year helpers, the monthly TDS projector, gratuity, the
//! full-and-final settlement calculator and salary slips.

mod financial_year;
mod gratuity;
mod hra;
mod monthly_tds;
mod rounding;
mod salary_slip;
mod settlement;
mod slab_tax;
mod statutory;

pub use financial_year::{
    financial_year_bounds, get_financial_year, get_financial_year_month, parse_date,
};
pub use gratuity::{
    GRATUITY_STATUTE, GratuityResult, calculate_gratuity, completed_years_of_service,
};
pub use hra::calculate_hra_exemption;
pub use monthly_tds::{
    MONTHS_IN_FINANCIAL_YEAR, MonthlyTdsProjection, calculate_monthly_tds, project_monthly_tds,
};
pub use rounding::round_rupee;
pub use salary_slip::calculate_salary_slip;
pub use settlement::{
    calculate_leave_encashment, calculate_notice_recovery, calculate_pending_salary,
    calculate_settlement, calculate_settlement_tds, create_settlement, daily_salary,
    preview_settlement,
};
pub use slab_tax::{
    calculate_slab_tax, calculate_tax, calculate_tax_new_regime, calculate_tax_old_regime,
    compare_regimes, surcharge_rate,
};
pub use statutory::{calculate_esic, calculate_professional_tax, calculate_provident_fund};
