//! Configuration loading and management for the Payroll Engine.
//!
//! This module loads the statutory tables (tax slabs, surcharge bands,
//! deduction caps, PF/ESIC rates, professional tax schedules, gratuity and
//! settlement rules) from YAML files, or provides the built-in FY2024-25
//! tables.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load("./config/fy2024-25").unwrap();
//! println!("Loaded rules for FY {}", loader.metadata().code);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    DEFAULT_PROFESSIONAL_TAX_STATE, DeductionCaps, FinancialYearMetadata, GratuityConfig,
    IncomeTaxConfig, ProfessionalTaxSlab, Rebate87A, RegimeConfig, SettlementConfig,
    SettlementTdsRule, StatutoryConfig, SurchargeBand, TaxConfig, TaxSlab,
};
