//! Configuration types for statutory payroll rules.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files, and the built-in
//! FY2024-25 tables used when no configuration directory is supplied.

use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;

use crate::error::{EngineError, EngineResult};
use crate::models::TaxRegime;

/// Key of the professional tax table used when no state is specified.
pub const DEFAULT_PROFESSIONAL_TAX_STATE: &str = "default";

/// Metadata about the financial year the tables apply to.
#[derive(Debug, Clone, Deserialize)]
pub struct FinancialYearMetadata {
    /// The financial year code (e.g., "2024-25").
    pub code: String,
    /// A human-readable name for the rule set.
    pub name: String,
    /// The version or effective date of the tables.
    pub version: String,
    /// URL to the official source.
    pub source_url: String,
}

/// One income-tax slab.
///
/// Income in `[min, max)` is taxed at `rate`. The top slab has no `max`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TaxSlab {
    /// Lower bound of the slab.
    pub min: Decimal,
    /// Upper bound of the slab, or `None` for the top slab.
    #[serde(default)]
    pub max: Option<Decimal>,
    /// Rate applied to income within the slab (e.g. 0.05).
    pub rate: Decimal,
}

/// Section 87A rebate parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct Rebate87A {
    /// Taxable income at or below which the rebate applies.
    pub income_limit: Decimal,
    /// Maximum rebate.
    pub max_rebate: Decimal,
}

/// Slabs and reliefs for one regime.
#[derive(Debug, Clone, Deserialize)]
pub struct RegimeConfig {
    /// Flat standard deduction on salary income.
    pub standard_deduction: Decimal,
    /// Section 87A rebate.
    pub rebate_87a: Rebate87A,
    /// Tax slabs (sorted ascending by `min` once loaded).
    pub slabs: Vec<TaxSlab>,
}

/// One surcharge band, keyed on taxable income.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SurchargeBand {
    /// Taxable income up to which this rate applies, or `None` for the top band.
    #[serde(default)]
    pub up_to: Option<Decimal>,
    /// Surcharge rate on tax.
    pub rate: Decimal,
}

/// Caps on old-regime deductions.
#[derive(Debug, Clone, Deserialize)]
pub struct DeductionCaps {
    /// Section 80C cap.
    pub section_80c: Decimal,
    /// Section 80D cap.
    pub section_80d: Decimal,
    /// Section 80CCD(1B) cap.
    pub section_80ccd_1b: Decimal,
    /// Home-loan interest cap.
    pub home_loan_interest: Decimal,
}

/// Income-tax configuration from income_tax.yaml.
#[derive(Debug, Clone, Deserialize)]
pub struct IncomeTaxConfig {
    /// Old regime slabs and reliefs.
    pub old_regime: RegimeConfig,
    /// New regime slabs and reliefs.
    pub new_regime: RegimeConfig,
    /// Surcharge bands.
    pub surcharge: Vec<SurchargeBand>,
    /// Health and education cess rate.
    pub cess_rate: Decimal,
    /// Old-regime deduction caps.
    pub deduction_caps: DeductionCaps,
}

/// One professional tax slab, keyed on monthly gross.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProfessionalTaxSlab {
    /// Monthly gross up to which this amount applies, or `None` for the top slab.
    #[serde(default)]
    pub up_to: Option<Decimal>,
    /// Monthly professional tax.
    pub amount: Decimal,
}

/// Statutory deduction configuration from statutory.yaml.
#[derive(Debug, Clone, Deserialize)]
pub struct StatutoryConfig {
    /// Employee PF contribution rate on basic.
    pub provident_fund_rate: Decimal,
    /// Employee ESIC contribution rate on gross.
    pub esic_rate: Decimal,
    /// Monthly gross above which ESIC does not apply.
    pub esic_wage_ceiling: Decimal,
    /// Professional tax tables keyed by state code.
    pub professional_tax: HashMap<String, Vec<ProfessionalTaxSlab>>,
}

/// Gratuity rules.
#[derive(Debug, Clone, Deserialize)]
pub struct GratuityConfig {
    /// Completed years of service required for eligibility.
    pub minimum_years: u32,
    /// Days per year used to express service length.
    pub days_per_year: Decimal,
    /// Days of wages paid per completed year.
    pub wage_days_per_year: Decimal,
    /// Working days per month in the gratuity formula.
    pub working_days_per_month: Decimal,
    /// Statutory ceiling.
    pub cap: Decimal,
}

/// Flat TDS applied to a settlement.
#[derive(Debug, Clone, Deserialize)]
pub struct SettlementTdsRule {
    /// Gross settlement above which TDS applies.
    pub threshold: Decimal,
    /// Flat rate on the gross settlement.
    pub rate: Decimal,
}

/// Settlement configuration from settlement.yaml.
#[derive(Debug, Clone, Deserialize)]
pub struct SettlementConfig {
    /// Fixed divisor converting monthly gross to a daily rate.
    pub daily_salary_divisor: Decimal,
    /// Gratuity rules.
    pub gratuity: GratuityConfig,
    /// Settlement TDS rule.
    pub tds: SettlementTdsRule,
}

fn ensure_positive(name: &str, value: Decimal) -> Result<(), String> {
    if value > Decimal::ZERO {
        Ok(())
    } else {
        Err(format!("{} must be positive, got {}", name, value))
    }
}

fn ensure_fraction(name: &str, value: Decimal) -> Result<(), String> {
    if (Decimal::ZERO..=Decimal::ONE).contains(&value) {
        Ok(())
    } else {
        Err(format!("{} must be between 0 and 1, got {}", name, value))
    }
}

impl IncomeTaxConfig {
    /// Checks that slab bounds are non-negative and every rate is a fraction.
    pub fn validate(&self) -> Result<(), String> {
        for (regime, config) in [
            ("old_regime", &self.old_regime),
            ("new_regime", &self.new_regime),
        ] {
            for slab in &config.slabs {
                if slab.min < Decimal::ZERO {
                    return Err(format!("{} slab starts below zero: {}", regime, slab.min));
                }
                ensure_fraction(&format!("{} slab rate", regime), slab.rate)?;
            }
        }
        for band in &self.surcharge {
            ensure_fraction("surcharge rate", band.rate)?;
        }
        ensure_fraction("cess_rate", self.cess_rate)
    }
}

impl StatutoryConfig {
    /// Checks the contribution rates and that at least one professional tax
    /// table is present.
    pub fn validate(&self) -> Result<(), String> {
        ensure_fraction("provident_fund_rate", self.provident_fund_rate)?;
        ensure_fraction("esic_rate", self.esic_rate)?;
        if self.professional_tax.is_empty() {
            return Err("no professional tax tables configured".to_string());
        }
        Ok(())
    }
}

impl SettlementConfig {
    /// Checks that every divisor is positive and the TDS rate is a fraction.
    pub fn validate(&self) -> Result<(), String> {
        ensure_positive("daily_salary_divisor", self.daily_salary_divisor)?;
        ensure_positive("gratuity.days_per_year", self.gratuity.days_per_year)?;
        ensure_positive(
            "gratuity.working_days_per_month",
            self.gratuity.working_days_per_month,
        )?;
        ensure_fraction("tds.rate", self.tds.rate)
    }
}

/// The complete statutory configuration.
///
/// Aggregates every table the calculations need. Slabs and bands are kept
/// sorted ascending so the calculators can walk them in order.
#[derive(Debug, Clone)]
pub struct TaxConfig {
    metadata: FinancialYearMetadata,
    income_tax: IncomeTaxConfig,
    statutory: StatutoryConfig,
    settlement: SettlementConfig,
}

impl TaxConfig {
    /// Creates a new TaxConfig from its component parts.
    pub fn new(
        metadata: FinancialYearMetadata,
        income_tax: IncomeTaxConfig,
        statutory: StatutoryConfig,
        settlement: SettlementConfig,
    ) -> Self {
        let mut income_tax = income_tax;
        income_tax.old_regime.slabs.sort_by(|a, b| a.min.cmp(&b.min));
        income_tax.new_regime.slabs.sort_by(|a, b| a.min.cmp(&b.min));
        income_tax
            .surcharge
            .sort_by_key(|band| (band.up_to.is_none(), band.up_to));

        let mut statutory = statutory;
        for slabs in statutory.professional_tax.values_mut() {
            slabs.sort_by_key(|slab| (slab.up_to.is_none(), slab.up_to));
        }

        Self {
            metadata,
            income_tax,
            statutory,
            settlement,
        }
    }

    /// Returns the built-in FY2024-25 tables.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::config::TaxConfig;
    /// use payroll_engine::models::TaxRegime;
    ///
    /// let config = TaxConfig::fy2024_25();
    /// assert_eq!(config.metadata().code, "2024-25");
    /// assert_eq!(config.regime(TaxRegime::New).slabs.len(), 6);
    /// ```
    pub fn fy2024_25() -> Self {
        let metadata = FinancialYearMetadata {
            code: "2024-25".to_string(),
            name: "Income-tax, PF, ESIC and gratuity rules for FY2024-25".to_string(),
            version: "2024-04-01".to_string(),
            source_url: "https://incometaxindia.gov.in".to_string(),
        };

        let income_tax = IncomeTaxConfig {
            old_regime: RegimeConfig {
                standard_deduction: Decimal::new(50000, 0),
                rebate_87a: Rebate87A {
                    income_limit: Decimal::new(500000, 0),
                    max_rebate: Decimal::new(12500, 0),
                },
                slabs: vec![
                    slab(0, Some(250000), 0),
                    slab(250000, Some(500000), 5),
                    slab(500000, Some(1000000), 20),
                    slab(1000000, None, 30),
                ],
            },
            new_regime: RegimeConfig {
                standard_deduction: Decimal::new(50000, 0),
                rebate_87a: Rebate87A {
                    income_limit: Decimal::new(700000, 0),
                    max_rebate: Decimal::new(25000, 0),
                },
                slabs: vec![
                    slab(0, Some(300000), 0),
                    slab(300000, Some(700000), 5),
                    slab(700000, Some(1000000), 10),
                    slab(1000000, Some(1200000), 15),
                    slab(1200000, Some(1500000), 20),
                    slab(1500000, None, 30),
                ],
            },
            surcharge: vec![
                surcharge(Some(5000000), 0),
                surcharge(Some(10000000), 10),
                surcharge(Some(20000000), 15),
                surcharge(Some(50000000), 25),
                surcharge(None, 37),
            ],
            cess_rate: Decimal::new(4, 2),
            deduction_caps: DeductionCaps {
                section_80c: Decimal::new(150000, 0),
                section_80d: Decimal::new(25000, 0),
                section_80ccd_1b: Decimal::new(50000, 0),
                home_loan_interest: Decimal::new(200000, 0),
            },
        };

        let mut professional_tax = HashMap::new();
        professional_tax.insert(
            DEFAULT_PROFESSIONAL_TAX_STATE.to_string(),
            vec![
                ProfessionalTaxSlab {
                    up_to: Some(Decimal::new(7500, 0)),
                    amount: Decimal::ZERO,
                },
                ProfessionalTaxSlab {
                    up_to: Some(Decimal::new(10000, 0)),
                    amount: Decimal::new(175, 0),
                },
                ProfessionalTaxSlab {
                    up_to: None,
                    amount: Decimal::new(200, 0),
                },
            ],
        );

        let statutory = StatutoryConfig {
            provident_fund_rate: Decimal::new(12, 2),
            esic_rate: Decimal::new(75, 4),
            esic_wage_ceiling: Decimal::new(21000, 0),
            professional_tax,
        };

        let settlement = SettlementConfig {
            daily_salary_divisor: Decimal::new(30, 0),
            gratuity: GratuityConfig {
                minimum_years: 5,
                days_per_year: Decimal::new(36525, 2),
                wage_days_per_year: Decimal::new(15, 0),
                working_days_per_month: Decimal::new(26, 0),
                cap: Decimal::new(2000000, 0),
            },
            tds: SettlementTdsRule {
                threshold: Decimal::new(50000, 0),
                rate: Decimal::new(10, 2),
            },
        };

        Self::new(metadata, income_tax, statutory, settlement)
    }

    /// Returns the financial-year metadata.
    pub fn metadata(&self) -> &FinancialYearMetadata {
        &self.metadata
    }

    /// Returns the income-tax configuration.
    pub fn income_tax(&self) -> &IncomeTaxConfig {
        &self.income_tax
    }

    /// Returns the slabs and reliefs for a regime.
    pub fn regime(&self, regime: TaxRegime) -> &RegimeConfig {
        match regime {
            TaxRegime::Old => &self.income_tax.old_regime,
            TaxRegime::New => &self.income_tax.new_regime,
        }
    }

    /// Returns the statutory deduction configuration.
    pub fn statutory(&self) -> &StatutoryConfig {
        &self.statutory
    }

    /// Returns the settlement configuration.
    pub fn settlement(&self) -> &SettlementConfig {
        &self.settlement
    }

    /// Returns the professional tax table for a state.
    ///
    /// Returns `StateNotFound` if no table is configured for `state`.
    pub fn professional_tax_slabs(&self, state: &str) -> EngineResult<&[ProfessionalTaxSlab]> {
        self.statutory
            .professional_tax
            .get(state)
            .map(Vec::as_slice)
            .ok_or_else(|| EngineError::StateNotFound {
                state: state.to_string(),
            })
    }
}

impl Default for TaxConfig {
    fn default() -> Self {
        Self::fy2024_25()
    }
}

fn slab(min: i64, max: Option<i64>, rate_percent: i64) -> TaxSlab {
    TaxSlab {
        min: Decimal::new(min, 0),
        max: max.map(|m| Decimal::new(m, 0)),
        rate: Decimal::new(rate_percent, 2),
    }
}

fn surcharge(up_to: Option<i64>, rate_percent: i64) -> SurchargeBand {
    SurchargeBand {
        up_to: up_to.map(|u| Decimal::new(u, 0)),
        rate: Decimal::new(rate_percent, 2),
    }
}
