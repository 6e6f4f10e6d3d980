//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading statutory
//! payroll tables from YAML files.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{EngineError, EngineResult};

use super::types::{
    FinancialYearMetadata, IncomeTaxConfig, ProfessionalTaxSlab, SettlementConfig,
    StatutoryConfig, TaxConfig,
};

/// Loads and provides access to statutory payroll configuration.
///
/// # Directory Structure
///
/// ```text
/// config/fy2024-25/
/// ├── financial_year.yaml  # Metadata for the rule set
/// ├── income_tax.yaml      # Regimes, surcharge, cess and deduction caps
/// ├── statutory.yaml       # PF, ESIC and professional tax tables
/// └── settlement.yaml      # Daily divisor, gratuity and settlement TDS
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/fy2024-25").unwrap();
/// println!("Loaded rules: {}", loader.metadata().name);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: TaxConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing (`ConfigNotFound`)
    /// - Any file contains invalid YAML or misses a field (`ConfigParseError`)
    /// - A rate is outside `[0, 1]` or a divisor is not positive (`ConfigParseError`)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let metadata = Self::load_yaml::<FinancialYearMetadata>(&path.join("financial_year.yaml"))?;
        let income_tax = Self::load_yaml::<IncomeTaxConfig>(&path.join("income_tax.yaml"))?;
        let statutory = Self::load_yaml::<StatutoryConfig>(&path.join("statutory.yaml"))?;
        let settlement = Self::load_yaml::<SettlementConfig>(&path.join("settlement.yaml"))?;

        Self::check(&path.join("income_tax.yaml"), income_tax.validate())?;
        Self::check(&path.join("statutory.yaml"), statutory.validate())?;
        Self::check(&path.join("settlement.yaml"), settlement.validate())?;

        info!(
            financial_year = %metadata.code,
            path = %path.display(),
            "Loaded statutory configuration"
        );

        Ok(Self {
            config: TaxConfig::new(metadata, income_tax, statutory, settlement),
        })
    }

    /// Wraps the built-in FY2024-25 tables.
    pub fn builtin() -> Self {
        Self {
            config: TaxConfig::fy2024_25(),
        }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Tags a table validation failure with the file it came from.
    fn check(path: &Path, result: Result<(), String>) -> EngineResult<()> {
        result.map_err(|message| EngineError::ConfigParseError {
            path: path.display().to_string(),
            message,
        })
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &TaxConfig {
        &self.config
    }

    /// Returns the financial-year metadata.
    pub fn metadata(&self) -> &FinancialYearMetadata {
        self.config.metadata()
    }

    /// Gets the professional tax table for a state.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use payroll_engine::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config/fy2024-25")?;
    /// let slabs = loader.get_professional_tax_slabs("KA")?;
    /// println!("Karnataka has {} slabs", slabs.len());
    /// # Ok::<(), payroll_engine::error::EngineError>(())
    /// ```
    pub fn get_professional_tax_slabs(&self, state: &str) -> EngineResult<&[ProfessionalTaxSlab]> {
        self.config.professional_tax_slabs(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaxRegime;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn config_path() -> &'static str {
        "./config/fy2024-25"
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.metadata().code, "2024-25");
    }

    #[test]
    fn test_loaded_slabs_match_builtin() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let builtin = TaxConfig::fy2024_25();

        for regime in [TaxRegime::Old, TaxRegime::New] {
            assert_eq!(
                loader.config().regime(regime).slabs,
                builtin.regime(regime).slabs,
                "slabs differ for {} regime",
                regime
            );
        }
        assert_eq!(
            loader.config().income_tax().surcharge,
            builtin.income_tax().surcharge
        );
    }

    #[test]
    fn test_loaded_statutory_rates() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let statutory = loader.config().statutory();

        assert_eq!(statutory.provident_fund_rate, dec("0.12"));
        assert_eq!(statutory.esic_rate, dec("0.0075"));
        assert_eq!(statutory.esic_wage_ceiling, dec("21000"));
    }

    #[test]
    fn test_loaded_settlement_rules() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let settlement = loader.config().settlement();

        assert_eq!(settlement.daily_salary_divisor, dec("30"));
        assert_eq!(settlement.gratuity.minimum_years, 5);
        assert_eq!(settlement.gratuity.days_per_year, dec("365.25"));
        assert_eq!(settlement.gratuity.cap, dec("2000000"));
        assert_eq!(settlement.tds.threshold, dec("50000"));
        assert_eq!(settlement.tds.rate, dec("0.10"));
    }

    #[test]
    fn test_get_professional_tax_slabs_for_state() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        let default = loader.get_professional_tax_slabs("default").unwrap();
        assert_eq!(default.len(), 3);
        assert_eq!(default[1].amount, dec("175"));

        let karnataka = loader.get_professional_tax_slabs("KA").unwrap();
        assert_eq!(karnataka.last().unwrap().amount, dec("200"));
    }

    #[test]
    fn test_get_professional_tax_slabs_unknown_state_returns_error() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        match loader.get_professional_tax_slabs("ZZ") {
            Err(EngineError::StateNotFound { state }) => assert_eq!(state, "ZZ"),
            _ => panic!("Expected StateNotFound error"),
        }
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path");

        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("financial_year.yaml"));
            }
            _ => panic!("Expected ConfigNotFound error"),
        }
    }

    /// Copies the shipped tables into a scratch directory, replacing
    /// settlement.yaml with `settlement`.
    fn config_dir_with_settlement(settlement: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("payroll-config-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        for file in ["financial_year.yaml", "income_tax.yaml", "statutory.yaml"] {
            fs::copy(Path::new(config_path()).join(file), dir.join(file)).unwrap();
        }
        fs::write(dir.join("settlement.yaml"), settlement).unwrap();
        dir
    }

    #[test]
    fn test_load_rejects_zero_gratuity_divisor() {
        let shipped = fs::read_to_string(Path::new(config_path()).join("settlement.yaml")).unwrap();
        let dir = config_dir_with_settlement(
            &shipped.replace("working_days_per_month: 26", "working_days_per_month: 0"),
        );

        let result = ConfigLoader::load(&dir);
        fs::remove_dir_all(&dir).unwrap();

        match result {
            Err(EngineError::ConfigParseError { path, message }) => {
                assert!(path.ends_with("settlement.yaml"));
                assert!(message.contains("working_days_per_month"));
            }
            other => panic!("Expected ConfigParseError, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_load_rejects_negative_daily_divisor() {
        let shipped = fs::read_to_string(Path::new(config_path()).join("settlement.yaml")).unwrap();
        let dir = config_dir_with_settlement(
            &shipped.replace("daily_salary_divisor: 30", "daily_salary_divisor: -30"),
        );

        let result = ConfigLoader::load(&dir);
        fs::remove_dir_all(&dir).unwrap();

        assert!(matches!(result, Err(EngineError::ConfigParseError { .. })));
    }

    #[test]
    fn test_builtin_uses_fy2024_25() {
        let loader = ConfigLoader::builtin();
        assert_eq!(loader.metadata().code, "2024-25");
    }
}
