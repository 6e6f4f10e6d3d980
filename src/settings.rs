//! Server settings read from the environment.
//!
//! Variables carry the `PAYROLL_` prefix (`PAYROLL_HOST`, `PAYROLL_PORT`,
//! `PAYROLL_CONFIG_DIR`). A `.env` file is honoured if present.

use serde::Deserialize;

use crate::config::ConfigLoader;
use crate::error::EngineResult;

/// Environment prefix for every setting.
pub const ENV_PREFIX: &str = "PAYROLL_";

/// Settings for the HTTP service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerSettings {
    /// Address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory holding the statutory YAML tables. The built-in FY2024-25
    /// tables are used when unset.
    #[serde(default)]
    pub config_dir: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl ServerSettings {
    /// Reads settings from the process environment, after loading `.env`.
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenv::dotenv().ok();
        envy::prefixed(ENV_PREFIX).from_env::<ServerSettings>()
    }

    /// Returns the `host:port` pair to bind.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Loads the statutory tables this service should run with.
    pub fn load_config(&self) -> EngineResult<ConfigLoader> {
        match &self.config_dir {
            Some(dir) => ConfigLoader::load(dir),
            None => Ok(ConfigLoader::builtin()),
        }
    }
}
