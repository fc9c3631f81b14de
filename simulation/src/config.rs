//! Tunable odds and ranges
//!
//! Both configs ship as embedded JSON and can be overridden from a file.
//! Missing keys fall back to the builtin values.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

pub const BUILTIN_SIM_CONFIG: &str = include_str!("data/sim_config.json");
pub const BUILTIN_RUNNER_CONFIG: &str = include_str!("data/runner_config.json");

static BUILTIN_SIM: Lazy<SimConfig> = Lazy::new(|| {
    SimConfig::from_json_str(BUILTIN_SIM_CONFIG).unwrap_or_else(|err| {
        warn!(%err, "builtin sim config rejected, using defaults");
        SimConfig::default()
    })
});

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read config from {path:?}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// Engine
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub lightning_min_age: u32,
    /// A strike happens with probability `1 / lightning_odds`.
    pub lightning_odds: u32,
    /// A bad strike kills with probability `1 / lightning_fatal_odds`.
    pub lightning_fatal_odds: u32,
    pub vaccination_percent: u32,
    pub jackpot_min: f64,
    pub jackpot_max: f64,
    pub university_years: u32,
    pub student_loan_min: i64,
    pub student_loan_max: i64,
    pub loan_payment_min: i64,
    pub loan_payment_max: i64,
    /// Share of after-tax income kept once living expenses are paid.
    pub expense_ratio_min: f64,
    pub expense_ratio_max: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            lightning_min_age: 5,
            lightning_odds: 5000,
            lightning_fatal_odds: 5,
            vaccination_percent: 50,
            jackpot_min: 100_000.0,
            jackpot_max: 1_000_000.0,
            university_years: 4,
            student_loan_min: 20_000,
            student_loan_max: 40_000,
            loan_payment_min: 1_000,
            loan_payment_max: 3_000,
            expense_ratio_min: 0.4,
            expense_ratio_max: 0.8,
        }
    }
}

impl SimConfig {
    pub fn builtin() -> &'static SimConfig {
        &BUILTIN_SIM
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    /// Every range the engine samples from must be non-empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lightning_odds == 0 || self.lightning_fatal_odds == 0 {
            return Err(ConfigError::Invalid("lightning odds must be at least 1".into()));
        }
        if self.vaccination_percent > 100 {
            return Err(ConfigError::Invalid("vaccination_percent above 100".into()));
        }
        if self.university_years == 0 {
            return Err(ConfigError::Invalid("university_years must be at least 1".into()));
        }
        check_range("jackpot", self.jackpot_min, self.jackpot_max)?;
        check_range("student_loan", self.student_loan_min, self.student_loan_max)?;
        check_range("loan_payment", self.loan_payment_min, self.loan_payment_max)?;
        check_range("expense_ratio", self.expense_ratio_min, self.expense_ratio_max)?;
        if self.student_loan_min < 0 || self.loan_payment_min <= 0 {
            return Err(ConfigError::Invalid("loan amounts must be positive".into()));
        }
        Ok(())
    }
}

// ============================================================================
// Runner
// ============================================================================

/// Settings for the headless batch runner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    pub lives: usize,
    pub base_seed: u64,
    /// Safety cap; lives still running at this age are cut off.
    pub max_age: u32,
    pub save_dir: Option<PathBuf>,
    pub job_offer_percent: u32,
    pub salary_min: i64,
    pub salary_max: i64,
    pub working_age: u32,
    pub retirement_age: u32,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            lives: 1_000,
            base_seed: 42,
            max_age: 130,
            save_dir: None,
            job_offer_percent: 30,
            salary_min: 25_000,
            salary_max: 90_000,
            working_age: 18,
            retirement_age: 65,
        }
    }
}

impl RunnerConfig {
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_json_str(BUILTIN_RUNNER_CONFIG)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        if config.job_offer_percent > 100 {
            return Err(ConfigError::Invalid("job_offer_percent above 100".into()));
        }
        check_range("salary", config.salary_min, config.salary_max)?;
        check_range("working_age", config.working_age, config.retirement_age)?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }
}

fn check_range<T: PartialOrd>(name: &str, min: T, max: T) -> Result<(), ConfigError> {
    if min > max {
        return Err(ConfigError::Invalid(format!("{name}: min exceeds max")));
    }
    Ok(())
}
