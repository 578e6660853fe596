use crate::core::params::{
    SolverParams, DEFAULT_EARLY_TERMINATION_THRESHOLD, DEFAULT_LOCAL_SEARCH_PASSES,
    DEFAULT_MAX_ITERATIONS, DEFAULT_PREFERENCE_WEIGHT_BASE, DEFAULT_TOLERANCE,
};
use crate::error::MatchError;
use crate::models::AlgorithmKind;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub solver: SolverSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
    #[serde(default = "default_max_payload_bytes")]
    pub max_payload_bytes: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
            max_payload_bytes: default_max_payload_bytes(),
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }
fn default_max_payload_bytes() -> usize { 2 * 1024 * 1024 }

/// Solver tunables; see `SolverParams` for their meaning
#[derive(Debug, Clone, Deserialize)]
pub struct SolverSettings {
    #[serde(default)]
    pub algorithm: AlgorithmKind,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    #[serde(default = "default_time_limit_ms")]
    pub time_limit_ms: u64,
    #[serde(default = "default_early_termination_threshold")]
    pub early_termination_threshold: f64,
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    #[serde(default = "default_local_search_passes")]
    pub local_search_passes: usize,
    #[serde(default = "default_preference_weight_base")]
    pub preference_weight_base: f64,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            algorithm: AlgorithmKind::default(),
            max_iterations: default_max_iterations(),
            time_limit_ms: default_time_limit_ms(),
            early_termination_threshold: default_early_termination_threshold(),
            tolerance: default_tolerance(),
            local_search_passes: default_local_search_passes(),
            preference_weight_base: default_preference_weight_base(),
        }
    }
}

fn default_max_iterations() -> usize { DEFAULT_MAX_ITERATIONS }
fn default_time_limit_ms() -> u64 { 30_000 }
fn default_early_termination_threshold() -> f64 { DEFAULT_EARLY_TERMINATION_THRESHOLD }
fn default_tolerance() -> f64 { DEFAULT_TOLERANCE }
fn default_local_search_passes() -> usize { DEFAULT_LOCAL_SEARCH_PASSES }
fn default_preference_weight_base() -> f64 { DEFAULT_PREFERENCE_WEIGHT_BASE }

impl SolverSettings {
    /// Convert into engine parameters, rejecting out-of-range values
    pub fn to_params(&self) -> Result<SolverParams, MatchError> {
        let params = SolverParams {
            max_iterations: self.max_iterations,
            time_limit: Duration::from_millis(self.time_limit_ms),
            early_termination_threshold: self.early_termination_threshold,
            tolerance: self.tolerance,
            local_search_passes: self.local_search_passes,
            preference_weight_base: self.preference_weight_base,
        };
        params.validate()?;
        Ok(params)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "pretty".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with SLOTMATCH__)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., SLOTMATCH__SOLVER__MAX_ITERATIONS -> solver.max_iterations
            .add_source(environment())
            .build()?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?;

        settings.try_deserialize()
    }
}

fn environment() -> Environment {
    Environment::with_prefix("SLOTMATCH")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_solver_settings() {
        let solver = SolverSettings::default();
        assert_eq!(solver.algorithm, AlgorithmKind::Exact);
        assert_eq!(solver.max_iterations, 5000);
        assert_eq!(solver.time_limit_ms, 30_000);
        assert_eq!(solver.early_termination_threshold, 0.95);
        assert_eq!(solver.local_search_passes, 50);
        assert_eq!(solver.to_params().unwrap(), SolverParams::default());
    }

    #[test]
    fn test_invalid_solver_settings() {
        let solver = SolverSettings {
            preference_weight_base: 0.5,
            ..SolverSettings::default()
        };
        assert!(matches!(
            solver.to_params(),
            Err(MatchError::InvalidParameter { name: "preference_weight_base", .. })
        ));
    }

    #[test]
    fn test_default_logging() {
        let logging = LoggingSettings::default();
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, "pretty");
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("slot-match-{}.toml", std::process::id()));
        std::fs::write(
            &path,
            "[server]\nport = 9191\n\n[solver]\nalgorithm = \"network_flow\"\nmax_iterations = 12\n",
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(settings.server.port, 9191);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.solver.algorithm, AlgorithmKind::Greedy);
        assert_eq!(settings.solver.max_iterations, 12);
        assert_eq!(settings.solver.time_limit_ms, 30_000);
        assert_eq!(settings.logging.level, "info");
    }
}
