//! Configuration loading from gatelift.toml
//!
//! Defaults can be overridden in a `gatelift.toml` file, discovered by walking
//! up from the current directory. CLI flags override the file; per-request
//! form fields override both.

use crate::analysis::AnalysisConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Gatelift configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GateliftConfig {
    /// Outlier cleaning
    #[serde(default)]
    pub cleaning: CleaningSection,
    /// Bootstrap resampling
    #[serde(default)]
    pub bootstrap: BootstrapSection,
    /// Hypothesis testing
    #[serde(default)]
    pub analysis: AnalysisSection,
    /// HTTP server
    #[serde(default)]
    pub server: ServerSection,
}

/// Cleaning configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningSection {
    /// Rows with more game rounds than this are dropped as outliers
    #[serde(default = "default_rounds_cutoff")]
    pub rounds_cutoff: u32,
}

impl Default for CleaningSection {
    fn default() -> Self {
        Self {
            rounds_cutoff: default_rounds_cutoff(),
        }
    }
}

fn default_rounds_cutoff() -> u32 {
    gatelift_core::DEFAULT_ROUNDS_CUTOFF
}

/// Bootstrap configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapSection {
    /// Number of resampling iterations
    #[serde(default = "default_iterations")]
    pub iterations: usize,
    /// Confidence level for percentile intervals
    #[serde(default = "default_confidence_level")]
    pub confidence_level: f64,
}

impl Default for BootstrapSection {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            confidence_level: default_confidence_level(),
        }
    }
}

fn default_iterations() -> usize {
    gatelift_stats::DEFAULT_BOOTSTRAP_ITERATIONS
}

fn default_confidence_level() -> f64 {
    gatelift_stats::DEFAULT_CONFIDENCE_LEVEL
}

/// Hypothesis-testing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSection {
    /// Two-sided significance threshold for the rank-sum test
    #[serde(default = "default_significance_level")]
    pub significance_level: f64,
}

impl Default for AnalysisSection {
    fn default() -> Self {
        Self {
            significance_level: default_significance_level(),
        }
    }
}

fn default_significance_level() -> f64 {
    gatelift_stats::DEFAULT_SIGNIFICANCE_LEVEL
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSection {
    /// Port the dashboard listens on
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

fn default_port() -> u16 {
    3000
}

impl GateliftConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Try to discover and load configuration by walking up from the current
    /// directory
    pub fn discover() -> Option<Self> {
        let mut dir = std::env::current_dir().ok()?;
        loop {
            let config_path = dir.join("gatelift.toml");
            if config_path.exists() {
                return Self::load(&config_path).ok();
            }
            if !dir.pop() {
                break;
            }
        }
        None
    }

    /// Default per-request analysis settings derived from this configuration
    pub fn analysis_defaults(&self) -> AnalysisConfig {
        AnalysisConfig {
            rounds_cutoff: self.cleaning.rounds_cutoff,
            bootstrap_iterations: self.bootstrap.iterations,
            confidence_level: self.bootstrap.confidence_level,
            significance_level: self.analysis.significance_level,
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GateliftConfig::default();
        assert_eq!(config.cleaning.rounds_cutoff, 3000);
        assert_eq!(config.bootstrap.iterations, 1000);
        assert!((config.bootstrap.confidence_level - 0.95).abs() < f64::EPSILON);
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_parse_toml() {
        let toml_str = r#"
            [cleaning]
            rounds_cutoff = 5000

            [bootstrap]
            iterations = 2000
        "#;

        let config: GateliftConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.cleaning.rounds_cutoff, 5000);
        assert_eq!(config.bootstrap.iterations, 2000);
        // Defaults still apply to untouched sections.
        assert!((config.analysis.significance_level - 0.05).abs() < f64::EPSILON);
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_analysis_defaults() {
        let config = GateliftConfig::default();
        let defaults = config.analysis_defaults();
        assert_eq!(defaults.rounds_cutoff, 3000);
        assert_eq!(defaults.bootstrap_iterations, 1000);
        assert!(defaults.seed.is_none());
    }
}
