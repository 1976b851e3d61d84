//! examlens configuration.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::ExamError;

/// Report formats the CLI can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Html,
    All,
}

impl OutputFormat {
    /// Whether this selection includes `other`.
    pub fn includes(&self, other: OutputFormat) -> bool {
        *self == OutputFormat::All || *self == other
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Html => write!(f, "html"),
            OutputFormat::All => write!(f, "all"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ExamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "html" => Ok(OutputFormat::Html),
            "all" => Ok(OutputFormat::All),
            other => Err(ExamError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Defaults applied to exams built by `examlens import`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportDefaults {
    #[serde(default = "default_positive_marks")]
    pub positive_marks: f64,
    #[serde(default = "default_negative_marking")]
    pub negative_marking: f64,
    #[serde(default = "default_duration")]
    pub duration_secs: u64,
}

impl Default for ImportDefaults {
    fn default() -> Self {
        Self {
            positive_marks: default_positive_marks(),
            negative_marking: default_negative_marking(),
            duration_secs: default_duration(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareDefaults {
    /// Percentage-point change below which a score counts as unchanged.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

impl Default for CompareDefaults {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
        }
    }
}

/// Top-level examlens configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamlensConfig {
    /// Directory reports are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_format")]
    pub default_format: OutputFormat,
    #[serde(default)]
    pub import: ImportDefaults,
    #[serde(default)]
    pub compare: CompareDefaults,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./examlens-results")
}
fn default_format() -> OutputFormat {
    OutputFormat::Json
}
fn default_positive_marks() -> f64 {
    1.0
}
fn default_negative_marking() -> f64 {
    0.25
}
fn default_duration() -> u64 {
    1800
}
fn default_threshold() -> f64 {
    5.0
}

impl Default for ExamlensConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            default_format: default_format(),
            import: ImportDefaults::default(),
            compare: CompareDefaults::default(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are not scanned again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        let var_name = &rest[start + 2..start + end];
        result.push_str(&rest[..start]);
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

/// Load configuration from `examlens.toml` in the current directory, if any.
pub fn load_config() -> Result<ExamlensConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or fall back to `./examlens.toml`.
///
/// `EXAMLENS_OUTPUT_DIR` overrides the configured output directory.
pub fn load_config_from(path: Option<&Path>) -> Result<ExamlensConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("examlens.toml");
            local.exists().then_some(local)
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            tracing::debug!("loading config from {}", path.display());
            toml::from_str::<ExamlensConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => ExamlensConfig::default(),
    };

    if let Ok(dir) = std::env::var("EXAMLENS_OUTPUT_DIR") {
        config.output_dir = PathBuf::from(dir);
    }
    config.output_dir = PathBuf::from(resolve_env_vars(&config.output_dir.to_string_lossy()));

    Ok(config)
}
