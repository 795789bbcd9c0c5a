//! Startup configuration
//!
//! Loaded once from YAML and shared read-only by every host task. Keys follow
//! the lowercase form (`outputdir`, `pollinginterval`) with snake_case aliases.

use crate::discovery::{LabelSet, Pattern};
use crate::output::OutputFormat;
use crate::{Result, SdError};
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_OUTPUT_DIR: &str = "/tmp";
pub const DEFAULT_POLLING_INTERVAL: i64 = 120;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(rename = "outputdir", alias = "output_dir")]
    pub output_dir: PathBuf,

    /// Seconds between cycles; zero or negative runs a single cycle
    #[serde(rename = "pollinginterval", alias = "polling_interval")]
    pub polling_interval: i64,

    #[serde(rename = "outputformat", alias = "output_format")]
    pub output_format: OutputFormat,

    /// libvirt connection URIs
    pub hosts: Vec<String>,

    pub groups: Vec<Group>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            polling_interval: DEFAULT_POLLING_INTERVAL,
            output_format: OutputFormat::default(),
            hosts: Vec::new(),
            groups: Vec::new(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| SdError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(&content).map_err(|source| SdError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Sleep between cycles, or `None` when polling is disabled
    pub fn interval(&self) -> Option<Duration> {
        if self.polling_interval > 0 {
            Some(Duration::from_secs(self.polling_interval as u64))
        } else {
            None
        }
    }
}

/// Labels shared by a list of rules
#[derive(Debug, Clone, Deserialize)]
pub struct Group {
    #[serde(default, deserialize_with = "deserialize_labels")]
    pub labels: LabelSet,

    #[serde(default, rename = "domains", alias = "rules")]
    pub rules: Vec<Rule>,
}

/// Selects workloads by name and describes how to scrape them
#[derive(Debug, Clone, Deserialize)]
pub struct Rule {
    #[serde(rename = "match")]
    pub pattern: Pattern,

    #[serde(default, deserialize_with = "deserialize_scalars")]
    pub ports: Vec<String>,

    #[serde(default, deserialize_with = "deserialize_labels")]
    pub labels: LabelSet,
}

/// YAML scalar accepted where a string is expected.
///
/// Integers and booleans are stringified; hex and octal integers come out in
/// decimal. Floats are rejected because their written form (`1.10`) cannot
/// be recovered.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    fn into_string<E: serde::de::Error>(self) -> std::result::Result<String, E> {
        match self {
            Scalar::String(s) => Ok(s),
            Scalar::Integer(i) => Ok(i.to_string()),
            Scalar::Bool(b) => Ok(b.to_string()),
            Scalar::Float(f) => Err(E::custom(format!(
                "quote non-integer values (got {})",
                f
            ))),
        }
    }
}

fn deserialize_scalars<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values: Option<Vec<Scalar>> = Option::deserialize(deserializer)?;
    values
        .unwrap_or_default()
        .into_iter()
        .map(Scalar::into_string)
        .collect()
}

fn deserialize_labels<'de, D>(deserializer: D) -> std::result::Result<LabelSet, D::Error>
where
    D: Deserializer<'de>,
{
    let values: Option<BTreeMap<String, Scalar>> = Option::deserialize(deserializer)?;
    values
        .unwrap_or_default()
        .into_iter()
        .map(|(k, v)| v.into_string().map(|v| (k, v)))
        .collect()
}
