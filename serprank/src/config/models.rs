//! Configuration model definitions.
//!
//! This module contains the configuration structures for all serprank components.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub use crate::scoring::ScoringConfig;

/// Main configuration structure for serprank.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct SerprankConfig {
    /// Relevance scoring weights and defaults
    pub scoring: ScoringConfig,

    /// Search API client configuration
    pub search_api: SearchApiConfig,

    /// Document store configuration
    pub store: StoreConfig,

    /// Training export configuration
    pub export: ExportConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Configuration for the search API client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchApiConfig {
    /// API key (required for fetching)
    pub api_key: Option<String>,

    /// Search endpoint URL
    pub endpoint: String,

    /// Search engine name passed to the API
    pub engine: String,

    /// Results requested per page
    pub results_per_page: usize,

    /// Default number of pages to fetch
    pub max_pages: usize,

    /// Request timeout
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for SearchApiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: "https://serpapi.com/search.json".to_string(),
            engine: "google".to_string(),
            results_per_page: 10,
            max_pages: 5,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Default local document store URL
pub const DEFAULT_STORE_URL: &str = "http://localhost:9200";

/// URL fragments identifying hosted (cloud) deployments
pub const CLOUD_URL_MARKERS: &[&str] = &[
    "elastic-cloud",
    "aws.found.io",
    "gcp.found.io",
    "azure.found.io",
    "es.",
];

/// Configuration for the document store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StoreConfig {
    /// Base URL of the store
    pub url: String,

    /// API key for hosted deployments
    pub api_key: Option<String>,

    /// Index holding search results
    pub index: String,

    /// Request timeout
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,

    /// Retries for transient failures
    pub max_retries: u32,

    /// Documents per scroll page
    pub scroll_page_size: usize,

    /// Scroll context keep-alive, in the store's duration syntax
    pub scroll_keep_alive: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_STORE_URL.to_string(),
            api_key: None,
            index: "search_results".to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 3,
            scroll_page_size: 100,
            scroll_keep_alive: "2m".to_string(),
        }
    }
}

impl StoreConfig {
    /// Whether this points at a hosted deployment
    ///
    /// True when an API key is set and the URL looks like a cloud endpoint.
    pub fn is_cloud_deployment(&self) -> bool {
        let has_key = self.api_key.as_deref().is_some_and(|k| !k.is_empty());
        has_key && CLOUD_URL_MARKERS.iter().any(|m| self.url.contains(m))
    }

    /// Whether this is the default local URL
    pub fn is_default_local(&self) -> bool {
        self.url.is_empty() || self.url == DEFAULT_STORE_URL
    }
}

/// Configuration for training-data export.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory export files are written to
    pub output_dir: PathBuf,

    /// Structured (enriched document) training file name
    pub training_file: String,

    /// Prompt/response training file name
    pub prompt_file: String,

    /// Conversational training file name
    pub conversation_file: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            training_file: "ranking_training_data.jsonl".to_string(),
            prompt_file: "vertex_ready.jsonl".to_string(),
            conversation_file: "gemini_ready.jsonl".to_string(),
        }
    }
}

impl ExportConfig {
    /// Full path of the structured training file
    pub fn training_path(&self) -> PathBuf {
        self.output_dir.join(&self.training_file)
    }

    /// Full path of the prompt/response file
    pub fn prompt_path(&self) -> PathBuf {
        self.output_dir.join(&self.prompt_file)
    }

    /// Full path of the conversational file
    pub fn conversation_path(&self) -> PathBuf {
        self.output_dir.join(&self.conversation_file)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level
    pub level: LogLevel,

    /// Log format
    pub format: LogFormat,

    /// File to log to (if any)
    pub file: Option<PathBuf>,

    /// Whether to log to stdout
    pub stdout: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Default,
            file: None,
            stdout: true,
        }
    }
}

/// Log level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level
    Trace,

    /// Debug level
    Debug,

    /// Info level
    Info,

    /// Warn level
    Warn,

    /// Error level
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(format!("Invalid log level: {}", s)),
        }
    }
}

/// Log format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Default format
    Default,

    /// JSON format
    Json,

    /// Compact format
    Compact,

    /// Pretty format
    Pretty,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Default => write!(f, "default"),
            LogFormat::Json => write!(f, "json"),
            LogFormat::Compact => write!(f, "compact"),
            LogFormat::Pretty => write!(f, "pretty"),
        }
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "default" => Ok(LogFormat::Default),
            "json" => Ok(LogFormat::Json),
            "compact" => Ok(LogFormat::Compact),
            "pretty" => Ok(LogFormat::Pretty),
            _ => Err(format!("Invalid log format: {}", s)),
        }
    }
}
