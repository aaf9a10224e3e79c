//! Logging System
//!
//! Structured logging on top of `tracing`. Level, format and destination come
//! from the `[logging]` config section and can be overridden per process with
//! `BUCKETVIEW_LOG`, `BUCKETVIEW_LOG_MODULES`, `BUCKETVIEW_LOG_FORMAT`,
//! `BUCKETVIEW_LOG_OUTPUT` and `BUCKETVIEW_LOG_FILE`.

use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

const LOG_FILE_NAME: &str = "bucketview.log";

/// Resolve the log file path with precedence: CLI, BUCKETVIEW_LOG_FILE env, config file, default.
///
/// The default lives in the platform state directory (data-local directory
/// where the platform has no state directory).
pub fn resolve_log_file_path(
    cli_file: Option<PathBuf>,
    config_file: Option<PathBuf>,
) -> Result<PathBuf, ApiError> {
    let env_file = std::env::var("BUCKETVIEW_LOG_FILE").ok().map(PathBuf::from);
    [cli_file, env_file, config_file]
        .into_iter()
        .flatten()
        .find(|p| !p.as_os_str().is_empty())
        .map(Ok)
        .unwrap_or_else(default_log_file_path)
}

fn default_log_file_path() -> Result<PathBuf, ApiError> {
    let project_dirs = directories::ProjectDirs::from("", "", "bucketview").ok_or_else(|| {
        ApiError::ConfigError(
            "Could not determine platform state directory for log file".to_string(),
        )
    })?;
    let dir = project_dirs
        .state_dir()
        .unwrap_or_else(|| project_dirs.data_local_dir());
    Ok(dir.join(LOG_FILE_NAME))
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Whether logging is enabled (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: json, text (default: text)
    #[serde(default = "default_format")]
    pub format: String,

    /// Output destination: stdout, stderr, file, file+stderr, both
    #[serde(default = "default_output")]
    pub output: String,

    /// Log file path when output includes file; None means use runtime default
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Enable colored output (text format, terminal destinations only)
    #[serde(default = "default_true")]
    pub color: bool,

    /// Module-specific log levels
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_output() -> String {
    "file".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            level: default_log_level(),
            format: default_format(),
            output: default_output(),
            file: None,
            color: default_true(),
            modules: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    Text,
    Json,
}

/// Initialize the global subscriber.
///
/// Priority order (highest to lowest):
/// 1. CLI arguments (passed via env vars or direct config)
/// 2. Environment variables (BUCKETVIEW_LOG, BUCKETVIEW_LOG_FORMAT, etc.)
/// 3. Configuration file
/// 4. Defaults
pub fn init_logging(config: Option<&LoggingConfig>) -> Result<(), ApiError> {
    let disabled = config.map(|c| !c.enabled).unwrap_or(false);
    let installed = if disabled {
        Registry::default()
            .with(EnvFilter::new("off"))
            .with(fmt::layer().with_writer(std::io::sink))
            .try_init()
    } else {
        let filter = build_env_filter(config)?;
        let format = determine_format(config)?;
        let output = determine_output(config)?;
        let ansi = !output.file && config.map(|c| c.color).unwrap_or(true);
        let writer = output.make_writer(config.and_then(|c| c.file.clone()))?;

        let layer = fmt::layer()
            .with_target(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_writer(writer);
        let registry = Registry::default().with(filter);
        match format {
            LogFormat::Json => registry.with(layer.json()).try_init(),
            LogFormat::Text => registry.with(layer.with_ansi(ansi)).try_init(),
        }
    };
    installed
        .map_err(|e| ApiError::ConfigError(format!("Failed to install log subscriber: {}", e)))
}

/// Build environment filter from config or environment variables
fn build_env_filter(config: Option<&LoggingConfig>) -> Result<EnvFilter, ApiError> {
    if let Ok(filter) = EnvFilter::try_from_env("BUCKETVIEW_LOG") {
        return Ok(filter);
    }

    let level = config.map(|c| c.level.as_str()).unwrap_or("info");
    if level == "off" {
        return Ok(EnvFilter::new("off"));
    }
    let mut filter = EnvFilter::new(level);

    let from_config = config
        .into_iter()
        .flat_map(|c| c.modules.iter())
        .map(|(module, level)| format!("{}={}", module, level));
    let from_env = std::env::var("BUCKETVIEW_LOG_MODULES")
        .ok()
        .map(|spec| parse_module_directives(&spec))
        .unwrap_or_default();

    for directive in from_config.chain(from_env) {
        filter = filter.add_directive(directive.parse().map_err(|e| {
            ApiError::ConfigError(format!("Invalid log directive '{}': {}", directive, e))
        })?);
    }
    Ok(filter)
}

/// `a=debug, b = trace` into directives; entries without `=` are ignored.
fn parse_module_directives(spec: &str) -> Vec<String> {
    spec.split(',')
        .filter_map(|entry| entry.split_once('='))
        .map(|(module, level)| format!("{}={}", module.trim(), level.trim()))
        .collect()
}

fn determine_format(config: Option<&LoggingConfig>) -> Result<LogFormat, ApiError> {
    if let Ok(format) = std::env::var("BUCKETVIEW_LOG_FORMAT") {
        if let Ok(parsed) = parse_format(&format) {
            return Ok(parsed);
        }
    }
    parse_format(config.map(|c| c.format.as_str()).unwrap_or("text"))
}

fn parse_format(format: &str) -> Result<LogFormat, ApiError> {
    match format {
        "text" => Ok(LogFormat::Text),
        "json" => Ok(LogFormat::Json),
        other => Err(ApiError::ConfigError(format!(
            "Invalid log format: {} (must be 'json' or 'text')",
            other
        ))),
    }
}

/// Output destinations
#[derive(Debug, PartialEq, Eq)]
struct OutputDestinations {
    stdout: bool,
    stderr: bool,
    file: bool,
}

impl OutputDestinations {
    /// Writer fanning out to every selected destination. The file is opened
    /// (and its directory created) only when selected.
    fn make_writer(&self, config_file: Option<PathBuf>) -> Result<BoxMakeWriter, ApiError> {
        let file = if self.file {
            Some(open_log_file(resolve_log_file_path(None, config_file)?)?)
        } else {
            None
        };
        let writer = match (file, self.stdout, self.stderr) {
            (Some(file), _, true) => BoxMakeWriter::new(file.and(std::io::stderr)),
            (Some(file), _, false) => BoxMakeWriter::new(file),
            (None, true, true) => BoxMakeWriter::new(std::io::stdout.and(std::io::stderr)),
            (None, false, true) => BoxMakeWriter::new(std::io::stderr),
            (None, _, false) => BoxMakeWriter::new(std::io::stdout),
        };
        Ok(writer)
    }
}

fn open_log_file(path: PathBuf) -> Result<std::fs::File, ApiError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ApiError::ConfigError(format!("Failed to create log directory: {}", e))
        })?;
    }
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| {
            ApiError::ConfigError(format!("Failed to open log file {}: {}", path.display(), e))
        })
}

fn determine_output(config: Option<&LoggingConfig>) -> Result<OutputDestinations, ApiError> {
    if let Ok(output) = std::env::var("BUCKETVIEW_LOG_OUTPUT") {
        return parse_output_destinations(&output);
    }
    parse_output_destinations(config.map(|c| c.output.as_str()).unwrap_or("file"))
}

fn parse_output_destinations(output: &str) -> Result<OutputDestinations, ApiError> {
    let (stdout, stderr, file) = match output {
        "stdout" => (true, false, false),
        "stderr" => (false, true, false),
        "file" => (false, false, true),
        "file+stderr" => (false, true, true),
        "both" => (true, true, false),
        _ => {
            return Err(ApiError::ConfigError(format!(
                "Invalid log output: {} (must be 'stdout', 'stderr', 'file', 'file+stderr', or 'both')",
                output
            )))
        }
    };
    Ok(OutputDestinations {
        stdout,
        stderr,
        file,
    })
}
