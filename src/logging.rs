//! Logging System
//!
//! Structured logging on top of `tracing`. Level, format and destination come
//! from `[logging]` in the config file, overridden by `SANDTREE_LOG*` variables
//! and then by CLI flags ([`LogOverrides`]).

use crate::error::ApiError;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

/// Resolve the log file path with precedence: CLI, SANDTREE_LOG_FILE env, config file, default.
pub fn resolve_log_file_path(
    cli_file: Option<PathBuf>,
    config_file: Option<PathBuf>,
) -> Result<PathBuf, ApiError> {
    if let Some(p) = cli_file {
        if !p.as_os_str().is_empty() {
            return Ok(p);
        }
    }
    if let Ok(env_path) = std::env::var("SANDTREE_LOG_FILE") {
        if !env_path.is_empty() {
            return Ok(PathBuf::from(env_path));
        }
    }
    if let Some(p) = config_file {
        if !p.as_os_str().is_empty() {
            return Ok(p);
        }
    }
    default_log_file_path()
}

fn default_log_file_path() -> Result<PathBuf, ApiError> {
    let project_dirs = directories::ProjectDirs::from("", "sandtree", "sandtree").ok_or_else(|| {
        ApiError::ConfigError(
            "Could not determine platform state directory for log file".to_string(),
        )
    })?;
    let dir = project_dirs
        .state_dir()
        .unwrap_or_else(|| project_dirs.data_local_dir())
        .to_path_buf();
    Ok(dir.join("sandtree.log"))
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
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,

    /// Enable colored output (text format only, stdout/stderr only)
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

/// Command-line logging flags; each one outranks its `SANDTREE_LOG*` variable
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogOverrides {
    pub level: Option<String>,
    pub format: Option<String>,
    pub output: Option<String>,
    pub file: Option<PathBuf>,
}

/// Initialize the logging system
///
/// Priority order (highest to lowest):
/// 1. CLI arguments (`overrides`)
/// 2. Environment variables (SANDTREE_LOG, SANDTREE_LOG_FORMAT, etc.)
/// 3. Configuration file
/// 4. Defaults
///
/// A second call is a no-op; the first subscriber stays installed.
pub fn init_logging(
    config: Option<&LoggingConfig>,
    overrides: &LogOverrides,
) -> Result<(), ApiError> {
    if config.map(|c| !c.enabled).unwrap_or(false) {
        let _ = Registry::default().with(EnvFilter::new("off")).try_init();
        return Ok(());
    }

    let filter = build_env_filter(config, overrides.level.as_deref())?;
    let format = determine_format(config, overrides.format.as_deref())?;
    let output = determine_output(config, overrides.output.as_deref())?;
    let use_color = config.map(|c| c.color).unwrap_or(true) && !output.file;

    let writer = if output.file {
        let path = resolve_log_file_path(overrides.file.clone(), config.and_then(|c| c.file.clone()))?;
        let file = Arc::new(Mutex::new(open_log_file(&path)?));
        let file_writer = move || FileHandle(Arc::clone(&file));
        if output.stderr {
            BoxMakeWriter::new(file_writer.and(std::io::stderr))
        } else {
            BoxMakeWriter::new(file_writer)
        }
    } else if output.stdout && output.stderr {
        BoxMakeWriter::new(std::io::stdout.and(std::io::stderr))
    } else if output.stderr {
        BoxMakeWriter::new(std::io::stderr)
    } else {
        BoxMakeWriter::new(std::io::stdout)
    };

    let layer = if format == "json" {
        fmt::layer()
            .json()
            .with_target(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_writer(writer)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_ansi(use_color)
            .with_writer(writer)
            .boxed()
    };

    if Registry::default().with(filter).with(layer).try_init().is_err() {
        tracing::debug!("Logging already initialized");
    }
    Ok(())
}

fn open_log_file(path: &std::path::Path) -> Result<std::fs::File, ApiError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ApiError::ConfigError(format!("Failed to create log directory: {}", e))
        })?;
    }
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| ApiError::ConfigError(format!("Failed to open log file {:?}: {}", path, e)))
}

/// Shared append handle to the log file
struct FileHandle(Arc<Mutex<std::fs::File>>);

impl std::io::Write for FileHandle {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.0.lock().flush()
    }
}

/// Build environment filter from config or environment variables
fn build_env_filter(
    config: Option<&LoggingConfig>,
    cli_level: Option<&str>,
) -> Result<EnvFilter, ApiError> {
    if cli_level.is_none() {
        if let Ok(filter) = EnvFilter::try_from_env("SANDTREE_LOG") {
            return Ok(filter);
        }
    }

    let level = cli_level
        .or_else(|| config.map(|c| c.level.as_str()))
        .unwrap_or("info");
    if level == "off" {
        return Ok(EnvFilter::new("off"));
    }

    let mut filter = EnvFilter::new(level);

    if let Some(config) = config {
        for (module, module_level) in &config.modules {
            let directive = format!("{}={}", module, module_level);
            filter = filter.add_directive(
                directive
                    .parse()
                    .map_err(|e| ApiError::ConfigError(format!("Invalid log directive: {}", e)))?,
            );
        }
    }

    if let Ok(modules_str) = std::env::var("SANDTREE_LOG_MODULES") {
        for directive in parse_module_directives(&modules_str) {
            filter = filter.add_directive(directive.parse().map_err(|e| {
                ApiError::ConfigError(format!("Invalid log directive from env: {}", e))
            })?);
        }
    }

    Ok(filter)
}

/// `a=debug, b=warn` -> `["a=debug", "b=warn"]`; malformed pairs are skipped
fn parse_module_directives(spec: &str) -> Vec<String> {
    spec.split(',')
        .filter_map(|pair| {
            let (module, level) = pair.split_once('=')?;
            let (module, level) = (module.trim(), level.trim());
            if module.is_empty() || level.is_empty() {
                return None;
            }
            Some(format!("{}={}", module, level))
        })
        .collect()
}

/// Determine output format from config or environment
fn determine_format(
    config: Option<&LoggingConfig>,
    cli_format: Option<&str>,
) -> Result<String, ApiError> {
    if cli_format.is_none() {
        if let Ok(format) = std::env::var("SANDTREE_LOG_FORMAT") {
            if format == "json" || format == "text" {
                return Ok(format);
            }
        }
    }

    let format = cli_format
        .or_else(|| config.map(|c| c.format.as_str()))
        .unwrap_or("text");
    if format != "json" && format != "text" {
        return Err(ApiError::ConfigError(format!(
            "Invalid log format: {} (must be 'json' or 'text')",
            format
        )));
    }

    Ok(format.to_string())
}

/// Output destinations
#[derive(Debug)]
struct OutputDestinations {
    stdout: bool,
    stderr: bool,
    file: bool,
}

/// Determine output destinations from config or environment
fn determine_output(
    config: Option<&LoggingConfig>,
    cli_output: Option<&str>,
) -> Result<OutputDestinations, ApiError> {
    if let Some(output) = cli_output {
        return parse_output_destinations(output);
    }
    if let Ok(output) = std::env::var("SANDTREE_LOG_OUTPUT") {
        return parse_output_destinations(&output);
    }
    let output = config.map(|c| c.output.as_str()).unwrap_or("file");
    parse_output_destinations(output)
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
    Ok(OutputDestinations { stdout, stderr, file })
}
