//! Logging setup for gitstamp with stderr output and an optional log file.
//!
//! Stdout carries the generated output, so logs go to stderr. The default level
//! is `warn`, which keeps normal runs silent.
//!
//! ## Environment Variables
//!
//! 1. **`GITSTAMP_LOG`** (highest priority) - gitstamp-specific logging control
//! 2. **`RUST_LOG`** - Standard tracing environment variable
//! 3. **Default** - `warn` globally
//!
//! ## Log File
//!
//! Only written when requested with `--log-file <path>` or `GITSTAMP_LOG_FILE`.
//! A path with an extension is used as the file; a path without one is treated
//! as a directory and gets `gitstamp-<pid>.log`.

use std::{
    env,
    path::{Path, PathBuf},
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

/// Crates a bare level in `GITSTAMP_LOG` applies to.
const GITSTAMP_CRATES: [&str; 3] = ["gitstamp", "gitstamp_bin", "gitstamp_log"];

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Returned from [`init`]; must be held alive to ensure log file flushing.
pub struct LogGuard {
    _file_guard: Option<WorkerGuard>,
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub struct LogConfig {
    pub log_file_path: Option<PathBuf>,
}

/// Initialize logging.
///
/// Filters follow the priority in the module docs:
/// [`GITSTAMP_LOG`] > [`RUST_LOG`] > default settings.
///
/// The returned [`LogGuard`] must be held for the lifetime of the program --
/// dropping it flushes and stops the background file writer.
pub fn init(config: LogConfig) -> Result<LogGuard, BoxError> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(create_filter()?);

    let (file_layer, file_guard, log_file) = match config.log_file_path {
        Some(path) => {
            let (log_dir, filename) = resolve_log_path(path);
            std::fs::create_dir_all(&log_dir)?;

            let file_appender = tracing_appender::rolling::never(&log_dir, &filename);
            let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);
            let layer = fmt::layer()
                .with_writer(non_blocking_file)
                .with_ansi(false)
                .with_filter(create_file_filter()?);
            (Some(layer), Some(guard), Some(log_dir.join(filename)))
        },
        None => (None, None, None),
    };

    Registry::default()
        .with(stderr_layer)
        .with(file_layer)
        .try_init()?;

    Ok(LogGuard {
        _file_guard: file_guard,
        log_file,
    })
}

/// Initialize logging for tests.
///
/// Stderr only, and safe to call from every test: a subscriber installed by an
/// earlier test is left in place.
#[allow(clippy::let_unit_value)]
pub fn test() {
    let _ = test_init();
}

fn test_init() -> Result<(), BoxError> {
    let filter = create_filter()?;
    fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init()?;
    Ok(())
}

fn resolve_log_path(path: PathBuf) -> (PathBuf, String) {
    let default_name = format!("gitstamp-{}.log", std::process::id());

    if path.extension().is_some() {
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or(default_name);
        return (dir.to_path_buf(), name);
    }

    (path, default_name)
}

/// File filter: the user's level if set, otherwise `info` so the file is useful.
fn create_file_filter() -> Result<EnvFilter, BoxError> {
    if env::var("GITSTAMP_LOG").is_ok() || env::var("RUST_LOG").is_ok() {
        return create_filter();
    }
    Ok(EnvFilter::new(expand_level("info")))
}

/// Create the appropriate [`EnvFilter`] based on environment variables.
fn create_filter() -> Result<EnvFilter, BoxError> {
    if let Ok(level) = env::var("GITSTAMP_LOG") {
        return Ok(expand_gitstamp_log(&level));
    }

    if let Ok(rust_log) = env::var("RUST_LOG") {
        return Ok(EnvFilter::new(rust_log));
    }

    Ok(EnvFilter::new("warn"))
}

/// Expand `GITSTAMP_LOG` values into full tracing filter strings.
///
/// - `GITSTAMP_LOG=debug` becomes `warn,gitstamp=debug,gitstamp_bin=debug,...`
/// - `GITSTAMP_LOG=gitstamp=trace` is used as-is
fn expand_gitstamp_log(value: &str) -> EnvFilter {
    EnvFilter::new(expand_directives(value))
}

fn expand_directives(value: &str) -> String {
    if value.contains('=') || value.contains(':') || value.contains(',') {
        return value.to_string();
    }
    expand_level(value)
}

fn expand_level(level: &str) -> String {
    let mut directives = String::from("warn");
    for krate in GITSTAMP_CRATES {
        directives.push_str(&format!(",{krate}={level}"));
    }
    directives
}
