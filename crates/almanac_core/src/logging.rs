//! File logging for the planner core.
//!
//! Events are `key=value` lines carrying metadata only: dates, counts and
//! status. Plan notes and expense item text never reach the log.
//!
//! Logging starts at most once per process. Repeating the same request is a
//! no-op; asking for a different level or directory afterwards is an error.

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::{error, info, LevelFilter};
use once_cell::sync::OnceCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Once;

const LOG_FILE_BASENAME: &str = "almanac";
const ROTATE_AT_BYTES: u64 = 10 * 1024 * 1024;
const KEEP_LOG_FILES: usize = 5;
const PANIC_PAYLOAD_LIMIT: usize = 160;

static ACTIVE: OnceCell<ActiveLogger> = OnceCell::new();
static PANIC_HOOK: Once = Once::new();

/// Validated logging request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub level: LevelFilter,
    pub dir: PathBuf,
}

impl LogConfig {
    /// Parses host-supplied level text and directory.
    ///
    /// `level` accepts `off`, `error`, `warn` (or `warning`), `info`, `debug`
    /// and `trace` in any case. `dir` must be an absolute path.
    pub fn parse(level: &str, dir: &str) -> Result<Self, LoggingError> {
        let level_text = level.trim();
        let level = match level_text.to_ascii_lowercase().as_str() {
            "warning" => LevelFilter::Warn,
            other => LevelFilter::from_str(other)
                .map_err(|_| LoggingError::UnknownLevel(level_text.to_string()))?,
        };

        let dir = dir.trim();
        if dir.is_empty() {
            return Err(LoggingError::MissingDirectory);
        }
        let dir = PathBuf::from(dir);
        if !dir.is_absolute() {
            return Err(LoggingError::RelativeDirectory(dir));
        }

        Ok(Self { level, dir })
    }

    fn spec(&self) -> String {
        self.level.to_string().to_ascii_lowercase()
    }
}

/// Reasons logging could not be started.
#[derive(Debug)]
pub enum LoggingError {
    UnknownLevel(String),
    MissingDirectory,
    RelativeDirectory(PathBuf),
    CreateDirectory { dir: PathBuf, source: std::io::Error },
    Backend(flexi_logger::FlexiLoggerError),
    /// Logging already runs with `active`; `requested` differs.
    AlreadyRunning { active: LogConfig, requested: LogConfig },
}

impl Display for LoggingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownLevel(level) => write!(
                f,
                "unknown log level `{level}`; use off|error|warn|info|debug|trace"
            ),
            Self::MissingDirectory => write!(f, "log directory is empty"),
            Self::RelativeDirectory(dir) => {
                write!(f, "log directory must be absolute: `{}`", dir.display())
            }
            Self::CreateDirectory { dir, source } => {
                write!(f, "cannot create log directory `{}`: {source}", dir.display())
            }
            Self::Backend(err) => write!(f, "log backend failed to start: {err}"),
            Self::AlreadyRunning { active, requested } => write!(
                f,
                "logging already running at {} in `{}`; cannot switch to {} in `{}`",
                active.spec(),
                active.dir.display(),
                requested.spec(),
                requested.dir.display()
            ),
        }
    }
}

impl Error for LoggingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CreateDirectory { source, .. } => Some(source),
            Self::Backend(err) => Some(err),
            _ => None,
        }
    }
}

struct ActiveLogger {
    config: LogConfig,
    _handle: LoggerHandle,
}

/// Starts rolling file logs under `log_dir`.
///
/// Rotates at 10 MiB and keeps the five newest files.
pub fn init_logging(level: &str, log_dir: &str) -> Result<(), LoggingError> {
    let requested = LogConfig::parse(level, log_dir)?;
    let active = ACTIVE.get_or_try_init(|| start(&requested))?;
    if active.config != requested {
        return Err(LoggingError::AlreadyRunning {
            active: active.config.clone(),
            requested,
        });
    }
    Ok(())
}

/// The configuration logging runs with, if started.
pub fn logging_status() -> Option<LogConfig> {
    ACTIVE.get().map(|active| active.config.clone())
}

/// `debug` in debug builds, `info` otherwise.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn start(config: &LogConfig) -> Result<ActiveLogger, LoggingError> {
    std::fs::create_dir_all(&config.dir).map_err(|source| LoggingError::CreateDirectory {
        dir: config.dir.clone(),
        source,
    })?;

    let handle = Logger::try_with_str(config.spec())
        .map_err(LoggingError::Backend)?
        .log_to_file(file_spec(&config.dir))
        .rotate(
            Criterion::Size(ROTATE_AT_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(KEEP_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(LoggingError::Backend)?;

    PANIC_HOOK.call_once(install_panic_hook);

    info!(
        "event=logging_ready module=logging status=ok level={} os={} version={}",
        config.spec(),
        std::env::consts::OS,
        env!("CARGO_PKG_VERSION")
    );

    Ok(ActiveLogger {
        config: config.clone(),
        _handle: handle,
    })
}

fn file_spec(dir: &Path) -> FileSpec {
    FileSpec::default().directory(dir).basename(LOG_FILE_BASENAME)
}

fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let location = panic_info
            .location()
            .map_or_else(
                || "unknown".to_string(),
                |loc| format!("{}:{}", loc.file(), loc.line()),
            );
        let payload = panic_info
            .payload()
            .downcast_ref::<&str>()
            .map(|text| (*text).to_string())
            .or_else(|| panic_info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string payload".to_string());
        error!(
            "event=panic module=logging status=error location={location} payload={}",
            single_line(&payload, PANIC_PAYLOAD_LIMIT)
        );
        previous(panic_info);
    }));
}

/// Collapses line breaks and caps `text` at `limit` characters.
fn single_line(text: &str, limit: usize) -> String {
    let flat = text.replace(['\r', '\n'], " ");
    if flat.chars().count() <= limit {
        return flat;
    }
    let mut out: String = flat.chars().take(limit).collect();
    out.push_str("...");
    out
}
