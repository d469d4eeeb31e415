//! Process-wide logging bootstrap.
//!
//! # Responsibility
//! - Start rolling file logs once per process.
//! - Capture panics as sanitized `panic_captured` events.
//!
//! # Invariants
//! - Repeated init with the same level and directory is a no-op.
//! - Re-initialization with another level or directory is rejected.
//! - Initialization never panics.

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::{error, info};
use once_cell::sync::OnceCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "jobboard";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;
const MAX_LOG_FILES: usize = 3;
const MAX_PANIC_PAYLOAD_CHARS: usize = 160;

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();
static PANIC_HOOK_INSTALLED: OnceCell<()> = OnceCell::new();

struct LoggingState {
    level: &'static str,
    log_dir: PathBuf,
    _handle: LoggerHandle,
}

/// Logging bootstrap errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoggingError {
    UnsupportedLevel(String),
    EmptyLogDir,
    RelativeLogDir(PathBuf),
    CreateDir { path: PathBuf, message: String },
    Backend(String),
    AlreadyInitialized { level: &'static str, log_dir: PathBuf },
}

impl Display for LoggingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedLevel(value) => write!(
                f,
                "unsupported log level `{value}`; expected trace|debug|info|warn|error"
            ),
            Self::EmptyLogDir => write!(f, "log_dir cannot be empty"),
            Self::RelativeLogDir(path) => {
                write!(f, "log_dir must be absolute, got `{}`", path.display())
            }
            Self::CreateDir { path, message } => write!(
                f,
                "failed to create log directory `{}`: {message}",
                path.display()
            ),
            Self::Backend(message) => write!(f, "failed to start logger: {message}"),
            Self::AlreadyInitialized { level, log_dir } => write!(
                f,
                "logging already initialized with level `{level}` at `{}`; refusing to switch",
                log_dir.display()
            ),
        }
    }
}

impl Error for LoggingError {}

/// Initializes file logging at `log_dir` with `level`.
///
/// # Errors
/// - `UnsupportedLevel` for levels outside trace|debug|info|warn|error.
/// - `EmptyLogDir` / `RelativeLogDir` for unusable directories.
/// - `AlreadyInitialized` when a different configuration is already active.
pub fn init_logging(level: &str, log_dir: impl AsRef<Path>) -> Result<(), LoggingError> {
    let level = normalize_level(level)?;
    let log_dir = normalize_log_dir(log_dir.as_ref())?;

    let state = LOGGING_STATE.get_or_try_init(|| start_logger(level, &log_dir))?;
    if state.level != level || state.log_dir != log_dir {
        return Err(LoggingError::AlreadyInitialized {
            level: state.level,
            log_dir: state.log_dir.clone(),
        });
    }
    Ok(())
}

/// Returns `(level, log_dir)` once logging is active.
pub fn logging_status() -> Option<(&'static str, PathBuf)> {
    LOGGING_STATE
        .get()
        .map(|state| (state.level, state.log_dir.clone()))
}

/// `debug` for debug builds, `info` otherwise.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn start_logger(level: &'static str, log_dir: &Path) -> Result<LoggingState, LoggingError> {
    std::fs::create_dir_all(log_dir).map_err(|err| LoggingError::CreateDir {
        path: log_dir.to_path_buf(),
        message: err.to_string(),
    })?;

    let handle = Logger::try_with_str(level)
        .map_err(|err| LoggingError::Backend(err.to_string()))?
        .log_to_file(
            FileSpec::default()
                .directory(log_dir)
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| LoggingError::Backend(err.to_string()))?;

    install_panic_hook_once();
    info!(
        "event=logging_init module=logging status=ok level={} log_dir={} version={}",
        level,
        log_dir.display(),
        env!("CARGO_PKG_VERSION")
    );

    Ok(LoggingState {
        level,
        log_dir: log_dir.to_path_buf(),
        _handle: handle,
    })
}

fn normalize_level(level: &str) -> Result<&'static str, LoggingError> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(LoggingError::UnsupportedLevel(other.to_string())),
    }
}

fn normalize_log_dir(log_dir: &Path) -> Result<PathBuf, LoggingError> {
    if log_dir.as_os_str().is_empty() {
        return Err(LoggingError::EmptyLogDir);
    }
    if !log_dir.is_absolute() {
        return Err(LoggingError::RelativeLogDir(log_dir.to_path_buf()));
    }
    Ok(log_dir.to_path_buf())
}

fn install_panic_hook_once() {
    if PANIC_HOOK_INSTALLED.set(()).is_err() {
        return;
    }

    let previous_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "unknown".to_string());
        let payload = panic_info
            .payload()
            .downcast_ref::<&str>()
            .map(|message| (*message).to_string())
            .or_else(|| panic_info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        error!(
            "event=panic_captured module=logging status=error location={} payload={}",
            location,
            sanitize_message(&payload, MAX_PANIC_PAYLOAD_CHARS)
        );
        previous_hook(panic_info);
    }));
}

fn sanitize_message(value: &str, max_chars: usize) -> String {
    let normalized = value.replace(['\n', '\r'], " ");
    let mut truncated = normalized.chars().take(max_chars).collect::<String>();
    if normalized.chars().count() > max_chars {
        truncated.push_str("...");
    }
    truncated
}

#[cfg(test)]
mod tests {
    use super::{
        init_logging, logging_status, normalize_level, normalize_log_dir, sanitize_message,
        LoggingError,
    };
    use std::path::Path;

    #[test]
    fn normalize_level_accepts_known_values() {
        assert_eq!(normalize_level("INFO").expect("INFO"), "info");
        assert_eq!(normalize_level(" warning ").expect("warning"), "warn");
        assert_eq!(
            normalize_level("verbose").unwrap_err(),
            LoggingError::UnsupportedLevel("verbose".to_string())
        );
    }

    #[test]
    fn normalize_log_dir_rejects_relative_and_empty_paths() {
        assert!(matches!(
            normalize_log_dir(Path::new("logs/dev")),
            Err(LoggingError::RelativeLogDir(_))
        ));
        assert_eq!(
            normalize_log_dir(Path::new("")).unwrap_err(),
            LoggingError::EmptyLogDir
        );
    }

    #[test]
    fn sanitize_message_removes_newlines_and_truncates() {
        let sanitized = sanitize_message("line1\nline2\rline3", 8);
        assert!(!sanitized.contains('\n'));
        assert!(!sanitized.contains('\r'));
        assert!(sanitized.ends_with("..."));
    }

    #[test]
    fn init_logging_is_idempotent_and_rejects_conflicts() {
        let first = tempfile::tempdir().expect("temp dir");
        let second = tempfile::tempdir().expect("temp dir");

        init_logging("info", first.path()).expect("first init");
        init_logging("INFO", first.path()).expect("same config is idempotent");

        let err = init_logging("debug", first.path()).expect_err("level conflict");
        assert!(matches!(err, LoggingError::AlreadyInitialized { .. }));
        let err = init_logging("info", second.path()).expect_err("directory conflict");
        assert!(err.to_string().contains("refusing to switch"));

        let (level, dir) = logging_status().expect("logging active");
        assert_eq!(level, "info");
        assert_eq!(dir, first.path());
    }
}
