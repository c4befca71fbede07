//! Logging infrastructure for pedagent
//!
//! All `log::*!` output is routed to `<tmp>/pedagent_debug.log` (`/tmp` on
//! Unix/macOS, `%TEMP%` on Windows). Nothing is written to stdout, which
//! carries the host bridge protocol. When `RUST_LOG` is set the same lines
//! are mirrored to stderr.
//!
//! Level precedence: `--log-level` on the command line, then `RUST_LOG`,
//! then the config file (applied with [`set_level`] once config is loaded).

use parking_lot::Mutex;
use pedagent_config::LogLevel;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Path of the debug log file
pub fn log_path() -> PathBuf {
    #[cfg(unix)]
    let path = PathBuf::from("/tmp/pedagent_debug.log");
    #[cfg(not(unix))]
    let path = std::env::temp_dir().join("pedagent_debug.log");
    path
}

struct DebugLogger {
    path: PathBuf,
    file: Mutex<LogFile>,
    mirror_stderr: bool,
}

/// The log file is opened on the first written line, so a session that
/// logs nothing (level `Off`) leaves no file behind.
enum LogFile {
    Unopened,
    Open(std::fs::File),
    Unavailable,
}

impl DebugLogger {
    fn new(path: PathBuf, mirror_stderr: bool) -> Self {
        Self {
            path,
            file: Mutex::new(LogFile::Unopened),
            mirror_stderr,
        }
    }

    fn open(&self) -> LogFile {
        match OpenOptions::new()
            .write(true)
            .truncate(true)
            .create(true)
            .open(&self.path)
        {
            Ok(mut f) => {
                let _ = f.write_all(
                    format!(
                        "{}\npedagent debug session started at {}\n{}\n",
                        "=".repeat(80),
                        get_timestamp(),
                        "=".repeat(80)
                    )
                    .as_bytes(),
                );
                LogFile::Open(f)
            }
            // Logging must never take the bridge down; run without a file.
            Err(_) => LogFile::Unavailable,
        }
    }

    fn write_line(&self, line: &str) {
        let mut file = self.file.lock();
        if matches!(*file, LogFile::Unopened) {
            *file = self.open();
        }
        if let LogFile::Open(f) = &mut *file {
            let _ = f.write_all(line.as_bytes());
        }
    }
}

impl log::Log for DebugLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!(
            "[{}] [{:<5}] [{}] {}\n",
            get_timestamp(),
            record.level(),
            record.target(),
            record.args()
        );
        self.write_line(&line);
        if self.mirror_stderr {
            eprint!("{line}");
        }
    }

    fn flush(&self) {
        if let LogFile::Open(file) = &mut *self.file.lock() {
            let _ = file.flush();
        }
    }
}

static LOGGER: OnceLock<DebugLogger> = OnceLock::new();
static LEVEL_PINNED: AtomicBool = AtomicBool::new(false);

fn get_timestamp() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}.{:06}", now.as_secs(), now.subsec_micros())
}

fn rust_log_level() -> Option<log::LevelFilter> {
    let value = std::env::var("RUST_LOG").ok()?;
    // Accept plain levels as well as `target=level` directives; the last
    // parseable level wins.
    value
        .split(',')
        .filter_map(|directive| directive.rsplit('=').next())
        .filter_map(LogLevel::parse)
        .map(LogLevel::to_level_filter)
        .last()
}

/// Install the file logger as the `log` backend.
///
/// `cli_level` comes from `--log-level`. When neither it nor `RUST_LOG` is
/// given, the level stays at `Info` until [`set_level`] applies the config
/// value. Calling this more than once is harmless.
pub fn init_log_bridge(cli_level: Option<LogLevel>) {
    let env_level = rust_log_level();
    let logger = LOGGER.get_or_init(|| DebugLogger::new(log_path(), std::env::var_os("RUST_LOG").is_some()));
    if log::set_logger(logger).is_err() {
        return;
    }

    let level = match (cli_level, env_level) {
        (Some(cli), _) => {
            LEVEL_PINNED.store(true, Ordering::Relaxed);
            cli.to_level_filter()
        }
        (None, Some(env)) => {
            LEVEL_PINNED.store(true, Ordering::Relaxed);
            env
        }
        (None, None) => log::LevelFilter::Info,
    };
    log::set_max_level(level);
}

/// Apply the configured level unless the command line or `RUST_LOG` already
/// chose one.
pub fn set_level(config_level: LogLevel) {
    if LEVEL_PINNED.load(Ordering::Relaxed) {
        return;
    }
    log::set_max_level(config_level.to_level_filter());
}
