//! File logger for coco-desk, installed as the `log` crate backend.
//!
//! Every `log::info!` / `log::warn!` / ... call in the workspace ends up here.
//!
//! Level precedence:
//! 1. `--log-level` on the command line
//! 2. `RUST_LOG` (a bare level name such as `debug`)
//! 3. `info`
//!
//! Output goes to `coco_desk_debug.log` in the system temp directory. When
//! `RUST_LOG` is set, lines are mirrored to stderr as well.

use parking_lot::Mutex;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

const LOG_FILE_NAME: &str = "coco_desk_debug.log";

struct DebugLogger {
    file: Option<std::fs::File>,
    mirror_stderr: bool,
}

impl DebugLogger {
    fn open(level: log::LevelFilter, mirror_stderr: bool) -> Self {
        let file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .create(true)
            .open(log_path())
            .ok();

        let mut logger = DebugLogger {
            file,
            mirror_stderr,
        };
        logger.write_raw(&format!(
            "{}\ncoco-desk session started at {} (level={})\n{}\n",
            "=".repeat(80),
            get_timestamp(),
            level,
            "=".repeat(80)
        ));
        logger
    }

    fn write_raw(&mut self, msg: &str) {
        if let Some(ref mut file) = self.file {
            let _ = file.write_all(msg.as_bytes());
            let _ = file.flush();
        }
    }

    fn write_record(&mut self, record: &log::Record) {
        let line = format!(
            "[{}] [{:<5}] [{}] {}\n",
            get_timestamp(),
            record.level(),
            record.target(),
            record.args()
        );
        self.write_raw(&line);
        if self.mirror_stderr {
            eprint!("{}", line);
        }
    }
}

static LOGGER: OnceLock<Mutex<DebugLogger>> = OnceLock::new();

/// Path of the log file.
pub fn log_path() -> PathBuf {
    std::env::temp_dir().join(LOG_FILE_NAME)
}

fn get_timestamp() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}.{:06}", now.as_secs(), now.subsec_micros())
}

/// Parse a `RUST_LOG` value. Only a bare level is understood.
fn level_from_env(value: Option<&str>) -> Option<log::LevelFilter> {
    value?.trim().parse().ok()
}

/// Pick the effective level: CLI, then `RUST_LOG`, then info.
pub fn resolve_level(
    cli_level: Option<log::LevelFilter>,
    rust_log: Option<&str>,
) -> log::LevelFilter {
    cli_level
        .or_else(|| level_from_env(rust_log))
        .unwrap_or(log::LevelFilter::Info)
}

struct LogBridge;

impl log::Log for LogBridge {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Some(logger) = LOGGER.get() {
            logger.lock().write_record(record);
        }
    }

    fn flush(&self) {
        if let Some(logger) = LOGGER.get() {
            let mut logger = logger.lock();
            if let Some(ref mut file) = logger.file {
                let _ = file.flush();
            }
        }
    }
}

static BRIDGE: LogBridge = LogBridge;

/// Install the file logger. Later calls only adjust the level.
pub fn init_log_bridge(cli_level: Option<log::LevelFilter>) -> log::LevelFilter {
    let rust_log = std::env::var("RUST_LOG").ok();
    let level = resolve_level(cli_level, rust_log.as_deref());

    LOGGER.get_or_init(|| Mutex::new(DebugLogger::open(level, rust_log.is_some())));
    if log::set_logger(&BRIDGE).is_err() {
        log::debug!("logger already installed");
    }
    log::set_max_level(level);
    level
}
