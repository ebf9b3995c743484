use log::{error, info, LevelFilter};
use std::path::Path;

// For file-based logging with rotation
use log4rs::append::rolling_file::policy::compound::roll::fixed_window::FixedWindowRoller;
use log4rs::append::rolling_file::policy::compound::trigger::size::SizeTrigger;
use log4rs::append::rolling_file::policy::compound::CompoundPolicy;
use log4rs::append::rolling_file::RollingFileAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

use crate::error::{Error, Result};

/// Rotate the active log once it reaches this size
const LOG_ROTATE_BYTES: u64 = 10 * 1024 * 1024;

/// Number of archived log files kept
const LOG_ARCHIVES: u32 = 5;

/// Initialize a rolling file logger in `log_dir`.
///
/// Used for unattended runs (e.g. from a timer on the photo frame), where
/// nobody watches the console.
pub fn init_logger(log_dir: &Path, level: LevelFilter) -> Result<()> {
    let setup_error = |e: &dyn std::fmt::Display| Error::Configuration(format!("Logging: {}", e));

    std::fs::create_dir_all(log_dir)?;

    let log_file_path = log_dir.join("photo-deduper.log");
    let archived_logs_pattern = log_dir.join("photo-deduper.{}.log");

    let file_trigger = SizeTrigger::new(LOG_ROTATE_BYTES);
    let file_roller = FixedWindowRoller::builder()
        .build(&archived_logs_pattern.to_string_lossy(), LOG_ARCHIVES)
        .map_err(|e| setup_error(&e))?;
    let compound_policy = CompoundPolicy::new(Box::new(file_trigger), Box::new(file_roller));

    let rolling_file = RollingFileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] [{M}:{L}] - {m}{n}",
        )))
        .build(&log_file_path, Box::new(compound_policy))
        .map_err(|e| setup_error(&e))?;

    let config = Config::builder()
        .appender(Appender::builder().build("file", Box::new(rolling_file)))
        .build(Root::builder().appender("file").build(level))
        .map_err(|e| setup_error(&e))?;

    log4rs::init_config(config).map_err(|e| setup_error(&e))?;

    info!("Logging to file: {}", log_file_path.display());
    Ok(())
}

/// Log file operation that failed
pub fn log_file_error(path: &Path, operation: &str, error: &dyn std::error::Error) {
    error!(
        "File operation failed - Operation: {}, Path: {}, Error: {}",
        operation,
        path.display(),
        error
    );
}

/// Log hash computation error
pub fn log_hash_error(path: &Path, error: &dyn std::error::Error) {
    error!(
        "Hash computation failed - Path: {}, Error: {}",
        path.display(),
        error
    );
}

/// Log file system modification
pub fn log_fs_modification(operation: &str, path: &Path, details: Option<&str>) {
    let details_str = details.unwrap_or("");
    info!(
        "FS CHANGE - Operation: {}, Path: {}{}",
        operation,
        path.display(),
        if details_str.is_empty() {
            "".to_string()
        } else {
            format!(", Details: {}", details_str)
        }
    );
}
