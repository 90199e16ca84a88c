use std::fs::OpenOptions;
use std::path::Path;

use launchgate_platform::AppPaths;
#[cfg(debug_assertions)]
use simplelog::{ColorChoice, TermLogger, TerminalMode};
use simplelog::{CombinedLogger, ConfigBuilder, LevelFilter, SharedLogger, WriteLogger};

use crate::settings::GateSettings;

/// Install the global logger: the gate's log file, plus stderr in debug
/// builds. A log file that cannot be opened is skipped, never fatal.
pub fn init_logging(paths: &AppPaths, settings: &GateSettings) {
    let log_path = paths.log_file();
    let _ = paths.ensure_dirs();
    shrink_log(&log_path, settings.max_log_size_bytes);

    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .add_filter_allow_str("launchgate")
        .build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();

    #[cfg(debug_assertions)]
    loggers.push(TermLogger::new(
        LevelFilter::Debug,
        config.clone(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ));

    match OpenOptions::new().create(true).append(true).open(&log_path) {
        Ok(file) => loggers.push(WriteLogger::new(LevelFilter::Debug, config, file)),
        Err(error) => eprintln!(
            "launchgate: logging to {} disabled: {error}",
            log_path.display()
        ),
    }

    if !loggers.is_empty() {
        let _ = CombinedLogger::init(loggers);
    }
    log::set_max_level(max_level(settings.debug_logging));

    if settings.debug_logging {
        log::info!("Debug logging enabled, writing to {}", log_path.display());
    }
}

/// Fetch failures are logged as warnings, so they reach the file even when
/// debug logging is off.
fn max_level(debug_logging: bool) -> log::LevelFilter {
    if debug_logging {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    }
}

/// Cut an oversized log down to roughly half of `max_bytes`, keeping the
/// newest whole lines.
fn shrink_log(log_path: &Path, max_bytes: u64) {
    let Ok(contents) = std::fs::read(log_path) else {
        return;
    };
    let len = contents.len() as u64;
    if len <= max_bytes {
        return;
    }

    let keep = usize::try_from(max_bytes / 2).unwrap_or(usize::MAX);
    let tail = &contents[contents.len().saturating_sub(keep)..];
    let tail = match tail.iter().position(|&b| b == b'\n') {
        Some(newline) => &tail[newline + 1..],
        None => &[][..],
    };
    let _ = std::fs::write(log_path, tail);
}

#[cfg(test)]
mod tests {
    use super::{max_level, shrink_log};

    #[test]
    fn shrink_log_keeps_newest_whole_lines() {
        let temp_dir = tempfile::tempdir().expect("temporary directory should be created");
        let log_path = temp_dir.path().join("launchgate.log");
        std::fs::write(&log_path, "cycle 1 fetched\ncycle 2 fetched\ncycle 3 fetched\n")
            .expect("test log file should be written");

        shrink_log(&log_path, 40);

        let kept = std::fs::read_to_string(&log_path).expect("log file should be readable");
        assert_eq!(kept, "cycle 3 fetched\n");
    }

    #[test]
    fn shrink_log_leaves_small_files_alone() {
        let temp_dir = tempfile::tempdir().expect("temporary directory should be created");
        let log_path = temp_dir.path().join("launchgate.log");
        std::fs::write(&log_path, "cycle 1 fetched\n").expect("test log file should be written");

        shrink_log(&log_path, 1024);

        assert_eq!(
            std::fs::read_to_string(&log_path).expect("log file should be readable"),
            "cycle 1 fetched\n"
        );
    }

    #[test]
    fn shrink_log_ignores_missing_file() {
        let temp_dir = tempfile::tempdir().expect("temporary directory should be created");
        let log_path = temp_dir.path().join("missing.log");

        shrink_log(&log_path, 10);

        assert!(!log_path.exists());
    }

    #[test]
    fn warnings_survive_with_debug_logging_off() {
        assert_eq!(max_level(true), log::LevelFilter::Debug);
        assert_eq!(max_level(false), log::LevelFilter::Warn);
    }
}
