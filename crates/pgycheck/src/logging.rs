#[cfg(debug_assertions)]
use simplelog::{ColorChoice, TermLogger, TerminalMode};
use simplelog::{CombinedLogger, Config, ConfigBuilder, LevelFilter, SharedLogger, WriteLogger};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Appends to a log file, reopening it if it disappears between writes.
struct ReopeningLogFile {
    path: PathBuf,
    file: Mutex<Option<File>>,
}

impl ReopeningLogFile {
    fn open(path: PathBuf) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            file: Mutex::new(Some(file)),
        })
    }

    fn with_file<T>(&self, action: impl FnOnce(&mut File) -> io::Result<T>) -> io::Result<T> {
        let mut guard = self
            .file
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        if !self.path.exists() {
            if let Some(parent) = self.path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            *guard = Some(
                OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&self.path)?,
            );
        }

        match guard.as_mut() {
            Some(file) => action(file),
            None => Err(io::Error::other("log file not available")),
        }
    }
}

impl Write for ReopeningLogFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.with_file(|file| file.write(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.with_file(|file| file.flush())
    }
}

/// Drop the older half of the log once it grows past `max_log_size`.
fn trim_log_file_if_oversized(log_path: &Path, max_log_size: u64) {
    if let Ok(metadata) = std::fs::metadata(log_path)
        && metadata.len() > max_log_size
        && let Ok(contents) = std::fs::read(log_path)
    {
        let half = contents.len() / 2;
        let keep_from = contents[half..]
            .iter()
            .position(|&b| b == b'\n')
            .map_or(half, |pos| half + pos + 1);
        let _ = std::fs::write(log_path, &contents[keep_from..]);
    }
}

/// File logger plus, in debug builds, a stderr logger.
fn loggers(log_file: Option<ReopeningLogFile>, config: Config) -> Vec<Box<dyn SharedLogger>> {
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();

    if let Some(writer) = log_file {
        loggers.push(WriteLogger::new(LevelFilter::Debug, config.clone(), writer));
    }

    #[cfg(debug_assertions)]
    loggers.push(TermLogger::new(
        LevelFilter::Debug,
        config,
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ));

    loggers
}

/// Log to `log_path`, and to stderr in debug builds. Output stays off unless
/// `debug_enabled`.
pub fn init_logging(log_path: Option<PathBuf>, debug_enabled: bool, max_log_size: u64) {
    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .add_filter_allow_str("pgycheck")
        .build();

    let log_file = log_path.as_ref().and_then(|log_path| {
        trim_log_file_if_oversized(log_path, max_log_size);
        ReopeningLogFile::open(log_path.clone()).ok()
    });

    let _ = CombinedLogger::init(loggers(log_file, config));

    set_logging_enabled(debug_enabled);

    if debug_enabled && let Some(log_path) = log_path {
        log::info!("Debug logging enabled, log file: {}", log_path.display());
    }
}

pub fn set_logging_enabled(enabled: bool) {
    if enabled {
        log::set_max_level(log::LevelFilter::Debug);
    } else {
        log::set_max_level(log::LevelFilter::Off);
    }
}
