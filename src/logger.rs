use log::{Level, LevelFilter, Log, Metadata, Record};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;
use time::OffsetDateTime;
use time::macros::format_description;

pub enum LogOutput {
    Stdout,
    Stderr,
}

pub struct Logger {
    pub write_to_std: Option<LogOutput>,
    pub severity: Level,
    pub file: Option<Mutex<File>>,
    pub enable_colors: bool,
}

impl Logger {
    /// Create a new logger. When `file_path` is given, records are also
    /// appended to that file.
    pub fn new(
        file_path: Option<PathBuf>,
        severity: Option<Level>,
        write_to_std: Option<LogOutput>,
        enable_colors: bool,
    ) -> Self {
        let file = file_path.and_then(|path| {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            OpenOptions::new().create(true).append(true).open(path).ok().map(Mutex::new)
        });

        Logger {
            write_to_std,
            severity: severity.unwrap_or(Level::Info),
            file,
            enable_colors,
        }
    }

    /// Current UTC time as HH:MM:SS
    fn timestamp() -> String {
        OffsetDateTime::now_utc()
            .format(format_description!("[hour]:[minute]:[second]"))
            .unwrap_or_default()
    }

    fn color(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1b[31m",
            Level::Warn => "\x1b[33m",
            Level::Info => "\x1b[36m",
            Level::Debug => "\x1b[35m",
            Level::Trace => "\x1b[37m",
        }
    }

    /// Parse a level name, falling back to `info`
    pub fn parse_level(value: Option<&str>) -> Level {
        value.and_then(|v| v.trim().parse::<Level>().ok()).unwrap_or(Level::Info)
    }

    /// Install the logger, configured from `WIKI_LOG` (or `RUST_LOG`),
    /// `WIKI_LOG_FILE` and `NO_COLOR`
    pub fn init() -> Result<(), log::SetLoggerError> {
        let level_var = std::env::var("WIKI_LOG").or_else(|_| std::env::var("RUST_LOG")).ok();
        let severity = Self::parse_level(level_var.as_deref());
        let file_path = std::env::var("WIKI_LOG_FILE").ok().map(PathBuf::from);
        let enable_colors = std::env::var("NO_COLOR").is_err();

        let logger = Logger::new(file_path, Some(severity), Some(LogOutput::Stderr), enable_colors);
        let max_level = logger.max_level();
        log::set_logger(Box::leak(Box::new(logger)))?;
        log::set_max_level(max_level);
        Ok(())
    }

    /// Global filter matching `severity`, so disabled records never format
    /// their arguments
    pub fn max_level(&self) -> LevelFilter {
        self.severity.to_level_filter()
    }

    fn format(&self, record: &Record, colored: bool) -> String {
        let timestamp = Self::timestamp();
        let level = record.level();
        let args = record.args();
        if colored {
            let color = Self::color(level);
            format!("{color}[{timestamp}] {level}\x1b[0m {args}\n")
        } else {
            format!("[{timestamp}] {level} {args}\n")
        }
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.severity
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        match &self.write_to_std {
            Some(LogOutput::Stdout) => {
                let _ = std::io::stdout().write_all(self.format(record, self.enable_colors).as_bytes());
            }
            Some(LogOutput::Stderr) => {
                let _ = std::io::stderr().write_all(self.format(record, self.enable_colors).as_bytes());
            }
            None => {}
        }

        // File output never carries colors
        if let Some(file) = &self.file {
            if let Ok(mut guard) = file.lock() {
                let _ = guard.write_all(self.format(record, false).as_bytes());
            }
        }
    }

    fn flush(&self) {
        let _ = std::io::stdout().flush();
        let _ = std::io::stderr().flush();
        if let Some(file) = &self.file {
            if let Ok(mut guard) = file.lock() {
                let _ = guard.flush();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn parses_levels() {
        assert_eq!(Logger::parse_level(Some("debug")), Level::Debug);
        assert_eq!(Logger::parse_level(Some("WARN")), Level::Warn);
        assert_eq!(Logger::parse_level(Some("nonsense")), Level::Info);
        assert_eq!(Logger::parse_level(None), Level::Info);
    }

    #[test]
    fn filters_by_severity() {
        let logger = Logger::new(None, Some(Level::Warn), None, false);
        let warn = Metadata::builder().level(Level::Warn).build();
        let info = Metadata::builder().level(Level::Info).build();
        assert!(logger.enabled(&warn));
        assert!(!logger.enabled(&info));
    }

    #[test]
    fn max_level_follows_severity() {
        assert_eq!(Logger::new(None, None, None, false).max_level(), LevelFilter::Info);
        assert_eq!(Logger::new(None, Some(Level::Debug), None, false).max_level(), LevelFilter::Debug);
        assert_eq!(Logger::new(None, Some(Level::Error), None, false).max_level(), LevelFilter::Error);
    }

    #[test]
    fn writes_uncolored_records_to_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("logs").join("wiki.log");
        let logger = Logger::new(Some(path.clone()), Some(Level::Info), None, true);

        logger.log(
            &Record::builder()
                .level(Level::Info)
                .args(format_args!("saved page '{}'", "Test"))
                .build(),
        );
        logger.flush();

        let written = std::fs::read_to_string(path).unwrap();
        assert!(written.contains("INFO saved page 'Test'"));
        assert!(!written.contains('\x1b'));
    }
}
