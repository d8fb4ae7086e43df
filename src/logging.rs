//! `log` backend for targets without an operating system.
//!
//! Records are written as one coloured line per record into a [`Console`].

use core::fmt::{self, Write};

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

use crate::config::DEFAULT_LOG_LEVEL;

/// Output sink for log lines, typically a UART or firmware console.
pub trait Console: Sync {
    fn write_str(&self, s: &str);
}

struct ConsoleWriter<'a>(&'a dyn Console);

impl Write for ConsoleWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0.write_str(s);
        Ok(())
    }
}

pub struct SimpleLogger {
    console: &'static dyn Console,
}

impl SimpleLogger {
    pub const fn new(console: &'static dyn Console) -> Self {
        Self { console }
    }
}

impl Log for SimpleLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true // filtering is left to log::max_level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let color = match record.level() {
            Level::Error => 31, // Red
            Level::Warn => 93,  // BrightYellow
            Level::Info => 34,  // Blue
            Level::Debug => 32, // Green
            Level::Trace => 90, // BrightBlack
        };

        let display_level = match record.level() {
            Level::Error => "ERR",
            Level::Warn => "WRN",
            Level::Info => "INF",
            Level::Debug => "DBG",
            Level::Trace => "TRC",
        };

        writeln!(
            ConsoleWriter(self.console),
            "\u{1B}[{}m[{}] {}\u{1B}[0m",
            color,
            display_level,
            record.args()
        )
        .ok();
    }

    fn flush(&self) {}
}

/// Level named by the `LOG` build-time variable, `INFO` when unset or unknown.
pub fn level_filter(name: Option<&str>) -> LevelFilter {
    match name.unwrap_or(DEFAULT_LOG_LEVEL) {
        "ERROR" => LevelFilter::Error,
        "WARN" => LevelFilter::Warn,
        "INFO" => LevelFilter::Info,
        "DEBUG" => LevelFilter::Debug,
        "TRACE" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

/// Install `logger` as the global logger.
pub fn init(logger: &'static SimpleLogger) -> Result<(), SetLoggerError> {
    log::set_logger(logger)?;
    log::set_max_level(level_filter(option_env!("LOG")));
    Ok(())
}

/// Install a logger writing to the SBI firmware console.
#[cfg(all(any(target_arch = "riscv32", target_arch = "riscv64"), target_os = "none"))]
pub fn init_sbi() -> Result<(), SetLoggerError> {
    static LOGGER: SimpleLogger = SimpleLogger::new(&crate::sbi::SbiConsole);
    init(&LOGGER)
}
