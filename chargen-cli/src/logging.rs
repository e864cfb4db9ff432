//! Minimal stderr logger for the `log` facade.

use std::fmt;
use std::io::IsTerminal;

use log::{Level, LevelFilter, Log, Metadata, Record};

/// Environment variable that overrides the command-line verbosity.
pub const LOG_ENV: &str = "CHARGEN_LOG";

static LOGGER: StderrLogger = StderrLogger;

/// Install the logger. `-q` wins over `-v`; `CHARGEN_LOG` wins over both.
pub fn init(verbose: u8, quiet: bool) {
    let from_flags = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };
    let level = match std::env::var(LOG_ENV).ok().as_deref() {
        Some("off") => LevelFilter::Off,
        Some("error") => LevelFilter::Error,
        Some("warn") => LevelFilter::Warn,
        Some("info") => LevelFilter::Info,
        Some("debug") => LevelFilter::Debug,
        Some("trace") => LevelFilter::Trace,
        _ => from_flags,
    };

    // Only fails if a logger is already installed; keep that one.
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level);
}

/// Add escape sequence to print with color in a terminal
macro_rules! with_color {
    ($args: ident, $color_code: ident) => {{
        format_args!("\u{1B}[{}m{}\u{1B}[0m", $color_code as u8, $args)
    }};
}

fn print_in_color(args: fmt::Arguments, color_code: u8) {
    eprintln!("{}", with_color!(args, color_code));
}

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if std::io::stderr().is_terminal() {
            print_in_color(
                format_args!(
                    "[{:>5}][{}] {}",
                    record.level(),
                    record.target(),
                    record.args()
                ),
                level_to_color_code(record.level()),
            );
        } else {
            eprintln!(
                "[{:>5}][{}] {}",
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {}
}

fn level_to_color_code(level: Level) -> u8 {
    match level {
        Level::Error => 31, // Red
        Level::Warn => 93,  // BrightYellow
        Level::Info => 34,  // Blue
        Level::Debug => 32, // Green
        Level::Trace => 90, // BrightBlack
    }
}
