//! Terminal logger.
//!
//! Normal output is printed through `log::info!`, so the logger writes info
//! records to stdout without decoration and everything else to stderr with a
//! level prefix. `--quiet` raises the level to warn, `--verbose` lowers it to
//! debug and adds timestamps. `RUST_LOG` is applied on top of either.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;

use env_logger::{Builder, Logger};
use log::{Level, LevelFilter, Log, Metadata, Record};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;

struct CliLogger {
    /// Used only for its level and `RUST_LOG` directive matching
    filter: Logger,
    timestamps: bool,
    logfile: Option<Mutex<BufWriter<File>>>,
}

impl CliLogger {
    fn format(&self, record: &Record) -> String {
        let message = record.args().to_string();
        let line = match record.level() {
            Level::Info => message,
            Level::Warn => format!(
                "{} {message}",
                "warning:".if_supports_color(Stderr, |t| t.yellow())
            ),
            Level::Error => format!(
                "{} {message}",
                "error:".if_supports_color(Stderr, |t| t.red())
            ),
            Level::Debug | Level::Trace => format!(
                "{} {message}",
                format!("[{}]", record.target()).if_supports_color(Stderr, |t| t.dimmed())
            ),
        };
        if self.timestamps {
            format!("{} {line}", chrono::Local::now().format("%H:%M:%S%.3f"))
        } else {
            line
        }
    }
}

impl Log for CliLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.filter.enabled(metadata)
    }

    fn log(&self, record: &Record) {
        if !self.filter.matches(record) {
            return;
        }
        let line = self.format(record);

        if record.level() == Level::Info {
            let _ = writeln!(io::stdout().lock(), "{line}");
        } else {
            let _ = writeln!(io::stderr().lock(), "{line}");
        }

        if let Some(file) = &self.logfile
            && let Ok(mut file) = file.lock()
        {
            let _ = writeln!(file, "{}", strip_ansi_escapes::strip_str(&line));
        }
    }

    fn flush(&self) {
        let _ = io::stdout().flush();
        if let Some(file) = &self.logfile
            && let Ok(mut file) = file.lock()
        {
            let _ = file.flush();
        }
    }
}

/// Install the process-wide logger.
pub(crate) fn init(quiet: bool, verbose: bool, logfile: Option<&Path>) -> io::Result<()> {
    let level = if verbose {
        LevelFilter::Debug
    } else if quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    };

    let filter = build_filter(level, std::env::var("RUST_LOG").ok().as_deref());

    let logfile = match logfile {
        Some(path) => Some(Mutex::new(BufWriter::new(File::create(path)?))),
        None => None,
    };

    log::set_max_level(filter.filter());
    log::set_boxed_logger(Box::new(CliLogger {
        filter,
        timestamps: verbose,
        logfile,
    }))
    .map_err(io::Error::other)
}

/// Level filter from the command-line level, overridden by `RUST_LOG`
/// directives when present.
fn build_filter(level: LevelFilter, directives: Option<&str>) -> Logger {
    let mut builder = Builder::new();
    builder.filter_level(level);
    if let Some(directives) = directives {
        builder.parse_filters(directives);
    }
    builder.build()
}

/// Print an empty line at info level.
pub(crate) fn log_blank() {
    log::info!("");
}
