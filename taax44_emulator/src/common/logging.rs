//! Utilities for configuring logging
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::Once;

use colored::*;
use env_logger::Logger;
use log::LevelFilter;
use log::Log;
use log::Record;

static ONCE_INIT: Once = Once::new();

static TRACE_CONTEXT_LINES: usize = 20;

/// Prints one line per record, tagged with its level letter and component target.
///
/// The MCU touches its ports every instruction cycle, so `ports` and `vfd` trace records are
/// only held back in a short backlog. When an NVRAM mode change, an ASP frame or an error is
/// logged, the backlog is printed first to show the port accesses that led up to it.
struct Taax44Logger {
    /// Contains the last `TRACE_CONTEXT_LINES` of trace-level logs, newest first.
    trace_logs: Mutex<VecDeque<String>>,
    logger: Logger,
}

impl Taax44Logger {
    pub fn new(logger: Logger) -> Self {
        log::set_max_level(logger.filter());
        Self {
            trace_logs: Mutex::new(VecDeque::new()),
            logger,
        }
    }

    fn format_record(&self, record: &Record) -> String {
        let target = format!("[{}]", record.target()).dimmed();
        match record.level() {
            log::Level::Error => format!(
                "{} {} {}",
                "E".red().bold(),
                target,
                record.args().to_string().red()
            ),
            log::Level::Warn => format!(
                "{} {} {}",
                "W".yellow().bold(),
                target,
                record.args().to_string().yellow()
            ),
            log::Level::Info => format!("{} {} {}", "I".blue().bold(), target, record.args()),
            log::Level::Debug => format!("{} {} {}", "D".blue(), target, record.args()),
            log::Level::Trace => format!("{} {}", target, record.args().to_string().dimmed()),
        }
    }
}

impl Log for Taax44Logger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.logger.enabled(metadata)
    }

    fn log(&self, record: &Record) {
        if !self.logger.matches(record) {
            return;
        }
        let record_str = self.format_record(record);
        let Ok(mut trace_logs) = self.trace_logs.lock() else {
            return;
        };
        if record.level() == LevelFilter::Trace {
            trace_logs.push_front(record_str);
            trace_logs.truncate(TRACE_CONTEXT_LINES);
        } else {
            if trace_logs.len() == TRACE_CONTEXT_LINES {
                println!("{}", "...".dimmed());
            }
            for log in trace_logs.drain(0..).rev() {
                println!("{}", log);
            }
            println!("{}", record_str);
        }
    }

    fn flush(&self) {}
}

fn install(filter_config: &str) {
    let filter = env_logger::builder().parse_filters(filter_config).build();
    // Fails only if another logger has been installed already, which we can ignore.
    let _ = log::set_boxed_logger(Box::new(Taax44Logger::new(filter)));
}

/// Installs the logger. Filters are read from `TAAX44_LOG` and default to `error`.
pub fn init() {
    ONCE_INIT.call_once(|| {
        let filter_config = std::env::var("TAAX44_LOG").unwrap_or("error".to_string());
        install(&filter_config);
    });
}

pub fn test_init(verbose: bool) {
    ONCE_INIT.call_once(|| {
        let filter_config = std::env::var("TAAX44_LOG").unwrap_or(
            if verbose {
                "info,ports=trace"
            } else {
                "warn"
            }
            .to_string(),
        );
        install(&filter_config);
    });
}
