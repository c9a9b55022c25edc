/// Structured logging for the coastal risk engine
///
/// Provides context-rich log lines tagged with the emitting component and,
/// where relevant, the sensor / alert / prediction id involved. Supports
/// console output and append-to-file logging for long-running use.

use chrono::Utc;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Mutex;

use crate::model::{RiskAssessment, RiskError, RiskLevel};

// ---------------------------------------------------------------------------
// Log Levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level: {}", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Classifier,
    Aggregator,
    Ingest,
    Config,
    System,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::Classifier => write!(f, "CLASSIFY"),
            Component::Aggregator => write!(f, "RISK"),
            Component::Ingest => write!(f, "INGEST"),
            Component::Config => write!(f, "CONFIG"),
            Component::System => write!(f, "SYS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Logger Configuration
// ---------------------------------------------------------------------------

/// Global logger instance. Nothing is emitted until `init_logger` or
/// `init_stderr_logger` runs.
static LOGGER: Mutex<Option<Logger>> = Mutex::new(None);

pub struct Logger {
    /// Minimum log level to display
    min_level: LogLevel,
    /// Optional file path for logging
    log_file: Option<String>,
    /// Whether to include timestamps in console output
    console_timestamps: bool,
    /// Send every console line to stderr, keeping stdout for program output
    stderr_only: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConsoleStream {
    Stdout,
    Stderr,
}

impl Logger {
    fn stream_for(&self, level: LogLevel) -> ConsoleStream {
        match level {
            LogLevel::Error | LogLevel::Warning => ConsoleStream::Stderr,
            LogLevel::Info | LogLevel::Debug if self.stderr_only => ConsoleStream::Stderr,
            LogLevel::Info | LogLevel::Debug => ConsoleStream::Stdout,
        }
    }

    fn log(&self, level: LogLevel, component: Component, entity_id: Option<&str>, message: &str) {
        if level < self.min_level {
            return;
        }

        let entry = format_entry(level, component, entity_id, message);
        let entity_part = entity_id.map(|s| format!(" [{}]", s)).unwrap_or_default();

        let line = if self.console_timestamps {
            entry.clone()
        } else {
            match level {
                LogLevel::Error => format!("   ✗ {}{}: {}", component, entity_part, message),
                LogLevel::Warning => format!("   ⚠ {}{}: {}", component, entity_part, message),
                LogLevel::Info => format!("   {}", message),
                LogLevel::Debug => format!("   [DEBUG] {}", message),
            }
        };
        match self.stream_for(level) {
            ConsoleStream::Stdout => println!("{}", line),
            ConsoleStream::Stderr => eprintln!("{}", line),
        }

        if let Some(ref path) = self.log_file {
            if let Err(e) = Self::append_to_file(path, &entry) {
                eprintln!("Failed to write to log file {}: {}", path, e);
            }
        }
    }

    fn append_to_file(path: &str, entry: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", entry)?;
        Ok(())
    }
}

/// One log line as written to files and timestamped console output.
pub fn format_entry(
    level: LogLevel,
    component: Component,
    entity_id: Option<&str>,
    message: &str,
) -> String {
    let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
    let entity_part = entity_id.map(|s| format!(" [{}]", s)).unwrap_or_default();
    format!("{} {} {}{}: {}", timestamp, level, component, entity_part, message)
}

// ---------------------------------------------------------------------------
// Public Logging Functions
// ---------------------------------------------------------------------------

/// Initialize the global logger
pub fn init_logger(min_level: LogLevel, log_file: Option<&str>, console_timestamps: bool) {
    install(Logger {
        min_level,
        log_file: log_file.map(String::from),
        console_timestamps,
        stderr_only: false,
    });
}

/// Initialize the global logger with all console output on stderr, for
/// commands whose stdout is machine-read.
pub fn init_stderr_logger(min_level: LogLevel, log_file: Option<&str>, console_timestamps: bool) {
    install(Logger {
        min_level,
        log_file: log_file.map(String::from),
        console_timestamps,
        stderr_only: true,
    });
}

fn install(logger: Logger) {
    // A poisoned lock only means another thread panicked mid-log; the
    // slot itself is still usable.
    let mut slot = LOGGER.lock().unwrap_or_else(|e| e.into_inner());
    *slot = Some(logger);
}

fn emit(level: LogLevel, component: Component, entity_id: Option<&str>, message: &str) {
    if let Ok(guard) = LOGGER.lock() {
        if let Some(logger) = guard.as_ref() {
            logger.log(level, component, entity_id, message);
        }
    }
}

/// Log a general informational message
pub fn info(component: Component, entity_id: Option<&str>, message: &str) {
    emit(LogLevel::Info, component, entity_id, message);
}

/// Log a warning message
pub fn warn(component: Component, entity_id: Option<&str>, message: &str) {
    emit(LogLevel::Warning, component, entity_id, message);
}

/// Log an error message
pub fn error(component: Component, entity_id: Option<&str>, message: &str) {
    emit(LogLevel::Error, component, entity_id, message);
}

/// Log a debug message
pub fn debug(component: Component, entity_id: Option<&str>, message: &str) {
    emit(LogLevel::Debug, component, entity_id, message);
}

// ---------------------------------------------------------------------------
// Engine-specific helpers
// ---------------------------------------------------------------------------

/// Log level used to report an assessment: the riskier, the louder.
pub fn level_for_risk(level: RiskLevel) -> LogLevel {
    match level {
        RiskLevel::Low | RiskLevel::Medium => LogLevel::Info,
        RiskLevel::High => LogLevel::Warning,
        RiskLevel::Critical => LogLevel::Error,
    }
}

/// Log a one-line summary of a risk assessment
pub fn log_assessment_summary(assessment: &RiskAssessment) {
    let factors = if assessment.risk_factors.is_empty() {
        "no risk factors".to_string()
    } else {
        assessment.risk_factors.join("; ")
    };
    let message = format!(
        "Risk {} (score {}): {}",
        assessment.risk_level, assessment.risk_score, factors
    );
    emit(level_for_risk(assessment.risk_level), Component::Aggregator, None, &message);
}

/// Log an input that was rejected, tagged with the offending entity id
pub fn log_rejection(component: Component, err: &RiskError) {
    match err {
        RiskError::IncompleteEntity { id, .. } => {
            error(component, Some(id), &format!("Rejected snapshot: {}", err))
        }
        _ => error(component, None, &err.to_string()),
    }
}
