use crate::severity::LogSeverity;
use crate::systime::now;
use once_cell::sync::OnceCell;

static MIN_SEVERITY: OnceCell<LogSeverity> = OnceCell::new();

/// Installs the process-wide minimum severity. Only the first call wins, so
/// several worlds sharing a process agree on one threshold.
pub fn init(min_severity: LogSeverity) -> bool {
    MIN_SEVERITY.set(min_severity).is_ok()
}

pub fn min_severity() -> LogSeverity {
    MIN_SEVERITY.get().copied().unwrap_or(LogSeverity::Info)
}

pub fn enabled(log_severity: LogSeverity) -> bool {
    log_severity >= min_severity()
}

pub fn log(msg: String, log_severity: LogSeverity) {
    if enabled(log_severity) {
        println!("[{}] {} {}", log_severity, now(), msg);
    }
}
