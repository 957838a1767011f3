use crate::error::Result;
use crate::level::Level;
use std::io::{self, Write};
#[cfg(target_os = "linux")]
use std::sync::Mutex;

// ===== Консоль (внешний приёмник) =====

/// Платформенный консольный лог. Возвращаемое значение — "запись принята":
/// только принятые записи дублируются в файл.
pub trait ConsoleSink: Send + Sync {
    fn log(&self, level: Level, tag: &str, message: &str) -> bool;
}

/// Пишет `W/tag: message` в stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrConsole;

impl ConsoleSink for StderrConsole {
    fn log(&self, level: Level, tag: &str, message: &str) -> bool {
        let mut err = io::stderr().lock();
        writeln!(err, "{}/{}: {}", level.letter(), tag, message).is_ok()
    }
}

/// Отклоняет всё — файл при нём не пишется никогда.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullConsole;

impl ConsoleSink for NullConsole {
    fn log(&self, _level: Level, _tag: &str, _message: &str) -> bool {
        false
    }
}

// ===== Системные логгеры (платформозависимо) =====

#[cfg(target_os = "linux")]
type SystemLogger = syslog::Logger<syslog::LoggerBackend, syslog::Formatter3164>;

#[cfg(target_os = "windows")]
type SystemLogger = winlog_rs::WinEventLogger;

/// syslog на Linux, Event Log на Windows, stderr на остальных платформах.
pub struct SystemConsole {
    app_name: String,
    #[cfg(target_os = "linux")]
    logger: Mutex<SystemLogger>,
    #[cfg(target_os = "windows")]
    logger: SystemLogger,
}

impl SystemConsole {
    #[cfg(target_os = "linux")]
    pub fn new(app_name: &str) -> Result<Self> {
        let formatter = syslog::Formatter3164 {
            facility: syslog::Facility::LOG_USER,
            hostname: None,
            process: app_name.to_owned(),
            pid: std::process::id(),
        };
        let logger =
            syslog::unix(formatter).map_err(|e| crate::LogError::SystemLogger(e.to_string()))?;
        Ok(SystemConsole {
            app_name: app_name.to_owned(),
            logger: Mutex::new(logger),
        })
    }

    #[cfg(target_os = "windows")]
    pub fn new(app_name: &str) -> Result<Self> {
        Ok(SystemConsole {
            app_name: app_name.to_owned(),
            logger: winlog_rs::WinEventLogger::new(app_name),
        })
    }

    #[cfg(not(any(target_os = "linux", target_os = "windows")))]
    pub fn new(app_name: &str) -> Result<Self> {
        if app_name.is_empty() {
            return Err(crate::LogError::SystemLogger("empty application name".to_owned()));
        }
        Ok(SystemConsole {
            app_name: app_name.to_owned(),
        })
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }
}

impl ConsoleSink for SystemConsole {
    #[cfg(target_os = "linux")]
    fn log(&self, level: Level, tag: &str, message: &str) -> bool {
        let line = format!("[{}] {}", tag, message);
        let mut logger = match self.logger.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let written = match level.to_syslog_level() {
            syslog::Severity::LOG_DEBUG => logger.debug(line),
            syslog::Severity::LOG_INFO => logger.info(line),
            syslog::Severity::LOG_WARNING => logger.warning(line),
            syslog::Severity::LOG_ERR => logger.err(line),
            _ => logger.crit(line),
        };
        written.is_ok()
    }

    #[cfg(target_os = "windows")]
    fn log(&self, level: Level, tag: &str, message: &str) -> bool {
        self.logger.report(level.to_winlog_level(), tag, message)
    }

    #[cfg(not(any(target_os = "linux", target_os = "windows")))]
    fn log(&self, level: Level, tag: &str, message: &str) -> bool {
        StderrConsole.log(level, tag, message)
    }
}
