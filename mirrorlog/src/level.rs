// ===== Уровни логгирования =====

/// Уровни в порядке возрастания важности. Числовые приоритеты совпадают
/// с классическими константами мобильной консоли (VERBOSE = 2 … ASSERT = 7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Verbose,
    Debug,
    Info,
    Warn,
    Error,
    Assert,
}

impl Level {
    pub const ALL: [Level; 6] = [
        Level::Verbose,
        Level::Debug,
        Level::Info,
        Level::Warn,
        Level::Error,
        Level::Assert,
    ];

    pub fn priority(self) -> u8 {
        match self {
            Level::Verbose => 2,
            Level::Debug => 3,
            Level::Info => 4,
            Level::Warn => 5,
            Level::Error => 6,
            Level::Assert => 7,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Level::Verbose => "VERBOSE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Assert => "ASSERT",
        }
    }

    /// Однобуквенная метка для консольного вывода: `W/tag: message`.
    pub fn letter(self) -> char {
        match self {
            Level::Verbose => 'V',
            Level::Debug => 'D',
            Level::Info => 'I',
            Level::Warn => 'W',
            Level::Error => 'E',
            Level::Assert => 'A',
        }
    }

    #[cfg(target_os = "linux")]
    pub(crate) fn to_syslog_level(self) -> syslog::Severity {
        use syslog::Severity::*;
        match self {
            Level::Verbose | Level::Debug => LOG_DEBUG,
            Level::Info => LOG_INFO,
            Level::Warn => LOG_WARNING,
            Level::Error => LOG_ERR,
            Level::Assert => LOG_CRIT,
        }
    }

    #[cfg(target_os = "windows")]
    pub(crate) fn to_winlog_level(self) -> winlog_rs::LogLevel {
        match self {
            Level::Verbose => winlog_rs::LogLevel::Verbose,
            Level::Debug => winlog_rs::LogLevel::Debug,
            Level::Info => winlog_rs::LogLevel::Info,
            Level::Warn => winlog_rs::LogLevel::Warn,
            Level::Error => winlog_rs::LogLevel::Error,
            Level::Assert => winlog_rs::LogLevel::Assert,
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
