//! # winlog-rs
//!
//! Запись в Windows Event Log.
//! Если кастомный источник не зарегистрирован — использует "Application" с префиксом.
//! `report` сообщает, попала ли запись в журнал: это сигнал "принято" для вызывающего.

#![cfg(windows)]

use std::ffi::CString;
use windows_sys::core::PCSTR;
use windows_sys::Win32::Foundation::PSID;
use windows_sys::Win32::System::EventLog::{
    DeregisterEventSource, RegisterEventSourceA, ReportEventA, EVENTLOG_ERROR_TYPE,
    EVENTLOG_INFORMATION_TYPE, EVENTLOG_WARNING_TYPE,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Verbose,
    Debug,
    Info,
    Warn,
    Error,
    Assert,
}

impl LogLevel {
    fn to_event_type(self) -> u16 {
        match self {
            LogLevel::Verbose | LogLevel::Debug | LogLevel::Info => EVENTLOG_INFORMATION_TYPE,
            LogLevel::Warn => EVENTLOG_WARNING_TYPE,
            LogLevel::Error | LogLevel::Assert => EVENTLOG_ERROR_TYPE,
        }
    }

    // ID события = приоритет уровня, чтобы в Event Viewer можно было фильтровать
    fn event_id(self) -> u32 {
        match self {
            LogLevel::Verbose => 1002,
            LogLevel::Debug => 1003,
            LogLevel::Info => 1004,
            LogLevel::Warn => 1005,
            LogLevel::Error => 1006,
            LogLevel::Assert => 1007,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WinEventLogger {
    preferred_source: String,
    fallback_source: &'static str,
}

impl WinEventLogger {
    pub fn new(preferred_source: &str) -> Self {
        Self {
            preferred_source: preferred_source.to_owned(),
            fallback_source: "Application",
        }
    }

    pub fn source(&self) -> &str {
        &self.preferred_source
    }

    /// Пишет `[tag] message`. Возвращает `true`, если событие записано
    /// хотя бы в один из источников.
    pub fn report(&self, level: LogLevel, tag: &str, message: &str) -> bool {
        let line = format!("[{}] {}", tag, message);
        if self.try_report(&self.preferred_source, level, &line) {
            return true;
        }

        let prefixed = format!("[{}] {}", self.preferred_source, line);
        self.try_report(self.fallback_source, level, &prefixed)
    }

    fn try_report(&self, source: &str, level: LogLevel, message: &str) -> bool {
        let c_source = match to_cstring(source) {
            Some(s) => s,
            None => return false,
        };
        let c_message = match to_cstring(message) {
            Some(s) => s,
            None => return false,
        };

        let source_ptr: PCSTR = c_source.as_ptr() as _;
        let msg_ptr: PCSTR = c_message.as_ptr() as _;

        let h_source = unsafe { RegisterEventSourceA(std::ptr::null(), source_ptr) };
        if h_source == 0 {
            return false;
        }

        let success: i32 = unsafe {
            ReportEventA(
                h_source,
                level.to_event_type(),
                0,
                level.event_id(),
                0 as PSID,
                1,
                0,
                &msg_ptr,
                std::ptr::null_mut(),
            )
        };

        let _ = unsafe { DeregisterEventSource(h_source) };

        success != 0
    }
}

// Внутренние NUL в CString недопустимы — заменяем, а не теряем сообщение
fn to_cstring(s: &str) -> Option<CString> {
    CString::new(s.replace('\0', "\\0")).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_cstring_replaces_nul() {
        let c = to_cstring("a\0b").unwrap();
        assert_eq!(c.to_str().unwrap(), "a\\0b");
    }

    #[test]
    fn test_event_types() {
        assert_eq!(LogLevel::Info.to_event_type(), EVENTLOG_INFORMATION_TYPE);
        assert_eq!(LogLevel::Warn.to_event_type(), EVENTLOG_WARNING_TYPE);
        assert_eq!(LogLevel::Assert.to_event_type(), EVENTLOG_ERROR_TYPE);
    }

    #[test]
    fn test_source_name() {
        let logger = WinEventLogger::new("mirrorlog-test");
        assert_eq!(logger.source(), "mirrorlog-test");
    }
}
