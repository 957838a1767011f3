mod config;
mod console;
mod error;
mod level;
mod writer;

pub use config::{
    normalize_path, resolve_under, LogConfig, DEFAULT_FILE_NAME, DEFAULT_MAX_SIZE, MIN_MAX_SIZE,
};
pub use console::{ConsoleSink, NullConsole, StderrConsole, SystemConsole};
pub use error::{LogError, Result};
pub use level::Level;
pub use writer::{format_line, format_timestamp, BoundedFileWriter, LogListener};

use once_cell::sync::Lazy;
use std::error::Error;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

const TAG: &str = "Log";

/// Текст ошибки и цепочка `source()`, строки разделены `\r\n`.
pub fn render_error(error: &dyn Error) -> String {
    let mut rendered = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        rendered.push_str("\r\nCaused by: ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

// ===== Основной логгер =====

/// Дублирует каждую запись в консоль и в файл.
///
/// Пока флаг отладки выключен, любой вызов — no-op. Если консоль отклонила
/// запись, файл не трогается. Ошибки файла уходят в консоль как
/// предупреждение и вызывающему не возвращаются.
pub struct Logger {
    enabled: AtomicBool,
    path: Mutex<String>,
    writer: BoundedFileWriter,
    console: Box<dyn ConsoleSink>,
}

impl Logger {
    pub fn new(config: LogConfig, console: Box<dyn ConsoleSink>) -> Self {
        Logger {
            enabled: AtomicBool::new(config.debug),
            path: Mutex::new(config.path),
            writer: BoundedFileWriter::new(&config.storage_root, config.max_size),
            console,
        }
    }

    pub fn with_system_console(app_name: &str, config: LogConfig) -> Result<Self> {
        let console = SystemConsole::new(app_name)?;
        Ok(Self::new(config, Box::new(console)))
    }

    pub fn with_stderr_console(config: LogConfig) -> Self {
        Self::new(config, Box::new(StderrConsole))
    }

    // ----- конфигурация -----

    pub fn set_debug(&self, debug: bool) {
        self.enabled.store(debug, Ordering::SeqCst);
    }

    pub fn is_debug(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    pub fn set_path(&self, path: &str) {
        *lock(&self.path) = normalize_path(path);
    }

    pub fn path(&self) -> String {
        lock(&self.path).clone()
    }

    pub fn set_log_listener<L: LogListener + 'static>(&self, listener: L) {
        self.writer.set_listener(Some(Arc::new(listener)));
    }

    pub fn clear_log_listener(&self) {
        self.writer.set_listener(None);
    }

    /// Дойдёт ли вызов с этим тегом и уровнем до консоли.
    pub fn is_loggable(&self, _tag: &str, _level: Level) -> bool {
        self.is_debug()
    }

    // ----- запись -----

    pub fn log(&self, level: Level, tag: &str, message: &str) {
        if !self.is_debug() {
            return;
        }
        if self.console.log(level, tag, message) {
            self.write_to_file(tag, message);
        }
    }

    pub fn log_with(&self, level: Level, tag: &str, message: &str, error: &dyn Error) {
        if !self.is_debug() {
            return;
        }
        let message = format!("{}\r\n{}", message, render_error(error));
        if self.console.log(level, tag, &message) {
            self.write_to_file(tag, &message);
        }
    }

    pub fn write_to_file(&self, tag: &str, message: &str) {
        let path = self.path();
        if let Err(e) = self.writer.write(&path, tag, message) {
            self.console.log(
                Level::Warn,
                TAG,
                &format!("Unable to log exception to file.\r\n{}", render_error(&e)),
            );
        }
    }

    pub fn verbose(&self, tag: &str, message: &str) {
        self.log(Level::Verbose, tag, message);
    }

    pub fn debug(&self, tag: &str, message: &str) {
        self.log(Level::Debug, tag, message);
    }

    pub fn info(&self, tag: &str, message: &str) {
        self.log(Level::Info, tag, message);
    }

    pub fn warn(&self, tag: &str, message: &str) {
        self.log(Level::Warn, tag, message);
    }

    pub fn error(&self, tag: &str, message: &str) {
        self.log(Level::Error, tag, message);
    }

    pub fn assert(&self, tag: &str, message: &str) {
        self.log(Level::Assert, tag, message);
    }

    pub fn verbose_with(&self, tag: &str, message: &str, error: &dyn Error) {
        self.log_with(Level::Verbose, tag, message, error);
    }

    pub fn debug_with(&self, tag: &str, message: &str, error: &dyn Error) {
        self.log_with(Level::Debug, tag, message, error);
    }

    pub fn info_with(&self, tag: &str, message: &str, error: &dyn Error) {
        self.log_with(Level::Info, tag, message, error);
    }

    pub fn warn_with(&self, tag: &str, message: &str, error: &dyn Error) {
        self.log_with(Level::Warn, tag, message, error);
    }

    pub fn error_with(&self, tag: &str, message: &str, error: &dyn Error) {
        self.log_with(Level::Error, tag, message, error);
    }

    pub fn assert_with(&self, tag: &str, message: &str, error: &dyn Error) {
        self.log_with(Level::Assert, tag, message, error);
    }
}

// ===== Макросы =====

#[macro_export]
macro_rules! verbose {
    ($logger:expr, $tag:expr, $($arg:tt)*) => {{
        $logger.log($crate::Level::Verbose, $tag, &format!($($arg)*));
    }};
}
#[macro_export]
macro_rules! debug {
    ($logger:expr, $tag:expr, $($arg:tt)*) => {{
        $logger.log($crate::Level::Debug, $tag, &format!($($arg)*));
    }};
}
#[macro_export]
macro_rules! info {
    ($logger:expr, $tag:expr, $($arg:tt)*) => {{
        $logger.log($crate::Level::Info, $tag, &format!($($arg)*));
    }};
}
#[macro_export]
macro_rules! warn {
    ($logger:expr, $tag:expr, $($arg:tt)*) => {{
        $logger.log($crate::Level::Warn, $tag, &format!($($arg)*));
    }};
}
#[macro_export]
macro_rules! error {
    ($logger:expr, $tag:expr, $($arg:tt)*) => {{
        $logger.log($crate::Level::Error, $tag, &format!($($arg)*));
    }};
}

// ===== Глобальные макросы =====

#[macro_export]
macro_rules! gverbose {
    ($tag:expr, $($arg:tt)*) => {{
        $crate::with_global_logger(|logger| logger.log($crate::Level::Verbose, $tag, &format!($($arg)*)));
    }};
}
#[macro_export]
macro_rules! gdebug {
    ($tag:expr, $($arg:tt)*) => {{
        $crate::with_global_logger(|logger| logger.log($crate::Level::Debug, $tag, &format!($($arg)*)));
    }};
}
#[macro_export]
macro_rules! ginfo {
    ($tag:expr, $($arg:tt)*) => {{
        $crate::with_global_logger(|logger| logger.log($crate::Level::Info, $tag, &format!($($arg)*)));
    }};
}
#[macro_export]
macro_rules! gwarn {
    ($tag:expr, $($arg:tt)*) => {{
        $crate::with_global_logger(|logger| logger.log($crate::Level::Warn, $tag, &format!($($arg)*)));
    }};
}
#[macro_export]
macro_rules! gerror {
    ($tag:expr, $($arg:tt)*) => {{
        $crate::with_global_logger(|logger| logger.log($crate::Level::Error, $tag, &format!($($arg)*)));
    }};
}

// ===== Глобальный логгер =====

static GLOBAL_LOGGER: Lazy<Mutex<Option<Arc<Logger>>>> = Lazy::new(|| Mutex::new(None));

pub fn init_global_logger(logger: Logger) -> Arc<Logger> {
    let logger = Arc::new(logger);
    *lock(&GLOBAL_LOGGER) = Some(Arc::clone(&logger));
    logger
}

pub fn init_global_logger_system(app_name: &str, config: LogConfig) -> Result<Arc<Logger>> {
    let logger = Logger::with_system_console(app_name, config)?;
    Ok(init_global_logger(logger))
}

pub fn init_global_logger_stderr(config: LogConfig) -> Arc<Logger> {
    init_global_logger(Logger::with_stderr_console(config))
}

pub fn global_logger() -> Option<Arc<Logger>> {
    lock(&GLOBAL_LOGGER).clone()
}

/// Выполняет `f`, если глобальный логгер инициализирован. Блокировка
/// снимается до вызова, так что `f` может сам обращаться к глобальному логгеру.
pub fn with_global_logger<F: FnOnce(&Logger)>(f: F) {
    if let Some(logger) = global_logger() {
        f(&logger);
    }
}

pub fn reset_global_logger() {
    *lock(&GLOBAL_LOGGER) = None;
}
