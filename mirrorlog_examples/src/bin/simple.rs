// example_simple — простой пример: системная консоль + файл, включение отладки

use mirrorlog::{debug, error, info, warn, LogConfig, Logger};

const APP_NAME: &str = "example_simple";
const APP_VERSION: &str = "1.0.0";
const TAG: &str = "Simple";

fn main() {
    // 1. Инициализация: системная консоль, файл рядом с бинарником
    let config = LogConfig::new()
        .with_debug(true)
        .with_storage_root(".")
        .with_path("logs/");

    let logger = match Logger::with_system_console(APP_NAME, config) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("[FATAL] Cannot initialize system logger: {}. Exiting.", e);
            std::process::exit(1);
        }
    };

    info!(logger, TAG, "Starting {} v{}", APP_NAME, APP_VERSION);

    // 2. Основной код — в syslog и в logs/ApplicationLog.txt
    debug!(logger, TAG, "Processing data block #1");
    warn!(logger, TAG, "Non-critical issue detected");
    error!(logger, TAG, "An error occurred, but we continue");

    // 3. Выключаем отладку — дальше ничего не пишется
    logger.set_debug(false);
    debug!(logger, TAG, "This line is dropped");

    logger.set_debug(true);
    info!(logger, TAG, "Application finished, log at {}", logger.path());
}
