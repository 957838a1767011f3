// example_observer — наблюдатель за успешно записанными строками

use mirrorlog::{info, Level, LogConfig, Logger, NullConsole};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const TAG: &str = "Observer";

fn main() {
    let config = LogConfig::new()
        .with_debug(true)
        .with_storage_root(".")
        .with_path("logs/observer.txt");

    let logger = Logger::with_stderr_console(config.clone());

    let counter = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&counter);
    logger.set_log_listener(move |tag: &str, message: &str| {
        seen.fetch_add(1, Ordering::SeqCst);
        println!("observer: [{}] {}", tag, message);
    });

    info!(logger, TAG, "first");
    if let Err(e) = "x1".parse::<u32>() {
        logger.error_with(TAG, "could not parse setting", &e);
    }

    // Консоль отклоняет всё — файл и наблюдатель не трогаются
    let silent = Logger::new(config, Box::new(NullConsole));
    silent.log(Level::Error, TAG, "never persisted");

    println!("lines persisted: {}", counter.load(Ordering::SeqCst));
}
