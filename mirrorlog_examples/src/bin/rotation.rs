//! example_rotation — демонстрация сброса файла по размеру

use mirrorlog::{debug, warn, LogConfig, Logger};
use std::fs;
use std::thread;
use std::time::Duration;

const TAG: &str = "Rotation";

// Маленький потолок — чтобы сброс сработал быстро
const MAX_LOG_SIZE: u64 = 4096; // 4 КБ

fn main() {
    let config = LogConfig::new()
        .with_debug(true)
        .with_storage_root(".")
        .with_path("logs/rotation")
        .with_max_size(MAX_LOG_SIZE);
    let file_path = config.resolved_path();

    let logger = Logger::with_stderr_console(config);

    debug!(logger, TAG, "Logger initialized with max_size={} bytes", MAX_LOG_SIZE);

    for i in 0..200 {
        debug!(logger, TAG, "This is a debug message number {}", i);
        if i % 30 == 0 {
            warn!(logger, TAG, "Warning message at iteration {}", i);
        }

        if let Ok(meta) = fs::metadata(&file_path) {
            assert!(meta.len() <= MAX_LOG_SIZE);
        }
        thread::sleep(Duration::from_millis(5));
    }

    let size = fs::metadata(&file_path).map(|m| m.len()).unwrap_or(0);
    println!("Final size of {}: {} bytes", file_path.display(), size);
}
