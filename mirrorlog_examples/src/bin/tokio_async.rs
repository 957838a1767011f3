//! example_tokio — глобальный логгер из асинхронных задач

use mirrorlog::{gdebug, ginfo, gwarn, LogConfig};
use std::time::Duration;
use tokio::time::sleep;

const APP_NAME: &str = "example_tokio";
const TAG: &str = "Tokio";

#[tokio::main]
async fn main() {
    let config = LogConfig::new()
        .with_debug(true)
        .with_storage_root(".")
        .with_path("logs/tokio.txt");

    let logger = match mirrorlog::init_global_logger_system(APP_NAME, config.clone()) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("System logger unavailable ({}), falling back to stderr", e);
            mirrorlog::init_global_logger_stderr(config)
        }
    };

    ginfo!(TAG, "Starting async tasks");

    // Запись синхронная — уносим её из реактора
    let handles: Vec<_> = (0..4)
        .map(|i| {
            tokio::spawn(async move {
                sleep(Duration::from_millis(20 * (i + 1))).await;
                let _ = tokio::task::spawn_blocking(move || {
                    gdebug!(TAG, "Task {} finished", i);
                })
                .await;
                if i == 2 {
                    gwarn!(TAG, "Task {} was slow", i);
                }
            })
        })
        .collect();

    for h in handles {
        let _ = h.await;
    }

    ginfo!(TAG, "All tasks done, log file: {}", logger.path());
    mirrorlog::reset_global_logger();
}
