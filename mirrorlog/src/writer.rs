use crate::config::{resolve_under, MIN_MAX_SIZE};
use crate::error::{LogError, Result};
use chrono::{DateTime, Local, TimeZone};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

// ===== Наблюдатель =====

/// Получает (tag, message) после каждой успешной записи в файл.
pub trait LogListener: Send + Sync {
    fn on_logged(&self, tag: &str, message: &str);
}

impl<F> LogListener for F
where
    F: Fn(&str, &str) + Send + Sync,
{
    fn on_logged(&self, tag: &str, message: &str) {
        self(tag, message)
    }
}

// ===== Формат строки =====

/// Короткие дата и время в американской локали: `10/15/26, 3:04 PM`.
pub fn format_timestamp<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    now.format("%-m/%-d/%y, %-I:%M %p").to_string()
}

pub fn format_line(timestamp: &str, tag: &str, message: &str) -> String {
    format!("{} [{}]:{}\r\n", timestamp, tag, message)
}

// ===== Писатель с ограничением размера =====

/// Дописывает по одной строке за вызов. Файл открывается и закрывается
/// на каждой записи; если строка не помещается под потолок, файл
/// удаляется и создаётся заново. Потолок не бывает меньше `MIN_MAX_SIZE`.
pub struct BoundedFileWriter {
    root: PathBuf,
    max_size: u64,
    listener: Mutex<Option<Arc<dyn LogListener>>>,
}

impl BoundedFileWriter {
    pub fn new<P: AsRef<Path>>(root: P, max_size: u64) -> Self {
        BoundedFileWriter {
            root: root.as_ref().to_path_buf(),
            max_size: max_size.max(MIN_MAX_SIZE),
            listener: Mutex::new(None),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn max_size(&self) -> u64 {
        self.max_size
    }

    pub fn set_listener(&self, listener: Option<Arc<dyn LogListener>>) {
        *self.lock_listener() = listener;
    }

    pub fn has_listener(&self) -> bool {
        self.lock_listener().is_some()
    }

    pub fn write(&self, path: &str, tag: &str, message: &str) -> Result<()> {
        let line = format_line(&format_timestamp(&Local::now()), tag, message);
        self.write_line(path, &line)?;

        // Клонируем Arc, чтобы не держать блокировку во время колбэка
        let listener = self.lock_listener().clone();
        if let Some(listener) = listener {
            listener.on_logged(tag, message);
        }
        Ok(())
    }

    fn write_line(&self, path: &str, line: &str) -> Result<()> {
        if path.is_empty() {
            return Err(LogError::EmptyPath);
        }
        let file_path = resolve_under(&self.root, path);

        match fs::metadata(&file_path) {
            Ok(meta) => {
                if meta.len() + line.len() as u64 > self.max_size {
                    fs::remove_file(&file_path)?;
                    File::create(&file_path)?;
                }
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                if let Some(parent) = file_path.parent() {
                    fs::create_dir_all(parent)?;
                }
                File::create(&file_path)?;
            }
            Err(e) => return Err(e.into()),
        }

        let file = OpenOptions::new().append(true).open(&file_path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(line.as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    fn lock_listener(&self) -> MutexGuard<'_, Option<Arc<dyn LogListener>>> {
        match self.listener.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use tempfile::TempDir;

    fn read(dir: &TempDir, path: &str) -> String {
        fs::read_to_string(dir.path().join(path)).unwrap()
    }

    #[test]
    fn test_format_timestamp_us_short() {
        let dt = NaiveDate::from_ymd_opt(2026, 10, 5)
            .unwrap()
            .and_hms_opt(15, 4, 9)
            .unwrap()
            .and_utc();
        assert_eq!(format_timestamp(&dt), "10/5/26, 3:04 PM");

        let morning = Utc.with_ymd_and_hms(2024, 1, 9, 0, 30, 0).unwrap();
        assert_eq!(format_timestamp(&morning), "1/9/24, 12:30 AM");
    }

    #[test]
    fn test_format_line_layout() {
        assert_eq!(
            format_line("1/9/24, 12:30 AM", "Net", "timeout"),
            "1/9/24, 12:30 AM [Net]:timeout\r\n"
        );
    }

    #[test]
    fn test_creates_parent_dirs_and_file() {
        let dir = TempDir::new().unwrap();
        let writer = BoundedFileWriter::new(dir.path(), 1024);

        writer.write("nested/deeper/log.txt", "Tag", "first").unwrap();

        let content = read(&dir, "nested/deeper/log.txt");
        assert!(content.ends_with(" [Tag]:first\r\n"));
        assert_eq!(content.matches("\r\n").count(), 1);
    }

    #[test]
    fn test_appends_one_line_per_call() {
        let dir = TempDir::new().unwrap();
        let writer = BoundedFileWriter::new(dir.path(), 4096);

        writer.write("log.txt", "A", "one").unwrap();
        let after_one = fs::metadata(dir.path().join("log.txt")).unwrap().len();
        writer.write("log.txt", "B", "two").unwrap();
        writer.write("log.txt", "C", "three").unwrap();

        let content = read(&dir, "log.txt");
        let lines: Vec<&str> = content.split_terminator("\r\n").collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("[A]:one"));
        assert!(lines[1].ends_with("[B]:two"));
        assert!(lines[2].ends_with("[C]:three"));
        assert!(content.len() as u64 > after_one);
    }

    #[test]
    fn test_resets_file_when_ceiling_would_be_exceeded() {
        let dir = TempDir::new().unwrap();
        let writer = BoundedFileWriter::new(dir.path(), 256);

        for i in 0..20 {
            writer.write("log.txt", "T", &format!("message {:02}", i)).unwrap();
            let size = fs::metadata(dir.path().join("log.txt")).unwrap().len();
            assert!(size <= 256, "size {} exceeds ceiling", size);
        }

        let content = read(&dir, "log.txt");
        assert!(content.contains("[T]:message 19"));
        assert!(!content.contains("[T]:message 00"));
    }

    #[test]
    fn test_reset_leaves_only_new_line() {
        let dir = TempDir::new().unwrap();
        let writer = BoundedFileWriter::new(dir.path(), 256);
        fs::write(dir.path().join("log.txt"), vec![b'x'; 250]).unwrap();

        writer.write("log.txt", "T", "fresh").unwrap();

        let content = read(&dir, "log.txt");
        assert!(!content.contains('x'));
        assert!(content.ends_with(" [T]:fresh\r\n"));
        assert_eq!(content.matches("\r\n").count(), 1);
    }

    #[test]
    fn test_multiline_message_kept_verbatim() {
        let dir = TempDir::new().unwrap();
        let writer = BoundedFileWriter::new(dir.path(), 4096);

        writer.write("log.txt", "T", "boom\r\nat frame 1").unwrap();

        assert!(read(&dir, "log.txt").ends_with("[T]:boom\r\nat frame 1\r\n"));
    }

    #[test]
    fn test_empty_path_rejected() {
        let dir = TempDir::new().unwrap();
        let writer = BoundedFileWriter::new(dir.path(), 4096);
        let result = writer.write("", "T", "m");
        assert!(matches!(result, Err(LogError::EmptyPath)));
    }

    #[test]
    fn test_absolute_path_stays_under_root() {
        let root = TempDir::new().unwrap();
        let elsewhere = TempDir::new().unwrap();
        let writer = BoundedFileWriter::new(root.path(), 4096);
        let absolute = elsewhere.path().join("escaped.txt");

        writer.write(absolute.to_str().unwrap(), "T", "m").unwrap();

        assert!(!absolute.exists());
        let relative: PathBuf = absolute
            .components()
            .filter(|c| matches!(c, std::path::Component::Normal(_)))
            .collect();
        let inside = root.path().join(relative);
        assert!(fs::read_to_string(inside).unwrap().ends_with(" [T]:m\r\n"));
    }

    #[test]
    fn test_exact_fit_appends_without_reset() {
        let dir = TempDir::new().unwrap();
        let writer = BoundedFileWriter::new(dir.path(), 512);
        let line = format_line("1/9/24, 12:30 AM", "T", "fits");
        let prefill = 512 - line.len();
        fs::write(dir.path().join("log.txt"), vec![b'x'; prefill]).unwrap();

        writer.write_line("log.txt", &line).unwrap();

        let content = read(&dir, "log.txt");
        assert_eq!(content.len(), 512);
        assert!(content.starts_with("xxxx"));
        assert!(content.ends_with(&line));

        // Ещё один байт сверх потолка — и файл сбрасывается
        writer.write_line("log.txt", &line).unwrap();
        assert_eq!(read(&dir, "log.txt"), line);
    }

    #[test]
    fn test_default_ceiling() {
        let dir = TempDir::new().unwrap();
        let writer = BoundedFileWriter::new(dir.path(), crate::DEFAULT_MAX_SIZE);
        let line = format_line("1/9/24, 12:30 AM", "Big", "payload");
        let prefill = crate::DEFAULT_MAX_SIZE as usize - line.len();
        fs::write(dir.path().join("log.txt"), vec![b'x'; prefill]).unwrap();

        writer.write_line("log.txt", &line).unwrap();
        let size = fs::metadata(dir.path().join("log.txt")).unwrap().len();
        assert_eq!(size, 2_097_152);

        writer.write_line("log.txt", &line).unwrap();
        let size = fs::metadata(dir.path().join("log.txt")).unwrap().len();
        assert_eq!(size, line.len() as u64);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_metadata_error_not_treated_as_missing() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("plain.txt"), b"not a dir").unwrap();
        let writer = BoundedFileWriter::new(dir.path(), 4096);

        let result = writer.write("plain.txt/log.txt", "T", "m");

        // ENOTDIR от metadata, а не AlreadyExists от create_dir_all
        match result {
            Err(LogError::Io(e)) => assert_eq!(e.raw_os_error(), Some(20)),
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(fs::read(dir.path().join("plain.txt")).unwrap(), b"not a dir");
    }

    #[test]
    fn test_io_failure_reported() {
        let dir = TempDir::new().unwrap();
        // Каталог на месте файла — открыть на запись нельзя
        fs::create_dir(dir.path().join("log.txt")).unwrap();
        let writer = BoundedFileWriter::new(dir.path(), 4096);

        let result = writer.write("log.txt", "T", "m");
        assert!(matches!(result, Err(LogError::Io(_))));
    }

    #[test]
    fn test_listener_called_after_success() {
        let dir = TempDir::new().unwrap();
        let writer = BoundedFileWriter::new(dir.path(), 4096);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        writer.set_listener(Some(Arc::new(move |tag: &str, message: &str| {
            sink.lock().unwrap().push(format!("{}|{}", tag, message));
        })));

        writer.write("log.txt", "Net", "up").unwrap();
        let _ = writer.write("", "Net", "lost");

        assert_eq!(*seen.lock().unwrap(), vec!["Net|up".to_owned()]);
    }

    #[test]
    fn test_listener_replaced_and_cleared() {
        let dir = TempDir::new().unwrap();
        let writer = BoundedFileWriter::new(dir.path(), 4096);
        let first = Arc::new(Mutex::new(0));
        let second = Arc::new(Mutex::new(0));

        let f = Arc::clone(&first);
        writer.set_listener(Some(Arc::new(move |_: &str, _: &str| {
            *f.lock().unwrap() += 1;
        })));
        writer.write("log.txt", "T", "a").unwrap();

        let s = Arc::clone(&second);
        writer.set_listener(Some(Arc::new(move |_: &str, _: &str| {
            *s.lock().unwrap() += 1;
        })));
        writer.write("log.txt", "T", "b").unwrap();

        writer.set_listener(None);
        assert!(!writer.has_listener());
        writer.write("log.txt", "T", "c").unwrap();

        assert_eq!(*first.lock().unwrap(), 1);
        assert_eq!(*second.lock().unwrap(), 1);
    }
}
