use std::path::{Component, Path, PathBuf};

pub const DEFAULT_FILE_NAME: &str = "ApplicationLog.txt";
pub const DEFAULT_MAX_SIZE: u64 = 2_097_152; // 2 МБ
pub const MIN_MAX_SIZE: u64 = 256; // минимальный потолок, чтобы вместить пару строк

/// Путь внутри корня хранилища. Ведущие `/` и префиксы дисков отбрасываются:
/// `"/tmp/x.txt"` под корнем `/data` — это `/data/tmp/x.txt`.
pub fn resolve_under(root: &Path, path: &str) -> PathBuf {
    let relative: PathBuf = Path::new(path)
        .components()
        .filter(|c| {
            matches!(
                c,
                Component::Normal(_) | Component::CurDir | Component::ParentDir
            )
        })
        .collect();
    root.join(relative)
}

/// Приводит путь к имени `.txt`-файла:
/// `"foo/"` → `"foo/ApplicationLog.txt"`, `"foo"` → `"foo.txt"`, `"foo.txt"` без изменений.
pub fn normalize_path(path: &str) -> String {
    if path.ends_with('/') {
        format!("{}{}", path, DEFAULT_FILE_NAME)
    } else if !path.ends_with(".txt") {
        format!("{}.txt", path)
    } else {
        path.to_owned()
    }
}

/// Корень хранилища по умолчанию: локальный каталог данных пользователя,
/// либо текущий каталог, если платформа его не сообщает.
pub fn default_storage_root() -> PathBuf {
    dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub debug: bool,
    pub path: String,
    pub storage_root: PathBuf,
    pub max_size: u64,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            debug: false,
            path: DEFAULT_FILE_NAME.to_owned(),
            storage_root: default_storage_root(),
            max_size: DEFAULT_MAX_SIZE,
        }
    }
}

impl LogConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_path(mut self, path: &str) -> Self {
        self.path = normalize_path(path);
        self
    }

    pub fn with_storage_root<P: AsRef<Path>>(mut self, root: P) -> Self {
        self.storage_root = root.as_ref().to_path_buf();
        self
    }

    /// Потолок меньше `MIN_MAX_SIZE` поднимается до него.
    pub fn with_max_size(mut self, max_size: u64) -> Self {
        self.max_size = max_size.max(MIN_MAX_SIZE);
        self
    }

    /// Полный путь к файлу лога.
    pub fn resolved_path(&self) -> PathBuf {
        resolve_under(&self.storage_root, &self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_directory() {
        assert_eq!(normalize_path("foo/"), "foo/ApplicationLog.txt");
    }

    #[test]
    fn test_normalize_appends_extension() {
        assert_eq!(normalize_path("foo"), "foo.txt");
        assert_eq!(normalize_path("logs/app.log"), "logs/app.log.txt");
    }

    #[test]
    fn test_normalize_keeps_txt() {
        assert_eq!(normalize_path("foo.txt"), "foo.txt");
        assert_eq!(normalize_path("a/b/c.txt"), "a/b/c.txt");
    }

    #[test]
    fn test_resolve_under_keeps_absolute_path_inside_root() {
        let root = Path::new("/data");
        assert_eq!(resolve_under(root, "/tmp/x.txt"), PathBuf::from("/data/tmp/x.txt"));
        assert_eq!(resolve_under(root, "logs/a.txt"), PathBuf::from("/data/logs/a.txt"));
        assert_eq!(resolve_under(root, "./a.txt"), PathBuf::from("/data/a.txt"));
    }

    #[test]
    fn test_max_size_floor() {
        assert_eq!(LogConfig::new().with_max_size(0).max_size, MIN_MAX_SIZE);
        assert_eq!(LogConfig::new().with_max_size(10).max_size, 256);
        assert_eq!(LogConfig::new().with_max_size(4096).max_size, 4096);
    }

    #[test]
    fn test_default_config() {
        let config = LogConfig::default();
        assert!(!config.debug);
        assert_eq!(config.path, "ApplicationLog.txt");
        assert_eq!(config.max_size, 2_097_152);
    }

    #[test]
    fn test_builder_normalizes_path() {
        let config = LogConfig::new()
            .with_debug(true)
            .with_path("traces/")
            .with_storage_root("/data")
            .with_max_size(1024);
        assert!(config.debug);
        assert_eq!(config.path, "traces/ApplicationLog.txt");
        assert_eq!(config.max_size, 1024);
        assert_eq!(
            config.resolved_path(),
            PathBuf::from("/data/traces/ApplicationLog.txt")
        );
    }
}
