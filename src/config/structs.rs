use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, ShortlinkError};

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// 默认短链接域名（占位）
pub const DEFAULT_DOMAIN: &str = "https://clck.ru/";

/// 清理任务的最小间隔
pub const MIN_CLEANUP_INTERVAL_SECS: u64 = 5;

/// Application configuration, read once at startup.
///
/// Sources, in increasing priority:
/// - built-in defaults
/// - TOML file (`config.toml` or the path given with `--config`)
/// - environment variables with prefix `SL` and separator `__`,
///   e.g. `SL__LINKS__CODE_LENGTH=9`
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub links: LinkConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub cleanup: CleanupConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > config.toml > 默认值
    ///
    /// An explicitly given path must exist; the default path is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        use config::{Config, Environment, File};

        let file_source = match path {
            Some(p) => File::from(p).required(true),
            None => File::with_name(DEFAULT_CONFIG_PATH).required(false),
        };

        let settings = Config::builder()
            .add_source(file_source)
            .add_source(
                Environment::with_prefix("SL")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.links.code_length == 0 {
            return Err(ShortlinkError::configuration(
                "links.code_length must be positive",
            ));
        }
        if self.links.default_ttl_hours == 0 {
            return Err(ShortlinkError::configuration(
                "links.default_ttl_hours must be positive",
            ));
        }
        if self.storage.file.trim().is_empty() {
            return Err(ShortlinkError::configuration("storage.file cannot be empty"));
        }
        Ok(())
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|e| format!("# Error generating sample config: {}", e))
    }

    /// 保存配置到 TOML 文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

/// 短链接配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinkConfig {
    #[serde(default = "default_domain")]
    pub domain: String,
    #[serde(default = "default_code_length")]
    pub code_length: usize,
    #[serde(default = "default_ttl_hours")]
    pub default_ttl_hours: u64,
    #[serde(default = "default_open_browser")]
    pub open_browser: bool,
}

impl LinkConfig {
    pub fn default_ttl(&self) -> chrono::Duration {
        i64::try_from(self.default_ttl_hours)
            .ok()
            .and_then(chrono::Duration::try_hours)
            .unwrap_or(chrono::Duration::MAX)
    }
}

/// 存储配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageConfig {
    #[serde(default = "default_storage_file")]
    pub file: String,
}

impl StorageConfig {
    /// Storage path; relative paths resolve against the working directory.
    pub fn resolved_path(&self) -> PathBuf {
        let path = PathBuf::from(self.file.trim());
        if path.is_absolute() {
            return path;
        }
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(path),
            Err(_) => path,
        }
    }
}

/// 过期清理配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CleanupConfig {
    #[serde(default = "default_cleanup_interval")]
    pub interval_secs: u64,
}

impl CleanupConfig {
    /// Configured interval, floored to [`MIN_CLEANUP_INTERVAL_SECS`].
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(MIN_CLEANUP_INTERVAL_SECS))
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
}

// ============================================================
// Default value functions
// ============================================================

fn default_domain() -> String {
    DEFAULT_DOMAIN.to_string()
}

fn default_code_length() -> usize {
    7
}

fn default_ttl_hours() -> u64 {
    24
}

fn default_open_browser() -> bool {
    true
}

fn default_storage_file() -> String {
    "data/store.json".to_string()
}

fn default_cleanup_interval() -> u64 {
    60
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

// ============================================================
// Default implementations
// ============================================================

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            domain: default_domain(),
            code_length: default_code_length(),
            default_ttl_hours: default_ttl_hours(),
            open_browser: default_open_browser(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            file: default_storage_file(),
        }
    }
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_cleanup_interval(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}
