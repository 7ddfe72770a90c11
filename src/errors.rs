use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShortlinkError {
    InvalidInput(String),
    NotFound(String),
    Forbidden(String),
    StorageFailure(String),
    Configuration(String),
}

impl ShortlinkError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            ShortlinkError::InvalidInput(_) => "E001",
            ShortlinkError::NotFound(_) => "E002",
            ShortlinkError::Forbidden(_) => "E003",
            ShortlinkError::StorageFailure(_) => "E004",
            ShortlinkError::Configuration(_) => "E005",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            ShortlinkError::InvalidInput(_) => "Invalid Input",
            ShortlinkError::NotFound(_) => "Resource Not Found",
            ShortlinkError::Forbidden(_) => "Forbidden",
            ShortlinkError::StorageFailure(_) => "Storage Failure",
            ShortlinkError::Configuration(_) => "Configuration Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            ShortlinkError::InvalidInput(msg)
            | ShortlinkError::NotFound(msg)
            | ShortlinkError::Forbidden(msg)
            | ShortlinkError::StorageFailure(msg)
            | ShortlinkError::Configuration(msg) => msg,
        }
    }

    /// 格式化为彩色输出
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出（用于 console 模式）
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for ShortlinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for ShortlinkError {}

// 便捷的构造函数
impl ShortlinkError {
    pub fn invalid_input<T: Into<String>>(msg: T) -> Self {
        ShortlinkError::InvalidInput(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        ShortlinkError::NotFound(msg.into())
    }

    pub fn forbidden<T: Into<String>>(msg: T) -> Self {
        ShortlinkError::Forbidden(msg.into())
    }

    pub fn storage_failure<T: Into<String>>(msg: T) -> Self {
        ShortlinkError::StorageFailure(msg.into())
    }

    pub fn configuration<T: Into<String>>(msg: T) -> Self {
        ShortlinkError::Configuration(msg.into())
    }
}

impl From<std::io::Error> for ShortlinkError {
    fn from(err: std::io::Error) -> Self {
        ShortlinkError::StorageFailure(err.to_string())
    }
}

impl From<serde_json::Error> for ShortlinkError {
    fn from(err: serde_json::Error) -> Self {
        ShortlinkError::StorageFailure(err.to_string())
    }
}

impl From<config::ConfigError> for ShortlinkError {
    fn from(err: config::ConfigError) -> Self {
        ShortlinkError::Configuration(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ShortlinkError>;
