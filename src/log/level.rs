use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// 日志级别
///
/// 级别按严重程度递增排序，Sink 以此作为过滤阈值（包含阈值本身）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// 调试信息
    Debug = 0,
    /// 一般信息
    Info = 1,
    /// 错误信息
    Error = 2,
    /// 致命错误，记录后进程退出
    Fatal = 3,
}

/// 日志级别解析错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid log level: {0}")]
pub struct ParseLevelError(pub String);

impl LogLevel {
    /// 所有级别，按严重程度升序
    pub const ALL: [LogLevel; 4] = [
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Error,
        LogLevel::Fatal,
    ];

    /// 小写名称，即 JSON 行中 `level` 字段的取值
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Error => "error",
            LogLevel::Fatal => "fatal",
        }
    }

    /// 从 u8 还原级别，超出范围时返回 None
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }

    pub fn as_u8(&self) -> u8 {
        *self as u8
    }
}

impl FromStr for LogLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "error" => Ok(LogLevel::Error),
            "fatal" => Ok(LogLevel::Fatal),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_from_str() {
        assert_eq!(LogLevel::from_str("debug").unwrap(), LogLevel::Debug);
        assert_eq!(LogLevel::from_str("INFO").unwrap(), LogLevel::Info);
        assert_eq!(LogLevel::from_str("Error").unwrap(), LogLevel::Error);
        assert_eq!(LogLevel::from_str(" fatal ").unwrap(), LogLevel::Fatal);
    }

    #[test]
    fn test_log_level_from_str_invalid() {
        let err = LogLevel::from_str("warn").unwrap_err();
        assert_eq!(err, ParseLevelError("warn".to_string()));
        assert_eq!(err.to_string(), "invalid log level: warn");
    }

    #[test]
    fn test_log_level_display() {
        assert_eq!(LogLevel::Debug.to_string(), "debug");
        assert_eq!(LogLevel::Info.to_string(), "info");
        assert_eq!(LogLevel::Error.to_string(), "error");
        assert_eq!(LogLevel::Fatal.to_string(), "fatal");
    }

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Fatal > LogLevel::Error);
        assert!(LogLevel::Error > LogLevel::Info);
        assert!(LogLevel::Info > LogLevel::Debug);
    }

    #[test]
    fn test_log_level_u8_round_trip() {
        for level in LogLevel::ALL {
            assert_eq!(LogLevel::from_u8(level.as_u8()), Some(level));
        }
        assert_eq!(LogLevel::from_u8(4), None);
    }

    #[test]
    fn test_log_level_serde() {
        assert_eq!(serde_json::to_string(&LogLevel::Error).unwrap(), "\"error\"");
        let level: LogLevel = serde_json::from_str("\"debug\"").unwrap();
        assert_eq!(level, LogLevel::Debug);
    }
}
