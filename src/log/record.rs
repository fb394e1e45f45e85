use crate::log::data::{Data, DataValue};
use crate::log::level::LogLevel;
use crate::log::session::SessionPath;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// 数据字段中会话编号的 key
pub const SESSION_KEY: &str = "session";
/// 数据字段中错误描述的 key
pub const ERROR_KEY: &str = "error";
/// Fatal 日志中调用栈的 key
pub const TRACE_KEY: &str = "trace";

/// 日志记录
///
/// 一次日志调用的结构化表示，序列化后即为一行 JSON：
///
/// ```text
/// {"timestamp":"2025-01-19T12:34:56.123456789Z","level":"info","source":"svc","message":"handler.request","data":{"session":"1"}}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    /// 调用时刻
    #[serde(with = "rfc3339_nanos")]
    pub timestamp: DateTime<Utc>,
    /// 日志级别
    pub level: LogLevel,
    /// 根 Logger 的名称
    pub source: String,
    /// 会话名称链加上消息文本
    pub message: String,
    /// 结构化数据，没有字段时为 `{}`
    pub data: Data,
}

impl LogRecord {
    /// 创建新的日志记录，时间戳取当前时间
    pub fn new(
        level: LogLevel,
        source: impl Into<String>,
        message: impl Into<String>,
        data: Data,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            source: source.into(),
            message: message.into(),
            data,
        }
    }

    /// 从一行 JSON 解析日志记录
    pub fn from_json_line(line: &str) -> Result<Self> {
        Ok(serde_json::from_str(line.trim_end_matches(['\r', '\n']))?)
    }

    /// 会话编号，根 Logger 产生的记录没有该字段
    pub fn session(&self) -> Option<&str> {
        self.data.get(SESSION_KEY).and_then(DataValue::as_str)
    }

    /// 错误描述
    pub fn error(&self) -> Option<&str> {
        self.data.get(ERROR_KEY).and_then(DataValue::as_str)
    }
}

/// 将一次日志调用格式化为 LogRecord
///
/// 数据合并顺序（后者覆盖前者）：Logger 累积的数据、`session`、调用自带的数据、`error`
#[allow(clippy::too_many_arguments)]
pub fn format_record(
    source: &str,
    session_name: &str,
    session_path: &SessionPath,
    logger_data: &Data,
    level: LogLevel,
    message: &str,
    err: Option<&dyn Display>,
    extra: Data,
) -> LogRecord {
    let mut data = logger_data.clone();
    if !session_path.is_root() {
        data.insert(SESSION_KEY, session_path.to_string());
    }
    data.merge(extra);
    if let Some(err) = err {
        data.insert(ERROR_KEY, err.to_string());
    }

    let message = if session_path.is_root() {
        message.to_string()
    } else {
        format!("{}.{}", session_name, message)
    };

    LogRecord::new(level, source, message, data)
}

/// RFC3339 纳秒精度时间戳的序列化
pub mod rfc3339_nanos {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn format(timestamp: &DateTime<Utc>) -> String {
        timestamp.to_rfc3339_opts(SecondsFormat::Nanos, true)
    }

    pub fn serialize<S>(timestamp: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format(timestamp))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&s)
            .map(|t| t.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
