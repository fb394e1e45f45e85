use crate::log::data::{Data, DataValue};
use crate::log::level::LogLevel;
use crate::log::record::LogRecord;
use crate::log::sink::Sink;
use anyhow::Result;
use regex_lite::Regex;
use serde_json::Value;
use std::sync::Arc;

/// 被遮蔽的值
pub const REDACTED: &str = "*REDACTED*";

const DEFAULT_KEY_PATTERNS: &[&str] = &[
    r"(?i)passw(or)?d",
    r"(?i)secret",
    r"(?i)token",
    r"(?i)api[_-]?key",
    r"(?i)private[_-]?key",
];

const DEFAULT_VALUE_PATTERNS: &[&str] = &[
    // AWS access key id
    r"(AKIA|ASIA)[A-Z0-9]{16}",
    // PEM 私钥
    r"-----BEGIN[A-Z ]* PRIVATE KEY-----",
    // HTTP bearer token
    r"(?i)bearer\s+[a-z0-9._~+/-]+=*",
];

/// 数据遮蔽规则
///
/// key 匹配任一 key 规则，或字符串值匹配任一 value 规则时，值被替换为 `*REDACTED*`。
/// 嵌套的 JSON 对象和数组会递归处理
pub struct Redactor {
    key_patterns: Vec<Regex>,
    value_patterns: Vec<Regex>,
}

impl Redactor {
    pub fn new(key_patterns: &[&str], value_patterns: &[&str]) -> Result<Self> {
        Ok(Self {
            key_patterns: compile(key_patterns)?,
            value_patterns: compile(value_patterns)?,
        })
    }

    /// 使用内置规则：密码、令牌、密钥类的 key，以及 AWS key、PEM 私钥、bearer token 类的值
    pub fn with_defaults() -> Self {
        let compile_known = |patterns: &[&str]| {
            patterns
                .iter()
                .filter_map(|p| Regex::new(p).ok())
                .collect::<Vec<_>>()
        };
        Self {
            key_patterns: compile_known(DEFAULT_KEY_PATTERNS),
            value_patterns: compile_known(DEFAULT_VALUE_PATTERNS),
        }
    }

    pub fn redact_data(&self, data: &Data) -> Data {
        data.iter()
            .map(|(key, value)| {
                let value = if self.is_secret_key(key) {
                    DataValue::from(REDACTED)
                } else {
                    self.redact_value(value)
                };
                (key.clone(), value)
            })
            .collect()
    }

    fn is_secret_key(&self, key: &str) -> bool {
        self.key_patterns.iter().any(|p| p.is_match(key))
    }

    fn is_secret_value(&self, value: &str) -> bool {
        self.value_patterns.iter().any(|p| p.is_match(value))
    }

    fn redact_value(&self, value: &DataValue) -> DataValue {
        match value {
            DataValue::String(s) if self.is_secret_value(s) => DataValue::from(REDACTED),
            DataValue::Json(v) => DataValue::Json(self.redact_json(v)),
            DataValue::Struct(v) => DataValue::Struct(self.redact_json(v)),
            other => other.clone(),
        }
    }

    fn redact_json(&self, value: &Value) -> Value {
        match value {
            Value::String(s) if self.is_secret_value(s) => Value::from(REDACTED),
            Value::Array(items) => Value::Array(items.iter().map(|v| self.redact_json(v)).collect()),
            Value::Object(fields) => Value::Object(
                fields
                    .iter()
                    .map(|(k, v)| {
                        let v = if self.is_secret_key(k) {
                            Value::from(REDACTED)
                        } else {
                            self.redact_json(v)
                        };
                        (k.clone(), v)
                    })
                    .collect(),
            ),
            other => other.clone(),
        }
    }
}

impl Default for Redactor {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn compile(patterns: &[&str]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| Regex::new(p).map_err(|e| anyhow::anyhow!("invalid redaction pattern '{}': {}", p, e)))
        .collect()
}

/// 输出前遮蔽敏感数据的 Sink
pub struct RedactingSink {
    sink: Arc<dyn Sink>,
    redactor: Redactor,
}

impl RedactingSink {
    pub fn new(sink: Arc<dyn Sink>, redactor: Redactor) -> Self {
        Self { sink, redactor }
    }

    pub fn with_defaults(sink: Arc<dyn Sink>) -> Self {
        Self::new(sink, Redactor::with_defaults())
    }
}

impl Sink for RedactingSink {
    fn log(&self, record: &LogRecord) {
        if !self.sink.enabled(record.level) {
            return;
        }
        let redacted = LogRecord {
            data: self.redactor.redact_data(&record.data),
            ..record.clone()
        };
        self.sink.log(&redacted);
    }

    fn enabled(&self, level: LogLevel) -> bool {
        self.sink.enabled(level)
    }

    fn flush(&self) {
        self.sink.flush();
    }
}
