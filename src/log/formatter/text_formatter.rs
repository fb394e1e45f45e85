use crate::log::formatter::LogFormatter;
use crate::log::level::LogLevel;
use crate::log::record::{rfc3339_nanos, LogRecord};
use anyhow::Result;
use serde::Deserialize;
use smart_default::SmartDefault;

/// TextFormatter 配置
#[derive(Debug, Clone, Deserialize, SmartDefault)]
#[serde(default)]
pub struct TextFormatterConfig {
    /// 是否启用颜色输出
    #[default = false]
    pub colored: bool,
}

/// 文本格式化器
///
/// 将日志记录格式化为可读的文本格式：
///
/// ```text
/// [2025-01-19T12:34:56.123456789Z] INFO  svc: handler.request | session=1 user=alice
/// ```
pub struct TextFormatter {
    config: TextFormatterConfig,
}

impl TextFormatter {
    pub fn new(config: TextFormatterConfig) -> Self {
        Self { config }
    }
}

impl LogFormatter for TextFormatter {
    fn format(&self, record: &LogRecord) -> Result<String> {
        use std::fmt::Write;

        let colored = self.config.colored;
        let mut result = String::with_capacity(64 + record.message.len() + record.data.len() * 16);

        result.push('[');
        if colored {
            result.push_str("\x1b[2m"); // dimmed
        }
        result.push_str(&rfc3339_nanos::format(&record.timestamp));
        if colored {
            result.push_str("\x1b[0m");
        }
        result.push_str("] ");

        if colored {
            result.push_str(colored_level(record.level));
        } else {
            write!(result, "{:<5}", record.level.as_str().to_ascii_uppercase())?;
        }
        result.push(' ');

        result.push_str(&record.source);
        result.push_str(": ");

        if colored {
            result.push_str("\x1b[97m"); // white
        }
        result.push_str(&record.message);
        if colored {
            result.push_str("\x1b[0m");
        }

        if !record.data.is_empty() {
            result.push_str(" |");
            for (key, value) in &record.data {
                result.push(' ');
                if colored {
                    result.push_str("\x1b[36m"); // cyan
                }
                result.push_str(key);
                if colored {
                    result.push_str("\x1b[0m");
                }
                write!(result, "={}", value)?;
            }
        }

        Ok(result)
    }
}

/// 带颜色的日志级别字符串，宽度与无颜色时一致
fn colored_level(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Fatal => "\u{1b}[35;1mFATAL\u{1b}[0m", // 品红+加粗
        LogLevel::Error => "\u{1b}[31mERROR\u{1b}[0m",   // 红色
        LogLevel::Info => "\u{1b}[32mINFO \u{1b}[0m",    // 绿色
        LogLevel::Debug => "\u{1b}[36mDEBUG\u{1b}[0m",   // 青色
    }
}

crate::impl_from!(TextFormatterConfig => TextFormatter);
crate::impl_box_from!(TextFormatter => dyn LogFormatter);
