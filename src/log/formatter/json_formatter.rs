use crate::log::data::{Data, DataValue};
use crate::log::formatter::LogFormatter;
use crate::log::record::LogRecord;
use anyhow::Result;
use serde::Deserialize;
use smart_default::SmartDefault;

/// 数据无法编码时替换后的字段
pub const SERIALIZATION_ERROR_KEY: &str = "serialization_error";
pub const DATA_DUMP_KEY: &str = "data_dump";

/// JsonFormatter 配置（保留扩展性）
#[derive(Debug, Clone, Deserialize, PartialEq, SmartDefault)]
#[serde(default)]
pub struct JsonFormatterConfig {}

/// JSON 格式化器
///
/// 每条记录输出为一个 JSON 对象，恰好包含 `timestamp`、`level`、`source`、`message`、`data` 五个字段
pub struct JsonFormatter {}

impl JsonFormatter {
    pub fn new(_: JsonFormatterConfig) -> Self {
        Self {}
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new(JsonFormatterConfig::default())
    }
}

impl LogFormatter for JsonFormatter {
    fn format(&self, record: &LogRecord) -> Result<String> {
        match serde_json::to_string(record) {
            Ok(line) => Ok(line),
            // 无法编码的值移入 data_dump，其余字段（包括 session、error）保持原样
            Err(e) => {
                let (mut data, dump) = split_unencodable(&record.data);
                data.insert(SERIALIZATION_ERROR_KEY, e.to_string());
                data.insert(DATA_DUMP_KEY, DataValue::String(dump));
                let fallback = LogRecord {
                    data,
                    ..record.clone()
                };
                Ok(serde_json::to_string(&fallback)?)
            }
        }
    }
}

fn split_unencodable(data: &Data) -> (Data, String) {
    let mut encodable = Data::new();
    let mut dumped = Vec::new();
    for (key, value) in data {
        if matches!(value, DataValue::Unencodable { .. }) {
            dumped.push(format!("{}={}", key, value));
        } else {
            encodable.insert(key.clone(), value.clone());
        }
    }
    (encodable, dumped.join(" "))
}

crate::impl_from!(JsonFormatterConfig => JsonFormatter);
crate::impl_box_from!(JsonFormatter => dyn LogFormatter);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::level::LogLevel;
    use serde_json::Value;

    #[test]
    fn test_json_formatter_format() {
        let formatter = JsonFormatter::new(JsonFormatterConfig::default());
        let record = LogRecord::new(LogLevel::Info, "svc", "test message", Data::new());

        let formatted = formatter.format(&record).unwrap();
        assert!(!formatted.contains('\n'));

        let value: Value = serde_json::from_str(&formatted).unwrap();
        assert_eq!(value["level"], "info");
        assert_eq!(value["source"], "svc");
        assert_eq!(value["message"], "test message");
        assert!(value["timestamp"].as_str().unwrap().ends_with('Z'));
        assert!(value["data"].as_object().unwrap().is_empty());
    }

    #[test]
    fn test_json_formatter_with_data() {
        let formatter = JsonFormatter::default();
        let mut data = Data::new();
        data.insert("user_id", 12345);
        data.insert("username", "alice");
        data.insert("success", true);
        let record = LogRecord::new(LogLevel::Debug, "svc", "user logged in", data);

        let formatted = formatter.format(&record).unwrap();
        let value: Value = serde_json::from_str(&formatted).unwrap();

        assert_eq!(value["data"]["user_id"], 12345);
        assert_eq!(value["data"]["username"], "alice");
        assert_eq!(value["data"]["success"], true);
    }

    #[test]
    fn test_json_formatter_unencodable_data() {
        let formatter = JsonFormatter::default();
        let mut data = Data::new();
        data.insert("ok", 1);
        data.insert(
            "bad",
            DataValue::Unencodable {
                type_name: "Widget",
                reason: "key must be a string".to_string(),
            },
        );
        let record = LogRecord::new(LogLevel::Error, "svc", "failed", data);

        let formatted = formatter.format(&record).unwrap();
        let value: Value = serde_json::from_str(&formatted).unwrap();

        assert_eq!(value["message"], "failed");
        assert_eq!(value["data"]["ok"], 1);
        assert!(value["data"].get("bad").is_none());
        let error = value["data"][SERIALIZATION_ERROR_KEY].as_str().unwrap();
        assert!(error.contains("Widget"));
        let dump = value["data"][DATA_DUMP_KEY].as_str().unwrap();
        assert_eq!(dump, "bad=<unencodable Widget>");
    }

    #[test]
    fn test_json_formatter_unencodable_keeps_session_and_error() {
        use crate::log::logger::Logger;
        use crate::log::sink::TestSink;
        use std::collections::HashMap;
        use std::sync::Arc;

        let logger = Logger::new("svc");
        let sink = Arc::new(TestSink::new());
        logger.register_sink(sink.clone());

        let mut points = HashMap::new();
        points.insert((1, 2), "a");
        logger.session("req").errorm(
            "failed",
            "boom",
            crate::data! { "bad" => DataValue::from_struct(&points), "attempt" => 2 },
        );

        let lines = sink.lines();
        assert_eq!(lines.len(), 1);
        let value: Value = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(value["message"], "req.failed");
        assert_eq!(value["data"]["session"], "1");
        assert_eq!(value["data"]["error"], "boom");
        assert_eq!(value["data"]["attempt"], 2);
        assert!(value["data"][SERIALIZATION_ERROR_KEY].is_string());
        assert!(value["data"][DATA_DUMP_KEY].as_str().unwrap().starts_with("bad=<unencodable"));
    }

    #[test]
    fn test_json_formatter_from_config() {
        let config = JsonFormatterConfig::default();
        let _ = JsonFormatter::from(config);
    }
}
