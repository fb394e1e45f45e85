use crate::cfg::{create_trait_from_type_options, TypeOptions};
use crate::log::appender::LogAppender;
use crate::log::formatter::LogFormatter;
use crate::log::level::LogLevel;
use crate::log::logger::Logger;
use crate::log::sink::{RedactingSink, Sink, WriterSink};
use anyhow::{Context, Result};
use serde::Deserialize;
use smart_default::SmartDefault;
use std::sync::{Arc, Once};

/// 注册所有日志组件（只执行一次）
static REGISTER_ONCE: Once = Once::new();

fn register_components() {
    REGISTER_ONCE.call_once(|| {
        let _ = crate::log::register_formatters();
        let _ = crate::log::register_appenders();
    });
}

/// Sink 配置
#[derive(Debug, Clone, Deserialize, SmartDefault, PartialEq)]
#[serde(default)]
pub struct SinkConfig {
    /// 最低输出级别
    #[default = "info"]
    pub level: String,

    /// Formatter 配置
    #[default(TypeOptions::new("JsonFormatter"))]
    pub formatter: TypeOptions,

    /// Appender 配置
    #[default(TypeOptions::new("ConsoleAppender"))]
    pub appender: TypeOptions,

    /// 是否在输出前遮蔽敏感数据
    pub redact: bool,
}

impl SinkConfig {
    /// 按配置创建 Sink
    pub fn build(&self) -> Result<Arc<dyn Sink>> {
        register_components();

        let level: LogLevel = self.level.parse()?;

        let formatter: Box<dyn LogFormatter> = create_trait_from_type_options(&self.formatter)
            .with_context(|| format!("create formatter '{}'", self.formatter.type_name))?;
        let appender: Box<dyn LogAppender> = create_trait_from_type_options(&self.appender)
            .with_context(|| format!("create appender '{}'", self.appender.type_name))?;

        let sink: Arc<dyn Sink> = Arc::new(WriterSink::new(
            Arc::from(appender),
            Arc::from(formatter),
            level,
        ));

        if self.redact {
            Ok(Arc::new(RedactingSink::with_defaults(sink)))
        } else {
            Ok(sink)
        }
    }
}

/// Logger 配置
///
/// ```text
/// {
///     name: "svc",
///     sinks: [
///         { level: "debug", formatter: { type: "TextFormatter", options: { colored: true } } },
///         { level: "error", appender: { type: "FileAppender", options: { file_path: "/var/log/svc.log" } } },
///     ],
/// }
/// ```
#[derive(Debug, Clone, Deserialize, SmartDefault, PartialEq)]
#[serde(default)]
pub struct LoggerConfig {
    /// 根 Logger 名称
    #[default = "app"]
    pub name: String,

    /// Sink 列表
    #[default(vec![SinkConfig::default()])]
    pub sinks: Vec<SinkConfig>,
}

impl LoggerConfig {
    /// 从 JSON 字符串解析（支持 JSON5 格式）
    pub fn from_json(json_str: &str) -> Result<Self> {
        Ok(json5::from_str(json_str)?)
    }

    /// 从 YAML 字符串解析
    pub fn from_yaml(yaml_str: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml_str)?)
    }

    /// 从 TOML 字符串解析
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }
}

impl Logger {
    /// 按配置创建根 Logger 并注册所有 Sink
    ///
    /// 任意一个 Sink 配置无效（未知级别、未注册的类型、选项错误）都会返回错误
    pub fn from_config(config: &LoggerConfig) -> Result<Self> {
        let logger = Logger::new(config.name.clone());
        for (i, sink_config) in config.sinks.iter().enumerate() {
            let sink = sink_config
                .build()
                .with_context(|| format!("invalid sink #{}", i))?;
            logger.register_sink(sink);
        }
        Ok(logger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sink_config_default() {
        let config = SinkConfig::default();
        assert_eq!(config.level, "info");
        assert_eq!(config.formatter.type_name, "JsonFormatter");
        assert_eq!(config.appender.type_name, "ConsoleAppender");
        assert!(!config.redact);
    }

    #[test]
    fn test_logger_config_default() -> Result<()> {
        let config = LoggerConfig::default();
        assert_eq!(config.name, "app");
        assert_eq!(config.sinks.len(), 1);

        let logger = Logger::from_config(&config)?;
        assert_eq!(logger.source(), "app");
        assert_eq!(logger.sink_count(), 1);
        Ok(())
    }

    #[test]
    fn test_logger_config_from_json5() -> Result<()> {
        let config = LoggerConfig::from_json(
            r#"
            {
                name: "svc",
                sinks: [
                    {
                        level: "debug",
                        formatter: { type: "TextFormatter", options: { colored: false } },
                        appender: { type: "ConsoleAppender", options: { target: "stderr" } },
                    },
                    { level: "error", redact: true },
                ],
            }
        "#,
        )?;

        assert_eq!(config.name, "svc");
        assert_eq!(config.sinks.len(), 2);
        assert_eq!(config.sinks[1].formatter.type_name, "JsonFormatter");
        assert!(config.sinks[1].redact);

        let logger = Logger::from_config(&config)?;
        assert_eq!(logger.sink_count(), 2);
        Ok(())
    }

    #[test]
    fn test_logger_config_from_yaml() -> Result<()> {
        let config = LoggerConfig::from_yaml(
            r#"
name: svc
sinks:
  - level: fatal
"#,
        )?;

        assert_eq!(config.sinks[0].level, "fatal");
        assert_eq!(config.sinks[0].appender, TypeOptions::new("ConsoleAppender"));
        Ok(())
    }

    #[test]
    fn test_logger_config_from_toml() -> Result<()> {
        let config = LoggerConfig::from_toml(
            r#"
name = "svc"

[[sinks]]
level = "error"

[sinks.formatter]
type = "TextFormatter"
"#,
        )?;

        assert_eq!(config.sinks[0].level, "error");
        assert_eq!(config.sinks[0].formatter.type_name, "TextFormatter");
        Ok(())
    }

    #[test]
    fn test_invalid_level() {
        let config = LoggerConfig {
            name: "svc".to_string(),
            sinks: vec![SinkConfig {
                level: "verbose".to_string(),
                ..Default::default()
            }],
        };

        let err = Logger::from_config(&config).unwrap_err();
        assert!(format!("{:#}", err).contains("invalid log level: verbose"));
    }

    #[test]
    fn test_unregistered_appender() {
        let config = LoggerConfig {
            name: "svc".to_string(),
            sinks: vec![SinkConfig {
                appender: TypeOptions::new("KafkaAppender"),
                ..Default::default()
            }],
        };

        let err = Logger::from_config(&config).unwrap_err();
        assert!(format!("{:#}", err).contains("KafkaAppender"));
    }
}
