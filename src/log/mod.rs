//! 日志模块
//!
//! 结构化、按会话关联的日志。
//!
//! # 特性
//!
//! - 日志级别：Debug, Info, Error, Fatal
//! - 会话派生：`session` 生成层级编号（`1`、`1.1`、`1.2`、`2` ...），把同一调用链上的日志关联起来
//! - 数据上下文：`with_data` 逐层累积字段，后写入的覆盖先写入的
//! - 多个 Sink 各自按级别过滤，一个 Sink 写入失败不影响其他 Sink
//! - 可扩展的格式化器：JsonFormatter、TextFormatter
//! - 多种输出目标：ConsoleAppender、FileAppender、WriterAppender、MemoryAppender
//! - 基于配置的创建
//!
//! # 快速开始
//!
//! ```rust,no_run
//! use sessionlog::log::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = LoggerConfig::from_json(r#"
//!         {
//!             name: "svc",
//!             sinks: [
//!                 {
//!                     level: "debug",
//!                     formatter: { type: "TextFormatter", options: { colored: true } },
//!                     appender: { type: "ConsoleAppender", options: { target: "stdout" } },
//!                 },
//!             ],
//!         }
//!     "#)?;
//!
//!     let logger = Logger::from_config(&config)?;
//!
//!     let request = logger.session_with_data("request", sessionlog::data! { "path" => "/users" });
//!     request.info("started");
//!     request.session("db").debug("query");
//!
//!     Ok(())
//! }
//! ```

#[macro_use]
pub mod macros;

pub mod appender;
pub mod config;
pub mod data;
pub mod formatter;
pub mod level;
pub mod logger;
pub mod record;
pub mod session;
pub mod sink;

// 重新导出核心类型
pub use config::{LoggerConfig, SinkConfig};
pub use data::{Data, DataValue};
pub use level::{LogLevel, ParseLevelError};
pub use logger::{Logger, FATAL_EXIT_CODE};
pub use record::{format_record, LogRecord, ERROR_KEY, SESSION_KEY, TRACE_KEY};
pub use session::{SessionCounter, SessionPath};

pub use appender::{
    register_appenders, ConsoleAppender, ConsoleAppenderConfig, FileAppender, FileAppenderConfig,
    LogAppender, MemoryAppender, Target, WriterAppender,
};
pub use formatter::{
    register_formatters, JsonFormatter, JsonFormatterConfig, LogFormatter, TextFormatter,
    TextFormatterConfig,
};
pub use sink::{
    ReconfigurableSink, RedactingSink, Redactor, Sink, TestLogger, TestSink, WriterSink, REDACTED,
};
