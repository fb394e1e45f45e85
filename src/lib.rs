//! sessionlog - 按会话关联的结构化日志
//!
//! ## 模块
//!
//! - **log**: Logger、会话派生、Sink、格式化器与输出器
//! - **cfg**: `{ type, options }` 形式的配置注册与创建
//!
//! ## 设计理念
//!
//! - Logger 是不可变的值，沿调用链传递和派生，不使用全局 Logger
//! - 会话编号由每个 Logger 自有的原子计数器分配，并发派生不会重复或跳号
//! - 日志调用不返回错误，Sink 的写入失败只在带外报告

#[macro_use]
pub mod cfg;
pub mod log;

// 重新导出主要的公共 API
pub use cfg::{create_trait_from_type_options, register_trait, TypeOptions};

pub use log::{
    Data, DataValue, LogAppender, LogFormatter, LogLevel, LogRecord, Logger, LoggerConfig, Sink,
    TestLogger, TestSink, WriterSink,
};
