use crate::log::appender::LogAppender;
use anyhow::Result;
use serde::Deserialize;
use smart_default::SmartDefault;
use std::io::{self, Write};

/// 终端输出目标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    #[default]
    Stdout,
    Stderr,
}

/// ConsoleAppender 配置
#[derive(Debug, Clone, Deserialize, SmartDefault)]
#[serde(default)]
pub struct ConsoleAppenderConfig {
    /// 输出目标
    pub target: Target,

    /// 每行写入后是否立即刷新
    #[default = true]
    pub auto_flush: bool,
}

/// 终端输出器
///
/// 将日志输出到标准输出或标准错误，整行写入期间持有标准流的锁
pub struct ConsoleAppender {
    config: ConsoleAppenderConfig,
}

impl ConsoleAppender {
    pub fn new(config: ConsoleAppenderConfig) -> Self {
        Self { config }
    }

    pub fn stdout() -> Self {
        Self::new(ConsoleAppenderConfig::default())
    }

    pub fn stderr() -> Self {
        Self::new(ConsoleAppenderConfig {
            target: Target::Stderr,
            ..Default::default()
        })
    }

    pub fn target(&self) -> Target {
        self.config.target
    }
}

fn write_line(out: &mut impl Write, message: &str, auto_flush: bool) -> io::Result<()> {
    let mut line = String::with_capacity(message.len() + 1);
    line.push_str(message);
    line.push('\n');
    out.write_all(line.as_bytes())?;
    if auto_flush {
        out.flush()?;
    }
    Ok(())
}

impl LogAppender for ConsoleAppender {
    fn append(&self, formatted_message: &str) -> Result<()> {
        match self.config.target {
            Target::Stdout => {
                write_line(&mut io::stdout().lock(), formatted_message, self.config.auto_flush)?
            }
            Target::Stderr => {
                write_line(&mut io::stderr().lock(), formatted_message, self.config.auto_flush)?
            }
        }
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        match self.config.target {
            Target::Stdout => io::stdout().flush()?,
            Target::Stderr => io::stderr().flush()?,
        }
        Ok(())
    }
}

crate::impl_from!(ConsoleAppenderConfig => ConsoleAppender);
crate::impl_box_from!(ConsoleAppender => dyn LogAppender);
