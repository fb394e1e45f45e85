use crate::log::appender::LogAppender;
use anyhow::{anyhow, Result};
use std::io::Write;
use std::sync::Mutex;

/// 任意 `Write` 目标的输出器
///
/// 适合 socket、管道或测试用的缓冲区等调用方自行创建的目标
pub struct WriterAppender<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> WriterAppender<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// 取回底层 writer
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|_| anyhow!("writer appender lock poisoned"))
    }
}

impl<W: Write + Send> LogAppender for WriterAppender<W> {
    fn append(&self, formatted_message: &str) -> Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| anyhow!("writer appender lock poisoned"))?;

        let mut line = String::with_capacity(formatted_message.len() + 1);
        line.push_str(formatted_message);
        line.push('\n');
        writer.write_all(line.as_bytes())?;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| anyhow!("writer appender lock poisoned"))?;
        writer.flush()?;
        Ok(())
    }
}
