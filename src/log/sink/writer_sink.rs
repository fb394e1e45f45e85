use crate::log::appender::{ConsoleAppender, LogAppender, WriterAppender};
use crate::log::formatter::{JsonFormatter, LogFormatter, TextFormatter, TextFormatterConfig};
use crate::log::level::LogLevel;
use crate::log::record::LogRecord;
use crate::log::sink::Sink;
use std::io::Write;
use std::sync::Arc;

/// 由格式化器和输出器组成的 Sink
///
/// 记录级别不低于 `min_level` 时先格式化再追加到输出器。
/// 格式化或写入失败时向 fallback 输出器（默认是标准错误）写一行说明，错误不会向上传播
pub struct WriterSink {
    min_level: LogLevel,
    formatter: Arc<dyn LogFormatter>,
    appender: Arc<dyn LogAppender>,
    fallback: Arc<dyn LogAppender>,
}

impl WriterSink {
    pub fn new(
        appender: Arc<dyn LogAppender>,
        formatter: Arc<dyn LogFormatter>,
        min_level: LogLevel,
    ) -> Self {
        Self {
            min_level,
            formatter,
            appender,
            fallback: Arc::new(ConsoleAppender::stderr()),
        }
    }

    /// 输出 JSON 行的 Sink
    pub fn json<W: Write + Send + 'static>(writer: W, min_level: LogLevel) -> Self {
        Self::new(
            Arc::new(WriterAppender::new(writer)),
            Arc::new(JsonFormatter::default()),
            min_level,
        )
    }

    /// 输出可读文本的 Sink
    pub fn pretty<W: Write + Send + 'static>(writer: W, min_level: LogLevel) -> Self {
        Self::new(
            Arc::new(WriterAppender::new(writer)),
            Arc::new(TextFormatter::new(TextFormatterConfig::default())),
            min_level,
        )
    }

    /// 替换报告写入失败的输出器
    pub fn with_fallback(mut self, fallback: Arc<dyn LogAppender>) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }

    fn report_failure(&self, what: &str, err: &anyhow::Error) {
        let _ = self
            .fallback
            .append(&format!("log sink {} failed: {:#}", what, err));
    }
}

impl Sink for WriterSink {
    fn log(&self, record: &LogRecord) {
        if record.level < self.min_level {
            return;
        }

        let result = self
            .formatter
            .format(record)
            .and_then(|line| self.appender.append(&line));
        if let Err(e) = result {
            self.report_failure(&format!("write of '{}'", record.message), &e);
        }
    }

    fn enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    fn flush(&self) {
        if let Err(e) = self.appender.flush() {
            self.report_failure("flush", &e);
        }
    }
}
