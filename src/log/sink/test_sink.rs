use crate::log::appender::MemoryAppender;
use crate::log::formatter::JsonFormatter;
use crate::log::level::LogLevel;
use crate::log::logger::Logger;
use crate::log::record::LogRecord;
use crate::log::sink::{Sink, WriterSink};
use std::ops::Deref;
use std::sync::Arc;

/// 内存中的测试 Sink
///
/// 以 `debug` 阈值接收所有记录，按 JSON 行保存，便于在测试里对调用方的日志做断言
pub struct TestSink {
    buffer: MemoryAppender,
    sink: WriterSink,
}

impl TestSink {
    pub fn new() -> Self {
        let buffer = MemoryAppender::new();
        let sink = WriterSink::new(
            Arc::new(buffer.clone()),
            Arc::new(JsonFormatter::default()),
            LogLevel::Debug,
        );
        Self { buffer, sink }
    }

    /// 已写入的 JSON 行
    pub fn lines(&self) -> Vec<String> {
        self.buffer.lines()
    }

    /// 全部输出内容
    pub fn buffer(&self) -> String {
        self.buffer.contents()
    }

    /// 解析后的日志记录
    ///
    /// # Panics
    ///
    /// 任意一行无法解析为 LogRecord 时 panic，并带上该行内容
    pub fn logs(&self) -> Vec<LogRecord> {
        self.lines()
            .iter()
            .map(|line| {
                LogRecord::from_json_line(line)
                    .unwrap_or_else(|e| panic!("invalid log line {:?}: {}", line, e))
            })
            .collect()
    }

    /// 所有记录的 message 字段
    pub fn log_messages(&self) -> Vec<String> {
        self.logs().into_iter().map(|record| record.message).collect()
    }

    pub fn clear(&self) {
        self.buffer.clear();
    }
}

impl Default for TestSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for TestSink {
    fn log(&self, record: &LogRecord) {
        self.sink.log(record);
    }

    fn enabled(&self, level: LogLevel) -> bool {
        self.sink.enabled(level)
    }
}

/// 带测试 Sink 的根 Logger
///
/// ```ignore
/// let logger = TestLogger::new("test");
/// handle_request(&logger.session("handler"));
/// assert_eq!(logger.log_messages(), vec!["handler.done"]);
/// ```
pub struct TestLogger {
    logger: Logger,
    sink: Arc<TestSink>,
}

impl TestLogger {
    pub fn new(component: impl Into<String>) -> Self {
        let logger = Logger::new(component);
        let sink = Arc::new(TestSink::new());
        logger.register_sink(sink.clone());
        Self { logger, sink }
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    pub fn sink(&self) -> &Arc<TestSink> {
        &self.sink
    }

    pub fn logs(&self) -> Vec<LogRecord> {
        self.sink.logs()
    }

    pub fn log_messages(&self) -> Vec<String> {
        self.sink.log_messages()
    }
}

impl Deref for TestLogger {
    type Target = Logger;

    fn deref(&self) -> &Logger {
        &self.logger
    }
}
