use crate::log::level::LogLevel;
use crate::log::record::LogRecord;
use crate::log::sink::Sink;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// 阈值可在运行时调整的 Sink
///
/// 包装另一个 Sink，先按自身阈值过滤，再交给内部 Sink。
/// 内部 Sink 通常设置为 `debug`，由本层决定实际输出的级别
pub struct ReconfigurableSink {
    sink: Arc<dyn Sink>,
    min_level: AtomicU8,
}

impl ReconfigurableSink {
    pub fn new(sink: Arc<dyn Sink>, min_level: LogLevel) -> Self {
        Self {
            sink,
            min_level: AtomicU8::new(min_level.as_u8()),
        }
    }

    pub fn set_min_level(&self, level: LogLevel) {
        self.min_level.store(level.as_u8(), Ordering::Relaxed);
    }

    pub fn min_level(&self) -> LogLevel {
        LogLevel::from_u8(self.min_level.load(Ordering::Relaxed)).unwrap_or(LogLevel::Debug)
    }
}

impl Sink for ReconfigurableSink {
    fn log(&self, record: &LogRecord) {
        if record.level < self.min_level() {
            return;
        }
        self.sink.log(record);
    }

    fn enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level() && self.sink.enabled(level)
    }

    fn flush(&self) {
        self.sink.flush();
    }
}
