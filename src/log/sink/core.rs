use crate::log::level::LogLevel;
use crate::log::record::LogRecord;

/// 日志输出端
///
/// 每个 Sink 独立决定接受哪些级别的记录。`log` 不返回错误：
/// 写入失败只能在 Sink 内部处理，不会影响调用方或其他 Sink
pub trait Sink: Send + Sync {
    /// 处理一条记录，低于阈值的记录直接忽略
    fn log(&self, record: &LogRecord);

    /// 是否接受该级别的记录，Logger 据此跳过无人接收的格式化
    fn enabled(&self, _level: LogLevel) -> bool {
        true
    }

    /// 刷新底层输出（默认实现为空操作）
    fn flush(&self) {}
}
