use anyhow::Result;

/// 日志输出器 trait
///
/// 负责将格式化后的一行日志追加到目标介质。实现内部需要串行化对介质的访问，
/// 保证并发写入时每一行都完整输出、互不交错
pub trait LogAppender: Send + Sync {
    /// 输出一行日志，由实现负责追加换行符
    fn append(&self, formatted_message: &str) -> Result<()>;

    /// 刷新缓冲区（默认实现为空操作）
    fn flush(&self) -> Result<()> {
        Ok(())
    }
}
