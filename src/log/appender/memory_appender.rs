use crate::log::appender::LogAppender;
use anyhow::{anyhow, Result};
use std::sync::{Arc, Mutex};

/// 内存输出器
///
/// 把每一行日志保存在共享缓冲区中，克隆出的句柄共享同一个缓冲区
#[derive(Clone, Default)]
pub struct MemoryAppender {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemoryAppender {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已写入的所有行（不含换行符）
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }

    /// 按写入格式拼接的全部内容，每行以换行符结尾
    pub fn contents(&self) -> String {
        self.lines()
            .into_iter()
            .map(|mut line| {
                line.push('\n');
                line
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().map(|lines| lines.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.clear();
        }
    }
}

impl LogAppender for MemoryAppender {
    fn append(&self, formatted_message: &str) -> Result<()> {
        self.lines
            .lock()
            .map_err(|_| anyhow!("memory appender lock poisoned"))?
            .push(formatted_message.to_string());
        Ok(())
    }
}
