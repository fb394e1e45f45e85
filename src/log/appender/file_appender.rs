use crate::log::appender::LogAppender;
use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// FileAppender 配置
#[derive(Debug, Clone, Deserialize)]
pub struct FileAppenderConfig {
    /// 日志文件路径
    pub file_path: String,
}

/// 文件输出器
///
/// 以追加模式写入文件。文件在第一次写入时打开（必要时创建父目录），
/// 因此构造过程不会失败，打开失败作为写入错误返回
pub struct FileAppender {
    path: PathBuf,
    file: Mutex<Option<File>>,
}

impl FileAppender {
    pub fn new(config: FileAppenderConfig) -> Self {
        Self {
            path: PathBuf::from(config.file_path),
            file: Mutex::new(None),
        }
    }

    /// 创建并立即打开文件，用于需要尽早发现路径错误的场景
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = open_append(&path)?;
        Ok(Self {
            path,
            file: Mutex::new(Some(file)),
        })
    }

    /// 获取日志文件路径
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn open_append(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}

impl LogAppender for FileAppender {
    fn append(&self, formatted_message: &str) -> Result<()> {
        let mut guard = self
            .file
            .lock()
            .map_err(|_| anyhow!("file appender lock poisoned: {}", self.path.display()))?;

        if guard.is_none() {
            *guard = Some(open_append(&self.path)?);
        }

        if let Some(file) = guard.as_mut() {
            let mut line = String::with_capacity(formatted_message.len() + 1);
            line.push_str(formatted_message);
            line.push('\n');
            file.write_all(line.as_bytes())?;
        }
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        let mut guard = self
            .file
            .lock()
            .map_err(|_| anyhow!("file appender lock poisoned: {}", self.path.display()))?;
        if let Some(file) = guard.as_mut() {
            file.flush()?;
        }
        Ok(())
    }
}

crate::impl_from!(FileAppenderConfig => FileAppender);
crate::impl_box_from!(FileAppender => dyn LogAppender);
