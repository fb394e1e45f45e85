use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// 会话计数器
///
/// 每个通过 `Logger::new` 或 `Logger::session` 创建的 Logger 拥有一个独立的计数器，
/// 它的直接子会话都从这个计数器分配编号。`with_data` 派生的 Logger 共享同一个计数器。
#[derive(Debug, Default)]
pub struct SessionCounter {
    last: AtomicU64,
}

impl SessionCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 原子地分配下一个子会话编号，从 1 开始连续递增
    ///
    /// 并发调用时每个调用者得到不同的编号，不会重复也不会跳号
    pub fn next_segment(&self) -> u64 {
        self.last.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// 已分配的编号数量
    pub fn allocated(&self) -> u64 {
        self.last.load(Ordering::Relaxed)
    }
}

/// 会话路径，例如 `1.2.1`
///
/// 根 Logger 的路径为空
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SessionPath(Vec<u64>);

impl SessionPath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// 在末尾追加一个编号，返回新的路径
    pub fn child(&self, segment: u64) -> Self {
        let mut segments = Vec::with_capacity(self.0.len() + 1);
        segments.extend_from_slice(&self.0);
        segments.push(segment);
        Self(segments)
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> &[u64] {
        &self.0
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// 是否是 `other` 的直接子路径
    pub fn is_child_of(&self, other: &SessionPath) -> bool {
        self.0.len() == other.0.len() + 1 && self.0.starts_with(&other.0)
    }
}

impl fmt::Display for SessionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

impl From<Vec<u64>> for SessionPath {
    fn from(segments: Vec<u64>) -> Self {
        Self(segments)
    }
}
