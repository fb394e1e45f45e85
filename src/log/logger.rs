use crate::log::data::{Data, DataValue};
use crate::log::level::LogLevel;
use crate::log::record::{format_record, LogRecord, TRACE_KEY};
use crate::log::session::{SessionCounter, SessionPath};
use crate::log::sink::Sink;
use arc_swap::ArcSwap;
use std::backtrace::Backtrace;
use std::fmt::{self, Display};
use std::sync::Arc;

/// Fatal 日志之后进程的退出码
pub const FATAL_EXIT_CODE: i32 = 1;

type SinkList = Vec<Arc<dyn Sink>>;

/// 会话日志器
///
/// Logger 是不可变的值，派生操作返回新的 Logger：
///
/// - `session` 分配一个新的会话编号，名称链追加一段，并拥有自己的子会话计数器
/// - `with_data` 只合并数据，会话编号和计数器与原 Logger 共享
///
/// 同一个根派生出的所有 Logger 共享同一组 Sink，注册的 Sink 对已派生和之后派生的 Logger 都可见。
/// Logger 应该沿调用链传递和派生，而不是在构造长期存活的对象时注入
///
/// # 示例
///
/// ```rust
/// use sessionlog::log::{Logger, LogLevel, WriterSink};
/// use std::sync::Arc;
///
/// let logger = Logger::new("svc");
/// logger.register_sink(Arc::new(WriterSink::json(std::io::stdout(), LogLevel::Info)));
///
/// let handler = logger.session("handler");
/// handler.info("request-received");
/// ```
#[derive(Clone)]
pub struct Logger {
    source: Arc<str>,
    session_name: String,
    session_path: SessionPath,
    data: Data,
    sinks: Arc<ArcSwap<SinkList>>,
    counter: Arc<SessionCounter>,
}

impl Logger {
    /// 创建根 Logger：会话路径为空、没有数据、没有 Sink
    pub fn new(name: impl Into<String>) -> Self {
        let name: String = name.into();
        Self {
            source: Arc::from(name),
            session_name: String::new(),
            session_path: SessionPath::root(),
            data: Data::new(),
            sinks: Arc::new(ArcSwap::from_pointee(Vec::new())),
            counter: Arc::new(SessionCounter::new()),
        }
    }

    /// 注册 Sink，对同一个根派生出的所有 Logger 生效
    pub fn register_sink(&self, sink: Arc<dyn Sink>) {
        self.sinks.rcu(|sinks| {
            let mut sinks = SinkList::clone(sinks);
            sinks.push(Arc::clone(&sink));
            sinks
        });
    }

    /// 派生子会话
    pub fn session(&self, name: &str) -> Logger {
        self.session_with_data(name, Data::new())
    }

    /// 派生子会话并合并数据，新数据覆盖同名字段
    pub fn session_with_data(
        &self,
        name: &str,
        data: impl IntoIterator<Item = (impl Into<String>, DataValue)>,
    ) -> Logger {
        let segment = self.counter.next_segment();
        let session_name = if self.session_path.is_root() {
            name.to_string()
        } else {
            format!("{}.{}", self.session_name, name)
        };

        Logger {
            source: Arc::clone(&self.source),
            session_name,
            session_path: self.session_path.child(segment),
            data: self.data.merged(data),
            sinks: Arc::clone(&self.sinks),
            counter: Arc::new(SessionCounter::new()),
        }
    }

    /// 合并数据，返回新的 Logger，会话编号和计数器不变
    pub fn with_data(
        &self,
        data: impl IntoIterator<Item = (impl Into<String>, DataValue)>,
    ) -> Logger {
        Logger {
            data: self.data.merged(data),
            ..self.clone()
        }
    }

    /// 根 Logger 的名称
    pub fn source(&self) -> &str {
        &self.source
    }

    /// 会话名称链，根 Logger 为空字符串；空的会话名称同样保留在链中
    pub fn session_name(&self) -> &str {
        &self.session_name
    }

    pub fn session_path(&self) -> &SessionPath {
        &self.session_path
    }

    /// 会话编号，例如 `1.2`，根 Logger 为空字符串
    pub fn session_id(&self) -> String {
        self.session_path.to_string()
    }

    /// 累积的数据上下文
    pub fn data(&self) -> &Data {
        &self.data
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.load().len()
    }

    /// 按当前 Logger 的状态构造一条记录
    pub fn format(
        &self,
        level: LogLevel,
        message: &str,
        err: Option<&dyn Display>,
        data: Data,
    ) -> LogRecord {
        format_record(
            &self.source,
            &self.session_name,
            &self.session_path,
            &self.data,
            level,
            message,
            err,
            data,
        )
    }

    /// 记录日志并分发给所有 Sink
    ///
    /// 级别过滤由各个 Sink 自己完成；没有任何 Sink 接受该级别时不会构造记录
    pub fn log(&self, level: LogLevel, message: &str, err: Option<&dyn Display>, data: Data) {
        let sinks = self.sinks.load();
        if !sinks.iter().any(|sink| sink.enabled(level)) {
            return;
        }

        let record = self.format(level, message, err, data);
        for sink in sinks.iter() {
            sink.log(&record);
        }
    }

    /// 刷新所有 Sink
    pub fn flush(&self) {
        for sink in self.sinks.load().iter() {
            sink.flush();
        }
    }

    /// 记录 DEBUG 级别日志
    pub fn debug(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Debug, message.as_ref(), None, Data::new());
    }

    /// 记录 DEBUG 级别日志（带数据）
    ///
    /// # 示例
    ///
    /// ```ignore
    /// logger.debugm("processing-request", vec![
    ///     ("endpoint", "/api/users".into()),
    ///     ("method", "GET".into())
    /// ]);
    /// ```
    pub fn debugm(
        &self,
        message: impl AsRef<str>,
        data: impl IntoIterator<Item = (impl Into<String>, DataValue)>,
    ) {
        self.log(LogLevel::Debug, message.as_ref(), None, data.into_iter().collect());
    }

    /// 记录 INFO 级别日志
    pub fn info(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Info, message.as_ref(), None, Data::new());
    }

    /// 记录 INFO 级别日志（带数据）
    pub fn infom(
        &self,
        message: impl AsRef<str>,
        data: impl IntoIterator<Item = (impl Into<String>, DataValue)>,
    ) {
        self.log(LogLevel::Info, message.as_ref(), None, data.into_iter().collect());
    }

    /// 记录 ERROR 级别日志，错误描述写入 `error` 字段
    pub fn error(&self, message: impl AsRef<str>, err: impl Display) {
        self.log(LogLevel::Error, message.as_ref(), Some(&err), Data::new());
    }

    /// 记录 ERROR 级别日志（带数据）
    ///
    /// # 示例
    ///
    /// ```ignore
    /// logger.errorm("connect-failed", &err, vec![
    ///     ("host", "localhost".into()),
    ///     ("port", 5432.into()),
    /// ]);
    /// ```
    pub fn errorm(
        &self,
        message: impl AsRef<str>,
        err: impl Display,
        data: impl IntoIterator<Item = (impl Into<String>, DataValue)>,
    ) {
        self.log(
            LogLevel::Error,
            message.as_ref(),
            Some(&err),
            data.into_iter().collect(),
        );
    }

    /// 记录 FATAL 级别日志后退出进程
    pub fn fatal(&self, message: impl AsRef<str>, err: impl Display) -> ! {
        self.fatalm(message, err, Data::new())
    }

    /// 记录 FATAL 级别日志（带数据）后退出进程
    ///
    /// 记录中附带 `trace` 调用栈。所有 Sink 同步写入并刷新之后，进程以非零状态码退出
    pub fn fatalm(
        &self,
        message: impl AsRef<str>,
        err: impl Display,
        data: impl IntoIterator<Item = (impl Into<String>, DataValue)>,
    ) -> ! {
        let mut data: Data = data.into_iter().collect();
        data.insert(TRACE_KEY, Backtrace::force_capture().to_string());

        self.log(LogLevel::Fatal, message.as_ref(), Some(&err), data);
        self.flush();
        std::process::exit(FATAL_EXIT_CODE)
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("source", &self.source)
            .field("session_name", &self.session_name)
            .field("session_id", &self.session_id())
            .field("data", &self.data)
            .field("sinks", &self.sink_count())
            .finish()
    }
}
