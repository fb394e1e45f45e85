//! Fatal 日志的进程退出测试
//!
//! 子进程重新运行本测试二进制中的 `fatal_child_process`，由环境变量触发 Fatal

use sessionlog::data;
use sessionlog::log::{
    FileAppender, JsonFormatter, LogLevel, LogRecord, Logger, WriterSink, FATAL_EXIT_CODE,
};
use std::process::Command;
use std::sync::Arc;

const CHILD_LOG_ENV: &str = "SESSIONLOG_FATAL_CHILD_LOG";

#[test]
fn fatal_child_process() {
    let Ok(path) = std::env::var(CHILD_LOG_ENV) else {
        return;
    };

    let logger = Logger::new("svc");
    logger.register_sink(Arc::new(WriterSink::new(
        Arc::new(FileAppender::open(&path).unwrap()),
        Arc::new(JsonFormatter::default()),
        LogLevel::Debug,
    )));
    logger.register_sink(Arc::new(WriterSink::json(std::io::stdout(), LogLevel::Error)));

    logger
        .session("worker")
        .fatalm("unrecoverable", "disk full", data! { "attempt" => 3 });
}

#[test]
fn test_fatal_logs_then_exits_non_zero() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("fatal.log");

    let output = Command::new(std::env::current_exe().unwrap())
        .args(["fatal_child_process", "--exact", "--nocapture", "--test-threads=1"])
        .env(CHILD_LOG_ENV, &path)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(FATAL_EXIT_CODE));

    let contents = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 1);

    let record = LogRecord::from_json_line(lines[0]).unwrap();
    assert_eq!(record.level, LogLevel::Fatal);
    assert_eq!(record.source, "svc");
    assert_eq!(record.message, "worker.unrecoverable");
    assert_eq!(record.session(), Some("1"));
    assert_eq!(record.error(), Some("disk full"));
    assert!(record.data.contains_key("trace"));
    assert_eq!(record.data.get("attempt").and_then(|v| v.to_json()), Some(3.into()));

    // 第二个 Sink 在退出前同样收到记录
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(r#""level":"fatal""#));
    assert!(stdout.contains("worker.unrecoverable"));
}
