mod core;
mod reconfigurable_sink;
mod redacting_sink;
mod test_sink;
mod writer_sink;

pub use self::core::Sink;
pub use reconfigurable_sink::ReconfigurableSink;
pub use redacting_sink::{Redactor, RedactingSink, REDACTED};
pub use test_sink::{TestLogger, TestSink};
pub use writer_sink::WriterSink;
