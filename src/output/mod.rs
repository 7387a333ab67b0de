pub mod file_sink;
pub mod sink;

pub use file_sink::FileSink;
pub use sink::Sink;
