//! Sink implementations

mod bincode;
mod jsonl;
mod log;

pub use bincode::BincodeSink;
pub use jsonl::JsonlSink;
pub use log::LogSink;
