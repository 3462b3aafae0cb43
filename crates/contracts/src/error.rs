//! Layered error definitions
//!
//! Categorized by source: config / tensor / executor / sink

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum PipelineError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Tensor Errors =====
    /// Output buffer has the wrong length for the compile-time layout.
    /// This is a contract violation by the upstream model, not a runtime
    /// condition to recover from.
    #[error("tensor shape mismatch: expected {expected} floats, got {actual}")]
    TensorShape { expected: usize, actual: usize },

    /// Output buffer is not aligned for reinterpretation
    #[error("tensor cast error: {message}")]
    TensorCast { message: String },

    // ===== Executor Errors =====
    /// Model execution error
    #[error("executor '{executor}' failed: {message}")]
    Executor { executor: String, message: String },

    /// Replay source exhausted or unreadable
    #[error("replay error: {message}")]
    Replay { message: String },

    // ===== Sink Errors =====
    /// Sink write error
    #[error("sink '{sink_name}' write error: {message}")]
    SinkWrite { sink_name: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl PipelineError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create tensor shape error
    pub fn tensor_shape(expected: usize, actual: usize) -> Self {
        Self::TensorShape { expected, actual }
    }

    /// Create executor error
    pub fn executor(executor: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Executor {
            executor: executor.into(),
            message: message.into(),
        }
    }

    /// Create sink write error
    pub fn sink_write(sink_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkWrite {
            sink_name: sink_name.into(),
            message: message.into(),
        }
    }
}
