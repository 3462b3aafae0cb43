//! FrameSink trait - Dispatcher output interface
//!
//! Defines the abstract interface for publish sinks.

use crate::{DecodedFrame, PipelineError};

/// Decoded-frame output trait
///
/// All sink implementations must implement this trait.
#[trait_variant::make(FrameSink: Send)]
pub trait LocalFrameSink {
    /// Sink name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Write one decoded frame
    ///
    /// # Errors
    /// Returns write error (should include context)
    async fn write(&mut self, frame: &DecodedFrame) -> Result<(), PipelineError>;

    /// Flush buffer (if any)
    async fn flush(&mut self) -> Result<(), PipelineError>;

    /// Close sink
    async fn close(&mut self) -> Result<(), PipelineError>;
}
