//! ModelExecutor trait - inference engine abstraction
//!
//! Defines a unified interface for the model execution backend, decoupling
//! the decode pipeline from concrete runtimes. Supports unified handling of
//! mock and replay executors; a hardware-accelerated backend would implement
//! the same trait.

use crate::{ModelInputs, PipelineError};

/// Model execution trait
///
/// The executor consumes the recurrent inputs prepared for this frame and
/// returns the model's flat output buffer. The decode pipeline treats the
/// call as an opaque suspension point; everything on either side of it is
/// synchronous.
#[trait_variant::make(ModelExecutor: Send)]
pub trait LocalModelExecutor {
    /// Executor name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Run one inference and return the flat output buffer.
    ///
    /// The returned buffer length must match the compile-time output layout;
    /// a mismatch is surfaced by the tensor view, not here.
    ///
    /// # Errors
    /// Returns an executor error if the backend fails or a replay source is
    /// exhausted.
    async fn execute(&mut self, inputs: &ModelInputs) -> Result<Vec<f32>, PipelineError>;
}
