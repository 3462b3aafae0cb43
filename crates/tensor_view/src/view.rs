//! Shape-checked reinterpretation of the flat output buffer.

use contracts::PipelineError;

use crate::layout::{RawModelOutput, OUTPUT_FLOATS};

/// Reinterpret a flat output buffer as the named block layout.
///
/// A wrong-length buffer is a contract violation by the executor and fails
/// here, before any value is read. The returned reference borrows the
/// caller's buffer; nothing is copied.
pub fn view_raw_output(buf: &[f32]) -> Result<&RawModelOutput, PipelineError> {
    if buf.len() != OUTPUT_FLOATS {
        return Err(PipelineError::tensor_shape(OUTPUT_FLOATS, buf.len()));
    }
    bytemuck::try_from_bytes(bytemuck::cast_slice(buf)).map_err(|e| PipelineError::TensorCast {
        message: e.to_string(),
    })
}
