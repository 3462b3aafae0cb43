//! # Tensor View
//!
//! 模型输出张量的零拷贝重解释（以固定偏移布局为准）。
//!
//! Responsibilities:
//! - Compile-time partition of the flat output buffer into named blocks
//! - Shape/alignment checking at the trust boundary
//! - The fixed time/distance grids shared by all consumers
//!
//! No computation happens here: calibration, selection and aggregation live
//! in `decode_engine`.

mod grid;
mod layout;
mod view;

pub use grid::*;
pub use layout::*;
pub use view::view_raw_output;
