//! # Decode Engine
//!
//! 模型输出解码引擎（以固定网格与级联校准为准）。
//!
//! Responsibilities:
//! - Mixture selection (plan / lead hypotheses)
//! - Calibration of raw outputs (log-std, logits) into physical quantities
//! - Time-from-distance alignment of the selected plan
//! - Recurrent history maintenance for the next inference call
//! - Rolling disengage-confidence aggregation and hazard debouncing
//!
//! ## Usage
//!
//! ```ignore
//! use decode_engine::DecodeEngine;
//!
//! let mut engine = DecodeEngine::new(config);
//!
//! // Per frame, strictly in arrival order:
//! let inputs = engine.prepare_inputs(&desire, is_rhd);
//! let buf = executor.execute(&inputs).await?;
//! let decoded = engine.decode(ctx, &buf)?;
//! ```

mod align;
mod calibrate;
mod confidence;
mod engine;
mod history;
mod select;

pub use align::{plan_times, time_at_distances};
pub use calibrate::{sigmoid, softmax, std_from_log};
pub use confidence::ConfidenceTracker;
pub use engine::DecodeEngine;
pub use history::RecurrentHistory;
pub use select::{best_lead, best_plan};

// Re-export contracts types callers need alongside the engine
pub use contracts::{DecodedFrame, DecoderConfig, DrivingModelFrame, FrameContext};
