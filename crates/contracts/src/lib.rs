//! # Contracts
//!
//! Frozen interface contracts (ICD), defining inter-module data structures and traits.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Time Model
//! - `frame_id` is the camera frame counter and the primary clock; decode
//!   cadence logic assumes frames are processed strictly in arrival order
//! - `timestamp_eof` is the sensor end-of-frame timestamp (nanoseconds, u64),
//!   carried through unmodified for consumers

mod blueprint;
mod error;
mod executor;
mod frame;
mod inputs;
mod sink;

pub use blueprint::*;
pub use error::*;
pub use executor::{LocalModelExecutor, ModelExecutor};
pub use frame::*;
pub use inputs::*;
pub use sink::*;
