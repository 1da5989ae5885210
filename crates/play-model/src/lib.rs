//! Courtside Play Model
//!
//! Defines the data contracts shared by the analysis pipeline:
//! - **Frames:** Decoded video frames and stream metadata
//! - **Rallies:** Motion samples and closed rally intervals
//! - **Events:** Display-ready, timestamped play events
//! - **Params:** Analysis mode and tunables with safe-default coercion
//!
//! Frame indices are 0-based; times are derived as `index / fps`.

pub mod event;
pub mod frame;
pub mod params;
pub mod rally;
pub mod report;
pub mod timecode;

pub use event::*;
pub use frame::*;
pub use params::*;
pub use rally::*;
pub use report::*;
pub use timecode::*;
