// src/model/mod.rs
pub mod error;
pub mod pulse;
pub mod sample;
pub mod smoothing;
pub use error::PulseError;
pub use pulse::Pulse;
pub use sample::Sample;
pub use smoothing::{DEFAULT_ORDER, DEFAULT_WINDOW_SIZE};
