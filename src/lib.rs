//! Pulses acquired from, or generated on, a Red Pitaya board.
//!
//! `model` holds the immutable pulse type and its transforms; `drivers` holds
//! the thin adapters that produce and consume pulses (data files, plots, SCPI
//! channels); `usecases` wires them together.
pub mod config;
pub mod drivers;
pub mod model;
pub mod usecases;
pub use model::{Pulse, PulseError, Sample};
