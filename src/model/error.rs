use thiserror::Error;
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PulseError {
    #[error("sample index {index} out of range for pulse of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("pulse has no samples")]
    EmptyPulse,
    #[error("maximum voltage is zero; cannot normalize")]
    DivideByZero,
    #[error("invalid smoothing window {window_size} (order {order}) for pulse of length {len}: {reason}")]
    InvalidWindow {
        window_size: usize,
        order: usize,
        len: usize,
        reason: &'static str,
    },
    #[error("times and voltages differ in length: {times} vs {voltages}")]
    LengthMismatch { times: usize, voltages: usize },
    #[error("pseudo-inverse failed: {0}")]
    PseudoInverse(String),
}
