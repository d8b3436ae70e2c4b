use thiserror::Error;
use crate::model::PulseError;
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("{0} is closed; open it first")]
    Closed(&'static str),
    #[error("short read: expected {expected} bytes, got {actual}")]
    ShortRead { expected: usize, actual: usize },
    #[error("invalid channel id {0}; valid ids are 1 and 2")]
    InvalidChannel(u8),
    #[error("waveform has {actual} points; the generator buffer holds {max}")]
    WaveformTooLong { max: usize, actual: usize },
    #[error("instrument protocol error: {0}")]
    Protocol(String),
    #[error("failed to render plot: {0}")]
    Plot(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Pulse(#[from] PulseError),
}
impl<E: std::error::Error + Send + Sync + 'static> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for DriverError
{
    fn from(value: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        DriverError::Plot(format!("{value:?}"))
    }
}
impl From<image::ImageError> for DriverError {
    fn from(value: image::ImageError) -> Self {
        DriverError::Plot(value.to_string())
    }
}
