use std::collections::VecDeque;
use log::warn;
use crate::drivers::DriverError;
use crate::model::Pulse;
/// Something that must be opened before use and closed afterwards.
pub trait Resource {
    fn open(&mut self) -> Result<(), DriverError>;
    fn close(&mut self) -> Result<(), DriverError>;
    fn is_closed(&self) -> bool;
}
/// Trait representing something that can yield pulses on demand.
pub trait PulseSource: Resource {
    fn read(&mut self) -> Result<Pulse, DriverError>;
}
/// Open `resource`, run `body`, and close it on every exit path.
///
/// An error from `body` takes precedence over an error from closing.
pub fn scoped<R, T, F>(resource: &mut R, body: F) -> Result<T, DriverError>
where
    R: Resource + ?Sized,
    F: FnOnce(&mut R) -> Result<T, DriverError>,
{
    resource.open()?;
    let outcome = body(&mut *resource);
    let closed = resource.close();
    match (outcome, closed) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(close_err)) => Err(close_err),
        (Err(err), Ok(())) => Err(err),
        (Err(err), Err(close_err)) => {
            warn!("close failed after an earlier error: {close_err}");
            Err(err)
        }
    }
}
/// In-memory source useful for tests and deterministic playback.
#[derive(Debug, Default)]
pub struct ManualSource {
    queue: VecDeque<Pulse>,
    open: bool,
    pub open_calls: usize,
    pub close_calls: usize,
}
impl ManualSource {
    pub fn new(pulses: impl IntoIterator<Item = Pulse>) -> Self {
        Self {
            queue: pulses.into_iter().collect(),
            ..Default::default()
        }
    }
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}
impl Resource for ManualSource {
    fn open(&mut self) -> Result<(), DriverError> {
        self.open_calls += 1;
        self.open = true;
        Ok(())
    }
    fn close(&mut self) -> Result<(), DriverError> {
        self.close_calls += 1;
        self.open = false;
        Ok(())
    }
    fn is_closed(&self) -> bool {
        !self.open
    }
}
impl PulseSource for ManualSource {
    fn read(&mut self) -> Result<Pulse, DriverError> {
        if self.is_closed() {
            return Err(DriverError::Closed("manual source"));
        }
        self.queue.pop_front().ok_or(DriverError::ShortRead {
            expected: 1,
            actual: 0,
        })
    }
}
