use crate::drivers::{DriverError, Resource};
use crate::model::Pulse;
/// Consumer of pulses: generator channels, data files, plotters.
pub trait PulseSink: Resource {
    fn write(&mut self, pulse: &Pulse) -> Result<(), DriverError>;
}
/// Collects written pulses in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    pulses: Vec<Pulse>,
    open: bool,
    pub open_calls: usize,
    pub close_calls: usize,
}
impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn pulses(&self) -> &[Pulse] {
        &self.pulses
    }
}
impl Resource for MemorySink {
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
impl PulseSink for MemorySink {
    fn write(&mut self, pulse: &Pulse) -> Result<(), DriverError> {
        if self.is_closed() {
            return Err(DriverError::Closed("memory sink"));
        }
        self.pulses.push(pulse.clone());
        Ok(())
    }
}
