/// Single (time, voltage) reading. Fields are only reachable through accessors.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    time: f64,
    voltage: f64,
}
impl Sample {
    pub const fn new(time: f64, voltage: f64) -> Self {
        Self { time, voltage }
    }
    /// Unit: `s`
    pub fn time(&self) -> f64 {
        self.time
    }
    /// Unit: `V`
    pub fn voltage(&self) -> f64 {
        self.voltage
    }
}
impl From<(f64, f64)> for Sample {
    fn from((time, voltage): (f64, f64)) -> Self {
        Self::new(time, voltage)
    }
}
