//! Headerless binary pulse records.
//!
//! Each record holds `samples_per_pulse` little-endian `f64` times followed by
//! the same number of little-endian `f64` voltages. The record length is not
//! stored in the file, so readers must be told `samples_per_pulse`.
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use log::debug;
use crate::drivers::{DriverError, PulseSink, PulseSource, Resource};
use crate::model::Pulse;
const F64_BYTES: usize = std::mem::size_of::<f64>();
pub struct PulseDataFileReader {
    path: PathBuf,
    samples_per_pulse: usize,
    reader: Option<BufReader<File>>,
}
impl PulseDataFileReader {
    pub fn new(path: impl AsRef<Path>, samples_per_pulse: usize) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            samples_per_pulse,
            reader: None,
        }
    }
    pub fn samples_per_pulse(&self) -> usize {
        self.samples_per_pulse
    }
    fn record_bytes(&self) -> usize {
        2 * self.samples_per_pulse * F64_BYTES
    }
}
impl Resource for PulseDataFileReader {
    fn open(&mut self) -> Result<(), DriverError> {
        let file = File::open(&self.path)?;
        debug!("opened pulse data file {}", self.path.display());
        self.reader = Some(BufReader::new(file));
        Ok(())
    }
    fn close(&mut self) -> Result<(), DriverError> {
        if self.reader.take().is_some() {
            debug!("closed pulse data file {}", self.path.display());
        }
        Ok(())
    }
    fn is_closed(&self) -> bool {
        self.reader.is_none()
    }
}
impl PulseSource for PulseDataFileReader {
    fn read(&mut self) -> Result<Pulse, DriverError> {
        let expected = self.record_bytes();
        let n = self.samples_per_pulse;
        let reader = self
            .reader
            .as_mut()
            .ok_or(DriverError::Closed("pulse data file reader"))?;
        let mut buffer = vec![0u8; expected];
        let actual = fill(reader, &mut buffer)?;
        if actual < expected {
            return Err(DriverError::ShortRead { expected, actual });
        }
        let values = decode(&buffer);
        Ok(Pulse::from_times_and_voltages(&values[..n], &values[n..])?)
    }
}
pub struct PulseDataFileWriter {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
}
impl PulseDataFileWriter {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            writer: None,
        }
    }
}
impl Resource for PulseDataFileWriter {
    fn open(&mut self) -> Result<(), DriverError> {
        let file = File::create(&self.path)?;
        debug!("created pulse data file {}", self.path.display());
        self.writer = Some(BufWriter::new(file));
        Ok(())
    }
    fn close(&mut self) -> Result<(), DriverError> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
            debug!("closed pulse data file {}", self.path.display());
        }
        Ok(())
    }
    fn is_closed(&self) -> bool {
        self.writer.is_none()
    }
}
impl PulseSink for PulseDataFileWriter {
    fn write(&mut self, pulse: &Pulse) -> Result<(), DriverError> {
        let writer = self
            .writer
            .as_mut()
            .ok_or(DriverError::Closed("pulse data file writer"))?;
        for value in pulse.times().into_iter().chain(pulse.voltages()) {
            writer.write_all(&value.to_le_bytes())?;
        }
        Ok(())
    }
}
/// Read until `buffer` is full or the stream ends; returns the bytes read.
fn fill(reader: &mut impl Read, buffer: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buffer.len() {
        match reader.read(&mut buffer[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
fn decode(bytes: &[u8]) -> Vec<f64> {
    bytes
        .chunks_exact(F64_BYTES)
        .map(|chunk| {
            let mut raw = [0u8; F64_BYTES];
            raw.copy_from_slice(chunk);
            f64::from_le_bytes(raw)
        })
        .collect()
}
