//! Red Pitaya oscilloscope and generator channels driven over SCPI.
use std::thread;
use std::time::Duration;
use log::{debug, info};
use serde::Deserialize;
use crate::drivers::scpi::{parse_data_block, Commander, TcpCommander};
use crate::drivers::{DriverError, PulseSink, PulseSource, Resource};
use crate::model::{Pulse, PulseError};
pub const DEFAULT_PORT: u16 = 5000;
/// Fast ADC clock; acquisition sample period is `decimation / ADC_SAMPLE_RATE_HZ`.
pub const ADC_SAMPLE_RATE_HZ: f64 = 125.0e6;
/// Arbitrary waveform buffer length of the generator.
pub const GENERATOR_BUFFER_SAMPLES: usize = 16384;
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChannelId(u8);
impl ChannelId {
    pub fn new(id: u8) -> Result<Self, DriverError> {
        match id {
            1 | 2 => Ok(Self(id)),
            other => Err(DriverError::InvalidChannel(other)),
        }
    }
    pub fn get(self) -> u8 {
        self.0
    }
}
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct AcquisitionSettings {
    pub decimation: u32,
    /// Number of `ACQ:TRIG:STAT?` polls before giving up.
    pub trigger_poll_limit: usize,
    pub trigger_poll_interval_ms: u64,
}
impl Default for AcquisitionSettings {
    fn default() -> Self {
        Self {
            decimation: 1,
            trigger_poll_limit: 1000,
            trigger_poll_interval_ms: 1,
        }
    }
}
impl AcquisitionSettings {
    pub fn sample_period_secs(&self) -> f64 {
        self.decimation as f64 / ADC_SAMPLE_RATE_HZ
    }
}
/// Burst playback parameters for the arbitrary waveform generator.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct GeneratorSettings {
    /// Waveform repetition frequency; derived from the pulse duration when absent.
    pub frequency_hz: Option<f64>,
    pub amplitude_v: f64,
    pub burst_count: u32,
    pub burst_repetitions: u32,
    pub burst_period_us: Option<u32>,
    /// Fire the internal trigger right after arming.
    pub trigger: bool,
}
impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            frequency_hz: None,
            amplitude_v: 1.0,
            burst_count: 1,
            burst_repetitions: 1,
            burst_period_us: None,
            trigger: true,
        }
    }
}
/// Network address of a board; hands out channels bound to fresh connections.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RedPitaya {
    pub host: String,
    pub port: u16,
    pub timeout: Duration,
}
impl RedPitaya {
    pub fn new(host: impl Into<String>) -> Self {
        Self::with_port(host, DEFAULT_PORT)
    }
    pub fn with_port(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            timeout: Duration::from_secs(1),
        }
    }
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
    fn commander(&self) -> TcpCommander {
        TcpCommander::new(self.host.clone(), self.port, self.timeout)
    }
    pub fn oscilloscope_channel(
        &self,
        channel_id: u8,
        settings: AcquisitionSettings,
    ) -> Result<OscilloscopeChannel<TcpCommander>, DriverError> {
        Ok(OscilloscopeChannel::new(
            ChannelId::new(channel_id)?,
            self.commander(),
            settings,
        ))
    }
    pub fn generator_channel(
        &self,
        channel_id: u8,
        settings: GeneratorSettings,
    ) -> Result<GeneratorChannel<TcpCommander>, DriverError> {
        Ok(GeneratorChannel::new(
            ChannelId::new(channel_id)?,
            self.commander(),
            settings,
        ))
    }
}
pub struct OscilloscopeChannel<C: Commander> {
    channel_id: ChannelId,
    commander: C,
    settings: AcquisitionSettings,
}
impl<C: Commander> OscilloscopeChannel<C> {
    pub fn new(channel_id: ChannelId, commander: C, settings: AcquisitionSettings) -> Self {
        Self {
            channel_id,
            commander,
            settings,
        }
    }
    pub fn channel_id(&self) -> u8 {
        self.channel_id.get()
    }
    pub fn commander(&self) -> &C {
        &self.commander
    }
    fn wait_for_trigger(&mut self) -> Result<(), DriverError> {
        let interval = Duration::from_millis(self.settings.trigger_poll_interval_ms);
        for _ in 0..self.settings.trigger_poll_limit {
            if self.commander.query("ACQ:TRIG:STAT?")?.trim() == "TD" {
                return Ok(());
            }
            thread::sleep(interval);
        }
        Err(DriverError::Protocol(format!(
            "trigger did not fire after {} polls",
            self.settings.trigger_poll_limit
        )))
    }
}
impl<C: Commander> Resource for OscilloscopeChannel<C> {
    fn open(&mut self) -> Result<(), DriverError> {
        self.commander.connect()
    }
    fn close(&mut self) -> Result<(), DriverError> {
        self.commander.disconnect()
    }
    fn is_closed(&self) -> bool {
        !self.commander.is_connected()
    }
}
impl<C: Commander> PulseSource for OscilloscopeChannel<C> {
    fn read(&mut self) -> Result<Pulse, DriverError> {
        if self.is_closed() {
            return Err(DriverError::Closed("oscilloscope channel"));
        }
        let source = self.channel_id.get();
        self.commander.send("ACQ:RST")?;
        self.commander
            .send(&format!("ACQ:DEC {}", self.settings.decimation))?;
        self.commander.send("ACQ:DATA:UNITS VOLTS")?;
        self.commander.send("ACQ:START")?;
        self.commander.send("ACQ:TRIG NOW")?;
        self.wait_for_trigger()?;
        let voltages = parse_data_block(
            &self
                .commander
                .query(&format!("ACQ:SOUR{source}:DATA?"))?,
        )?;
        let period = self.settings.sample_period_secs();
        let times: Vec<f64> = (0..voltages.len()).map(|i| i as f64 * period).collect();
        info!("acquired {} samples on channel {source}", voltages.len());
        Ok(Pulse::from_times_and_voltages(&times, &voltages)?)
    }
}
pub struct GeneratorChannel<C: Commander> {
    channel_id: ChannelId,
    commander: C,
    settings: GeneratorSettings,
}
impl<C: Commander> GeneratorChannel<C> {
    pub fn new(channel_id: ChannelId, commander: C, settings: GeneratorSettings) -> Self {
        Self {
            channel_id,
            commander,
            settings,
        }
    }
    pub fn channel_id(&self) -> u8 {
        self.channel_id.get()
    }
    pub fn commander(&self) -> &C {
        &self.commander
    }
    fn frequency_for(&self, pulse: &Pulse) -> Result<f64, DriverError> {
        if let Some(frequency) = self.settings.frequency_hz {
            return Ok(frequency);
        }
        let duration = pulse.duration();
        if duration <= 0.0 {
            return Err(DriverError::Protocol(
                "pulse duration is zero; set an explicit generator frequency".into(),
            ));
        }
        Ok(1.0 / duration)
    }
}
/// Scale voltages by their largest magnitude so every point lies in [-1, 1].
fn arbitrary_waveform(pulse: &Pulse) -> Result<Vec<f64>, PulseError> {
    if pulse.is_empty() {
        return Err(PulseError::EmptyPulse);
    }
    let voltages = pulse.voltages();
    let peak = voltages.iter().map(|v| v.abs()).fold(0.0, f64::max);
    if peak == 0.0 {
        return Err(PulseError::DivideByZero);
    }
    Ok(voltages.into_iter().map(|v| v / peak).collect())
}
impl<C: Commander> Resource for GeneratorChannel<C> {
    fn open(&mut self) -> Result<(), DriverError> {
        self.commander.connect()
    }
    fn close(&mut self) -> Result<(), DriverError> {
        self.commander.disconnect()
    }
    fn is_closed(&self) -> bool {
        !self.commander.is_connected()
    }
}
impl<C: Commander> PulseSink for GeneratorChannel<C> {
    fn write(&mut self, pulse: &Pulse) -> Result<(), DriverError> {
        if self.is_closed() {
            return Err(DriverError::Closed("generator channel"));
        }
        if pulse.len() > GENERATOR_BUFFER_SAMPLES {
            return Err(DriverError::WaveformTooLong {
                max: GENERATOR_BUFFER_SAMPLES,
                actual: pulse.len(),
            });
        }
        let waveform = arbitrary_waveform(pulse)?;
        let frequency = self.frequency_for(pulse)?;
        let source = self.channel_id.get();
        let points = waveform
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let settings = &self.settings;
        let mut commands = vec![
            "GEN:RST".to_owned(),
            format!("SOUR{source}:FUNC ARBITRARY"),
            format!("SOUR{source}:TRAC:DATA:DATA {points}"),
            format!("SOUR{source}:FREQ:FIX {frequency}"),
            format!("SOUR{source}:VOLT {}", settings.amplitude_v),
            format!("SOUR{source}:BURS:STAT BURST"),
            format!("SOUR{source}:BURS:NCYC {}", settings.burst_count),
            format!("SOUR{source}:BURS:NOR {}", settings.burst_repetitions),
        ];
        if let Some(period) = settings.burst_period_us {
            commands.push(format!("SOUR{source}:BURS:INT:PER {period}"));
        }
        commands.push(format!("SOUR{source}:TRIG:SOUR INT"));
        commands.push(format!("OUTPUT{source}:STATE ON"));
        if settings.trigger {
            commands.push(format!("SOUR{source}:TRIG:INT"));
        }
        debug!("arming generator channel {source} at {frequency} Hz");
        for command in &commands {
            self.commander.send(command)?;
        }
        info!("generated {} point waveform on channel {source}", waveform.len());
        Ok(())
    }
}
