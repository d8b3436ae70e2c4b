use std::path::{Path, PathBuf};
use std::time::Duration;
use serde::Deserialize;
use crate::drivers::red_pitaya::DEFAULT_PORT;
use crate::drivers::{AcquisitionSettings, GeneratorSettings, PlotConfig, RedPitaya};
use crate::model::{DEFAULT_ORDER, DEFAULT_WINDOW_SIZE};
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct InstrumentConfig {
    pub host: String,
    pub port: u16,
    pub timeout_ms: u64,
}
impl Default for InstrumentConfig {
    fn default() -> Self {
        Self {
            host: "rp-f0060c.local".into(),
            port: DEFAULT_PORT,
            timeout_ms: 1000,
        }
    }
}
impl InstrumentConfig {
    pub fn board(&self) -> RedPitaya {
        RedPitaya::with_port(self.host.clone(), self.port)
            .with_timeout(Duration::from_millis(self.timeout_ms))
    }
}
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SmoothingConfig {
    pub window_size: usize,
    pub order: usize,
}
impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            order: DEFAULT_ORDER,
        }
    }
}
/// What the binary should do; mirrors the bench scripts.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Job {
    /// Acquire one pulse from an oscilloscope channel and plot it.
    Acquire {
        channel: u8,
        #[serde(default)]
        save_to: Option<PathBuf>,
    },
    /// Read one pulse from a data file, smooth it and play it on a generator channel.
    Generate {
        channel: u8,
        path: PathBuf,
        samples_per_pulse: usize,
        #[serde(default = "default_true")]
        smooth: bool,
    },
    /// Plot several consecutive pulses from a data file.
    PlotFile {
        path: PathBuf,
        samples_per_pulse: usize,
        #[serde(default = "default_one")]
        number_of_pulses: usize,
        #[serde(default)]
        smooth: bool,
    },
}
fn default_true() -> bool {
    true
}
fn default_one() -> usize {
    1
}
#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub instrument: InstrumentConfig,
    #[serde(default)]
    pub acquisition: AcquisitionSettings,
    #[serde(default)]
    pub generator: GeneratorSettings,
    #[serde(default)]
    pub smoothing: SmoothingConfig,
    #[serde(default)]
    pub plot: PlotConfig,
    pub job: Job,
}
impl AppConfig {
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        use anyhow::Context;
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parsing config {}", path.display()))
    }
}
