// src/drivers/mod.rs
pub mod datafile;
pub mod error;
pub mod plot;
pub mod red_pitaya;
pub mod scpi;
pub mod sink;
pub mod source;
pub use datafile::{PulseDataFileReader, PulseDataFileWriter};
pub use error::DriverError;
pub use plot::{render_pulses_png, PlotConfig, PlotStyle, PulsePlotter};
pub use red_pitaya::{
    AcquisitionSettings, ChannelId, GeneratorChannel, GeneratorSettings, OscilloscopeChannel,
    RedPitaya,
};
pub use scpi::{Commander, ScriptedCommander, TcpCommander};
pub use sink::{MemorySink, PulseSink};
pub use source::{scoped, ManualSource, PulseSource, Resource};
