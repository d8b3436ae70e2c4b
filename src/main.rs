// src/main.rs
use anyhow::{bail, Context, Result};
use log::info;
use spectroscopy::config::{AppConfig, Job};
use spectroscopy::drivers::{
    scoped, PulseDataFileReader, PulseDataFileWriter, PulsePlotter, PulseSink,
};
use spectroscopy::model::{Pulse, PulseError};
use spectroscopy::usecases::{acquire_pulse, generate_pulse, transfer_pulses, PulseTransform};
fn run(config: AppConfig) -> Result<()> {
    let smoothing = config.smoothing;
    let smooth = move |pulse: &Pulse| -> Result<Pulse, PulseError> {
        pulse.smooth(smoothing.window_size, smoothing.order)
    };
    match config.job {
        Job::Acquire { channel, save_to } => {
            let board = config.instrument.board();
            let mut scope = board.oscilloscope_channel(channel, config.acquisition)?;
            let pulse = acquire_pulse(&mut scope)
                .with_context(|| format!("acquiring from {}:{}", board.host, board.port))?;
            if let Some(path) = save_to {
                generate_pulse(&pulse, &mut PulseDataFileWriter::new(&path))
                    .with_context(|| format!("saving pulse to {}", path.display()))?;
            }
            let mut plotter = PulsePlotter::from_config(&config.plot);
            scoped(&mut plotter, |p| {
                p.write(&pulse)?;
                p.show()
            })?;
        }
        Job::Generate {
            channel,
            path,
            samples_per_pulse,
            smooth: apply_smoothing,
        } => {
            let mut reader = PulseDataFileReader::new(&path, samples_per_pulse);
            let mut pulse = acquire_pulse(&mut reader)
                .with_context(|| format!("reading pulse from {}", path.display()))?;
            if apply_smoothing {
                pulse = smooth(&pulse)?;
            }
            let board = config.instrument.board();
            let mut generator = board.generator_channel(channel, config.generator)?;
            generate_pulse(&pulse, &mut generator)
                .with_context(|| format!("generating on {}:{}", board.host, board.port))?;
        }
        Job::PlotFile {
            path,
            samples_per_pulse,
            number_of_pulses,
            smooth: apply_smoothing,
        } => {
            if number_of_pulses == 0 {
                bail!("number_of_pulses must be at least 1");
            }
            let mut reader = PulseDataFileReader::new(&path, samples_per_pulse);
            let mut plotter = PulsePlotter::from_config(&config.plot);
            let transform: Option<PulseTransform<'_>> = if apply_smoothing {
                Some(&smooth)
            } else {
                None
            };
            transfer_pulses(&mut reader, &mut plotter, number_of_pulses, transform, |p| {
                p.show()
            })
            .with_context(|| format!("plotting pulses from {}", path.display()))?;
        }
    }
    Ok(())
}
// 入口函数
fn main() -> Result<()> {
    env_logger::init();
    let Some(config_path) = std::env::args().nth(1) else {
        bail!("usage: spectroscopy <job.json>");
    };
    let config = AppConfig::load(&config_path)?;
    info!("running {:?}", config.job);
    run(config)
}
