use std::io::Cursor;
use std::path::PathBuf;
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use log::info;
use plotters::prelude::LineSeries;
use plotters::prelude::*;
use serde::Deserialize;
use crate::drivers::{DriverError, PulseSink, Resource};
use crate::model::Pulse;
#[derive(Clone, Debug)]
pub struct PlotStyle {
    pub width: u32,
    pub height: u32,
    pub background: RGBColor,
    pub palette: Vec<RGBColor>,
}
impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            width: 900,
            height: 400,
            background: RGBColor(10, 10, 10),
            palette: vec![BLUE, RED, GREEN, CYAN, MAGENTA, YELLOW, WHITE],
        }
    }
}
/// Plot settings as they appear in the configuration file.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    pub width: u32,
    pub height: u32,
    pub output: PathBuf,
}
impl Default for PlotConfig {
    fn default() -> Self {
        let style = PlotStyle::default();
        Self {
            width: style.width,
            height: style.height,
            output: PathBuf::from("pulse.png"),
        }
    }
}
impl PlotConfig {
    pub fn style(&self) -> PlotStyle {
        PlotStyle {
            width: self.width,
            height: self.height,
            ..PlotStyle::default()
        }
    }
}
/// Pulse sink that collects pulses and renders them together on `show`.
pub struct PulsePlotter {
    output: PathBuf,
    style: PlotStyle,
    pulses: Vec<Pulse>,
    open: bool,
}
impl PulsePlotter {
    pub fn new(output: impl Into<PathBuf>, style: PlotStyle) -> Self {
        Self {
            output: output.into(),
            style,
            pulses: Vec::new(),
            open: false,
        }
    }
    pub fn from_config(config: &PlotConfig) -> Self {
        Self::new(config.output.clone(), config.style())
    }
    pub fn pulse_count(&self) -> usize {
        self.pulses.len()
    }
    /// Render everything written so far and save it as PNG.
    pub fn show(&self) -> Result<(), DriverError> {
        if !self.open {
            return Err(DriverError::Closed("pulse plotter"));
        }
        let png = render_pulses_png(&self.pulses, self.style.clone())?;
        std::fs::write(&self.output, png)?;
        info!(
            "plotted {} pulse(s) to {}",
            self.pulses.len(),
            self.output.display()
        );
        Ok(())
    }
}
impl Resource for PulsePlotter {
    fn open(&mut self) -> Result<(), DriverError> {
        self.pulses.clear();
        self.open = true;
        Ok(())
    }
    fn close(&mut self) -> Result<(), DriverError> {
        self.open = false;
        Ok(())
    }
    fn is_closed(&self) -> bool {
        !self.open
    }
}
impl PulseSink for PulsePlotter {
    fn write(&mut self, pulse: &Pulse) -> Result<(), DriverError> {
        if !self.open {
            return Err(DriverError::Closed("pulse plotter"));
        }
        self.pulses.push(pulse.clone());
        Ok(())
    }
}
/// Draw every pulse as a line series on one chart.
///
/// The bitmap is rendered without text (no caption, tick labels or legend), so
/// no font backend is needed. Pulses are told apart by palette colour.
pub fn render_pulses_png(pulses: &[Pulse], style: PlotStyle) -> Result<Vec<u8>, DriverError> {
    if pulses.iter().all(Pulse::is_empty) {
        return Err(DriverError::Plot("no samples to plot".into()));
    }
    let samples = || pulses.iter().flat_map(|p| p.iter());
    let (t_min, t_max) = bounds(samples().map(|s| s.time()));
    let (v_min, v_max) = bounds(samples().map(|s| s.voltage()));
    let x_bounds = widen(t_min, t_max, 1e-9);
    let y_bounds = widen(v_min, v_max, 1.0);
    let mut buffer = vec![0u8; (style.width * style.height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (style.width, style.height))
            .into_drawing_area();
        root.fill(&style.background)?;
        let mut chart = ChartBuilder::on(&root)
            .margin(10)
            .build_cartesian_2d(x_bounds.0..x_bounds.1, y_bounds.0..y_bounds.1)?;
        chart
            .configure_mesh()
            .bold_line_style(&WHITE.mix(0.2))
            .light_line_style(&WHITE.mix(0.1))
            .draw()?;
        for (idx, pulse) in pulses.iter().enumerate() {
            let color = series_color(&style.palette, idx);
            let series = pulse.iter().map(|s| (s.time(), s.voltage()));
            chart.draw_series(LineSeries::new(series, &color))?;
        }
        root.present()?;
    }
    encode_png(&buffer, style.width, style.height)
}
/// Cycle through the palette; an empty palette draws everything in white.
fn series_color(palette: &[RGBColor], idx: usize) -> RGBColor {
    if palette.is_empty() {
        return WHITE;
    }
    palette[idx % palette.len()]
}
fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}
/// Avoid a zero-width axis.
fn widen(lo: f64, hi: f64, pad: f64) -> (f64, f64) {
    if (hi - lo).abs() < f64::EPSILON {
        (lo - pad, hi + pad)
    } else {
        (lo, hi)
    }
}
fn encode_png(buffer: &[u8], width: u32, height: u32) -> Result<Vec<u8>, DriverError> {
    let image = ImageBuffer::<Rgb<u8>, _>::from_raw(width, height, buffer.to_vec())
        .ok_or_else(|| DriverError::Plot("failed to allocate image buffer".into()))?;
    let mut output = Vec::new();
    let dynamic = DynamicImage::ImageRgb8(image);
    dynamic.write_to(&mut Cursor::new(&mut output), ImageFormat::Png)?;
    Ok(output)
}
