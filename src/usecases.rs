//! Open a resource, move pulses, close it again.
use log::{debug, info};
use crate::drivers::{scoped, DriverError, PulseSink, PulseSource};
use crate::model::{Pulse, PulseError};
/// Transform applied to every pulse on its way from source to sink.
pub type PulseTransform<'a> = &'a dyn Fn(&Pulse) -> Result<Pulse, PulseError>;
pub fn acquire_pulse<S: PulseSource + ?Sized>(source: &mut S) -> Result<Pulse, DriverError> {
    let pulse = scoped(source, |s| s.read())?;
    debug!("acquired pulse with {} samples", pulse.len());
    Ok(pulse)
}
pub fn generate_pulse<K: PulseSink + ?Sized>(pulse: &Pulse, sink: &mut K) -> Result<(), DriverError> {
    scoped(sink, |k| k.write(pulse))?;
    debug!("generated pulse with {} samples", pulse.len());
    Ok(())
}
/// Move `count` pulses from `source` to `sink`, optionally transforming each one.
///
/// Both ends are closed on every exit path. The sink stays open while `finish`
/// runs, which lets a plotter render before it is closed.
pub fn transfer_pulses<S, K, F>(
    source: &mut S,
    sink: &mut K,
    count: usize,
    transform: Option<PulseTransform<'_>>,
    finish: F,
) -> Result<usize, DriverError>
where
    S: PulseSource + ?Sized,
    K: PulseSink + ?Sized,
    F: FnOnce(&mut K) -> Result<(), DriverError>,
{
    scoped(sink, |sink| {
        let moved = scoped(source, |source| {
            for _ in 0..count {
                let pulse = source.read()?;
                let pulse = match transform {
                    Some(transform) => transform(&pulse)?,
                    None => pulse,
                };
                sink.write(&pulse)?;
            }
            Ok(count)
        })?;
        finish(sink)?;
        info!("transferred {moved} pulse(s)");
        Ok(moved)
    })
}
