use std::ops::{Bound, RangeBounds};
use crate::model::smoothing::{self, DEFAULT_ORDER, DEFAULT_WINDOW_SIZE};
use crate::model::{PulseError, Sample};
/// Ordered, immutable series of samples from one acquisition or for one generated waveform.
///
/// Equality compares lengths first, so a strict prefix never equals the longer pulse.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Pulse {
    samples: Vec<Sample>,
}
impl Pulse {
    pub fn new(samples: Vec<Sample>) -> Self {
        Self { samples }
    }
    /// Pair up raw time and voltage arrays as produced by instruments and data files.
    pub fn from_times_and_voltages(times: &[f64], voltages: &[f64]) -> Result<Self, PulseError> {
        if times.len() != voltages.len() {
            return Err(PulseError::LengthMismatch {
                times: times.len(),
                voltages: voltages.len(),
            });
        }
        Ok(times
            .iter()
            .zip(voltages)
            .map(|(&t, &v)| Sample::new(t, v))
            .collect())
    }
    pub fn len(&self) -> usize {
        self.samples.len()
    }
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }
    pub fn get(&self, index: usize) -> Result<Sample, PulseError> {
        self.samples
            .get(index)
            .copied()
            .ok_or(PulseError::IndexOutOfRange {
                index,
                len: self.samples.len(),
            })
    }
    /// Sub-pulse with sequence slicing rules: negative bounds count from the end
    /// and out-of-range bounds are clamped, so this never fails.
    pub fn slice<R: RangeBounds<isize>>(&self, range: R) -> Pulse {
        let len = self.samples.len();
        let start = match range.start_bound() {
            Bound::Included(&i) => clamp_offset(i, 0, len),
            Bound::Excluded(&i) => clamp_offset(i, 1, len),
            Bound::Unbounded => 0,
        };
        let stop = match range.end_bound() {
            Bound::Included(&i) => clamp_offset(i, 1, len),
            Bound::Excluded(&i) => clamp_offset(i, 0, len),
            Bound::Unbounded => len,
        };
        if start >= stop {
            return Pulse::default();
        }
        Pulse::new(self.samples[start..stop].to_vec())
    }
    pub fn contains(&self, sample: &Sample) -> bool {
        self.samples.contains(sample)
    }
    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }
    pub fn times(&self) -> Vec<f64> {
        self.samples.iter().map(Sample::time).collect()
    }
    pub fn voltages(&self) -> Vec<f64> {
        self.samples.iter().map(Sample::voltage).collect()
    }
    /// Last time minus first time; zero for fewer than two samples.
    pub fn duration(&self) -> f64 {
        match (self.samples.first(), self.samples.last()) {
            (Some(first), Some(last)) => last.time() - first.time(),
            _ => 0.0,
        }
    }
    pub fn max_voltage(&self) -> Result<f64, PulseError> {
        if self.samples.is_empty() {
            return Err(PulseError::EmptyPulse);
        }
        Ok(self
            .samples
            .iter()
            .map(Sample::voltage)
            .fold(f64::NEG_INFINITY, f64::max))
    }
    /// Savitzky-Golay smoothing of the voltages; times are carried over unchanged.
    pub fn smooth(&self, window_size: usize, order: usize) -> Result<Pulse, PulseError> {
        let smoothed = smoothing::savitzky_golay(&self.voltages(), window_size, order)?;
        Ok(self.with_voltages(smoothed))
    }
    pub fn smooth_default(&self) -> Result<Pulse, PulseError> {
        self.smooth(DEFAULT_WINDOW_SIZE, DEFAULT_ORDER)
    }
    /// Shift times so the earliest one is zero. The empty pulse is returned as is.
    pub fn normalize_times(&self) -> Pulse {
        let Some(min_time) = self.samples.iter().map(Sample::time).reduce(f64::min) else {
            return Pulse::default();
        };
        self.samples
            .iter()
            .map(|s| Sample::new(s.time() - min_time, s.voltage()))
            .collect()
    }
    /// Scale voltages so the maximum becomes exactly 1.
    pub fn normalize_voltages(&self) -> Result<Pulse, PulseError> {
        let max_voltage = self.max_voltage()?;
        if max_voltage == 0.0 {
            return Err(PulseError::DivideByZero);
        }
        Ok(self.with_voltages(self.samples.iter().map(|s| s.voltage() / max_voltage)))
    }
    fn with_voltages(&self, voltages: impl IntoIterator<Item = f64>) -> Pulse {
        self.samples
            .iter()
            .zip(voltages)
            .map(|(s, v)| Sample::new(s.time(), v))
            .collect()
    }
}
fn clamp_offset(index: isize, shift: isize, len: usize) -> usize {
    let len = len as isize;
    let offset = if index < 0 { len + index } else { index };
    (offset.saturating_add(shift)).clamp(0, len) as usize
}
impl From<Vec<Sample>> for Pulse {
    fn from(samples: Vec<Sample>) -> Self {
        Self::new(samples)
    }
}
impl FromIterator<Sample> for Pulse {
    fn from_iter<I: IntoIterator<Item = Sample>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
impl<'a> IntoIterator for &'a Pulse {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;
    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    fn test_samples() -> Vec<Sample> {
        vec![
            Sample::new(0.0, 0.0),
            Sample::new(0.1, 0.2),
            Sample::new(0.2, 0.4),
        ]
    }
    fn ramp(len: usize) -> Pulse {
        (0..len)
            .map(|i| Sample::new(i as f64 * 1e-3, 0.5 + 2.0 * i as f64))
            .collect()
    }
    #[test]
    fn empty_pulse_has_zero_length() {
        let pulse = Pulse::default();
        assert_eq!(pulse.len(), 0);
        assert!(pulse.is_empty());
    }
    #[test]
    fn non_empty_pulse_has_correct_length() {
        assert_eq!(Pulse::new(test_samples()).len(), 3);
    }
    #[test]
    fn get_sample_by_index() {
        let samples = test_samples();
        let pulse = Pulse::new(samples.clone());
        for (i, sample) in samples.iter().enumerate() {
            assert_eq!(pulse.get(i).unwrap(), *sample);
        }
    }
    #[test]
    fn get_out_of_range_fails() {
        let pulse = Pulse::new(test_samples());
        assert_eq!(
            pulse.get(3),
            Err(PulseError::IndexOutOfRange { index: 3, len: 3 })
        );
        assert!(Pulse::default().get(0).is_err());
    }
    #[test]
    fn slicing_follows_sequence_rules() {
        let pulse = Pulse::new(test_samples());
        assert_eq!(pulse.slice(..-1).len(), 2);
        assert_eq!(pulse.slice(1..), Pulse::new(test_samples()[1..].to_vec()));
        assert_eq!(pulse.slice(-2..), pulse.slice(1..3));
        assert_eq!(pulse.slice(..), pulse);
        assert_eq!(pulse.slice(..=-1), pulse);
        assert!(pulse.slice(2..1).is_empty());
        assert!(pulse.slice(-10..-5).is_empty());
        assert_eq!(pulse.slice(-10..10), pulse);
    }
    #[test]
    fn slice_length_law() {
        let pulse = ramp(7);
        for a in 0..9isize {
            for b in 0..9isize {
                let expected = (b.min(7) - a.max(0)).max(0) as usize;
                assert_eq!(pulse.slice(a..b).len(), expected, "slice {a}..{b}");
            }
        }
    }
    #[test]
    fn slice_preserves_order() {
        let pulse = ramp(10);
        let sub = pulse.slice(3..6);
        assert_eq!(sub.samples(), &pulse.samples()[3..6]);
    }
    #[test]
    fn pulse_contains_sample() {
        let pulse = Pulse::new(test_samples());
        assert!(pulse.contains(&Sample::new(0.1, 0.2)));
        assert!(!pulse.contains(&Sample::new(0.1, 0.3)));
    }
    #[test]
    fn pulse_can_be_iterated_repeatedly() {
        let pulse = Pulse::new(test_samples());
        assert_eq!(pulse.iter().count(), 3);
        let collected: Vec<Sample> = (&pulse).into_iter().copied().collect();
        assert_eq!(collected, test_samples());
    }
    #[test]
    fn pulses_with_same_samples_in_same_order_are_equal() {
        let a = Pulse::new(test_samples());
        let b = Pulse::new(test_samples());
        assert_eq!(a, b);
        assert_eq!(b, a);
        assert_eq!(a, a.clone());
    }
    #[test]
    fn pulses_with_same_samples_in_different_order_are_not_equal() {
        let a = Pulse::new(vec![Sample::new(0.0, 0.1), Sample::new(0.1, 0.4)]);
        let b = Pulse::new(vec![Sample::new(0.1, 0.4), Sample::new(0.0, 0.1)]);
        assert_ne!(a, b);
    }
    #[test]
    fn prefix_is_not_equal_to_longer_pulse() {
        let long = Pulse::new(test_samples());
        let prefix = long.slice(..2);
        assert_ne!(long, prefix);
        assert_ne!(prefix, long);
        assert_ne!(Pulse::default(), long);
    }
    #[test]
    fn times_and_voltages_follow_sample_order() {
        let pulse = Pulse::new(test_samples());
        assert_eq!(pulse.times(), vec![0.0, 0.1, 0.2]);
        assert_eq!(pulse.voltages(), vec![0.0, 0.2, 0.4]);
    }
    #[test]
    fn from_times_and_voltages_rejects_mismatched_lengths() {
        let pulse = Pulse::from_times_and_voltages(&[0.0, 0.1, 0.2], &[0.0, 0.3, 0.6]).unwrap();
        assert_eq!(
            pulse,
            Pulse::new(vec![
                Sample::new(0.0, 0.0),
                Sample::new(0.1, 0.3),
                Sample::new(0.2, 0.6),
            ])
        );
        assert_eq!(
            Pulse::from_times_and_voltages(&[0.0, 0.1], &[0.0]),
            Err(PulseError::LengthMismatch {
                times: 2,
                voltages: 1
            })
        );
    }
    #[test]
    fn get_maximum_voltage() {
        let pulse = Pulse::new(vec![
            Sample::new(0.0, 0.0),
            Sample::new(0.1, 0.2),
            Sample::new(0.2, 0.4),
            Sample::new(0.3, 0.25),
        ]);
        assert!((pulse.max_voltage().unwrap() - 0.4).abs() < 1e-12);
    }
    #[test]
    fn maximum_voltage_of_empty_pulse_fails() {
        assert_eq!(Pulse::default().max_voltage(), Err(PulseError::EmptyPulse));
    }
    #[test]
    fn normalize_voltages_scales_to_unit_peak() {
        let pulse: Pulse = (0..5)
            .map(|i| Sample::new(i as f64 * 0.1, i as f64))
            .collect();
        let normalized = pulse.normalize_voltages().unwrap();
        assert_eq!(normalized.voltages(), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(normalized.times(), pulse.times());
    }
    #[test]
    fn normalize_voltages_is_idempotent() {
        let pulse = Pulse::new(vec![
            Sample::new(0.0, -0.3),
            Sample::new(0.1, 0.7),
            Sample::new(0.2, 0.35),
        ]);
        let once = pulse.normalize_voltages().unwrap();
        let twice = once.normalize_voltages().unwrap();
        assert_eq!(once.voltages(), twice.voltages());
    }
    #[test]
    fn normalize_voltages_error_cases() {
        assert_eq!(
            Pulse::default().normalize_voltages(),
            Err(PulseError::EmptyPulse)
        );
        let flat = Pulse::new(vec![Sample::new(0.0, 0.0), Sample::new(0.1, 0.0)]);
        assert_eq!(flat.normalize_voltages(), Err(PulseError::DivideByZero));
    }
    #[test]
    fn normalize_times_shifts_to_zero() {
        let pulse = Pulse::new(vec![
            Sample::new(2.5, 0.1),
            Sample::new(2.0, 0.2),
            Sample::new(3.0, 0.3),
        ]);
        let normalized = pulse.normalize_times();
        assert_eq!(normalized.times(), vec![0.5, 0.0, 1.0]);
        assert_eq!(normalized.voltages(), pulse.voltages());
        assert!(Pulse::default().normalize_times().is_empty());
    }
    #[test]
    fn smoothing_preserves_times_and_length() {
        let pulse = ramp(64);
        let smoothed = pulse.smooth(11, 3).unwrap();
        assert_eq!(smoothed.len(), pulse.len());
        assert_eq!(smoothed.times(), pulse.times());
    }
    #[test]
    fn smoothing_reproduces_linear_ramp() {
        let pulse = ramp(50);
        for (window, order) in [(3, 1), (11, 2), (21, 4), (49, 1)] {
            let smoothed = pulse.smooth(window, order).unwrap();
            for (s, v) in smoothed.voltages().iter().zip(pulse.voltages()) {
                assert!((s - v).abs() < 1e-6, "window {window} order {order}: {s} vs {v}");
            }
        }
    }
    #[test]
    fn smoothing_with_defaults_keeps_shape() {
        let pulse = ramp(1200);
        let smoothed = pulse.smooth_default().unwrap();
        assert_eq!(smoothed.len(), 1200);
        assert_eq!(smoothed.times(), pulse.times());
        for (got, want) in smoothed.voltages().iter().zip(pulse.voltages()) {
            assert!((got - want).abs() < 0.5, "{got} vs {want}");
        }
    }
    #[test]
    fn smoothing_reduces_noise() {
        let mut rng = StdRng::seed_from_u64(7);
        let clean: Vec<f64> = (0..500)
            .map(|i| (2.0 * std::f64::consts::PI * i as f64 / 500.0).sin())
            .collect();
        let noisy: Pulse = clean
            .iter()
            .enumerate()
            .map(|(i, v)| Sample::new(i as f64, v + rng.gen_range(-0.2..0.2)))
            .collect();
        let rms = |values: &[f64]| {
            let sum_sq: f64 = values.iter().zip(&clean).map(|(a, b)| (a - b).powi(2)).sum();
            (sum_sq / values.len() as f64).sqrt()
        };
        let smoothed = noisy.smooth(31, 3).unwrap();
        assert!(rms(&smoothed.voltages()) < 0.7 * rms(&noisy.voltages()));
    }
    #[test]
    fn smoothing_rejects_invalid_windows() {
        let pulse = ramp(10);
        assert!(matches!(
            pulse.smooth(4, 2),
            Err(PulseError::InvalidWindow { .. })
        ));
        assert!(pulse.smooth(0, 0).is_err());
        assert!(pulse.smooth(5, 5).is_err());
        assert!(pulse.smooth(25, 2).is_err());
        assert!(matches!(
            pulse.smooth_default(),
            Err(PulseError::InvalidWindow {
                window_size: 1001,
                reason: "window size exceeds twice the pulse length plus one",
                ..
            })
        ));
    }
    #[test]
    fn smoothing_empty_pulse_with_unit_window() {
        assert!(Pulse::default().smooth(1, 0).unwrap().is_empty());
    }
    #[test]
    fn transforms_leave_source_untouched() {
        let pulse = ramp(20);
        let before = pulse.clone();
        let _ = pulse.smooth(5, 2).unwrap();
        let _ = pulse.normalize_voltages().unwrap();
        let _ = pulse.normalize_times();
        assert_eq!(pulse, before);
    }
}
