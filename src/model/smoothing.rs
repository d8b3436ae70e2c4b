//! Savitzky-Golay smoothing.
//!
//! The filter fits a polynomial of degree `order` to every window of
//! `window_size` samples and keeps the fitted value at the window centre.
//! Fitting is done once: the first row of the pseudo-inverse of the
//! Vandermonde design matrix gives the convolution coefficients, which are
//! then slid across the series after odd reflection at both boundaries.
use log::debug;
use nalgebra::DMatrix;
use ndarray::Array1;
use crate::model::PulseError;
/// Default window used by `Pulse::smooth_default`.
///
/// Windows must be odd, so this is the odd neighbour of the nominal 1000.
pub const DEFAULT_WINDOW_SIZE: usize = 1001;
/// Default polynomial order used by `Pulse::smooth_default`.
pub const DEFAULT_ORDER: usize = 4;
/// Singular values below `PINV_RCOND * sigma_max` count as zero.
const PINV_RCOND: f64 = 1e-15;
/// Check smoothing parameters against a series of `len` samples.
pub fn validate_window(window_size: usize, order: usize, len: usize) -> Result<(), PulseError> {
    let invalid = |reason| PulseError::InvalidWindow {
        window_size,
        order,
        len,
        reason,
    };
    if window_size == 0 {
        return Err(invalid("window size must be positive"));
    }
    if window_size % 2 == 0 {
        return Err(invalid("window size must be odd"));
    }
    if order >= window_size {
        return Err(invalid("polynomial order must be less than the window size"));
    }
    if window_size > 2 * len + 1 {
        return Err(invalid("window size exceeds twice the pulse length plus one"));
    }
    let half_window = (window_size - 1) / 2;
    if len > 0 && half_window >= len {
        return Err(invalid("boundary reflection needs half a window of samples past the edge"));
    }
    Ok(())
}
/// Convolution coefficients: first row of `pinv(B)`, `B[k][j] = k^j`.
pub fn coefficients(window_size: usize, order: usize) -> Result<Array1<f64>, PulseError> {
    validate_window(window_size, order, window_size)?;
    let half_window = ((window_size - 1) / 2) as f64;
    let design = DMatrix::<f64>::from_fn(window_size, order + 1, |row, col| {
        (row as f64 - half_window).powi(col as i32)
    });
    let svd = design.svd(true, true);
    let cutoff = PINV_RCOND * svd.singular_values.max();
    let pseudo_inverse = svd
        .pseudo_inverse(cutoff)
        .map_err(|e| PulseError::PseudoInverse(e.to_string()))?;
    debug!(
        "savitzky-golay coefficients computed (window {window_size}, order {order}, cutoff {cutoff:e})"
    );
    Ok(pseudo_inverse.row(0).iter().copied().collect())
}
/// Smooth `values`; the output has the same length as the input.
pub fn savitzky_golay(
    values: &[f64],
    window_size: usize,
    order: usize,
) -> Result<Vec<f64>, PulseError> {
    validate_window(window_size, order, values.len())?;
    if values.is_empty() {
        return Ok(Vec::new());
    }
    let coeffs = coefficients(window_size, order)?;
    let padded = reflect_pad(values, (window_size - 1) / 2);
    // Valid-mode convolution with the reversed kernel is a plain dot product per window.
    Ok(padded
        .windows(window_size)
        .into_iter()
        .map(|window| window.dot(&coeffs))
        .collect())
}
/// Odd reflection about the first and last samples.
fn reflect_pad(values: &[f64], half_window: usize) -> Array1<f64> {
    if half_window == 0 || values.is_empty() {
        return Array1::from(values.to_vec());
    }
    let last_index = values.len() - 1;
    let first = values[0];
    let last = values[last_index];
    let left = (1..=half_window).rev().map(|j| 2.0 * first - values[j]);
    let right = (1..=half_window).map(|j| 2.0 * last - values[last_index - j]);
    left.chain(values.iter().copied()).chain(right).collect()
}
#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn five_point_quadratic_matches_tabulated_coefficients() {
        let coeffs = coefficients(5, 2).unwrap();
        let expected = [-3.0, 12.0, 17.0, 12.0, -3.0].map(|c| c / 35.0);
        assert_eq!(coeffs.len(), 5);
        for (c, e) in coeffs.iter().zip(expected) {
            assert!((c - e).abs() < 1e-12, "{c} != {e}");
        }
    }
    #[test]
    fn order_zero_is_moving_average() {
        let coeffs = coefficients(7, 0).unwrap();
        assert!(coeffs.iter().all(|c| (c - 1.0 / 7.0).abs() < 1e-12));
    }
    #[test]
    fn reflection_pads_both_ends() {
        let padded = reflect_pad(&[1.0, 2.0, 4.0, 5.0], 2);
        assert_eq!(padded.to_vec(), vec![-2.0, 0.0, 1.0, 2.0, 4.0, 5.0, 6.0, 8.0]);
    }
    #[test]
    fn rejects_bad_windows() {
        assert!(matches!(
            validate_window(0, 0, 10),
            Err(PulseError::InvalidWindow { .. })
        ));
        assert!(validate_window(4, 1, 10).is_err());
        assert!(validate_window(5, 5, 10).is_err());
        assert!(validate_window(5, 7, 10).is_err());
        assert!(validate_window(23, 2, 10).is_err());
        assert!(validate_window(21, 2, 10).is_err());
        assert!(validate_window(19, 2, 10).is_ok());
        assert!(validate_window(1, 0, 0).is_ok());
        assert!(validate_window(3, 0, 0).is_err());
    }
    #[test]
    fn default_window_is_odd_and_fits_a_long_pulse() {
        assert_eq!(DEFAULT_WINDOW_SIZE % 2, 1);
        assert!(validate_window(DEFAULT_WINDOW_SIZE, DEFAULT_ORDER, 1200).is_ok());
        assert_eq!(
            validate_window(1000, DEFAULT_ORDER, 1200),
            Err(PulseError::InvalidWindow {
                window_size: 1000,
                order: DEFAULT_ORDER,
                len: 1200,
                reason: "window size must be odd",
            })
        );
    }
    #[test]
    fn single_point_window_is_identity() {
        let values = [0.3, -1.0, 2.5];
        let smoothed = savitzky_golay(&values, 1, 0).unwrap();
        assert_eq!(smoothed, values.to_vec());
    }
}
