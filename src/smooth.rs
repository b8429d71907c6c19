//! Window smoothing with mirrored edges
//!
//! The signal is extended at both ends by reflecting the samples next to the
//! edge (the edge sample itself is not repeated), then convolved with a
//! normalized window in "valid" mode. The padding is split so that the output
//! has exactly the same length as the input: `(W-1)/2` samples on the left and
//! the remaining `W-1-(W-1)/2` on the right, which also centers even-length
//! windows.

use crate::window::WindowShape;
use crate::{FormantError, Result};

/// Smooth `signal` with a normalized Hanning window of length `window_len`
///
/// # Errors
/// [`FormantError::InvalidWindow`] if `window_len` is zero, longer than the
/// signal, or yields a window whose weights sum to zero (length 2).
pub fn smooth(signal: &[f64], window_len: usize) -> Result<Vec<f64>> {
    smooth_with(signal, window_len, WindowShape::Hanning)
}

/// Smooth `signal` with an arbitrary normalized window shape
pub fn smooth_with(signal: &[f64], window_len: usize, shape: WindowShape) -> Result<Vec<f64>> {
    let invalid = || FormantError::InvalidWindow {
        window_len,
        signal_len: signal.len(),
    };

    if window_len == 0 || signal.len() < window_len {
        return Err(invalid());
    }
    if window_len == 1 {
        return Ok(signal.to_vec());
    }

    let weights = shape.generate_normalized(window_len).ok_or_else(invalid)?;
    let padded = mirror_pad(signal, window_len);

    // Symmetric kernel, so correlation and convolution coincide
    let smoothed: Vec<f64> = padded
        .windows(window_len)
        .map(|frame| frame.iter().zip(&weights).map(|(x, w)| x * w).sum())
        .collect();

    debug_assert_eq!(smoothed.len(), signal.len());
    Ok(smoothed)
}

/// Reflect-pad `signal` with `window_len - 1` samples in total
///
/// Requires `signal.len() >= window_len`, so every reflected index exists.
fn mirror_pad(signal: &[f64], window_len: usize) -> Vec<f64> {
    let n = signal.len();
    let left = (window_len - 1) / 2;
    let right = window_len - 1 - left;

    let mut padded = Vec::with_capacity(n + window_len - 1);
    padded.extend(signal[1..=left].iter().rev());
    padded.extend_from_slice(signal);
    padded.extend(signal[n - 1 - right..n - 1].iter().rev());
    padded
}
