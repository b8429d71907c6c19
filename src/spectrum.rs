//! Smoothed fixed-resolution magnitude spectrum
//!
//! A short audio slice is transformed with an FFT, the absolute real part of
//! the lower half of the coefficients is linearly stretched onto a fixed
//! number of bins (one per "Hz" up to the assumed Nyquist frequency), and the
//! result is smoothed with a normalized window. Fixing the output length
//! decouples peak picking from the FFT's native resolution, which varies with
//! the slice length.

use crate::interpolation::resample_linear;
use crate::smooth::smooth_with;
use crate::utils::Fft;
use crate::window::WindowShape;
use crate::{FormantError, Result};

/// Minimum slice length for which a spectrum is defined
pub const MIN_SLICE_SAMPLES: usize = 2;

/// Magnitude spectrum on a fixed-length frequency axis
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralSlice {
    magnitudes: Vec<f64>,
}

impl SpectralSlice {
    /// Wrap precomputed magnitudes (bin index = frequency)
    pub fn new(magnitudes: Vec<f64>) -> Self {
        Self { magnitudes }
    }

    /// Compute the spectrum of `samples` using a caller-owned FFT planner
    ///
    /// # Arguments
    /// * `fft` - FFT processor (plans are cached across calls)
    /// * `samples` - Audio slice, at least [`MIN_SLICE_SAMPLES`] long
    /// * `max_freq_bins` - Output length
    /// * `smoothing_window` - Smoothing kernel length
    /// * `shape` - Smoothing kernel shape
    ///
    /// # Errors
    /// - [`FormantError::InsufficientSamples`] for slices shorter than 2 samples
    /// - [`FormantError::InvalidWindow`] if the window does not fit the
    ///   `max_freq_bins` axis, including an empty axis
    ///
    /// The slice length is checked first.
    pub fn from_samples(
        fft: &mut Fft,
        samples: &[f64],
        max_freq_bins: usize,
        smoothing_window: usize,
        shape: WindowShape,
    ) -> Result<Self> {
        if samples.len() < MIN_SLICE_SAMPLES {
            return Err(FormantError::InsufficientSamples {
                required: MIN_SLICE_SAMPLES,
                actual: samples.len(),
            });
        }

        let half = fft.real_part_magnitudes(samples);
        let stretched = resample_linear(&half, max_freq_bins);
        let magnitudes = smooth_with(&stretched, smoothing_window, shape)?;

        Ok(Self { magnitudes })
    }

    /// Number of frequency bins
    pub fn num_bins(&self) -> usize {
        self.magnitudes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.magnitudes.is_empty()
    }

    /// All magnitudes, indexed by bin
    pub fn magnitudes(&self) -> &[f64] {
        &self.magnitudes
    }

    /// Magnitude at a bin
    pub fn get(&self, bin: usize) -> Option<f64> {
        self.magnitudes.get(bin).copied()
    }

    /// Bin with the largest magnitude (lowest bin on ties)
    pub fn peak_bin(&self) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (bin, &m) in self.magnitudes.iter().enumerate() {
            match best {
                Some((_, best_m)) if m <= best_m => {}
                _ => best = Some((bin, m)),
            }
        }
        best.map(|(bin, _)| bin)
    }
}

/// Compute a smoothed spectrum with a Hanning kernel
///
/// Convenience wrapper around [`SpectralSlice::from_samples`] with a fresh
/// FFT planner.
pub fn compute_spectrum(
    samples: &[f64],
    max_freq_bins: usize,
    smoothing_window: usize,
) -> Result<SpectralSlice> {
    let mut fft = Fft::new();
    SpectralSlice::from_samples(
        &mut fft,
        samples,
        max_freq_bins,
        smoothing_window,
        WindowShape::Hanning,
    )
}
