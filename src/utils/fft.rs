//! Planner-caching FFT for the per-slice spectra
//!
//! Slices in a file share one length, so a worker-local [`Fft`] plans once
//! and reuses the plan for every occurrence.

use num_complex::Complex;
use rustfft::FftPlanner;

/// FFT processor with cached plans
///
/// Plans are cached per size, so one `Fft` should be reused across many
/// slices of the same length. It is not `Sync`; give each worker its own.
pub struct Fft {
    planner: FftPlanner<f64>,
}

impl Fft {
    /// Create a new FFT processor
    pub fn new() -> Self {
        Self {
            planner: FftPlanner::new(),
        }
    }

    /// Full complex FFT of real-valued input, same length as the input
    pub fn real_fft(&mut self, input: &[f64]) -> Vec<Complex<f64>> {
        let fft = self.planner.plan_fft_forward(input.len());
        let mut buffer: Vec<Complex<f64>> = input.iter().map(|&x| Complex::new(x, 0.0)).collect();

        fft.process(&mut buffer);
        buffer
    }

    /// Absolute value of the real part of the first half of the FFT
    ///
    /// The input is real, so bins above `n / 2` mirror the lower half and are
    /// dropped, leaving `input.len() / 2` values.
    pub fn real_part_magnitudes(&mut self, input: &[f64]) -> Vec<f64> {
        let n = input.len();
        if n == 0 {
            return Vec::new();
        }

        let spectrum = self.real_fft(input);
        spectrum[..n / 2].iter().map(|c| c.re.abs()).collect()
    }
}

impl Default for Fft {
    fn default() -> Self {
        Self::new()
    }
}
