//! Window functions for spectral smoothing
//!
//! The smoothing kernels follow the classic NumPy definitions (`hanning`,
//! `hamming`, `bartlett`, `blackman`), i.e. symmetric windows whose first and
//! last samples sit exactly on the window edges.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

/// Window shapes available as smoothing kernels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowShape {
    /// Rectangular window (moving average)
    #[serde(alias = "flat")]
    Rectangular,
    /// Hanning window (raised cosine)
    #[default]
    Hanning,
    /// Hamming window
    Hamming,
    /// Triangular (Bartlett) window
    Bartlett,
    /// Blackman window
    Blackman,
}

impl WindowShape {
    /// Compute the window value at a normalized position
    ///
    /// # Arguments
    /// * `position` - Position in the window, normalized to [-0.5, 0.5]
    ///                where 0 is the center
    ///
    /// # Returns
    /// The window amplitude at the given position (0.0 to 1.0)
    pub fn value_at(self, position: f64) -> f64 {
        if position.abs() > 0.5 {
            return 0.0;
        }

        match self {
            WindowShape::Rectangular => 1.0,

            WindowShape::Hanning => 0.5 + 0.5 * (2.0 * PI * position).cos(),

            WindowShape::Hamming => 0.54 + 0.46 * (2.0 * PI * position).cos(),

            WindowShape::Bartlett => 1.0 - 2.0 * position.abs(),

            WindowShape::Blackman => {
                0.42 + 0.5 * (2.0 * PI * position).cos() + 0.08 * (4.0 * PI * position).cos()
            }
        }
    }

    /// Generate a symmetric window of the given size
    ///
    /// The first and last values are equal and lie on the window edges
    /// (zero for Hanning, Bartlett and Blackman, up to rounding).
    pub fn generate_symmetric(self, size: usize) -> Vec<f64> {
        if size == 0 {
            return Vec::new();
        }
        if size == 1 {
            return vec![1.0];
        }

        (0..size)
            .map(|i| {
                let position = i as f64 / (size - 1) as f64 - 0.5;
                self.value_at(position)
            })
            .collect()
    }

    /// Generate a symmetric window scaled so its weights sum to 1
    ///
    /// Returns `None` if the weights sum to zero (e.g. a Hanning window of
    /// length 2, which is all edges).
    pub fn generate_normalized(self, size: usize) -> Option<Vec<f64>> {
        let mut window = self.generate_symmetric(size);
        let sum: f64 = window.iter().sum();
        if sum.abs() < f64::EPSILON {
            return None;
        }
        for w in &mut window {
            *w /= sum;
        }
        Some(window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rectangular_window() {
        let window = WindowShape::Rectangular.generate_symmetric(10);
        assert_eq!(window.len(), 10);
        for &v in &window {
            assert_relative_eq!(v, 1.0, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_hanning_matches_numpy() {
        // numpy.hanning(5) == [0, 0.5, 1, 0.5, 0]
        let window = WindowShape::Hanning.generate_symmetric(5);
        let expected = [0.0, 0.5, 1.0, 0.5, 0.0];
        for (w, e) in window.iter().zip(expected.iter()) {
            assert_relative_eq!(*w, *e, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_symmetric_windows() {
        for shape in [
            WindowShape::Hanning,
            WindowShape::Hamming,
            WindowShape::Bartlett,
            WindowShape::Blackman,
        ] {
            let window = shape.generate_symmetric(20);
            for i in 0..10 {
                assert_relative_eq!(window[i], window[19 - i], epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_hamming_edges() {
        let window = WindowShape::Hamming.generate_symmetric(11);
        assert_relative_eq!(window[0], 0.08, epsilon = 1e-10);
        assert_relative_eq!(window[5], 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_blackman_edges() {
        let window = WindowShape::Blackman.generate_symmetric(9);
        assert_relative_eq!(window[0], 0.0, epsilon = 1e-10);
        assert_relative_eq!(window[4], 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_normalized_window_sums_to_one() {
        let window = WindowShape::Hanning.generate_normalized(20).unwrap();
        let sum: f64 = window.iter().sum();
        assert_relative_eq!(sum, 1.0, epsilon = 1e-12);

        assert!(WindowShape::Hanning.generate_normalized(2).is_none());
        assert_eq!(WindowShape::Hanning.generate_normalized(1).unwrap(), vec![1.0]);
    }
}
