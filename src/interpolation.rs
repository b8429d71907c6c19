//! Linear interpolation on uniformly-sampled arrays
//!
//! Used to stretch a native-resolution half spectrum onto a fixed-length
//! frequency axis.

/// Linear interpolation between two values
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

/// Linear interpolation in an array at a fractional index
///
/// Positions past either end are clamped to the first/last sample.
pub fn linear_interpolate(samples: &[f64], position: f64) -> f64 {
    let n = samples.len();
    if n == 0 {
        return 0.0;
    }
    if n == 1 || position <= 0.0 {
        return samples[0];
    }

    let idx = position.floor() as usize;
    if idx >= n - 1 {
        return samples[n - 1];
    }

    let frac = position - idx as f64;
    lerp(samples[idx], samples[idx + 1], frac)
}

/// Resample `samples` to exactly `n_points` values
///
/// Query points are evenly spaced over `[0, samples.len() - 1]`, both ends
/// included, so the first and last outputs equal the first and last inputs.
pub fn resample_linear(samples: &[f64], n_points: usize) -> Vec<f64> {
    if samples.is_empty() || n_points == 0 {
        return Vec::new();
    }
    if n_points == 1 {
        return vec![samples[0]];
    }

    let max_pos = (samples.len() - 1) as f64;
    let step = max_pos / (n_points - 1) as f64;

    (0..n_points)
        .map(|i| {
            // Pin the last query exactly onto the last sample
            let position = if i == n_points - 1 { max_pos } else { i as f64 * step };
            linear_interpolate(samples, position)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_lerp() {
        assert_relative_eq!(lerp(0.0, 10.0, 0.0), 0.0);
        assert_relative_eq!(lerp(0.0, 10.0, 0.5), 5.0);
        assert_relative_eq!(lerp(0.0, 10.0, 1.0), 10.0);
    }

    #[test]
    fn test_linear_interpolate() {
        let samples = vec![0.0, 1.0, 4.0, 9.0];
        assert_relative_eq!(linear_interpolate(&samples, 0.0), 0.0, epsilon = 1e-10);
        assert_relative_eq!(linear_interpolate(&samples, 1.5), 2.5, epsilon = 1e-10);
        assert_relative_eq!(linear_interpolate(&samples, 3.0), 9.0, epsilon = 1e-10);
        assert_relative_eq!(linear_interpolate(&samples, 7.0), 9.0, epsilon = 1e-10);
    }

    #[test]
    fn test_resample_endpoints_and_length() {
        let samples = vec![3.0, 1.0, 4.0, 1.0, 5.0];
        let resampled = resample_linear(&samples, 8000);

        assert_eq!(resampled.len(), 8000);
        assert_relative_eq!(resampled[0], 3.0, epsilon = 1e-12);
        assert_relative_eq!(resampled[7999], 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_resample_linear_ramp() {
        // A ramp stays a ramp under linear resampling
        let samples: Vec<f64> = (0..11).map(|i| i as f64).collect();
        let resampled = resample_linear(&samples, 21);
        for (i, v) in resampled.iter().enumerate() {
            assert_relative_eq!(*v, i as f64 * 0.5, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_resample_degenerate_inputs() {
        assert!(resample_linear(&[], 10).is_empty());
        assert!(resample_linear(&[1.0, 2.0], 0).is_empty());
        assert_eq!(resample_linear(&[7.0], 4), vec![7.0; 4]);
        assert_eq!(resample_linear(&[2.0, 9.0], 1), vec![2.0]);
    }
}
