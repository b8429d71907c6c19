//! Greedy formant selection from a magnitude spectrum
//!
//! Every bin of a [`SpectralSlice`] is a formant candidate. Candidates are
//! visited from the loudest down; a candidate is accepted when it lies more
//! than `min_separation` bins away from every formant accepted so far, and is
//! discarded otherwise. Each candidate is visited at most once. Selection stops
//! when `count` formants are accepted, which are then returned ascending by
//! frequency.
//!
//! Equal magnitudes are visited highest bin first. This keeps results
//! reproducible and matches popping from the tail of a bin-ordered, stably
//! sorted candidate list.

use crate::spectrum::SpectralSlice;
use crate::{FormantError, Result};

/// A selected spectral peak
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormantPeak {
    /// Bin index, read as a frequency in Hz
    pub frequency: usize,
    /// Smoothed magnitude at that bin
    pub amplitude: f64,
}

/// Formants of one vowel occurrence, ascending by frequency
#[derive(Debug, Clone, PartialEq)]
pub struct FormantSet {
    peaks: Vec<FormantPeak>,
}

impl FormantSet {
    /// Get a specific formant (1-indexed: F1, F2, F3, ...)
    pub fn get_formant(&self, formant_number: usize) -> Option<&FormantPeak> {
        if formant_number == 0 {
            return None;
        }
        self.peaks.get(formant_number - 1)
    }

    /// Number of formants in the set
    pub fn num_formants(&self) -> usize {
        self.peaks.len()
    }

    pub fn peaks(&self) -> &[FormantPeak] {
        &self.peaks
    }

    /// Formant frequencies, ascending
    pub fn frequencies(&self) -> Vec<usize> {
        self.peaks.iter().map(|p| p.frequency).collect()
    }
}

/// Select `count` peaks separated by more than `min_separation` bins
///
/// # Errors
/// [`FormantError::FormantSelection`] when every candidate has been visited
/// before `count` formants were accepted, e.g. when `min_separation` is wide
/// compared to the spectrum.
pub fn select_formants(
    spectrum: &SpectralSlice,
    count: usize,
    min_separation: usize,
) -> Result<FormantSet> {
    let magnitudes = spectrum.magnitudes();

    // Loudest first; ties go to the higher bin
    let mut candidates: Vec<usize> = (0..magnitudes.len()).collect();
    candidates.sort_by(|&a, &b| {
        magnitudes[b]
            .total_cmp(&magnitudes[a])
            .then_with(|| b.cmp(&a))
    });

    let mut chosen: Vec<FormantPeak> = Vec::with_capacity(count);
    for bin in candidates {
        if chosen.len() == count {
            break;
        }
        if chosen.iter().all(|p| p.frequency.abs_diff(bin) > min_separation) {
            chosen.push(FormantPeak {
                frequency: bin,
                amplitude: magnitudes[bin],
            });
        }
    }

    if chosen.len() < count {
        return Err(FormantError::FormantSelection {
            requested: count,
            found: chosen.len(),
            min_separation,
        });
    }

    chosen.sort_by_key(|p| p.frequency);
    Ok(FormantSet { peaks: chosen })
}
