//! vowel-formants: per-vowel spectral formant extraction
//!
//! Given a speech recording and a time-aligned phoneme annotation (TIMIT `.PHN`
//! style), this library locates every monophthong occurrence, computes a smoothed
//! fixed-resolution magnitude spectrum around its temporal center and greedily
//! selects well-separated spectral peaks as formants.
//!
//! # Core Types
//!
//! - [`Sound`] - Audio samples with sample rate
//! - [`Monophthong`] - The fixed 14-entry vowel table (ARPABET → IPA)
//! - [`VowelOccurrence`] - One annotated vowel with sample boundaries
//! - [`SpectralSlice`] - Smoothed magnitude spectrum on a fixed "Hz" axis
//! - [`FormantSet`] - Selected peaks, ascending by frequency
//! - [`FormantExtractor`] - Parallel per-file / per-occurrence pipeline
//!
//! # Example
//! ```
//! use vowel_formants::{parse_annotation_str, ExtractionConfig, FormantExtractor, LinePolicy, Sound};
//!
//! let sound = Sound::create_tone(700.0, 0.25, 16000.0, 0.8, 0.0);
//! let annotation = parse_annotation_str("1000 1400 iy\n1400 1500 k\n", LinePolicy::Fail).unwrap();
//!
//! let extractor = FormantExtractor::new(ExtractionConfig::default()).unwrap();
//! let extraction = extractor.extract(&sound, &annotation.occurrences);
//!
//! assert_eq!(extraction.records.len(), 1);
//! assert_eq!(extraction.records[0].phoneme, "i");
//! ```

use std::path::PathBuf;

pub mod sound;
pub mod phone;
pub mod annotation;
pub mod window;
pub mod interpolation;
pub mod smooth;
pub mod spectrum;
pub mod formant;
pub mod config;
pub mod pipeline;
pub mod corpus;
pub mod dataset;

pub mod utils;

// Re-export main types at crate root
pub use sound::{ClampedSlice, Sound};
pub use phone::{num_monophthongs, Monophthong};
pub use annotation::{parse_annotation, parse_annotation_str, LinePolicy, ParsedAnnotation, VowelOccurrence};
pub use window::WindowShape;
pub use smooth::{smooth, smooth_with};
pub use spectrum::{compute_spectrum, SpectralSlice};
pub use formant::{select_formants, FormantPeak, FormantSet};
pub use config::ExtractionConfig;
pub use pipeline::{BatchItem, ExtractionRecord, FileExtraction, FormantExtractor, OccurrenceFailure};
pub use corpus::{discover_pairs, CorpusPair, CorpusSplit};
pub use dataset::{DatasetRow, DatasetWriter};

use thiserror::Error;

/// Errors that can occur while extracting formants
#[derive(Error, Debug)]
pub enum FormantError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("WAV decoding error: {0}")]
    WavDecode(#[from] hound::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Malformed annotation at line {line}: {reason}")]
    MalformedAnnotation { line: usize, reason: String },

    #[error("Insufficient samples: need at least {required}, got {actual}")]
    InsufficientSamples { required: usize, actual: usize },

    #[error("Invalid smoothing window of length {window_len} for a signal of length {signal_len}")]
    InvalidWindow { window_len: usize, signal_len: usize },

    #[error(
        "Formant selection exhausted candidates: found {found} of {requested} peaks more than {min_separation} bins apart"
    )]
    FormantSelection {
        requested: usize,
        found: usize,
        min_separation: usize,
    },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Audio decoding error: {0}")]
    AudioDecode(String),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, FormantError>;

/// Open a file, mapping a missing path to [`FormantError::NotFound`]
pub(crate) fn open_file(path: &std::path::Path) -> Result<std::fs::File> {
    std::fs::File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => FormantError::NotFound(path.to_path_buf()),
        _ => FormantError::Io(e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.PHN");

        match open_file(&path) {
            Err(FormantError::NotFound(p)) => assert_eq!(p, path),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_error_messages() {
        let err = FormantError::FormantSelection {
            requested: 5,
            found: 2,
            min_separation: 250,
        };
        assert_eq!(
            err.to_string(),
            "Formant selection exhausted candidates: found 2 of 5 peaks more than 250 bins apart"
        );

        let err = FormantError::MalformedAnnotation {
            line: 3,
            reason: "expected 3 fields".to_string(),
        };
        assert_eq!(err.to_string(), "Malformed annotation at line 3: expected 3 fields");
    }
}
