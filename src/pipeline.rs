//! Per-occurrence formant extraction pipeline
//!
//! For each vowel occurrence:
//! 1. Take the temporal center `start + (end - start) / 2`
//! 2. Slice `slice_radius` samples on either side, clamped to the signal
//! 3. Compute the smoothed fixed-resolution spectrum
//! 4. Greedily select `formant_count` separated peaks
//!
//! Occurrences only read the shared audio, so they are mapped in parallel on a
//! fixed-size worker pool; so are files in a batch. Results always come back in
//! input order. A failing occurrence is recorded and the rest of the file is
//! still processed; a failing file does not affect the rest of the batch.

use std::path::Path;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::annotation::{parse_annotation, VowelOccurrence};
use crate::config::ExtractionConfig;
use crate::corpus::CorpusPair;
use crate::formant::select_formants;
use crate::phone::Monophthong;
use crate::sound::Sound;
use crate::spectrum::SpectralSlice;
use crate::utils::Fft;
use crate::{FormantError, Result};

/// Formants of one vowel occurrence
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionRecord {
    /// IPA symbol of the vowel
    pub phoneme: String,
    pub vowel: Monophthong,
    /// Formant frequencies (Hz-bins), strictly ascending
    pub formants: Vec<usize>,
}

/// An occurrence that could not be processed
#[derive(Debug)]
pub struct OccurrenceFailure {
    /// Position of the occurrence in the input sequence
    pub index: usize,
    pub occurrence: VowelOccurrence,
    pub error: FormantError,
}

/// Outcome of extracting one file
#[derive(Debug, Default)]
pub struct FileExtraction {
    /// Records of the successful occurrences, in input order
    pub records: Vec<ExtractionRecord>,
    /// Failed occurrences, in input order
    pub failures: Vec<OccurrenceFailure>,
    /// Annotation lines skipped as malformed
    pub skipped_lines: Vec<FormantError>,
}

impl FileExtraction {
    /// True when every vowel line produced a record
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && self.skipped_lines.is_empty()
    }
}

/// One file of a batch
#[derive(Debug)]
pub struct BatchItem {
    pub pair: CorpusPair,
    pub result: Result<FileExtraction>,
}

/// Formant extractor with its worker pool
pub struct FormantExtractor {
    config: ExtractionConfig,
    pool: rayon::ThreadPool,
}

impl FormantExtractor {
    /// Validate `config` and start the worker pool
    pub fn new(config: ExtractionConfig) -> Result<Self> {
        config.validate()?;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.num_threads)
            .thread_name(|i| format!("formant-worker-{}", i))
            .build()
            .map_err(|e| FormantError::InvalidParameter(format!("worker pool: {}", e)))?;

        Ok(Self { config, pool })
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Extract one occurrence
    ///
    /// # Errors
    /// - [`FormantError::InsufficientSamples`] if the clamped slice is too short
    /// - [`FormantError::FormantSelection`] if not enough separated peaks exist
    pub fn extract_occurrence(
        &self,
        fft: &mut Fft,
        sound: &Sound,
        occurrence: &VowelOccurrence,
    ) -> Result<ExtractionRecord> {
        let center = occurrence.center_sample();
        let slice = sound.slice_around(center, self.config.slice_radius);
        if slice.is_truncated() {
            debug!(
                center,
                requested = slice.requested_len(),
                available = slice.len(),
                "slice truncated at signal edge"
            );
        }

        let spectrum = SpectralSlice::from_samples(
            fft,
            slice.samples(),
            self.config.max_freq_bins,
            self.config.smoothing_window,
            self.config.smoothing_shape,
        )?;
        let formants = select_formants(
            &spectrum,
            self.config.formant_count,
            self.config.min_separation,
        )?;

        Ok(ExtractionRecord {
            phoneme: occurrence.symbol().to_string(),
            vowel: occurrence.vowel,
            formants: formants.frequencies(),
        })
    }

    /// Extract every occurrence of one recording
    pub fn extract(&self, sound: &Sound, occurrences: &[VowelOccurrence]) -> FileExtraction {
        let expected_rate = self.config.sample_rate as f64;
        if (sound.sample_rate() - expected_rate).abs() > 0.5 {
            warn!(
                sample_rate = sound.sample_rate(),
                expected = expected_rate,
                "unexpected sample rate; bins no longer map to Hz"
            );
        }

        let results: Vec<Result<ExtractionRecord>> = self.pool.install(|| {
            occurrences
                .par_iter()
                .map_init(Fft::new, |fft, occurrence| {
                    self.extract_occurrence(fft, sound, occurrence)
                })
                .collect()
        });

        let mut extraction = FileExtraction::default();
        for (index, (occurrence, result)) in occurrences.iter().zip(results).enumerate() {
            match result {
                Ok(record) => extraction.records.push(record),
                Err(error) => {
                    warn!(
                        index,
                        symbol = occurrence.symbol(),
                        start = occurrence.start_sample,
                        end = occurrence.end_sample,
                        error = %error,
                        "occurrence skipped"
                    );
                    extraction.failures.push(OccurrenceFailure {
                        index,
                        occurrence: *occurrence,
                        error,
                    });
                }
            }
        }
        extraction
    }

    /// Parse an annotation file, load its audio and extract all vowels
    ///
    /// # Errors
    /// File-level failures only: missing files, undecodable audio, or a
    /// malformed line under [`LinePolicy::Fail`](crate::LinePolicy::Fail).
    pub fn extract_file<A: AsRef<Path>, P: AsRef<Path>>(
        &self,
        audio_path: A,
        annotation_path: P,
    ) -> Result<FileExtraction> {
        let audio_path = audio_path.as_ref();
        let annotation_path = annotation_path.as_ref();

        let annotation = parse_annotation(annotation_path, self.config.line_policy)?;
        let sound = Sound::from_file(audio_path)?;

        let mut extraction = self.extract(&sound, &annotation.occurrences);
        extraction.skipped_lines = annotation.skipped;

        info!(
            audio = %audio_path.display(),
            records = extraction.records.len(),
            failures = extraction.failures.len(),
            skipped_lines = extraction.skipped_lines.len(),
            "extracted file"
        );
        Ok(extraction)
    }

    /// Extract many files in parallel, in input order
    pub fn extract_batch(&self, pairs: &[CorpusPair]) -> Vec<BatchItem> {
        self.pool.install(|| {
            pairs
                .par_iter()
                .map(|pair| {
                    let result = self.extract_file(&pair.audio, &pair.annotation);
                    if let Err(err) = &result {
                        warn!(
                            annotation = %pair.annotation.display(),
                            error = %err,
                            "file skipped"
                        );
                    }
                    BatchItem {
                        pair: pair.clone(),
                        result,
                    }
                })
                .collect()
        })
    }
}
