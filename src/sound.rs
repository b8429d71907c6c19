//! Sound type for audio data representation
//!
//! The Sound type is the read-only audio input of the extraction pipeline.
//! It supports loading from various audio formats (WAV, MP3, FLAC, OGG) and
//! extracting bounds-clamped slices around a center sample.

use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::debug;

use crate::{open_file, FormantError, Result};

/// Audio samples with associated sample rate
#[derive(Debug, Clone)]
pub struct Sound {
    /// Audio samples (mono)
    samples: Vec<f64>,
    /// Sample rate in Hz
    sample_rate: f64,
}

/// A slice of a [`Sound`] clamped to the available samples
///
/// Keeps the requested range next to the actual one so callers can tell
/// whether (and by how much) the slice was truncated at the signal edges.
#[derive(Debug, Clone, Copy)]
pub struct ClampedSlice<'a> {
    samples: &'a [f64],
    /// Length of `[center - radius, center + radius)`, saturating at `usize::MAX`
    requested_len: usize,
    /// Actual first sample
    start: usize,
}

impl<'a> ClampedSlice<'a> {
    /// The available samples
    pub fn samples(&self) -> &'a [f64] {
        self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Actual range as `(start, end)`, end exclusive
    pub fn range(&self) -> (usize, usize) {
        (self.start, self.start + self.samples.len())
    }

    /// Number of samples that were asked for
    pub fn requested_len(&self) -> usize {
        self.requested_len
    }

    /// Number of requested samples that fell outside the signal
    pub fn missing(&self) -> usize {
        self.requested_len.saturating_sub(self.samples.len())
    }

    pub fn is_truncated(&self) -> bool {
        self.missing() > 0
    }
}

impl Sound {
    /// Create a Sound from raw samples
    ///
    /// # Arguments
    /// * `samples` - Audio samples (will be cloned)
    /// * `sample_rate` - Sample rate in Hz
    ///
    /// # Example
    /// ```
    /// use vowel_formants::Sound;
    ///
    /// let samples = vec![0.0, 0.5, 1.0, 0.5, 0.0, -0.5, -1.0, -0.5];
    /// let sound = Sound::from_samples(&samples, 16000.0);
    /// assert_eq!(sound.sample_rate(), 16000.0);
    /// ```
    pub fn from_samples(samples: &[f64], sample_rate: f64) -> Self {
        Self {
            samples: samples.to_vec(),
            sample_rate,
        }
    }

    /// Create a Sound from owned samples (avoids cloning)
    pub fn from_samples_owned(samples: Vec<f64>, sample_rate: f64) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Load a Sound from an audio file (supports WAV, MP3, FLAC, OGG)
    ///
    /// Multi-channel files are converted to mono by averaging channels.
    /// Samples are normalized to [-1, 1] range.
    ///
    /// # Errors
    /// [`FormantError::NotFound`] if the file does not exist, a decoding
    /// error if the format is not supported.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(FormantError::NotFound(path.to_path_buf()));
        }

        // Try symphonia first (supports more formats)
        let sound = match Self::from_file_symphonia(path) {
            Ok(sound) => sound,
            Err(err) => {
                let is_wav = path
                    .extension()
                    .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case("wav"))
                    .unwrap_or(false);
                if !is_wav {
                    return Err(err);
                }
                // Fall back to hound for WAV files
                debug!(path = %path.display(), error = %err, "symphonia failed, retrying with hound");
                Self::from_file_wav(path)?
            }
        };

        debug!(
            path = %path.display(),
            samples = sound.num_samples(),
            sample_rate = sound.sample_rate,
            "loaded audio"
        );
        Ok(sound)
    }

    /// Load a Sound from any supported format using symphonia
    fn from_file_symphonia(path: &Path) -> Result<Self> {
        let file = open_file(path)?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        // Create a hint based on file extension
        let mut hint = Hint::new();
        if let Some(ext) = path.extension() {
            hint.with_extension(&ext.to_string_lossy());
        }

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| FormantError::AudioDecode(format!("failed to probe audio format: {}", e)))?;

        let mut format = probed.format;

        let track = format
            .default_track()
            .ok_or_else(|| FormantError::AudioDecode("no audio track found".to_string()))?;

        let track_id = track.id;
        let sample_rate = track
            .codec_params
            .sample_rate
            .ok_or_else(|| FormantError::AudioDecode("unknown sample rate".to_string()))?
            as f64;
        let channels = track
            .codec_params
            .channels
            .map(|c| c.count())
            .unwrap_or(1);

        let mut decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(|e| FormantError::AudioDecode(format!("failed to create decoder: {}", e)))?;

        let mut all_samples: Vec<f64> = Vec::new();

        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(symphonia::core::errors::Error::IoError(ref e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    break;
                }
                Err(e) => {
                    return Err(FormantError::AudioDecode(format!("error reading packet: {}", e)));
                }
            };

            // Skip packets from other tracks
            if packet.track_id() != track_id {
                continue;
            }

            let decoded = match decoder.decode(&packet) {
                Ok(decoded) => decoded,
                Err(symphonia::core::errors::Error::DecodeError(_)) => continue,
                Err(e) => {
                    return Err(FormantError::AudioDecode(format!("decode error: {}", e)));
                }
            };

            let spec = *decoded.spec();
            let num_frames = decoded.frames();

            let mut sample_buf = SampleBuffer::<f32>::new(num_frames as u64, spec);
            sample_buf.copy_interleaved_ref(decoded);

            mix_to_mono(sample_buf.samples(), channels, &mut all_samples);
        }

        Ok(Self {
            samples: all_samples,
            sample_rate,
        })
    }

    /// Load a Sound from a WAV file using hound
    fn from_file_wav(path: &Path) -> Result<Self> {
        let reader = hound::WavReader::open(path)?;
        let spec = reader.spec();
        let channels = spec.channels as usize;

        let interleaved: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Int => {
                let max_value = (1_i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .into_samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / max_value))
                    .collect::<std::result::Result<Vec<f32>, hound::Error>>()?
            }
            hound::SampleFormat::Float => reader
                .into_samples::<f32>()
                .collect::<std::result::Result<Vec<f32>, hound::Error>>()?,
        };

        let mut samples = Vec::with_capacity(interleaved.len() / channels.max(1));
        mix_to_mono(&interleaved, channels, &mut samples);

        Ok(Self {
            samples,
            sample_rate: spec.sample_rate as f64,
        })
    }

    /// Get the sample rate in Hz
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Get a reference to the audio samples
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Get the number of samples
    pub fn num_samples(&self) -> usize {
        self.samples.len()
    }

    /// Get the total duration in seconds
    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate
    }

    /// Take `[center - radius, center + radius)`, clamped to the signal
    ///
    /// Never fails: a request that lies entirely outside the signal yields an
    /// empty slice, leaving the "too short" decision to the caller.
    pub fn slice_around(&self, center: usize, radius: usize) -> ClampedSlice<'_> {
        let n = self.samples.len();
        let start = center.saturating_sub(radius).min(n);
        let end = center.saturating_add(radius).min(n).max(start);

        ClampedSlice {
            samples: &self.samples[start..end],
            requested_len: radius.saturating_mul(2),
            start,
        }
    }

    /// Create a pure tone (sine wave)
    ///
    /// # Arguments
    /// * `frequency` - Frequency in Hz
    /// * `duration` - Duration in seconds
    /// * `sample_rate` - Sample rate in Hz
    /// * `amplitude` - Peak amplitude (0.0 to 1.0)
    /// * `phase` - Initial phase in radians
    pub fn create_tone(
        frequency: f64,
        duration: f64,
        sample_rate: f64,
        amplitude: f64,
        phase: f64,
    ) -> Sound {
        let n_samples = (duration * sample_rate).round() as usize;
        let omega = 2.0 * std::f64::consts::PI * frequency / sample_rate;

        let samples: Vec<f64> = (0..n_samples)
            .map(|i| amplitude * (omega * i as f64 + phase).sin())
            .collect();

        Sound {
            samples,
            sample_rate,
        }
    }
}

/// Append interleaved `input` to `out`, averaging channels
fn mix_to_mono(input: &[f32], channels: usize, out: &mut Vec<f64>) {
    if channels <= 1 {
        out.extend(input.iter().map(|&s| s as f64));
        return;
    }
    for frame in input.chunks(channels) {
        let sum: f64 = frame.iter().map(|&s| s as f64).sum();
        out.push(sum / channels as f64);
    }
}
