//! Phoneme annotation parsing
//!
//! Annotation files hold one phone per line as whitespace-separated
//! `<start_sample> <end_sample> <label>` fields (TIMIT `.PHN` format):
//!
//! ```text
//! 0 3050 h#
//! 3050 4559 sh
//! 4559 5723 ix
//! ```
//!
//! Only lines whose label is one of the 14 [`Monophthong`]s become
//! [`VowelOccurrence`]s; everything else is skipped. Occurrences are returned in
//! file order, which is temporal order.

use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::phone::Monophthong;
use crate::{open_file, FormantError, Result};

/// A single annotated vowel with its sample boundaries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VowelOccurrence {
    /// The vowel, looked up from the annotation label
    pub vowel: Monophthong,
    /// First sample of the vowel
    pub start_sample: usize,
    /// Sample just after the vowel (never less than `start_sample`)
    pub end_sample: usize,
}

impl VowelOccurrence {
    pub fn new(vowel: Monophthong, start_sample: usize, end_sample: usize) -> Result<Self> {
        if end_sample < start_sample {
            return Err(FormantError::InvalidParameter(format!(
                "end sample {} precedes start sample {}",
                end_sample, start_sample
            )));
        }
        Ok(Self {
            vowel,
            start_sample,
            end_sample,
        })
    }

    /// IPA symbol of the vowel
    pub fn symbol(&self) -> &'static str {
        self.vowel.ipa()
    }

    /// Temporal center: `start + (end - start) / 2`, floored
    pub fn center_sample(&self) -> usize {
        self.start_sample + (self.end_sample - self.start_sample) / 2
    }

    /// Duration in samples
    pub fn len(&self) -> usize {
        self.end_sample - self.start_sample
    }

    pub fn is_empty(&self) -> bool {
        self.end_sample == self.start_sample
    }
}

/// What to do with a line that cannot be parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinePolicy {
    /// Record the line in [`ParsedAnnotation::skipped`] and keep going
    #[default]
    Skip,
    /// Abort parsing at the first malformed line
    Fail,
}

/// Result of parsing one annotation file
#[derive(Debug, Default)]
pub struct ParsedAnnotation {
    /// Vowel occurrences in file order
    pub occurrences: Vec<VowelOccurrence>,
    /// Malformed lines skipped under [`LinePolicy::Skip`]
    pub skipped: Vec<FormantError>,
}

/// Parse an annotation file
///
/// # Errors
/// - [`FormantError::NotFound`] if the path does not exist
/// - [`FormantError::MalformedAnnotation`] for a bad line under [`LinePolicy::Fail`]
pub fn parse_annotation<P: AsRef<Path>>(path: P, policy: LinePolicy) -> Result<ParsedAnnotation> {
    let path = path.as_ref();
    let reader = BufReader::new(open_file(path)?);

    let mut parsed = ParsedAnnotation::default();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        accept_line(&mut parsed, &line, idx + 1, policy)?;
    }

    debug!(
        path = %path.display(),
        occurrences = parsed.occurrences.len(),
        skipped = parsed.skipped.len(),
        "parsed annotation"
    );
    Ok(parsed)
}

/// Parse annotation text already held in memory
pub fn parse_annotation_str(text: &str, policy: LinePolicy) -> Result<ParsedAnnotation> {
    let mut parsed = ParsedAnnotation::default();
    for (idx, line) in text.lines().enumerate() {
        accept_line(&mut parsed, line, idx + 1, policy)?;
    }
    Ok(parsed)
}

fn accept_line(
    parsed: &mut ParsedAnnotation,
    line: &str,
    line_number: usize,
    policy: LinePolicy,
) -> Result<()> {
    match parse_line(line, line_number) {
        Ok(Some(occurrence)) => parsed.occurrences.push(occurrence),
        Ok(None) => {}
        Err(err) => match policy {
            LinePolicy::Fail => return Err(err),
            LinePolicy::Skip => {
                warn!(line = line_number, error = %err, "skipping annotation line");
                parsed.skipped.push(err);
            }
        },
    }
    Ok(())
}

/// Parse one line; `Ok(None)` for blank lines and non-vowel labels
fn parse_line(line: &str, line_number: usize) -> Result<Option<VowelOccurrence>> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.is_empty() {
        return Ok(None);
    }

    let malformed = |reason: String| FormantError::MalformedAnnotation {
        line: line_number,
        reason,
    };

    if fields.len() < 3 {
        return Err(malformed(format!(
            "expected `start end label`, found {} field(s)",
            fields.len()
        )));
    }

    // The label gates everything: non-vowel lines are never inspected further
    let label = fields[fields.len() - 1];
    let Some(vowel) = Monophthong::from_arpabet(label) else {
        return Ok(None);
    };

    let start: usize = fields[0]
        .parse()
        .map_err(|_| malformed(format!("invalid start sample `{}`", fields[0])))?;
    let end: usize = fields[1]
        .parse()
        .map_err(|_| malformed(format!("invalid end sample `{}`", fields[1])))?;

    if end < start {
        return Err(malformed(format!(
            "end sample {} precedes start sample {}",
            end, start
        )));
    }

    Ok(Some(VowelOccurrence {
        vowel,
        start_sample: start,
        end_sample: end,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE_PHN: &str = "0 3050 h#\n\
                              3050 4559 sh\n\
                              4559 5723 ix\n\
                              5723 6642 hv\n\
                              6642 8772 eh\n\
                              8772 9190 dcl\n\
                              9190 10337 axr\n";

    #[test]
    fn test_keeps_only_vowels_in_order() {
        let parsed = parse_annotation_str(SAMPLE_PHN, LinePolicy::Fail).unwrap();
        let symbols: Vec<&str> = parsed.occurrences.iter().map(|o| o.symbol()).collect();

        assert_eq!(symbols, vec!["ɨ", "ɛ", "ɚ"]);
        assert_eq!(parsed.occurrences[0].start_sample, 4559);
        assert_eq!(parsed.occurrences[0].end_sample, 5723);
        assert!(parsed.skipped.is_empty());
    }

    #[test]
    fn test_non_vowel_line_yields_nothing() {
        let parsed = parse_annotation_str("500 600 k\n", LinePolicy::Fail).unwrap();
        assert!(parsed.occurrences.is_empty());
    }

    #[test]
    fn test_non_vowel_labels_skip_integer_parsing() {
        let parsed = parse_annotation_str("abc def pau\n", LinePolicy::Fail).unwrap();
        assert!(parsed.occurrences.is_empty());
    }

    #[test]
    fn test_blank_lines_ignored() {
        let parsed = parse_annotation_str("\n1000 1400 iy\n   \n", LinePolicy::Fail).unwrap();
        assert_eq!(parsed.occurrences.len(), 1);
    }

    #[test]
    fn test_malformed_fails_under_fail_policy() {
        let err = parse_annotation_str("1000 1400 iy\n10x0 1400 iy\n", LinePolicy::Fail).unwrap_err();
        match err {
            FormantError::MalformedAnnotation { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error {:?}", other),
        }

        let err = parse_annotation_str("1000 iy\n", LinePolicy::Fail).unwrap_err();
        assert!(matches!(err, FormantError::MalformedAnnotation { line: 1, .. }));
    }

    #[test]
    fn test_malformed_recorded_under_skip_policy() {
        let text = "1000 1400 iy\n1400 1200 ae\n-5 10 uw\n2000 2400 uh\n";
        let parsed = parse_annotation_str(text, LinePolicy::Skip).unwrap();

        assert_eq!(parsed.occurrences.len(), 2);
        assert_eq!(parsed.skipped.len(), 2);
        assert!(matches!(
            parsed.skipped[0],
            FormantError::MalformedAnnotation { line: 2, .. }
        ));
        assert!(matches!(
            parsed.skipped[1],
            FormantError::MalformedAnnotation { line: 3, .. }
        ));
    }

    #[test]
    fn test_parse_file_round_trip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "100 200 iy").unwrap();
        writeln!(file, "200 350 aa").unwrap();
        writeln!(file, "350 500 uw").unwrap();

        let parsed = parse_annotation(file.path(), LinePolicy::Fail).unwrap();
        let symbols: Vec<&str> = parsed.occurrences.iter().map(|o| o.symbol()).collect();
        assert_eq!(parsed.occurrences.len(), 3);
        assert_eq!(symbols, vec!["i", "ɑ", "u"]);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = parse_annotation(dir.path().join("nope.PHN"), LinePolicy::Skip).unwrap_err();
        assert!(matches!(err, FormantError::NotFound(_)));
    }

    #[test]
    fn test_center_sample() {
        let occurrence = VowelOccurrence::new(Monophthong::Iy, 1000, 1401).unwrap();
        assert_eq!(occurrence.center_sample(), 1200);
        assert_eq!(occurrence.len(), 401);
        assert!(VowelOccurrence::new(Monophthong::Iy, 10, 5).is_err());
    }
}
