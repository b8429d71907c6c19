//! TIMIT-style corpus discovery
//!
//! A corpus directory holds a `TRAIN` and a `TEST` tree. Every `.PHN`
//! annotation is paired with the audio file next to it that has the same stem
//! and the configured extension (e.g. `SA1.PHN` with `SA1.wav`). Audio
//! conversion from NIST SPHERE is not handled here; point `audio_ext` at
//! whatever the converted files use.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{FormantError, Result};

/// Extension of annotation files (matched case-insensitively)
pub const ANNOTATION_EXT: &str = "phn";

/// Corpus partition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorpusSplit {
    Train,
    Test,
}

impl CorpusSplit {
    /// Directory name inside the corpus root
    pub fn dir_name(self) -> &'static str {
        match self {
            CorpusSplit::Train => "TRAIN",
            CorpusSplit::Test => "TEST",
        }
    }
}

impl fmt::Display for CorpusSplit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorpusSplit::Train => f.write_str("train"),
            CorpusSplit::Test => f.write_str("test"),
        }
    }
}

/// An audio file and its annotation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusPair {
    pub split: CorpusSplit,
    pub audio: PathBuf,
    pub annotation: PathBuf,
}

/// Find up to `limit` audio/annotation pairs per split
///
/// Pairs are sorted by annotation path. Annotations without matching audio
/// are logged and skipped, as are missing split directories.
///
/// # Errors
/// [`FormantError::NotFound`] if `data_dir` does not exist.
pub fn discover_pairs(
    data_dir: &Path,
    audio_ext: &str,
    splits: &[CorpusSplit],
    limit: Option<usize>,
) -> Result<Vec<CorpusPair>> {
    if !data_dir.is_dir() {
        return Err(FormantError::NotFound(data_dir.to_path_buf()));
    }

    let mut pairs = Vec::new();
    for &split in splits {
        let Some(split_dir) = find_child_dir(data_dir, split.dir_name())? else {
            warn!(data_dir = %data_dir.display(), split = %split, "split directory missing");
            continue;
        };

        let mut files = Vec::new();
        collect_files(&split_dir, &mut files)?;
        files.sort();

        let mut split_pairs = pair_files(split, &files, audio_ext);
        if let Some(limit) = limit {
            split_pairs.truncate(limit);
        }
        debug!(split = %split, pairs = split_pairs.len(), "discovered corpus pairs");
        pairs.extend(split_pairs);
    }

    Ok(pairs)
}

fn pair_files(split: CorpusSplit, files: &[PathBuf], audio_ext: &str) -> Vec<CorpusPair> {
    // (directory, lowercase stem) -> audio path
    let mut audio: HashMap<(PathBuf, String), &PathBuf> = HashMap::new();
    for file in files {
        if has_extension(file, audio_ext) {
            if let Some(key) = stem_key(file) {
                audio.entry(key).or_insert(file);
            }
        }
    }

    let mut pairs = Vec::new();
    for file in files.iter().filter(|f| has_extension(f, ANNOTATION_EXT)) {
        let found = stem_key(file).and_then(|key| audio.get(&key).copied());
        match found {
            Some(audio_path) => pairs.push(CorpusPair {
                split,
                audio: audio_path.clone(),
                annotation: file.clone(),
            }),
            None => warn!(annotation = %file.display(), "no audio file for annotation"),
        }
    }
    pairs
}

fn stem_key(path: &Path) -> Option<(PathBuf, String)> {
    let parent = path.parent()?.to_path_buf();
    let stem = path.file_stem()?.to_string_lossy().to_lowercase();
    Some((parent, stem))
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().eq_ignore_ascii_case(ext))
        .unwrap_or(false)
}

/// Child directory of `parent` named `name`, ignoring case
fn find_child_dir(parent: &Path, name: &str) -> Result<Option<PathBuf>> {
    for entry in fs::read_dir(parent)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() && entry.file_name().to_string_lossy().eq_ignore_ascii_case(name) {
            return Ok(Some(entry.path()));
        }
    }
    Ok(None)
}

fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            collect_files(&path, out)?;
        } else {
            out.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"").unwrap();
    }

    fn corpus() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        for speaker in ["DR1/FCJF0", "DR1/MDAB0"] {
            for utt in ["SA1", "SA2"] {
                touch(&root.join("TRAIN").join(speaker).join(format!("{}.PHN", utt)));
                touch(&root.join("TRAIN").join(speaker).join(format!("{}.wav", utt)));
                touch(&root.join("TRAIN").join(speaker).join(format!("{}.TXT", utt)));
            }
        }
        touch(&root.join("TEST/DR2/FAEM0/SI762.PHN"));
        touch(&root.join("TEST/DR2/FAEM0/SI762.WAV"));
        // Annotation without audio
        touch(&root.join("TEST/DR2/FAEM0/SX42.PHN"));
        dir
    }

    #[test]
    fn test_discovers_sorted_pairs() {
        let dir = corpus();
        let pairs = discover_pairs(dir.path(), "wav", &[CorpusSplit::Train, CorpusSplit::Test], None).unwrap();

        assert_eq!(pairs.len(), 5);
        assert!(pairs[..4].iter().all(|p| p.split == CorpusSplit::Train));
        assert_eq!(pairs[4].split, CorpusSplit::Test);
        assert!(pairs[0].annotation.ends_with("TRAIN/DR1/FCJF0/SA1.PHN"));
        assert!(pairs[0].audio.ends_with("TRAIN/DR1/FCJF0/SA1.wav"));
        assert!(pairs[4].audio.ends_with("TEST/DR2/FAEM0/SI762.WAV"));
    }

    #[test]
    fn test_limit_per_split() {
        let dir = corpus();
        let pairs = discover_pairs(dir.path(), "wav", &[CorpusSplit::Train, CorpusSplit::Test], Some(1)).unwrap();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].split, CorpusSplit::Train);
        assert_eq!(pairs[1].split, CorpusSplit::Test);
    }

    #[test]
    fn test_single_split_and_other_extension() {
        let dir = corpus();
        let pairs = discover_pairs(dir.path(), "wav", &[CorpusSplit::Test], None).unwrap();
        assert_eq!(pairs.len(), 1);

        let pairs = discover_pairs(dir.path(), "flac", &[CorpusSplit::Train], None).unwrap();
        assert!(pairs.is_empty());
    }

    #[test]
    fn test_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let err = discover_pairs(&dir.path().join("TIMIT"), "wav", &[CorpusSplit::Train], None).unwrap_err();
        assert!(matches!(err, FormantError::NotFound(_)));
    }
}
