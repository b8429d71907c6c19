//! Dataset rows for a downstream vowel classifier
//!
//! Each [`ExtractionRecord`] becomes one headerless CSV row
//! `phoneme, class_index, f1, ..., fN`, written to one file per corpus split.

use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::corpus::CorpusSplit;
use crate::pipeline::ExtractionRecord;
use crate::Result;

/// One classifier training row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetRow {
    pub phoneme: String,
    pub class_index: usize,
    pub formants: Vec<usize>,
}

impl From<&ExtractionRecord> for DatasetRow {
    fn from(record: &ExtractionRecord) -> Self {
        Self {
            phoneme: record.phoneme.clone(),
            class_index: record.vowel.class_index(),
            formants: record.formants.clone(),
        }
    }
}

impl DatasetRow {
    fn fields(&self) -> Vec<String> {
        let mut fields = Vec::with_capacity(2 + self.formants.len());
        fields.push(self.phoneme.clone());
        fields.push(self.class_index.to_string());
        fields.extend(self.formants.iter().map(|f| f.to_string()));
        fields
    }
}

/// Writes rows to `<out_dir>/<split>_formants.csv`
///
/// Files are created on the first row of their split.
pub struct DatasetWriter {
    out_dir: PathBuf,
    writers: HashMap<CorpusSplit, csv::Writer<File>>,
    rows: usize,
}

impl DatasetWriter {
    /// Create the output directory if needed
    pub fn new<P: AsRef<Path>>(out_dir: P) -> Result<Self> {
        let out_dir = out_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&out_dir)?;
        Ok(Self {
            out_dir,
            writers: HashMap::new(),
            rows: 0,
        })
    }

    /// Path of the file holding `split`
    pub fn path_for(&self, split: CorpusSplit) -> PathBuf {
        self.out_dir.join(format!("{}_formants.csv", split))
    }

    pub fn write_row(&mut self, split: CorpusSplit, row: &DatasetRow) -> Result<()> {
        if !self.writers.contains_key(&split) {
            let writer = csv::WriterBuilder::new()
                .has_headers(false)
                .flexible(true)
                .from_path(self.path_for(split))?;
            self.writers.insert(split, writer);
        }
        if let Some(writer) = self.writers.get_mut(&split) {
            writer.write_record(row.fields())?;
            self.rows += 1;
        }
        Ok(())
    }

    pub fn write_records(&mut self, split: CorpusSplit, records: &[ExtractionRecord]) -> Result<()> {
        for record in records {
            self.write_row(split, &DatasetRow::from(record))?;
        }
        Ok(())
    }

    /// Flush every open file
    pub fn finish(mut self) -> Result<usize> {
        for writer in self.writers.values_mut() {
            writer.flush()?;
        }
        Ok(self.rows)
    }
}
