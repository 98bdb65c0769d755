//! CSV persistence of datasets
//!
//! Files are UTF-8 with a byte-order mark so spreadsheet tools detect the
//! encoding of Arabic text correctly.

use crate::output::dataset::Dataset;
use crate::output::traits::{DatasetSink, OutputResult};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Sink writing a CSV file and stripping its empty rows afterwards
#[derive(Debug, Clone)]
pub struct CsvFileSink {
    path: PathBuf,
}

impl CsvFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DatasetSink for CsvFileSink {
    fn write(&self, dataset: &Dataset) -> OutputResult<()> {
        write_dataset(dataset, &self.path)?;
        strip_empty_rows(&self.path)?;
        tracing::info!(
            "Data has been successfully saved to '{}'",
            self.path.display()
        );
        Ok(())
    }
}

/// Writes `dataset` with a header row to `path`, replacing any existing file
pub fn write_dataset(dataset: &Dataset, path: &Path) -> OutputResult<()> {
    let mut rows = Vec::with_capacity(dataset.len() + 1);
    rows.push(dataset.columns().to_vec());
    rows.extend(dataset.rows().iter().cloned());
    write_rows(&rows, path)
}

/// Reads a CSV file written by [`write_dataset`]
pub fn read_dataset(path: &Path) -> OutputResult<Dataset> {
    let mut rows = read_rows(path)?.into_iter();
    let columns = rows.next().unwrap_or_default();
    Ok(Dataset::from_parts(columns, rows.collect()))
}

/// Removes every row whose cells are all empty after trimming
///
/// Returns the number of rows removed.
pub fn strip_empty_rows(path: &Path) -> OutputResult<usize> {
    let rows = read_rows(path)?;
    let before = rows.len();

    let kept: Vec<Vec<String>> = rows
        .into_iter()
        .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
        .collect();

    let removed = before - kept.len();
    write_rows(&kept, path)?;

    if removed > 0 {
        tracing::info!("Removed {} empty rows from {}", removed, path.display());
    }
    Ok(removed)
}

fn write_rows(rows: &[Vec<String>], path: &Path) -> OutputResult<()> {
    let mut file = File::create(path)?;
    file.write_all(UTF8_BOM)?;

    let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(file);
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn read_rows(path: &Path) -> OutputResult<Vec<Vec<String>>> {
    let content = std::fs::read(path)?;
    let content = content.strip_prefix(UTF8_BOM).unwrap_or(&content);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}
