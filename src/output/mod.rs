//! Output module for persisting harvested jobs
//!
//! This module handles:
//! - Unifying job records into one table
//! - Writing CSV files and stripping their empty rows
//! - Producing a translated copy of the table

mod csv_output;
mod dataset;
mod traits;
pub mod translate;

pub use csv_output::{read_dataset, strip_empty_rows, write_dataset, CsvFileSink};
pub use dataset::Dataset;
pub use traits::{DatasetSink, OutputError, OutputResult};
pub use translate::{translate_dataset, GoogleTranslator, TranslateError, Translator};

use crate::record::JobRecord;

/// Writes the job table and, when a translator is given, its translated copy
///
/// # Arguments
///
/// * `records` - All extracted records, in output order
/// * `sink` - Destination of the original table
/// * `translated` - Translator, target language and destination of the copy
///
/// # Returns
///
/// The unified dataset that was written to `sink`
pub async fn write_outputs<S, T>(
    records: &[JobRecord],
    sink: &S,
    translated: Option<(&T, &str, &S)>,
) -> OutputResult<Dataset>
where
    S: DatasetSink + ?Sized,
    T: Translator + ?Sized,
{
    let dataset = Dataset::assemble(records);
    tracing::info!(
        "Writing {} rows with {} columns",
        dataset.len(),
        dataset.columns().len()
    );
    sink.write(&dataset)?;

    if let Some((translator, target, translated_sink)) = translated {
        let translated = translate_dataset(&dataset, translator, target).await;
        translated_sink.write(&translated)?;
        tracing::info!("Translation complete");
    }

    Ok(dataset)
}
