//! Schema unification of job records into a table

use crate::record::{JobRecord, JOB_ID, JOB_NAME};
use std::collections::BTreeSet;

/// Rows sharing one column set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Dataset {
    /// Unifies `records` into one table
    ///
    /// The columns are `Job ID`, `Job Name`, then every other field name seen
    /// in any record, sorted. Records lacking a field get an empty cell.
    /// Row order follows `records`.
    pub fn assemble(records: &[JobRecord]) -> Self {
        let others: BTreeSet<&str> = records
            .iter()
            .flat_map(JobRecord::field_names)
            .filter(|name| *name != JOB_ID && *name != JOB_NAME)
            .collect();

        let columns: Vec<String> = [JOB_ID, JOB_NAME]
            .into_iter()
            .chain(others)
            .map(str::to_string)
            .collect();

        let rows = records
            .iter()
            .map(|record| {
                columns
                    .iter()
                    .map(|column| record.get(column).unwrap_or_default().to_string())
                    .collect()
            })
            .collect();

        Self { columns, rows }
    }

    /// Builds a dataset from already tabular data
    pub fn from_parts(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut [Vec<String>] {
        &mut self.rows
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
