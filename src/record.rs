//! Job identifiers and extracted job records

use indexmap::IndexMap;
use std::fmt;

/// Column holding the job identifier
pub const JOB_ID: &str = "Job ID";
/// Column holding the job title
pub const JOB_NAME: &str = "Job Name";
/// Column holding the hiring company
pub const COMPANY_NAME: &str = "Company Name";
/// Column holding the normalized posting date
pub const DATE: &str = "Date";

/// Opaque token naming one listing on the source site
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for JobId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Field name to value mapping for one job
///
/// Always carries `Job ID` and `Job Name`; every other field is whatever the
/// detail page offered, kept in discovery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRecord {
    fields: IndexMap<String, String>,
}

impl JobRecord {
    /// Creates a record holding only the mandatory fields
    pub fn new(id: &JobId, name: impl Into<String>) -> Self {
        let mut fields = IndexMap::new();
        fields.insert(JOB_ID.to_string(), id.as_str().to_string());
        fields.insert(JOB_NAME.to_string(), name.into());
        Self { fields }
    }

    /// Sets a field, replacing any earlier value under the same name
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn id(&self) -> JobId {
        JobId::new(self.get(JOB_ID).unwrap_or_default())
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
