//! Tabular inputs for the adoption engine.
//!
//! Sources only hand back a header row plus raw cells; column resolution and every
//! interpretation of the values happens in [`crate::pipeline`].

mod cell;
mod csv;
pub mod schema;

pub use self::csv::{read_tabular, CsvSource};
pub use cell::CellValue;
pub use schema::{resolve_columns, ColumnMap, SchemaError};

use serde::Serialize;
use std::collections::HashMap;

/// The two record kinds the engine consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Applications,
    InterviewLog,
}

impl SourceKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Applications => "applications",
            Self::InterviewLog => "interview log",
        }
    }
}

/// Header row plus data rows exactly as a source yielded them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TabularData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl TabularData {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self { headers, rows }
    }
}

/// Anything that can hand the engine a snapshot of a named source.
pub trait TabularSource {
    fn fetch(&self, kind: SourceKind) -> Result<TabularData, SourceError>;
}

/// Error raised while acquiring a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to read {kind} source: {source}")]
    Io {
        kind: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid CSV data: {0}")]
    Csv(#[from] ::csv::Error),
    #[error("no data configured for the {0} source")]
    Unavailable(&'static str),
}

/// Snapshot held in memory, mostly useful for hosts that already loaded their rows.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    tables: HashMap<SourceKind, TabularData>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, kind: SourceKind, data: TabularData) -> Self {
        self.tables.insert(kind, data);
        self
    }
}

impl TabularSource for InMemorySource {
    fn fetch(&self, kind: SourceKind) -> Result<TabularData, SourceError> {
        self.tables
            .get(&kind)
            .cloned()
            .ok_or(SourceError::Unavailable(kind.label()))
    }
}
