use super::{CellValue, SourceError, SourceKind, TabularData, TabularSource};
use std::io::Read;
use std::path::PathBuf;

/// CSV exports on disk, one file per source kind.
#[derive(Debug, Clone, Default)]
pub struct CsvSource {
    applications: Option<PathBuf>,
    interview_log: Option<PathBuf>,
}

impl CsvSource {
    pub fn new(applications: Option<PathBuf>, interview_log: Option<PathBuf>) -> Self {
        Self {
            applications,
            interview_log,
        }
    }

    fn path_for(&self, kind: SourceKind) -> Option<&PathBuf> {
        match kind {
            SourceKind::Applications => self.applications.as_ref(),
            SourceKind::InterviewLog => self.interview_log.as_ref(),
        }
    }
}

impl TabularSource for CsvSource {
    fn fetch(&self, kind: SourceKind) -> Result<TabularData, SourceError> {
        let path = self
            .path_for(kind)
            .ok_or(SourceError::Unavailable(kind.label()))?;
        let file = std::fs::File::open(path).map_err(|source| SourceError::Io {
            kind: kind.label(),
            source,
        })?;
        read_tabular(file)
    }
}

/// Read a CSV export into raw cells. Rows may be ragged; width checks happen downstream.
pub fn read_tabular<R: Read>(reader: R) -> Result<TabularData, SourceError> {
    let mut csv_reader = ::csv::ReaderBuilder::new()
        .flexible(true)
        .trim(::csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader
        .headers()?
        .iter()
        .map(|header| header.to_string())
        .collect();

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        rows.push(record.iter().map(CellValue::from).collect());
    }

    Ok(TabularData { headers, rows })
}
