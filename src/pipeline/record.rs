use super::status::StatusTier;
use crate::source::{resolve_columns, CellValue, ColumnMap, SchemaError, SourceKind, TabularData};
use std::ops::Deref;
use std::sync::Arc;
use tracing::debug;

/// One source row, readable by column name through a shared resolved schema.
#[derive(Debug, Clone)]
pub struct RawRecord {
    row_number: usize,
    cells: Vec<CellValue>,
    columns: Arc<ColumnMap>,
}

impl RawRecord {
    pub fn new(row_number: usize, cells: Vec<CellValue>, columns: Arc<ColumnMap>) -> Self {
        Self {
            row_number,
            cells,
            columns,
        }
    }

    /// Build a record from ordered `(column, value)` pairs.
    pub fn from_pairs<K, V>(row_number: usize, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<CellValue>,
    {
        let (headers, cells): (Vec<String>, Vec<CellValue>) = pairs
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .unzip();
        let names: Vec<&str> = headers.iter().map(String::as_str).collect();
        let columns = resolve_columns("record", &headers, &[], &names).unwrap_or_default();
        Self::new(row_number, cells, Arc::new(columns))
    }

    /// 1-based spreadsheet row, counting the header as row 1.
    pub fn row_number(&self) -> usize {
        self.row_number
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.columns
            .index_of(column)
            .and_then(|index| self.cells.get(index))
    }

    pub fn text(&self, column: &str) -> Option<String> {
        self.get(column).and_then(CellValue::as_text)
    }

    pub fn number(&self, column: &str) -> Option<f64> {
        self.get(column).and_then(CellValue::as_number)
    }
}

impl AsRef<RawRecord> for RawRecord {
    fn as_ref(&self) -> &RawRecord {
        self
    }
}

/// Schema-resolved rows of one source.
#[derive(Debug, Clone)]
pub struct Table {
    pub kind: SourceKind,
    pub columns: Arc<ColumnMap>,
    pub records: Vec<RawRecord>,
    /// Rows too short to hold every required column.
    pub short_rows: usize,
}

impl Table {
    /// Resolve the schema once, then wrap each row. Fails only on missing required columns.
    pub fn from_data(
        kind: SourceKind,
        data: TabularData,
        required: &[&str],
        optional: &[&str],
    ) -> Result<Self, SchemaError> {
        let columns = Arc::new(resolve_columns(
            kind.label(),
            &data.headers,
            required,
            optional,
        )?);
        let span = columns.required_span();

        let mut records = Vec::with_capacity(data.rows.len());
        let mut short_rows = 0;
        for (offset, cells) in data.rows.into_iter().enumerate() {
            let row_number = offset + 2;
            if cells.len() < span {
                debug!(source = kind.label(), row_number, "skipping short row");
                short_rows += 1;
                continue;
            }
            records.push(RawRecord::new(row_number, cells, columns.clone()));
        }

        Ok(Self {
            kind,
            columns,
            records,
            short_rows,
        })
    }
}

/// The record retained for a composite key after deduplication.
#[derive(Debug, Clone)]
pub struct CanonicalRecord {
    record: RawRecord,
    key: RecordKey,
    tier: StatusTier,
}

impl CanonicalRecord {
    pub(crate) fn new(record: RawRecord, key: RecordKey, tier: StatusTier) -> Self {
        Self { record, key, tier }
    }

    pub fn key(&self) -> &RecordKey {
        &self.key
    }

    pub fn tier(&self) -> StatusTier {
        self.tier
    }
}

impl Deref for CanonicalRecord {
    type Target = RawRecord;

    fn deref(&self) -> &Self::Target {
        &self.record
    }
}

impl AsRef<RawRecord> for CanonicalRecord {
    fn as_ref(&self) -> &RawRecord {
        &self.record
    }
}

/// Candidate/profile id paired with position id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordKey {
    pub subject: String,
    pub position: String,
}
