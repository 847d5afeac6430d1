use std::collections::HashMap;

/// Header names resolved to column positions for one tabular source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    indices: HashMap<String, usize>,
    required_span: usize,
}

impl ColumnMap {
    /// Position of a column by its configured name; matching ignores case and spacing.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.indices.get(&normalize_header(name)).copied()
    }

    /// Minimum row width needed to read every required column.
    pub fn required_span(&self) -> usize {
        self.required_span
    }
}

/// Raised when a source is missing required columns; aborts the whole run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{source_name} is missing required column(s): {}", .columns.join(", "))]
pub struct SchemaError {
    pub source_name: String,
    pub columns: Vec<String>,
}

/// Resolve configured column names against a header row.
///
/// Every required name must be present; the error lists all of the missing ones at once.
/// Optional names that are absent are left out of the map. When a header appears more
/// than once the first occurrence wins.
pub fn resolve_columns(
    source_name: &str,
    headers: &[String],
    required: &[&str],
    optional: &[&str],
) -> Result<ColumnMap, SchemaError> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    for (index, header) in headers.iter().enumerate() {
        positions.entry(normalize_header(header)).or_insert(index);
    }

    let mut indices = HashMap::new();
    let mut missing = Vec::new();
    let mut required_span = 0;

    for name in required {
        let key = normalize_header(name);
        match positions.get(&key) {
            Some(&index) => {
                required_span = required_span.max(index + 1);
                indices.insert(key, index);
            }
            None => missing.push((*name).to_string()),
        }
    }

    if !missing.is_empty() {
        return Err(SchemaError {
            source_name: source_name.to_string(),
            columns: missing,
        });
    }

    for name in optional {
        let key = normalize_header(name);
        if let Some(&index) = positions.get(&key) {
            indices.insert(key, index);
        }
    }

    Ok(ColumnMap {
        indices,
        required_span,
    })
}

pub(crate) fn normalize_header(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_ascii_lowercase()
}
