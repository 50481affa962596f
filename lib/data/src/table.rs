use crate::error::{DataError, Result};
use ahash::AHashMap;
use csv::ReaderBuilder;
use linkx_core::{RowSource, SourceRow, TupleId};
use std::path::Path;
use tracing::info;

/// An in-memory table of source (or target) rows loaded from CSV.
///
/// Rows keep their file order; lookups by id go through a side map.
#[derive(Debug, Clone, Default)]
pub struct SourceTable {
    rows: Vec<SourceRow>,
    by_id: AHashMap<TupleId, usize>,
}

impl SourceTable {
    /// Load a table from a headed CSV file.
    ///
    /// A column named `id` (case-insensitive) supplies row identifiers;
    /// without one, rows are numbered by file position. Every other column
    /// becomes a named string attribute, in file order.
    pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = ReaderBuilder::new().from_path(path)?;

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        let id_column = headers.iter().position(|h| h.eq_ignore_ascii_case("id"));

        let mut rows = Vec::new();
        for (ordinal, record) in reader.records().enumerate() {
            let record = record?;
            let id = match id_column {
                Some(col) => {
                    let raw = record.get(col).unwrap_or("");
                    raw.trim().parse::<TupleId>().map_err(|_| {
                        DataError::InvalidTable(format!(
                            "row {} of {}: id column is not an integer: {raw:?}",
                            ordinal + 1,
                            path.display()
                        ))
                    })?
                }
                None => ordinal as TupleId,
            };

            let attributes = headers
                .iter()
                .enumerate()
                .filter(|(col, _)| Some(*col) != id_column)
                .map(|(col, name)| {
                    (
                        name.clone(),
                        record.get(col).unwrap_or("").trim().to_string(),
                    )
                })
                .collect();

            rows.push(SourceRow::new(id, attributes));
        }

        let table = Self::from_rows(rows)?;
        info!(
            path = %path.display(),
            rows = table.len(),
            "loaded table"
        );
        Ok(table)
    }

    /// Build a table from rows constructed elsewhere (tests, synthetic data).
    pub fn from_rows(rows: Vec<SourceRow>) -> Result<Self> {
        let mut by_id = AHashMap::with_capacity(rows.len());
        for (index, row) in rows.iter().enumerate() {
            if by_id.insert(row.id, index).is_some() {
                return Err(DataError::InvalidTable(format!(
                    "duplicate row id {}",
                    row.id
                )));
            }
        }
        Ok(Self { rows, by_id })
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn rows(&self) -> &[SourceRow] {
        &self.rows
    }

    /// Row ids in file order.
    #[must_use]
    pub fn ids(&self) -> Vec<TupleId> {
        self.rows.iter().map(|r| r.id).collect()
    }

    #[inline]
    #[must_use]
    pub fn get(&self, tuple_id: TupleId) -> Option<&SourceRow> {
        self.by_id.get(&tuple_id).map(|&index| &self.rows[index])
    }
}

impl RowSource for SourceTable {
    fn row(&self, tuple_id: TupleId) -> Option<&SourceRow> {
        self.get(tuple_id)
    }

    fn row_count(&self) -> usize {
        self.len()
    }
}
