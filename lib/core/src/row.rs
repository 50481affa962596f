use serde::{Deserialize, Serialize};

/// Identifier of a source row. Assigned by the owning row store, opaque to
/// the scoring engine.
pub type TupleId = u64;

/// A record from the source table: named attributes with string content.
///
/// Attributes keep the order they had in the input file so term enumeration
/// (and with it ranking tie-breaks) is deterministic across runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceRow {
    pub id: TupleId,
    pub attributes: Vec<(String, String)>,
}

impl SourceRow {
    #[inline]
    #[must_use]
    pub fn new(id: TupleId, attributes: Vec<(String, String)>) -> Self {
        Self { id, attributes }
    }

    /// Look up an attribute value by name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(attr, _)| attr == name)
            .map(|(_, value)| value.as_str())
    }

    #[inline]
    #[must_use]
    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }
}

/// Read-only access to source rows by id.
///
/// Implemented by the row store the caller owns; the scoring engine never
/// mutates rows and never enumerates the store.
pub trait RowSource: Send + Sync {
    fn row(&self, tuple_id: TupleId) -> Option<&SourceRow>;

    fn row_count(&self) -> usize;
}
