//! In-memory stand-in for the relational source.

use batch_replicator::{Block, Result, SizedRow};
use std::collections::BTreeMap;

/// A source row: identifier plus a nullable text column.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRow {
    pub id: u64,
    pub name: Option<String>,
}

impl SizedRow for SourceRow {
    fn size(&self) -> u64 {
        8 + self.name.as_ref().map_or(0, |n| n.len() as u64)
    }
}

/// Identifier-ordered rows.
#[derive(Default)]
pub struct MockSource {
    rows: BTreeMap<u64, SourceRow>,
}

impl MockSource {
    /// Rows `1..=count`, every third one with a NULL name.
    pub fn with_rows(count: u64) -> Self {
        let rows = (1..=count)
            .map(|id| {
                let name = if id % 3 == 0 {
                    None
                } else {
                    Some(format!("row-{}", id))
                };
                (id, SourceRow { id, name })
            })
            .collect();
        Self { rows }
    }

    pub fn max_id(&self) -> Option<u64> {
        self.rows.keys().next_back().copied()
    }

    /// Rows covered by `block`. Stubs yield nothing.
    pub fn fetch(&self, block: &impl Block) -> Result<Vec<SourceRow>> {
        if block.is_stub() {
            return Ok(Vec::new());
        }
        let (start, end) = block.bounds()?;
        Ok(self.rows.range(start..=end).map(|(_, r)| r.clone()).collect())
    }
}
