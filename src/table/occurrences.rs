use crate::foundation::core::{TARGET_COUNT, Target};
use crate::foundation::error::{GlyphreelError, GlyphreelResult};

/// Hand-counted occurrences of each target on each worksheet page.
///
/// Row = source page (0-based), column = [`Target::index`].
pub const WORKSHEET_COUNTS: [[u32; TARGET_COUNT]; 39] = [
    [1, 0, 0, 2],
    [3, 0, 0, 4],
    [2, 2, 0, 1],
    [1, 0, 0, 2],
    [0, 3, 0, 1],
    [1, 1, 0, 2],
    [1, 1, 1, 2],
    [1, 0, 0, 1],
    [1, 2, 0, 0],
    [0, 1, 0, 0],
    [0, 3, 0, 2],
    [0, 2, 0, 0],
    [1, 0, 3, 1],
    [1, 0, 1, 0],
    [0, 1, 0, 2],
    [1, 0, 0, 0],
    [1, 0, 1, 0],
    [2, 0, 0, 0],
    [2, 5, 0, 1],
    [1, 1, 0, 1],
    [2, 1, 0, 0],
    [0, 0, 0, 0],
    [1, 0, 0, 2],
    [0, 1, 0, 2],
    [2, 0, 0, 0],
    [3, 0, 1, 1],
    [4, 0, 0, 1],
    [3, 1, 0, 2],
    [3, 1, 0, 2],
    [4, 0, 0, 4],
    [1, 1, 0, 0],
    [1, 2, 0, 0],
    [2, 1, 0, 3],
    [3, 2, 0, 1],
    [2, 2, 0, 1],
    [1, 2, 2, 5],
    [5, 1, 7, 3],
    [3, 0, 0, 0],
    [4, 11, 1, 2],
];

/// A single counted glyph: the `index`-th instance of a target on source page `page`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Occurrence {
    pub page: usize,
    pub index: u32,
}

/// Per-target occurrence totals, in table-column order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct OccurrenceTotals {
    pub wo: u32,
    pub shi: u32,
    pub hen: u32,
    pub ni: u32,
}

impl OccurrenceTotals {
    pub fn get(&self, target: Target) -> u32 {
        match target {
            Target::Wo => self.wo,
            Target::Shi => self.shi,
            Target::Hen => self.hen,
            Target::Ni => self.ni,
        }
    }
}

/// Immutable page-by-target count table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OccurrenceTable {
    rows: Vec<[u32; TARGET_COUNT]>,
}

impl OccurrenceTable {
    /// The table for `counting-wo-shi-hen-ni.pdf`.
    pub fn worksheet() -> Self {
        Self {
            rows: WORKSHEET_COUNTS.to_vec(),
        }
    }

    pub fn from_rows(rows: Vec<[u32; TARGET_COUNT]>) -> GlyphreelResult<Self> {
        if rows.is_empty() {
            return Err(GlyphreelError::validation(
                "occurrence table must have at least one page row",
            ));
        }
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[[u32; TARGET_COUNT]] {
        &self.rows
    }

    /// Number of source pages the table describes.
    pub fn page_count(&self) -> usize {
        self.rows.len()
    }

    /// Index of the last described page; the "shi" overflow rule keys off this page.
    pub fn last_page(&self) -> usize {
        self.rows.len() - 1
    }

    pub fn count(&self, page: usize, target: Target) -> u32 {
        self.rows
            .get(page)
            .map(|row| row[target.index()])
            .unwrap_or(0)
    }

    pub fn total(&self, target: Target) -> u32 {
        self.rows.iter().map(|row| row[target.index()]).sum()
    }

    pub fn totals(&self) -> OccurrenceTotals {
        OccurrenceTotals {
            wo: self.total(Target::Wo),
            shi: self.total(Target::Shi),
            hen: self.total(Target::Hen),
            ni: self.total(Target::Ni),
        }
    }

    /// Every occurrence of `target`, ordered by page and then by index within the page.
    pub fn occurrences(&self, target: Target) -> Vec<Occurrence> {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(page, row)| {
                (0..row[target.index()]).map(move |index| Occurrence { page, index })
            })
            .collect()
    }
}

impl Default for OccurrenceTable {
    fn default() -> Self {
        Self::worksheet()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/table/occurrences.rs"]
mod tests;
