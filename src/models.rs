use std::path::PathBuf;

use crate::error::ClasificaError;

/// Number of source columns in a statement row.
pub const RECORD_FIELDS: usize = 8;

/// Column holding the transaction description.
pub const DESCRIPTION_FIELD: usize = 2;

/// Rows whose first field starts with this are header rows, wherever they appear.
pub const HEADER_PREFIX: &str = "Fecha";

/// Keyword → category pair. Both sides are stored lowercase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRule {
    pub keyword: String,
    pub category: String,
}

impl CategoryRule {
    pub fn new(keyword: &str, category: &str) -> Self {
        Self {
            keyword: keyword.to_lowercase(),
            category: category.to_lowercase(),
        }
    }
}

/// One statement row plus the category assigned to it (empty when nothing matched).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    pub fields: [String; RECORD_FIELDS],
    pub category: String,
}

impl TransactionRecord {
    pub fn description(&self) -> &str {
        &self.fields[DESCRIPTION_FIELD]
    }

    pub fn is_uncategorized(&self) -> bool {
        self.category.is_empty()
    }

    /// The 9-column output row: source fields followed by the category.
    pub fn into_row(self) -> Vec<String> {
        let mut row: Vec<String> = self.fields.into();
        row.push(self.category);
        row
    }
}

/// Rows dropped while reading one statement, by reason.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SkippedRows {
    pub malformed: usize,
    pub wrong_arity: usize,
    pub blank_first_field: usize,
    pub header: usize,
}

impl SkippedRows {
    pub fn total(&self) -> usize {
        self.malformed + self.wrong_arity + self.blank_first_field + self.header
    }
}

#[derive(Debug)]
pub enum FileOutcome {
    Parsed {
        records: Vec<TransactionRecord>,
        skipped: SkippedRows,
    },
    Failed(ClasificaError),
}

/// What a worker reports for one input file. Produced exactly once per file.
#[derive(Debug)]
pub struct FileResult {
    /// Position of the file in discovery order.
    pub index: usize,
    pub path: PathBuf,
    pub outcome: FileOutcome,
}
