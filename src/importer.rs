use std::io::Read;
use std::path::Path;

use tracing::{debug, info};

use crate::categorizer::classify;
use crate::error::ClasificaError;
use crate::models::{
    CategoryRule, FileOutcome, FileResult, SkippedRows, TransactionRecord, DESCRIPTION_FIELD,
    HEADER_PREFIX, RECORD_FIELDS,
};

pub const FIELD_DELIMITER: u8 = b';';

/// Result of reading one statement stream.
#[derive(Debug, Default)]
pub struct ParsedStatement {
    pub records: Vec<TransactionRecord>,
    pub skipped: SkippedRows,
}

// ---------------------------------------------------------------------------
// Row filtering
// ---------------------------------------------------------------------------

enum RowKind {
    Data([String; RECORD_FIELDS]),
    WrongArity(usize),
    BlankFirstField,
    Header,
}

fn inspect_row(record: &csv::ByteRecord) -> RowKind {
    if record.len() != RECORD_FIELDS {
        return RowKind::WrongArity(record.len());
    }
    let fields: [String; RECORD_FIELDS] =
        std::array::from_fn(|i| String::from_utf8_lossy(&record[i]).into_owned());
    if fields[0].is_empty() {
        RowKind::BlankFirstField
    } else if fields[0].starts_with(HEADER_PREFIX) {
        RowKind::Header
    } else {
        RowKind::Data(fields)
    }
}

// ---------------------------------------------------------------------------
// parse_statement
// ---------------------------------------------------------------------------

/// Read `;`-separated statement rows and classify every data row.
/// Unreadable rows are counted and skipped, never reported as errors.
pub fn parse_statement<R: Read>(reader: R, rules: &[CategoryRule]) -> ParsedStatement {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(FIELD_DELIMITER)
        .from_reader(reader);
    let mut parsed = ParsedStatement::default();
    let mut line = 0usize;

    for result in rdr.byte_records() {
        line += 1;
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                debug!(line, error = %e, "malformed row skipped");
                parsed.skipped.malformed += 1;
                // A read error from the underlying stream will not go away.
                if e.is_io_error() {
                    break;
                }
                continue;
            }
        };
        match inspect_row(&record) {
            RowKind::Data(fields) => {
                let category = classify(&fields[DESCRIPTION_FIELD], rules).to_string();
                parsed.records.push(TransactionRecord { fields, category });
            }
            RowKind::WrongArity(n) => {
                debug!(line, columns = n, "row with wrong column count skipped");
                parsed.skipped.wrong_arity += 1;
            }
            RowKind::BlankFirstField => parsed.skipped.blank_first_field += 1,
            RowKind::Header => parsed.skipped.header += 1,
        }
    }
    parsed
}

// ---------------------------------------------------------------------------
// process_file
// ---------------------------------------------------------------------------

/// Worker body: one statement file in, exactly one `FileResult` out.
pub fn process_file(index: usize, path: &Path, rules: &[CategoryRule]) -> FileResult {
    let outcome = match std::fs::File::open(path) {
        Err(source) => FileOutcome::Failed(ClasificaError::FileOpenFailed {
            path: path.to_path_buf(),
            source,
        }),
        Ok(file) => {
            let parsed = parse_statement(std::io::BufReader::new(file), rules);
            info!(
                path = %path.display(),
                records = parsed.records.len(),
                skipped = parsed.skipped.total(),
                "statement processed"
            );
            FileOutcome::Parsed {
                records: parsed.records,
                skipped: parsed.skipped,
            }
        }
    };
    FileResult {
        index,
        path: path.to_path_buf(),
        outcome,
    }
}
