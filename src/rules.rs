use std::path::Path;

use tracing::{debug, info};

use crate::error::{ClasificaError, Result};
use crate::models::CategoryRule;

// ---------------------------------------------------------------------------
// Row shaping shared by every rule-source format
// ---------------------------------------------------------------------------

/// Turn raw rows into rules. The first row is always treated as column titles.
fn rules_from_rows<I>(rows: I) -> Vec<CategoryRule>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut rules = Vec::new();
    for (idx, mut row) in rows.into_iter().enumerate() {
        if idx == 0 {
            continue;
        }
        // Trailing blank cells are not columns.
        while row.last().is_some_and(|c| c.trim().is_empty()) {
            row.pop();
        }
        if row.len() < 2 {
            debug!(row = idx + 1, "rule row has fewer than 2 columns, skipped");
            continue;
        }
        if row[0].trim().is_empty() {
            debug!(row = idx + 1, "rule row has a blank keyword, skipped");
            continue;
        }
        rules.push(CategoryRule::new(&row[0], &row[1]));
    }
    rules
}

// ---------------------------------------------------------------------------
// Spreadsheet sources (xlsx / xlsm / xls / ods)
// ---------------------------------------------------------------------------

fn cell_text(cell: &calamine::Data) -> String {
    use calamine::Data;
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn read_spreadsheet_rows(path: &Path) -> Result<Vec<Vec<String>>> {
    use calamine::Reader;

    let malformed = |reason: String| ClasificaError::RuleSourceMalformed {
        path: path.to_path_buf(),
        reason,
    };

    // A workbook that cannot be opened at all is treated like a missing one.
    let mut workbook =
        calamine::open_workbook_auto(path).map_err(|e| ClasificaError::RuleSourceUnavailable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| malformed("workbook has no sheets".to_string()))?
        .map_err(|e| malformed(e.to_string()))?;

    // The range starts at the first used cell; pad back to A1 so row and
    // column positions mean the same thing as in the sheet.
    let (start_row, start_col) = range.start().unwrap_or((0, 0));
    let mut rows: Vec<Vec<String>> = (0..start_row).map(|_| Vec::new()).collect();
    for cells in range.rows() {
        let mut row = vec![String::new(); start_col as usize];
        row.extend(cells.iter().map(cell_text));
        rows.push(row);
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Delimited sources
// ---------------------------------------------------------------------------

fn sniff_delimiter(content: &[u8]) -> u8 {
    let first_line = content.split(|b| *b == b'\n').next().unwrap_or_default();
    if first_line.contains(&b';') {
        b';'
    } else {
        b','
    }
}

fn read_delimited_rows(path: &Path) -> Result<Vec<Vec<String>>> {
    let content = std::fs::read(path).map_err(|e| ClasificaError::RuleSourceUnavailable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(sniff_delimiter(&content))
        .from_reader(content.as_slice());

    let mut rows = Vec::new();
    for result in rdr.byte_records() {
        match result {
            Ok(record) => rows.push(
                record
                    .iter()
                    .map(|f| String::from_utf8_lossy(f).into_owned())
                    .collect(),
            ),
            Err(e) if e.is_io_error() => {
                return Err(ClasificaError::RuleSourceMalformed {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                })
            }
            // Still needs a row slot so the title row stays first.
            Err(_) => rows.push(Vec::new()),
        }
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// load_rules
// ---------------------------------------------------------------------------

/// Load the keyword → category table. Order is preserved; the first row is skipped,
/// as are rows with fewer than two columns or a blank keyword.
pub fn load_rules(path: &Path) -> Result<Vec<CategoryRule>> {
    // Surface a missing or unreadable file before any format-specific parsing.
    std::fs::File::open(path).map_err(|e| ClasificaError::RuleSourceUnavailable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_lowercase();
    let rows = match ext.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => read_spreadsheet_rows(path)?,
        "csv" | "txt" => read_delimited_rows(path)?,
        other => {
            return Err(ClasificaError::RuleSourceMalformed {
                path: path.to_path_buf(),
                reason: format!("unsupported rule file type '{other}'"),
            })
        }
    };

    let rules = rules_from_rows(rows);
    info!(path = %path.display(), count = rules.len(), "rules loaded");
    Ok(rules)
}
