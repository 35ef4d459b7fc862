use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ClasificaError, Result};
use crate::models::TransactionRecord;

/// Column titles of the consolidated table.
pub const HEADER: [&str; 9] = [
    "Fecha contable",
    "Fecha valor",
    "Concepto",
    "Importe",
    "Moneda",
    "Saldo",
    "Moneda",
    "Concepto ampliado",
    "Categoria",
];

pub const OUTPUT_PREFIX: &str = "csv_procesado_";

pub const SHEET_NAME: &str = "Datos";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Xlsx,
    Csv,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Csv => "csv",
        }
    }
}

// ---------------------------------------------------------------------------
// OutputTable
// ---------------------------------------------------------------------------

/// Header row followed by one 9-column row per record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTable {
    rows: Vec<Vec<String>>,
}

impl OutputTable {
    pub fn assemble(records: Vec<TransactionRecord>) -> Self {
        let mut rows = Vec::with_capacity(records.len() + 1);
        rows.push(HEADER.iter().map(|h| h.to_string()).collect());
        rows.extend(records.into_iter().map(TransactionRecord::into_row));
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of rows below the header.
    pub fn data_len(&self) -> usize {
        self.rows.len() - 1
    }
}

// ---------------------------------------------------------------------------
// Sinks
// ---------------------------------------------------------------------------

/// Persists a finished table at a given path.
pub trait TableSink {
    fn format(&self) -> OutputFormat;
    fn write_table(&self, path: &Path, table: &OutputTable) -> Result<()>;
}

fn write_failed(path: &Path, reason: impl ToString) -> ClasificaError {
    ClasificaError::OutputWriteFailed {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

pub struct XlsxSink;

impl TableSink for XlsxSink {
    fn format(&self) -> OutputFormat {
        OutputFormat::Xlsx
    }

    fn write_table(&self, path: &Path, table: &OutputTable) -> Result<()> {
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name(SHEET_NAME).map_err(|e| write_failed(path, e))?;
        for (r, row) in table.rows().iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                sheet
                    .write_string(r as u32, c as u16, value)
                    .map_err(|e| write_failed(path, e))?;
            }
        }
        workbook.save(path).map_err(|e| write_failed(path, e))
    }
}

pub struct CsvSink;

impl TableSink for CsvSink {
    fn format(&self) -> OutputFormat {
        OutputFormat::Csv
    }

    fn write_table(&self, path: &Path, table: &OutputTable) -> Result<()> {
        let mut wtr = csv::WriterBuilder::new()
            .delimiter(crate::importer::FIELD_DELIMITER)
            .from_path(path)
            .map_err(|e| write_failed(path, e))?;
        for row in table.rows() {
            wtr.write_record(row).map_err(|e| write_failed(path, e))?;
        }
        wtr.flush().map_err(|e| write_failed(path, e))
    }
}

pub fn sink_for(format: OutputFormat) -> Box<dyn TableSink> {
    match format {
        OutputFormat::Xlsx => Box::new(XlsxSink),
        OutputFormat::Csv => Box::new(CsvSink),
    }
}

// ---------------------------------------------------------------------------
// Naming and writing
// ---------------------------------------------------------------------------

/// `csv_procesado_<unix-seconds>.<ext>` in `dir`, with a `_<n>` suffix when
/// that name is already taken.
pub fn output_path(dir: &Path, timestamp: i64, format: OutputFormat) -> PathBuf {
    let ext = format.extension();
    let mut path = dir.join(format!("{OUTPUT_PREFIX}{timestamp}.{ext}"));
    let mut n = 1;
    while path.exists() {
        path = dir.join(format!("{OUTPUT_PREFIX}{timestamp}_{n}.{ext}"));
        n += 1;
    }
    path
}

/// Write `table` under a fresh time-stamped name in `dir`. Returns the path written.
pub fn write_output(dir: &Path, table: &OutputTable, sink: &dyn TableSink) -> Result<PathBuf> {
    let timestamp = chrono::Utc::now().timestamp();
    let path = output_path(dir, timestamp, sink.format());
    sink.write_table(&path, table)?;
    info!(path = %path.display(), rows = table.data_len(), "output written");
    Ok(path)
}
