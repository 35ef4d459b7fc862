//! Fan-out of one worker per statement file and fan-in of their results.
//!
//! Blocks from different files land in the order the workers finish, which
//! varies between runs. Records inside a block keep their file order. Pass
//! [`BlockOrder::Discovery`] to get the same order every run.

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;

use tracing::{info, warn};

use crate::discovery::discover_inputs;
use crate::error::{ClasificaError, Result};
use crate::importer::process_file;
use crate::models::{CategoryRule, FileOutcome, FileResult, SkippedRows, TransactionRecord};
use crate::output::{write_output, OutputTable, TableSink};
use crate::rules::load_rules;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockOrder {
    /// Whichever file finishes first comes first.
    #[default]
    Completion,
    /// Re-sorted into discovery order after collection.
    Discovery,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSummary {
    pub path: PathBuf,
    pub records: usize,
    pub skipped: SkippedRows,
}

#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: ClasificaError,
}

/// Everything the workers produced, merged.
#[derive(Debug, Default)]
pub struct Aggregate {
    pub records: Vec<TransactionRecord>,
    /// Successful files, in the order their blocks appear in `records`.
    pub files: Vec<FileSummary>,
    pub failures: Vec<FileFailure>,
}

// ---------------------------------------------------------------------------
// aggregate
// ---------------------------------------------------------------------------

fn collect(results: mpsc::Receiver<FileResult>, expected: usize, order: BlockOrder) -> Aggregate {
    let mut blocks: Vec<(usize, FileSummary, Vec<TransactionRecord>)> = Vec::with_capacity(expected);
    let mut failures = Vec::new();
    let mut received = 0usize;

    // Ends once every worker has dropped its sender.
    for result in results {
        received += 1;
        match result.outcome {
            FileOutcome::Failed(error) => {
                warn!(path = %result.path.display(), %error, "statement skipped");
                failures.push(FileFailure {
                    path: result.path,
                    error,
                });
            }
            FileOutcome::Parsed { records, skipped } => {
                let summary = FileSummary {
                    path: result.path,
                    records: records.len(),
                    skipped,
                };
                blocks.push((result.index, summary, records));
            }
        }
    }
    debug_assert_eq!(received, expected, "a worker exited without reporting");

    if order == BlockOrder::Discovery {
        blocks.sort_by_key(|(index, _, _)| *index);
    }

    let mut aggregate = Aggregate {
        failures,
        ..Aggregate::default()
    };
    for (_, summary, records) in blocks {
        aggregate.files.push(summary);
        aggregate.records.extend(records);
    }
    aggregate
}

/// Run one worker thread per file against the shared, read-only rule table and
/// merge their results. A file that cannot be opened is reported in
/// `failures` and never stops the others.
pub fn aggregate(files: &[PathBuf], rules: &[CategoryRule], order: BlockOrder) -> Aggregate {
    let (tx, rx) = mpsc::channel();
    thread::scope(|scope| {
        for (index, path) in files.iter().enumerate() {
            let tx = tx.clone();
            scope.spawn(move || {
                // The receiver lives until the scope ends, so this cannot fail.
                let _ = tx.send(process_file(index, path, rules));
            });
        }
        drop(tx);
        collect(rx, files.len(), order)
    })
}

// ---------------------------------------------------------------------------
// run
// ---------------------------------------------------------------------------

/// Fully resolved inputs for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub input_dir: PathBuf,
    pub rules_path: PathBuf,
    pub output_dir: PathBuf,
    pub order: BlockOrder,
}

#[derive(Debug)]
pub struct RunReport {
    pub rule_count: usize,
    pub discovered: usize,
    pub files: Vec<FileSummary>,
    pub failures: Vec<FileFailure>,
    pub records: usize,
    pub uncategorized: usize,
    pub output: PathBuf,
}

/// Statements in the input directory, minus the rule table when a csv one
/// is kept next to them.
pub fn statement_files(config: &RunConfig) -> Result<Vec<PathBuf>> {
    let rules_file = std::fs::canonicalize(&config.rules_path).ok();
    Ok(discover_inputs(&config.input_dir)?
        .into_iter()
        .filter(|p| rules_file.is_none() || std::fs::canonicalize(p).ok() != rules_file)
        .collect())
}

/// Load rules, process every statement in the input directory and write the
/// consolidated table through `sink`.
pub fn run(config: &RunConfig, sink: &dyn TableSink) -> Result<RunReport> {
    let rules = load_rules(&config.rules_path)?;
    let inputs = statement_files(config)?;
    run_files(&inputs, &rules, config.order, &config.output_dir, sink)
}

/// Same as [`run`] for an explicit rule table and file list.
pub fn run_files(
    inputs: &[PathBuf],
    rules: &[CategoryRule],
    order: BlockOrder,
    output_dir: &Path,
    sink: &dyn TableSink,
) -> Result<RunReport> {
    let merged = aggregate(inputs, rules, order);
    let records = merged.records.len();
    let uncategorized = merged.records.iter().filter(|r| r.is_uncategorized()).count();
    info!(
        files = inputs.len(),
        failed = merged.failures.len(),
        records,
        uncategorized,
        "statements merged"
    );

    let table = OutputTable::assemble(merged.records);
    let output = write_output(output_dir, &table, sink)?;

    Ok(RunReport {
        rule_count: rules.len(),
        discovered: inputs.len(),
        files: merged.files,
        failures: merged.failures,
        records,
        uncategorized,
        output,
    })
}
