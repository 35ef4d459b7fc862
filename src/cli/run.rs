use std::io::Write;

use colored::Colorize;
use comfy_table::{Cell, Table};

use clasifica::error::Result;
use clasifica::output::sink_for;
use clasifica::pipeline::{self, RunConfig, RunReport};

use super::RunArgs;

fn print_banner(config: &RunConfig) {
    println!("{}", "CLASIFICA: bank statement categorizer".bold());
    println!();
    println!("Statements : {}/*.csv", config.input_dir.display());
    println!("Rules      : {}", config.rules_path.display());
    println!("Output     : {}", config.output_dir.display());
    println!();
    println!("The rules table needs a title row, then one keyword and one category per row:");
    let mut example = Table::new();
    example.set_header(vec!["palabra_clave", "categoria"]);
    example.add_row(vec!["Carrefour", "supermercado"]);
    example.add_row(vec!["Decathlon", "ocio"]);
    println!("{example}");
}

pub(crate) fn wait_for_enter(message: &str) {
    print!("\n{message}");
    let _ = std::io::stdout().flush();
    let _ = std::io::stdin().read_line(&mut String::new());
}

fn print_report(report: &RunReport) {
    let mut table = Table::new();
    table.set_header(vec!["File", "Records", "Skipped rows"]);
    for file in &report.files {
        let name = file
            .path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| file.path.display().to_string());
        table.add_row(vec![
            Cell::new(name),
            Cell::new(file.records),
            Cell::new(file.skipped.total()),
        ]);
    }
    println!("{table}");

    for failure in &report.failures {
        println!("{} {}", "failed:".red().bold(), failure.error);
    }

    println!(
        "{} files, {} records ({} uncategorized), {} rules",
        report.discovered, report.records, report.uncategorized, report.rule_count
    );
    println!("{} {}", "Wrote".green().bold(), report.output.display());
}

pub const EXIT_PROMPT: &str = "Press Enter to exit...";

/// Interactive runs pause before the window can close, on success and on failure.
pub fn pauses(args: &RunArgs) -> bool {
    !args.yes
}

pub fn run(args: &RunArgs) -> Result<()> {
    let settings = args.settings.settings();
    let config = settings.run_config();

    if pauses(args) {
        print_banner(&config);
        wait_for_enter("Press Enter to start...");
    }

    let sink = sink_for(settings.output_format);
    let report = pipeline::run(&config, sink.as_ref())?;
    print_report(&report);

    if pauses(args) {
        wait_for_enter(EXIT_PROMPT);
    }
    Ok(())
}
