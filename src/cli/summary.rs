use chrono::NaiveDate;
use colored::Colorize;
use comfy_table::{Cell, Table};

use clasifica::error::Result;
use clasifica::fmt::euros;
use clasifica::pipeline::{aggregate, statement_files};
use clasifica::rules::load_rules;
use clasifica::summary::{parse_date, summarize, SummaryFilter};

use super::SourceArgs;

/// clap value parser for `--from` / `--to`.
pub fn parse_day(raw: &str) -> std::result::Result<NaiveDate, String> {
    parse_date(raw).ok_or_else(|| format!("'{raw}' is not a date (use dd/mm/yyyy)"))
}

pub fn run(source: &SourceArgs, filter: &SummaryFilter) -> Result<()> {
    let config = source.settings().run_config();
    let rules = load_rules(&config.rules_path)?;
    let inputs = statement_files(&config)?;
    let merged = aggregate(&inputs, &rules, config.order);
    for failure in &merged.failures {
        println!("{} {}", "failed:".red().bold(), failure.error);
    }

    let summary = summarize(&merged.records, filter);

    let mut totals = Table::new();
    totals.set_header(vec!["", "Amount"]);
    totals.add_row(vec![Cell::new("Income".green().bold()), Cell::new(euros(summary.income))]);
    totals.add_row(vec![Cell::new("Expenses".red().bold()), Cell::new(euros(summary.expenses))]);
    let net_label = if summary.net >= 0.0 {
        "Net".green().bold()
    } else {
        "Net".red().bold()
    };
    totals.add_row(vec![Cell::new(net_label), Cell::new(euros(summary.net))]);
    totals.add_row(vec![
        Cell::new("Savings rate"),
        Cell::new(format!("{:.1}%", summary.savings_rate)),
    ]);
    println!("Summary\n{totals}");

    let mut table = Table::new();
    table.set_header(vec!["Category", "Amount", "%", "Count"]);
    for item in &summary.expenses_by_category {
        let name = if item.category.is_empty() {
            "(uncategorized)"
        } else {
            item.category.as_str()
        };
        table.add_row(vec![
            Cell::new(name),
            Cell::new(euros(item.total)),
            Cell::new(format!("{:.1}%", item.pct)),
            Cell::new(item.count),
        ]);
    }
    table.add_row(vec![
        Cell::new("Total".bold()),
        Cell::new(euros(summary.expenses)),
        Cell::new(""),
        Cell::new(""),
    ]);
    println!("\nExpense Breakdown\n{table}");

    let years: Vec<String> = summary.years.iter().map(|y| y.to_string()).collect();
    println!(
        "{} transactions from {} files; years present: {}",
        summary.transactions,
        merged.files.len(),
        if years.is_empty() { "none".to_string() } else { years.join(", ") }
    );
    if summary.undated > 0 {
        println!("{} records without a readable date were left out", summary.undated);
    }
    Ok(())
}
