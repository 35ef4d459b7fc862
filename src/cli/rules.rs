use comfy_table::{Cell, Table};

use clasifica::error::Result;
use clasifica::rules::load_rules;

use super::SourceArgs;

pub fn list(source: &SourceArgs) -> Result<()> {
    let path = source.settings().rules_path();
    let rules = load_rules(&path)?;

    let mut table = Table::new();
    table.set_header(vec!["#", "Keyword", "Category"]);
    for (i, rule) in rules.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&rule.keyword),
            Cell::new(&rule.category),
        ]);
    }
    println!("Rules ({})\n{table}", path.display());
    Ok(())
}
