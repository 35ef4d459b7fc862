use clasifica::categorizer::classify;
use clasifica::error::Result;
use clasifica::rules::load_rules;

use super::SourceArgs;

pub fn run(description: &str, source: &SourceArgs) -> Result<()> {
    let rules = load_rules(&source.settings().rules_path())?;
    match classify(description, &rules) {
        "" => println!("(uncategorized)"),
        category => println!("{category}"),
    }
    Ok(())
}
