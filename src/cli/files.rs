use clasifica::discovery::discover_inputs;
use clasifica::error::Result;

use super::SourceArgs;

pub fn list(source: &SourceArgs) -> Result<()> {
    let dir = source.settings().input_dir();
    let files = discover_inputs(&dir)?;
    if files.is_empty() {
        println!("No statement files in {}", dir.display());
        return Ok(());
    }
    for file in &files {
        println!("{}", file.display());
    }
    Ok(())
}
