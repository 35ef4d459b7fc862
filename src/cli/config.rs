use clasifica::error::{ClasificaError, Result};
use clasifica::settings::{save_settings, settings_path};

use super::SettingsArgs;

pub fn run(args: &SettingsArgs, save: bool) -> Result<()> {
    let settings = args.settings();
    if save {
        save_settings(&settings)?;
        println!("Saved {}", settings_path().display());
        return Ok(());
    }
    let json = serde_json::to_string_pretty(&settings)
        .map_err(|e| ClasificaError::Settings(e.to_string()))?;
    println!("{json}");
    Ok(())
}
