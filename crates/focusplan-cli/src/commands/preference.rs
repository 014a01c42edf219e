use std::path::PathBuf;

use clap::Subcommand;
use focusplan_core::validation::validate_preference;
use focusplan_core::{Config, UserPreference};

use super::input::read_input;

#[derive(Subcommand)]
pub enum PreferenceAction {
    /// Print the configured default preference as JSON
    Show,
    /// Describe a preference in one sentence
    Summary {
        /// Preference JSON file ("-" for stdin); the configured default when omitted
        file: Option<PathBuf>,
    },
}

pub fn run(action: PreferenceAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        PreferenceAction::Show => {
            let config = Config::load()?;
            println!("{}", serde_json::to_string_pretty(&config.preference)?);
        }
        PreferenceAction::Summary { file } => {
            let preference = match file {
                Some(path) => {
                    let raw = read_input(Some(&path))?;
                    let preference: UserPreference = serde_json::from_str(&raw)
                        .map_err(|e| format!("invalid preference: {e}"))?;
                    validate_preference(&preference)?;
                    preference
                }
                None => Config::load()?.preference,
            };
            println!("{}", preference.summary());
        }
    }
    Ok(())
}
