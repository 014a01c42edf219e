use std::path::PathBuf;

use clap::Args;
use focusplan_core::intake::{parse_preference_response, parse_task_response};
use serde_json::json;

use super::input::{now, parse_instant, read_input};

#[derive(Args)]
pub struct IntakeArgs {
    /// File holding the translator's raw reply (stdin when omitted or "-")
    pub file: Option<PathBuf>,
    /// Reference time for relative dates (YYYY-MM-DD[THH:MM])
    #[arg(long, value_parser = parse_instant)]
    pub now: Option<chrono::NaiveDateTime>,
    /// Treat the reply as a preference description instead of a task
    #[arg(long)]
    pub preference: bool,
}

pub fn run(args: IntakeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let raw = read_input(args.file.as_deref())?;

    if args.preference {
        let parsed = parse_preference_response(&raw)?;
        let out = json!({
            "preference": parsed.preference,
            "preferredFocus": parsed.preferred_focus,
            "summary": parsed.summary(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        let parsed = parse_task_response(&raw, args.now.unwrap_or_else(now))?;
        println!("{}", serde_json::to_string_pretty(&parsed)?);
    }
    Ok(())
}
