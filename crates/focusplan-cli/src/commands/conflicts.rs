use std::path::PathBuf;

use focusplan_core::validation::{validate_event, validate_task};

use super::input::read_request;

/// Print every conflict between the request's fixed tasks and events.
pub fn run(file: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let request = read_request(file)?;
    for (index, task) in request.tasks.iter().enumerate() {
        validate_task(index, task)?;
    }
    for (index, event) in request.existing_events.iter().enumerate() {
        validate_event(index, event)?;
    }

    let conflicts = focusplan_core::find_all_conflicts(&request.tasks, &request.existing_events);
    tracing::debug!(target: "focusplan::conflicts", count = conflicts.len(), "conflict scan finished");
    println!("{}", serde_json::to_string_pretty(&conflicts)?);
    Ok(())
}
