use std::path::PathBuf;

use clap::Args;
use focusplan_core::{validate_request, Config, PriorityPolicy};

use super::input::{now, parse_instant, read_request};

#[derive(Args)]
pub struct PlanArgs {
    /// Request file (stdin when omitted or "-")
    pub file: Option<PathBuf>,
    /// Ordering policy for flexible tasks (eisenhower, fifo)
    #[arg(long)]
    pub policy: Option<PriorityPolicy>,
    /// Number of days to search for free time
    #[arg(long)]
    pub days: Option<u32>,
    /// Search start (YYYY-MM-DD[THH:MM]); overrides the request's searchStart
    #[arg(long, value_parser = parse_instant)]
    pub start: Option<chrono::NaiveDateTime>,
    /// Print only the explanation
    #[arg(long)]
    pub summary: bool,
}

pub fn run(args: PlanArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let request = read_request(args.file)?;

    let preference = request.preference.unwrap_or_else(|| config.preference.clone());
    let status = request.user_status.unwrap_or_default();
    let search_start = args.start.or(request.search_start).unwrap_or_else(now);

    let mut options = config.plan_options(search_start);
    if let Some(policy) = args.policy {
        options = options.with_policy(policy);
    }
    if let Some(days) = args.days {
        options = options.with_search_days(days);
    }

    validate_request(
        &request.tasks,
        &request.existing_events,
        &preference,
        options.search_days,
    )?;

    let plan = focusplan_core::plan(
        &request.tasks,
        &request.existing_events,
        &preference,
        &status,
        &options,
    );

    if args.summary {
        println!("{}", plan.explanation);
    } else {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    }
    Ok(())
}
