//! `check` command: validate the configuration and print the job table.

use backup_scheduler_config::Config;
use backup_scheduler_jobs::{Scheduler, SchedulerState};

use crate::server::prepare;

pub(crate) fn handle_check_command(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let (state, scheduler) = prepare(config)?;

    println!("Configuration OK: {} job(s)", state.registry().len());
    for line in job_table(&state, &scheduler) {
        println!("{}", line);
    }

    Ok(())
}

fn job_table(state: &SchedulerState, scheduler: &Scheduler) -> Vec<String> {
    state
        .registry()
        .list()
        .iter()
        .map(|job| {
            let when = match scheduler.handle(job.index) {
                Some(handle) => {
                    let next = handle
                        .next_fire()
                        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                        .unwrap_or_else(|| "never".to_string());
                    format!("{} (next: {})", handle.expression(), next)
                }
                None => "manual".to_string(),
            };
            format!(
                "  #{:<3} {:<24} {:<7} {}",
                job.index,
                job.display_name(),
                job.action.kind(),
                when
            )
        })
        .collect()
}
