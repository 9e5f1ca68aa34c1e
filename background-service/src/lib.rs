use chrono::{DateTime, Local};
use cron::Schedule;
use rumour_core::{ConfigError, CoreError};
use std::future::Future;
use std::str::FromStr;
use std::time::Duration;
use tracing::{error, info, warn};

/// Fires a job on a cron schedule evaluated in local time.
///
/// The job is awaited inside the loop, so runs never overlap. Occurrences that
/// pass while a run is still going are skipped, not queued. A failed run ends
/// the loop and its error is handed back to the caller.
pub struct DailyTrigger {
    expression: String,
    schedule: Schedule,
}

impl DailyTrigger {
    /// Parses a six-field expression, seconds first (`0 0 0 * * *` is midnight daily).
    pub fn new(expression: &str) -> Result<Self, CoreError> {
        let schedule = Schedule::from_str(expression).map_err(|e| ConfigError::InvalidValue {
            field: "schedule.cron".to_string(),
            value: format!("{} ({})", expression, e),
        })?;
        Ok(Self {
            expression: expression.to_string(),
            schedule,
        })
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// First occurrence strictly after `now`, or `None` once the schedule is exhausted.
    pub fn next_fire(&self, now: DateTime<Local>) -> Option<DateTime<Local>> {
        self.schedule.after(&now).next()
    }

    /// Runs `job` at every occurrence until one fails or the schedule runs out.
    pub async fn run<F, Fut, T>(&self, job: F) -> Result<(), CoreError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, CoreError>>,
    {
        self.run_for(None, job).await.map(|_| ())
    }

    /// Runs `job` at the next `runs` occurrences, or forever when `runs` is `None`.
    /// Returns the number of completed runs, or the first run's error.
    pub async fn run_for<F, Fut, T>(
        &self,
        runs: Option<usize>,
        mut job: F,
    ) -> Result<usize, CoreError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, CoreError>>,
    {
        let mut completed = 0;
        info!(cron = %self.expression, "Scheduler started");

        while runs.map_or(true, |limit| completed < limit) {
            let now = Local::now();
            let Some(next) = self.next_fire(now) else {
                warn!(cron = %self.expression, "Schedule has no further occurrences");
                break;
            };
            let wait = (next - now).to_std().unwrap_or(Duration::ZERO);
            info!(next = %next.format("%Y-%m-%d %H:%M:%S"), "Next run scheduled");
            tokio::time::sleep(wait).await;

            info!("Scheduled run starting");
            if let Err(e) = job().await {
                error!(completed, "Scheduled run failed, stopping scheduler");
                return Err(e);
            }
            info!("Scheduled run finished");
            completed += 1;
        }

        Ok(completed)
    }
}
