//! Scheduled background tasks using tokio-cron-scheduler.
//!
//! ```text
//! Scheduler (FETCH_JOBS_CRON, default every 6 hours)
//!     │
//!     └─► IngestionScheduler::on_timer()
//!             └─► skipped if a cycle is already running
//!             └─► otherwise JobIngestor::run_cycle()
//! ```

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::domains::jobs::scheduler::IngestionScheduler;

/// Start all scheduled tasks
pub async fn start_scheduler(ingestion: Arc<IngestionScheduler>) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    let cron = to_six_field_cron(ingestion.cron_expression());
    let fetch_job = Job::new_async(cron.as_str(), move |_uuid, _lock| {
        let ingestion = ingestion.clone();
        Box::pin(async move {
            ingestion.on_timer().await;
        })
    })
    .with_context(|| format!("Invalid FETCH_JOBS_CRON expression: {}", cron))?;

    scheduler.add(fetch_job).await?;
    scheduler.start().await?;

    tracing::info!(cron = %cron, "Scheduled tasks started (periodic job fetch)");
    Ok(scheduler)
}

/// tokio-cron-scheduler wants a leading seconds field and numbers weekdays
/// 1-7 from Sunday; operators write the classic five-field form with
/// weekdays 0-7 (0 and 7 are both Sunday). Five-field expressions get both
/// fixes. Expressions that already carry six or more fields pass through.
pub fn to_six_field_cron(expression: &str) -> String {
    let fields: Vec<&str> = expression.split_whitespace().collect();
    match fields.as_slice() {
        [minute, hour, day, month, weekday] => format!(
            "0 {} {} {} {} {}",
            minute,
            hour,
            day,
            month,
            translate_weekdays(weekday)
        ),
        _ => expression.trim().to_string(),
    }
}

fn translate_weekdays(field: &str) -> String {
    field
        .split(',')
        .map(translate_weekday_item)
        .collect::<Vec<_>>()
        .join(",")
}

/// One list item: `N`, `A-B`, either with an optional `/STEP`. Names and
/// wildcards are the same in both dialects.
fn translate_weekday_item(item: &str) -> String {
    let (range, step) = match item.split_once('/') {
        Some((range, step)) => (range, Some(step)),
        None => (item, None),
    };

    let translated = match range.split_once('-') {
        Some((start, end)) => match (start.parse::<u8>(), end.parse::<u8>()) {
            (Ok(0), Ok(7)) => "1-7".to_string(),
            // A range ending on Sunday wraps back to the start of the week.
            (Ok(start @ 1..=6), Ok(7)) if step.is_none() => format!("{}-7,1", start + 1),
            (Ok(start @ 0..=6), Ok(end @ 0..=6)) => format!("{}-{}", start + 1, end + 1),
            _ => range.to_string(),
        },
        None => match range.parse::<u8>() {
            Ok(day @ 0..=6) => (day + 1).to_string(),
            Ok(7) => "1".to_string(),
            _ => range.to_string(),
        },
    };

    match step {
        Some(step) => format!("{}/{}", translated, step),
        None => translated,
    }
}
