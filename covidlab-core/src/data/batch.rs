//! Multi-area refresh — one fetch per area, run concurrently, with
//! progress reporting.

use super::error::DataError;
use crate::client::CovidDataClient;
use crate::domain::{Area, DailyRecord};
use std::sync::Arc;
use tokio::task::JoinSet;

/// Progress callback for multi-area operations.
pub trait FetchProgress: Send + Sync {
    /// Called when an area's fetch is dispatched.
    fn on_start(&self, area: &str, index: usize, total: usize);

    /// Called as each area's fetch completes, in completion order.
    fn on_complete(&self, area: &str, result: &Result<Vec<DailyRecord>, DataError>);

    /// Called when the entire batch is done.
    fn on_batch_complete(&self, succeeded: usize, failed: usize, total: usize);
}

/// Simple progress reporter that prints to stdout.
pub struct StdoutProgress;

impl FetchProgress for StdoutProgress {
    fn on_start(&self, area: &str, index: usize, total: usize) {
        println!("[{}/{}] Fetching {area}...", index + 1, total);
    }

    fn on_complete(&self, area: &str, result: &Result<Vec<DailyRecord>, DataError>) {
        match result {
            Ok(records) => println!("  OK: {area} ({} days)", records.len()),
            Err(e) => println!("  FAIL: {area}: {e}"),
        }
    }

    fn on_batch_complete(&self, succeeded: usize, failed: usize, total: usize) {
        println!("\nRefresh complete: {succeeded}/{total} succeeded, {failed} failed");
    }
}

/// Summary of a batch refresh.
#[derive(Debug)]
pub struct FetchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Fetched series, in the order the areas were requested.
    pub series: Vec<(Area, Vec<DailyRecord>)>,
    pub errors: Vec<(String, DataError)>,
}

impl FetchSummary {
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

/// Fetch the series for every area concurrently.
///
/// Fetches are independent and complete in any order; one area's failure
/// never affects another's. Failures are collected, not propagated.
pub async fn fetch_areas(
    client: Arc<CovidDataClient>,
    areas: &[Area],
    progress: &dyn FetchProgress,
) -> FetchSummary {
    let total = areas.len();
    let mut join_set = JoinSet::new();

    for (index, area) in areas.iter().cloned().enumerate() {
        progress.on_start(area.area_name(), index, total);
        let client = Arc::clone(&client);
        join_set.spawn(async move {
            let result = client.daily_series(&area).await;
            (index, area, result)
        });
    }

    let mut fetched: Vec<(usize, Area, Vec<DailyRecord>)> = Vec::new();
    let mut errors: Vec<(String, DataError)> = Vec::new();

    while let Some(joined) = join_set.join_next().await {
        let Ok((index, area, result)) = joined else {
            // The area name is lost with a panicked task; record the
            // failure anonymously rather than dropping it.
            errors.push((
                "<unknown>".to_string(),
                DataError::Other("fetch task failed".to_string()),
            ));
            continue;
        };

        progress.on_complete(area.area_name(), &result);
        match result {
            Ok(records) => fetched.push((index, area, records)),
            Err(e) => errors.push((area.area_name().to_string(), e)),
        }
    }

    fetched.sort_by_key(|(index, _, _)| *index);
    let series: Vec<(Area, Vec<DailyRecord>)> = fetched
        .into_iter()
        .map(|(_, area, records)| (area, records))
        .collect();

    let succeeded = series.len();
    let failed = errors.len();
    progress.on_batch_complete(succeeded, failed, total);

    FetchSummary {
        total,
        succeeded,
        failed,
        series,
        errors,
    }
}
