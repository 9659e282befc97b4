use crate::error::{AppError, UpstreamError};
use crate::models::{ComparisonResult, TermStats, VideoRecord};
use crate::services::youtube_client::{
    SearchItem, SearchOrder, VideoApi, VideoStatistics, MAX_RESULTS,
};
use log::{debug, info};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::task::{AbortHandle, JoinHandle};

/// Runs the search → lookup pipeline for two terms and puts the results side by side.
#[derive(Clone)]
pub struct Comparator {
    api: Arc<dyn VideoApi>,
}

impl Comparator {
    pub fn new(api: Arc<dyn VideoApi>) -> Self {
        Comparator { api }
    }

    /// Both terms are fetched on their own tokio task. If either pipeline fails, or the
    /// caller stops waiting, the tasks are aborted; there are no partial results.
    pub async fn compare(&self, term1: &str, term2: &str) -> Result<ComparisonResult, AppError> {
        validate_term("term1", term1)?;
        validate_term("term2", term2)?;

        let first = tokio::spawn(fetch_term_stats(self.api.clone(), term1.to_string()));
        let second = tokio::spawn(fetch_term_stats(self.api.clone(), term2.to_string()));
        let _pipelines = AbortOnDrop([first.abort_handle(), second.abort_handle()]);

        let (stats1, stats2) = tokio::try_join!(join_pipeline(first), join_pipeline(second))?;

        info!(
            "Compared {term1:?} ({} videos, {} results) with {term2:?} ({} videos, {} results)",
            stats1.videos.len(),
            stats1.total_results,
            stats2.videos.len(),
            stats2.total_results
        );

        Ok(ComparisonResult {
            term1: term1.to_string(),
            term2: term2.to_string(),
            stats1,
            stats2,
        })
    }
}

/// Aborts the pipeline tasks once `compare` returns or its future is dropped.
/// Aborting a finished task does nothing.
struct AbortOnDrop([AbortHandle; 2]);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        for handle in &self.0 {
            handle.abort();
        }
    }
}

fn validate_term(name: &str, term: &str) -> Result<(), AppError> {
    if term.trim().is_empty() {
        debug!("Rejected comparison: {name} is empty");
        return Err(AppError::InvalidRequest(
            "Both term1 and term2 are required".to_string(),
        ));
    }
    Ok(())
}

async fn join_pipeline(
    handle: JoinHandle<Result<TermStats, UpstreamError>>,
) -> Result<TermStats, AppError> {
    match handle.await {
        Ok(result) => result.map_err(AppError::from),
        Err(e) => Err(AppError::Internal(format!(
            "term pipeline did not complete: {e}"
        ))),
    }
}

async fn fetch_term_stats(
    api: Arc<dyn VideoApi>,
    term: String,
) -> Result<TermStats, UpstreamError> {
    let page = api.search(&term, MAX_RESULTS, SearchOrder::Relevance).await?;
    let ids = ranked_ids(&page.items);

    if ids.is_empty() {
        debug!("No videos for {term:?}, skipping statistics lookup");
        return Ok(TermStats::empty(page.total_results));
    }

    let statistics = api.lookup_statistics(&ids).await?;
    let videos = in_search_order(&ids, statistics);

    Ok(TermStats::from_videos(page.total_results, videos))
}

/// Video ids in relevance order, without duplicates, capped at one lookup batch.
fn ranked_ids(items: &[SearchItem]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut ids = Vec::new();
    for item in items {
        if ids.len() == MAX_RESULTS as usize {
            break;
        }
        if seen.insert(item.id.as_str()) {
            ids.push(item.id.clone());
        }
    }
    ids
}

/// The lookup response is keyed by id, so its own ordering never leaks into the
/// result. Ids the lookup did not return (deleted or private videos) are dropped.
fn in_search_order(
    ids: &[String],
    mut statistics: HashMap<String, VideoStatistics>,
) -> Vec<VideoRecord> {
    ids.iter()
        .filter_map(|id| {
            statistics.remove(id).map(|stats| VideoRecord {
                video_id: id.clone(),
                title: stats.title,
                view_count: stats.view_count,
                like_count: stats.like_count,
                published_at: stats.published_at,
            })
        })
        .collect()
}
