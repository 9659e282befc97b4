use crate::error::UpstreamError;
use crate::services::youtube_client::{
    SearchItem, SearchOrder, SearchPage, VideoApi, VideoStatistics,
};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct MockVideo {
    pub id: String,
    pub title: String,
    pub views: u64,
    pub likes: u64,
}

pub fn mock_video(id: &str, views: u64, likes: u64) -> MockVideo {
    MockVideo {
        id: id.to_string(),
        title: format!("Video {id}"),
        views,
        likes,
    }
}

#[derive(Debug, Clone, Default)]
struct MockTerm {
    total_results: u64,
    videos: Vec<MockVideo>,
    fail_search: Option<String>,
}

/// In-memory stand-in for the YouTube Data API.
#[derive(Default)]
pub struct MockVideoApi {
    terms: HashMap<String, MockTerm>,
    latency: HashMap<String, Duration>,
    fail_lookup: Option<String>,
    /// Ids the lookup silently leaves out, like deleted or private videos.
    withheld: HashSet<String>,
    pub search_calls: AtomicUsize,
    pub lookup_calls: AtomicUsize,
    pub lookup_batches: Mutex<Vec<Vec<String>>>,
}

impl MockVideoApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_term(mut self, term: &str, total_results: u64, videos: Vec<MockVideo>) -> Self {
        self.terms.insert(
            term.to_string(),
            MockTerm {
                total_results,
                videos,
                fail_search: None,
            },
        );
        self
    }

    pub fn with_search_failure(mut self, term: &str, message: &str) -> Self {
        self.terms.entry(term.to_string()).or_default().fail_search = Some(message.to_string());
        self
    }

    pub fn with_lookup_failure(mut self, message: &str) -> Self {
        self.fail_lookup = Some(message.to_string());
        self
    }

    /// Each call made for `term` (search and its lookup) sleeps this long.
    pub fn with_latency(mut self, term: &str, latency: Duration) -> Self {
        self.latency.insert(term.to_string(), latency);
        self
    }

    pub fn withholding(mut self, id: &str) -> Self {
        self.withheld.insert(id.to_string());
        self
    }

    pub fn total_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst) + self.lookup_calls.load(Ordering::SeqCst)
    }

    fn term_owning(&self, id: &str) -> Option<(&String, &MockVideo)> {
        self.terms
            .iter()
            .find_map(|(term, data)| data.videos.iter().find(|v| v.id == id).map(|v| (term, v)))
    }

    async fn delay(&self, term: &str) {
        if let Some(latency) = self.latency.get(term) {
            tokio::time::sleep(*latency).await;
        }
    }
}

#[rocket::async_trait]
impl VideoApi for MockVideoApi {
    async fn search(
        &self,
        term: &str,
        max_results: u32,
        _order: SearchOrder,
    ) -> Result<SearchPage, UpstreamError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.delay(term).await;

        let data = self.terms.get(term).cloned().unwrap_or_default();
        if let Some(message) = data.fail_search {
            return Err(UpstreamError::Api(message));
        }

        Ok(SearchPage {
            total_results: data.total_results,
            items: data
                .videos
                .iter()
                .take(max_results as usize)
                .map(|v| SearchItem {
                    id: v.id.clone(),
                    title: v.title.clone(),
                    published_at: "2024-01-01T00:00:00Z".parse().unwrap(),
                })
                .collect(),
        })
    }

    async fn lookup_statistics(
        &self,
        ids: &[String],
    ) -> Result<HashMap<String, VideoStatistics>, UpstreamError> {
        self.lookup_calls.fetch_add(1, Ordering::SeqCst);
        self.lookup_batches.lock().unwrap().push(ids.to_vec());

        if let Some(term) = ids.first().and_then(|id| self.term_owning(id)).map(|(t, _)| t) {
            self.delay(term).await;
        }
        if let Some(message) = &self.fail_lookup {
            return Err(UpstreamError::Api(message.clone()));
        }

        Ok(ids
            .iter()
            .filter(|id| !self.withheld.contains(*id))
            .filter_map(|id| self.term_owning(id))
            .map(|(_, v)| {
                (
                    v.id.clone(),
                    VideoStatistics {
                        view_count: v.views,
                        like_count: v.likes,
                        title: v.title.clone(),
                        published_at: "2024-01-01T00:00:00Z".parse().unwrap(),
                    },
                )
            })
            .collect())
    }
}
