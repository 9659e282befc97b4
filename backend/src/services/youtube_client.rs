use crate::error::UpstreamError;
use crate::utils::{parse_count, parse_iso8601_or_epoch};
use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use log::debug;
use reqwest::Client;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

/// Upper bound the Data API accepts for both `maxResults` and batched `id` lookups.
pub const MAX_RESULTS: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOrder {
    Relevance,
    Date,
    ViewCount,
    Rating,
    Title,
}

impl SearchOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchOrder::Relevance => "relevance",
            SearchOrder::Date => "date",
            SearchOrder::ViewCount => "viewCount",
            SearchOrder::Rating => "rating",
            SearchOrder::Title => "title",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchItem {
    pub id: String,
    pub title: String,
    pub published_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchPage {
    pub total_results: u64,
    /// In the order the API ranked them.
    pub items: Vec<SearchItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VideoStatistics {
    pub view_count: u64,
    pub like_count: u64,
    pub title: String,
    pub published_at: DateTime<Utc>,
}

/// The two YouTube Data API calls a comparison needs.
#[rocket::async_trait]
pub trait VideoApi: Send + Sync {
    async fn search(
        &self,
        term: &str,
        max_results: u32,
        order: SearchOrder,
    ) -> Result<SearchPage, UpstreamError>;

    /// One batched `videos.list` call; `ids` must not exceed [`MAX_RESULTS`].
    async fn lookup_statistics(
        &self,
        ids: &[String],
    ) -> Result<HashMap<String, VideoStatistics>, UpstreamError>;
}

pub struct YouTubeClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl YouTubeClient {
    pub fn new(api_key: String, base_url: Url, timeout: Option<Duration>) -> Result<Self> {
        if api_key.trim().is_empty() {
            bail!("YouTube API key must not be empty");
        }
        if base_url.cannot_be_a_base() {
            bail!("YouTube API base URL cannot be used as a base: {base_url}");
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(YouTubeClient {
            client: builder.build()?,
            api_key,
            base_url,
        })
    }

    fn endpoint(&self, resource: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(resource);
        }
        url
    }

    async fn get_json(&self, url: Url, query: &[(&str, &str)]) -> Result<Value, UpstreamError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(UpstreamError::transport)?;
        let status = response.status();

        let body = match response.json::<Value>().await {
            Ok(body) => body,
            Err(_) if !status.is_success() => return Err(UpstreamError::Status(status.as_u16())),
            Err(e) => return Err(UpstreamError::malformed(e)),
        };

        if let Some(message) = api_error_message(&body) {
            return Err(UpstreamError::Api(message));
        }
        if !status.is_success() {
            return Err(UpstreamError::Status(status.as_u16()));
        }

        Ok(body)
    }
}

#[rocket::async_trait]
impl VideoApi for YouTubeClient {
    async fn search(
        &self,
        term: &str,
        max_results: u32,
        order: SearchOrder,
    ) -> Result<SearchPage, UpstreamError> {
        // Documentation: https://developers.google.com/youtube/v3/docs/search/list
        let url = self.endpoint("search");
        let max_results = max_results.min(MAX_RESULTS).to_string();
        debug!("YouTube search: q={term:?} maxResults={max_results} order={}", order.as_str());

        let body = self
            .get_json(
                url,
                &[
                    ("part", "id,snippet"),
                    ("q", term),
                    ("type", "video"),
                    ("maxResults", max_results.as_str()),
                    ("order", order.as_str()),
                ],
            )
            .await?;

        parse_search_page(&body)
    }

    async fn lookup_statistics(
        &self,
        ids: &[String],
    ) -> Result<HashMap<String, VideoStatistics>, UpstreamError> {
        // Documentation: https://developers.google.com/youtube/v3/docs/videos/list
        let url = self.endpoint("videos");
        let joined = ids.join(",");
        debug!("YouTube videos lookup for {} ids", ids.len());

        let body = self
            .get_json(url, &[("part", "statistics,snippet"), ("id", joined.as_str())])
            .await?;

        parse_video_statistics(&body)
    }
}

fn api_error_message(body: &Value) -> Option<String> {
    let error = body.get("error")?;
    let message = error["message"]
        .as_str()
        .filter(|m| !m.is_empty())
        .unwrap_or("YouTube API error");
    Some(message.to_string())
}

fn items(body: &Value) -> Result<&Vec<Value>, UpstreamError> {
    body["items"]
        .as_array()
        .ok_or_else(|| UpstreamError::Malformed("response has no `items` array".to_string()))
}

pub(crate) fn parse_search_page(body: &Value) -> Result<SearchPage, UpstreamError> {
    let total_results = body["pageInfo"]["totalResults"].as_u64().unwrap_or(0);

    let items = items(body)?
        .iter()
        .filter_map(|item| {
            // Only `youtube#video` results carry a videoId.
            let id = item["id"]["videoId"].as_str()?;
            Some(SearchItem {
                id: id.to_string(),
                title: item["snippet"]["title"].as_str().unwrap_or("").to_string(),
                published_at: parse_iso8601_or_epoch(
                    item["snippet"]["publishedAt"].as_str().unwrap_or(""),
                ),
            })
        })
        .collect();

    Ok(SearchPage {
        total_results,
        items,
    })
}

pub(crate) fn parse_video_statistics(
    body: &Value,
) -> Result<HashMap<String, VideoStatistics>, UpstreamError> {
    let mut stats = HashMap::new();

    for item in items(body)? {
        let Some(id) = item["id"].as_str() else {
            continue;
        };
        stats.insert(
            id.to_string(),
            VideoStatistics {
                view_count: parse_count(&item["statistics"]["viewCount"]),
                like_count: parse_count(&item["statistics"]["likeCount"]),
                title: item["snippet"]["title"].as_str().unwrap_or("").to_string(),
                published_at: parse_iso8601_or_epoch(
                    item["snippet"]["publishedAt"].as_str().unwrap_or(""),
                ),
            },
        );
    }

    Ok(stats)
}
