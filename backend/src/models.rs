use chrono::{DateTime, Utc};
use rocket::serde::{Deserialize, Serialize};

/// A single video as it appears in one term's result list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRecord {
    pub video_id: String,
    pub title: String,
    pub view_count: u64,
    pub like_count: u64,
    pub published_at: DateTime<Utc>,
}

/// Aggregated statistics for one search term.
///
/// The totals and averages are derived from `videos`; build instances through
/// [`TermStats::from_videos`] so they stay consistent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermStats {
    pub total_results: u64,
    pub total_views: u64,
    pub average_views: f64,
    pub total_likes: u64,
    pub average_likes: f64,
    pub videos: Vec<VideoRecord>,
}

impl TermStats {
    pub fn from_videos(total_results: u64, videos: Vec<VideoRecord>) -> Self {
        let total_views: u64 = videos.iter().map(|v| v.view_count).sum();
        let total_likes: u64 = videos.iter().map(|v| v.like_count).sum();

        let (average_views, average_likes) = if videos.is_empty() {
            (0.0, 0.0)
        } else {
            let count = videos.len() as f64;
            (total_views as f64 / count, total_likes as f64 / count)
        };

        TermStats {
            total_results,
            total_views,
            average_views,
            total_likes,
            average_likes,
            videos,
        }
    }

    pub fn empty(total_results: u64) -> Self {
        Self::from_videos(total_results, Vec::new())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub term1: String,
    pub term2: String,
    pub stats1: TermStats,
    pub stats2: TermStats,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SaveResponse {
    pub filename: String,
}

/// Body of every non-2xx response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(id: &str, views: u64, likes: u64) -> VideoRecord {
        VideoRecord {
            video_id: id.to_string(),
            title: format!("Video {id}"),
            view_count: views,
            like_count: likes,
            published_at: "2024-03-01T10:00:00Z".parse().unwrap(),
        }
    }

    #[test]
    fn test_from_videos_empty_is_all_zero() {
        let stats = TermStats::empty(1234);

        assert_eq!(stats.total_results, 1234);
        assert_eq!(stats.total_views, 0);
        assert_eq!(stats.average_views, 0.0);
        assert_eq!(stats.total_likes, 0);
        assert_eq!(stats.average_likes, 0.0);
        assert!(stats.videos.is_empty());
    }

    #[test]
    fn test_from_videos_sums_and_averages() {
        let stats = TermStats::from_videos(
            999,
            vec![video("a", 100, 10), video("b", 200, 5), video("c", 0, 0)],
        );

        assert_eq!(stats.total_views, 300);
        assert_eq!(stats.total_likes, 15);
        assert!((stats.average_views - 100.0).abs() < 1e-9);
        assert!((stats.average_likes - 5.0).abs() < 1e-9);
        assert_eq!(stats.videos.len(), 3);
    }

    #[test]
    fn test_json_uses_camel_case_fields() {
        let stats = TermStats::from_videos(7, vec![video("abc", 3, 1)]);
        let json = serde_json::to_value(&stats).unwrap();

        assert_eq!(json["totalResults"], 7);
        assert_eq!(json["totalViews"], 3);
        assert_eq!(json["averageLikes"], 1.0);
        assert_eq!(json["videos"][0]["videoId"], "abc");
        assert_eq!(json["videos"][0]["viewCount"], 3);
        assert_eq!(json["videos"][0]["publishedAt"], "2024-03-01T10:00:00Z");
    }

    #[test]
    fn test_deserializes_frontend_payload() {
        let payload = r#"{
            "term1": "rust",
            "term2": "go",
            "stats1": {
                "totalResults": 1000000,
                "totalViews": 150,
                "averageViews": 75.0,
                "totalLikes": 12,
                "averageLikes": 6.0,
                "videos": [
                    {"videoId": "x1", "title": "One", "viewCount": 100, "likeCount": 10, "publishedAt": "2023-01-01T00:00:00Z"},
                    {"videoId": "x2", "title": "Two", "viewCount": 50, "likeCount": 2, "publishedAt": "2023-06-15T12:30:00Z"}
                ]
            },
            "stats2": {
                "totalResults": 0,
                "totalViews": 0,
                "averageViews": 0.0,
                "totalLikes": 0,
                "averageLikes": 0.0,
                "videos": []
            }
        }"#;

        let result: ComparisonResult = serde_json::from_str(payload).unwrap();

        assert_eq!(result.term1, "rust");
        assert_eq!(result.stats1.videos[1].video_id, "x2");
        assert_eq!(result.stats2, TermStats::empty(0));
    }
}
