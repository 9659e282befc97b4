use crate::services::compare_service::Comparator;
use crate::services::snapshot_service::SnapshotStore;
use crate::services::youtube_client::YouTubeClient;
use crate::AppState;
use anyhow::{anyhow, Context, Result};
use env_logger::{Builder, Env};
use log::info;
use rocket::http::Method;
use rocket_cors::{AllowedHeaders, AllowedOrigins, CorsOptions};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

pub const DEFAULT_YOUTUBE_API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";
pub const DEFAULT_DATA_DIR: &str = "data";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub youtube_api_key: String,
    pub youtube_api_base_url: Url,
    pub data_dir: PathBuf,
    pub upstream_timeout: Option<Duration>,
    /// `None` allows every origin.
    pub cors_allowed_origins: Option<Vec<String>>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        // API_KEY is the older name, still read so existing .env files keep working.
        let youtube_api_key = get("YOUTUBE_API_KEY")
            .or_else(|| get("API_KEY"))
            .ok_or_else(|| anyhow!("YOUTUBE_API_KEY environment variable must be set"))?;

        let base_url =
            get("YOUTUBE_API_BASE_URL").unwrap_or_else(|| DEFAULT_YOUTUBE_API_BASE_URL.to_string());
        let youtube_api_base_url = Url::parse(&base_url)
            .with_context(|| format!("YOUTUBE_API_BASE_URL is not a valid URL: {base_url}"))?;

        let data_dir = PathBuf::from(get("DATA_DIR").unwrap_or_else(|| DEFAULT_DATA_DIR.into()));

        let upstream_timeout = match get("UPSTREAM_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw
                    .parse::<u64>()
                    .ok()
                    .filter(|secs| *secs > 0)
                    .ok_or_else(|| {
                        anyhow!("UPSTREAM_TIMEOUT_SECS must be a positive integer, got {raw}")
                    })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        let cors_allowed_origins = get("CORS_ALLOWED_ORIGINS").map(|raw| {
            raw.split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect()
        });

        Ok(AppConfig {
            youtube_api_key,
            youtube_api_base_url,
            data_dir,
            upstream_timeout,
            cors_allowed_origins,
        })
    }
}

pub fn init_logger() {
    Builder::from_env(Env::default().default_filter_or("info")).init();
    info!("Starting Rocket backend...");
}

pub fn load_environment() {
    dotenv::dotenv().ok();
}

pub fn create_app_state(config: &AppConfig) -> Result<AppState> {
    let client = YouTubeClient::new(
        config.youtube_api_key.clone(),
        config.youtube_api_base_url.clone(),
        config.upstream_timeout,
    )?;
    info!(
        "Using YouTube Data API at {} (timeout: {:?})",
        config.youtube_api_base_url, config.upstream_timeout
    );

    let snapshots = SnapshotStore::new(config.data_dir.clone());
    info!("Snapshots are stored in {}", config.data_dir.display());

    Ok(AppState {
        comparator: Comparator::new(Arc::new(client)),
        snapshots,
    })
}

pub fn create_cors(config: &AppConfig) -> Result<rocket_cors::Cors> {
    let allowed_origins = match &config.cors_allowed_origins {
        Some(origins) => AllowedOrigins::some_exact(origins.as_slice()),
        None => AllowedOrigins::all(),
    };

    let cors = CorsOptions::default()
        .allowed_origins(allowed_origins)
        .allowed_methods(
            vec![Method::Get, Method::Post, Method::Options]
                .into_iter()
                .map(From::from)
                .collect(),
        )
        .allowed_headers(AllowedHeaders::all())
        .allow_credentials(true)
        .to_cors()
        .map_err(|e| anyhow!("Failed to create CORS options: {}", e))?;

    Ok(cors)
}
