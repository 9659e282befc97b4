use crate::error::AppError;
use crate::models::ComparisonResult;
use crate::utils::{is_plain_file_name, snapshot_file_name, with_collision_suffix};
use chrono::{Local, NaiveDateTime};
use log::{debug, info};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

const MAX_NAME_ATTEMPTS: u32 = 100;

/// Flat directory of `comparison-*.json` files. Nothing is cached; every call
/// goes back to the filesystem.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    data_dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(data_dir: PathBuf) -> Self {
        SnapshotStore { data_dir }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub async fn save(&self, result: &ComparisonResult) -> Result<String, AppError> {
        self.save_at(result, Local::now().naive_local()).await
    }

    async fn save_at(
        &self,
        result: &ComparisonResult,
        now: NaiveDateTime,
    ) -> Result<String, AppError> {
        fs::create_dir_all(&self.data_dir).await?;

        let json = serde_json::to_vec_pretty(result)
            .map_err(|e| AppError::Internal(format!("failed to serialize snapshot: {e}")))?;

        let base = snapshot_file_name(now);
        let mut name = base.clone();

        for attempt in 1..=MAX_NAME_ATTEMPTS {
            // create_new: an existing snapshot is never overwritten.
            let opened = OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(self.data_dir.join(&name))
                .await;

            match opened {
                Ok(mut file) => {
                    file.write_all(&json).await?;
                    file.flush().await?;
                    info!(
                        "Saved comparison {:?} vs {:?} as {name}",
                        result.term1, result.term2
                    );
                    return Ok(name);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    debug!("Snapshot name {name} is taken");
                    name = with_collision_suffix(&base, attempt);
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(AppError::StoreIo(io::Error::new(
            ErrorKind::AlreadyExists,
            format!("no free snapshot name after {MAX_NAME_ATTEMPTS} attempts for {base}"),
        )))
    }

    /// File names of all stored snapshots, in no particular order.
    pub async fn list(&self) -> Result<Vec<String>, AppError> {
        let mut entries = match fs::read_dir(&self.data_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if name.ends_with(".json") {
                    names.push(name.to_string());
                }
            }
        }

        debug!("Found {} snapshots in {}", names.len(), self.data_dir.display());
        Ok(names)
    }

    pub async fn load(&self, name: &str) -> Result<ComparisonResult, AppError> {
        if !is_plain_file_name(name) {
            return Err(AppError::NotFound(name.to_string()));
        }

        let bytes = match fs::read(self.data_dir.join(name)).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(AppError::NotFound(name.to_string()))
            }
            Err(e) => return Err(e.into()),
        };

        serde_json::from_slice(&bytes).map_err(|source| AppError::CorruptSnapshot {
            name: name.to_string(),
            source,
        })
    }
}
