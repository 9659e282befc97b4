use crate::error::AppError;
use crate::models::{ComparisonResult, SaveResponse};
use crate::AppState;
use log::{error, info};
use rocket::serde::json::Json;
use rocket::{get, post, State};

#[post("/save-json", data = "<result>")]
pub async fn save_json(
    result: Json<ComparisonResult>,
    state: &State<AppState>,
) -> Result<Json<SaveResponse>, AppError> {
    match state.snapshots.save(&result).await {
        Ok(filename) => Ok(Json(SaveResponse { filename })),
        Err(e) => {
            error!("Failed to save snapshot: {e}");
            Err(e)
        }
    }
}

#[get("/list-json")]
pub async fn list_json(state: &State<AppState>) -> Result<Json<Vec<String>>, AppError> {
    match state.snapshots.list().await {
        Ok(names) => {
            info!("Found {} snapshots.", names.len());
            Ok(Json(names))
        }
        Err(e) => {
            error!("Failed to list snapshots: {e}");
            Err(e)
        }
    }
}

#[get("/load-json/<filename>")]
pub async fn load_json(
    filename: &str,
    state: &State<AppState>,
) -> Result<Json<ComparisonResult>, AppError> {
    match state.snapshots.load(filename).await {
        Ok(result) => Ok(Json(result)),
        Err(e) => {
            error!("Failed to load snapshot {filename}: {e}");
            Err(e)
        }
    }
}
