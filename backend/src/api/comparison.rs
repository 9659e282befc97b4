use crate::error::AppError;
use crate::models::ComparisonResult;
use crate::AppState;
use log::error;
use rocket::serde::json::Json;
use rocket::{get, State};

#[get("/compare?<term1>&<term2>")]
pub async fn compare(
    term1: Option<String>,
    term2: Option<String>,
    state: &State<AppState>,
) -> Result<Json<ComparisonResult>, AppError> {
    let term1 = term1.unwrap_or_default();
    let term2 = term2.unwrap_or_default();

    match state.comparator.compare(&term1, &term2).await {
        Ok(result) => Ok(Json(result)),
        Err(e) => {
            error!("Comparison of {term1:?} and {term2:?} failed: {e}");
            Err(e)
        }
    }
}
