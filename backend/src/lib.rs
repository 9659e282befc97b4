pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

use rocket::{catchers, routes, Build, Rocket};
use services::compare_service::Comparator;
use services::snapshot_service::SnapshotStore;

pub struct AppState {
    pub comparator: Comparator,
    pub snapshots: SnapshotStore,
}

pub fn build_rocket(state: AppState, cors: rocket_cors::Cors) -> Rocket<Build> {
    rocket::build()
        .manage(state)
        .mount(
            "/api",
            routes![
                api::compare,
                api::save_json,
                api::list_json,
                api::load_json,
            ],
        )
        .register("/", catchers![api::default_catcher])
        .attach(cors)
}
