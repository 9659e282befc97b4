use anyhow::anyhow;
use trend_spotter::build_rocket;
use trend_spotter::config::{
    create_app_state, create_cors, init_logger, load_environment, AppConfig,
};

#[rocket::main]
async fn main() -> anyhow::Result<()> {
    load_environment();
    init_logger();

    let config = AppConfig::from_env()?;
    let state = create_app_state(&config)?;
    let cors = create_cors(&config)?;

    build_rocket(state, cors)
        .launch()
        .await
        .map_err(|e| anyhow!("Rocket failed to launch: {e}"))?;

    Ok(())
}
