//! DSA Visualizer Server
//!
//! Record the configured demo scenario and serve its playback.

use dsa_steps::{Algorithm, Scenario};
use dsa_vis::{Playback, Player, VisConfig, VisServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dsa_vis=info,dsa_steps=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = VisConfig::from_env()?;
    tracing::info!(scenario = %config.scenario, "Starting DSA visualizer");

    let scenario = Scenario::demo(config.scenario, &config.input);
    let playback = Playback::new(scenario)?.with_base_delay(config.base_delay);
    tracing::info!(
        algorithm = playback.algorithm().name(),
        steps = playback.total_steps(),
        "scenario recorded"
    );

    let server = VisServer::new(Player::new(playback));
    server.serve(config.addr).await?;

    Ok(())
}
