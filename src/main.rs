//! Skyline Runner - headless session runner
//!
//! Generates a city, flies the vehicle on autopilot at the configured frame
//! rate, polls the ambient feed on its own timer and logs HUD readouts.

use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use skyline_runner::config::Config;
use skyline_runner::feed::{AmbientFeed, HttpCollaborator, OfflineCollaborator, TextCollaborator};
use skyline_runner::game::telemetry::TelemetryRecord;
use skyline_runner::game::{
    Building, CityGenerator, GeneratorConfig, NpcTuning, Session, TelemetryHandle, VehicleTuning, WorldSnapshot,
};
use skyline_runner::hud::{minimap_blips, BlipKind, StatLine};
use skyline_runner::input::Autopilot;

/// Minimap radius used for the HUD log line
const MINIMAP_RANGE: f32 = 120.0;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(&config.log_level);

    info!("Starting Skyline Runner");

    let world = generate_world(&config);
    // Buildings never change; traffic is read from telemetry each HUD line
    let skyline = world.buildings().to_vec();
    let session = Session::new(world, VehicleTuning::default(), NpcTuning::default());
    let telemetry = session.telemetry();

    // Ambient feed runs on its own timer, independent of the frame loop
    let feed = AmbientFeed::new(build_collaborator(&config), config.feed_settings());
    let feed_task = tokio::spawn(feed.clone().run());

    let hud_task = tokio::spawn(log_hud(telemetry, feed, skyline, config.hud_interval));

    tokio::select! {
        stats = session.run(Autopilot::default(), config.loop_settings()) => {
            info!(ticks = stats.ticks, "Session complete");
        }
        _ = shutdown_signal() => {}
    }

    feed_task.abort();
    hud_task.abort();

    info!("Shutdown complete");
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing(log_level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

fn generate_world(config: &Config) -> WorldSnapshot {
    let generator = GeneratorConfig {
        building_count: config.building_count,
        npc_count: config.npc_count,
        ..GeneratorConfig::default()
    };

    let mut rng = match config.world_seed {
        Some(seed) => {
            info!(seed, "Using fixed world seed");
            ChaCha8Rng::seed_from_u64(seed)
        }
        None => ChaCha8Rng::from_entropy(),
    };

    CityGenerator::generate(&generator, &mut rng)
}

fn build_collaborator(config: &Config) -> Arc<dyn TextCollaborator> {
    let Some(url) = &config.feed_url else {
        info!("FEED_URL not set, ambient feed will use fallback transmissions");
        return Arc::new(OfflineCollaborator);
    };

    match HttpCollaborator::new(
        url.clone(),
        config.feed_api_key.clone(),
        config.feed_model.clone(),
        config.feed_timeout,
    ) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            warn!(error = %e, "Failed to build feed client, using fallback transmissions");
            Arc::new(OfflineCollaborator)
        }
    }
}

/// Presentation stand-in: periodically read telemetry and the feed log
async fn log_hud(
    telemetry: TelemetryHandle,
    feed: AmbientFeed,
    skyline: Vec<Building>,
    period: std::time::Duration,
) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last_message = None;

    loop {
        ticker.tick().await;

        let Some(t) = telemetry.latest() else {
            continue;
        };

        let minimap = WorldSnapshot::new(skyline.clone(), telemetry.traffic());
        let blips = minimap_blips(&minimap, &t, MINIMAP_RANGE);
        let traffic = blips.iter().filter(|b| b.kind == BlipKind::Traffic).count();
        let record = TelemetryRecord::from(&t);
        info!(
            hud = %StatLine::from_telemetry(&t),
            blips = blips.len(),
            traffic,
            shake = t.impact,
            telemetry = %serde_json::to_string(&record).unwrap_or_default(),
            "HUD"
        );

        if let Some(message) = feed.messages().pop() {
            if last_message.as_ref() != Some(&message) {
                info!(target: "skyline_runner::radio", "{}", message.display());
                last_message = Some(message);
            }
        }
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        }
    }
}
