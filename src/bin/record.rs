use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use route_tracker::{
    ExportFormat, NoSensor, Notifier, PositionSource, RecorderConfig, RouteRecorder, RouteStore,
    SourceConfig, TracingNotifier,
};
use tracing::{info, warn};

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let name = std::env::var("ROUTE_NAME").unwrap_or_else(|_| "Morning Run".to_string());
    let record_secs: u64 = env_or("RECORD_SECS", 12);
    let interval_secs: u64 = env_or("CAPTURE_INTERVAL_SECS", 5);
    let export_dir = PathBuf::from(std::env::var("EXPORT_DIR").unwrap_or_else(|_| ".".to_string()));
    let seed = std::env::var("SIMULATION_SEED")
        .ok()
        .and_then(|value| value.parse().ok());

    let notifier: Arc<dyn Notifier> = Arc::new(TracingNotifier);
    let store = Arc::new(RouteStore::new(Arc::clone(&notifier)));

    let source = PositionSource::new(
        NoSensor,
        &SourceConfig::builder().maybe_rng_seed(seed).build(),
        Arc::clone(&notifier),
    );
    let mut recorder = RouteRecorder::new(
        source,
        Arc::clone(&store),
        notifier,
        RecorderConfig::builder()
            .capture_interval(Duration::from_secs(interval_secs))
            .build(),
    )
    .await;

    if let Some(location) = recorder.current_location() {
        info!(
            lat = location.latitude,
            lon = location.longitude,
            "Current location"
        );
    }

    if let Err(e) = recorder.request_live_mode().await {
        warn!(error = %e, mode = %recorder.mode(), "Live positioning unavailable");
    }

    recorder.start(&name).await?;

    tokio::select! {
        _ = tokio::time::sleep(Duration::from_secs(record_secs)) => {}
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, finishing route");
        }
    }

    let route = recorder.stop()?;
    info!(
        route_id = %route.id(),
        samples = route.sample_count(),
        duration = %route.duration_label(),
        "Route recorded"
    );

    tokio::fs::create_dir_all(&export_dir).await?;
    for format in [ExportFormat::Json, ExportFormat::Csv] {
        let export = store.export(&route, format)?;
        let path = export_dir.join(&export.file_name);
        tokio::fs::write(&path, &export.bytes).await?;
        info!(path = %path.display(), format = %format, "Route exported");
    }

    info!(routes = store.len(), "Done");
    Ok(())
}
