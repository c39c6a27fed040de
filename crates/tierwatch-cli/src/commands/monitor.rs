use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::info;

use tierwatch_atlas::AtlasClient;
use tierwatch_core::TierSpecTable;
use tierwatch_engine::{DecisionEngine, ScaleDownMonitor};
use tierwatch_store::FleetStore;

use crate::CommonArgs;

pub async fn run(
    common: &CommonArgs,
    min_hours_since_update: Option<f64>,
    watch_mode: bool,
    interval_secs: u64,
) -> anyhow::Result<()> {
    let specs = TierSpecTable::from_file(Path::new(&common.tier_specs))?;
    let mut settings = super::load_settings(common)?;
    if let Some(hours) = min_hours_since_update {
        settings.min_dwell_hours = hours;
    }

    let atlas = Arc::new(AtlasClient::new(
        common.project_id.clone(),
        common.access_token.clone(),
    ));
    let store = FleetStore::open(&common.config_file);
    let monitor = ScaleDownMonitor::new(atlas, store, DecisionEngine::new(specs, settings));

    if !watch_mode {
        monitor.run_once().await?;
        return Ok(());
    }

    // Graceful shutdown on Ctrl-C.
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown signal received");
            let _ = shutdown_tx.send(true);
        }
    });

    monitor
        .run(Duration::from_secs(interval_secs), shutdown_rx)
        .await
}
