use anyhow::bail;

use tierwatch_atlas::AtlasClient;
use tierwatch_engine::scale_up_fleet;
use tierwatch_store::FleetStore;

use crate::CommonArgs;

pub async fn run(common: &CommonArgs) -> anyhow::Result<()> {
    let settings = super::load_settings(common)?;
    let atlas = AtlasClient::new(common.project_id.clone(), common.access_token.clone());
    let store = FleetStore::open(&common.config_file);

    let report = scale_up_fleet(&atlas, &store, &settings).await?;
    if report.clusters_skipped > 0 {
        bail!(
            "scale-up incomplete: {} cluster(s) skipped",
            report.clusters_skipped
        );
    }
    Ok(())
}
