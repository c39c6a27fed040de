pub mod monitor;
pub mod scale_up;

use std::path::Path;

use tierwatch_core::settings::RunSettings;
use tierwatch_core::Settings;

use crate::CommonArgs;

/// Resolve runtime settings: the TOML file when given, built-in defaults
/// otherwise.
pub(crate) fn load_settings(common: &CommonArgs) -> anyhow::Result<RunSettings> {
    Ok(match &common.settings {
        Some(path) => Settings::from_file(Path::new(path))?.resolve(),
        None => RunSettings::default(),
    })
}
