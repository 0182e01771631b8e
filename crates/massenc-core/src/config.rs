use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Global configuration loaded from `~/.config/massenc/config.toml`.
/// CLI flags override individual fields for one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MassencConfig {
    /// Items per scheduler chunk (checkpoint and ETA granularity, max 64).
    pub chunk_size: usize,
    /// Worker threads for the parallel conversion pass.
    pub max_workers: usize,
    /// Wall-clock budget in minutes; absent = unbounded.
    #[serde(default)]
    pub timeout_minutes: Option<u64>,
    /// External AAC encoder binary used for lossless sources.
    pub encoder: PathBuf,
    /// Name of the stop file, created by the operator inside the output root
    /// to end the run at the next checkpoint.
    pub stop_file_name: String,
}

impl Default for MassencConfig {
    fn default() -> Self {
        Self {
            chunk_size: 32,
            max_workers: 4,
            timeout_minutes: None,
            encoder: PathBuf::from("qaac64"),
            stop_file_name: "massenc.stop".to_string(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("massenc")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<MassencConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = MassencConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: MassencConfig = toml::from_str(&data)?;
    Ok(cfg)
}
