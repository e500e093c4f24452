use std::path::{Path, PathBuf};
use std::fs;
use serde::{Deserialize, Serialize};

use crate::error::IconError;
use crate::mask::DEFAULT_CORNER_RATIO;

/// ICO directory entries store each dimension in one byte, 0 meaning 256.
const MAX_ICO_SIZE: u32 = 256;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub source_path: PathBuf,
    pub output_dir: PathBuf,
    pub png_sizes: Vec<u32>,
    pub ico_sizes: Vec<u32>,
    pub corner_ratio: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            source_path: PathBuf::from("Resources/icon_1024.png"),
            output_dir: PathBuf::from("Resources"),
            png_sizes: vec![16, 32, 48, 256, 512, 1024],
            ico_sizes: vec![16, 32, 48, 256],
            corner_ratio: DEFAULT_CORNER_RATIO,
        }
    }
}

impl GeneratorConfig {
    /// Settings for one source/output pair, everything else at defaults.
    pub fn for_paths(source_path: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_path: source_path.into(),
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }

    pub fn config_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
        let config_dir = dirs::config_dir()
            .ok_or("Could not find config directory")?
            .join("IconAssetGenerator");
        Ok(config_dir.join("config.json"))
    }

    pub fn load() -> Self {
        let path = match Self::config_path() {
            Ok(path) => path,
            Err(e) => {
                log::warn!("Failed to get config path: {}", e);
                return Self::default();
            }
        };
        Self::load_or_default(&path)
    }

    /// Settings from `path` when it exists and parses, defaults otherwise.
    /// An overriding file is announced at info level.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(path) {
            Ok(config) => {
                log::info!("Using settings from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), IconError> {
        if let Some(size) = self.png_sizes.iter().chain(&self.ico_sizes).find(|&&s| s == 0) {
            return Err(IconError::InvalidConfig(format!("icon size must be positive, got {size}")));
        }
        if let Some(size) = self.ico_sizes.iter().find(|&&s| s > MAX_ICO_SIZE) {
            return Err(IconError::InvalidConfig(format!(
                "ICO size {size} exceeds {MAX_ICO_SIZE}"
            )));
        }
        if !self.corner_ratio.is_finite() || !(0.0..=0.5).contains(&self.corner_ratio) {
            return Err(IconError::InvalidConfig(format!(
                "corner ratio must be within 0.0..=0.5, got {}",
                self.corner_ratio
            )));
        }
        Ok(())
    }
}
