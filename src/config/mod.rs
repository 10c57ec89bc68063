use serde::Deserialize;
use std::path::Path;

const MIN_CHILDREN_PER_NODE: usize = 2;

/// Layout engine configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Fan-out before a new node splits an existing leaf instead of appending.
    pub max_children_per_node: usize,
    pub drop_zones: DropZoneConfig,
}

/// Proportions of the 9-zone drop hit test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropZoneConfig {
    /// Side of the central swap box, as a fraction of each extent.
    pub center_fraction: f32,
    /// Width of the outer band, as a fraction of each extent.
    pub outer_fraction: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        let raw = RawLayoutConfig::default();
        Self {
            max_children_per_node: raw.max_children_per_node,
            drop_zones: DropZoneConfig::default(),
        }
    }
}

impl Default for DropZoneConfig {
    fn default() -> Self {
        let raw = RawDropZoneConfig::default();
        Self {
            center_fraction: raw.center_fraction,
            outer_fraction: raw.outer_fraction,
        }
    }
}

/// Errors that can occur during config loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("validation error: {0}")]
    Validation(String),
}

// ── Serde intermediate structs ───────────────────────────────────────

#[derive(Deserialize)]
#[serde(default)]
struct RawLayoutConfig {
    max_children_per_node: usize,
    drop_zones: RawDropZoneConfig,
}

impl Default for RawLayoutConfig {
    fn default() -> Self {
        Self {
            max_children_per_node: 5,
            drop_zones: RawDropZoneConfig::default(),
        }
    }
}

#[derive(Deserialize)]
#[serde(default)]
struct RawDropZoneConfig {
    center_fraction: f32,
    outer_fraction: f32,
}

impl Default for RawDropZoneConfig {
    fn default() -> Self {
        Self {
            center_fraction: 1.0 / 3.0,
            outer_fraction: 0.1,
        }
    }
}

impl LayoutConfig {
    /// Load config from a TOML file. Returns defaults if the file doesn't exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_toml(&contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No layout config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(ConfigError::Io(e)),
        }
    }

    /// Parse a TOML string into a LayoutConfig.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let raw: RawLayoutConfig = toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))?;

        let config = Self {
            max_children_per_node: raw.max_children_per_node,
            drop_zones: DropZoneConfig {
                center_fraction: raw.drop_zones.center_fraction,
                outer_fraction: raw.drop_zones.outer_fraction,
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate config values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_children_per_node < MIN_CHILDREN_PER_NODE {
            return Err(ConfigError::Validation(format!(
                "max_children_per_node must be >= {MIN_CHILDREN_PER_NODE}"
            )));
        }

        let center = self.drop_zones.center_fraction;
        if !(center > 0.0 && center < 1.0) {
            return Err(ConfigError::Validation(
                "drop_zones.center_fraction must be in (0, 1)".to_string(),
            ));
        }

        let outer = self.drop_zones.outer_fraction;
        if !(0.0..0.5).contains(&outer) {
            return Err(ConfigError::Validation(
                "drop_zones.outer_fraction must be in [0, 0.5)".to_string(),
            ));
        }

        Ok(())
    }
}
