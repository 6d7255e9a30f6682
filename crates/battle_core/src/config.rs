//! Battle configuration and unit roster loading.
//!
//! Both are plain RON files deserialized with serde. Every config field has
//! a default, so a config file only needs the values it changes.
//!
//! # Example RON
//!
//! ```ron
//! BattleConfig(
//!     seed: 7,
//!     max_points: 1500,
//!     generation: GenerationConfig(
//!         max_units_per_kind: 11,
//!         placement_width: 3,
//!     ),
//!     max_rounds: 500,
//! )
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::army_generation::MAX_PLACEMENT_WIDTH;
use crate::error::{GameError, Result};
use crate::units::UnitKind;

/// Army generation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Maximum copies of one unit kind per army.
    pub max_units_per_kind: u32,
    /// Width of the deployment zone, counted in columns from the left edge.
    pub placement_width: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_units_per_kind: 11,
            placement_width: 3,
        }
    }
}

/// Top-level battle configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    /// Seed for unit placement.
    pub seed: u64,
    /// Point budget per army.
    pub max_points: u32,
    /// Army generation settings.
    pub generation: GenerationConfig,
    /// Hard cap on rounds before the battle is called a stalemate.
    pub max_rounds: u32,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            seed: 12345,
            max_points: 1500,
            generation: GenerationConfig::default(),
            max_rounds: 1000,
        }
    }
}

impl BattleConfig {
    /// Load a config from a RON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config: Self = parse_ron(path, &contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a RON string.
    pub fn from_ron_str(ron: &str) -> Result<Self> {
        let config: Self = parse_ron(Path::new("<inline>"), ron)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the placement seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the per-army point budget.
    #[must_use]
    pub const fn with_max_points(mut self, max_points: u32) -> Self {
        self.max_points = max_points;
        self
    }

    /// Check that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        let width = self.generation.placement_width;
        if width == 0 || width > MAX_PLACEMENT_WIDTH {
            return Err(GameError::InvalidConfig(format!(
                "placement_width must be in 1..={MAX_PLACEMENT_WIDTH}, got {width}"
            )));
        }
        if self.max_rounds == 0 {
            return Err(GameError::InvalidConfig("max_rounds must be positive".into()));
        }
        Ok(())
    }
}

/// Load a list of unit kinds from a RON file.
pub fn load_roster<P: AsRef<Path>>(path: P) -> Result<Vec<UnitKind>> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)?;
    parse_ron(path, &contents)
}

/// Parse a list of unit kinds from a RON string.
pub fn roster_from_ron_str(ron: &str) -> Result<Vec<UnitKind>> {
    parse_ron(Path::new("<inline>"), ron)
}

fn parse_ron<T: serde::de::DeserializeOwned>(path: &Path, contents: &str) -> Result<T> {
    ron::from_str(contents).map_err(|e| GameError::DataParseError {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}
