//! Sheet configuration.
//!
//! Loaded from TOML, e.g.:
//!
//! ```toml
//! max_rows = 1000
//! max_cols = 26
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, SheetError};
use tabula_engine::engine::Position;

const MAX_CONFIG_FILE_BYTES: u64 = 64 * 1024;

/// Limits applied to every position a sheet accepts, including positions
/// referenced by formulas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SheetConfig {
    pub max_rows: usize,
    pub max_cols: usize,
}

impl Default for SheetConfig {
    fn default() -> Self {
        SheetConfig {
            max_rows: Position::MAX_ROWS,
            max_cols: Position::MAX_COLS,
        }
    }
}

impl SheetConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SheetConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let meta = std::fs::metadata(path)?;
        if meta.len() > MAX_CONFIG_FILE_BYTES {
            return Err(SheetError::Config(format!(
                "Refusing to read {}: config file too large ({} bytes, max {})",
                path.display(),
                meta.len(),
                MAX_CONFIG_FILE_BYTES
            )));
        }
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_rows == 0 || self.max_rows > Position::MAX_ROWS {
            return Err(SheetError::Config(format!(
                "max_rows must be between 1 and {}, got {}",
                Position::MAX_ROWS,
                self.max_rows
            )));
        }
        if self.max_cols == 0 || self.max_cols > Position::MAX_COLS {
            return Err(SheetError::Config(format!(
                "max_cols must be between 1 and {}, got {}",
                Position::MAX_COLS,
                self.max_cols
            )));
        }
        Ok(())
    }

    /// Whether `pos` is valid and inside these limits.
    pub fn contains(&self, pos: Position) -> bool {
        pos.is_valid() && pos.row < self.max_rows && pos.col < self.max_cols
    }
}
