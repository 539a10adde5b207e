use serde::{Deserialize, Serialize};

use crate::{ConfigError, MAX_BOARD_DIMENSION, MIN_BOARD_COLS, MIN_BOARD_ROWS};

/// Board dimensions for a [`GameSession`](super::GameSession).
///
/// Defaults to the standard 20 rows by 10 columns. Missing fields fall back to
/// their defaults when deserialized; unknown fields are rejected.
///
/// # Example
///
/// ```
/// use blockfall_engine::EngineConfig;
///
/// let config: EngineConfig = serde_json::from_str(r#"{ "rows": 24 }"#).unwrap();
/// assert_eq!((config.rows, config.cols), (24, 10));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub rows: usize,
    pub cols: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { rows: 20, cols: 10 }
    }
}

impl EngineConfig {
    /// Checks that every piece kind can spawn on an empty board of this size.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_BOARD_ROWS..=MAX_BOARD_DIMENSION).contains(&self.rows) {
            return Err(ConfigError::InvalidRows { rows: self.rows });
        }
        if !(MIN_BOARD_COLS..=MAX_BOARD_DIMENSION).contains(&self.cols) {
            return Err(ConfigError::InvalidColumns { cols: self.cols });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_standard_board() {
        let config = EngineConfig::default();
        assert_eq!((config.rows, config.cols), (20, 10));
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_rejects_small_and_large_boards() {
        let config = EngineConfig { rows: 3, cols: 10 };
        assert_eq!(config.validate(), Err(ConfigError::InvalidRows { rows: 3 }));

        let config = EngineConfig { rows: 20, cols: 256 };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidColumns { cols: 256 })
        );
        assert_eq!(
            config.validate().unwrap_err().to_string(),
            "board needs 5..=255 columns, got 256"
        );
    }

    #[test]
    fn test_smallest_board_bounds() {
        let config = EngineConfig { rows: 4, cols: 4 };
        assert_eq!(config.validate(), Err(ConfigError::InvalidColumns { cols: 4 }));
        assert_eq!(
            config.validate().unwrap_err().to_string(),
            "board needs 5..=255 columns, got 4"
        );

        let config = EngineConfig { rows: 4, cols: 5 };
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_deserialize_rejects_unknown_fields() {
        assert!(serde_json::from_str::<EngineConfig>(r#"{ "rows": 20, "depth": 3 }"#).is_err());
        let config: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
    }
}
