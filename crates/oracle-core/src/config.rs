//! Rules constants.
//!
//! Defaults match the printed game. A host can override any subset by
//! loading a JSON object; missing fields keep their default.

use serde::{Deserialize, Serialize};

/// Ship movement range before favor has to be paid
pub const DEFAULT_BASE_RANGE: u32 = 3;

/// Highest level a god track can reach
pub const DEFAULT_MAX_GOD_LEVEL: u8 = 5;

/// Oracle dice rolled at the start of each turn
pub const DEFAULT_DICE_PER_TURN: usize = 3;

/// Cubes and statues a ship can carry at once
pub const DEFAULT_CARGO_CAPACITY: usize = 2;

/// Tunable rules for one game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Steps a ship moves without paying favor
    pub base_range: u32,
    /// Level cap shared by every god track
    pub max_god_level: u8,
    /// Dice rolled for a player when their turn starts
    pub dice_per_turn: usize,
    /// Cargo slots on each ship
    pub cargo_capacity: usize,
    /// Favor gained by spending a resource on favor
    pub favor_per_resource: u32,
    /// Oracle cards of each color in the shared deck
    pub oracle_cards_per_color: usize,
    /// Favor for revealing another player's shrine
    pub shrine_reveal_favor: u32,
    /// Favor granted by the pink god's power
    pub god_power_favor: u32,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            base_range: DEFAULT_BASE_RANGE,
            max_god_level: DEFAULT_MAX_GOD_LEVEL,
            dice_per_turn: DEFAULT_DICE_PER_TURN,
            cargo_capacity: DEFAULT_CARGO_CAPACITY,
            favor_per_resource: 2,
            oracle_cards_per_color: 5,
            shrine_reveal_favor: 1,
            god_power_favor: 3,
        }
    }
}

impl RulesConfig {
    /// Parse a (possibly partial) JSON rules object
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = RulesConfig::from_json(r#"{"base_range": 4}"#).unwrap();
        assert_eq!(config.base_range, 4);
        assert_eq!(config.max_god_level, DEFAULT_MAX_GOD_LEVEL);
        assert_eq!(config.dice_per_turn, 3);
    }

    #[test]
    fn test_empty_json_is_default() {
        assert_eq!(RulesConfig::from_json("{}").unwrap(), RulesConfig::default());
    }
}
