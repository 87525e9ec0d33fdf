// Configuration module for reading Snake.toml
// All engine tuning lives here so weight experiments never need a recompile

use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub engine: EngineConfig,
    pub features: FeaturesConfig,
    pub hunger: HungerConfig,
    pub safety: SafetyConfig,
    pub log: LogConfig,
}

/// Strategy selection and score-mask shape
#[derive(Debug, Deserialize, Clone)]
pub struct EngineConfig {
    pub strategy: String,
    pub decay: DecayModel,
}

/// How a feature's influence falls off with distance from its source cell
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DecayModel {
    /// Shortest walkable path, in grid steps; obstacles cast shadows
    Hops,
    /// Straight-line distance over a square window, ignoring obstacles
    Euclidean,
}

/// A single influence source: its strength and how far it reaches
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct Feature {
    pub weight: f64,
    pub scale: i32,
}

/// Per-cell-kind influence weights
#[derive(Debug, Deserialize, Clone)]
pub struct FeaturesConfig {
    pub space: Feature,
    pub head: Feature,
    pub weak_head: Feature,
    pub body: Feature,
    pub own_body: Feature,
    pub tail: Feature,
    pub race_food: Feature,
}

/// Health-tiered food attraction and growth scaling
#[derive(Debug, Deserialize, Clone)]
pub struct HungerConfig {
    pub starving_below: i32,
    pub starving: Feature,
    pub hungry_below: i32,
    pub hungry: Feature,
    pub sated: Feature,
    pub growth_spurt_factor: f64,
    pub growth_factor: f64,
}

/// Dead-end avoidance
#[derive(Debug, Deserialize, Clone)]
pub struct SafetyConfig {
    pub dead_end_penalty: f64,
}

/// Decision logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    pub decisions_enabled: bool,
    pub decisions_path: String,
}

impl Config {
    /// Loads configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Loads default configuration from Snake.toml in the project root
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("Snake.toml")
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the constants defined in Snake.toml
    pub fn default_hardcoded() -> Self {
        Config {
            engine: EngineConfig {
                strategy: "influence".to_string(),
                decay: DecayModel::Hops,
            },
            features: FeaturesConfig {
                space: Feature { weight: 5.0, scale: 2 },
                head: Feature { weight: -144.0, scale: 1 },
                weak_head: Feature { weight: 48.0, scale: 1 },
                body: Feature { weight: -3.0, scale: 1 },
                own_body: Feature { weight: -1.0, scale: 1 },
                tail: Feature { weight: 5.0, scale: 2 },
                race_food: Feature { weight: -48.0, scale: 1 },
            },
            hunger: HungerConfig {
                starving_below: 30,
                starving: Feature { weight: 48.0, scale: 4 },
                hungry_below: 60,
                hungry: Feature { weight: 24.0, scale: 3 },
                sated: Feature { weight: 12.0, scale: 2 },
                growth_spurt_factor: 3.0,
                growth_factor: 2.0,
            },
            safety: SafetyConfig {
                dead_end_penalty: -200.0,
            },
            log: LogConfig {
                decisions_enabled: false,
                decisions_path: "decisions.jsonl".to_string(),
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default()
            .unwrap_or_else(|e| {
                eprintln!("Warning: Could not load Snake.toml ({}), using hardcoded defaults", e);
                Self::default_hardcoded()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_can_be_created() {
        let config = Config::default_hardcoded();
        assert_eq!(config.engine.strategy, "influence");
        assert_eq!(config.engine.decay, DecayModel::Hops);
        assert_eq!(config.features.space, Feature { weight: 5.0, scale: 2 });
        assert_eq!(config.safety.dead_end_penalty, -200.0);
    }

    #[test]
    fn test_snake_toml_can_be_parsed() {
        // This test ensures Snake.toml is valid and can be parsed
        let result = Config::from_file("Snake.toml");
        assert!(
            result.is_ok(),
            "Failed to parse Snake.toml: {:?}",
            result.err()
        );
    }

    #[test]
    fn test_all_config_values_match_hardcoded_defaults() {
        let file_config = Config::from_file("Snake.toml")
            .expect("Snake.toml should be parseable");
        let hardcoded_config = Config::default_hardcoded();

        // Engine
        assert_eq!(file_config.engine.strategy, hardcoded_config.engine.strategy);
        assert_eq!(file_config.engine.decay, hardcoded_config.engine.decay);

        // Features
        assert_eq!(file_config.features.space, hardcoded_config.features.space);
        assert_eq!(file_config.features.head, hardcoded_config.features.head);
        assert_eq!(file_config.features.weak_head, hardcoded_config.features.weak_head);
        assert_eq!(file_config.features.body, hardcoded_config.features.body);
        assert_eq!(file_config.features.own_body, hardcoded_config.features.own_body);
        assert_eq!(file_config.features.tail, hardcoded_config.features.tail);
        assert_eq!(file_config.features.race_food, hardcoded_config.features.race_food);

        // Hunger
        assert_eq!(file_config.hunger.starving_below, hardcoded_config.hunger.starving_below);
        assert_eq!(file_config.hunger.starving, hardcoded_config.hunger.starving);
        assert_eq!(file_config.hunger.hungry_below, hardcoded_config.hunger.hungry_below);
        assert_eq!(file_config.hunger.hungry, hardcoded_config.hunger.hungry);
        assert_eq!(file_config.hunger.sated, hardcoded_config.hunger.sated);
        assert_eq!(
            file_config.hunger.growth_spurt_factor,
            hardcoded_config.hunger.growth_spurt_factor
        );
        assert_eq!(file_config.hunger.growth_factor, hardcoded_config.hunger.growth_factor);

        // Safety
        assert_eq!(
            file_config.safety.dead_end_penalty,
            hardcoded_config.safety.dead_end_penalty
        );

        // Log
        assert_eq!(
            file_config.log.decisions_enabled,
            hardcoded_config.log.decisions_enabled
        );
        assert_eq!(file_config.log.decisions_path, hardcoded_config.log.decisions_path);
    }

    #[test]
    fn test_hunger_tiers_are_ordered() {
        let config = Config::default_hardcoded();
        assert!(config.hunger.starving_below < config.hunger.hungry_below);
        assert!(config.hunger.starving.weight > config.hunger.hungry.weight);
        assert!(config.hunger.hungry.weight > config.hunger.sated.weight);
    }

    #[test]
    fn test_load_or_default_works() {
        // This should succeed with the actual file
        let config = Config::load_or_default();
        assert_eq!(config.hunger.starving_below, 30);
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        // Test with a non-existent file
        let result = Config::from_file("nonexistent.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_decay_model_parses_lowercase_names() {
        #[derive(Deserialize)]
        struct Probe {
            decay: DecayModel,
        }
        let hops: Probe = toml::from_str("decay = \"hops\"").unwrap();
        assert_eq!(hops.decay, DecayModel::Hops);
        let euclid: Probe = toml::from_str("decay = \"euclidean\"").unwrap();
        assert_eq!(euclid.decay, DecayModel::Euclidean);
        assert!(toml::from_str::<Probe>("decay = \"manhattan\"").is_err());
    }
}
