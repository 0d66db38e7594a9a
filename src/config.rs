use log::warn;
use serde::{Deserialize, Serialize};
use crate::crossword::CrosswordError;

/// Decides how a generator picks among the legal crossings of a word
#[derive(Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Default, Debug, Serialize, Deserialize)]
pub enum GenerationMode
{
    /// Prefer the placed word that shares the most letters with the new one, searched systematically
    #[default]
    #[serde(rename = "maxOverlap")]
    MaxOverlap,
    /// Take the first legal crossing, variety comes from seeded shuffles
    #[serde(rename = "random")]
    Random,
}

/// Bounds of the grid side length, the used size is `default` clamped into `min..=max`
#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSizeConfig
{
    pub default: usize,
    pub min: usize,
    pub max: usize,
}

impl Default for GridSizeConfig
{
    fn default() -> Self
    {
        GridSizeConfig { default: 15, min: 5, max: 30 }
    }
}

/// Settings of a [search](crate::search::SearchDriver)
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GenerationConfig
{
    pub mode: GenerationMode,
    /// Search many attempts for a layout with every word, otherwise a single attempt is made
    pub enforce_all_words: bool,
    pub max_attempts: usize,
    pub timeout_seconds: f64,
    /// Master seed of the random mode seeds, drawn from the thread rng when missing
    pub seed: Option<u64>,
    /// Also start from positions shifted around the center in max overlap mode
    pub explore_offsets: bool,
}

impl Default for GenerationConfig
{
    fn default() -> Self
    {
        GenerationConfig
        {
            mode: GenerationMode::default(),
            enforce_all_words: true,
            max_attempts: 1000,
            timeout_seconds: 10.0,
            seed: None,
            explore_offsets: true,
        }
    }
}

/// Represents all settings of a crossword generation
///
/// # Example
///
/// ```
/// # use crossword_layout::config::{CrosswordConfig, GenerationMode};
/// let config = CrosswordConfig::from_json(r#"{
///     "gridSize": { "default": 40, "min": 10, "max": 20 },
///     "generation": { "mode": "random", "maxAttempts": 50 }
/// }"#).unwrap();
///
/// assert_eq!(config.effective_grid_size(), 20);
/// assert_eq!(config.generation.mode, GenerationMode::Random);
/// assert!(config.generation.enforce_all_words);
/// ```
#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CrosswordConfig
{
    pub grid_size: GridSizeConfig,
    pub generation: GenerationConfig,
}

impl CrosswordConfig
{
    pub fn effective_grid_size(&self) -> usize
    {
        self.grid_size.default.clamp(self.grid_size.min, self.grid_size.max.max(self.grid_size.min))
    }

    /// # Errors
    ///
    /// [CrosswordError::InvalidGridSize] - `min` is zero or bigger than `max`
    /// [CrosswordError::InvalidGeneration] - no attempts allowed or the timeout is not a positive number
    pub fn validate(&self) -> Result<(), CrosswordError>
    {
        let GridSizeConfig { min, max, .. } = self.grid_size;
        if min == 0 || min > max { return Err(CrosswordError::InvalidGridSize { min, max }); }

        if self.generation.max_attempts == 0
        {
            return Err(CrosswordError::InvalidGeneration { reason: "maxAttempts must be positive".to_owned() });
        }
        if self.generation.timeout_seconds <= 0.0 || !self.generation.timeout_seconds.is_finite()
        {
            return Err(CrosswordError::InvalidGeneration { reason: format!("timeoutSeconds must be a positive number, got {}", self.generation.timeout_seconds) });
        }

        Ok(())
    }

    /// Parses and validates a JSON configuration, missing fields get their default values
    pub fn from_json(json: &str) -> Result<CrosswordConfig, CrosswordError>
    {
        let config: CrosswordConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Same as [CrosswordConfig::from_json], but falls back to the default configuration on any error
    pub fn from_json_or_default(json: &str) -> CrosswordConfig
    {
        CrosswordConfig::from_json(json).unwrap_or_else(|err|
        {
            warn!("using the default configuration: {err}");
            CrosswordConfig::default()
        })
    }
}


#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = CrosswordConfig::default();

        assert!(config.validate().is_ok());
        assert_eq!(config.effective_grid_size(), 15);
        assert_eq!(config.generation.mode, GenerationMode::MaxOverlap);
    }

    #[test]
    fn test_effective_grid_size_clamps() {
        let mut config = CrosswordConfig::default();
        config.grid_size = GridSizeConfig { default: 3, min: 8, max: 12 };
        assert_eq!(config.effective_grid_size(), 8);

        config.grid_size.default = 10;
        assert_eq!(config.effective_grid_size(), 10);
    }

    #[test]
    fn test_from_json_field_names() {
        let config = CrosswordConfig::from_json(r#"{
            "generation": { "mode": "maxOverlap", "enforceAllWords": false, "timeoutSeconds": 2.5, "seed": 9, "exploreOffsets": false }
        }"#).unwrap();

        assert!(!config.generation.enforce_all_words);
        assert_eq!(config.generation.timeout_seconds, 2.5);
        assert_eq!(config.generation.seed, Some(9));
        assert!(!config.generation.explore_offsets);
        assert_eq!(config.generation.max_attempts, 1000);
        assert_eq!(config.grid_size, GridSizeConfig::default());
    }

    #[test]
    fn test_from_json_rejects_invalid() {
        assert!(matches!(CrosswordConfig::from_json("{ not json"), Err(CrosswordError::Config(_))));
        assert!(matches!(CrosswordConfig::from_json(r#"{ "gridSize": { "min": 20, "max": 10 } }"#), Err(CrosswordError::InvalidGridSize { min: 20, max: 10 })));
        assert!(matches!(CrosswordConfig::from_json(r#"{ "generation": { "maxAttempts": 0 } }"#), Err(CrosswordError::InvalidGeneration { .. })));
        assert!(matches!(CrosswordConfig::from_json(r#"{ "generation": { "timeoutSeconds": -1 } }"#), Err(CrosswordError::InvalidGeneration { .. })));
        assert!(matches!(CrosswordConfig::from_json(r#"{ "generation": { "mode": "greedy" } }"#), Err(CrosswordError::Config(_))));
    }

    #[test]
    fn test_from_json_or_default() {
        assert_eq!(CrosswordConfig::from_json_or_default("not json"), CrosswordConfig::default());
        assert_eq!(CrosswordConfig::from_json_or_default(r#"{ "gridSize": { "default": 12 } }"#).effective_grid_size(), 12);
    }
}
