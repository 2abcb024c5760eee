use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{fmt::Debug, fs, ops::RangeBounds, path::Path};

/// Simulation configuration parameters.
///
/// Loaded from a TOML file and validated before use.
/// See [`Config::from_file`] for loading.
#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub grid: GridConfig,
    pub init: InitConfig,
    pub model: ModelConfig,
    pub run: RunConfig,
}

/// Landscape dimensions.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridConfig {
    /// Number of columns, the last one being the settlement column.
    pub width: usize,
    /// Number of rows.
    pub height: usize,
}

/// Initial landscape densities.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InitConfig {
    /// Probability of a forest cell holding a tree.
    pub forest_density: f64,
    /// Probability of a settlement cell holding a house.
    pub house_density: f64,
}

/// Fire dynamics.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelConfig {
    /// Probability of a lightning strike per generation.
    pub prob_lightning: f64,
    /// Probability of a tree resisting a burning neighbor.
    pub prob_tree_immune: f64,
    /// Probability of a house resisting a burning neighbor.
    pub prob_house_immune: f64,
    /// Last burn stage before a cell clears.
    pub time_to_burn: u32,
    /// Which burning neighbors spread fire.
    pub spread: SpreadRule,
}

/// Run length and output options.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Number of generations, including generation 0.
    pub n_gen: usize,
    /// Random seed; drawn from the OS when absent.
    pub seed: Option<u64>,
    /// Retain every generation instead of only the measured one.
    pub keep_history: bool,
}

/// Burning neighbors that can ignite a cell.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpreadRule {
    /// A neighbor burning at any stage.
    #[default]
    AnyStage,
    /// Only a neighbor that ignited in the previous generation.
    IgnitionOnly,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 50,
            height: 50,
        }
    }
}

impl Default for InitConfig {
    fn default() -> Self {
        Self {
            forest_density: 0.5,
            house_density: 0.4,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            prob_lightning: 0.1,
            prob_tree_immune: 0.25,
            prob_house_immune: 0.5,
            time_to_burn: 3,
            spread: SpreadRule::AnyStage,
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            n_gen: 200,
            seed: None,
            keep_history: false,
        }
    }
}

impl Config {
    /// Load a [`Config`] from a file.
    ///
    /// The file must be TOML-encoded; missing fields take their default values.
    /// Performs validation on all parameters before returning.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, deserialized,
    /// or if the configuration values are invalid.
    pub fn from_file<P: AsRef<Path>>(file: P) -> Result<Self> {
        let file = file.as_ref();
        let contents =
            fs::read_to_string(file).with_context(|| format!("failed to read {file:?}"))?;

        let config = Self::from_toml(&contents)?;

        Ok(config)
    }

    /// Parse and validate a [`Config`] from a TOML string.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents).context("failed to deserialize config")?;

        config.validate().context("failed to validate config")?;

        Ok(config)
    }

    /// Serialize the configuration back to TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string(self).context("failed to serialize config")
    }

    /// Check that every parameter lies in its admissible range.
    pub fn validate(&self) -> Result<()> {
        check_num(self.grid.width, 1..=10_000).context("invalid grid width")?;
        check_num(self.grid.height, 1..=10_000).context("invalid grid height")?;

        check_num(self.init.forest_density, 0.0..=1.0).context("invalid forest density")?;
        check_num(self.init.house_density, 0.0..=1.0).context("invalid house density")?;

        check_num(self.model.prob_lightning, 0.0..=1.0)
            .context("invalid lightning probability")?;
        check_num(self.model.prob_tree_immune, 0.0..=1.0)
            .context("invalid tree immunity probability")?;
        check_num(self.model.prob_house_immune, 0.0..=1.0)
            .context("invalid house immunity probability")?;
        check_num(self.model.time_to_burn, 1..=1_000).context("invalid time to burn")?;

        // The outcome is measured at generation n_gen - 2.
        check_num(self.run.n_gen, 2..=100_000).context("invalid number of generations")?;

        Ok(())
    }
}

fn check_num<T, R>(num: T, range: R) -> Result<()>
where
    T: PartialOrd + Debug,
    R: RangeBounds<T> + Debug,
{
    if !range.contains(&num) {
        bail!("number must be in the range {range:?}, but is {num:?}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = Config::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.grid.width, 50);
        assert_eq!(cfg.grid.height, 50);
        assert_eq!(cfg.run.n_gen, 200);
        assert_eq!(cfg.init.house_density, 0.4);
        assert_eq!(cfg.init.forest_density, 0.5);
        assert_eq!(cfg.model.prob_lightning, 0.1);
        assert_eq!(cfg.model.prob_tree_immune, 0.25);
        assert_eq!(cfg.model.prob_house_immune, 0.5);
        assert_eq!(cfg.model.time_to_burn, 3);
        assert!(!cfg.run.keep_history);
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let cfg = Config::from_toml(
            "[grid]\nwidth = 10\n\n[model]\nprob_lightning = 0.0\nspread = \"ignition_only\"\n",
        )
        .unwrap();
        assert_eq!(cfg.grid.width, 10);
        assert_eq!(cfg.grid.height, 50);
        assert_eq!(cfg.model.prob_lightning, 0.0);
        assert_eq!(cfg.model.spread, SpreadRule::IgnitionOnly);
        assert_eq!(cfg.run, RunConfig::default());
    }

    #[test]
    fn toml_round_trip_preserves_config() {
        let mut cfg = Config::default();
        cfg.run.seed = Some(17);
        let parsed = Config::from_toml(&cfg.to_toml().unwrap()).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn rejects_out_of_range_values() {
        let invalid = [
            "[init]\nforest_density = 1.5\n",
            "[init]\nhouse_density = -0.1\n",
            "[model]\nprob_tree_immune = 2.0\n",
            "[model]\nprob_lightning = nan\n",
            "[model]\ntime_to_burn = 0\n",
            "[grid]\nwidth = 0\n",
            "[grid]\nheight = 0\n",
            "[run]\nn_gen = 1\n",
        ];
        for contents in invalid {
            assert!(Config::from_toml(contents).is_err(), "accepted {contents:?}");
        }
    }

    #[test]
    fn rejects_unknown_fields() {
        assert!(Config::from_toml("[model]\nwind_speed = 3.0\n").is_err());
    }

    #[test]
    fn check_num_reports_range() {
        let error = check_num(5, 0..3).unwrap_err();
        assert_eq!(
            error.to_string(),
            "number must be in the range 0..3, but is 5"
        );
    }
}
