use crate::heuristic;
use crate::strategy::Strategy;
use crate::utils::check_num;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{fs, ops::Range, path::Path};

/// Model configuration parameters.
///
/// Loaded from a TOML file and validated before use.
/// See [`Config::from_file`] for loading.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Seed of the random number generator, drawn from the OS if absent.
    #[serde(default)]
    pub seed: Option<u64>,

    pub landscape: LandscapeConfig,
    pub heuristics: HeuristicConfig,
    pub teams: TeamConfig,
    pub search: SearchConfig,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct LandscapeConfig {
    /// Number of positions on the ring.
    pub n: usize,
    /// Average distance between independently drawn values (0 disables smoothing).
    #[serde(default)]
    pub smoothness: usize,
    /// Lower bound of landscape values (inclusive).
    #[serde(default = "default_low")]
    pub low: f64,
    /// Upper bound of landscape values (exclusive).
    #[serde(default = "default_high")]
    pub high: f64,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct HeuristicConfig {
    /// Number of steps in each heuristic.
    pub k: usize,
    /// Largest step size.
    pub l: usize,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct TeamConfig {
    /// Number of agents in each team.
    pub n_agents: usize,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub strategy: Strategy,
    /// Hard cap on team passes per protocol run.
    #[serde(default)]
    pub max_passes: Option<usize>,
}

fn default_low() -> f64 {
    0.0
}

fn default_high() -> f64 {
    100.0
}

impl LandscapeConfig {
    pub fn range(&self) -> Range<f64> {
        self.low..self.high
    }
}

impl Config {
    /// Load a [`Config`] from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed,
    /// or if the configuration values are invalid.
    pub fn from_file<P: AsRef<Path>>(file: P) -> Result<Self> {
        let file = file.as_ref();
        let contents =
            fs::read_to_string(file).with_context(|| format!("failed to read {file:?}"))?;
        Self::from_toml_str(&contents).with_context(|| format!("failed to load {file:?}"))
    }

    /// Parse and validate a [`Config`] from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents).context("failed to deserialize config")?;
        cfg.validate().context("failed to validate config")?;
        Ok(cfg)
    }

    /// Check every parameter and the relations between them.
    pub fn validate(&self) -> Result<()> {
        check_num(self.landscape.n, 1..=10_000_000).context("invalid landscape length")?;
        check_num(self.landscape.smoothness, 0..=self.landscape.n)
            .context("invalid landscape smoothness")?;
        if !(self.landscape.low.is_finite() && self.landscape.high.is_finite()) {
            bail!("landscape value bounds must be finite");
        }
        if self.landscape.low >= self.landscape.high {
            bail!(
                "landscape lower bound {} must be below upper bound {}",
                self.landscape.low,
                self.landscape.high
            );
        }

        check_num(self.heuristics.l, 1..=1_000).context("invalid maximum step size")?;
        check_num(self.heuristics.k, 1..=self.heuristics.l)
            .context("invalid number of steps per heuristic")?;
        let n_heu = heuristic::count(self.heuristics.k, self.heuristics.l);
        check_num(n_heu, 1..=10_000_000).context("invalid number of heuristics")?;

        check_num(self.teams.n_agents as u128, 1..=n_heu).context("invalid number of agents")?;

        if let Some(max_passes) = self.search.max_passes {
            check_num(max_passes, 1..).context("invalid maximum number of passes")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"
seed = 42

[landscape]
n = 10
smoothness = 0

[heuristics]
k = 1
l = 3

[teams]
n_agents = 2

[search]
strategy = "tournament"
"#;

    #[test]
    fn parses_config_with_defaults() {
        let cfg = Config::from_toml_str(CONFIG).unwrap();
        assert_eq!(cfg.seed, Some(42));
        assert_eq!(cfg.landscape.range(), 0.0..100.0);
        assert_eq!(cfg.heuristics.l, 3);
        assert_eq!(cfg.search.strategy, Strategy::Tournament);
        assert_eq!(cfg.search.max_passes, None);
    }

    #[test]
    fn rejects_more_steps_than_step_sizes() {
        let contents = CONFIG.replace("k = 1", "k = 4");
        let err = Config::from_toml_str(&contents).unwrap_err();
        assert!(format!("{err:#}").contains("invalid number of steps per heuristic"));
    }

    #[test]
    fn rejects_teams_larger_than_heuristic_space() {
        let contents = CONFIG.replace("n_agents = 2", "n_agents = 4");
        let err = Config::from_toml_str(&contents).unwrap_err();
        assert!(format!("{err:#}").contains("invalid number of agents"));
    }

    #[test]
    fn rejects_empty_landscape_and_unknown_strategy() {
        assert!(Config::from_toml_str(&CONFIG.replace("n = 10", "n = 0")).is_err());
        assert!(Config::from_toml_str(&CONFIG.replace("\"tournament\"", "\"sprint\"")).is_err());
    }
}
