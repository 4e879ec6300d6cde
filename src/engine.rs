use crate::config::Config;
use crate::heuristic;
use crate::landscape::Landscape;
use crate::model::{Descriptives, Team, TeamKind, build_teams};
use crate::strategy::{self, Strategy};
use anyhow::{Context, Result, bail};
use rand::prelude::*;
use rand_chacha::ChaCha12Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Lifecycle of an [`Engine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Teams are built, the search has not started.
    Idle,
    /// The search is in progress.
    Running,
    /// The search has finished and results are final.
    Converged,
    /// The search stopped with an error, results keep their initial values.
    Failed,
}

/// Values exported after a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Results {
    /// Highest value on the landscape.
    pub optimal_solution: f64,
    /// Descriptive statistics per team.
    pub agent_descriptives: BTreeMap<String, Descriptives>,
    /// Mean value reached per team, prefixed by protocol when both were run.
    pub best_solution: BTreeMap<String, f64>,
}

/// Simulation engine.
///
/// Holds the configuration, landscape and teams of one model instance. All
/// randomness comes from a single generator seeded at construction, where
/// every draw happens, so two engines built from the same seeded
/// configuration produce identical results.
pub struct Engine {
    cfg: Config,
    landscape: Landscape,
    team_vec: Vec<Team>,
    status: Status,
    best_solution: BTreeMap<String, f64>,
}

impl Engine {
    /// Validate `cfg`, draw the landscape, score all heuristics and build the teams.
    pub fn new(cfg: Config) -> Result<Self> {
        cfg.validate().context("failed to validate config")?;

        let mut rng = match cfg.seed {
            Some(seed) => ChaCha12Rng::seed_from_u64(seed),
            None => ChaCha12Rng::try_from_os_rng()?,
        };

        let landscape = Landscape::generate(
            cfg.landscape.n,
            cfg.landscape.smoothness,
            cfg.landscape.range(),
            &mut rng,
        )
        .context("failed to generate landscape")?;
        log::info!(
            "generated landscape of {} values with maximum {:.4}",
            landscape.len(),
            landscape.max()
        );

        let heu_vec = heuristic::enumerate(cfg.heuristics.k, cfg.heuristics.l);
        log::info!("scoring {} heuristics", heu_vec.len());
        let scored =
            heuristic::score_all(heu_vec, &landscape).context("failed to score heuristics")?;

        let team_vec = build_teams(&scored, cfg.teams.n_agents, cfg.heuristics.l, &mut rng)
            .context("failed to build teams")?;
        for team in &team_vec {
            log::info!("{} team: {:?}", team.kind(), team.descriptives());
        }

        let best_solution = team_vec
            .iter()
            .map(|team| (team.kind().name().to_string(), 0.0))
            .collect();

        Ok(Self {
            cfg,
            landscape,
            team_vec,
            status: Status::Idle,
            best_solution,
        })
    }

    /// Run the whole search once.
    ///
    /// Every protocol of the configured strategy is run over all starting
    /// positions and the mean team values are stored. The engine is finished
    /// afterwards.
    ///
    /// # Errors
    /// Returns an error if the engine has already run or if the search breaks
    /// one of its convergence invariants.
    pub fn step(&mut self) -> Result<()> {
        if self.status != Status::Idle {
            bail!("engine has already run");
        }
        self.status = Status::Running;

        let search = self.search();
        self.finish(search)
    }

    /// Store the outcome of the search and leave the running state.
    fn finish(&mut self, search: Result<BTreeMap<String, f64>>) -> Result<()> {
        match search {
            Ok(best_solution) => {
                self.best_solution = best_solution;
                self.status = Status::Converged;
                Ok(())
            }
            Err(error) => {
                self.status = Status::Failed;
                Err(error)
            }
        }
    }

    fn search(&mut self) -> Result<BTreeMap<String, f64>> {
        let strategy = self.cfg.search.strategy;
        log::info!("running {strategy} strategy");
        let mut best_solution = BTreeMap::new();
        for &protocol in strategy.protocols() {
            let outcome = strategy::run(
                protocol,
                &self.landscape,
                &mut self.team_vec,
                self.cfg.search.max_passes,
            )
            .with_context(|| format!("failed to run {} search", protocol.name()))?;

            for team_outcome in &outcome.team_outcomes {
                let key = match strategy {
                    Strategy::Both => format!("{}_{}", outcome.protocol.name(), team_outcome.kind),
                    _ => team_outcome.kind.to_string(),
                };
                let report = team_outcome.report();
                log::info!(
                    "{key}: mean {:.4}, std dev {:.4} over {} rounds",
                    report.mean,
                    report.std_dev,
                    team_outcome.round_vals.len()
                );
                best_solution.insert(key, team_outcome.mean());
            }
        }
        log::info!("best solution: {best_solution:?}");

        Ok(best_solution)
    }

    /// Whether the engine still has work to do.
    pub fn is_running(&self) -> bool {
        matches!(self.status, Status::Idle | Status::Running)
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn landscape(&self) -> &Landscape {
        &self.landscape
    }

    pub fn teams(&self) -> &[Team] {
        &self.team_vec
    }

    pub fn team(&self, kind: TeamKind) -> Option<&Team> {
        self.team_vec.iter().find(|team| team.kind() == kind)
    }

    pub fn agent_descriptives(&self) -> BTreeMap<String, Descriptives> {
        self.team_vec
            .iter()
            .map(|team| (team.kind().name().to_string(), team.descriptives().clone()))
            .collect()
    }

    pub fn best_solution(&self) -> &BTreeMap<String, f64> {
        &self.best_solution
    }

    pub fn results(&self) -> Results {
        Results {
            optimal_solution: self.landscape.max(),
            agent_descriptives: self.agent_descriptives(),
            best_solution: self.best_solution.clone(),
        }
    }
}
