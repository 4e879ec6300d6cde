//! Agents, teams and team construction.

use crate::heuristic::{self, Heuristic, ScoredHeuristic};
use crate::stats::Accumulator;
use anyhow::{Result, bail};
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Team label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TeamKind {
    /// Members drawn uniformly from all heuristics.
    Random,
    /// Members with the highest individual scores.
    Best,
}

impl TeamKind {
    pub fn name(self) -> &'static str {
        match self {
            TeamKind::Random => "random",
            TeamKind::Best => "best",
        }
    }
}

impl fmt::Display for TeamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Problem solver with a fixed heuristic.
#[derive(Debug, Clone)]
pub struct Agent {
    team: TeamKind,
    heuristic: Heuristic,

    /// Position where the agent's last climb ended.
    pub focus: usize,
    /// Value found at `focus`.
    pub best_solution: f64,
}

impl Agent {
    pub fn new(team: TeamKind, heuristic: Heuristic) -> Self {
        Self {
            team,
            heuristic,
            focus: 0,
            best_solution: 0.0,
        }
    }

    pub fn team(&self) -> TeamKind {
        self.team
    }

    pub fn heuristic(&self) -> &Heuristic {
        &self.heuristic
    }

    pub fn reset(&mut self) {
        self.focus = 0;
        self.best_solution = 0.0;
    }
}

/// Descriptive statistics of a team, frozen once the team is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Descriptives {
    /// Lowest score over all heuristics.
    pub worst_agent: f64,
    /// Mean score over all heuristics.
    pub average_agent: f64,
    /// Highest score over all heuristics.
    pub top_agent: f64,
    /// Mean score of the team members.
    pub team_average: f64,
    /// Mean positional diversity over pairs of team members.
    pub diversity: f64,
    /// Share of step sizes used by at least one member.
    pub coverage: f64,
}

#[derive(Debug, Clone)]
pub struct Team {
    kind: TeamKind,
    agt_vec: Vec<Agent>,
    descriptives: Descriptives,
}

impl Team {
    pub fn kind(&self) -> TeamKind {
        self.kind
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agt_vec
    }

    pub fn agents_mut(&mut self) -> &mut [Agent] {
        &mut self.agt_vec
    }

    pub fn descriptives(&self) -> &Descriptives {
        &self.descriptives
    }

    pub fn reset_agents(&mut self) {
        self.agt_vec.iter_mut().for_each(Agent::reset);
    }
}

/// Build the random team and the best team, in that order.
///
/// The best team takes the `n_agt` highest scores, earlier heuristics winning
/// ties. The random team samples `n_agt` heuristics without replacement.
///
/// # Errors
/// Returns an error if `n_agt` is zero or exceeds the number of heuristics.
pub fn build_teams<R: Rng + ?Sized>(
    scored: &[ScoredHeuristic],
    n_agt: usize,
    l: usize,
    rng: &mut R,
) -> Result<Vec<Team>> {
    let n_heu = scored.len();
    if n_agt == 0 {
        bail!("teams must have at least one agent");
    }
    if n_agt > n_heu {
        bail!("team size {n_agt} exceeds the number of available heuristics {n_heu}");
    }

    let scores: Accumulator = scored.iter().map(|sh| sh.score).collect();
    let worst_agent = scored.iter().map(|sh| sh.score).fold(f64::INFINITY, f64::min);
    let top_agent = scored.iter().map(|sh| sh.score).fold(f64::NEG_INFINITY, f64::max);
    let average_agent = scores.mean();

    let random: Vec<&ScoredHeuristic> = scored.choose_multiple(rng, n_agt).collect();

    let mut ranked: Vec<&ScoredHeuristic> = scored.iter().collect();
    // Stable sort keeps enumeration order among equal scores.
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked.truncate(n_agt);

    let team_vec = [(TeamKind::Random, random), (TeamKind::Best, ranked)]
        .into_iter()
        .map(|(kind, members)| {
            let heu_vec: Vec<&Heuristic> = members.iter().map(|sh| &sh.heuristic).collect();
            let team_scores: Accumulator = members.iter().map(|sh| sh.score).collect();
            let descriptives = Descriptives {
                worst_agent,
                average_agent,
                top_agent,
                team_average: team_scores.mean(),
                diversity: heuristic::mean_diversity(&heu_vec),
                coverage: heuristic::coverage(&heu_vec, l),
            };
            let agt_vec = members
                .iter()
                .map(|sh| Agent::new(kind, sh.heuristic.clone()))
                .collect();
            Team {
                kind,
                agt_vec,
                descriptives,
            }
        })
        .collect();

    Ok(team_vec)
}
