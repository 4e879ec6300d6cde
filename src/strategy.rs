//! Team search strategies.
//!
//! A run visits every position of the landscape as the starting point of one
//! round. Within a round each team repeatedly lets its agents climb from the
//! team's shared position until a full pass of the team leaves the shared
//! value unchanged. The two protocols differ only in when agents see each
//! other's results:
//!
//! - relay: agents climb one after another, each starting where the previous
//!   one left the team;
//! - tournament: all agents climb from the same position and the team then
//!   moves to the best result of the pass.

use crate::landscape::Landscape;
use crate::model::{Team, TeamKind};
use crate::search::{Climb, climb};
use crate::stats::{Accumulator, AccumulatorReport};
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Strategy requested for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Relay,
    Tournament,
    /// Relay first, then tournament from a clean state.
    Both,
}

impl Strategy {
    /// Protocols to run, in order.
    pub fn protocols(self) -> &'static [Protocol] {
        match self {
            Strategy::Relay => &[Protocol::Relay],
            Strategy::Tournament => &[Protocol::Tournament],
            Strategy::Both => &[Protocol::Relay, Protocol::Tournament],
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::Relay => "relay",
            Strategy::Tournament => "tournament",
            Strategy::Both => "both",
        };
        f.write_str(name)
    }
}

/// How the agents of a team share results within a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Relay,
    Tournament,
}

impl Protocol {
    pub fn name(self) -> &'static str {
        match self {
            Protocol::Relay => "relay",
            Protocol::Tournament => "tournament",
        }
    }
}

/// Shared position and value of a team.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TeamState {
    pub position: usize,
    pub value: f64,
}

impl TeamState {
    /// State of a team placed at `start`.
    pub fn at(landscape: &Landscape, start: usize) -> Self {
        Self {
            position: start % landscape.len(),
            value: landscape.get(start),
        }
    }
}

/// Round values of one team.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamOutcome {
    pub kind: TeamKind,
    pub round_vals: Vec<f64>,
}

impl TeamOutcome {
    /// Mean value over all recorded rounds.
    pub fn mean(&self) -> f64 {
        self.round_vals.iter().copied().collect::<Accumulator>().mean()
    }

    pub fn report(&self) -> AccumulatorReport {
        self.round_vals.iter().copied().collect::<Accumulator>().report()
    }
}

/// Result of running one protocol over all starting positions.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub protocol: Protocol,
    pub team_outcomes: Vec<TeamOutcome>,
    /// Whether the pass budget ran out before every round finished.
    pub truncated: bool,
}

/// How a round ended for one team.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundEnd {
    /// A full pass left the team value unchanged.
    Converged,
    /// The budget ran out after at least one pass.
    Interrupted,
    /// The budget was already empty, the team did not search.
    Skipped,
}

/// Remaining number of passes a team may perform.
#[derive(Debug, Clone, Copy)]
pub struct PassBudget {
    remaining: Option<usize>,
}

impl PassBudget {
    pub fn new(max_passes: Option<usize>) -> Self {
        Self {
            remaining: max_passes,
        }
    }

    pub fn unlimited() -> Self {
        Self { remaining: None }
    }

    /// Consume one pass, returning `false` once the budget is exhausted.
    fn take(&mut self) -> bool {
        match &mut self.remaining {
            None => true,
            Some(0) => false,
            Some(remaining) => {
                *remaining -= 1;
                true
            }
        }
    }
}

/// Run `protocol` for every team over every starting position.
///
/// Agents are reset before the run. Each round places every team at the
/// starting position and records the value the team converges to. Every team
/// gets its own budget of `max_passes`. Once a budget runs out the run stops
/// after that round, which is kept only if every team searched in it, so all
/// teams always report the same rounds.
pub fn run(
    protocol: Protocol,
    landscape: &Landscape,
    team_vec: &mut [Team],
    max_passes: Option<usize>,
) -> Result<Outcome> {
    let n = landscape.len();
    log::info!("starting {} search over {n} rounds", protocol.name());

    for team in team_vec.iter_mut() {
        team.reset_agents();
    }
    let mut team_outcomes: Vec<_> = team_vec
        .iter()
        .map(|team| TeamOutcome {
            kind: team.kind(),
            round_vals: Vec::with_capacity(n),
        })
        .collect();

    let mut budget_vec = vec![PassBudget::new(max_passes); team_vec.len()];
    let progress_every = (n / 10).max(1);
    let mut truncated = false;

    for start in 0..n {
        let mut round_vals = Vec::with_capacity(team_vec.len());
        let mut round_ends = Vec::with_capacity(team_vec.len());
        for (team, budget) in team_vec.iter_mut().zip(budget_vec.iter_mut()) {
            let mut state = TeamState::at(landscape, start);
            let end = run_round(protocol, landscape, team, &mut state, budget)
                .with_context(|| format!("failed to run round {start} for {} team", team.kind()))?;
            round_vals.push(state.value);
            round_ends.push(end);
        }

        if round_ends.contains(&RoundEnd::Skipped) {
            log::warn!("pass budget exhausted after {start} of {n} rounds, reporting partial means");
            truncated = true;
            break;
        }
        log::debug!("round {start}: {round_vals:?}");
        for (team_outcome, val) in team_outcomes.iter_mut().zip(round_vals) {
            team_outcome.round_vals.push(val);
        }
        if round_ends.contains(&RoundEnd::Interrupted) {
            log::warn!(
                "pass budget exhausted during round {} of {n}, reporting partial means",
                start + 1
            );
            truncated = true;
            break;
        }
        if (start + 1) % progress_every == 0 || start + 1 == n {
            let progress = 100.0 * (start + 1) as f64 / n as f64;
            log::info!("completed {progress:06.2}%");
        }
    }

    Ok(Outcome {
        protocol,
        team_outcomes,
        truncated,
    })
}

/// Drive one team to convergence from `state`.
///
/// If the budget runs out first, `state` keeps the best state reached so far.
///
/// # Errors
/// Returns an error if the team keeps improving for more passes than the
/// landscape has distinct values.
pub fn run_round(
    protocol: Protocol,
    landscape: &Landscape,
    team: &mut Team,
    state: &mut TeamState,
    budget: &mut PassBudget,
) -> Result<RoundEnd> {
    // Every pass but the last strictly raises the team value.
    let max_passes = landscape.len() + 1;
    for i_pass in 0..max_passes {
        if !budget.take() {
            let end = if i_pass == 0 {
                RoundEnd::Skipped
            } else {
                RoundEnd::Interrupted
            };
            return Ok(end);
        }
        let old_value = state.value;
        match protocol {
            Protocol::Relay => relay_pass(landscape, team, state)?,
            Protocol::Tournament => tournament_pass(landscape, team, state)?,
        }
        if state.value == old_value {
            return Ok(RoundEnd::Converged);
        }
    }

    bail!(
        "invariant violation: {} team did not converge within {max_passes} passes",
        team.kind()
    )
}

/// Agents climb in order, each continuing from the team state the previous one left.
fn relay_pass(landscape: &Landscape, team: &mut Team, state: &mut TeamState) -> Result<()> {
    for agt in team.agents_mut() {
        let result = climb(landscape, state.position, agt.heuristic().steps())?;
        agt.focus = result.position;
        agt.best_solution = result.value;
        state.position = result.position;
        state.value = result.value;
    }
    Ok(())
}

/// Agents climb from the same state, then the team adopts the best result.
fn tournament_pass(landscape: &Landscape, team: &mut Team, state: &mut TeamState) -> Result<()> {
    let start = state.position;
    let results = team
        .agents()
        .iter()
        .map(|agt| climb(landscape, start, agt.heuristic().steps()))
        .collect::<Result<Vec<Climb>>>()?;

    let mut best: Option<Climb> = None;
    for (agt, result) in team.agents_mut().iter_mut().zip(&results) {
        agt.focus = result.position;
        agt.best_solution = result.value;
        if best.is_none_or(|best| result.value > best.value) {
            best = Some(*result);
        }
    }

    if let Some(best) = best {
        state.position = best.position;
        state.value = best.value;
    }
    Ok(())
}
