//! Simulation of the Hong & Page (2004) and Grim et al. (2019) landscape search models.
//!
//! Teams of agents, each holding a heuristic made of a few step sizes, hill
//! climb over a circular landscape of random values. A "best" team made of the
//! individually highest scoring heuristics is compared with a "random" team,
//! searching either in relay (agents hand over their position one after
//! another) or in tournament (agents search independently and the team keeps
//! the best result).

pub mod config;
pub mod engine;
pub mod heuristic;
pub mod landscape;
pub mod model;
pub mod search;
pub mod stats;
pub mod strategy;
pub mod utils;

pub use config::Config;
pub use engine::{Engine, Results, Status};
pub use strategy::Strategy;
