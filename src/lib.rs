//! Stochastic simulation of wildfire spreading through a forest towards a row of houses.
//!
//! A [`Grid`] of [`Cell`]s is generated by [`initialize`] and advanced one
//! generation at a time by [`advance`]; [`run`] chains both and reports the
//! fraction of houses lost, see [`fraction_houses_burned`].

pub mod analysis;
pub mod config;
pub mod engine;
pub mod manager;
pub mod model;
pub mod stats;
pub mod sweep;

pub use analysis::fraction_houses_burned;
pub use config::{Config, SpreadRule};
pub use engine::{Outcome, advance, initialize, run, run_from};
pub use model::{Category, Cell, Grid, History};
pub use sweep::{SweepParam, sweep};
