//! Encore console front end
//!
//! Configuration loading, a terminal presenter and a simulated voice gateway
//! for driving playback sessions from the command line.

pub mod config;
pub mod console;
pub mod error;
pub mod simulator;

pub use config::{AppConfig, SimulatorSettings};
pub use console::ConsolePresenter;
pub use error::{CliError, Result};
pub use simulator::{SimulatedEngine, SimulatedGateway};
