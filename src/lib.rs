//! OddsForge probability engine.
//!
//! Turns season form and head-to-head history into 1X2, Over/Under and BTTS
//! estimates plus ranked suggestions. The engine itself is pure; the `api`
//! and `cli` modules are thin adapters around it.

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use config::EngineConfig;
pub use error::{ConfigError, EngineError};
pub use services::EstimationEngine;
