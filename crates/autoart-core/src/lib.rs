//! Core types and utilities for the AutoArt random-program engine.

pub mod types;
pub mod config;
pub mod error;
pub mod probe;

pub use error::{Error, Result};
pub use types::*;
pub use config::*;
pub use probe::*;
