//! Core building blocks shared by every layer: errors, configuration and
//! small value helpers.

pub mod config;
pub mod error;
pub mod utils;

pub use config::{GlobalConfig, PenlabPaths};
pub use error::{Error, Result};
