//! Infrastructure layer - concrete implementations of domain ports

pub mod output;
pub mod templates;

pub use output::*;
pub use templates::*;
