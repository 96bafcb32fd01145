//! Generation domain module - turns a template tree into a project on disk
//!
//! Names are substituted and sanitized, every resulting path is checked to
//! stay inside the directory it is created in, and each node yields exactly
//! one [`Outcome`].

pub mod containment;
pub mod materializer;
pub mod sanitizers;
pub mod traits;
pub mod types;
pub mod variables;

pub use materializer::{Materializer, materialize, materialize_template};
pub use traits::*;
pub use types::*;
pub use variables::{VariableInputs, VariableSet, resolve_variable};
