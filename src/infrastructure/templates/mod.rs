//! Template documents: typed model, validation and the filesystem repository

pub mod errors;
pub mod filesystem_loader;
pub mod manifest;
pub mod traits;
pub mod types;
pub mod validation;

pub use errors::*;
pub use filesystem_loader::*;
pub use manifest::{parse_template_yaml, template_from_value};
pub use traits::*;
pub use types::*;
pub use validation::*;
