//! penlab - scaffold pentesting project directories from YAML templates
//!
//! The crate is layered the same way the binary uses it:
//! - [`core`]: configuration, paths and the shared error type
//! - [`generation`]: sanitizing, containment checks, variables and the materializer
//! - [`infrastructure`]: template repository and filesystem output
//! - [`application`]: the use cases driven by the CLI
#![deny(unsafe_code)]

pub mod application;
pub mod core;
pub mod generation;
pub mod infrastructure;
