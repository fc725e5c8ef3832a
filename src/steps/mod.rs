//! Cucumber step definitions: the BDD surface of the crate.
//!
//! Each submodule binds one domain's step patterns to its world. Steps
//! stay thin: they convert arguments, delegate to world methods, and
//! return the fallible-step result so the runner reports error messages.

mod file;
mod http;
