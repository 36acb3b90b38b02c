//! Directive resolution and command assembly for TeXbuild.
//!
//! This crate reads a document's first-line directives, follows master
//! redirections, merges the result with the configured defaults, and builds
//! the command lines to run (see [`pipeline::resolve_build`]). It never runs
//! anything itself.

pub mod assembler;
pub mod defaults;
pub mod directive;
pub mod master;
pub mod pipeline;

pub use pipeline::{BuildOutcome, resolve_build};
