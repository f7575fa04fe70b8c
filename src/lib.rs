pub mod archive;
pub mod cli;
pub mod clock;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod metadata;
pub mod pipeline;
pub mod tasks;
pub mod ui;
pub mod version;

#[cfg(test)]
mod testing;

pub use error::{GitPackageError, Result};
