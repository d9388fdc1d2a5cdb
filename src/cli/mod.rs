//! Command-line interface

pub mod args;
pub mod commands;
pub mod helpers;

pub use args::{Cli, Commands, GlobalArgs};
