//! CLI command implementations.
//!
//! Each subcommand has its own module with a `run` entry point returning
//! [`CliError`](crate::error::CliError) on failure.
//!
//! # Command Modules
//!
//! - [`check`] - Update checking against remote releases
//! - [`config`] - Configuration management (get, set, list, path, init)
//! - [`install`] - Asset installation from downloaded files
//! - [`list`] - Installed asset listing

pub mod check;
pub mod common;
pub mod config;
pub mod install;
pub mod list;
