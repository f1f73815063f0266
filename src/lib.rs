//! Dotfiles linker.
//!
//! Scans a dotfiles repository, computes the set of links the home
//! directory should contain, and reconciles the filesystem against the
//! links recorded from previous runs. Removals only ever touch links
//! the tool itself created.

pub mod cache;
pub mod cli;
pub mod commands;
pub mod config;
pub mod consts;
pub mod engine;
pub mod error;
pub mod exec;
pub mod fsops;
pub mod glob;
pub mod hooks;
pub mod linkmode;
pub mod logging;
pub mod paths;
pub mod prompt;
