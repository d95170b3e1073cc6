//! Launchpad: Pipeline Launcher
//!
//! Browses a production hierarchy (project, silo, asset, task) held in a document
//! store, resolves the environment of the current position and launches
//! applications in it, supervising the processes it starts.

pub mod action;
pub mod cli;
pub mod config;
pub mod demo;
pub mod environment;
pub mod error;
pub mod frame;
pub mod logging;
pub mod model;
pub mod navigation;
pub mod process;
pub mod session;
pub mod store;
pub mod types;
