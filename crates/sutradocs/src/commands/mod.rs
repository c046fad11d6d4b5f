//! CLI command implementations.

pub mod build;
pub mod check;
pub mod config;
pub mod dev;
pub mod init;
pub mod serve;
