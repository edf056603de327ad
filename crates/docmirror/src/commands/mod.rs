//! CLI commands.

pub mod build;
pub mod deploy;
pub mod init;
