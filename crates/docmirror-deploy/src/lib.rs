//! Clone, build and publish pipeline for mirrored documentation sites.
//!
//! A run checks out an upstream docs repository into a scoped workspace,
//! builds it with the project's own commands, prepares the build output for
//! static hosting and pushes it to a hosting branch.

pub mod error;
pub mod fetch;
pub mod git;
pub mod pipeline;
pub mod publish;
pub mod runner;
pub mod workspace;

pub use error::DeployError;
pub use fetch::{GitFetcher, SourceFetcher, SourceSpec};
pub use pipeline::{Pipeline, PipelineConfig, PipelineContext, RunMode, RunReport};
pub use publish::{commit_message, GitPublisher, PublishConfig, PublishOutcome, PublishRequest, SitePublisher};
pub use runner::{CommandRunner, ShellRunner};
pub use workspace::Workspace;
