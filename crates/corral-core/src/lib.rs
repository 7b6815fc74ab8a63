//! Core types and orchestration for the Corral test-environment provisioner.
//!
//! This crate provides the environment descriptor, its lifecycle
//! orchestration, and the command-executor capability it runs on. A
//! [`TestEnvironment`] owns the identity of one disposable sandbox
//! (organization + space + quota) on the target platform and provisions or
//! tears it down by issuing management-tool commands, one per step, through
//! an injected [`CommandStarter`].

pub mod command;
pub mod config;
pub mod environment;
pub mod error;
pub mod naming;
pub mod report;

// Re-export commonly used types
pub use crate::command::{CommandHandle, CommandOutcome, CommandStarter, ProcessStarter};
pub use crate::config::CorralConfig;
pub use crate::environment::{EnvironmentIdentity, TestEnvironment};
pub use crate::error::{CorralError, CorralResult};
pub use crate::naming::{generate_name, NameRole};
pub use crate::report::{FailureCollector, FailureSink};
