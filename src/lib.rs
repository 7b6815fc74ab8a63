//! Corral test-environment provisioner.
//!
//! This crate provisions and tears down disposable, quota-bounded test
//! environments (organization + space + quota) on a multi-tenant platform
//! by driving its management CLI, one command per lifecycle step.

pub use corral_cli as cli;
pub use corral_core as core;

/// Initialize logging for the entire system
pub fn init() {
    tracing_subscriber::fmt::init();
}

/// Version of the Corral system
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
