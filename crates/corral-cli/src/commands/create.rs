use std::sync::Arc;

use anyhow::{bail, Result};
use tracing::info;

use corral_core::{CorralConfig, FailureCollector, ProcessStarter, TestEnvironment};

use crate::output;

/// Execute the create command
pub async fn execute(
    quota_limit: String,
    persistent: bool,
    config: &CorralConfig,
) -> Result<()> {
    let starter = Arc::new(ProcessStarter::new());
    let env = if persistent {
        TestEnvironment::new_persistent(config, starter)
    } else {
        TestEnvironment::new_regular(config, quota_limit, starter)?
    };

    info!(
        organization = %env.organization_name(),
        space = %env.space_name(),
        quota = %env.quota_name(),
        timeout = %humantime::format_duration(env.timeout()),
        "provisioning test environment"
    );

    let failures = FailureCollector::new();
    env.create(&failures).await;

    println!("organization: {}", env.organization_name());
    println!("space:        {}", env.space_name());
    println!("quota:        {}", env.quota_name());

    if failures.is_empty() {
        println!("{}", output::format_success("environment provisioned"));
        Ok(())
    } else {
        eprintln!("{}", output::render_failures(&failures.failures()));
        bail!("{} provisioning step(s) failed", failures.len());
    }
}
