use std::sync::Arc;

use anyhow::{bail, Result};
use dialoguer::Confirm;
use tracing::info;

use corral_core::{CorralConfig, FailureCollector, ProcessStarter, TestEnvironment};

use crate::output;

/// Execute the destroy command
pub async fn execute(
    persistent: bool,
    org: Option<String>,
    space: Option<String>,
    quota: Option<String>,
    reuse_org: bool,
    force: bool,
    config: &CorralConfig,
) -> Result<()> {
    let starter = Arc::new(ProcessStarter::new());
    let env = if persistent {
        TestEnvironment::new_persistent(config, starter)
    } else {
        let (org, space, quota) = match (org, space, quota) {
            (Some(org), Some(space), Some(quota)) => (org, space, quota),
            _ => bail!("destroy requires --org, --space and --quota unless --persistent is set"),
        };
        TestEnvironment::new_base(
            space,
            org,
            quota,
            "10G",
            false,
            reuse_org,
            config.step_timeout(),
            starter,
        )
        .with_executable(config.tool_binary())
    };

    if env.should_remain() && !force {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "'{}' is a persistent environment. Destroy it anyway?",
                env.organization_name()
            ))
            .default(false)
            .interact()
            .unwrap_or(false);
        if !confirmed {
            println!(
                "{}",
                output::format_warning("leaving persistent environment in place")
            );
            return Ok(());
        }
    }

    info!(
        organization = %env.organization_name(),
        space = %env.space_name(),
        "tearing down test environment"
    );

    let failures = FailureCollector::new();
    env.destroy(&failures).await;

    if failures.is_empty() {
        println!("{}", output::format_success("environment torn down"));
        Ok(())
    } else {
        eprintln!("{}", output::render_failures(&failures.failures()));
        bail!("{} teardown step(s) failed", failures.len());
    }
}
