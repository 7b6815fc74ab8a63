//! Test environment descriptor and lifecycle orchestration.
//!
//! A [`TestEnvironment`] names one disposable unit of test isolation on the
//! target platform (organization + space + quota) and drives its
//! provisioning and teardown by issuing one management-tool command per
//! step. Steps run strictly in order, each bounded by the per-step timeout,
//! and every broken step reports exactly one failure to the caller's sink
//! without stopping the sequence.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::command::CommandStarter;
use crate::config::{CorralConfig, DEFAULT_TOOL};
use crate::error::{CorralError, CorralResult};
use crate::naming::{generate_name, NameRole};
use crate::report::FailureSink;

const DEFAULT_INSTANCE_MEMORY_LIMIT: &str = "-1";
const DEFAULT_ROUTES_LIMIT: &str = "1000";
const DEFAULT_APP_INSTANCE_LIMIT: &str = "-1";
const DEFAULT_SERVICE_INSTANCE_LIMIT: &str = "100";
const ALLOW_PAID_SERVICES_FLAG: &str = "--allow-paid-service-plans";
const DEFAULT_PERSISTENT_QUOTA_LIMIT: &str = "10G";

/// One disposable test environment on the target platform.
///
/// Identity and quota fields are fixed at construction; `create` and
/// `destroy` only perform external side effects keyed by them.
pub struct TestEnvironment {
    pub organization_name: String,
    pub space_name: String,
    pub quota_name: String,

    /// Quota parameters in the management tool's textual format
    pub quota_total_memory_limit: String,
    pub quota_instance_memory_limit: String,
    pub quota_routes_limit: String,
    pub quota_app_instance_limit: String,
    pub quota_service_instance_limit: String,
    pub allow_paid_services_flag: String,

    /// The organization is owned by another process and must not be
    /// created or deleted here
    pub uses_existing_organization: bool,
    /// The environment survives across test runs
    pub is_persistent: bool,

    /// Upper bound for each external command
    pub timeout: Duration,
    /// Management tool binary invoked for every step
    pub executable: String,

    executor: Arc<dyn CommandStarter>,
}

impl TestEnvironment {
    /// Build an ephemeral environment with freshly generated names.
    ///
    /// The quota's total-memory limit is taken verbatim from
    /// `quota_memory_limit`; every other quota parameter takes its default.
    /// Fails when the configuration requests an existing organization but
    /// names none: that is an unrecoverable setup error, not a runtime
    /// condition.
    pub fn new_regular(
        config: &CorralConfig,
        quota_memory_limit: impl Into<String>,
        executor: Arc<dyn CommandStarter>,
    ) -> CorralResult<Self> {
        let organization_name = if config.use_existing_organization {
            match config.existing_organization.as_deref() {
                Some(name) if !name.is_empty() => name.to_string(),
                _ => {
                    return Err(CorralError::config(
                        "existing organization requested but no organization name configured",
                    ))
                }
            }
        } else {
            generate_name(&config.name_prefix, config.shard_index, NameRole::Organization)
        };

        Ok(Self {
            organization_name,
            space_name: generate_name(&config.name_prefix, config.shard_index, NameRole::Space),
            quota_name: generate_name(&config.name_prefix, config.shard_index, NameRole::Quota),
            quota_total_memory_limit: quota_memory_limit.into(),
            quota_instance_memory_limit: DEFAULT_INSTANCE_MEMORY_LIMIT.to_string(),
            quota_routes_limit: DEFAULT_ROUTES_LIMIT.to_string(),
            quota_app_instance_limit: DEFAULT_APP_INSTANCE_LIMIT.to_string(),
            quota_service_instance_limit: DEFAULT_SERVICE_INSTANCE_LIMIT.to_string(),
            allow_paid_services_flag: ALLOW_PAID_SERVICES_FLAG.to_string(),
            uses_existing_organization: config.use_existing_organization,
            is_persistent: false,
            timeout: config.step_timeout(),
            executable: config.tool_binary.clone(),
            executor,
        })
    }

    /// Build the long-lived environment with fixed names from configuration.
    ///
    /// Callers are expected not to `destroy` it in normal flow; see
    /// [`TestEnvironment::should_remain`].
    pub fn new_persistent(config: &CorralConfig, executor: Arc<dyn CommandStarter>) -> Self {
        Self {
            organization_name: config.persistent_environment_org.clone(),
            space_name: config.persistent_environment_space.clone(),
            quota_name: config.persistent_environment_quota.clone(),
            quota_total_memory_limit: config
                .persistent_environment_quota_limit
                .clone()
                .unwrap_or_else(|| DEFAULT_PERSISTENT_QUOTA_LIMIT.to_string()),
            quota_instance_memory_limit: DEFAULT_INSTANCE_MEMORY_LIMIT.to_string(),
            quota_routes_limit: DEFAULT_ROUTES_LIMIT.to_string(),
            quota_app_instance_limit: DEFAULT_APP_INSTANCE_LIMIT.to_string(),
            quota_service_instance_limit: DEFAULT_SERVICE_INSTANCE_LIMIT.to_string(),
            allow_paid_services_flag: ALLOW_PAID_SERVICES_FLAG.to_string(),
            uses_existing_organization: false,
            is_persistent: true,
            timeout: config.step_timeout(),
            executable: config.tool_binary.clone(),
            executor,
        }
    }

    /// Build an environment from explicit field values.
    #[allow(clippy::too_many_arguments)]
    pub fn new_base(
        space_name: impl Into<String>,
        organization_name: impl Into<String>,
        quota_name: impl Into<String>,
        quota_memory_limit: impl Into<String>,
        is_persistent: bool,
        uses_existing_organization: bool,
        timeout: Duration,
        executor: Arc<dyn CommandStarter>,
    ) -> Self {
        Self {
            organization_name: organization_name.into(),
            space_name: space_name.into(),
            quota_name: quota_name.into(),
            quota_total_memory_limit: quota_memory_limit.into(),
            quota_instance_memory_limit: DEFAULT_INSTANCE_MEMORY_LIMIT.to_string(),
            quota_routes_limit: DEFAULT_ROUTES_LIMIT.to_string(),
            quota_app_instance_limit: DEFAULT_APP_INSTANCE_LIMIT.to_string(),
            quota_service_instance_limit: DEFAULT_SERVICE_INSTANCE_LIMIT.to_string(),
            allow_paid_services_flag: ALLOW_PAID_SERVICES_FLAG.to_string(),
            uses_existing_organization,
            is_persistent,
            timeout,
            executable: DEFAULT_TOOL.to_string(),
            executor,
        }
    }

    /// Override the management tool binary
    pub fn with_executable(mut self, executable: impl Into<String>) -> Self {
        self.executable = executable.into();
        self
    }

    pub fn organization_name(&self) -> &str {
        &self.organization_name
    }

    pub fn space_name(&self) -> &str {
        &self.space_name
    }

    pub fn quota_name(&self) -> &str {
        &self.quota_name
    }

    /// Whether callers should skip `destroy` for this environment
    pub fn should_remain(&self) -> bool {
        self.is_persistent
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Provision the environment: quota, organization (unless reused),
    /// quota assignment, space — in that order.
    ///
    /// Never fail-fast: every applicable step is attempted and each broken
    /// one reports exactly one failure, so the sink ends up with the full
    /// extent of a broken provisioning run.
    pub async fn create(&self, failures: &dyn FailureSink) {
        debug!(
            organization = %self.organization_name,
            space = %self.space_name,
            quota = %self.quota_name,
            "creating test environment"
        );
        for args in self.create_steps() {
            self.run_step(args, failures).await;
        }
    }

    /// Tear the environment down.
    ///
    /// An owned organization is deleted along with its quota; a reused one
    /// is never deleted — only the space created inside it is.
    pub async fn destroy(&self, failures: &dyn FailureSink) {
        debug!(
            organization = %self.organization_name,
            space = %self.space_name,
            "destroying test environment"
        );
        for args in self.destroy_steps() {
            self.run_step(args, failures).await;
        }
    }

    fn create_steps(&self) -> Vec<Vec<String>> {
        let mut steps = Vec::with_capacity(4);
        steps.push(vec![
            "create-quota".to_string(),
            self.quota_name.clone(),
            "-m".to_string(),
            self.quota_total_memory_limit.clone(),
            "-i".to_string(),
            self.quota_instance_memory_limit.clone(),
            "-r".to_string(),
            self.quota_routes_limit.clone(),
            "-a".to_string(),
            self.quota_app_instance_limit.clone(),
            "-s".to_string(),
            self.quota_service_instance_limit.clone(),
            self.allow_paid_services_flag.clone(),
        ]);
        if !self.uses_existing_organization {
            steps.push(vec![
                "create-org".to_string(),
                self.organization_name.clone(),
            ]);
        }
        steps.push(vec![
            "set-quota".to_string(),
            self.organization_name.clone(),
            self.quota_name.clone(),
        ]);
        steps.push(vec![
            "create-space".to_string(),
            "-o".to_string(),
            self.organization_name.clone(),
            self.space_name.clone(),
        ]);
        steps
    }

    fn destroy_steps(&self) -> Vec<Vec<String>> {
        if self.uses_existing_organization {
            vec![vec![
                "delete-space".to_string(),
                "-f".to_string(),
                "-o".to_string(),
                self.organization_name.clone(),
                self.space_name.clone(),
            ]]
        } else {
            vec![
                vec![
                    "delete-org".to_string(),
                    "-f".to_string(),
                    self.organization_name.clone(),
                ],
                vec![
                    "delete-quota".to_string(),
                    "-f".to_string(),
                    self.quota_name.clone(),
                ],
            ]
        }
    }

    /// Run one step and report at most one failure for it.
    async fn run_step(&self, args: Vec<String>, failures: &dyn FailureSink) {
        let rendered = format!("{} {}", self.executable, args.join(" "));
        debug!(command = %rendered, "running step");

        let mut handle = match self.executor.start(&self.executable, &args).await {
            Ok(handle) => handle,
            Err(err) => {
                warn!(command = %rendered, %err, "step failed to start");
                failures.failure(format!("Failed to start '{}': {}", rendered, err));
                return;
            }
        };

        match handle.wait(self.timeout).await {
            Ok(outcome) if outcome.timed_out => {
                warn!(command = %rendered, timeout = ?self.timeout, "step timed out");
                failures.failure(format!(
                    "Timed out after {} waiting for '{}'",
                    humantime::format_duration(self.timeout),
                    rendered
                ));
            }
            Ok(outcome) if outcome.exit_code != 0 => {
                warn!(command = %rendered, exit_code = outcome.exit_code, "step failed");
                failures.failure(format!(
                    "Expected '{}' to match exit code:\n\t0 (got {})",
                    rendered, outcome.exit_code
                ));
            }
            Ok(outcome) => {
                debug!(command = %rendered, elapsed = ?outcome.elapsed, "step completed");
            }
            Err(err) => {
                warn!(command = %rendered, %err, "step wait failed");
                failures.failure(format!("Failed waiting for '{}': {}", rendered, err));
            }
        }
    }
}

/// Nil-safe identity lookups over a possibly-absent environment.
///
/// Callers often hold `Option<&TestEnvironment>` before setup has run;
/// these accessors answer with an empty string instead of forcing every
/// call site to branch.
pub trait EnvironmentIdentity {
    fn organization_name(&self) -> &str;
    fn space_name(&self) -> &str;
}

impl<'a> EnvironmentIdentity for Option<&'a TestEnvironment> {
    fn organization_name(&self) -> &str {
        self.map(|env| env.organization_name()).unwrap_or("")
    }

    fn space_name(&self) -> &str {
        self.map(|env| env.space_name()).unwrap_or("")
    }
}
