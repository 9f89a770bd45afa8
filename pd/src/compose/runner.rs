//! Runs delegated invocations with inherited stdio

use tracing::{debug, info, warn};

use super::{ComposeAction, ComposeError, Invocation};
use crate::config::ComposeConfig;

/// Executes lifecycle actions against the configured container tool
pub struct ComposeRunner {
    config: ComposeConfig,
    dry_run: bool,
}

impl ComposeRunner {
    pub fn new(config: ComposeConfig) -> Self {
        debug!(program = %config.program, service = %config.service, "ComposeRunner::new: called");
        Self { config, dry_run: false }
    }

    /// Print invocations instead of running them
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn plan(&self, action: ComposeAction) -> Vec<Invocation> {
        action.invocations(&self.config)
    }

    /// Run every invocation for `action` in order, stopping at the first failure
    pub async fn run(&self, action: ComposeAction) -> Result<(), ComposeError> {
        debug!(action = action.name(), dry_run = self.dry_run, "ComposeRunner::run: called");
        for invocation in self.plan(action) {
            if self.dry_run {
                println!("{}", invocation);
                continue;
            }
            self.run_invocation(&invocation).await?;
        }
        Ok(())
    }

    async fn run_invocation(&self, invocation: &Invocation) -> Result<(), ComposeError> {
        info!(%invocation, "Running delegated command");

        let status = tokio::process::Command::new(&invocation.program)
            .args(&invocation.args)
            .status()
            .await
            .map_err(|source| {
                debug!(program = %invocation.program, error = %source, "run_invocation: spawn failed");
                ComposeError::Spawn {
                    program: invocation.program.clone(),
                    source,
                }
            })?;

        if status.success() {
            debug!(%invocation, "run_invocation: succeeded");
            Ok(())
        } else {
            warn!(%invocation, code = ?status.code(), "Delegated command failed");
            Err(ComposeError::Failed {
                invocation: invocation.to_string(),
                code: status.code(),
            })
        }
    }
}
