//! Command executor trait

use std::time::Duration;

use async_trait::async_trait;

use crate::error::ExecError;
use crate::result::CommandResult;

/// Runs a program with arguments and captures its output
///
/// A non-zero exit status is not an error at this level; callers inspect
/// [`CommandResult::success`].
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    async fn run(&self, program: &str, args: &[&str]) -> Result<CommandResult, ExecError>;

    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<CommandResult, ExecError>;

    fn executor_type(&self) -> &'static str;
}
