//! Raw attribute sources
//!
//! An [`AttributeSource`] hands back the unparsed text of the diagnostic tools
//! for one interface. Parsing lives in [`crate::extractor`], so the probes can
//! be exercised against canned text without spawning processes.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use netinv_exec::{CommandExecutor, ExecError};
use thiserror::Error;
use tracing::{debug, instrument};

/// Default bound on a single diagnostic command
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors raised while fetching raw attribute text
#[derive(Error, Debug, Clone)]
pub enum SourceError {
    /// The command could not be run or did not finish in time
    #[error(transparent)]
    Exec(#[from] ExecError),

    /// The command ran but reported failure
    #[error("{program} exited with status {status}: {stderr}")]
    CommandFailed {
        /// Program that failed
        program: String,
        /// Exit status
        status: i32,
        /// Trimmed stderr output
        stderr: String,
    },

    /// No data registered for the interface
    #[error("no {kind} data for interface {interface}")]
    Unavailable {
        /// Which tool output was requested
        kind: &'static str,
        /// Interface name
        interface: String,
    },
}

/// Supplier of raw diagnostic text for a named interface
#[async_trait]
pub trait AttributeSource: Send + Sync {
    /// Link-layer introspection output (`ip link show <iface>`)
    async fn link_info(&self, interface: &str) -> Result<String, SourceError>;

    /// Driver settings output (`ethtool <iface>`)
    async fn driver_info(&self, interface: &str) -> Result<String, SourceError>;
}

/// Attribute source backed by the host's `ip` and `ethtool` binaries
pub struct CommandAttributeSource {
    executor: Arc<dyn CommandExecutor>,
    ip_command: String,
    ethtool_command: String,
    timeout: Duration,
}

impl CommandAttributeSource {
    /// Create a source that runs `ip` and `ethtool` through `executor`
    pub fn new(executor: Arc<dyn CommandExecutor>) -> Self {
        Self {
            executor,
            ip_command: "ip".to_string(),
            ethtool_command: "ethtool".to_string(),
            timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }

    /// Set per-command timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the `ip` binary (name or absolute path)
    #[must_use]
    pub fn with_ip_command(mut self, program: impl Into<String>) -> Self {
        self.ip_command = program.into();
        self
    }

    /// Override the `ethtool` binary (name or absolute path)
    #[must_use]
    pub fn with_ethtool_command(mut self, program: impl Into<String>) -> Self {
        self.ethtool_command = program.into();
        self
    }

    async fn capture(&self, program: &str, args: &[&str]) -> Result<String, SourceError> {
        let result = self
            .executor
            .run_with_timeout(program, args, self.timeout)
            .await?;

        if !result.success() {
            return Err(SourceError::CommandFailed {
                program: program.to_string(),
                status: result.status,
                stderr: result.stderr.trim().to_string(),
            });
        }

        Ok(result.stdout)
    }
}

impl std::fmt::Debug for CommandAttributeSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandAttributeSource")
            .field("executor", &self.executor.executor_type())
            .field("ip_command", &self.ip_command)
            .field("ethtool_command", &self.ethtool_command)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[async_trait]
impl AttributeSource for CommandAttributeSource {
    #[instrument(skip(self), level = "debug")]
    async fn link_info(&self, interface: &str) -> Result<String, SourceError> {
        self.capture(&self.ip_command, &["link", "show", interface])
            .await
    }

    #[instrument(skip(self), level = "debug")]
    async fn driver_info(&self, interface: &str) -> Result<String, SourceError> {
        self.capture(&self.ethtool_command, &[interface]).await
    }
}

/// In-memory attribute source
///
/// Interfaces without registered text answer with [`SourceError::Unavailable`].
#[derive(Debug, Clone, Default)]
pub struct StaticAttributeSource {
    link: HashMap<String, Result<String, SourceError>>,
    driver: HashMap<String, Result<String, SourceError>>,
}

impl StaticAttributeSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `ip link show` output for an interface
    #[must_use]
    pub fn with_link_info(mut self, interface: impl Into<String>, text: impl Into<String>) -> Self {
        self.link.insert(interface.into(), Ok(text.into()));
        self
    }

    /// Register `ethtool` output for an interface
    #[must_use]
    pub fn with_driver_info(
        mut self,
        interface: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        self.driver.insert(interface.into(), Ok(text.into()));
        self
    }

    /// Make `link_info` fail for an interface
    #[must_use]
    pub fn with_link_error(mut self, interface: impl Into<String>, error: SourceError) -> Self {
        self.link.insert(interface.into(), Err(error));
        self
    }

    /// Make `driver_info` fail for an interface
    #[must_use]
    pub fn with_driver_error(mut self, interface: impl Into<String>, error: SourceError) -> Self {
        self.driver.insert(interface.into(), Err(error));
        self
    }

    fn lookup(
        table: &HashMap<String, Result<String, SourceError>>,
        kind: &'static str,
        interface: &str,
    ) -> Result<String, SourceError> {
        table.get(interface).cloned().unwrap_or_else(|| {
            debug!(interface = %interface, kind, "no canned output registered");
            Err(SourceError::Unavailable {
                kind,
                interface: interface.to_string(),
            })
        })
    }
}

#[async_trait]
impl AttributeSource for StaticAttributeSource {
    async fn link_info(&self, interface: &str) -> Result<String, SourceError> {
        Self::lookup(&self.link, "link", interface)
    }

    async fn driver_info(&self, interface: &str) -> Result<String, SourceError> {
        Self::lookup(&self.driver, "driver", interface)
    }
}
