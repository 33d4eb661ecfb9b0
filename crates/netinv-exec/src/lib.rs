//! netinv-exec: Local command execution
//!
//! Provides the executor trait used to run OS diagnostic tools and its
//! `tokio::process` implementation.

pub mod error;
pub mod local;
pub mod result;
pub mod traits;

pub use error::ExecError;
pub use local::LocalExecutor;
pub use result::CommandResult;
pub use traits::CommandExecutor;
