//! netinv-client: HTTP client library
//!
//! Reads interface snapshots from a netinv daemon and renders them for humans.
//!
//! # Examples
//!
//! ```no_run
//! use netinv_client::{HttpClient, render};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new("http://localhost:8080")?;
//!
//! // Whole host
//! let snapshot = client.network(None).await?;
//! print!("{}", render(&snapshot, chrono::Utc::now()));
//!
//! // Single interface
//! let eth0 = client.network(Some("eth0")).await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod http;
pub mod render;

pub use error::{ClientError, Result};
pub use http::HttpClient;
pub use render::render;
