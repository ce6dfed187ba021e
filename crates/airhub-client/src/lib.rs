//! Async client for the AirHub aviation data API.
//!
//! Authenticates with OAuth client credentials, caches the bearer token and
//! exposes the API's endpoint groups as typed services:
//!
//! - [`AdvisoryService`]: query, create, update and delete advisories
//! - [`SurfaceService`]: H3 hexbin surfaces
//! - [`AviationService`]: FAA airspace layers
//! - [`CheckService`]: airspace authorization checks
//! - [`TokenService`]: raw token requests
//!
//! Payload types live in [`airhub_protocol`], re-exported here as
//! [`protocol`].
//!
//! # Example
//!
//! ```no_run
//! use airhub_client::{AirHubClient, ClientConfig};
//! use airhub_client::protocol::{Geometry, QueryAdvisoryOptions};
//!
//! # async fn run() -> airhub_client::ClientResult<()> {
//! let client = AirHubClient::new(ClientConfig::from_env()?.sandbox())?;
//!
//! let opts = QueryAdvisoryOptions::new(Geometry::point(-85.7585, 38.2527));
//! for advisory in client.advisories().query(&opts).await? {
//!     println!("{} ({:?})", advisory.name, advisory.advisory_category);
//! }
//! # Ok(())
//! # }
//! ```

pub mod advisory;
pub mod aviation;
pub mod check;
pub mod client;
pub mod config;
pub mod error;
pub mod surface;
pub mod token;

pub use advisory::AdvisoryService;
pub use aviation::AviationService;
pub use check::CheckService;
pub use client::AirHubClient;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use surface::SurfaceService;
pub use token::TokenService;

pub use airhub_protocol as protocol;
