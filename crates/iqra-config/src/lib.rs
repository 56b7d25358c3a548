//! # IQRA Config
//!
//! Configuration structures loaded from environment variables:
//!
//! - [`cors`]: allowed CORS origins
//! - [`oauth`]: Google identity provider endpoint
//! - [`server`]: listen address
//!
//! # Example
//!
//! ```ignore
//! use iqra_config::{CorsConfig, OAuthConfig, ServerConfig};
//!
//! let cors = CorsConfig::from_env();
//! let oauth = OAuthConfig::from_env();
//! let server = ServerConfig::from_env();
//! ```

pub mod cors;
pub mod oauth;
pub mod server;

pub use cors::CorsConfig;
pub use oauth::OAuthConfig;
pub use server::ServerConfig;
