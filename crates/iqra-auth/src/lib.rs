//! # IQRA Auth
//!
//! Authentication building blocks for the IQRA backend.
//!
//! - [`token`]: opaque access-token keys and `Authorization` header parsing
//! - [`google`]: the Google userinfo client behind the [`IdentityProvider`] trait
//!
//! Tokens are random 40-character hex keys persisted one per user. They carry
//! no claims; every authenticated request looks the key up.
//!
//! # Example
//!
//! ```ignore
//! use iqra_auth::{GoogleIdentityProvider, IdentityProvider, generate_token_key};
//! use iqra_config::OAuthConfig;
//!
//! let key = generate_token_key();
//! assert_eq!(key.len(), 40);
//!
//! let provider = GoogleIdentityProvider::new(&OAuthConfig::from_env());
//! let info = provider.fetch_user_info("ya29.a0Af...").await?;
//! println!("{}", info.email);
//! ```

pub mod google;
pub mod token;

pub use google::{GoogleIdentityProvider, GoogleUserInfo, IdentityProvider, IdentityProviderError};
pub use token::{TOKEN_KEY_LENGTH, generate_token_key, parse_authorization_header};
