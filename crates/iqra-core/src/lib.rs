//! # IQRA Core
//!
//! Core types, errors, and utilities shared by every IQRA crate.
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`response`]: The uniform `{status, message, data, errors, meta}` envelope
//! - [`pagination`]: Page-based pagination parameters and metadata
//! - [`password`]: Password hashing and verification
//! - [`permissions`]: Group permission codename resolution
//! - [`search`]: Literal substring patterns for `ILIKE` filters
//! - [`serde`]: Query-string deserialization helpers
//!
//! # Example
//!
//! ```ignore
//! use iqra_core::errors::AppError;
//! use iqra_core::permissions::{GovernedModel, HandlerAction, HandlerPolicy, required_codename};
//! use axum::http::Method;
//!
//! let policy = HandlerPolicy::new()
//!     .governs(GovernedModel::StudentProfile)
//!     .action(Method::GET, HandlerAction::List);
//!
//! assert_eq!(
//!     required_codename(&policy, &Method::GET).as_deref(),
//!     Some("view_studentprofile")
//! );
//! ```

pub mod errors;
pub mod pagination;
pub mod password;
pub mod permissions;
pub mod response;
pub mod search;
pub mod serde;

pub use errors::{AppError, FailureMessage};
pub use pagination::{PaginationMeta, PaginationParams};
pub use password::{hash_password, verify_password};
pub use response::ApiResponse;
pub use search::contains_pattern;
