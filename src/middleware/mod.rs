//! Request extractors and route layers.
//!
//! - [`auth`]: the [`auth::AuthUser`] extractor, resolving `Authorization: Token <key>`
//! - [`permission`]: the group-permission gate for administrative routes
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::permission::PermissionGuard;
//!
//! let router = PermissionGuard::new(state.clone(), collection_policy())
//!     .layer(Router::new().route("/student-profiles/", get(list_student_profiles)));
//! ```

pub mod auth;
pub mod permission;
