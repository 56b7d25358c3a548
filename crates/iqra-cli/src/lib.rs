//! # IQRA CLI
//!
//! Administrative operations that have no HTTP surface: creating
//! superusers and managing groups and their permission grants.
//!
//! ```ignore
//! use iqra_cli::admin;
//!
//! let group = admin::create_group(&pool, "registrars").await?;
//! admin::grant_permission(&pool, "registrars", "view_studentprofile").await?;
//! admin::add_user_to_group(&pool, "amina", "registrars").await?;
//! ```

pub mod admin;
