//! Unauthenticated liveness and project information endpoints.

pub mod controller;
pub mod router;
