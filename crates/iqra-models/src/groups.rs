//! Groups and the permissions they grant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::ids::{GroupId, PermissionId};

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A permission codename such as `view_studentprofile`.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct Permission {
    pub id: PermissionId,
    pub codename: String,
    pub name: String,
    /// Lowercased model name the codename applies to.
    pub model: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct GroupWithPermissions {
    pub id: GroupId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub permissions: Vec<String>,
}

impl GroupWithPermissions {
    pub fn new(group: Group, permissions: Vec<String>) -> Self {
        Self {
            id: group.id,
            name: group.name,
            created_at: group.created_at,
            permissions,
        }
    }
}
