use std::collections::HashSet;

use anyhow::Context;
use iqra_core::errors::AppError;
use iqra_core::{PaginationMeta, PaginationParams};
use iqra_models::groups::{Group, GroupWithPermissions};
use iqra_models::ids::{GroupId, UserId};
use sqlx::PgPool;
use tracing::instrument;

pub struct GroupService;

impl GroupService {
    /// Every codename granted to any group the user belongs to.
    #[instrument(skip(db))]
    pub async fn get_user_permissions(
        db: &PgPool,
        user_id: UserId,
    ) -> Result<HashSet<String>, AppError> {
        let codenames = sqlx::query_scalar::<_, String>(
            r#"SELECT DISTINCT p.codename
               FROM user_groups ug
               JOIN group_permissions gp ON gp.group_id = ug.group_id
               JOIN permissions p ON p.id = gp.permission_id
               WHERE ug.user_id = $1"#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await
        .context("Failed to fetch user permissions")
        .map_err(AppError::database)?;

        Ok(codenames.into_iter().collect())
    }

    #[instrument(skip(db))]
    pub async fn list_groups(
        db: &PgPool,
        pagination: &PaginationParams,
    ) -> Result<(Vec<GroupWithPermissions>, PaginationMeta), AppError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM groups")
            .fetch_one(db)
            .await
            .context("Failed to count groups")
            .map_err(AppError::database)?;

        let groups = sqlx::query_as::<_, Group>(
            "SELECT id, name, created_at FROM groups ORDER BY name LIMIT $1 OFFSET $2",
        )
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(db)
        .await
        .context("Failed to fetch groups")
        .map_err(AppError::database)?;

        let mut result = Vec::with_capacity(groups.len());
        for group in groups {
            let permissions = Self::group_codenames(db, group.id).await?;
            result.push(GroupWithPermissions::new(group, permissions));
        }

        Ok((result, PaginationMeta::new(total, pagination)))
    }

    #[instrument(skip(db))]
    pub async fn get_group(db: &PgPool, id: GroupId) -> Result<GroupWithPermissions, AppError> {
        let group = sqlx::query_as::<_, Group>("SELECT id, name, created_at FROM groups WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await
            .context("Failed to fetch group")
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Group not found")))?;

        let permissions = Self::group_codenames(db, group.id).await?;
        Ok(GroupWithPermissions::new(group, permissions))
    }

    async fn group_codenames(db: &PgPool, group_id: GroupId) -> Result<Vec<String>, AppError> {
        sqlx::query_scalar::<_, String>(
            r#"SELECT p.codename
               FROM group_permissions gp
               JOIN permissions p ON p.id = gp.permission_id
               WHERE gp.group_id = $1
               ORDER BY p.codename"#,
        )
        .bind(group_id)
        .fetch_all(db)
        .await
        .context("Failed to fetch group permissions")
        .map_err(AppError::database)
    }
}
