use anyhow::{Context, Result, anyhow, bail};
use iqra_core::hash_password;
use iqra_models::groups::{Group, Permission};
use iqra_models::ids::{GroupId, PermissionId, UserId};
use sqlx::PgPool;

/// Creates an active, verified admin that bypasses every permission check.
pub async fn create_superuser(
    db: &PgPool,
    username: &str,
    email: &str,
    password: &str,
) -> Result<UserId> {
    if username.trim().is_empty() || email.trim().is_empty() {
        bail!("Username and email are required");
    }
    if password.len() < 8 {
        bail!("Password must be at least 8 characters");
    }

    let hashed = hash_password(password).map_err(|e| anyhow!(e.message()))?;

    let id = sqlx::query_scalar::<_, UserId>(
        r#"INSERT INTO users (username, email, password, user_type, is_verified, is_staff, is_superuser)
           VALUES ($1, $2, $3, 'admin', TRUE, TRUE, TRUE)
           ON CONFLICT DO NOTHING
           RETURNING id"#,
    )
    .bind(username.trim())
    .bind(email.trim())
    .bind(&hashed)
    .fetch_optional(db)
    .await
    .context("Failed to insert superuser")?;

    id.ok_or_else(|| anyhow!("A user with that username or email already exists"))
}

pub async fn create_group(db: &PgPool, name: &str) -> Result<Group> {
    let name = name.trim();
    if name.is_empty() {
        bail!("Group name is required");
    }

    sqlx::query_as::<_, Group>(
        r#"INSERT INTO groups (name) VALUES ($1)
           ON CONFLICT (name) DO NOTHING
           RETURNING id, name, created_at"#,
    )
    .bind(name)
    .fetch_optional(db)
    .await
    .context("Failed to insert group")?
    .ok_or_else(|| anyhow!("Group '{}' already exists", name))
}

async fn group_id(db: &PgPool, name: &str) -> Result<GroupId> {
    sqlx::query_scalar::<_, GroupId>("SELECT id FROM groups WHERE name = $1")
        .bind(name)
        .fetch_optional(db)
        .await
        .context("Failed to look up group")?
        .ok_or_else(|| anyhow!("Group '{}' not found", name))
}

async fn permission_id(db: &PgPool, codename: &str) -> Result<PermissionId> {
    sqlx::query_scalar::<_, PermissionId>("SELECT id FROM permissions WHERE codename = $1")
        .bind(codename)
        .fetch_optional(db)
        .await
        .context("Failed to look up permission")?
        .ok_or_else(|| anyhow!("Unknown permission '{}'", codename))
}

/// Returns `false` when the group already held the permission.
pub async fn grant_permission(db: &PgPool, group: &str, codename: &str) -> Result<bool> {
    let group_id = group_id(db, group).await?;
    let permission_id = permission_id(db, codename).await?;

    let result = sqlx::query(
        "INSERT INTO group_permissions (group_id, permission_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
    )
    .bind(group_id)
    .bind(permission_id)
    .execute(db)
    .await
    .context("Failed to grant permission")?;

    Ok(result.rows_affected() > 0)
}

/// Returns `false` when the group did not hold the permission.
pub async fn revoke_permission(db: &PgPool, group: &str, codename: &str) -> Result<bool> {
    let group_id = group_id(db, group).await?;
    let permission_id = permission_id(db, codename).await?;

    let result =
        sqlx::query("DELETE FROM group_permissions WHERE group_id = $1 AND permission_id = $2")
            .bind(group_id)
            .bind(permission_id)
            .execute(db)
            .await
            .context("Failed to revoke permission")?;

    Ok(result.rows_affected() > 0)
}

pub async fn add_user_to_group(db: &PgPool, username: &str, group: &str) -> Result<bool> {
    let group_id = group_id(db, group).await?;
    let user_id = sqlx::query_scalar::<_, UserId>("SELECT id FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(db)
        .await
        .context("Failed to look up user")?
        .ok_or_else(|| anyhow!("User '{}' not found", username))?;

    let result = sqlx::query(
        "INSERT INTO user_groups (user_id, group_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
    )
    .bind(user_id)
    .bind(group_id)
    .execute(db)
    .await
    .context("Failed to add user to group")?;

    Ok(result.rows_affected() > 0)
}

pub async fn list_permissions(db: &PgPool) -> Result<Vec<Permission>> {
    sqlx::query_as::<_, Permission>(
        "SELECT id, codename, name, model FROM permissions ORDER BY model, codename",
    )
    .fetch_all(db)
    .await
    .context("Failed to list permissions")
}
