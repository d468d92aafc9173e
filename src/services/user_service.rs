use anyhow::{anyhow, Result};
use sqlx::{MySql, Pool, Row};

use crate::models::{Role, User};

pub async fn upsert_user(pool: &Pool<MySql>, user: &User) -> Result<()> {
    sqlx::query(
        "INSERT INTO users (id, name, email, role)
         VALUES (?, ?, ?, ?)
         ON DUPLICATE KEY UPDATE name = VALUES(name), email = VALUES(email), role = VALUES(role)",
    )
    .bind(&user.id)
    .bind(&user.name)
    .bind(&user.email)
    .bind(user.role.as_str())
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn find_user(pool: &Pool<MySql>, id: &str) -> Result<Option<User>> {
    let row = sqlx::query(
        "SELECT id, name, email, role, created_at, updated_at FROM users WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(|row| {
        let role: String = row.get("role");
        Ok(User {
            id: row.get("id"),
            name: row.get("name"),
            email: row.get("email"),
            role: Role::parse(&role).ok_or_else(|| anyhow!("unknown role: {}", role))?,
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    })
    .transpose()
}
