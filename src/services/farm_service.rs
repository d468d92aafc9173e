use anyhow::{anyhow, Result};
use sqlx::{MySql, Pool, Row};

use crate::models::{BiosecurityTier, Farm, FarmType};

pub async fn create_farm(pool: &Pool<MySql>, farm: &Farm) -> Result<()> {
    sqlx::query(
        "INSERT INTO farms (id, owner_user_id, name, farm_type, biosecurity_tier, latitude, longitude)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&farm.id)
    .bind(&farm.owner_user_id)
    .bind(&farm.name)
    .bind(farm.farm_type.as_str())
    .bind(farm.biosecurity_tier.map(|t| t.as_str()))
    .bind(farm.latitude)
    .bind(farm.longitude)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn find_farm(pool: &Pool<MySql>, id: &str) -> Result<Option<Farm>> {
    let row = sqlx::query(
        "SELECT id, owner_user_id, name, farm_type, biosecurity_tier, latitude, longitude,
                created_at, updated_at
         FROM farms WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(map_farm_row).transpose()
}

pub async fn list_farms_by_owner(
    pool: &Pool<MySql>,
    owner_user_id: &str,
    limit: u64,
    offset: u64,
) -> Result<Vec<Farm>> {
    let rows = sqlx::query(
        "SELECT id, owner_user_id, name, farm_type, biosecurity_tier, latitude, longitude,
                created_at, updated_at
         FROM farms WHERE owner_user_id = ?
         ORDER BY created_at DESC
         LIMIT ? OFFSET ?",
    )
    .bind(owner_user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(map_farm_row).collect()
}

pub async fn count_farms_by_owner(pool: &Pool<MySql>, owner_user_id: &str) -> Result<u64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM farms WHERE owner_user_id = ?")
        .bind(owner_user_id)
        .fetch_one(pool)
        .await?;
    Ok(count as u64)
}

pub async fn update_farm(pool: &Pool<MySql>, farm: &Farm) -> Result<()> {
    sqlx::query(
        "UPDATE farms SET name = ?, farm_type = ?, biosecurity_tier = ?, latitude = ?, longitude = ?
         WHERE id = ?",
    )
    .bind(&farm.name)
    .bind(farm.farm_type.as_str())
    .bind(farm.biosecurity_tier.map(|t| t.as_str()))
    .bind(farm.latitude)
    .bind(farm.longitude)
    .bind(&farm.id)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn delete_farm(pool: &Pool<MySql>, id: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM farms WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

fn map_farm_row(row: sqlx::mysql::MySqlRow) -> Result<Farm> {
    let farm_type: String = row.get("farm_type");
    let tier: Option<String> = row.get("biosecurity_tier");
    Ok(Farm {
        id: row.get("id"),
        owner_user_id: row.get("owner_user_id"),
        name: row.get("name"),
        farm_type: FarmType::parse(&farm_type)
            .ok_or_else(|| anyhow!("unknown farm type: {}", farm_type))?,
        biosecurity_tier: tier.as_deref().and_then(BiosecurityTier::parse),
        latitude: row.get("latitude"),
        longitude: row.get("longitude"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}
