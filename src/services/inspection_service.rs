use anyhow::{anyhow, Result};
use sqlx::{MySql, Pool, Row};

use crate::models::{Inspection, InspectionResult};

pub async fn create_inspection(pool: &Pool<MySql>, inspection: &Inspection) -> Result<()> {
    let failed_checks = serde_json::to_string(&inspection.failed_checks)?;
    sqlx::query(
        "INSERT INTO inspections (id, farm_id, inspector_user_id, inspected_at, result, failed_checks, notes)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&inspection.id)
    .bind(&inspection.farm_id)
    .bind(&inspection.inspector_user_id)
    .bind(inspection.inspected_at)
    .bind(inspection.result.as_str())
    .bind(failed_checks)
    .bind(&inspection.notes)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn list_inspections_by_farm(
    pool: &Pool<MySql>,
    farm_id: &str,
    limit: u64,
    offset: u64,
) -> Result<Vec<Inspection>> {
    let rows = sqlx::query(
        "SELECT id, farm_id, inspector_user_id, inspected_at, result, failed_checks, notes, created_at
         FROM inspections WHERE farm_id = ?
         ORDER BY inspected_at DESC
         LIMIT ? OFFSET ?",
    )
    .bind(farm_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(map_inspection_row).collect()
}

pub async fn count_inspections_by_farm(pool: &Pool<MySql>, farm_id: &str) -> Result<u64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM inspections WHERE farm_id = ?")
        .bind(farm_id)
        .fetch_one(pool)
        .await?;
    Ok(count as u64)
}

/// Most recent first; the caller bounds how much history the pipeline sees.
pub async fn find_recent_inspections(
    pool: &Pool<MySql>,
    farm_id: &str,
    limit: u32,
) -> Result<Vec<Inspection>> {
    list_inspections_by_farm(pool, farm_id, limit as u64, 0).await
}

/// Read-only report visibility for inspectors hinges on this.
pub async fn inspector_has_inspection(
    pool: &Pool<MySql>,
    farm_id: &str,
    inspector_user_id: &str,
) -> Result<bool> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM inspections WHERE farm_id = ? AND inspector_user_id = ?",
    )
    .bind(farm_id)
    .bind(inspector_user_id)
    .fetch_one(pool)
    .await?;
    Ok(count > 0)
}

fn map_inspection_row(row: sqlx::mysql::MySqlRow) -> Result<Inspection> {
    let result: String = row.get("result");
    let failed_checks: Option<String> = row.get("failed_checks");
    Ok(Inspection {
        id: row.get("id"),
        farm_id: row.get("farm_id"),
        inspector_user_id: row.get("inspector_user_id"),
        inspected_at: row.get("inspected_at"),
        result: InspectionResult::parse(&result)
            .ok_or_else(|| anyhow!("unknown inspection result: {}", result))?,
        failed_checks: failed_checks
            .as_deref()
            .and_then(|s| serde_json::from_str(s).ok())
            .unwrap_or_default(),
        notes: row.get("notes"),
        created_at: row.get("created_at"),
    })
}
