use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use sqlx::{MySql, Pool, Row};

use crate::models::{Report, ReportStatus, ReportType};

pub async fn create_report(pool: &Pool<MySql>, report: &Report) -> Result<()> {
    sqlx::query(
        "INSERT INTO reports (id, user_id, farm_id, report_type, title, start_date, end_date, include_details, status)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, 'pending')",
    )
    .bind(&report.id)
    .bind(&report.user_id)
    .bind(&report.farm_id)
    .bind(report.report_type.as_str())
    .bind(&report.title)
    .bind(report.start_date)
    .bind(report.end_date)
    .bind(report.include_details)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn find_report(pool: &Pool<MySql>, id: &str) -> Result<Option<Report>> {
    let row = sqlx::query(
        "SELECT id, user_id, farm_id, report_type, title, start_date, end_date, include_details,
                status, content, error_message, generated_at, created_at, updated_at
         FROM reports WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(map_report_row).transpose()
}

pub async fn list_reports_by_user(
    pool: &Pool<MySql>,
    user_id: &str,
    limit: u64,
    offset: u64,
) -> Result<Vec<Report>> {
    let rows = sqlx::query(
        "SELECT id, user_id, farm_id, report_type, title, start_date, end_date, include_details,
                status, content, error_message, generated_at, created_at, updated_at
         FROM reports WHERE user_id = ?
         ORDER BY created_at DESC
         LIMIT ? OFFSET ?",
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(map_report_row).collect()
}

pub async fn count_reports_by_user(pool: &Pool<MySql>, user_id: &str) -> Result<u64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reports WHERE user_id = ?")
        .bind(user_id)
        .fetch_one(pool)
        .await?;
    Ok(count as u64)
}

/// Claims the report for generation. Guarded on the current status so a
/// report can never be re-entered into processing; returns false when the
/// claim did not apply.
pub async fn mark_processing(pool: &Pool<MySql>, id: &str) -> Result<bool> {
    let result = sqlx::query("UPDATE reports SET status = 'processing' WHERE id = ? AND status = 'pending'")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Terminal success: status, content, and generated_at land in one UPDATE.
pub async fn mark_completed(
    pool: &Pool<MySql>,
    id: &str,
    content_json: &str,
    generated_at: DateTime<Utc>,
) -> Result<()> {
    sqlx::query(
        "UPDATE reports SET status = 'completed', content = ?, error_message = NULL, generated_at = ?
         WHERE id = ?",
    )
    .bind(content_json)
    .bind(generated_at)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Terminal failure: status and the captured message in one UPDATE.
pub async fn mark_failed(pool: &Pool<MySql>, id: &str, error_message: &str) -> Result<()> {
    sqlx::query(
        "UPDATE reports SET status = 'failed', error_message = ?, content = NULL WHERE id = ?",
    )
    .bind(error_message)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn delete_report(pool: &Pool<MySql>, id: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM reports WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

fn map_report_row(row: sqlx::mysql::MySqlRow) -> Result<Report> {
    let report_type: String = row.get("report_type");
    let status: String = row.get("status");
    let content: Option<String> = row.get("content");

    Ok(Report {
        id: row.get("id"),
        user_id: row.get("user_id"),
        farm_id: row.get("farm_id"),
        report_type: ReportType::parse(&report_type)
            .ok_or_else(|| anyhow!("unknown report type: {}", report_type))?,
        title: row.get("title"),
        start_date: row.get("start_date"),
        end_date: row.get("end_date"),
        include_details: row.get("include_details"),
        status: ReportStatus::parse(&status)
            .ok_or_else(|| anyhow!("unknown report status: {}", status))?,
        content: content.as_deref().and_then(|s| serde_json::from_str(s).ok()),
        error_message: row.get("error_message"),
        generated_at: row.get("generated_at"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}
