use anyhow::Result;
use sqlx::{MySql, Pool};
use tracing::info;

pub async fn initialize_schema(pool: &Pool<MySql>) -> Result<()> {
    info!("initializing database schema");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id CHAR(36) NOT NULL PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            email VARCHAR(255) NOT NULL,
            role VARCHAR(32) NOT NULL,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP
        ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_unicode_ci
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS farms (
            id CHAR(36) NOT NULL PRIMARY KEY,
            owner_user_id CHAR(36) NOT NULL,
            name VARCHAR(255) NOT NULL,
            farm_type VARCHAR(32) NOT NULL,
            biosecurity_tier VARCHAR(32) NULL,
            latitude DOUBLE NULL,
            longitude DOUBLE NULL,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP,
            INDEX idx_owner (owner_user_id)
        ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_unicode_ci
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS inspections (
            id CHAR(36) NOT NULL PRIMARY KEY,
            farm_id CHAR(36) NOT NULL,
            inspector_user_id CHAR(36) NOT NULL,
            inspected_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            result VARCHAR(32) NOT NULL,
            failed_checks TEXT NULL,
            notes TEXT NULL,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            INDEX idx_farm_date (farm_id, inspected_at DESC),
            INDEX idx_inspector (inspector_user_id)
        ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_unicode_ci
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS reports (
            id CHAR(36) NOT NULL PRIMARY KEY,
            user_id CHAR(36) NOT NULL,
            farm_id CHAR(36) NULL,
            report_type VARCHAR(32) NOT NULL,
            title VARCHAR(255) NOT NULL,
            start_date TIMESTAMP NULL,
            end_date TIMESTAMP NULL,
            include_details BOOLEAN NOT NULL DEFAULT FALSE,
            status VARCHAR(16) NOT NULL DEFAULT 'pending',
            content MEDIUMTEXT NULL,
            error_message TEXT NULL,
            generated_at TIMESTAMP NULL,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP,
            INDEX idx_user (user_id),
            INDEX idx_farm (farm_id),
            INDEX idx_status (status)
        ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_unicode_ci
        "#,
    )
    .execute(pool)
    .await?;

    info!("database schema initialized");
    Ok(())
}
