pub mod schema;

use anyhow::Result;
use sqlx::{pool::PoolOptions, MySql, Pool};
use std::time::Duration;
use tracing::{info, warn};

use crate::config::Config;

const MAX_RETRIES: u32 = 10;
const INITIAL_RETRY_DELAY_SECS: u64 = 2;
const MAX_RETRY_DELAY_SECS: u64 = 30;

pub async fn create_pool(config: &Config) -> Result<Pool<MySql>> {
    let database_url = format!(
        "mysql://{}:{}@{}:{}/{}?charset=utf8mb4&collation=utf8mb4_unicode_ci",
        config.db_user, config.db_password, config.db_host, config.db_port, config.db_name
    );
    info!("connecting to {}", config.mysql_masked_url());

    let mut last_error = None;

    for attempt in 1..=MAX_RETRIES {
        let pool_options = PoolOptions::<MySql>::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800));

        match pool_options.connect(&database_url).await {
            Ok(pool) => match sqlx::query("SELECT 1").execute(&pool).await {
                Ok(_) => {
                    info!("database connected on attempt {}", attempt);
                    return Ok(pool);
                }
                Err(e) => {
                    warn!("pool created but test query failed: {}", e);
                    last_error = Some(anyhow::anyhow!("{}", e));
                }
            },
            Err(e) => {
                warn!("connection attempt {} failed: {}", attempt, e);
                last_error = Some(anyhow::anyhow!("{}", e));
            }
        }

        if attempt < MAX_RETRIES {
            let delay_secs = std::cmp::min(
                INITIAL_RETRY_DELAY_SECS * 2u64.saturating_pow(attempt - 1),
                MAX_RETRY_DELAY_SECS,
            );
            tokio::time::sleep(Duration::from_secs(delay_secs)).await;
        }
    }

    Err(last_error.unwrap_or_else(|| anyhow::anyhow!("database connection failed")))
}
