use std::time::{Duration, Instant};

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{info, warn};

use crate::config::Config;
use crate::errors::AppError;

const INITIAL_BACKOFF: Duration = Duration::from_millis(500);
const MAX_BACKOFF: Duration = Duration::from_secs(8);

/// Creates the PostgreSQL connection pool, retrying the initial connect with
/// exponential backoff until `config.db_connect_max_retry` has elapsed.
///
/// Pooled connections are pinged before every checkout, so a connection that
/// died while idle is dropped and replaced on next use. Only the initial
/// connect is retried; query failures afterwards propagate to the caller.
pub async fn create_pool(config: &Config) -> Result<PgPool, AppError> {
    info!("Connecting to PostgreSQL...");

    let started = Instant::now();
    let mut attempt: u32 = 0;

    loop {
        let result = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .test_before_acquire(true)
            .connect(&config.database_url)
            .await;

        match result {
            Ok(pool) => {
                info!(attempts = attempt + 1, "PostgreSQL connection pool established");
                return Ok(pool);
            }
            Err(e) => {
                let delay = backoff_delay(attempt);
                if started.elapsed() + delay > config.db_connect_max_retry {
                    return Err(AppError::Connection(format!(
                        "giving up after {} attempts over {:?}: {e}",
                        attempt + 1,
                        started.elapsed()
                    )));
                }
                warn!(
                    "PostgreSQL connect attempt {} failed ({e}), retrying after {}ms...",
                    attempt + 1,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

/// Exponential backoff: 500ms, 1s, 2s, 4s, then capped at 8s.
fn backoff_delay(attempt: u32) -> Duration {
    INITIAL_BACKOFF
        .checked_mul(1u32 << attempt.min(16))
        .map(|d| d.min(MAX_BACKOFF))
        .unwrap_or(MAX_BACKOFF)
}
