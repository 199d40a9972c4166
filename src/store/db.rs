//! Database pool configuration

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

use super::StoreError;

/// Create a SQLite connection pool, creating the database file if needed.
///
/// In-memory databases live only as long as their connection, so they get a
/// single connection that is never recycled.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<SqlitePool, StoreError> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    let pool = if is_memory_url(database_url) {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?
    } else {
        SqlitePoolOptions::new()
            // SQLite is single-writer, but can have multiple readers
            .max_connections(max_connections.max(1))
            // Don't wait too long for a connection
            .acquire_timeout(Duration::from_secs(10))
            // Close idle connections after a while
            .idle_timeout(Duration::from_secs(600)) // 10 minutes
            .connect_with(options)
            .await?
    };

    info!("Connected to database: {}", database_url);
    Ok(pool)
}

fn is_memory_url(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_url_detection() {
        assert!(is_memory_url("sqlite::memory:"));
        assert!(is_memory_url("sqlite://file:test?mode=memory&cache=shared"));
        assert!(!is_memory_url("sqlite:echo_muse.db"));
    }

    #[tokio::test]
    async fn test_file_pool_creates_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sessions.db");
        let url = format!("sqlite://{}", path.display());

        let pool = create_pool(&url, 4).await.unwrap();
        let one: (i64,) = sqlx::query_as("SELECT 1").fetch_one(&pool).await.unwrap();
        assert_eq!(one.0, 1);
        assert!(path.exists());
    }
}
