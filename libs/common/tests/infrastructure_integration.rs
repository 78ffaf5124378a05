//! Integration tests for the database plumbing
//!
//! These tests need a reachable PostgreSQL instance named by `DATABASE_URL`;
//! run them with `cargo test -- --ignored`.

use common::database::{DatabaseConfig, init_pool, ping};
use sqlx::Row;

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_database_integration() -> Result<(), Box<dyn std::error::Error>> {
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    assert!(ping(&pool).await, "Database ping failed");

    let row = sqlx::query("SELECT 1 as result").fetch_one(&pool).await?;
    let result: i32 = row.get("result");
    assert_eq!(result, 1, "PostgreSQL simple query test failed");

    Ok(())
}
