//! Shared PostgreSQL plumbing for the shelf workspace
//!
//! Connection pool configuration, schema migrations, a connectivity ping and the
//! database error type used by the shelf service.
//!
//! ```rust,no_run
//! use common::database::{DatabaseConfig, init_pool, ping};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::from_env()?;
//!     let pool = init_pool(&config).await?;
//!     println!("reachable: {}", ping(&pool).await);
//!     Ok(())
//! }
//! ```

pub mod database;
pub mod error;
