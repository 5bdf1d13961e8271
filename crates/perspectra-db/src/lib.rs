//! Perspectra persistence layer.
//!
//! Repository traits for users, profiles, problems, reviews and the concept
//! catalog, with two implementations:
//!
//! - PostgreSQL through `sqlx` (documents stored as JSONB, keyed columns for lookups)
//! - an in-memory store used when no database URL is configured, and by tests
//!
//! # Example
//!
//! ```rust,no_run
//! use perspectra_db::{Database, Store};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/perspectra", 10, 2).await?;
//!     db.initialize().await?;
//!     let store = Store::postgres(db.pool().clone());
//!     println!("{} problems", store.problems.count().await?);
//!     Ok(())
//! }
//! ```

pub mod database;
pub mod error;
pub mod memory;
pub mod postgres;
pub mod repository;
pub mod schema;
pub mod store;

pub use database::{Database, DbStats};
pub use error::{DbError, Result};
pub use memory::MemoryStore;
pub use repository::{
    ConceptRepository, ProblemFilter, ProblemRepository, ProfileRepository, ReviewRepository,
    UserRepository,
};
pub use store::Store;
