//! Database persistence layer for finished games and statistics.

mod error;
mod models;
mod repository;
mod schema; // Diesel generated schema - internal use only

pub use error::DbError;
pub use models::{GameStats, StoredGame};
pub use repository::GameRepository;
