//! User infrastructure module
//!
//! Record store implementations for users (in-memory and PostgreSQL) and
//! Argon2 password hashing.

mod password;
mod postgres_repository;
mod repository;

pub use password::{Argon2Hasher, PasswordHasher};
pub use postgres_repository::PostgresUserRepository;
pub use repository::InMemoryUserRepository;
