//! Infrastructure layer - cache backends, record stores and services

pub mod cache;
pub mod logging;
pub mod observability;
pub mod services;
pub mod user;
