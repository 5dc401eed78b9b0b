//! Tick storage and retrieval for the pairs analytics pipeline.
//!
//! This crate provides:
//! - Database client for `PostgreSQL`
//! - Data models for normalized ticks and derived bars
//! - Repositories for typed database access

pub mod database;
pub mod models;
pub mod repositories;

pub use database::DatabaseClient;
pub use models::{Bar, TickRecord};
pub use repositories::TickRepository;
