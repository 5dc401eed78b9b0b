//! Data models for tick storage and bar aggregation.
//!
//! All models use `rust_decimal::Decimal` for financial precision.
//! Persisted models derive `sqlx::FromRow` for database compatibility.

pub mod bar;
pub mod tick;

pub use bar::Bar;
pub use tick::TickRecord;
