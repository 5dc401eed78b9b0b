//! Database repositories for the pairs analytics pipeline.
//!
//! Each repository provides typed access to a specific table. Clones are
//! cheap; the underlying pool is shared.

pub mod tick_repo;

pub use tick_repo::TickRepository;
