//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods
//! that accept `&PgPool` as the first argument.

pub mod agent_repo;
pub mod config_version_repo;

pub use agent_repo::AgentRepo;
pub use config_version_repo::ConfigVersionRepo;
