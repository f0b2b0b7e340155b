//! Entity models and DTOs.
//!
//! Row structs derive `FromRow` and serialize with camelCase keys, matching
//! the HTTP contract; input DTOs are plain structs built by the handlers.

pub mod agent;
pub mod config_version;
