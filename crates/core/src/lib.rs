pub mod agent_config;
pub mod draft;
pub mod error;
pub mod export;
pub mod hashing;
pub mod navigation;
pub mod reconcile;
pub mod settings;
pub mod types;
