//! Client-side editing session for an agent's configuration.
//!
//! [`session::AgentEditor`] owns one page's worth of state: the shared
//! [`store::DraftStore`], the [`resolver::VersionResolver`], the navigation
//! guard, both dialogs, and the [`commit::CommitService`]. Everything talks
//! to the server through the [`api::AgentApi`] trait and to the hosting
//! shell through [`host::Navigator`] and [`host::Notifier`].

pub mod api;
pub mod commit;
pub mod config;
pub mod dialog;
pub mod export;
pub mod host;
pub mod interceptor;
pub mod resolver;
pub mod session;
pub mod store;
