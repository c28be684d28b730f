//! CLI adapter (§6): thin wrappers around the core pipeline for the
//! `import`, `batch-import`, and `auth` subcommands.
//!
//! Generalizes `soundphilosopher-sporlcli::cli`'s layering (CLI command →
//! core logic → HTTP client) to this crate's `import`/`auth` surface; the
//! management/caching layer the teacher had between CLI and Spotify client
//! has no counterpart here, since this pipeline is stateless per run besides
//! the token cache.

mod auth;
mod import;

pub use auth::auth;
pub use import::{ImportArgs, import};
