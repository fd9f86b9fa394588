//! Shared types for the tollgate ledger
//!
//! Provides the account address codec, the scalar units used throughout
//! the workspace, and the structured event model the ledger core emits
//! for external observability.

pub mod address;
pub mod event;
pub mod scalars;

pub use address::*;
pub use event::*;
pub use scalars::*;

/// Module version for API introspection
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
