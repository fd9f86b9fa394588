//! Adaptive fee controller for the tollgate ledger
//!
//! Implements the volume-driven fee model:
//! - Rolling fixed-duration window over gross transfer volume
//! - Single-step rate adjustment at window rollover (deliberate damping)
//! - Validated, owner-adjustable fee parameters

pub mod config;
pub mod controller;

pub use config::*;
pub use controller::*;
