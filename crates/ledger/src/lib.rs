//! Tollgate token ledger
//!
//! Fungible-token ledger with a volume-adaptive transfer fee:
//! - Balance and allowance bookkeeping with strict conservation
//! - Per-transfer fee skim routed to a configurable treasury
//! - Fee rate driven by the windowed volume controller in
//!   `tollgate-fees`, consulted and updated inside every transfer
//! - Owner-gated administrative surface emitting structured events

pub mod errors;
pub mod ledger;

pub use errors::*;
pub use ledger::*;
