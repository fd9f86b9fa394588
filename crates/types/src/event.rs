//! Structured notifications emitted by the ledger core
//!
//! Every externally observable state change produces exactly one event:
//! ledger movements, allowance writes, rate changes, and parameter
//! changes. Emission is fire-and-forget; the host drains the log and
//! owns delivery.

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::scalars::{Amount, Bps};

/// A single notification produced by the ledger or fee controller.
///
/// For fee-skimmed transfers the treasury movement is recorded before
/// the net movement to the recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// Funds moved between accounts (the genesis mint uses a null `from`).
    Transfer {
        from: Address,
        to: Address,
        amount: Amount,
    },
    /// An allowance was overwritten.
    Approval {
        owner: Address,
        spender: Address,
        amount: Amount,
    },
    /// The effective tax rate changed, via rollover or bounds clamping.
    TaxRateChanged { old_bps: Bps, new_bps: Bps },
    /// The tax rate bounds were reconfigured.
    TaxBoundsChanged { min_bps: Bps, max_bps: Bps },
    /// The accounting window duration was reconfigured.
    VolumeWindowChanged { window_secs: u64 },
    /// The volume classification thresholds were reconfigured.
    VolumeThresholdsChanged { low: Amount, high: Amount },
    /// The per-rollover adjustment step was reconfigured.
    AdjustStepChanged { step_bps: Bps },
    /// The fee treasury account was reassigned.
    TreasuryChanged { treasury: Address },
    /// An account's fee exemption flag was toggled.
    FeeExemptionChanged { account: Address, exempt: bool },
    /// Ledger ownership moved to a new principal.
    OwnershipTransferred { previous: Address, new: Address },
}

/// Append-only event log owned by the ledger core.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Append an event in emission order.
    pub fn record(&mut self, event: Event) {
        self.events.push(event);
    }

    /// All events recorded so far, oldest first.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Take all recorded events, leaving the log empty.
    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
