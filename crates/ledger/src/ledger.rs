//! Balance, allowance, and fee-skim bookkeeping
//!
//! The ledger owns every piece of mutable state: the balance map, the
//! allowance map, the exemption set, and the volume controller. All
//! mutation passes through the validated operations here; validation
//! runs before any write, so a rejected call leaves state untouched.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tollgate_fees::{fee_for, FeeConfig, VolumeController};
use tollgate_types::{Address, Amount, Bps, Event, EventLog, Timestamp};
use tracing::{debug, info};

use crate::errors::LedgerError;

/// Parameters fixed when the ledger is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Genesis {
    pub name: String,
    pub symbol: String,
    /// Single principal allowed to invoke administrative operations.
    pub owner: Address,
    /// Recipient of all skimmed fees.
    pub treasury: Address,
    /// Account credited with the entire initial supply.
    pub initial_holder: Address,
    pub total_supply: Amount,
    pub fee: FeeConfig,
}

/// Fungible-token ledger with a volume-adaptive transfer fee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenLedger {
    name: String,
    symbol: String,
    owner: Address,
    treasury: Address,
    total_supply: Amount,
    balances: HashMap<Address, Amount>,
    allowances: HashMap<(Address, Address), Amount>,
    fee_exempt: HashSet<Address>,
    controller: VolumeController,
    events: EventLog,
}

impl TokenLedger {
    /// Create the ledger, credit the full supply to the initial holder,
    /// and open the first accounting window at `now`.
    ///
    /// The treasury starts fee-exempt so fee skims are never themselves
    /// skimmed; the flag can be revoked like any other.
    pub fn new(genesis: Genesis, now: Timestamp) -> Result<Self, LedgerError> {
        if genesis.owner.is_null() || genesis.treasury.is_null() || genesis.initial_holder.is_null()
        {
            return Err(LedgerError::InvalidAddress);
        }

        let controller = VolumeController::new(&genesis.fee, now)?;

        let mut balances = HashMap::new();
        balances.insert(genesis.initial_holder, genesis.total_supply);

        let mut fee_exempt = HashSet::new();
        fee_exempt.insert(genesis.treasury);

        let mut events = EventLog::new();
        events.record(Event::Transfer {
            from: Address::NULL,
            to: genesis.initial_holder,
            amount: genesis.total_supply,
        });

        info!(
            target: "ledger",
            "genesis: minted {} {} to {}",
            genesis.total_supply,
            genesis.symbol,
            genesis.initial_holder
        );

        Ok(Self {
            name: genesis.name,
            symbol: genesis.symbol,
            owner: genesis.owner,
            treasury: genesis.treasury,
            total_supply: genesis.total_supply,
            balances,
            allowances: HashMap::new(),
            fee_exempt,
            controller,
            events,
        })
    }

    // -------------------------------------------------------------------------
    // Transfer protocol
    // -------------------------------------------------------------------------

    /// Move `amount` gross units from `from` to `to`, skimming the fee
    /// leg to the treasury unless a party is exempt or the rate is zero.
    pub fn transfer(
        &mut self,
        from: Address,
        to: Address,
        amount: Amount,
        now: Timestamp,
    ) -> Result<(), LedgerError> {
        self.check_parties(from, to)?;
        self.check_balance(from, amount)?;
        self.apply_transfer(from, to, amount, now);
        Ok(())
    }

    /// Delegated transfer: `spender` moves `amount` of `from`'s funds.
    ///
    /// The allowance is reduced by the gross amount, not the post-fee
    /// amount, and only once every validation has passed.
    pub fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        amount: Amount,
        now: Timestamp,
    ) -> Result<(), LedgerError> {
        let allowance = self.allowance(from, spender);
        if allowance < amount {
            return Err(LedgerError::AllowanceExceeded {
                allowance,
                required: amount,
            });
        }
        self.check_parties(from, to)?;
        self.check_balance(from, amount)?;

        self.allowances.insert((from, spender), allowance - amount);
        self.apply_transfer(from, to, amount, now);
        Ok(())
    }

    /// Overwrite the (owner, spender) allowance; last write wins.
    pub fn approve(
        &mut self,
        owner: Address,
        spender: Address,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        if owner.is_null() || spender.is_null() {
            return Err(LedgerError::InvalidAddress);
        }

        self.allowances.insert((owner, spender), amount);
        self.events.record(Event::Approval {
            owner,
            spender,
            amount,
        });
        debug!(
            target: "ledger",
            "approval: {} allows {} to spend {}",
            owner,
            spender,
            amount
        );
        Ok(())
    }

    fn check_parties(&self, from: Address, to: Address) -> Result<(), LedgerError> {
        if from.is_null() || to.is_null() {
            return Err(LedgerError::InvalidAddress);
        }
        Ok(())
    }

    fn check_balance(&self, from: Address, amount: Amount) -> Result<(), LedgerError> {
        let balance = self.balance_of(from);
        if balance < amount {
            return Err(LedgerError::InsufficientBalance {
                balance,
                required: amount,
            });
        }
        Ok(())
    }

    /// Move funds after all validation has passed.
    ///
    /// The controller observes the gross amount before the debit, so the
    /// rate charged here reflects any rollover the observation caused.
    /// The treasury movement is recorded before the net movement.
    fn apply_transfer(&mut self, from: Address, to: Address, amount: Amount, now: Timestamp) {
        let observation = self.controller.observe(amount, now);
        if let Some(change) = observation.rate_change {
            self.events.record(Event::TaxRateChanged {
                old_bps: change.old_bps,
                new_bps: change.new_bps,
            });
        }

        let from_balance = self.balance_of(from);
        self.balances.insert(from, from_balance - amount);

        let exempt = self.fee_exempt.contains(&from) || self.fee_exempt.contains(&to);
        let fee = if exempt || observation.tax_bps == 0 {
            0
        } else {
            fee_for(amount, observation.tax_bps)
        };

        if fee > 0 {
            self.credit(self.treasury, fee);
            self.events.record(Event::Transfer {
                from,
                to: self.treasury,
                amount: fee,
            });
        }

        let net = amount - fee;
        self.credit(to, net);
        self.events.record(Event::Transfer {
            from,
            to,
            amount: net,
        });

        debug!(
            target: "ledger",
            "transfer: {} -> {} gross {} fee {} at {} bps",
            from,
            to,
            amount,
            fee,
            observation.tax_bps
        );
    }

    fn credit(&mut self, account: Address, amount: Amount) {
        let balance = self.balance_of(account);
        self.balances.insert(account, balance.saturating_add(amount));
    }

    // -------------------------------------------------------------------------
    // Administrative operations (owner-gated)
    // -------------------------------------------------------------------------

    fn require_owner(&self, caller: Address) -> Result<(), LedgerError> {
        if caller != self.owner {
            return Err(LedgerError::Unauthorized);
        }
        Ok(())
    }

    /// Reassign the fee treasury account.
    pub fn set_treasury(&mut self, caller: Address, treasury: Address) -> Result<(), LedgerError> {
        self.require_owner(caller)?;
        if treasury.is_null() {
            return Err(LedgerError::InvalidAddress);
        }

        self.treasury = treasury;
        self.events.record(Event::TreasuryChanged { treasury });
        info!(target: "ledger", "treasury reassigned to {}", treasury);
        Ok(())
    }

    /// Toggle an account's fee exemption flag.
    pub fn set_fee_exempt(
        &mut self,
        caller: Address,
        account: Address,
        exempt: bool,
    ) -> Result<(), LedgerError> {
        self.require_owner(caller)?;
        if account.is_null() {
            return Err(LedgerError::InvalidAddress);
        }

        if exempt {
            self.fee_exempt.insert(account);
        } else {
            self.fee_exempt.remove(&account);
        }
        self.events
            .record(Event::FeeExemptionChanged { account, exempt });
        info!(target: "ledger", "fee exemption for {} set to {}", account, exempt);
        Ok(())
    }

    /// Replace the tax rate bounds, clamping the current rate into range.
    pub fn set_tax_bounds(
        &mut self,
        caller: Address,
        min_bps: Bps,
        max_bps: Bps,
    ) -> Result<(), LedgerError> {
        self.require_owner(caller)?;
        let change = self.controller.set_tax_bounds(min_bps, max_bps)?;

        self.events
            .record(Event::TaxBoundsChanged { min_bps, max_bps });
        if let Some(change) = change {
            self.events.record(Event::TaxRateChanged {
                old_bps: change.old_bps,
                new_bps: change.new_bps,
            });
        }
        Ok(())
    }

    /// Replace the accounting window duration.
    pub fn set_volume_window(
        &mut self,
        caller: Address,
        window_secs: u64,
    ) -> Result<(), LedgerError> {
        self.require_owner(caller)?;
        self.controller.set_volume_window(window_secs)?;
        self.events.record(Event::VolumeWindowChanged { window_secs });
        Ok(())
    }

    /// Replace the volume classification thresholds.
    pub fn set_volume_thresholds(
        &mut self,
        caller: Address,
        low: Amount,
        high: Amount,
    ) -> Result<(), LedgerError> {
        self.require_owner(caller)?;
        self.controller.set_volume_thresholds(low, high)?;
        self.events.record(Event::VolumeThresholdsChanged { low, high });
        Ok(())
    }

    /// Replace the per-rollover rate adjustment step.
    pub fn set_adjust_step(&mut self, caller: Address, step_bps: Bps) -> Result<(), LedgerError> {
        self.require_owner(caller)?;
        self.controller.set_adjust_step(step_bps);
        self.events.record(Event::AdjustStepChanged { step_bps });
        Ok(())
    }

    /// Hand the administrative gate to a new principal.
    pub fn transfer_ownership(
        &mut self,
        caller: Address,
        new_owner: Address,
    ) -> Result<(), LedgerError> {
        self.require_owner(caller)?;
        if new_owner.is_null() {
            return Err(LedgerError::InvalidAddress);
        }

        let previous = self.owner;
        self.owner = new_owner;
        self.events.record(Event::OwnershipTransferred {
            previous,
            new: new_owner,
        });
        info!(target: "ledger", "ownership transferred {} -> {}", previous, new_owner);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Read views
    // -------------------------------------------------------------------------

    pub fn balance_of(&self, account: Address) -> Amount {
        self.balances.get(&account).copied().unwrap_or(0)
    }

    pub fn allowance(&self, owner: Address, spender: Address) -> Amount {
        self.allowances.get(&(owner, spender)).copied().unwrap_or(0)
    }

    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    /// Tax rate currently in force, in basis points.
    pub fn tax_bps(&self) -> Bps {
        self.controller.tax_bps()
    }

    pub fn is_fee_exempt(&self, account: Address) -> bool {
        self.fee_exempt.contains(&account)
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn treasury(&self) -> Address {
        self.treasury
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Immutable access to the fee controller state.
    pub fn controller(&self) -> &VolumeController {
        &self.controller
    }

    /// Events recorded so far, oldest first.
    pub fn events(&self) -> &[Event] {
        self.events.events()
    }

    /// Take all recorded events, leaving the log empty.
    pub fn drain_events(&mut self) -> Vec<Event> {
        self.events.drain()
    }
}
