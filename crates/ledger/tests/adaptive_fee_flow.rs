//! Adaptive Fee Flow Test
//!
//! Walks the full ledger/controller interaction end to end:
//! - Fee skims route to the treasury and conserve total supply
//! - Window rollover adjusts the rate and charges the triggering transfer
//! - Stale windows collapse into a single rollover step
//! - Administrative changes take effect mid-stream
//!
//! Run with: cargo test -p tollgate-ledger --test adaptive_fee_flow -- --nocapture

use tollgate_fees::FeeConfig;
use tollgate_ledger::{Genesis, LedgerError, TokenLedger};
use tollgate_types::{Address, Amount, Event};

fn account(n: u8) -> Address {
    let mut bytes = [0u8; 32];
    bytes[0] = n;
    Address(bytes)
}

const OWNER: u8 = 1;
const TREASURY: u8 = 2;
const HOLDER: u8 = 3;
const ALICE: u8 = 4;
const BOB: u8 = 5;

fn launch() -> TokenLedger {
    TokenLedger::new(
        Genesis {
            name: "Tollgate".to_string(),
            symbol: "TOLL".to_string(),
            owner: account(OWNER),
            treasury: account(TREASURY),
            initial_holder: account(HOLDER),
            total_supply: 10_000_000,
            fee: FeeConfig {
                initial_tax_bps: 200,
                min_tax_bps: 0,
                max_tax_bps: 1_000,
                adjust_step_bps: 50,
                window_secs: 100,
                low_volume_threshold: 1_000,
                high_volume_threshold: 5_000,
            },
        },
        0,
    )
    .expect("genesis should validate")
}

fn supply_held(ledger: &TokenLedger) -> Amount {
    [OWNER, TREASURY, HOLDER, ALICE, BOB]
        .iter()
        .map(|&n| ledger.balance_of(account(n)))
        .sum()
}

#[test]
fn fee_skim_conserves_supply_across_a_busy_sequence() {
    let mut ledger = launch();

    ledger
        .transfer(account(HOLDER), account(ALICE), 100_000, 5)
        .unwrap();
    ledger
        .transfer(account(ALICE), account(BOB), 30_000, 20)
        .unwrap();
    ledger
        .transfer(account(BOB), account(HOLDER), 1_234, 60)
        .unwrap();

    println!(
        "treasury skimmed {} units over 3 transfers",
        ledger.balance_of(account(TREASURY))
    );
    assert!(ledger.balance_of(account(TREASURY)) > 0);
    assert_eq!(supply_held(&ledger), ledger.total_supply());
}

#[test]
fn quiet_window_raises_rate_for_the_triggering_transfer() {
    let mut ledger = launch();

    // Accumulate 500 units of volume, below the low threshold of 1_000.
    ledger
        .transfer(account(HOLDER), account(ALICE), 500, 10)
        .unwrap();
    assert_eq!(ledger.tax_bps(), 200);
    ledger.drain_events();

    // Window of 100s expired at t=101: one +50 bps step, and the
    // triggering transfer is already charged at 250 bps.
    ledger
        .transfer(account(HOLDER), account(ALICE), 10_000, 101)
        .unwrap();
    assert_eq!(ledger.tax_bps(), 250);

    let events = ledger.drain_events();
    assert_eq!(
        events[0],
        Event::TaxRateChanged {
            old_bps: 200,
            new_bps: 250,
        }
    );
    assert_eq!(
        events[1],
        Event::Transfer {
            from: account(HOLDER),
            to: account(TREASURY),
            amount: 250,
        }
    );
    assert_eq!(
        events[2],
        Event::Transfer {
            from: account(HOLDER),
            to: account(ALICE),
            amount: 9_750,
        }
    );

    // The fresh window holds only the triggering amount.
    assert_eq!(ledger.controller().window_start(), 101);
    assert_eq!(ledger.controller().window_volume(), 10_000);
}

#[test]
fn long_idle_gap_collapses_into_one_rollover() {
    let mut ledger = launch();
    ledger
        .transfer(account(HOLDER), account(ALICE), 500, 10)
        .unwrap();

    // Fifty windows elapse untouched; the rate still moves one step.
    ledger
        .transfer(account(HOLDER), account(ALICE), 500, 5_000)
        .unwrap();
    assert_eq!(ledger.tax_bps(), 250);
}

#[test]
fn heavy_volume_walks_the_rate_down_to_the_floor() {
    let mut ledger = launch();

    let mut now = 0;
    // The first rollover closes the empty genesis window (one step up
    // to 250 bps); every following window carries volume above the high
    // threshold, so each rollover subtracts a step down to the 0 floor.
    for _ in 0..6 {
        now += 101;
        ledger
            .transfer(account(HOLDER), account(ALICE), 50_000, now)
            .unwrap();
    }

    println!("rate after 6 heavy windows: {} bps", ledger.tax_bps());
    assert_eq!(ledger.tax_bps(), 0);

    // At 0 bps the transfer has no fee leg.
    let treasury_before = ledger.balance_of(account(TREASURY));
    ledger
        .transfer(account(HOLDER), account(BOB), 10_000, now + 1)
        .unwrap();
    assert_eq!(ledger.balance_of(account(TREASURY)), treasury_before);
    assert_eq!(supply_held(&ledger), ledger.total_supply());
}

#[test]
fn allowance_lifecycle_exhausts_then_rejects() {
    let mut ledger = launch();
    ledger
        .transfer(account(HOLDER), account(ALICE), 10_000, 5)
        .unwrap();

    ledger.approve(account(ALICE), account(BOB), 100).unwrap();
    ledger
        .transfer_from(account(BOB), account(ALICE), account(HOLDER), 100, 10)
        .unwrap();
    assert_eq!(ledger.allowance(account(ALICE), account(BOB)), 0);

    let snapshot = ledger.clone();
    let err = ledger
        .transfer_from(account(BOB), account(ALICE), account(HOLDER), 1, 11)
        .unwrap_err();
    assert_eq!(
        err,
        LedgerError::AllowanceExceeded {
            allowance: 0,
            required: 1,
        }
    );

    // Rejection leaves every observable surface unchanged.
    assert_eq!(ledger.balance_of(account(ALICE)), snapshot.balance_of(account(ALICE)));
    assert_eq!(ledger.balance_of(account(HOLDER)), snapshot.balance_of(account(HOLDER)));
    assert_eq!(ledger.controller(), snapshot.controller());
    assert_eq!(ledger.events().len(), snapshot.events().len());
}

#[test]
fn mid_stream_administration_changes_future_behavior() {
    let mut ledger = launch();

    // Exempt ALICE: her transfers stop paying fees entirely.
    ledger
        .set_fee_exempt(account(OWNER), account(ALICE), true)
        .unwrap();
    ledger
        .transfer(account(HOLDER), account(ALICE), 10_000, 5)
        .unwrap();
    assert_eq!(ledger.balance_of(account(ALICE)), 10_000);
    assert_eq!(ledger.balance_of(account(TREASURY)), 0);

    // Clamp the rate upward with no transfer in flight.
    ledger.drain_events();
    ledger.set_tax_bounds(account(OWNER), 300, 300).unwrap();
    assert_eq!(ledger.tax_bps(), 300);
    let events = ledger.drain_events();
    assert_eq!(
        events,
        vec![
            Event::TaxBoundsChanged {
                min_bps: 300,
                max_bps: 300,
            },
            Event::TaxRateChanged {
                old_bps: 200,
                new_bps: 300,
            },
        ]
    );

    // Shrinking the window keeps the running window's start, so the
    // next transfer rolls over immediately. The fresh bounds pin the
    // rate at 300 bps, so the rollover itself is silent.
    ledger.set_volume_window(account(OWNER), 1).unwrap();
    ledger
        .transfer(account(HOLDER), account(BOB), 10_000, 50)
        .unwrap();
    assert_eq!(ledger.controller().window_start(), 50);
    assert_eq!(ledger.tax_bps(), 300);
    assert_eq!(ledger.balance_of(account(BOB)), 9_700);
}
