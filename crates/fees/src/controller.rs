//! Windowed volume accounting and rate adjustment
//!
//! The controller keeps a single active window. While the window is
//! open, observed transfer amounts accumulate. Once the window duration
//! has elapsed, the next observation first closes the window: the
//! accumulated volume is classified against the thresholds, the rate
//! moves by at most one step, and a fresh window opens at the current
//! timestamp. The triggering observation lands in the fresh window and
//! is charged at the freshly adjusted rate.

use serde::{Deserialize, Serialize};
use tollgate_types::{Amount, Bps, Timestamp, BPS_DENOM};
use tracing::{debug, info};

use crate::config::{
    validate_tax_bounds, validate_thresholds, validate_window, FeeConfig, FeeConfigError,
};

/// A rate transition produced by a rollover or a bounds change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateChange {
    pub old_bps: Bps,
    pub new_bps: Bps,
}

/// Outcome of accounting one transfer with the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation {
    /// Rate in force for the observed transfer, after any rollover.
    pub tax_bps: Bps,
    /// Set when the rollover moved the rate.
    pub rate_change: Option<RateChange>,
}

/// Per-window volume accumulator and tax rate state.
///
/// Created once at ledger genesis and mutated only through [`observe`]
/// and the owner-gated setters; the ledger holds the sole reference.
///
/// [`observe`]: VolumeController::observe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeController {
    tax_bps: Bps,
    min_tax_bps: Bps,
    max_tax_bps: Bps,
    adjust_step_bps: Bps,
    window_secs: u64,
    window_start: Timestamp,
    window_volume: Amount,
    low_volume_threshold: Amount,
    high_volume_threshold: Amount,
}

impl VolumeController {
    /// Build a controller from validated genesis parameters, opening the
    /// first window at `now`.
    pub fn new(config: &FeeConfig, now: Timestamp) -> Result<Self, FeeConfigError> {
        config.validate()?;
        Ok(Self {
            tax_bps: config.initial_tax_bps,
            min_tax_bps: config.min_tax_bps,
            max_tax_bps: config.max_tax_bps,
            adjust_step_bps: config.adjust_step_bps,
            window_secs: config.window_secs,
            window_start: now,
            window_volume: 0,
            low_volume_threshold: config.low_volume_threshold,
            high_volume_threshold: config.high_volume_threshold,
        })
    }

    /// Account for one transfer of `amount` gross units at time `now`
    /// and return the rate in force for it.
    ///
    /// If the window has expired this first performs exactly one
    /// rollover, so the returned rate already reflects the adjustment.
    /// Infallible: observation is a pure state transition.
    pub fn observe(&mut self, amount: Amount, now: Timestamp) -> Observation {
        let rate_change = if self.window_expired(now) {
            self.roll_window(now)
        } else {
            None
        };

        self.window_volume = self.window_volume.saturating_add(amount);
        debug!(
            target: "fees",
            "observed {} units at {}, window volume {} at {} bps",
            amount,
            now,
            self.window_volume,
            self.tax_bps
        );

        Observation {
            tax_bps: self.tax_bps,
            rate_change,
        }
    }

    fn window_expired(&self, now: Timestamp) -> bool {
        now >= self.window_start.saturating_add(self.window_secs)
    }

    /// Close the expired window and open a fresh one at `now`.
    ///
    /// One adjustment per observation even when several windows have
    /// elapsed: stale windows are skipped, never replayed, so only the
    /// most recently accumulated volume classifies the rate move.
    fn roll_window(&mut self, now: Timestamp) -> Option<RateChange> {
        let volume = self.window_volume;
        let old_bps = self.tax_bps;

        let new_bps = if volume < self.low_volume_threshold {
            old_bps
                .saturating_add(self.adjust_step_bps)
                .min(self.max_tax_bps)
        } else if volume > self.high_volume_threshold {
            old_bps
                .saturating_sub(self.adjust_step_bps)
                .max(self.min_tax_bps)
        } else {
            old_bps
        };

        self.window_start = now;
        self.window_volume = 0;

        if new_bps == old_bps {
            debug!(
                target: "fees",
                "window closed at {} units, tax rate steady at {} bps",
                volume,
                old_bps
            );
            return None;
        }

        self.tax_bps = new_bps;
        info!(
            target: "fees",
            "window closed at {} units, tax rate {} -> {} bps",
            volume,
            old_bps,
            new_bps
        );
        Some(RateChange { old_bps, new_bps })
    }

    /// Replace the rate bounds, clamping the current rate into range.
    ///
    /// Returns the clamp transition when the rate had to move.
    pub fn set_tax_bounds(
        &mut self,
        min_bps: Bps,
        max_bps: Bps,
    ) -> Result<Option<RateChange>, FeeConfigError> {
        validate_tax_bounds(min_bps, max_bps)?;
        self.min_tax_bps = min_bps;
        self.max_tax_bps = max_bps;

        let old_bps = self.tax_bps;
        let new_bps = old_bps.clamp(min_bps, max_bps);
        if new_bps == old_bps {
            return Ok(None);
        }

        self.tax_bps = new_bps;
        info!(
            target: "fees",
            "tax bounds moved to [{}, {}] bps, rate clamped {} -> {} bps",
            min_bps,
            max_bps,
            old_bps,
            new_bps
        );
        Ok(Some(RateChange { old_bps, new_bps }))
    }

    /// Replace the window duration.
    ///
    /// The running window's start is left alone, so the next observation
    /// is evaluated against the new duration with the existing start; a
    /// shorter duration can make that observation roll over immediately.
    pub fn set_volume_window(&mut self, window_secs: u64) -> Result<(), FeeConfigError> {
        validate_window(window_secs)?;
        self.window_secs = window_secs;
        info!(target: "fees", "volume window set to {} s", window_secs);
        Ok(())
    }

    /// Replace the classification thresholds; effective from the next
    /// rollover, the in-progress window is not reclassified.
    pub fn set_volume_thresholds(
        &mut self,
        low: Amount,
        high: Amount,
    ) -> Result<(), FeeConfigError> {
        validate_thresholds(low, high)?;
        self.low_volume_threshold = low;
        self.high_volume_threshold = high;
        info!(target: "fees", "volume thresholds set to low {} / high {}", low, high);
        Ok(())
    }

    /// Replace the per-rollover adjustment step; affects future
    /// rollovers only.
    pub fn set_adjust_step(&mut self, step_bps: Bps) {
        self.adjust_step_bps = step_bps;
        info!(target: "fees", "adjustment step set to {} bps", step_bps);
    }

    pub fn tax_bps(&self) -> Bps {
        self.tax_bps
    }

    pub fn min_tax_bps(&self) -> Bps {
        self.min_tax_bps
    }

    pub fn max_tax_bps(&self) -> Bps {
        self.max_tax_bps
    }

    pub fn adjust_step_bps(&self) -> Bps {
        self.adjust_step_bps
    }

    pub fn window_secs(&self) -> u64 {
        self.window_secs
    }

    pub fn window_start(&self) -> Timestamp {
        self.window_start
    }

    pub fn window_volume(&self) -> Amount {
        self.window_volume
    }

    pub fn low_volume_threshold(&self) -> Amount {
        self.low_volume_threshold
    }

    pub fn high_volume_threshold(&self) -> Amount {
        self.high_volume_threshold
    }
}

/// Fee skimmed from a transfer of `amount` at `tax_bps`, truncating
/// toward zero. The intermediate product is widened to `u128` so it
/// cannot overflow.
pub fn fee_for(amount: Amount, tax_bps: Bps) -> Amount {
    ((amount as u128 * tax_bps as u128) / BPS_DENOM as u128) as Amount
}
