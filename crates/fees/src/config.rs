//! Fee parameters fixed at genesis and adjustable by the ledger owner.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tollgate_types::{Amount, Bps, BPS_DENOM};

const DEFAULT_INITIAL_TAX_BPS: Bps = 100; // 1%
const DEFAULT_MIN_TAX_BPS: Bps = 0;
const DEFAULT_MAX_TAX_BPS: Bps = 1_000; // 10%
const DEFAULT_ADJUST_STEP_BPS: Bps = 25; // 0.25% per window
const DEFAULT_WINDOW_SECS: u64 = 3_600;
const DEFAULT_LOW_VOLUME_THRESHOLD: Amount = 10_000;
const DEFAULT_HIGH_VOLUME_THRESHOLD: Amount = 1_000_000;

/// Errors raised by fee parameter validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FeeConfigError {
    #[error("tax bounds misconfigured: min ({min}) exceeds max ({max}) bps")]
    InvalidTaxBounds { min: Bps, max: Bps },

    #[error("max tax {0} bps exceeds the 10000 bps denominator")]
    TaxAboveDenominator(Bps),

    #[error("tax rate {rate} bps outside bounds [{min}, {max}]")]
    TaxRateOutOfBounds { rate: Bps, min: Bps, max: Bps },

    #[error("volume window duration must be positive")]
    ZeroVolumeWindow,

    #[error("volume thresholds misconfigured: low ({low}) must be below high ({high})")]
    InvalidVolumeThresholds { low: Amount, high: Amount },
}

/// Fee model parameters supplied at ledger genesis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeConfig {
    /// Starting tax rate in basis points.
    pub initial_tax_bps: Bps,
    /// Lower bound the rate may be adjusted down to.
    pub min_tax_bps: Bps,
    /// Upper bound the rate may be adjusted up to (closed bound).
    pub max_tax_bps: Bps,
    /// Rate movement applied per qualifying rollover.
    pub adjust_step_bps: Bps,
    /// Duration of one accounting window in seconds.
    pub window_secs: u64,
    /// Window volume below this raises the rate at rollover.
    pub low_volume_threshold: Amount,
    /// Window volume above this lowers the rate at rollover.
    pub high_volume_threshold: Amount,
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            initial_tax_bps: DEFAULT_INITIAL_TAX_BPS,
            min_tax_bps: DEFAULT_MIN_TAX_BPS,
            max_tax_bps: DEFAULT_MAX_TAX_BPS,
            adjust_step_bps: DEFAULT_ADJUST_STEP_BPS,
            window_secs: DEFAULT_WINDOW_SECS,
            low_volume_threshold: DEFAULT_LOW_VOLUME_THRESHOLD,
            high_volume_threshold: DEFAULT_HIGH_VOLUME_THRESHOLD,
        }
    }
}

impl FeeConfig {
    /// Check every bound the controller relies on.
    pub fn validate(&self) -> Result<(), FeeConfigError> {
        validate_tax_bounds(self.min_tax_bps, self.max_tax_bps)?;

        if self.initial_tax_bps < self.min_tax_bps || self.initial_tax_bps > self.max_tax_bps {
            return Err(FeeConfigError::TaxRateOutOfBounds {
                rate: self.initial_tax_bps,
                min: self.min_tax_bps,
                max: self.max_tax_bps,
            });
        }

        validate_window(self.window_secs)?;
        validate_thresholds(self.low_volume_threshold, self.high_volume_threshold)?;

        Ok(())
    }
}

/// Shared bound check for genesis and the runtime setter.
pub(crate) fn validate_tax_bounds(min: Bps, max: Bps) -> Result<(), FeeConfigError> {
    if min > max {
        return Err(FeeConfigError::InvalidTaxBounds { min, max });
    }
    if max > BPS_DENOM {
        return Err(FeeConfigError::TaxAboveDenominator(max));
    }
    Ok(())
}

pub(crate) fn validate_window(window_secs: u64) -> Result<(), FeeConfigError> {
    if window_secs == 0 {
        return Err(FeeConfigError::ZeroVolumeWindow);
    }
    Ok(())
}

pub(crate) fn validate_thresholds(low: Amount, high: Amount) -> Result<(), FeeConfigError> {
    if low >= high {
        return Err(FeeConfigError::InvalidVolumeThresholds { low, high });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(FeeConfig::default().validate().is_ok());
    }

    #[test]
    fn inverted_bounds_rejected() {
        let config = FeeConfig {
            min_tax_bps: 500,
            max_tax_bps: 100,
            initial_tax_bps: 100,
            ..FeeConfig::default()
        };
        assert_eq!(
            config.validate().unwrap_err(),
            FeeConfigError::InvalidTaxBounds { min: 500, max: 100 }
        );
    }

    #[test]
    fn rate_outside_bounds_rejected() {
        let config = FeeConfig {
            initial_tax_bps: 2_000,
            ..FeeConfig::default()
        };
        assert_eq!(
            config.validate().unwrap_err(),
            FeeConfigError::TaxRateOutOfBounds {
                rate: 2_000,
                min: 0,
                max: 1_000
            }
        );
    }

    #[test]
    fn max_above_denominator_rejected() {
        let config = FeeConfig {
            max_tax_bps: 10_001,
            ..FeeConfig::default()
        };
        assert_eq!(
            config.validate().unwrap_err(),
            FeeConfigError::TaxAboveDenominator(10_001)
        );
    }

    #[test]
    fn zero_window_rejected() {
        let config = FeeConfig {
            window_secs: 0,
            ..FeeConfig::default()
        };
        assert_eq!(
            config.validate().unwrap_err(),
            FeeConfigError::ZeroVolumeWindow
        );
    }

    #[test]
    fn equal_thresholds_rejected() {
        let config = FeeConfig {
            low_volume_threshold: 1_000,
            high_volume_threshold: 1_000,
            ..FeeConfig::default()
        };
        assert_eq!(
            config.validate().unwrap_err(),
            FeeConfigError::InvalidVolumeThresholds {
                low: 1_000,
                high: 1_000
            }
        );
    }
}
