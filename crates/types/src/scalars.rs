//! Scalar units shared across the workspace.

/// Atomic token units.
pub type Amount = u64;

/// Basis points (1/100 of a percent); 10_000 bps = 100%.
pub type Bps = u16;

/// Seconds as reported by the host clock.
///
/// The host guarantees a monotonically non-decreasing value between
/// calls; a decreasing clock is not defended against.
pub type Timestamp = u64;

/// Denominator for basis-point arithmetic.
pub const BPS_DENOM: Bps = 10_000;
