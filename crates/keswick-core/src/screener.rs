//! Screener verification arithmetic.
//!
//! Year-over-year growth with sign-transition clamping, PEG ratios, and
//! checks that re-derive a sheet's reported figures from the underlying
//! values. A growth move across zero is clamped to plus or minus 100%, so
//! a reported PEG built on a clamped growth gets re-derived rather than
//! flagged.

use crate::error::{ResolveError, Result};

/// Tolerance for comparing a reported figure against a recomputed one.
///
/// Source sheets round at 4 decimal places and occasionally drift by one
/// unit in the last place.
const VERIFY_TOLERANCE: f64 = 5e-5;

/// Outcome of verifying a reported figure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verification {
    /// Reported figure matches the recomputed one within tolerance.
    Consistent,
    /// Reported figure superseded by a re-derived value.
    Corrected(f64),
    /// Reported figure disagrees with the recomputed one.
    Mismatch {
        /// The recomputed figure.
        expected: f64,
        /// The figure as reported.
        reported: f64,
    },
}

/// Year-over-year growth from `old` to `new`.
///
/// Sign transitions are clamped: negative to positive is `1.0` (no more
/// than a 100% recovery), positive to negative is `-1.0`. When both values
/// are negative the magnitudes are compared over the old value, so a
/// shrinking loss reads as positive growth.
///
/// # Errors
///
/// [`ResolveError::ZeroDenominator`] when `old` is zero.
pub fn growth_rate(old: f64, new: f64) -> Result<f64> {
    if old == 0.0 {
        return Err(ResolveError::ZeroDenominator {
            quantity: "growth over a zero base period",
        });
    }

    if old < 0.0 && new > 0.0 {
        return Ok(1.0);
    }
    if old > 0.0 && new < 0.0 {
        return Ok(-1.0);
    }
    if old < 0.0 && new < 0.0 {
        return Ok((new.abs() - old.abs()) / old);
    }
    Ok((new - old) / old)
}

/// Verify a reported growth figure against [`growth_rate`]`(old, new)`.
///
/// Sign-transition rows come back as [`Verification::Corrected`] carrying
/// the clamped value, since sheets rarely apply the clamp themselves.
pub fn check_growth(old: f64, new: f64, reported: f64) -> Result<Verification> {
    let expected = growth_rate(old, new)?;

    if (old < 0.0 && new > 0.0) || (old > 0.0 && new < 0.0) {
        return Ok(Verification::Corrected(expected));
    }

    if (reported - expected).abs() < VERIFY_TOLERANCE {
        Ok(Verification::Consistent)
    } else {
        Ok(Verification::Mismatch { expected, reported })
    }
}

/// PEG ratio: price/earnings over growth, with growth read as a percentage.
///
/// # Errors
///
/// [`ResolveError::ZeroDenominator`] when `growth` is zero.
pub fn peg_ratio(pe: f64, growth: f64) -> Result<f64> {
    if growth == 0.0 {
        return Err(ResolveError::ZeroDenominator { quantity: "PEG over zero growth" });
    }
    Ok((pe / growth) / 100.0)
}

/// Verify a reported PEG figure against [`peg_ratio`]`(pe, growth)`.
///
/// When growth was clamped to plus or minus 1 the sheet's PEG was built
/// from the unclamped figure, so the check re-derives it as `pe / growth`
/// instead of flagging a mismatch.
pub fn check_peg(pe: f64, growth: f64, reported: f64) -> Result<Verification> {
    let expected = peg_ratio(pe, growth)?;

    if (reported - expected).abs() < VERIFY_TOLERANCE {
        return Ok(Verification::Consistent);
    }

    if growth == 1.0 || growth == -1.0 {
        return Ok(Verification::Corrected(pe / growth));
    }

    Ok(Verification::Mismatch { expected, reported })
}

/// Element-wise working capital over total assets, rounded to 2 decimal
/// places.
///
/// The two series may differ in length (statement feeds sometimes truncate
/// one of them); the shorter is padded with zeros, and any zero on either
/// side yields a zero ratio rather than a division.
pub fn working_capital_to_assets(working_capital: &[f64], total_assets: &[f64]) -> Vec<f64> {
    let len = working_capital.len().max(total_assets.len());

    (0..len)
        .map(|i| {
            let wc = working_capital.get(i).copied().unwrap_or(0.0);
            let ta = total_assets.get(i).copied().unwrap_or(0.0);
            if wc == 0.0 || ta == 0.0 {
                0.0
            } else {
                (wc / ta * 100.0).round() / 100.0
            }
        })
        .collect()
}
