//! # LMSR fixed-point math
//!
//! Logarithmic Market Scoring Rule cost and price functions in 7-decimal
//! i128 fixed point (the Stellar native precision), with no floating point.
//!
//! ## Cost function
//!
//! ```text
//! C(qy, qn) = b · ln(e^{qy/b} + e^{qn/b})
//! ```
//!
//! evaluated in the overflow-safe form
//!
//! ```text
//! C(qy, qn) = max(qy, qn) + b · ln(1 + e^{-|qy - qn| / b})
//! ```
//!
//! so that `exp` only ever sees non-positive arguments and `ln(1+z)` only
//! sees `z ∈ (0, 1]`. All quantities (`qy`, `qn`, `b`, costs) are collateral
//! base units, which double as the fixed-point representation.
//!
//! ## Precision
//!
//! `exp(-t)` uses ln2 range reduction plus a Taylor series on the residual
//! (`r < ln2`, terms fall by ≥ r/n per step); `ln(1+z)` uses the
//! `2·atanh(z/(2+z))` series with `|w| ≤ 1/3`. Both truncate when a term
//! rounds to zero, leaving series error below 10⁻⁹ nominal. At imbalance
//! `|qy − qn| > 16·b` the cheap side's price saturates to within one scale
//! unit of zero; callers should treat that as the supported imbalance bound.
//! `test_lmsr` checks cost and price against an `f64` reference across an
//! imbalance sweep.
//!
//! ## Rounding
//!
//! [`buy_cost`] rounds against the trader by adding [`ROUNDING_GUARD`];
//! [`sell_payout`] subtracts it (floored at zero). The guard dominates the
//! series error, so buying and immediately selling the same size can never
//! return more than was paid.

/// Fixed-point scale: 7 decimal places, matching Stellar native token
/// precision, so contract amounts convert 1:1 to on-chain balances.
pub const SCALE: i128 = 10_000_000;

/// ln(2) · SCALE. Used for range reduction and for the market seed
/// (the LMSR maximum loss is b·ln2).
pub const LN2: i128 = 6_931_472;

/// Rounding margin applied to every trade, in scale units (10⁻⁶ nominal).
/// Added to buy costs, subtracted from sell payouts.
pub const ROUNDING_GUARD: i128 = 10;

/// Past `k = t / ln2` of this size, `exp(-t)` is below half a scale unit.
const EXP_UNDERFLOW_K: i128 = 24;

/// e^r for 0 ≤ r < ln2, scaled. Plain Taylor series; all terms positive,
/// stops when a term truncates to zero (~20 iterations worst case).
fn exp_pos_small(r: i128) -> i128 {
    let mut term = SCALE;
    let mut sum = SCALE;
    let mut n: i128 = 1;
    while term > 0 {
        term = term * r / (n * SCALE);
        sum += term;
        n += 1;
    }
    sum
}

/// e^(-t) for t ≥ 0, scaled. Returns 0 once the true value is below half a
/// scale unit.
pub fn exp_neg(t: i128) -> i128 {
    if t <= 0 {
        return SCALE;
    }
    let k = t / LN2;
    if k >= EXP_UNDERFLOW_K {
        return 0;
    }
    let r = t - k * LN2;
    // exp(-t) = 1 / (2^k · e^r); e^r ∈ [1, 2) so the shifted divisor
    // stays well inside i128.
    let divisor = exp_pos_small(r) << (k as u32);
    SCALE * SCALE / divisor
}

/// ln(1 + z) for 0 ≤ z ≤ SCALE, scaled.
///
/// Uses ln(1+z) = 2·atanh(w) with w = z/(2+z) ≤ 1/3, whose odd-power series
/// converges to 7-decimal precision in under ten terms.
pub fn ln1p(z: i128) -> i128 {
    if z <= 0 {
        return 0;
    }
    let w = z * SCALE / (2 * SCALE + z);
    let w2 = w * w / SCALE;
    let mut power = w;
    let mut sum = w;
    let mut n: i128 = 1;
    loop {
        power = power * w2 / SCALE;
        let term = power / (2 * n + 1);
        if term == 0 {
            break;
        }
        sum += term;
        n += 1;
    }
    2 * sum
}

/// LMSR cost of the pool state `(qy, qn)` with liquidity `b`, in base units.
///
/// `cost(0, 0, b) == b·ln2` is the seed collateral a new market must hold;
/// it equals the market maker's maximum possible loss.
pub fn cost(qy: i128, qn: i128, b: i128) -> i128 {
    let (hi, lo) = if qy >= qn { (qy, qn) } else { (qn, qy) };
    let t = (hi - lo) * SCALE / b;
    hi + b * ln1p(exp_neg(t)) / SCALE
}

/// Probability of YES in scale units (SCALE == certainty).
///
/// `price_yes = 1 / (1 + e^{-(qy-qn)/b})`. The NO price is defined as
/// `SCALE - price_yes`, so the two always sum to exactly SCALE.
pub fn price_yes(qy: i128, qn: i128, b: i128) -> i128 {
    let d = qy - qn;
    if d >= 0 {
        let e = exp_neg(d * SCALE / b);
        SCALE * SCALE / (SCALE + e)
    } else {
        let e = exp_neg((-d) * SCALE / b);
        SCALE - SCALE * SCALE / (SCALE + e)
    }
}

/// Collateral charged for buying `shares` on one side, rounded against the
/// trader. `yes_delta`/`no_delta` of the caller decide the side.
pub fn buy_cost(qy: i128, qn: i128, b: i128, yes_delta: i128, no_delta: i128) -> i128 {
    let before = cost(qy, qn, b);
    let after = cost(qy + yes_delta, qn + no_delta, b);
    after - before + ROUNDING_GUARD
}

/// Collateral returned for selling shares back to the book, rounded against
/// the trader and floored at zero.
pub fn sell_payout(qy: i128, qn: i128, b: i128, yes_delta: i128, no_delta: i128) -> i128 {
    let before = cost(qy, qn, b);
    let after = cost(qy - yes_delta, qn - no_delta, b);
    let payout = before - after - ROUNDING_GUARD;
    if payout > 0 {
        payout
    } else {
        0
    }
}

/// Seed collateral for a fresh market: b·ln2, the maximum loss bound.
pub fn seed_collateral(b: i128) -> i128 {
    b * LN2 / SCALE
}
