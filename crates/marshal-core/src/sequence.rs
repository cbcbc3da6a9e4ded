//! Deterministic sequences the allocating entry points fill.

/// Length of the by-value array returned by [`fixed_steps`].
///
/// Part of the ABI: callers describe the return type as exactly this many
/// doubles, so it is not configurable.
pub const FIXED_LEN: usize = 10;

/// `[lower, lower + step, ..., lower + 9 * step]`.
///
/// Element `i` is `lower + i * step`, each computed independently.
pub fn fixed_steps(lower: f64, step: f64) -> [f64; FIXED_LEN] {
    std::array::from_fn(|i| lower + i as f64 * step)
}

/// `0.0, 1.0, ..., (count - 1) as f64`.
pub fn ramp(count: usize) -> impl ExactSizeIterator<Item = f64> {
    (0..count).map(|i| i as f64)
}
