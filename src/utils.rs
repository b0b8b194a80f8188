//! Shared utility functions and traits

/// Extension trait for tracking best/worst values in `Option<T>`.
///
/// # Example
///
/// ```
/// use cognibench::utils::MinMaxExt;
///
/// let mut best: Option<u64> = None;
/// let mut worst: Option<u64> = None;
///
/// for latency in [240, 185, 310] {
///     best.update_min(latency);
///     worst.update_max(latency);
/// }
/// assert_eq!(best, Some(185));
/// assert_eq!(worst, Some(310));
/// ```
pub trait MinMaxExt<T: Ord + Copy> {
    /// Stores `value` if it is smaller than the current one or none exists yet.
    fn update_min(&mut self, value: T);

    /// Stores `value` if it is larger than the current one or none exists yet.
    fn update_max(&mut self, value: T);
}

impl<T: Ord + Copy> MinMaxExt<T> for Option<T> {
    fn update_min(&mut self, value: T) {
        *self = Some(self.map(|m| m.min(value)).unwrap_or(value));
    }

    fn update_max(&mut self, value: T) {
        *self = Some(self.map(|m| m.max(value)).unwrap_or(value));
    }
}

/// Round a non-negative value to the nearest integer, halves going up
pub fn round_u64(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        (value + 0.5).floor() as u64
    } else {
        0
    }
}

/// Rounded mean of the samples, `None` when there are none
pub fn mean_rounded(samples: &[u64]) -> Option<u64> {
    if samples.is_empty() {
        return None;
    }
    let sum: u64 = samples.iter().sum();
    Some(round_u64(sum as f64 / samples.len() as f64))
}

/// Rounded `100 * part / whole`, or `empty` when `whole` is zero
pub fn percent(part: usize, whole: usize, empty: u32) -> u32 {
    if whole == 0 {
        return empty;
    }
    round_u64(100.0 * part as f64 / whole as f64) as u32
}
