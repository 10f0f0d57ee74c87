//! When the table grows, and to what capacity.
//!
//! Growth never shrinks the table and always lands on an odd capacity:
//! starting from the current capacity the target is stepped through
//! `c * 2 + 1` at least once, and further until the trigger no longer
//! fires for the current number of entries. Reinserting every entry into
//! the target therefore cannot trigger another growth.

/// Rule deciding when a `ChainSet` rebuilds its table at a larger capacity.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum GrowthPolicy {
    /// Grow once `len > capacity * 2 + 1`. A deliberately loose bound that
    /// tolerates chains of two entries on average before rebuilding.
    Loose,
    /// Grow once `len > capacity * factor`.
    MaxLoadFactor(f32),
}

/// Load factor used by `GrowthPolicy::default()`.
pub const DEFAULT_MAX_LOAD_FACTOR: f32 = 0.75;

impl Default for GrowthPolicy {
    fn default() -> Self {
        GrowthPolicy::MaxLoadFactor(DEFAULT_MAX_LOAD_FACTOR)
    }
}

impl GrowthPolicy {
    /// Whether the policy is usable: load factors must be finite and positive.
    pub fn is_valid(&self) -> bool {
        match *self {
            GrowthPolicy::Loose => true,
            GrowthPolicy::MaxLoadFactor(f) => f.is_finite() && f > 0.0,
        }
    }

    /// True when a table of `capacity` buckets holding `len` entries must grow.
    pub fn should_grow(&self, capacity: usize, len: usize) -> bool {
        match *self {
            GrowthPolicy::Loose => capacity.saturating_mul(2).saturating_add(1) < len,
            GrowthPolicy::MaxLoadFactor(f) => len as f64 > capacity as f64 * f as f64,
        }
    }

    /// Capacity to rebuild into once `should_grow(capacity, len)` fired.
    pub fn grown_capacity(&self, capacity: usize, len: usize) -> usize {
        let mut target = capacity;
        loop {
            target = target.saturating_mul(2).saturating_add(1);
            if self.settled(target, len) {
                return target;
            }
        }
    }

    fn settled(&self, capacity: usize, len: usize) -> bool {
        match *self {
            GrowthPolicy::Loose => capacity.saturating_mul(2) >= len,
            // saturation is the backstop for absurd factors
            GrowthPolicy::MaxLoadFactor(_) => {
                capacity == usize::MAX || !self.should_grow(capacity, len)
            }
        }
    }
}
