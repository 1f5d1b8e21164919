//! Index arithmetic for moving through a catalog.

use rand::{Rng, RngCore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

impl Direction {
    pub fn offset(self) -> isize {
        match self {
            Self::Previous => -1,
            Self::Next => 1,
        }
    }
}

/// Computes the index after one step.
///
/// Sequential mode wraps at both ends. Random mode ignores `direction` and
/// draws a different index uniformly.
pub fn step(
    current: usize,
    len: usize,
    direction: Direction,
    random_mode: bool,
    rng: &mut dyn RngCore,
) -> usize {
    if random_mode {
        random_index(current, len, rng)
    } else {
        wrapping_step(current, len, direction)
    }
}

/// `(current + direction + len) mod len`.
pub fn wrapping_step(current: usize, len: usize, direction: Direction) -> usize {
    if len == 0 {
        return 0;
    }
    let len = len as isize;
    let current = (current as isize).rem_euclid(len);
    (current + direction.offset() + len).rem_euclid(len) as usize
}

/// Uniform draw from `[0, len)` that never repeats `current` unless the
/// catalog has a single entry.
pub fn random_index(current: usize, len: usize, rng: &mut dyn RngCore) -> usize {
    if len <= 1 {
        return 0;
    }
    loop {
        let candidate = rng.random_range(0..len);
        if candidate != current {
            return candidate;
        }
    }
}
