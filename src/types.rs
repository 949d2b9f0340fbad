use std::cmp::Ordering;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

/// A duration in seconds that remembers whether it is integral.
///
/// Workflow descriptions usually carry whole-second runtimes. Those must come
/// out of the manifest as integers, while anything that touched a fractional
/// input like `12.5` widens to a float.
///
/// Equality and ordering compare numeric values, so `Whole(3)` equals
/// `Fractional(3.0)`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Seconds {
    Whole(u64),
    Fractional(f64),
}

impl Seconds {
    pub const ZERO: Seconds = Seconds::Whole(0);

    pub fn as_f64(self) -> f64 {
        match self {
            Seconds::Whole(w) => w as f64,
            Seconds::Fractional(f) => f,
        }
    }

    pub fn is_whole(self) -> bool {
        matches!(self, Seconds::Whole(_))
    }

    /// Finite and not negative.
    pub fn is_valid(self) -> bool {
        match self {
            Seconds::Whole(_) => true,
            Seconds::Fractional(f) => f.is_finite() && f >= 0.0,
        }
    }

    pub fn max(self, other: Seconds) -> Seconds {
        if other > self { other } else { self }
    }

    /// `self * n`, staying whole when `self` is whole.
    pub fn times(self, n: u64) -> Seconds {
        match self {
            Seconds::Whole(w) => Seconds::Whole(w.saturating_mul(n)),
            Seconds::Fractional(f) => Seconds::Fractional(f * n as f64),
        }
    }
}

impl Default for Seconds {
    fn default() -> Self {
        Seconds::ZERO
    }
}

impl From<u64> for Seconds {
    fn from(value: u64) -> Self {
        Seconds::Whole(value)
    }
}

impl From<f64> for Seconds {
    fn from(value: f64) -> Self {
        Seconds::Fractional(value)
    }
}

impl Add for Seconds {
    type Output = Seconds;

    fn add(self, rhs: Seconds) -> Seconds {
        match (self, rhs) {
            (Seconds::Whole(a), Seconds::Whole(b)) => Seconds::Whole(a.saturating_add(b)),
            (a, b) => Seconds::Fractional(a.as_f64() + b.as_f64()),
        }
    }
}

impl AddAssign for Seconds {
    fn add_assign(&mut self, rhs: Seconds) {
        *self = *self + rhs;
    }
}

impl Sum for Seconds {
    fn sum<I: Iterator<Item = Seconds>>(iter: I) -> Seconds {
        iter.fold(Seconds::ZERO, |acc, s| acc + s)
    }
}

impl PartialEq for Seconds {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Seconds::Whole(a), Seconds::Whole(b)) => a == b,
            (a, b) => a.as_f64() == b.as_f64(),
        }
    }
}

impl PartialOrd for Seconds {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Seconds::Whole(a), Seconds::Whole(b)) => Some(a.cmp(b)),
            (a, b) => a.as_f64().partial_cmp(&b.as_f64()),
        }
    }
}

impl fmt::Display for Seconds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Seconds::Whole(w) => write!(f, "{w}"),
            Seconds::Fractional(x) => write!(f, "{x}"),
        }
    }
}
