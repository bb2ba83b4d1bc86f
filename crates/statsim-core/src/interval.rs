use std::fmt;

/// A range of real numbers with independently open or closed ends.
///
/// An infinite end is always treated as open, so `Interval::REAL` is
/// `(-inf, +inf)` regardless of how it was built.
///
/// # Examples
///
/// ```
/// use statsim_core::interval::Interval;
///
/// let closed = Interval::closed(1.0, 2.0);
/// assert!(closed.contains(1.0));
/// assert!(closed.contains(2.0));
///
/// let half_open = Interval::new(1.0, false, 2.0, true);
/// assert!(!half_open.contains(2.0));
/// assert_eq!(half_open.length(), 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    begin: f64,
    end: f64,
    is_begin_open: bool,
    is_end_open: bool,
}

impl Interval {
    /// The whole real line.
    pub const REAL: Self = Self {
        begin: f64::NEG_INFINITY,
        end: f64::INFINITY,
        is_begin_open: true,
        is_end_open: true,
    };

    /// Creates an interval with explicit open/closed ends.
    ///
    /// # Panics
    ///
    /// Panics in debug mode if `begin > end`.
    #[must_use]
    pub fn new(begin: f64, is_begin_open: bool, end: f64, is_end_open: bool) -> Self {
        debug_assert!(begin <= end, "interval begin must not exceed its end");
        Self {
            begin,
            end,
            is_begin_open: is_begin_open || begin == f64::NEG_INFINITY,
            is_end_open: is_end_open || end == f64::INFINITY,
        }
    }

    /// Creates `[begin, end]`.
    #[must_use]
    pub fn closed(begin: f64, end: f64) -> Self {
        Self::new(begin, false, end, false)
    }

    #[must_use]
    pub fn begin(&self) -> f64 {
        self.begin
    }

    #[must_use]
    pub fn end(&self) -> f64 {
        self.end
    }

    #[must_use]
    pub fn is_begin_open(&self) -> bool {
        self.is_begin_open
    }

    #[must_use]
    pub fn is_end_open(&self) -> bool {
        self.is_end_open
    }

    /// Returns `end - begin` (infinite for unbounded intervals).
    #[must_use]
    pub fn length(&self) -> f64 {
        self.end - self.begin
    }

    /// Returns `true` if `value` lies inside the interval, honoring open ends.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        let after_begin = if self.is_begin_open {
            self.begin < value
        } else {
            self.begin <= value
        };
        let before_end = if self.is_end_open {
            value < self.end
        } else {
            value <= self.end
        };
        after_begin && before_end
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let open = if self.is_begin_open { '(' } else { '[' };
        let close = if self.is_end_open { ')' } else { ']' };
        write!(f, "{open}{}, {}{close}", self.begin, self.end)
    }
}

/// The support of a distribution: the interval its values fall in, and the
/// lattice step between consecutive values for discrete distributions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RandomVariable {
    interval: Interval,
    distance: f64,
}

impl RandomVariable {
    /// A discrete variable taking values `interval.begin() + k * distance`.
    ///
    /// # Panics
    ///
    /// Panics in debug mode if `distance` is not positive.
    #[must_use]
    pub fn discrete(interval: Interval, distance: f64) -> Self {
        debug_assert!(distance > 0.0, "discrete step must be positive");
        Self { interval, distance }
    }

    /// A continuous variable over `interval`.
    #[must_use]
    pub fn continuous(interval: Interval) -> Self {
        Self {
            interval,
            distance: 0.0,
        }
    }

    #[must_use]
    pub fn interval(&self) -> Interval {
        self.interval
    }

    /// Step between consecutive values; `0.0` for continuous variables.
    #[must_use]
    pub fn distance(&self) -> f64 {
        self.distance
    }

    #[must_use]
    pub fn is_discrete(&self) -> bool {
        self.distance != 0.0
    }

    #[must_use]
    pub fn is_continuous(&self) -> bool {
        self.distance == 0.0
    }

    /// Returns `true` if `value` is a point this variable can take.
    #[must_use]
    pub fn admits(&self, value: f64) -> bool {
        if !self.interval.contains(value) {
            return false;
        }
        if self.is_continuous() {
            return true;
        }
        let steps = (value - self.interval.begin()) / self.distance;
        (steps - steps.round()).abs() < 1e-9
    }
}
