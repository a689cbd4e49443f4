//! Continuous scales: map a domain interval onto a range interval.

/// A continuous, monotonic mapping whose domain can be reinstalled and whose
/// output can be clamped to the range.
pub trait Scale: Send + Sync {
    fn set_domain(&mut self, domain: [f32; 2]);
    fn set_clamp(&mut self, clamp: bool);
    fn apply(&self, value: f32) -> f32;
}

/// Linear interpolation between `domain` and `range`.
///
/// A degenerate domain (both bounds equal) maps every input to the range
/// midpoint instead of dividing by zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    pub domain: [f32; 2],
    pub range: [f32; 2],
    pub clamp: bool,
}

impl Default for LinearScale {
    fn default() -> Self {
        Self {
            domain: [0.0, 1.0],
            range: [0.0, 1.0],
            clamp: false,
        }
    }
}

impl LinearScale {
    pub fn new(domain: [f32; 2], range: [f32; 2]) -> Self {
        Self {
            domain,
            range,
            clamp: false,
        }
    }

    pub fn clamped(mut self) -> Self {
        self.clamp = true;
        self
    }

    /// Position of `value` within the domain, 0 at `domain[0]` and 1 at `domain[1]`.
    fn normalize(&self, value: f32) -> f32 {
        let span = self.domain[1] - self.domain[0];
        if span == 0.0 || !span.is_finite() {
            return 0.5;
        }
        let t = (value - self.domain[0]) / span;
        if self.clamp {
            t.clamp(0.0, 1.0)
        } else {
            t
        }
    }
}

impl Scale for LinearScale {
    fn set_domain(&mut self, domain: [f32; 2]) {
        self.domain = domain;
    }

    fn set_clamp(&mut self, clamp: bool) {
        self.clamp = clamp;
    }

    fn apply(&self, value: f32) -> f32 {
        let t = self.normalize(value);
        self.range[0] + (self.range[1] - self.range[0]) * t
    }
}

/// `[min, max]` of the values, or `None` when there are none.
pub fn extent<I>(values: I) -> Option<[f32; 2]>
where
    I: IntoIterator<Item = f32>,
{
    values.into_iter().fold(None, |acc, v| match acc {
        None => Some([v, v]),
        Some([lo, hi]) => Some([lo.min(v), hi.max(v)]),
    })
}
