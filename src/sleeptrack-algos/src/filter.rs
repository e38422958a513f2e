/// First-order exponential low-pass filter over a scalar stream.
///
/// Holds its previous output; each update blends the new sample into it:
/// `alpha * current + (1 - alpha) * previous`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExponentialFilter {
    alpha: f64,
    previous: f64,
}

impl ExponentialFilter {
    /// Roughly a ten-sample smoothing horizon.
    pub const DEFAULT_ALPHA: f64 = 0.1;

    pub fn new(alpha: f64) -> Self {
        Self {
            alpha,
            previous: 0.0,
        }
    }

    pub fn apply(current: f64, previous: f64, alpha: f64) -> f64 {
        alpha * current + (1.0 - alpha) * previous
    }

    pub fn update(&mut self, current: f64) -> f64 {
        self.previous = Self::apply(current, self.previous, self.alpha);
        self.previous
    }

    pub fn value(&self) -> f64 {
        self.previous
    }
}

impl Default for ExponentialFilter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ALPHA)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn apply_weights_current_by_alpha() {
        let out = ExponentialFilter::apply(100.0, 0.0, 0.1);
        assert!((out - 10.0).abs() < 1e-12);
    }

    #[test]
    fn apply_fixed_point() {
        for alpha in [0.0, 0.1, 0.5, 1.0] {
            assert_eq!(ExponentialFilter::apply(42.0, 42.0, alpha), 42.0);
        }
    }

    #[test]
    fn apply_stays_between_inputs() {
        let mut rng = rand::rng();
        for _ in 0..1000 {
            let previous = rng.random_range(-200.0..200.0);
            let current = rng.random_range(-200.0..200.0);
            let alpha = rng.random_range(0.0..=1.0);
            let out = ExponentialFilter::apply(current, previous, alpha);
            let (lo, hi) = if previous < current {
                (previous, current)
            } else {
                (current, previous)
            };
            assert!(
                out >= lo - 1e-9 && out <= hi + 1e-9,
                "{out} not within [{lo}, {hi}] for alpha {alpha}"
            );
        }
    }

    #[test]
    fn update_threads_previous_output() {
        let mut filter = ExponentialFilter::default();
        assert_eq!(filter.value(), 0.0);
        let first = filter.update(60.0);
        assert!((first - 6.0).abs() < 1e-12);
        let second = filter.update(60.0);
        assert!((second - 11.4).abs() < 1e-12);
        assert_eq!(filter.value(), second);
    }

    #[test]
    fn converges_to_constant_input() {
        let mut filter = ExponentialFilter::default();
        for _ in 0..500 {
            filter.update(70.0);
        }
        assert!((filter.value() - 70.0).abs() < 1e-6);
    }
}
