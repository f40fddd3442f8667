use log::info;

/// In-memory count behind the counter widget.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Counter {
    count: i64,
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> i64 {
        self.count
    }

    pub fn increase(&mut self) -> i64 {
        self.set(self.count.saturating_add(1))
    }

    /// No floor; the count goes negative.
    pub fn decrease(&mut self) -> i64 {
        self.set(self.count.saturating_sub(1))
    }

    pub fn reset(&mut self) -> i64 {
        self.set(0)
    }

    fn set(&mut self, count: i64) -> i64 {
        self.count = count;
        info!("Count is now: {}", self.count);
        self.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_is_the_sum_of_deltas() {
        let mut counter = Counter::new();
        counter.increase();
        counter.increase();
        assert_eq!(counter.decrease(), 1);
        assert_eq!(counter.count(), 1);
    }

    #[test]
    fn decrease_goes_below_zero() {
        let mut counter = Counter::new();
        counter.decrease();
        counter.decrease();
        assert_eq!(counter.count(), -2);
    }

    #[test]
    fn reset_always_yields_zero() {
        let mut counter = Counter::new();
        assert_eq!(counter.reset(), 0);

        for _ in 0..5 {
            counter.increase();
        }
        counter.decrease();
        assert_eq!(counter.reset(), 0);

        counter.decrease();
        assert_eq!(counter.reset(), 0);
        assert_eq!(counter.increase(), 1);
    }

    #[test]
    fn saturates_instead_of_overflowing() {
        let mut counter = Counter { count: i64::MAX };
        assert_eq!(counter.increase(), i64::MAX);
    }
}
