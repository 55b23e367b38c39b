use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cadence {
    pub base: Duration,
    pub backoff_multiplier: u32,
}

impl Cadence {
    pub fn new(base: Duration, backoff_multiplier: u32) -> Self {
        Self {
            base,
            backoff_multiplier: backoff_multiplier.max(1),
        }
    }

    pub fn fixed(base: Duration) -> Self {
        Self::new(base, 1)
    }

    pub fn backoff(&self) -> Duration {
        self.base.saturating_mul(self.backoff_multiplier)
    }

    pub fn next_delay(&self, consecutive_failures: u32) -> Duration {
        if consecutive_failures == 0 {
            self.base
        } else {
            self.backoff()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_delay_while_healthy() {
        let c = Cadence::new(Duration::from_secs(10), 3);
        assert_eq!(c.next_delay(0), Duration::from_secs(10));
    }

    #[test]
    fn backoff_after_any_number_of_failures() {
        let c = Cadence::new(Duration::from_secs(10), 3);
        for n in [1, 2, 5, 100] {
            assert_eq!(c.next_delay(n), Duration::from_secs(30));
        }
    }

    #[test]
    fn multiplier_floor_is_one() {
        let c = Cadence::new(Duration::from_secs(10), 0);
        assert_eq!(c.next_delay(3), Duration::from_secs(10));
        assert_eq!(Cadence::fixed(Duration::from_secs(60)).next_delay(1), Duration::from_secs(60));
    }
}
