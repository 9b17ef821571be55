//! Inter-step delay policy
//!
//! The pause between steps is a uniformly random whole number of seconds
//! drawn from an inclusive range. It is never adaptive and never skipped when
//! enabled, except after the final step.

use crate::config::CrawlConfig;
use rand::Rng;
use std::time::Duration;

/// Random pause between consecutive steps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayPolicy {
    enabled: bool,
    min_secs: u64,
    max_secs: u64,
}

impl DelayPolicy {
    /// Creates an enabled policy; the bounds are swapped if given out of order
    pub fn new(min_secs: u64, max_secs: u64) -> Self {
        Self {
            enabled: true,
            min_secs: min_secs.min(max_secs),
            max_secs: max_secs.max(min_secs),
        }
    }

    /// A policy that never sleeps
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            min_secs: 0,
            max_secs: 0,
        }
    }

    /// Builds the policy from the `[crawl]` section
    pub fn from_config(config: &CrawlConfig) -> Self {
        if config.delay {
            Self::new(config.delay_min, config.delay_max)
        } else {
            Self::disabled()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Draws the next pause, or `None` when delays are switched off
    pub fn pick(&self) -> Option<Duration> {
        if !self.enabled {
            return None;
        }
        let secs = rand::thread_rng().gen_range(self.min_secs..=self.max_secs);
        Some(Duration::from_secs(secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_never_sleeps() {
        assert_eq!(DelayPolicy::disabled().pick(), None);
    }

    #[test]
    fn test_pick_stays_in_range() {
        let policy = DelayPolicy::new(2, 4);
        for _ in 0..200 {
            let secs = policy.pick().unwrap().as_secs();
            assert!((2..=4).contains(&secs), "picked {}s", secs);
        }
    }

    #[test]
    fn test_fixed_range() {
        assert_eq!(DelayPolicy::new(0, 0).pick(), Some(Duration::ZERO));
    }

    #[test]
    fn test_swapped_bounds() {
        assert_eq!(DelayPolicy::new(5, 3), DelayPolicy::new(3, 5));
    }

    #[test]
    fn test_from_config() {
        let mut config = CrawlConfig::default();
        assert_eq!(DelayPolicy::from_config(&config), DelayPolicy::new(10, 19));

        config.delay = false;
        assert!(!DelayPolicy::from_config(&config).is_enabled());
    }
}
