// tests/attempt_limiter/window_tests.rs

#[cfg(test)]
mod tests {
    use crate::fixtures::test_clock::TestClock;
    use attempt_limiter::{AttemptLimiter, AttemptLimiterConfig};

    fn limiter(max_attempts: u32, window_seconds: u64) -> (AttemptLimiter<String, TestClock>, TestClock) {
        let clock = TestClock::new(0.0);
        let config = AttemptLimiterConfig::new(max_attempts, window_seconds);
        let limiter = AttemptLimiter::with_config(config, clock.clone()).unwrap();
        (limiter, clock)
    }

    #[test]
    fn lockout_lifts_after_window() {
        let (limiter, clock) = limiter(5, 900);
        let client = "203.0.113.50";

        for _ in 0..5 {
            limiter.record_fail(client);
        }
        let decision = limiter.check(client);
        assert!(!decision.allowed);
        assert_eq!(decision.wait_seconds, 900);

        clock.advance(900.5);
        let pair: (bool, u64) = limiter.check(client).into();
        assert_eq!(pair, (true, 0));
    }

    #[test]
    fn expired_record_is_cleared_on_check() {
        let (limiter, clock) = limiter(3, 60);
        let client = "203.0.113.50";

        limiter.record_fail(client);
        clock.advance(61.0);

        assert!(limiter.check(client).allowed);
        assert_eq!(limiter.failure_count(client), None);
        assert_eq!(limiter.tracked_clients(), 0);
    }

    #[test]
    fn window_boundary_is_inclusive() {
        let (limiter, clock) = limiter(1, 60);
        let client = "203.0.113.50";

        limiter.record_fail(client);
        clock.advance(60.0);
        assert!(!limiter.check(client).allowed);

        clock.advance(0.001);
        assert!(limiter.check(client).allowed);
    }

    #[test]
    fn failure_after_window_starts_fresh() {
        let (limiter, clock) = limiter(3, 60);
        let client = "203.0.113.50";

        for _ in 0..3 {
            limiter.record_fail(client);
        }
        clock.advance(61.0);
        assert!(limiter.check(client).allowed);

        limiter.record_fail(client);
        assert_eq!(limiter.failure_count(client), Some(1));
        assert_eq!(limiter.check(client).wait_seconds, 1);
    }

    #[test]
    fn failure_on_stale_record_starts_fresh_without_check() {
        let (limiter, clock) = limiter(3, 60);
        let client = "203.0.113.50";

        for _ in 0..3 {
            limiter.record_fail(client);
        }
        clock.advance(61.0);

        limiter.record_fail(client);
        assert_eq!(limiter.failure_count(client), Some(1));

        let decision = limiter.check(client);
        assert!(!decision.allowed);
        assert_eq!(decision.remaining_attempts, 2);
    }

    #[test]
    fn window_anchors_to_first_failure() {
        let (limiter, clock) = limiter(3, 60);
        let client = "203.0.113.50";

        limiter.record_fail(client);
        clock.advance(30.0);
        limiter.record_fail(client);
        clock.advance(20.0);
        limiter.record_fail(client);

        // capped at t=50; window opened at t=0
        assert_eq!(limiter.check(client).wait_seconds, 10);

        clock.advance(11.0);
        assert!(limiter.check(client).allowed);
    }
}
