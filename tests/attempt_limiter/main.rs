// tests/attempt_limiter/main.rs

mod window_tests;
