//! Tests for the OTP service

#[cfg(test)]
mod mocks;
#[cfg(test)]
mod concurrency_tests;
