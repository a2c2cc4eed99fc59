//! Tests for multi-channel verification

#[cfg(test)]
mod orchestrator_tests;
