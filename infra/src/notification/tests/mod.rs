//! Notification tests
