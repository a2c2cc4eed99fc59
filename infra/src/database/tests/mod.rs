//! Database tests

mod connection_tests;
