//! Integration test suite.

mod helpers;

mod ws_test;
