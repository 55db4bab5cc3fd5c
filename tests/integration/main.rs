//! Integration tests for job-cascade
//!
//! These tests use wiremock to stand in for the listing site and
//! exercise full extraction runs end-to-end.

mod browser_tests;
mod common;
mod harvest_tests;
mod output_tests;
