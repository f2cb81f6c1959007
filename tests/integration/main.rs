//! Integration tests for chew
//!
//! These tests run whole batches against wiremock servers and local temp
//! files, exercising the coordinator end-to-end.

mod common;
mod fetch_tests;
mod politeness_tests;
