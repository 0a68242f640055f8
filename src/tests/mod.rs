//! # Cross-Module Test Suite
//!
//! Tests that drive the fetcher against a local HTTP stub and run the full
//! fetch → render pipeline. Unit tests for single modules live next to
//! their code.

mod pipeline_tests;
mod stub;
