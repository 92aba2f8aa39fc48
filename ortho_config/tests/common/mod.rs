//! Shared test fixtures for integration tests.
//!
//! This module provides common test structs and utilities that can be imported
//! by multiple integration test files to avoid duplication.

pub mod merge_fixtures;
