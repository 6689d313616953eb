//! Unit tests for analyzer components

pub mod return_tests;
