//! Unit tests for fragment rendering.

mod fragment_tests;
