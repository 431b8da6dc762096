//! Unit tests for configuration parsing.
