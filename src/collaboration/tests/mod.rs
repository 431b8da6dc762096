//! Unit tests for the collaboration module.

mod element_service_tests;
mod lifecycle_service_tests;
mod sequence_tests;
