//! Unit tests for the group module.

mod group_service_tests;
