//! Cross-module scenario tests and shared test helpers.

pub(crate) mod support;
