//! Shared test utilities for lqa-db unit tests.
