//! Property-based tests for selection invariants
