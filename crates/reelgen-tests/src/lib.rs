//! Integration test crate for ReelGen.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! It drives the drag controller against the real stores.


#[cfg(test)]
mod trim_sessions;

#[cfg(test)]
mod invariants;
