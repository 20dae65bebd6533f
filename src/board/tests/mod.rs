//! Board module tests.
//!
//! Tests are organized into separate files by category:
//! - `perft.rs` - Move generation node counts against known results
//! - `apply.rs` - Applying moves and the FEN side fields they update
//! - `edge_cases.rs` - Special positions and edge cases
//! - `proptest.rs` - Property-based tests
