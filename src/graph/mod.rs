//! Read-only view over a compacted de Bruijn junction graph.

pub mod storage;

pub use storage::*;
