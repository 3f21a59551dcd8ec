//! Anystore Benchmark Library
//!
//! Shared data generators and repository factories for the benchmarks.

pub mod data_gen;
pub mod stores;
