//! Binnacle - message-size binning for collective communication profiles
//!
//! This library reads the compact count files produced when profiling
//! collective operations, classifies every send/receive count into a small set
//! of ordered byte-size ranges, and writes one total per range for each
//! (job, communicator, rank) scope.

pub mod bins;
pub mod cli;
pub mod config;
pub mod counts;
pub mod driver;
pub mod error;
pub mod notation;
pub mod summary;
pub mod writer;
