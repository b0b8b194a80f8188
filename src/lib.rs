//! CogniBench - Timed reaction, memory, typing and aim benchmarks
//!
//! Each benchmark is a small state machine driven by user input and by
//! timers from an injectable clock. Finished attempts are handed to a
//! [`results::ResultSink`].

pub mod config;
pub mod random;
pub mod report;
pub mod results;
pub mod tests;
pub mod timing;
pub mod ui;
pub mod utils;

pub use config::Config;
