pub mod averager;
pub mod error;
pub mod fetch;
pub mod ops;
pub mod output;
pub mod stats;
pub mod tracker;

pub use averager::{Averages, ParseReport, compute_averages, summarize_text};
pub use error::AggregateError;
pub use tracker::{Summary, ValueTracker};
