//! Single-pass analysis orchestration and its finalized output.

mod aggregator;
mod result;

pub use aggregator::{AnalysisAggregator, TOP_CAPACITY};
pub use result::AnalysisResult;
