//! Tracity Insight: chart recommendation and natural-language summaries.
//!
//! Summaries are requested from an external text-generation service. Every
//! failure there degrades to a static local summary, so callers always get
//! a well-formed result.

pub mod chart;
pub mod config;
pub mod narrative;
pub mod prompts;
pub mod providers;
pub mod summarizer;
pub mod types;

pub use chart::recommend;
pub use config::LlmConfig;
pub use providers::{build_generator, TextGenerator};
pub use summarizer::InsightSummarizer;
pub use types::*;
