pub mod fetcher;
pub mod pipeline;
pub mod telemetry;

pub use fetcher::{fetch_forum, FetchLimits, FetchedForum};
pub use pipeline::{Pipeline, RunSummary};
