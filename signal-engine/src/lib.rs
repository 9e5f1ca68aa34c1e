pub mod aggregator;
pub mod annotator;
pub mod entities;
pub mod sentiment;

pub use aggregator::{
    average_sentiment, category_results, combined_signal, keyword_frequencies, signal_strength,
};
pub use annotator::{annotate, keyword_flags};
pub use entities::{CompanyExtractor, TOP_ENTITIES};
pub use sentiment::{LexiconSentiment, PolarityScorer};
