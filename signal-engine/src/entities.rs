//! Naive company-name matching: a capitalised word followed by a corporate suffix.

use regex::Regex;
use rumour_core::{CommentRecord, CoreError, EntityCount, PostRecord};
use std::collections::HashMap;

const COMPANY_PATTERN: &str = r"\b[A-Z][a-z]+ (?:Inc|Corp|Co|Ltd)\b";

/// How many entities end up in a report.
pub const TOP_ENTITIES: usize = 10;

pub struct CompanyExtractor {
    pattern: Regex,
    limit: usize,
}

impl CompanyExtractor {
    pub fn new() -> Result<Self, CoreError> {
        let pattern = Regex::new(COMPANY_PATTERN).map_err(|e| CoreError::Internal {
            message: format!("Company pattern failed to compile: {}", e),
        })?;
        Ok(Self {
            pattern,
            limit: TOP_ENTITIES,
        })
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Most frequent matches first; equal counts keep the order they were first seen in.
    pub fn extract(&self, text: &str) -> Vec<EntityCount> {
        let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
        for (position, found) in self.pattern.find_iter(text).enumerate() {
            counts.entry(found.as_str()).or_insert((0, position)).0 += 1;
        }

        let mut ranked: Vec<(&str, usize, usize)> = counts
            .into_iter()
            .map(|(name, (frequency, first_seen))| (name, frequency, first_seen))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

        ranked
            .into_iter()
            .take(self.limit)
            .map(|(name, frequency, _)| EntityCount {
                name: name.to_string(),
                frequency,
            })
            .collect()
    }

    /// Matches over every post's full text followed by every comment body.
    pub fn extract_from_records(
        &self,
        posts: &[PostRecord],
        comments: &[CommentRecord],
    ) -> Vec<EntityCount> {
        let corpus = posts
            .iter()
            .map(|post| post.full_text.as_str())
            .chain(comments.iter().map(|comment| comment.body.as_str()))
            .collect::<Vec<_>>()
            .join(" ");
        self.extract(&corpus)
    }
}
