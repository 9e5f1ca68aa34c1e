use crate::keywords::Category;
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// Annotation fields attached to a record after fetching.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Annotations {
    pub sentiment: f64,
    pub categories: Vec<CategoryFlags>,
}

impl Annotations {
    pub fn category(&self, category: Category) -> Option<&CategoryFlags> {
        self.categories.iter().find(|flags| flags.category == category)
    }

    /// Zero when the category has not been annotated.
    pub fn category_score(&self, category: Category) -> u32 {
        self.category(category).map_or(0, |flags| flags.score)
    }
}

/// Per-keyword presence flags for one category, in lexicon order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryFlags {
    pub category: Category,
    pub flags: Vec<bool>,
    pub score: u32,
}

impl CategoryFlags {
    pub fn new(category: Category, flags: Vec<bool>) -> Self {
        let score = flags.iter().filter(|flag| **flag).count() as u32;
        Self {
            category,
            flags,
            score,
        }
    }
}

/// Common view over posts and comments used by annotation, aggregation and dumps.
pub trait TextRecord {
    /// The free-text field that is scored and matched.
    fn text(&self) -> &str;
    fn created_at(&self) -> DateTime<Utc>;
    fn annotations(&self) -> &Annotations;
    fn annotations_mut(&mut self) -> &mut Annotations;
    /// Column names of the fetched fields, in dump order.
    fn base_columns() -> &'static [&'static str]
    where
        Self: Sized;
    fn base_values(&self) -> Vec<String>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostRecord {
    pub id: String,
    pub title: String,
    pub body: String,
    pub url: String,
    pub score: i64,
    pub comment_count: u64,
    pub created_at: DateTime<Utc>,
    pub full_text: String,
    pub annotations: Annotations,
}

impl PostRecord {
    pub fn new(
        id: String,
        title: String,
        body: String,
        url: String,
        score: i64,
        comment_count: u64,
        created_at: DateTime<Utc>,
    ) -> Self {
        let full_text = format!("{} {}", title, body);
        Self {
            id,
            title,
            body,
            url,
            score,
            comment_count,
            created_at,
            full_text,
            annotations: Annotations::default(),
        }
    }
}

impl TextRecord for PostRecord {
    fn text(&self) -> &str {
        &self.full_text
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    fn annotations_mut(&mut self) -> &mut Annotations {
        &mut self.annotations
    }

    fn base_columns() -> &'static [&'static str] {
        &[
            "id",
            "title",
            "body",
            "url",
            "score",
            "comment_count",
            "created_at",
            "full_text",
        ]
    }

    fn base_values(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.title.clone(),
            self.body.clone(),
            self.url.clone(),
            self.score.to_string(),
            self.comment_count.to_string(),
            self.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            self.full_text.clone(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentRecord {
    pub post_id: String,
    pub comment_id: String,
    /// Reddit fullname of the parent, `t3_` for a post or `t1_` for a comment.
    pub parent_id: String,
    pub body: String,
    pub score: i64,
    pub created_at: DateTime<Utc>,
    pub annotations: Annotations,
}

impl CommentRecord {
    pub fn new(
        post_id: String,
        comment_id: String,
        parent_id: String,
        body: String,
        score: i64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            post_id,
            comment_id,
            parent_id,
            body,
            score,
            created_at,
            annotations: Annotations::default(),
        }
    }
}

impl TextRecord for CommentRecord {
    fn text(&self) -> &str {
        &self.body
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    fn annotations_mut(&mut self) -> &mut Annotations {
        &mut self.annotations
    }

    fn base_columns() -> &'static [&'static str] {
        &[
            "post_id",
            "comment_id",
            "comment_parent_id",
            "comment_body",
            "comment_score",
            "created_at",
        ]
    }

    fn base_values(&self) -> Vec<String> {
        vec![
            self.post_id.clone(),
            self.comment_id.clone(),
            self.parent_id.clone(),
            self.body.clone(),
            self.score.to_string(),
            self.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryResult {
    pub category: Category,
    /// Percentage, may exceed 100 when records average more than one match.
    pub signal_strength: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityCount {
    pub name: String,
    pub frequency: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub forum: String,
    pub generated_at: DateTime<Local>,
    pub categories: Vec<CategoryResult>,
    pub entities: Vec<EntityCount>,
    pub post_sentiment: f64,
    pub comment_sentiment: f64,
}
