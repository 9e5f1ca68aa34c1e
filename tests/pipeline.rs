use async_trait::async_trait;
use chrono::{DateTime, Utc};
use report_writer::read_table_shape;
use rumour_collator::{FetchLimits, Pipeline};
use rumour_core::{
    Category, CommentRecord, CoreError, ForumSource, PostRecord, RedditApiError,
};
use signal_engine::LexiconSentiment;
use std::collections::HashMap;
use std::path::Path;

#[derive(Default)]
struct FakeForum {
    posts: HashMap<String, Vec<PostRecord>>,
    comments: HashMap<String, Vec<CommentRecord>>,
}

#[async_trait]
impl ForumSource for FakeForum {
    async fn hot_posts(&self, forum: &str, limit: u32) -> Result<Vec<PostRecord>, CoreError> {
        let posts = self.posts.get(forum).ok_or_else(|| {
            CoreError::from(RedditApiError::SubredditNotFound {
                subreddit: forum.to_string(),
            })
        })?;
        Ok(posts.iter().take(limit as usize).cloned().collect())
    }

    async fn post_comments(
        &self,
        post_id: &str,
        _limit: u32,
    ) -> Result<Vec<CommentRecord>, CoreError> {
        Ok(self.comments.get(post_id).cloned().unwrap_or_default())
    }
}

fn at(offset: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(1_700_000_000 + offset, 0).unwrap()
}

fn post(id: &str, title: &str, body: &str) -> PostRecord {
    PostRecord::new(
        id.to_string(),
        title.to_string(),
        body.to_string(),
        format!("https://reddit.com/r/test/{id}"),
        10,
        1,
        at(0),
    )
}

fn comment(post_id: &str, id: &str, body: &str) -> CommentRecord {
    CommentRecord::new(
        post_id.to_string(),
        id.to_string(),
        format!("t3_{post_id}"),
        body.to_string(),
        1,
        at(60),
    )
}

fn fake() -> FakeForum {
    let mut forum = FakeForum::default();
    forum.posts.insert(
        "cscareerquestions".to_string(),
        vec![
            post("p1", "Merger rumours", "Example Corp might be bought by Sample Inc"),
            post("p2", "Interview tips", "Practice every day, it is great"),
            post("p3", "Salary thread", "Post your numbers"),
        ],
    );
    forum.posts.insert("quiet".to_string(), Vec::new());
    forum.comments.insert(
        "p1".to_string(),
        vec![
            comment("p1", "c1", "Heard about layoffs and a new manager"),
            comment("p1", "c2", "Sample Inc again? Terrible news"),
        ],
    );
    forum
}

fn run_dirs(base: &Path) -> Vec<std::path::PathBuf> {
    match std::fs::read_dir(base) {
        Ok(entries) => entries.map(|e| e.unwrap().path()).collect(),
        Err(_) => Vec::new(),
    }
}

#[tokio::test]
async fn empty_forum_list_creates_nothing() {
    let base = tempfile::tempdir().unwrap();
    let output = base.path().join("output");
    let pipeline = Pipeline::new(fake(), LexiconSentiment::new(), &output).unwrap();

    let summaries = pipeline.run_all(&[]).await.unwrap();
    assert!(summaries.is_empty());
    assert!(!output.exists());
}

#[tokio::test]
async fn forum_run_writes_every_artifact() {
    let base = tempfile::tempdir().unwrap();
    let pipeline = Pipeline::new(fake(), LexiconSentiment::new(), base.path()).unwrap();

    let summaries = pipeline
        .run_all(&["cscareerquestions".to_string()])
        .await
        .unwrap();
    assert_eq!(summaries.len(), 1);

    let summary = &summaries[0];
    let dir = &summary.directory;
    let name = dir.file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("cscareerquestions_"));
    assert_eq!(name.len(), "cscareerquestions_".len() + "YYYYMMDD_HHMMSS".len());

    for file in ["report.txt", "posts.csv", "comments.csv", "sentiment_posts.png", "sentiment_comments.png"] {
        assert!(dir.join(file).is_file(), "missing {file}");
    }
    for category in ["merger", "layoff", "reassignment", "reduced_workload"] {
        for set in ["posts", "comments"] {
            let chart = dir.join(format!("keyword_frequency_{category}_keywords_{set}.png"));
            assert!(chart.is_file(), "missing {}", chart.display());
        }
    }

    let (_, post_rows) = read_table_shape(&dir.join("posts.csv")).unwrap();
    let (comment_columns, comment_rows) = read_table_shape(&dir.join("comments.csv")).unwrap();
    assert_eq!(post_rows, 3);
    assert_eq!(comment_rows, 2);
    assert_eq!(comment_columns[0], "post_id");

    let report = std::fs::read_to_string(dir.join("report.txt")).unwrap();
    assert!(report.starts_with("Analysis Report for r/cscareerquestions\n"));
    assert!(report.contains("Sample Inc: 2\n"));
    assert!(report.contains("Example Corp: 1\n"));
}

#[tokio::test]
async fn signal_strengths_combine_posts_and_comments() {
    let base = tempfile::tempdir().unwrap();
    let pipeline = Pipeline::new(fake(), LexiconSentiment::new(), base.path()).unwrap();

    let summary = pipeline.analyze_forum("cscareerquestions").await.unwrap();
    let strength = |category: Category| {
        summary
            .report
            .categories
            .iter()
            .find(|result| result.category == category)
            .unwrap()
            .signal_strength
    };

    // One merger post in three, no merger comments.
    assert!((strength(Category::Merger) - 33.33).abs() < 0.01);
    // "layoff" in one comment of two.
    assert!((strength(Category::Layoff) - 50.0).abs() < 1e-9);
    // "new manager" in one comment of two.
    assert!((strength(Category::Reassignment) - 50.0).abs() < 1e-9);
    assert_eq!(strength(Category::ReducedWorkload), 0.0);

    assert_eq!(summary.post_count, 3);
    assert_eq!(summary.comment_count, 2);
    assert!(summary.report.comment_sentiment < 0.0);
}

#[tokio::test]
async fn forum_without_posts_still_reports() {
    let base = tempfile::tempdir().unwrap();
    let pipeline = Pipeline::new(fake(), LexiconSentiment::new(), base.path()).unwrap();

    let summary = pipeline.analyze_forum("quiet").await.unwrap();
    assert!(summary.report.categories.iter().all(|c| c.signal_strength == 0.0));
    assert!(summary.report.entities.is_empty());
    assert_eq!(summary.report.post_sentiment, 0.0);

    let (columns, rows) = read_table_shape(&summary.directory.join("posts.csv")).unwrap();
    assert_eq!(rows, 0);
    assert_eq!(columns[0], "id");

    let report = std::fs::read_to_string(summary.directory.join("report.txt")).unwrap();
    assert!(report.contains("None found"));
}

#[tokio::test]
async fn first_failure_aborts_remaining_forums() {
    let base = tempfile::tempdir().unwrap();
    let pipeline = Pipeline::new(fake(), LexiconSentiment::new(), base.path()).unwrap();

    let forums = vec!["missing".to_string(), "cscareerquestions".to_string()];
    let err = pipeline.run_all(&forums).await.unwrap_err();
    assert!(matches!(
        err,
        CoreError::RedditApi(RedditApiError::SubredditNotFound { .. })
    ));
    // Failed fetches leave no run directory behind and later forums never start.
    assert!(run_dirs(base.path()).is_empty());
}

#[tokio::test]
async fn isolated_failures_let_other_forums_finish() {
    let base = tempfile::tempdir().unwrap();
    let pipeline = Pipeline::new(fake(), LexiconSentiment::new(), base.path())
        .unwrap()
        .isolate_failures(true)
        .with_limits(FetchLimits {
            max_posts: 2,
            max_comments_per_post: 1,
        });

    let forums = vec!["missing".to_string(), "cscareerquestions".to_string()];
    let summaries = pipeline.run_all(&forums).await.unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].forum, "cscareerquestions");
    assert_eq!(summaries[0].post_count, 2);
    assert_eq!(summaries[0].comment_count, 1);
    assert_eq!(run_dirs(base.path()).len(), 1);
}
