//! Per-forum orchestration: fetch, annotate, aggregate, extract, write.

use crate::fetcher::{fetch_forum, FetchLimits};
use chrono::Local;
use report_writer::{
    init_fonts, keyword_chart, sentiment_chart, write_records, write_report, RunDirectory,
    COMMENTS_FILE, POSTS_FILE, REPORT_FILE,
};
use rumour_core::{
    AppConfig, Category, CommentRecord, CoreError, ErrorReporter, ForumSource, PostRecord, Report,
};
use signal_engine::{
    annotate, average_sentiment, category_results, keyword_frequencies, CompanyExtractor,
    PolarityScorer,
};
use std::path::{Path, PathBuf};
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

/// Outcome of one forum's run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub forum: String,
    pub directory: PathBuf,
    pub report: Report,
    pub post_count: usize,
    pub comment_count: usize,
}

pub struct Pipeline<S, P> {
    source: S,
    scorer: P,
    extractor: CompanyExtractor,
    limits: FetchLimits,
    output_dir: PathBuf,
    isolate_failures: bool,
    reporter: ErrorReporter,
}

impl<S, P> Pipeline<S, P>
where
    S: ForumSource,
    P: PolarityScorer,
{
    pub fn new(source: S, scorer: P, output_dir: impl Into<PathBuf>) -> Result<Self, CoreError> {
        Ok(Self {
            source,
            scorer,
            extractor: CompanyExtractor::new()?,
            limits: FetchLimits::default(),
            output_dir: output_dir.into(),
            isolate_failures: false,
            reporter: ErrorReporter::new(),
        })
    }

    /// Limits, output location, failure policy and chart font from the loaded configuration.
    pub fn from_config(source: S, scorer: P, config: &AppConfig) -> Result<Self, CoreError> {
        init_fonts(config.output.font.as_deref());
        Ok(Self::new(source, scorer, config.output.directory.clone())?
            .with_limits(FetchLimits::from(&config.analysis))
            .isolate_failures(config.analysis.isolate_failures))
    }

    pub fn with_limits(mut self, limits: FetchLimits) -> Self {
        self.limits = limits;
        self
    }

    /// When set, a failing forum is logged and the remaining forums still run.
    pub fn isolate_failures(mut self, isolate: bool) -> Self {
        self.isolate_failures = isolate;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Processes `forums` one after another.
    ///
    /// Without failure isolation the first error aborts the remaining forums.
    pub async fn run_all(&self, forums: &[String]) -> Result<Vec<RunSummary>, CoreError> {
        let mut summaries = Vec::with_capacity(forums.len());

        for forum in forums {
            match self.analyze_forum(forum).await {
                Ok(summary) => summaries.push(summary),
                Err(e) if self.isolate_failures => {
                    error!(forum = %forum, "Forum analysis failed, continuing with the next forum");
                    self.reporter.report_error(&e);
                }
                Err(e) => {
                    error!(forum = %forum, "Forum analysis failed, aborting run");
                    return Err(e);
                }
            }
        }

        info!(
            requested = forums.len(),
            completed = summaries.len(),
            "Run finished"
        );
        Ok(summaries)
    }

    pub async fn analyze_forum(&self, forum: &str) -> Result<RunSummary, CoreError> {
        let run_id = Uuid::new_v4();
        let span = info_span!("forum_run", forum = %forum, run_id = %run_id);
        self.analyze(forum).instrument(span).await
    }

    async fn analyze(&self, forum: &str) -> Result<RunSummary, CoreError> {
        let started_at = Local::now();
        info!("Starting analysis for r/{}", forum);

        let fetched = fetch_forum(&self.source, forum, self.limits).await?;
        let mut posts = fetched.posts;
        let mut comments = fetched.comments;

        annotate(&mut posts, &self.scorer, &Category::ALL);
        annotate(&mut comments, &self.scorer, &Category::ALL);

        let report = Report {
            forum: forum.to_string(),
            generated_at: Local::now(),
            categories: category_results(&posts, &comments, &Category::ALL),
            entities: self.extractor.extract_from_records(&posts, &comments),
            post_sentiment: average_sentiment(&posts),
            comment_sentiment: average_sentiment(&comments),
        };

        let directory = RunDirectory::create(&self.output_dir, forum, started_at)?;
        write_outputs(&directory, &report, &posts, &comments)?;

        info!(
            dir = %directory.path().display(),
            posts = posts.len(),
            comments = comments.len(),
            "Analysis complete for r/{}",
            forum
        );
        Ok(RunSummary {
            forum: forum.to_string(),
            directory: directory.path().to_path_buf(),
            report,
            post_count: posts.len(),
            comment_count: comments.len(),
        })
    }
}

/// Report, both tables, two sentiment charts and one keyword chart per category and record set.
fn write_outputs(
    directory: &RunDirectory,
    report: &Report,
    posts: &[PostRecord],
    comments: &[CommentRecord],
) -> Result<(), CoreError> {
    write_report(&directory.file(REPORT_FILE), report)?;
    write_records(&directory.file(POSTS_FILE), posts)?;
    write_records(&directory.file(COMMENTS_FILE), comments)?;

    sentiment_chart(directory.path(), "Posts", posts)?;
    sentiment_chart(directory.path(), "Comments", comments)?;
    for category in Category::ALL {
        keyword_chart(
            directory.path(),
            &format!("{} (Posts)", category.chart_title()),
            &keyword_frequencies(posts, category),
        )?;
        keyword_chart(
            directory.path(),
            &format!("{} (Comments)", category.chart_title()),
            &keyword_frequencies(comments, category),
        )?;
    }
    Ok(())
}
