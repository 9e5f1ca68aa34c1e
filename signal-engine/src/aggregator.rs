//! Reduces annotated record sets into per-category signal strengths.

use rumour_core::{Category, CategoryResult, TextRecord};

/// `sum of category scores / record count * 100`, or exactly 0 for an empty set.
///
/// Not a probability: records matching several keywords push it past 100.
pub fn signal_strength<R: TextRecord>(records: &[R], category: Category) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    let total_mentions: u64 = records
        .iter()
        .map(|record| u64::from(record.annotations().category_score(category)))
        .sum();
    (total_mentions as f64 / records.len() as f64) * 100.0
}

/// Post-level plus comment-level strength for one category, added together.
pub fn combined_signal<P, C>(posts: &[P], comments: &[C], category: Category) -> CategoryResult
where
    P: TextRecord,
    C: TextRecord,
{
    CategoryResult {
        category,
        signal_strength: signal_strength(posts, category) + signal_strength(comments, category),
    }
}

/// One combined result per category, in the given order.
pub fn category_results<P, C>(posts: &[P], comments: &[C], categories: &[Category]) -> Vec<CategoryResult>
where
    P: TextRecord,
    C: TextRecord,
{
    categories
        .iter()
        .map(|category| combined_signal(posts, comments, *category))
        .collect()
}

/// Mean sentiment of a record set; 0.0 when it is empty.
pub fn average_sentiment<R: TextRecord>(records: &[R]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    records
        .iter()
        .map(|record| record.annotations().sentiment)
        .sum::<f64>()
        / records.len() as f64
}

/// Number of records flagging each keyword of `category`, in lexicon order.
pub fn keyword_frequencies<R: TextRecord>(
    records: &[R],
    category: Category,
) -> Vec<(&'static str, usize)> {
    let keywords = category.keywords();
    let mut counts = vec![0usize; keywords.len()];

    for flags in records
        .iter()
        .filter_map(|record| record.annotations().category(category))
    {
        for (count, flag) in counts.iter_mut().zip(&flags.flags) {
            if *flag {
                *count += 1;
            }
        }
    }

    keywords.iter().copied().zip(counts).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotator::annotate;
    use crate::sentiment::LexiconSentiment;
    use chrono::{DateTime, Utc};
    use rumour_core::{CommentRecord, PostRecord};

    fn post(id: &str, title: &str, body: &str) -> PostRecord {
        PostRecord::new(
            id.to_string(),
            title.to_string(),
            body.to_string(),
            String::new(),
            1,
            0,
            DateTime::<Utc>::UNIX_EPOCH,
        )
    }

    fn annotated_posts(texts: &[(&str, &str)]) -> Vec<PostRecord> {
        let mut posts: Vec<_> = texts
            .iter()
            .enumerate()
            .map(|(i, (title, body))| post(&i.to_string(), title, body))
            .collect();
        annotate(&mut posts, &LexiconSentiment::new(), &Category::ALL);
        posts
    }

    #[test]
    fn test_empty_set_is_zero() {
        let empty: Vec<PostRecord> = Vec::new();
        for category in Category::ALL {
            assert_eq!(signal_strength(&empty, category), 0.0);
        }
        assert_eq!(average_sentiment(&empty), 0.0);
    }

    #[test]
    fn test_one_merger_post_in_three() {
        let posts = annotated_posts(&[
            ("Big news", "a merger is coming"),
            ("Lunch", "tacos again"),
            ("Standup", "moved to 10am"),
        ]);
        let comments: Vec<CommentRecord> = Vec::new();

        let strength = signal_strength(&posts, Category::Merger);
        assert!((strength - 100.0 / 3.0).abs() < 1e-9);

        let combined = combined_signal(&posts, &comments, Category::Merger);
        assert!((combined.signal_strength - 33.333_333).abs() < 1e-3);
    }

    #[test]
    fn test_strength_can_exceed_one_hundred() {
        let posts = annotated_posts(&[("layoff", "downsizing, job cuts and restructuring")]);
        assert_eq!(signal_strength(&posts, Category::Layoff), 400.0);
    }

    #[test]
    fn test_combined_is_simple_sum() {
        let posts = annotated_posts(&[("takeover", ""), ("nothing", "")]);
        let mut comments = vec![CommentRecord::new(
            "0".to_string(),
            "c".to_string(),
            "t3_0".to_string(),
            "buyout rumours".to_string(),
            0,
            DateTime::<Utc>::UNIX_EPOCH,
        )];
        annotate(&mut comments, &LexiconSentiment::new(), &Category::ALL);

        let result = combined_signal(&posts, &comments, Category::Merger);
        assert_eq!(result.signal_strength, 50.0 + 100.0);

        let all = category_results(&posts, &comments, &Category::ALL);
        assert_eq!(all.len(), 4);
        assert_eq!(all[0].category, Category::Merger);
        assert_eq!(all[1].signal_strength, 0.0);
    }

    #[test]
    fn test_keyword_frequencies_follow_lexicon_order() {
        let posts = annotated_posts(&[("merger", "synergy"), ("merger", ""), ("", "")]);
        let frequencies = keyword_frequencies(&posts, Category::Merger);
        assert_eq!(frequencies.len(), Category::Merger.keywords().len());
        assert_eq!(frequencies[0], ("merger", 2));
        let synergy = frequencies.iter().find(|(k, _)| *k == "synergy").unwrap();
        assert_eq!(synergy.1, 1);
    }

    #[test]
    fn test_average_sentiment() {
        let posts = annotated_posts(&[("good", ""), ("bad", ""), ("", "")]);
        let expected = (0.7 - 0.7 + 0.0) / 3.0;
        assert!((average_sentiment(&posts) - expected).abs() < 1e-9);
    }
}
