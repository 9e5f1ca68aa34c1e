//! Attaches sentiment and keyword flags to fetched records.

use crate::sentiment::PolarityScorer;
use rumour_core::{Category, CategoryFlags, TextRecord};
use tracing::debug;

/// Case-insensitive substring presence of every keyword of `category`, in lexicon order.
pub fn keyword_flags(text: &str, category: Category) -> CategoryFlags {
    let haystack = text.to_lowercase();
    let flags = category
        .keywords()
        .iter()
        .map(|keyword| haystack.contains(&keyword.to_lowercase()))
        .collect();
    CategoryFlags::new(category, flags)
}

/// Scores sentiment and flags every category for each record.
///
/// Re-annotating a record replaces its previous annotation for the given categories.
pub fn annotate<R, P>(records: &mut [R], scorer: &P, categories: &[Category])
where
    R: TextRecord,
    P: PolarityScorer + ?Sized,
{
    for record in records.iter_mut() {
        let sentiment = scorer.polarity(record.text());
        let flags: Vec<CategoryFlags> = categories
            .iter()
            .map(|category| keyword_flags(record.text(), *category))
            .collect();

        let annotations = record.annotations_mut();
        annotations.sentiment = sentiment;
        annotations
            .categories
            .retain(|existing| !categories.contains(&existing.category));
        annotations.categories.extend(flags);
    }
    debug!(records = records.len(), categories = categories.len(), "Annotated record set");
}
