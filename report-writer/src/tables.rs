//! CSV dumps of annotated record sets.

use rumour_core::{Category, CoreError, TextRecord};
use std::path::Path;
use tracing::debug;

pub const POSTS_FILE: &str = "posts.csv";
pub const COMMENTS_FILE: &str = "comments.csv";

/// Base columns, `sentiment`, then per category one column per keyword followed by its score.
pub fn header<R: TextRecord>() -> Vec<String> {
    let mut columns: Vec<String> = R::base_columns().iter().map(|c| c.to_string()).collect();
    columns.push("sentiment".to_string());
    for category in Category::ALL {
        let prefix = category.column_prefix();
        columns.extend(
            category
                .keywords()
                .iter()
                .map(|keyword| format!("{}_{}", prefix, keyword)),
        );
        columns.push(format!("{}_score", prefix));
    }
    columns
}

fn row<R: TextRecord>(record: &R) -> Vec<String> {
    let annotations = record.annotations();
    let mut values = record.base_values();
    values.push(annotations.sentiment.to_string());
    for category in Category::ALL {
        match annotations.category(category) {
            Some(flags) => {
                values.extend(flags.flags.iter().map(|flag| u8::from(*flag).to_string()));
                values.push(flags.score.to_string());
            }
            None => {
                values.extend(category.keywords().iter().map(|_| "0".to_string()));
                values.push("0".to_string());
            }
        }
    }
    values
}

/// Writes the header even when `records` is empty.
pub fn write_records<R: TextRecord>(path: &Path, records: &[R]) -> Result<(), CoreError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(header::<R>())?;
    for record in records {
        writer.write_record(row(record))?;
    }
    writer.flush()?;
    debug!(path = %path.display(), rows = records.len(), "Table written");
    Ok(())
}

/// Column names and data row count of a dump.
pub fn read_table_shape(path: &Path) -> Result<(Vec<String>, usize), CoreError> {
    let mut reader = csv::Reader::from_path(path)?;
    let columns = reader.headers()?.iter().map(str::to_string).collect();
    let mut rows = 0;
    for record in reader.records() {
        record?;
        rows += 1;
    }
    Ok((columns, rows))
}
