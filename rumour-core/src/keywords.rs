//! Static keyword lexicons for the four rumour categories.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const MERGER_KEYWORDS: &[&str] = &[
    "merger",
    "acquisition",
    "buyout",
    "takeover",
    "consolidation",
    "join forces",
    "strategic partnership",
    "corporate restructuring",
    "company integration",
    "synergy",
    "hostile bid",
    "tender offer",
    "acquiring stake",
    "majority shareholder",
];

pub const LAYOFF_KEYWORDS: &[&str] = &[
    "layoff",
    "downsizing",
    "restructuring",
    "job cuts",
    "redundancies",
    "workforce reduction",
    "pink slip",
    "let go",
    "fired",
    "termination",
    "cost-cutting measures",
    "headcount reduction",
];

pub const REASSIGNMENT_KEYWORDS: &[&str] = &[
    "reassignment",
    "reallocation",
    "new role",
    "position change",
    "department transfer",
    "job rotation",
    "shifting responsibilities",
    "organizational changes",
    "new manager",
    "reporting structure change",
];

pub const REDUCED_WORKLOAD_KEYWORDS: &[&str] = &[
    "reduced workload",
    "less work",
    "slow period",
    "downtime",
    "bench time",
    "low utilization",
    "project cancellation",
    "on hold",
    "delayed start",
    "reduced hours",
    "forced vacation",
];

/// A keyword category tracked for every record set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Merger,
    Layoff,
    Reassignment,
    ReducedWorkload,
}

impl Category {
    /// Report order.
    pub const ALL: [Category; 4] = [
        Category::Merger,
        Category::Layoff,
        Category::Reassignment,
        Category::ReducedWorkload,
    ];

    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Category::Merger => MERGER_KEYWORDS,
            Category::Layoff => LAYOFF_KEYWORDS,
            Category::Reassignment => REASSIGNMENT_KEYWORDS,
            Category::ReducedWorkload => REDUCED_WORKLOAD_KEYWORDS,
        }
    }

    /// Prefix used for the per-keyword and score columns of the tabular dumps.
    pub fn column_prefix(&self) -> &'static str {
        match self {
            Category::Merger => "merger",
            Category::Layoff => "layoff",
            Category::Reassignment => "reassign",
            Category::ReducedWorkload => "reduced_work",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Merger => "M&A Activity",
            Category::Layoff => "Layoffs",
            Category::Reassignment => "Reassignments",
            Category::ReducedWorkload => "Reduced Workload",
        }
    }

    /// Short title used for chart captions, e.g. "Merger Keywords".
    pub fn chart_title(&self) -> &'static str {
        match self {
            Category::Merger => "Merger Keywords",
            Category::Layoff => "Layoff Keywords",
            Category::Reassignment => "Reassignment Keywords",
            Category::ReducedWorkload => "Reduced Workload Keywords",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_prefix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_lexicon_sizes() {
        assert_eq!(Category::Merger.keywords().len(), 14);
        assert_eq!(Category::Layoff.keywords().len(), 12);
        assert_eq!(Category::Reassignment.keywords().len(), 10);
        assert_eq!(Category::ReducedWorkload.keywords().len(), 11);
    }

    #[test]
    fn test_keywords_are_unique_and_lowercase() {
        for category in Category::ALL {
            let unique: HashSet<_> = category.keywords().iter().collect();
            assert_eq!(unique.len(), category.keywords().len(), "{category}");
            for keyword in category.keywords() {
                assert_eq!(*keyword, keyword.to_lowercase());
            }
        }
    }

    #[test]
    fn test_column_prefixes_are_distinct() {
        let prefixes: HashSet<_> = Category::ALL.iter().map(|c| c.column_prefix()).collect();
        assert_eq!(prefixes.len(), 4);
    }
}
