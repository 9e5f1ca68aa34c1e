pub mod charts;
pub mod report;
pub mod run_dir;
pub mod tables;

pub use charts::{init_fonts, keyword_chart, sentiment_chart, slug};
pub use report::{render_report, write_report, REPORT_FILE};
pub use run_dir::RunDirectory;
pub use tables::{read_table_shape, write_records, COMMENTS_FILE, POSTS_FILE};
