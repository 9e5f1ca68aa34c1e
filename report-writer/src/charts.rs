//! PNG charts: sentiment over time and keyword frequencies.
//!
//! Text is drawn with a TrueType font registered at startup. When no font can
//! be found the charts are still produced, without captions, axes or labels.

use chrono::{DateTime, Utc};
use plotters::prelude::*;
use plotters::style::{register_font, FontStyle};
use rumour_core::{CoreError, ReportError, TextRecord};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, warn};

const CHART_SIZE: (u32, u32) = (1000, 600);
const FONT_FAMILY: &str = "sans-serif";

const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

static FONT_READY: OnceLock<bool> = OnceLock::new();

/// Registers the chart font once per process. Returns whether text can be drawn.
///
/// `preferred` is tried before the well-known system locations.
pub fn init_fonts(preferred: Option<&Path>) -> bool {
    *FONT_READY.get_or_init(|| {
        let candidates = preferred
            .map(Path::to_path_buf)
            .into_iter()
            .chain(SYSTEM_FONTS.iter().map(PathBuf::from));

        for candidate in candidates {
            let Ok(bytes) = std::fs::read(&candidate) else {
                continue;
            };
            // The font registry keeps a 'static reference for the process lifetime.
            let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
            if register_font(FONT_FAMILY, FontStyle::Normal, bytes).is_ok() {
                debug!(font = %candidate.display(), "Chart font registered");
                return true;
            }
        }

        warn!("No usable TrueType font found, charts will be drawn without text");
        false
    })
}

fn text_enabled() -> bool {
    FONT_READY.get().copied().unwrap_or(false)
}

/// Lowercase, runs of non-alphanumerics collapsed to `_`, e.g. "Merger Keywords (Posts)" to
/// "merger_keywords_posts".
pub fn slug(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('_') {
            slug.push('_');
        }
    }
    while slug.ends_with('_') {
        slug.pop();
    }
    slug
}

pub fn sentiment_chart_path(dir: &Path, title: &str) -> PathBuf {
    dir.join(format!("sentiment_{}.png", slug(title)))
}

pub fn keyword_chart_path(dir: &Path, title: &str) -> PathBuf {
    dir.join(format!("keyword_frequency_{}.png", slug(title)))
}

fn chart_failed(title: &str, reason: impl std::fmt::Display) -> CoreError {
    CoreError::Report(ReportError::ChartFailed {
        chart: title.to_string(),
        reason: reason.to_string(),
    })
}

/// Scatter of sentiment against creation time, written to `sentiment_<slug>.png` under `dir`.
pub fn sentiment_chart<R: TextRecord>(
    dir: &Path,
    title: &str,
    records: &[R],
) -> Result<PathBuf, CoreError> {
    let path = sentiment_chart_path(dir, title);
    let points: Vec<(f64, f64)> = records
        .iter()
        .map(|record| {
            (
                record.created_at().timestamp() as f64,
                record.annotations().sentiment,
            )
        })
        .collect();

    let (mut start, mut end) = points
        .iter()
        .fold((f64::MAX, f64::MIN), |(lo, hi), (x, _)| (lo.min(*x), hi.max(*x)));
    if points.is_empty() {
        let now = Utc::now().timestamp() as f64;
        (start, end) = (now, now);
    }
    // Pad so a single instant still spans a visible range.
    let padding = ((end - start) * 0.05).max(3600.0);
    let x_range = (start - padding)..(end + padding);

    let text = text_enabled();
    let caption = format!("Sentiment Over Time - {}", title);
    let date_label = |x: &f64| {
        DateTime::<Utc>::from_timestamp(*x as i64, 0)
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default()
    };

    let root = BitMapBackend::new(&path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(|e| chart_failed(title, e))?;

    let mut builder = ChartBuilder::on(&root);
    builder.margin(20);
    if text {
        builder
            .caption(&caption, (FONT_FAMILY, 28))
            .x_label_area_size(40)
            .y_label_area_size(50);
    }
    let mut chart = builder
        .build_cartesian_2d(x_range, -1.05f64..1.05f64)
        .map_err(|e| chart_failed(title, e))?;

    if text {
        chart
            .configure_mesh()
            .x_desc("Date")
            .y_desc("Sentiment")
            .x_labels(6)
            .x_label_formatter(&date_label)
            .draw()
            .map_err(|e| chart_failed(title, e))?;
    }

    chart
        .draw_series(
            points
                .iter()
                .map(|(x, y)| Circle::new((*x, *y), 4, BLUE.mix(0.5).filled())),
        )
        .map_err(|e| chart_failed(title, e))?;

    root.present().map_err(|e| chart_failed(title, e))?;
    // The backend borrows `path` until both handles are gone.
    drop(chart);
    drop(root);
    debug!(chart = %path.display(), points = points.len(), "Sentiment chart written");
    Ok(path)
}

/// Bar per keyword, written to `keyword_frequency_<slug>.png` under `dir`.
pub fn keyword_chart(
    dir: &Path,
    title: &str,
    frequencies: &[(&str, usize)],
) -> Result<PathBuf, CoreError> {
    let path = keyword_chart_path(dir, title);
    let bars = frequencies.len().max(1);
    let tallest = frequencies.iter().map(|(_, count)| *count).max().unwrap_or(0);
    let y_top = (tallest as u32 + 1).max(2);

    let text = text_enabled();
    let caption = format!("Keyword Frequency - {}", title);
    let keyword_label = |value: &SegmentValue<usize>| match value {
        SegmentValue::CenterOf(i) => frequencies
            .get(*i)
            .map(|(keyword, _)| keyword.to_string())
            .unwrap_or_default(),
        _ => String::new(),
    };

    let root = BitMapBackend::new(&path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(|e| chart_failed(title, e))?;

    let mut builder = ChartBuilder::on(&root);
    builder.margin(20);
    if text {
        builder
            .caption(&caption, (FONT_FAMILY, 28))
            .x_label_area_size(60)
            .y_label_area_size(50);
    }
    let mut chart = builder
        .build_cartesian_2d((0usize..bars).into_segmented(), 0u32..y_top)
        .map_err(|e| chart_failed(title, e))?;

    if text {
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc("Keywords")
            .y_desc("Frequency")
            .x_labels(bars)
            .x_label_formatter(&keyword_label)
            .x_label_style((FONT_FAMILY, 11))
            .draw()
            .map_err(|e| chart_failed(title, e))?;
    }

    chart
        .draw_series(
            Histogram::vertical(&chart)
                .style(BLUE.mix(0.7).filled())
                .margin(8)
                .data(
                    frequencies
                        .iter()
                        .enumerate()
                        .map(|(i, (_, count))| (i, *count as u32)),
                ),
        )
        .map_err(|e| chart_failed(title, e))?;

    root.present().map_err(|e| chart_failed(title, e))?;
    drop(chart);
    drop(root);
    debug!(chart = %path.display(), "Keyword chart written");
    Ok(path)
}
