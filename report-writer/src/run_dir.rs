use chrono::{DateTime, Local};
use rumour_core::{CoreError, ReportError};
use std::path::{Path, PathBuf};
use tracing::info;

/// `<base>/<forum>_<YYYYMMDD_HHMMSS>/`, holding every artifact of one forum's run.
#[derive(Debug, Clone)]
pub struct RunDirectory {
    path: PathBuf,
}

impl RunDirectory {
    pub fn path_for(base: &Path, forum: &str, timestamp: DateTime<Local>) -> PathBuf {
        base.join(format!("{}_{}", forum, timestamp.format("%Y%m%d_%H%M%S")))
    }

    /// Creates the directory and any missing parents. An existing directory is reused.
    pub fn create(base: &Path, forum: &str, timestamp: DateTime<Local>) -> Result<Self, CoreError> {
        let path = Self::path_for(base, forum, timestamp);
        std::fs::create_dir_all(&path).map_err(|e| {
            CoreError::from(ReportError::OutputUnavailable {
                path: format!("{} ({})", path.display(), e),
            })
        })?;
        info!(dir = %path.display(), "Created run directory");
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_directory_name() {
        let at = Local.with_ymd_and_hms(2024, 11, 2, 0, 0, 5).unwrap();
        let path = RunDirectory::path_for(Path::new("output"), "layoffs", at);
        assert_eq!(path, Path::new("output").join("layoffs_20241102_000005"));
    }

    #[test]
    fn test_create_nested() {
        let base = tempfile::tempdir().unwrap();
        let at = Local.with_ymd_and_hms(2024, 1, 31, 23, 59, 59).unwrap();
        let run = RunDirectory::create(&base.path().join("nested/output"), "rust", at).unwrap();
        assert!(run.path().is_dir());
        assert!(run.path().ends_with("rust_20240131_235959"));
        assert_eq!(run.file("report.txt"), run.path().join("report.txt"));

        // Same second, same forum: reused rather than failing.
        assert!(RunDirectory::create(&base.path().join("nested/output"), "rust", at).is_ok());
    }

    #[test]
    fn test_unwritable_base() {
        let base = tempfile::NamedTempFile::new().unwrap();
        let at = Local.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let err = RunDirectory::create(base.path(), "rust", at).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Report(ReportError::OutputUnavailable { .. })
        ));
    }
}
