//! Digest artifacts on disk: one Markdown file per day (`YYYY-MM-DD.md`)
//! and one per weekly run (`weekly-YYYY-MM-DD.md`).

use std::fs;
use std::path::{Path, PathBuf};
use chrono::NaiveDate;
use tracing::{debug, info};
use ad_core::dates::ISO_DATE;
use ad_core::{AppConfig, DigestItem, Result, WeeklyResult};

pub mod markdown;

pub const WEEKLY_PREFIX: &str = "weekly-";
pub const ARTIFACT_EXTENSION: &str = "md";

/// Absolute `storage.path` is used verbatim; relative paths are resolved
/// against the configuration root.
pub fn resolve_storage_dir(config: &AppConfig) -> PathBuf {
    let path = Path::new(&config.settings.storage.path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        config.root.join(path)
    }
}

pub fn daily_file_name(date: NaiveDate) -> String {
    format!("{}.{}", date.format(ISO_DATE), ARTIFACT_EXTENSION)
}

pub fn weekly_file_name(end: NaiveDate) -> String {
    format!("{}{}.{}", WEEKLY_PREFIX, end.format(ISO_DATE), ARTIFACT_EXTENSION)
}

/// The date of a daily artifact, or `None` for weekly artifacts, other
/// extensions and names that are not ISO dates.
pub fn parse_daily_file_name(file_name: &str) -> Option<NaiveDate> {
    let stem = file_name.strip_suffix(&format!(".{}", ARTIFACT_EXTENSION))?;
    if stem.starts_with(WEEKLY_PREFIX) {
        return None;
    }
    NaiveDate::parse_from_str(stem, ISO_DATE).ok()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyArtifact {
    pub date: NaiveDate,
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct DigestStore {
    dir: PathBuf,
}

impl DigestStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(resolve_storage_dir(config))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes the day's digest, replacing any earlier run for the same date.
    pub fn save_daily(&self, items: &[DigestItem], date: NaiveDate) -> Result<PathBuf> {
        let content = markdown::render_daily(items, date);
        self.write(&daily_file_name(date), &content)
    }

    pub fn save_weekly(&self, result: &WeeklyResult, start: NaiveDate, end: NaiveDate) -> Result<PathBuf> {
        let content = markdown::render_weekly(result, start, end);
        self.write(&weekly_file_name(end), &content)
    }

    /// Daily artifacts in file-name order (chronological for ISO names).
    /// A missing directory has no artifacts.
    pub fn daily_artifacts(&self) -> Result<Vec<DailyArtifact>> {
        if !self.dir.is_dir() {
            debug!("Storage directory {} does not exist yet", self.dir.display());
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        names.sort();

        Ok(names
            .into_iter()
            .filter_map(|name| match parse_daily_file_name(&name) {
                Some(date) => Some(DailyArtifact {
                    date,
                    path: self.dir.join(&name),
                }),
                None => {
                    debug!("Skipping {} (not a daily artifact)", name);
                    None
                }
            })
            .collect())
    }

    fn write(&self, file_name: &str, content: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(file_name);
        fs::write(&path, content)?;
        info!("💾 Saved {}", path.display());
        Ok(path)
    }
}
