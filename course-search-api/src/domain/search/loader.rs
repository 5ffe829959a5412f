//! Seeds the course index from a JSON file at startup.

use std::path::Path;

use tracing::{error, info, warn};

use super::traits::{Result, SearchEngine, SearchError};
use super::types::{CourseDocument, LoadStats};

/// Reads a JSON array of course documents.
pub async fn read_courses(path: &Path) -> Result<Vec<CourseDocument>> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| SearchError::SeedError(format!("{}: {}", path.display(), e)))?;

    serde_json::from_str(&raw)
        .map_err(|e| SearchError::SeedError(format!("{}: {}", path.display(), e)))
}

/// Creates the index if needed and upserts every document in `path`.
pub async fn load_seed_file<E>(engine: &E, path: &Path) -> Result<LoadStats>
where
    E: SearchEngine + ?Sized,
{
    let index_created = engine.ensure_index().await?;
    let courses = read_courses(path).await?;
    let read = courses.len();

    let (courses, missing_id): (Vec<_>, Vec<_>) =
        courses.into_iter().partition(|course| !course.id.is_empty());
    for course in &missing_id {
        warn!(title = %course.title, "Skipping course without an id");
    }

    let report = engine.index_documents(&courses).await?;
    for (id, reason) in &report.failed {
        warn!(id = %id, reason = %reason, "Course was rejected by the search engine");
    }

    Ok(LoadStats {
        read,
        indexed: report.indexed,
        failed: report.failed.len() + missing_id.len(),
        index_created,
    })
}

/// Like [`load_seed_file`], but never fails: errors are logged and an empty
/// [`LoadStats`] is returned so startup can continue.
pub async fn seed_index<E>(engine: &E, path: &Path) -> LoadStats
where
    E: SearchEngine + ?Sized,
{
    match load_seed_file(engine, path).await {
        Ok(stats) => {
            info!(
                file = %path.display(),
                read = stats.read,
                indexed = stats.indexed,
                failed = stats.failed,
                index_created = stats.index_created,
                "Seeded course index"
            );
            stats
        }
        Err(e) => {
            error!(file = %path.display(), error = %e, "Failed to seed course index");
            LoadStats::default()
        }
    }
}
