use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::models::{Dataset, DatasetMetadata, ExportDocument};

const DATASET_FILE: &str = "dataset.json";
const ARTISTS_FILE: &str = "artists.json";
const STUDIOS_FILE: &str = "studios.json";

fn export_document(metadata: &DatasetMetadata, dataset: &Dataset) -> ExportDocument {
    ExportDocument {
        metadata: metadata.clone(),
        artists: dataset.artists.clone(),
        studios: dataset.studios.clone(),
    }
}

async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let body = serde_json::to_vec_pretty(value)?;
    tokio::fs::write(path, body).await?;
    Ok(())
}

/// Overwrite the frontend mock data file with `dataset`.
pub async fn write_frontend_export(
    path: &Path,
    metadata: &DatasetMetadata,
    dataset: &Dataset,
) -> Result<usize> {
    write_json(path, &export_document(metadata, dataset)).await?;
    tracing::debug!(path = %path.display(), "Frontend mock data written");
    Ok(dataset.total_size())
}

/// Write `dataset.json`, `artists.json` and `studios.json` into `dir`.
pub async fn write_bundle(
    dir: &Path,
    metadata: &DatasetMetadata,
    dataset: &Dataset,
) -> Result<Vec<PathBuf>> {
    tokio::fs::create_dir_all(dir).await?;

    let dataset_path = dir.join(DATASET_FILE);
    let artists_path = dir.join(ARTISTS_FILE);
    let studios_path = dir.join(STUDIOS_FILE);

    write_json(&dataset_path, &export_document(metadata, dataset)).await?;
    write_json(&artists_path, &dataset.artists).await?;
    write_json(&studios_path, &dataset.studios).await?;

    Ok(vec![dataset_path, artists_path, studios_path])
}

/// Raw studio records from the frontend export, or `None` if the file does
/// not exist. Records are kept untyped so hand-edited files can still be
/// validated.
pub async fn read_frontend_studios(path: &Path) -> Result<Option<Vec<Value>>> {
    let raw = match tokio::fs::read(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let document: Value = serde_json::from_slice(&raw)?;
    Ok(Some(
        document["studios"].as_array().cloned().unwrap_or_default(),
    ))
}

pub async fn read_frontend_studio_count(path: &Path) -> Result<Option<usize>> {
    Ok(read_frontend_studios(path).await?.map(|studios| studios.len()))
}
