//! Static export of the registry UI.

use skr_core::{SkrError, Skipped};
use skr_store::{ArtifactStore, TagAggregator};
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::WebAssets;

/// UI files copied next to `skills.json`.
pub const SITE_ASSETS: [&str; 3] = ["index.html", "style.css", "app.js"];

/// What [`generate_site`] wrote.
#[derive(Debug, Default)]
pub struct GeneratedSite {
    pub files: Vec<PathBuf>,
    /// Number of aggregated skill records in `skills.json`.
    pub skills: usize,
    pub skipped: Vec<Skipped>,
}

/// Aggregate `store` and write `skills.json` plus the UI assets to `output_dir`.
pub async fn generate_site(
    store: &dyn ArtifactStore,
    output_dir: &Path,
    fetch_timeout: Duration,
) -> skr_core::Result<GeneratedSite> {
    let catalog = TagAggregator::new(store)
        .with_timeout(fetch_timeout)
        .collect()
        .await?;
    info!(skills = catalog.skills.len(), "aggregated skills from store");

    tokio::fs::create_dir_all(output_dir).await?;

    let mut site = GeneratedSite {
        skills: catalog.skills.len(),
        ..Default::default()
    };

    let skills_path = output_dir.join("skills.json");
    let mut json = catalog.to_json_pretty()?;
    json.push('\n');
    tokio::fs::write(&skills_path, json).await?;
    site.files.push(skills_path);

    for name in SITE_ASSETS {
        let data = embedded_asset(name)?;
        let dest = output_dir.join(name);
        tokio::fs::write(&dest, data.as_ref()).await?;
        site.files.push(dest);
    }

    site.skipped = catalog.skipped;
    Ok(site)
}

fn embedded_asset(name: &str) -> skr_core::Result<Cow<'static, [u8]>> {
    WebAssets::get(name)
        .map(|file| file.data)
        .ok_or_else(|| SkrError::Other(anyhow::anyhow!("embedded asset {name} is missing")))
}
