use async_trait::async_trait;
use ring::digest::{SHA256, digest};
use skr_core::SkrError;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::oci::{ANNOTATION_REF_NAME, Descriptor, Index, MEDIA_TYPE_MANIFEST, Manifest};
use crate::store::ArtifactStore;

const INDEX_FILE: &str = "index.json";
const LAYOUT_FILE: &str = "oci-layout";
const LAYOUT_CONTENT: &str = r#"{"imageLayoutVersion":"1.0.0"}"#;

/// Resolve the store root: explicit path > SKR_STORE env > <data dir>/skr/store
pub fn default_store_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }
    if let Ok(p) = std::env::var("SKR_STORE") {
        return PathBuf::from(p);
    }
    dirs::data_dir()
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".local")
                .join("share")
        })
        .join("skr")
        .join("store")
}

/// An OCI image layout directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct OciLayoutStore {
    root: PathBuf,
}

impl OciLayoutStore {
    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Read `index.json`. A store that has never been written to is empty.
    pub async fn read_index(&self) -> skr_core::Result<Index> {
        let path = self.root.join(INDEX_FILE);
        let raw = match tokio::fs::read(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(?path, "store index not found, treating store as empty");
                return Ok(Index::default());
            }
            Err(e) => {
                return Err(SkrError::Store(format!(
                    "failed to read {}: {e}",
                    path.display()
                )));
            }
        };
        serde_json::from_slice(&raw)
            .map_err(|e| SkrError::Store(format!("failed to parse {}: {e}", path.display())))
    }

    async fn write_index(&self, index: &Index) -> skr_core::Result<()> {
        tokio::fs::create_dir_all(&self.root).await?;
        let layout = self.root.join(LAYOUT_FILE);
        if !tokio::fs::try_exists(&layout).await? {
            tokio::fs::write(&layout, LAYOUT_CONTENT).await?;
        }
        let data = serde_json::to_vec_pretty(index)?;
        tokio::fs::write(self.root.join(INDEX_FILE), data).await?;
        Ok(())
    }

    /// Path of the blob addressed by `digest` (`<alg>:<hex>`).
    pub fn blob_path(&self, digest: &str) -> skr_core::Result<PathBuf> {
        let (alg, hex) = digest
            .split_once(':')
            .ok_or_else(|| SkrError::Store(format!("malformed digest: {digest}")))?;
        let well_formed = |s: &str| {
            !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        };
        if !well_formed(alg) || !well_formed(hex) {
            return Err(SkrError::Store(format!("malformed digest: {digest}")));
        }
        Ok(self.root.join("blobs").join(alg).join(hex))
    }

    /// Write `bytes` as a blob, returning its sha256 digest.
    ///
    /// Publishing is not part of skr; this and [`Self::tag_manifest`] exist to
    /// seed layouts in tests and fixtures.
    pub async fn put_blob(&self, bytes: &[u8]) -> skr_core::Result<String> {
        let digest = sha256_digest(bytes);
        let path = self.blob_path(&digest)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, bytes).await?;
        Ok(digest)
    }

    /// Store `manifest` and point `tag` at it, replacing any previous target.
    /// Fixture support, see [`Self::put_blob`].
    pub async fn tag_manifest(
        &self,
        tag: &str,
        manifest: &Manifest,
    ) -> skr_core::Result<Descriptor> {
        let bytes = serde_json::to_vec(manifest)?;
        let digest = self.put_blob(&bytes).await?;
        let descriptor = Descriptor {
            media_type: MEDIA_TYPE_MANIFEST.to_string(),
            digest,
            size: bytes.len() as u64,
            annotations: [(ANNOTATION_REF_NAME.to_string(), tag.to_string())]
                .into_iter()
                .collect(),
        };

        let mut index = self.read_index().await?;
        index.manifests.retain(|d| d.ref_name() != Some(tag));
        index.manifests.push(descriptor.clone());
        self.write_index(&index).await?;

        debug!(tag, digest = %descriptor.digest, "tagged manifest");
        Ok(descriptor)
    }
}

#[async_trait]
impl ArtifactStore for OciLayoutStore {
    async fn list(&self) -> skr_core::Result<Vec<String>> {
        let index = self.read_index().await?;
        Ok(index
            .manifests
            .iter()
            .filter_map(|d| d.ref_name().map(str::to_string))
            .collect())
    }

    async fn resolve(&self, reference: &str) -> skr_core::Result<Descriptor> {
        let index = self.read_index().await?;
        index
            .manifests
            .into_iter()
            .find(|d| d.ref_name() == Some(reference))
            .ok_or_else(|| SkrError::NotFound(reference.to_string()))
    }

    async fn fetch(&self, descriptor: &Descriptor) -> skr_core::Result<Vec<u8>> {
        let lookup_err = |reason: String| SkrError::StoreLookup {
            reference: descriptor.digest.clone(),
            reason,
        };

        let path = self.blob_path(&descriptor.digest)?;
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| lookup_err(format!("failed to read blob: {e}")))?;

        if bytes.len() as u64 != descriptor.size {
            return Err(lookup_err(format!(
                "size mismatch: expected {}, got {}",
                descriptor.size,
                bytes.len()
            )));
        }
        if descriptor.digest.starts_with("sha256:") && sha256_digest(&bytes) != descriptor.digest {
            return Err(lookup_err("digest mismatch".into()));
        }
        Ok(bytes)
    }

    async fn delete(&self, descriptor: &Descriptor) -> skr_core::Result<()> {
        let mut index = self.read_index().await?;
        let before = index.manifests.len();
        index.manifests.retain(|d| d.digest != descriptor.digest);
        if index.manifests.len() != before {
            self.write_index(&index).await?;
        }

        let path = self.blob_path(&descriptor.digest)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        info!(
            digest = %descriptor.digest,
            removed_tags = before - index.manifests.len(),
            "deleted artifact"
        );
        Ok(())
    }
}

fn sha256_digest(bytes: &[u8]) -> String {
    let hash = digest(&SHA256, bytes);
    let hex: String = hash.as_ref().iter().map(|b| format!("{b:02x}")).collect();
    format!("sha256:{hex}")
}
