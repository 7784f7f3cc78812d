use async_trait::async_trait;

use crate::oci::Descriptor;

/// The artifact store operations skr consumes.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// All tag references, in the store's own order.
    async fn list(&self) -> skr_core::Result<Vec<String>>;

    /// Resolve a tag reference to the descriptor of its manifest.
    async fn resolve(&self, reference: &str) -> skr_core::Result<Descriptor>;

    /// Fetch the content addressed by `descriptor`.
    async fn fetch(&self, descriptor: &Descriptor) -> skr_core::Result<Vec<u8>>;

    /// Delete the content addressed by `descriptor` and every tag pointing at it.
    async fn delete(&self, descriptor: &Descriptor) -> skr_core::Result<()>;
}
