use skr_core::SkrError;
use skr_store::{ArtifactStore, OciLayoutStore, default_store_root};

use super::SystemAction;

pub(super) async fn cmd_system(action: SystemAction) -> skr_core::Result<()> {
    match action {
        SystemAction::Rm {
            reference,
            oci_path,
        } => {
            let store = OciLayoutStore::open(default_store_root(oci_path.as_deref()));
            remove(&store, &reference).await?;
            println!("Removed {reference}");
            Ok(())
        }
    }
}

/// Resolve `reference` and delete what it points to.
async fn remove(store: &dyn ArtifactStore, reference: &str) -> skr_core::Result<()> {
    let descriptor = match store.resolve(reference).await {
        Ok(d) => d,
        Err(SkrError::NotFound(_)) => return Err(SkrError::NotFound(reference.to_string())),
        Err(e) => {
            return Err(SkrError::StoreLookup {
                reference: reference.to_string(),
                reason: e.to_string(),
            });
        }
    };
    store.delete(&descriptor).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use skr_store::Manifest;

    #[tokio::test]
    async fn remove_existing_reference() {
        let dir = tempfile::tempdir().unwrap();
        let store = OciLayoutStore::open(dir.path());
        store
            .tag_manifest(
                "ghcr.io/acme/pdf:1.0.0",
                &Manifest::with_annotations::<_, &str, &str>([]),
            )
            .await
            .unwrap();

        remove(&store, "ghcr.io/acme/pdf:1.0.0").await.unwrap();
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn remove_unknown_reference() {
        let dir = tempfile::tempdir().unwrap();
        let store = OciLayoutStore::open(dir.path());
        let err = remove(&store, "ghcr.io/acme/missing:1").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "reference ghcr.io/acme/missing:1 not found in store"
        );
    }
}
