//! # skr-store
//!
//! Read access to the OCI artifact store that holds published skills, and the
//! aggregation of its flat tag listing into per-repository skill records.
//!
//! The store is an [OCI image layout] directory. Every tagged manifest is an
//! entry in `index.json` carrying an `org.opencontainers.image.ref.name`
//! annotation such as `ghcr.io/acme/pdf-tools:v1`.
//!
//! [OCI image layout]: https://github.com/opencontainers/image-spec/blob/main/image-layout.md

pub mod catalog;
pub mod layout;
pub mod oci;
pub mod store;

pub use catalog::{AggregatedSkill, Catalog, SkillVersion, TagAggregator, fold_tags, split_tag};
pub use layout::{OciLayoutStore, default_store_root};
pub use oci::{Descriptor, Index, Manifest};
pub use store::ArtifactStore;
