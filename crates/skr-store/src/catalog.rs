use futures::stream::{self, StreamExt};
use serde::Serialize;
use skr_core::{SkrError, Skipped};
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;
use tracing::{debug, warn};

use crate::oci::Manifest;
use crate::store::ArtifactStore;

pub const ANNOTATION_DESCRIPTION: &str = "com.skr.description";
pub const ANNOTATION_AUTHOR: &str = "com.skr.author";
pub const ANNOTATION_VERSION: &str = "com.skr.version";

/// Version assumed for a tag reference without a `:version` suffix.
pub const DEFAULT_VERSION: &str = "latest";

const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_CONCURRENCY: usize = 8;

/// One published version of a skill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillVersion {
    pub version: String,
    pub tag: String,
}

/// All tags of one repository, grouped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedSkill {
    /// Full repository, e.g. `ghcr.io/acme/pdf-tools`.
    pub id: String,
    /// Last path segment of `id`.
    pub name: String,
    pub description: String,
    pub author: String,
    pub versions: Vec<SkillVersion>,
    /// The repository's `:latest` tag, or empty.
    pub latest_tag: String,
}

/// Aggregated records plus the tags that had to be dropped.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// One record per repository, in order of first appearance.
    pub skills: Vec<AggregatedSkill>,
    pub skipped: Vec<Skipped>,
}

/// Split `repository[:version]` at the last colon.
///
/// A host with a port (`localhost:5000/ns/name`) and no tag is split at the
/// port colon. That mirrors the store's historical behaviour and is kept as-is.
pub fn split_tag(tag: &str) -> (&str, &str) {
    match tag.rfind(':') {
        Some(idx) => (&tag[..idx], &tag[idx + 1..]),
        None => (tag, DEFAULT_VERSION),
    }
}

fn short_name(repository: &str) -> &str {
    repository.rsplit('/').next().unwrap_or(repository)
}

/// Fold `(tag, annotations)` pairs into per-repository records.
///
/// Input order is significant: versions are appended in that order, and the
/// first non-empty description / author seen for a repository is kept.
pub fn fold_tags<I>(fetched: I) -> Vec<AggregatedSkill>
where
    I: IntoIterator<Item = (String, BTreeMap<String, String>)>,
{
    let mut records: Vec<AggregatedSkill> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for (tag, annotations) in fetched {
        let get = |key: &str| annotations.get(key).cloned().unwrap_or_default();
        let (repository, tag_version) = split_tag(&tag);

        let pos = *positions.entry(repository.to_string()).or_insert_with(|| {
            records.push(AggregatedSkill {
                id: repository.to_string(),
                name: short_name(repository).to_string(),
                description: get(ANNOTATION_DESCRIPTION),
                author: get(ANNOTATION_AUTHOR),
                versions: Vec::new(),
                latest_tag: String::new(),
            });
            records.len() - 1
        });
        let record = &mut records[pos];

        let version = match get(ANNOTATION_VERSION) {
            v if v.is_empty() => tag_version.to_string(),
            v => v,
        };
        if tag_version == DEFAULT_VERSION && record.latest_tag.is_empty() {
            record.latest_tag = tag.clone();
        }
        record.versions.push(SkillVersion {
            version,
            tag: tag.clone(),
        });

        if record.description.is_empty() {
            record.description = get(ANNOTATION_DESCRIPTION);
        }
        if record.author.is_empty() {
            record.author = get(ANNOTATION_AUTHOR);
        }
    }

    records
}

/// Groups a store's tags into skill records.
///
/// Manifest fetches run concurrently, each bounded by a timeout; results are
/// merged serially in listing order so the outcome matches a sequential run.
pub struct TagAggregator<'a, S: ArtifactStore + ?Sized> {
    store: &'a S,
    fetch_timeout: Duration,
    concurrency: usize,
}

impl<'a, S: ArtifactStore + ?Sized> TagAggregator<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// List the store and aggregate every tag. A failed listing is an error;
    /// a failed tag is only recorded in [`Catalog::skipped`].
    pub async fn collect(&self) -> skr_core::Result<Catalog> {
        let tags = self.store.list().await?;
        Ok(self.aggregate(&tags).await)
    }

    pub async fn aggregate(&self, tags: &[String]) -> Catalog {
        let outcomes: Vec<Result<(String, BTreeMap<String, String>), Skipped>> =
            stream::iter(tags.iter().cloned())
                .map(|tag| async move {
                    match tokio::time::timeout(self.fetch_timeout, self.annotations(&tag)).await {
                        Ok(Ok(annotations)) => Ok((tag, annotations)),
                        Ok(Err(e)) => Err(Skipped::new(tag, e)),
                        Err(_) => Err(Skipped::new(tag, "timed out fetching manifest")),
                    }
                })
                .buffered(self.concurrency)
                .collect()
                .await;

        let mut fetched = Vec::with_capacity(outcomes.len());
        let mut skipped = Vec::new();
        for outcome in outcomes {
            match outcome {
                Ok(pair) => fetched.push(pair),
                Err(s) => {
                    warn!(tag = %s.item, reason = %s.reason, "skipping tag");
                    skipped.push(s);
                }
            }
        }

        Catalog {
            skills: fold_tags(fetched),
            skipped,
        }
    }

    async fn annotations(&self, tag: &str) -> skr_core::Result<BTreeMap<String, String>> {
        let descriptor = self.store.resolve(tag).await?;
        let bytes = self.store.fetch(&descriptor).await?;
        match serde_json::from_slice::<Manifest>(&bytes) {
            Ok(manifest) => Ok(manifest.annotations),
            Err(e) => {
                debug!(tag, error = %e, "manifest is not parseable, using empty annotations");
                Ok(BTreeMap::new())
            }
        }
    }
}

impl Catalog {
    /// Pretty JSON array of the records, as served and published.
    pub fn to_json_pretty(&self) -> skr_core::Result<String> {
        serde_json::to_string_pretty(&self.skills).map_err(|e| SkrError::Encode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ann(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn split_tag_variants() {
        assert_eq!(split_tag("repo:v1"), ("repo", "v1"));
        assert_eq!(split_tag("ghcr.io/acme/skill:1.0"), ("ghcr.io/acme/skill", "1.0"));
        assert_eq!(split_tag("no-colon"), ("no-colon", "latest"));
        assert_eq!(split_tag("localhost:5000/ns/name:v2"), ("localhost:5000/ns/name", "v2"));
        // Port-bearing host without a tag splits at the port.
        assert_eq!(split_tag("localhost:5000/ns/name"), ("localhost", "5000/ns/name"));
    }

    #[test]
    fn first_description_wins() {
        let records = fold_tags(vec![
            ("repo:v1".to_string(), ann(&[(ANNOTATION_DESCRIPTION, "A")])),
            ("repo:v2".to_string(), ann(&[(ANNOTATION_DESCRIPTION, "B")])),
        ]);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].description, "A");
        assert_eq!(
            records[0].versions,
            vec![
                SkillVersion { version: "v1".into(), tag: "repo:v1".into() },
                SkillVersion { version: "v2".into(), tag: "repo:v2".into() },
            ]
        );
    }

    #[test]
    fn empty_metadata_is_filled_later_per_field() {
        let records = fold_tags(vec![
            ("r:a".to_string(), ann(&[(ANNOTATION_AUTHOR, "alice")])),
            (
                "r:b".to_string(),
                ann(&[(ANNOTATION_DESCRIPTION, "desc"), (ANNOTATION_AUTHOR, "bob")]),
            ),
            ("r:c".to_string(), ann(&[(ANNOTATION_DESCRIPTION, "other")])),
        ]);
        assert_eq!(records[0].author, "alice");
        assert_eq!(records[0].description, "desc");
    }

    #[test]
    fn version_annotation_overrides_tag() {
        let records = fold_tags(vec![(
            "ghcr.io/acme/pdf:abc123".to_string(),
            ann(&[(ANNOTATION_VERSION, "1.4.0")]),
        )]);
        assert_eq!(records[0].versions[0].version, "1.4.0");
        assert_eq!(records[0].versions[0].tag, "ghcr.io/acme/pdf:abc123");
        assert_eq!(records[0].name, "pdf");
        assert_eq!(records[0].id, "ghcr.io/acme/pdf");
    }

    #[test]
    fn latest_tag_detection() {
        let records = fold_tags(vec![
            ("a:v1".to_string(), BTreeMap::new()),
            ("a:latest".to_string(), BTreeMap::new()),
            ("b:v1".to_string(), BTreeMap::new()),
            ("c".to_string(), BTreeMap::new()),
        ]);
        assert_eq!(records[0].latest_tag, "a:latest");
        assert_eq!(records[1].latest_tag, "");
        assert_eq!(records[2].latest_tag, "c");
        assert_eq!(records[2].versions[0].version, "latest");
    }

    #[test]
    fn records_keep_first_appearance_order() {
        let records = fold_tags(vec![
            ("z:1".to_string(), BTreeMap::new()),
            ("a:1".to_string(), BTreeMap::new()),
            ("z:2".to_string(), BTreeMap::new()),
        ]);
        let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["z", "a"]);
        assert_eq!(records[0].versions.len(), 2);
    }

    #[test]
    fn serializes_latest_tag_camel_case() {
        let records = fold_tags(vec![("x:latest".to_string(), BTreeMap::new())]);
        let json = serde_json::to_value(&records[0]).unwrap();
        assert_eq!(json["latestTag"], "x:latest");
        assert!(json.get("latest_tag").is_none());
    }
}
