use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for skr.
#[derive(Error, Debug)]
pub enum SkrError {
    // ── Config errors ──────────────────────────────────────────
    #[error("failed to load config {}: {reason}", path.display())]
    ConfigRead { path: PathBuf, reason: String },

    // ── Skill errors ───────────────────────────────────────────
    #[error("invalid skill at {}: {reason}", path.display())]
    InvalidSkill { path: PathBuf, reason: String },

    // ── Store errors ───────────────────────────────────────────
    #[error("store lookup failed for {reference}: {reason}")]
    StoreLookup { reference: String, reason: String },

    #[error("reference {0} not found in store")]
    NotFound(String),

    #[error("store error: {0}")]
    Store(String),

    // ── Presentation errors ────────────────────────────────────
    #[error("failed to encode skills: {0}")]
    Encode(String),

    // ── Generic wrappers ───────────────────────────────────────
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, SkrError>;

/// An item dropped from a batch (a skill directory, a store tag) along with
/// the reason it was dropped. Batch operations return these next to their
/// results instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Skipped {
    pub item: String,
    pub reason: String,
}

impl Skipped {
    pub fn new(item: impl Into<String>, reason: impl ToString) -> Self {
        Self {
            item: item.into(),
            reason: reason.to_string(),
        }
    }
}

impl std::fmt::Display for Skipped {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.item, self.reason)
    }
}
