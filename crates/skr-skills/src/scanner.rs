use skr_core::Skipped;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::definition::SkillDefinition;

/// A skill directory that loaded successfully.
#[derive(Debug, Clone)]
pub struct ScannedSkill {
    /// Declared name from the descriptor.
    pub name: String,
    /// The skill directory.
    pub path: PathBuf,
    pub definition: SkillDefinition,
}

/// Result of scanning one root.
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    /// Loaded skills in file-name order.
    pub found: Vec<ScannedSkill>,
    /// Directories whose descriptor failed to load.
    pub skipped: Vec<Skipped>,
}

/// List the immediate child directories of `root` and load each as a skill.
///
/// Best effort: a missing or unreadable root yields an empty report, files are
/// ignored, and a directory that fails to load is recorded in `skipped`
/// without affecting its siblings.
pub fn scan(root: &Path) -> ScanReport {
    let mut report = ScanReport::default();

    let entries = match std::fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(?root, error = %e, "skills root not readable, skipping");
            return report;
        }
    };

    let mut dirs: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();

    for path in dirs {
        match SkillDefinition::load(&path) {
            Ok(definition) => {
                debug!(skill = %definition.name, ?path, "found skill");
                report.found.push(ScannedSkill {
                    name: definition.name.clone(),
                    path,
                    definition,
                });
            }
            Err(e) => {
                warn!(?path, error = %e, "failed to load skill, skipping");
                report
                    .skipped
                    .push(Skipped::new(path.display().to_string(), e));
            }
        }
    }

    report
}
