use serde::Serialize;
use skr_config::Config;
use skr_core::{Skipped, overlay_first_wins};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::roots::{RootOrigin, SearchRoot, resolve_roots};
use crate::scanner::{ScanReport, scan};

/// Version reported for skills that live in the project's own skills area.
pub const LOCAL_VERSION: &str = "local";

/// Version reported for non-local skills that do not declare one.
pub const UNKNOWN_VERSION: &str = "unknown";

/// A skill visible from the working directory after shadowing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstalledSkill {
    pub name: String,
    pub path: PathBuf,
    pub version: String,
    /// True when the winning root is an extra or agent-global directory.
    pub is_global: bool,
}

/// A same-named skill hidden by a higher-precedence root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Shadowed {
    pub name: String,
    pub path: PathBuf,
    pub shadowed_by: PathBuf,
}

/// Outcome of resolving installed skills.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Resolution {
    /// Unique by name, in acceptance order (root precedence, then scan order).
    pub skills: Vec<InstalledSkill>,
    /// Whether a project-local `.agent/skills` root took part.
    pub has_local_root: bool,
    /// Skill directories that failed to load.
    pub skipped: Vec<Skipped>,
    pub shadowed: Vec<Shadowed>,
}

/// Merge per-root scan results in precedence order, first occurrence of a
/// name wins.
///
/// `scan_fn` is invoked once per root, in the order given.
pub fn merge_roots<F>(roots: &[SearchRoot], mut scan_fn: F) -> Resolution
where
    F: FnMut(&Path) -> ScanReport,
{
    let mut skipped = Vec::new();
    let mut candidates: Vec<Vec<InstalledSkill>> = Vec::with_capacity(roots.len());

    for root in roots {
        let report = scan_fn(&root.path);
        skipped.extend(report.skipped);
        candidates.push(
            report
                .found
                .into_iter()
                .map(|s| InstalledSkill {
                    version: match root.origin {
                        RootOrigin::Local => LOCAL_VERSION.to_string(),
                        _ => s
                            .definition
                            .version
                            .clone()
                            .unwrap_or_else(|| UNKNOWN_VERSION.to_string()),
                    },
                    is_global: root.origin.is_global(),
                    name: s.name,
                    path: s.path,
                })
                .collect(),
        );
    }

    let skills = overlay_first_wins(candidates.clone(), |s| s.name.clone());

    let winners: HashMap<&str, &Path> = skills
        .iter()
        .map(|s| (s.name.as_str(), s.path.as_path()))
        .collect();
    let shadowed = candidates
        .iter()
        .flatten()
        .filter_map(|c| {
            let winner = winners.get(c.name.as_str())?;
            (*winner != c.path.as_path()).then(|| Shadowed {
                name: c.name.clone(),
                path: c.path.clone(),
                shadowed_by: winner.to_path_buf(),
            })
        })
        .collect::<Vec<_>>();

    for s in &shadowed {
        debug!(
            skill = %s.name,
            path = ?s.path,
            winner = ?s.shadowed_by,
            "skill shadowed by higher-priority root"
        );
    }

    Resolution {
        skills,
        has_local_root: roots.iter().any(|r| r.origin == RootOrigin::Local),
        skipped,
        shadowed,
    }
}

/// Resolve every skill visible from `start_dir`.
///
/// All process-wide inputs (working directory, home directory, merged config)
/// are passed in explicitly.
pub fn list_installed(
    start_dir: &Path,
    extra: &[PathBuf],
    config: &Config,
    home: Option<&Path>,
) -> Resolution {
    let roots = resolve_roots(start_dir, extra, config, home);
    merge_roots(&roots, scan)
}
